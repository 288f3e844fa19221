//! Outbound HTTP client for the KRA eTIMS API.

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};

use crate::config::KraEtimsConfig;

/// Shared client: `Accept: application/json`, fixed connect and total timeouts.
pub fn build_http_client(config: &KraEtimsConfig) -> reqwest::Result<reqwest::Client> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    reqwest::Client::builder()
        .default_headers(headers)
        .connect_timeout(config.timeout)
        .timeout(config.timeout)
        .build()
}
