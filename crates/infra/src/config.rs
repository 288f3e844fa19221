//! KRA eTIMS connection settings.
//!
//! Values come from the environment (`KRA_ETIMS_*`). Only emptiness is checked;
//! blank endpoint paths fall back to the OSCU defaults at use time.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_SUBMIT_ENDPOINT: &str = "/api/oscu/invoice/submit";
pub const DEFAULT_STATUS_ENDPOINT: &str = "/api/oscu/invoice/status";
pub const DEFAULT_DEVICE_INIT_ENDPOINT: &str = "/api/oscu/device/init";
pub const DEFAULT_OUTPUT_DIR: &str = "generated-invoices";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Placeholder substituted in the status endpoint template.
pub const INVOICE_NUMBER_PLACEHOLDER: &str = "{invoiceNumber}";

const ENV_BASE_URL: &str = "KRA_ETIMS_BASE_URL";
const ENV_API_USERNAME: &str = "KRA_ETIMS_API_USERNAME";
const ENV_API_PASSWORD: &str = "KRA_ETIMS_API_PASSWORD";
const ENV_PIN: &str = "KRA_ETIMS_PIN";
const ENV_DEVICE_SERIAL_NUMBER: &str = "KRA_ETIMS_DEVICE_SERIAL_NUMBER";
const ENV_SUBMIT_ENDPOINT: &str = "KRA_ETIMS_INVOICE_SUBMIT_ENDPOINT";
const ENV_STATUS_ENDPOINT: &str = "KRA_ETIMS_INVOICE_STATUS_ENDPOINT";
const ENV_DEVICE_INIT_ENDPOINT: &str = "KRA_ETIMS_DEVICE_INIT_ENDPOINT";
const ENV_OUTPUT_DIR: &str = "KRA_ETIMS_OUTPUT_DIR";
const ENV_TIMEOUT_SECS: &str = "KRA_ETIMS_TIMEOUT_SECS";

#[derive(Clone)]
pub struct KraEtimsConfig {
    /// Sandbox: `https://etims-api-sbx.kra.go.ke`, production: `https://etims-api.kra.go.ke`.
    pub base_url: String,
    pub api_username: String,
    pub api_password: String,
    /// Taxpayer PIN of the seller.
    pub pin: String,
    pub device_serial_number: Option<String>,
    pub invoice_submit_endpoint: String,
    /// May contain `{invoiceNumber}`; otherwise the number is appended as a path segment.
    pub invoice_status_endpoint: String,
    pub device_init_endpoint: String,
    pub output_dir: PathBuf,
    pub timeout: Duration,
}

impl Default for KraEtimsConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_username: String::new(),
            api_password: String::new(),
            pin: String::new(),
            device_serial_number: None,
            invoice_submit_endpoint: DEFAULT_SUBMIT_ENDPOINT.to_string(),
            invoice_status_endpoint: DEFAULT_STATUS_ENDPOINT.to_string(),
            device_init_endpoint: DEFAULT_DEVICE_INIT_ENDPOINT.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl fmt::Debug for KraEtimsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KraEtimsConfig")
            .field("base_url", &self.base_url)
            .field("api_username", &self.api_username)
            .field("api_password", &"<redacted>")
            .field("pin", &self.pin)
            .field("device_serial_number", &self.device_serial_number)
            .field("invoice_submit_endpoint", &self.invoice_submit_endpoint)
            .field("invoice_status_endpoint", &self.invoice_status_endpoint)
            .field("device_init_endpoint", &self.device_init_endpoint)
            .field("output_dir", &self.output_dir)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl KraEtimsConfig {
    /// Load from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through `lookup`, which returns the raw value of a variable if set.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let base_url = lookup(ENV_BASE_URL).unwrap_or_else(|| {
            tracing::warn!("{ENV_BASE_URL} not set; requests to KRA eTIMS will fail");
            String::new()
        });

        let timeout = match lookup(ENV_TIMEOUT_SECS) {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    tracing::warn!(value = %raw, "invalid {ENV_TIMEOUT_SECS}; using default");
                    defaults.timeout
                }
            },
            None => defaults.timeout,
        };

        Self {
            base_url,
            api_username: lookup(ENV_API_USERNAME).unwrap_or_default(),
            api_password: lookup(ENV_API_PASSWORD).unwrap_or_default(),
            pin: lookup(ENV_PIN).unwrap_or_default(),
            device_serial_number: lookup(ENV_DEVICE_SERIAL_NUMBER).filter(|v| !v.trim().is_empty()),
            invoice_submit_endpoint: lookup(ENV_SUBMIT_ENDPOINT)
                .unwrap_or(defaults.invoice_submit_endpoint),
            invoice_status_endpoint: lookup(ENV_STATUS_ENDPOINT)
                .unwrap_or(defaults.invoice_status_endpoint),
            device_init_endpoint: lookup(ENV_DEVICE_INIT_ENDPOINT)
                .unwrap_or(defaults.device_init_endpoint),
            output_dir: lookup(ENV_OUTPUT_DIR)
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            timeout,
        }
    }

    pub fn submit_endpoint(&self) -> &str {
        non_blank_or(&self.invoice_submit_endpoint, DEFAULT_SUBMIT_ENDPOINT)
    }

    pub fn status_endpoint(&self) -> &str {
        non_blank_or(&self.invoice_status_endpoint, DEFAULT_STATUS_ENDPOINT)
    }

    pub fn device_init_endpoint(&self) -> &str {
        non_blank_or(&self.device_init_endpoint, DEFAULT_DEVICE_INIT_ENDPOINT)
    }

    /// Username and password, only when both are set.
    pub fn basic_credentials(&self) -> Option<(&str, &str)> {
        if self.api_username.is_empty() || self.api_password.is_empty() {
            return None;
        }
        Some((&self.api_username, &self.api_password))
    }

    /// Base URL without trailing slashes or the legacy `/api` suffix.
    pub fn normalized_base_url(&self) -> String {
        let trimmed = self.base_url.trim().trim_end_matches('/');
        match strip_legacy_api_suffix(trimmed) {
            Some(stripped) => {
                tracing::warn!(
                    base_url = %self.base_url,
                    "base URL ends with '/api', which is deprecated; configure the base URL without it and set endpoints separately"
                );
                stripped.to_string()
            }
            None => trimmed.to_string(),
        }
    }
}

fn non_blank_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() { fallback } else { value }
}

fn strip_legacy_api_suffix(url: &str) -> Option<&str> {
    let split = url.len().checked_sub(4)?;
    let suffix = url.get(split..)?;
    suffix
        .eq_ignore_ascii_case("/api")
        .then(|| &url[..split])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = KraEtimsConfig::from_lookup(|_| None);
        assert_eq!(config.base_url, "");
        assert_eq!(config.submit_endpoint(), DEFAULT_SUBMIT_ENDPOINT);
        assert_eq!(config.status_endpoint(), DEFAULT_STATUS_ENDPOINT);
        assert_eq!(config.device_init_endpoint(), DEFAULT_DEVICE_INIT_ENDPOINT);
        assert_eq!(config.output_dir, PathBuf::from(DEFAULT_OUTPUT_DIR));
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.basic_credentials().is_none());
    }

    #[test]
    fn reads_every_variable() {
        let config = KraEtimsConfig::from_lookup(lookup_from(&[
            ("KRA_ETIMS_BASE_URL", "https://etims-api-sbx.kra.go.ke"),
            ("KRA_ETIMS_API_USERNAME", "user"),
            ("KRA_ETIMS_API_PASSWORD", "secret"),
            ("KRA_ETIMS_PIN", "P051234567X"),
            ("KRA_ETIMS_DEVICE_SERIAL_NUMBER", "DEV-001"),
            ("KRA_ETIMS_INVOICE_SUBMIT_ENDPOINT", "/v1/invoice"),
            ("KRA_ETIMS_INVOICE_STATUS_ENDPOINT", "/v1/invoice/{invoiceNumber}/status"),
            ("KRA_ETIMS_DEVICE_INIT_ENDPOINT", "/v1/device"),
            ("KRA_ETIMS_OUTPUT_DIR", "/tmp/out"),
            ("KRA_ETIMS_TIMEOUT_SECS", "5"),
        ]));

        assert_eq!(config.basic_credentials(), Some(("user", "secret")));
        assert_eq!(config.pin, "P051234567X");
        assert_eq!(config.device_serial_number.as_deref(), Some("DEV-001"));
        assert_eq!(config.submit_endpoint(), "/v1/invoice");
        assert_eq!(config.status_endpoint(), "/v1/invoice/{invoiceNumber}/status");
        assert_eq!(config.device_init_endpoint(), "/v1/device");
        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn blank_endpoints_fall_back() {
        let config = KraEtimsConfig::from_lookup(lookup_from(&[
            ("KRA_ETIMS_INVOICE_SUBMIT_ENDPOINT", "  "),
            ("KRA_ETIMS_INVOICE_STATUS_ENDPOINT", ""),
            ("KRA_ETIMS_TIMEOUT_SECS", "soon"),
        ]));
        assert_eq!(config.submit_endpoint(), DEFAULT_SUBMIT_ENDPOINT);
        assert_eq!(config.status_endpoint(), DEFAULT_STATUS_ENDPOINT);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn credentials_need_both_halves() {
        let config = KraEtimsConfig {
            api_username: "user".to_string(),
            ..KraEtimsConfig::default()
        };
        assert!(config.basic_credentials().is_none());
    }

    #[test]
    fn legacy_api_suffix_is_stripped() {
        let mut config = KraEtimsConfig {
            base_url: "https://etims-sbx.kra.go.ke/API/".to_string(),
            ..KraEtimsConfig::default()
        };
        assert_eq!(config.normalized_base_url(), "https://etims-sbx.kra.go.ke");

        config.base_url = "https://etims-api-sbx.kra.go.ke/".to_string();
        assert_eq!(config.normalized_base_url(), "https://etims-api-sbx.kra.go.ke");

        config.base_url = "/api".to_string();
        assert_eq!(config.normalized_base_url(), "");
    }

    #[test]
    fn debug_redacts_password() {
        let config = KraEtimsConfig {
            api_password: "hunter2".to_string(),
            ..KraEtimsConfig::default()
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }
}
