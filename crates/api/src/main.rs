use std::sync::Arc;

use anyhow::Context;

use etims_infra::http::build_http_client;
use etims_infra::{KraEtimsConfig, KraEtimsService};

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    etims_observability::init();

    let config = KraEtimsConfig::from_env();
    let http = build_http_client(&config).context("failed to build KRA HTTP client")?;

    tracing::info!(
        base_url = %config.base_url,
        submit_endpoint = config.submit_endpoint(),
        status_endpoint = config.status_endpoint(),
        device_init_endpoint = config.device_init_endpoint(),
        device_serial_number = config.device_serial_number.as_deref().unwrap_or("<unset>"),
        output_dir = %config.output_dir.display(),
        "KRA eTIMS configuration loaded"
    );

    let service = Arc::new(KraEtimsService::new(http, config));
    let app = etims_api::app::build_app(service);

    let addr = std::env::var("ETIMS_LISTEN_ADDR").unwrap_or_else(|_| DEFAULT_LISTEN_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
