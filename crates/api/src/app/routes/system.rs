use axum::Json;

use crate::app::dto::HealthResponse;

pub const SERVICE_NAME: &str = "KRA eTIMS Invoice Worker";

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        service: SERVICE_NAME,
        status: "running",
        version: env!("CARGO_PKG_VERSION"),
    })
}
