//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: response envelopes
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use etims_infra::KraEtimsService;

pub mod dto;
pub mod errors;
pub mod routes;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(service: Arc<KraEtimsService>) -> Router {
    Router::new()
        .route("/", get(routes::system::health))
        .nest("/api/invoice", routes::invoices::router())
        .layer(ServiceBuilder::new().layer(Extension(service)))
}
