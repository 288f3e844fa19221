use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use etims_infra::{KraEtimsService, ServiceResult};
use etims_invoicing::{InvoiceRequest, InvoiceResponse, validate_invoice};

use crate::app::{dto, errors};

pub const SUBMITTED: &str = "Invoice submitted successfully";
pub const SUBMIT_FAILED: &str = "Failed to submit invoice";
pub const NOT_FOUND: &str = "Invoice not found";

pub fn router() -> Router {
    Router::new()
        .route("/submit", post(submit_invoice))
        .route("/status/:invoice_number", get(invoice_status))
        .route("/files", get(generated_files))
}

pub async fn submit_invoice(
    Extension(service): Extension<Arc<KraEtimsService>>,
    body: Result<Json<Option<InvoiceRequest>>, JsonRejection>,
) -> axum::response::Response {
    let invoice = match body {
        Ok(Json(invoice)) => invoice,
        Err(rejection) => return errors::body_rejection_to_response(rejection),
    };

    let Some(invoice) = invoice else {
        let validation = validate_invoice(None);
        let result: ServiceResult<InvoiceResponse> = ServiceResult::invalid(format!(
            "Invoice validation failed: {}",
            validation.joined()
        ));
        return submit_failed(result);
    };

    tracing::info!(invoice_number = %invoice.invoice_number, "received invoice submission");
    let result = service.submit_invoice(&invoice).await;

    match result {
        ServiceResult {
            success: true,
            data: Some(data),
            ..
        } => (
            StatusCode::OK,
            Json(dto::SubmitAccepted {
                success: true,
                message: SUBMITTED,
                data,
            }),
        )
            .into_response(),
        failed => submit_failed(failed),
    }
}

fn submit_failed(result: ServiceResult<InvoiceResponse>) -> axum::response::Response {
    let errors = result.fault_message();
    (
        StatusCode::BAD_REQUEST,
        Json(dto::SubmitFailed {
            success: false,
            message: result
                .error_message
                .unwrap_or_else(|| SUBMIT_FAILED.to_string()),
            errors,
        }),
    )
        .into_response()
}

pub async fn invoice_status(
    Extension(service): Extension<Arc<KraEtimsService>>,
    Path(invoice_number): Path<String>,
) -> axum::response::Response {
    match service.get_invoice_status(&invoice_number).await {
        ServiceResult {
            success: true,
            data: Some(data),
            ..
        } => (
            StatusCode::OK,
            Json(dto::StatusFound {
                success: true,
                data,
            }),
        )
            .into_response(),
        other => (
            StatusCode::NOT_FOUND,
            Json(dto::StatusMissing {
                success: false,
                message: other
                    .error_message
                    .unwrap_or_else(|| NOT_FOUND.to_string()),
            }),
        )
            .into_response(),
    }
}

pub async fn generated_files(
    Extension(service): Extension<Arc<KraEtimsService>>,
) -> Json<dto::GeneratedFilesResponse> {
    let files = service.generated_files().await;
    Json(dto::GeneratedFilesResponse {
        output_directory: service.output_directory().to_path_buf(),
        file_count: files.len(),
        files,
    })
}
