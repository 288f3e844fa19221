use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

pub const INVALID_BODY: &str = "Invalid request body";

/// Failure envelope shared by every invoice route: `{success, message, errors}`.
pub fn json_error(
    status: StatusCode,
    message: impl Into<String>,
    errors: Option<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "success": false,
            "message": message.into(),
            "errors": errors,
        })),
    )
        .into_response()
}

/// Body that is not JSON, or JSON that does not describe an invoice.
pub fn body_rejection_to_response(rejection: JsonRejection) -> axum::response::Response {
    json_error(
        StatusCode::BAD_REQUEST,
        INVALID_BODY,
        Some(rejection.body_text()),
    )
}
