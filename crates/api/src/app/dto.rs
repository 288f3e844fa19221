use std::path::PathBuf;

use serde::Serialize;

use etims_invoicing::InvoiceResponse;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub service: &'static str,
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SubmitAccepted {
    pub success: bool,
    pub message: &'static str,
    pub data: InvoiceResponse,
}

/// `errors` carries the underlying fault text, `null` for validation and
/// remote rejections.
#[derive(Debug, Serialize)]
pub struct SubmitFailed {
    pub success: bool,
    pub message: String,
    pub errors: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StatusFound {
    pub success: bool,
    pub data: InvoiceResponse,
}

#[derive(Debug, Serialize)]
pub struct StatusMissing {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedFilesResponse {
    pub output_directory: PathBuf,
    pub file_count: usize,
    pub files: Vec<String>,
}
