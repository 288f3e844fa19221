//! KRA eTIMS submission pipeline.
//!
//! `KraEtimsService::submit_invoice` runs one submission end to end:
//!
//! ```text
//! InvoiceRequest
//!   ↓
//! 1. Validate (no network call on failure)
//!   ↓
//! 2. Serialize to JSON
//!   ↓
//! 3. Save request artifact            (best-effort)
//!   ↓
//! 4. POST to the submit endpoint (static Basic auth when configured)
//!   ↓
//! 5. Save response artifact           (best-effort, HTML error pages wrapped in JSON)
//!   ↓
//! 6. Decode the response; on acceptance render and save the QR artifact (best-effort)
//!   ↓
//! ServiceResult<InvoiceResponse>
//! ```
//!
//! Every path returns a [`ServiceResult`]; faults are logged and mapped at the
//! public boundary. Best-effort steps only bump [`KraEtimsService::side_effect_faults`].
//! A single network attempt is made per call.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use reqwest::RequestBuilder;
use reqwest::header::CONTENT_TYPE;
use serde_json::json;
use tracing::Instrument;
use uuid::Uuid;

use etims_invoicing::{
    InvoiceRequest, InvoiceResponse, deserialize_invoice_response, format_invoice_summary,
    serialize_invoice_request, validate_invoice,
};

use crate::artifacts::{ArtifactKind, ArtifactStore};
use crate::config::{INVOICE_NUMBER_PLACEHOLDER, KraEtimsConfig};
use crate::error::SubmissionError;
use crate::qr::{PngQrEncoder, QrEncoder, qr_payload};
use crate::result::ServiceResult;

const UNKNOWN_REMOTE_ERROR: &str = "Unknown error from KRA API";
const HTML_ERROR_MESSAGE: &str = "KRA API returned an error response";

pub struct KraEtimsService {
    http: reqwest::Client,
    config: KraEtimsConfig,
    base_url: String,
    store: ArtifactStore,
    qr: Arc<dyn QrEncoder>,
    side_effect_faults: AtomicUsize,
}

impl KraEtimsService {
    pub fn new(http: reqwest::Client, config: KraEtimsConfig) -> Self {
        let base_url = config.normalized_base_url();
        let store = ArtifactStore::new(config.output_dir.clone());
        Self {
            http,
            config,
            base_url,
            store,
            qr: Arc::new(PngQrEncoder::default()),
            side_effect_faults: AtomicUsize::new(0),
        }
    }

    pub fn with_qr_encoder(mut self, qr: Arc<dyn QrEncoder>) -> Self {
        self.qr = qr;
        self
    }

    pub fn config(&self) -> &KraEtimsConfig {
        &self.config
    }

    pub fn output_directory(&self) -> &Path {
        self.store.output_root()
    }

    /// Artifact file names, newest invoice numbers first by name.
    pub async fn generated_files(&self) -> Vec<String> {
        self.store.list().await
    }

    /// Number of best-effort steps (artifact writes, QR rendering) that failed.
    pub fn side_effect_faults(&self) -> usize {
        self.side_effect_faults.load(Ordering::Relaxed)
    }

    /// Submit an invoice to KRA eTIMS.
    pub async fn submit_invoice(&self, invoice: &InvoiceRequest) -> ServiceResult<InvoiceResponse> {
        let span = tracing::info_span!(
            "submit_invoice",
            invoice_number = %invoice.invoice_number,
            submission_id = %Uuid::now_v7(),
        );

        async {
            tracing::info!("submitting invoice to KRA eTIMS");
            match self.try_submit(invoice).await {
                Ok(result) => result,
                Err(err) => {
                    if err.is_transport() {
                        tracing::error!(error = %err, "HTTP error while submitting invoice");
                    } else {
                        tracing::error!(error = %err, "error submitting invoice");
                    }
                    ServiceResult::faulted(err.describe(), err)
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Look up an invoice's status. Nothing is written to disk.
    pub async fn get_invoice_status(&self, invoice_number: &str) -> ServiceResult<InvoiceResponse> {
        match self.try_status(invoice_number).await {
            Ok(result) => result,
            Err(err) => {
                tracing::error!(invoice_number, error = %err, "error getting invoice status");
                ServiceResult::faulted(format!("Error getting invoice status: {err}"), err)
            }
        }
    }

    async fn try_submit(
        &self,
        invoice: &InvoiceRequest,
    ) -> Result<ServiceResult<InvoiceResponse>, SubmissionError> {
        let validation = validate_invoice(Some(invoice));
        if !validation.is_valid {
            tracing::warn!(errors = ?validation.errors, "invoice failed validation");
            return Ok(ServiceResult::invalid(format!(
                "Invoice validation failed: {}",
                validation.joined()
            )));
        }
        tracing::debug!(summary = %format_invoice_summary(invoice), "invoice validated");

        let body = serialize_invoice_request(invoice)?;
        let invoice_number = invoice.invoice_number.as_str();
        self.persist(ArtifactKind::Request, invoice_number, body.as_bytes())
            .await;

        let endpoint = self.config.submit_endpoint();
        let url = self.endpoint_url(endpoint)?;
        tracing::info!(endpoint, "posting invoice to KRA endpoint");

        let response = self
            .authorized(self.http.post(url))
            .header(CONTENT_TYPE, "application/json; charset=utf-8")
            .body(body)
            .send()
            .await?;
        let status = response.status();
        let raw = response.text().await?;

        self.persist(
            ArtifactKind::Response,
            invoice_number,
            response_artifact(&raw, status.is_success()).as_bytes(),
        )
        .await;

        if !status.is_success() {
            tracing::error!(status = %status, body = %raw, "KRA API returned error");
            return Ok(ServiceResult::rejected(
                format!("KRA API error: {status} - {raw}"),
                None,
            ));
        }

        match deserialize_invoice_response(&raw)? {
            Some(accepted) if accepted.success => {
                self.save_qr(&accepted, invoice_number).await;
                tracing::info!(
                    kra_invoice_number = accepted.kra_invoice_number.as_deref().unwrap_or_default(),
                    "invoice submitted successfully"
                );
                Ok(ServiceResult::ok(accepted))
            }
            other => {
                let message = other
                    .as_ref()
                    .and_then(|r| r.message.clone())
                    .unwrap_or_else(|| UNKNOWN_REMOTE_ERROR.to_string());
                tracing::warn!(message = %message, "KRA API rejected invoice");
                Ok(ServiceResult::rejected(message, other))
            }
        }
    }

    async fn try_status(
        &self,
        invoice_number: &str,
    ) -> Result<ServiceResult<InvoiceResponse>, SubmissionError> {
        let endpoint = status_path(self.config.status_endpoint(), invoice_number);
        let url = self.endpoint_url(&endpoint)?;
        tracing::info!(endpoint = %endpoint, "getting invoice status from KRA endpoint");

        let response = self.authorized(self.http.get(url)).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Ok(ServiceResult::rejected(
                format!("Failed to get invoice status: {status}"),
                None,
            ));
        }

        let raw = response.text().await?;
        Ok(ServiceResult::completed(deserialize_invoice_response(&raw)?))
    }

    fn endpoint_url(&self, path: &str) -> Result<reqwest::Url, SubmissionError> {
        if self.base_url.is_empty() {
            return Err(SubmissionError::MissingBaseUrl);
        }
        let invalid = |reason: String| SubmissionError::InvalidUrl {
            url: format!("{}{}", self.base_url, path),
            reason,
        };
        reqwest::Url::parse(&self.base_url)
            .and_then(|base| base.join(path))
            .map_err(|e| invalid(e.to_string()))
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match self.config.basic_credentials() {
            Some((username, password)) => request.basic_auth(username, Some(password)),
            None => request,
        }
    }

    async fn persist(&self, kind: ArtifactKind, invoice_number: &str, contents: &[u8]) {
        match self.store.save(kind, invoice_number, contents).await {
            Ok(path) => tracing::info!(path = %path.display(), "{kind} saved"),
            Err(err) => {
                self.side_effect_faults.fetch_add(1, Ordering::Relaxed);
                tracing::error!(error = %err, "error saving {kind}");
            }
        }
    }

    async fn save_qr(&self, response: &InvoiceResponse, invoice_number: &str) {
        let payload = qr_payload(response);
        if payload.is_empty() {
            tracing::warn!("no QR code data available");
            return;
        }
        match self.qr.encode_png(&payload) {
            Ok(png) => self.persist(ArtifactKind::QrCode, invoice_number, &png).await,
            Err(err) => {
                self.side_effect_faults.fetch_add(1, Ordering::Relaxed);
                tracing::error!(error = %err, "error generating QR code");
            }
        }
    }
}

/// Status path for `invoice_number`: the `{invoiceNumber}` placeholder is
/// substituted, otherwise the number is appended as a path segment.
pub fn status_path(template: &str, invoice_number: &str) -> String {
    if template.contains(INVOICE_NUMBER_PLACEHOLDER) {
        template.replace(INVOICE_NUMBER_PLACEHOLDER, invoice_number)
    } else {
        format!("{template}/{invoice_number}")
    }
}

/// Body written as the response artifact. A failed call that returned an
/// HTML page is wrapped in a JSON envelope so the file stays valid JSON.
pub fn response_artifact(raw: &str, is_success: bool) -> String {
    if is_success || !looks_like_html(raw) {
        return raw.to_string();
    }
    let envelope = json!({
        "error": true,
        "statusCode": "Error",
        "message": HTML_ERROR_MESSAGE,
        "rawResponse": raw,
    });
    serde_json::to_string_pretty(&envelope).unwrap_or_else(|_| raw.to_string())
}

fn looks_like_html(raw: &str) -> bool {
    raw.trim_start()
        .get(..9)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("<!DOCTYPE"))
}
