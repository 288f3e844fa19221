use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::datetime;

/// Reply from the KRA eTIMS API.
///
/// The authority may omit anything except `success` and `message`, so every
/// other field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Invoice number echoed back by the authority.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,
    /// Number assigned by KRA.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kra_invoice_number: Option<String>,
    #[serde(default, with = "datetime::option", skip_serializing_if = "Option::is_none")]
    pub invoice_date: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qr_code: Option<String>,
    /// Preferred QR payload when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qr_code_data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digital_signature: Option<String>,
    #[serde(default, with = "datetime::option", skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_amount: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl InvoiceResponse {
    /// Wire names of every field, used for case-insensitive decoding.
    pub const FIELD_NAMES: &'static [&'static str] = &[
        "success",
        "message",
        "invoiceNumber",
        "kraInvoiceNumber",
        "invoiceDate",
        "qrCode",
        "qrCodeData",
        "digitalSignature",
        "timestamp",
        "totalAmount",
        "taxAmount",
        "errors",
    ];

    /// KRA number when assigned, otherwise the echoed invoice number.
    pub fn display_number(&self) -> Option<&str> {
        self.kra_invoice_number
            .as_deref()
            .or(self.invoice_number.as_deref())
    }
}
