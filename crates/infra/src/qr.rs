//! QR proof artifact.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Luma};
use qrcode::{EcLevel, QrCode};
use thiserror::Error;

use etims_core::format_amount;
use etims_invoicing::InvoiceResponse;
use etims_invoicing::datetime::DISPLAY_FORMAT;

/// Pixels per QR module.
pub const QR_MODULE_SCALE: u32 = 20;

#[derive(Debug, Error)]
pub enum QrError {
    #[error("failed to encode QR code: {0}")]
    Encode(#[from] qrcode::types::QrError),

    #[error("failed to render QR image: {0}")]
    Image(#[from] image::ImageError),
}

/// Text to PNG bytes.
pub trait QrEncoder: Send + Sync {
    fn encode_png(&self, payload: &str) -> Result<Vec<u8>, QrError>;
}

/// Error-correction level Q, 20 px modules, with the standard quiet zone.
#[derive(Debug, Clone, Copy)]
pub struct PngQrEncoder {
    ec_level: EcLevel,
    module_scale: u32,
}

impl Default for PngQrEncoder {
    fn default() -> Self {
        Self {
            ec_level: EcLevel::Q,
            module_scale: QR_MODULE_SCALE,
        }
    }
}

impl QrEncoder for PngQrEncoder {
    fn encode_png(&self, payload: &str) -> Result<Vec<u8>, QrError> {
        let code = QrCode::with_error_correction_level(payload.as_bytes(), self.ec_level)?;
        let pixels = code
            .render::<Luma<u8>>()
            .module_dimensions(self.module_scale, self.module_scale)
            .build();

        let mut png = Cursor::new(Vec::new());
        DynamicImage::ImageLuma8(pixels).write_to(&mut png, ImageFormat::Png)?;
        Ok(png.into_inner())
    }
}

/// QR text for a response: the authority's QR data, then its QR code, then a
/// summary block built from the response itself.
pub fn qr_payload(response: &InvoiceResponse) -> String {
    response
        .qr_code_data
        .clone()
        .or_else(|| response.qr_code.clone())
        .unwrap_or_else(|| summary_payload(response))
}

fn summary_payload(response: &InvoiceResponse) -> String {
    let date = response
        .invoice_date
        .map(|d| d.format(DISPLAY_FORMAT).to_string())
        .unwrap_or_default();
    let amount = response.total_amount.map(format_amount).unwrap_or_default();

    let mut lines = vec![
        format!("Invoice: {}", response.display_number().unwrap_or_default()),
        format!("Date: {date}"),
        format!("Amount: {amount}"),
    ];
    if let Some(signature) = response.digital_signature.as_deref().filter(|s| !s.is_empty()) {
        lines.push(format!("Signature: {signature}"));
    }
    lines.into_iter().map(|line| line + "\n").collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    fn accepted() -> InvoiceResponse {
        InvoiceResponse {
            success: true,
            invoice_number: Some("INV-1".to_string()),
            kra_invoice_number: Some("KRA-0001".to_string()),
            invoice_date: Some(
                chrono::NaiveDate::from_ymd_opt(2024, 3, 15)
                    .unwrap()
                    .and_hms_opt(10, 30, 0)
                    .unwrap(),
            ),
            total_amount: Some(dec!(232)),
            ..InvoiceResponse::default()
        }
    }

    #[test]
    fn prefers_qr_code_data_then_qr_code() {
        let mut response = accepted();
        response.qr_code = Some("code".to_string());
        response.qr_code_data = Some("data".to_string());
        assert_eq!(qr_payload(&response), "data");

        response.qr_code_data = None;
        assert_eq!(qr_payload(&response), "code");
    }

    #[test]
    fn synthesizes_summary_without_qr_fields() {
        assert_eq!(
            qr_payload(&accepted()),
            "Invoice: KRA-0001\nDate: 2024-03-15 10:30:00\nAmount: 232.00\n"
        );
    }

    #[test]
    fn summary_includes_signature_and_falls_back_to_echoed_number() {
        let mut response = accepted();
        response.kra_invoice_number = None;
        response.digital_signature = Some("c2ln".to_string());
        assert_eq!(
            qr_payload(&response),
            "Invoice: INV-1\nDate: 2024-03-15 10:30:00\nAmount: 232.00\nSignature: c2ln\n"
        );
    }

    #[test]
    fn encodes_png() {
        let png = PngQrEncoder::default()
            .encode_png("https://etims.kra.go.ke/verify?invoice=KRA-0001")
            .unwrap();
        assert!(png.starts_with(PNG_MAGIC));

        let decoded = image::load_from_memory_with_format(&png, ImageFormat::Png).unwrap();
        assert_eq!(decoded.width() % QR_MODULE_SCALE, 0);
        assert_eq!(decoded.width(), decoded.height());
    }
}
