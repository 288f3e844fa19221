//! JSON codec for the KRA eTIMS wire format.
//!
//! Requests are written compact, lowerCamelCase, with `None` fields omitted
//! and derived totals included. Responses are read with case-insensitive
//! field matching.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::invoice::InvoiceRequest;
use crate::response::InvoiceResponse;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("failed to serialize {what}: {source}")]
    Serialize {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to deserialize invoice response: {0}")]
    Deserialize(#[source] serde_json::Error),
}

pub fn serialize_invoice_request(invoice: &InvoiceRequest) -> Result<String, CodecError> {
    serde_json::to_string(invoice).map_err(|source| CodecError::Serialize {
        what: "invoice request",
        source,
    })
}

pub fn serialize_invoice_response(response: &InvoiceResponse) -> Result<String, CodecError> {
    serde_json::to_string(response).map_err(|source| CodecError::Serialize {
        what: "invoice response",
        source,
    })
}

/// Decode a response body. The JSON literal `null` decodes to `None`;
/// anything that is not valid JSON for a response is an error.
pub fn deserialize_invoice_response(json: &str) -> Result<Option<InvoiceResponse>, CodecError> {
    let value: Value = serde_json::from_str(json).map_err(CodecError::Deserialize)?;
    if value.is_null() {
        return Ok(None);
    }
    serde_json::from_value(canonicalize_keys(value))
        .map(Some)
        .map_err(CodecError::Deserialize)
}

/// Rewrite top-level keys that match a response field ignoring ASCII case.
fn canonicalize_keys(value: Value) -> Value {
    let Value::Object(map) = value else {
        return value;
    };
    let canonical: Map<String, Value> = map
        .into_iter()
        .map(|(key, v)| {
            let name = InvoiceResponse::FIELD_NAMES
                .iter()
                .find(|field| field.eq_ignore_ascii_case(&key))
                .map(|field| (*field).to_string())
                .unwrap_or(key);
            (name, v)
        })
        .collect();
    Value::Object(canonical)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::{Customer, LineItem};
    use rust_decimal_macros::dec;

    fn sample_invoice() -> InvoiceRequest {
        let mut invoice = InvoiceRequest::new(
            "INV-001",
            Customer::named("Acme Ltd"),
            vec![LineItem::new("Widget", dec!(2), dec!(100))],
        );
        invoice.invoice_date = crate::datetime::parse("2024-03-15T10:30:00").unwrap();
        invoice
    }

    #[test]
    fn request_uses_camel_case_and_includes_derived_totals() {
        let json = serialize_invoice_request(&sample_invoice()).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["invoiceNumber"], "INV-001");
        assert_eq!(value["invoiceDate"], "2024-03-15T10:30:00");
        assert_eq!(value["customer"]["customerName"], "Acme Ltd");
        assert_eq!(value["currency"], "KES");
        assert_eq!(value["taxInfo"]["taxCategory"], "A");
        assert_eq!(value["paymentInfo"]["paymentMode"], "CASH");
        assert_eq!(value["lineItems"][0]["itemName"], "Widget");
        assert_eq!(value["lineItems"][0]["lineTotal"].as_f64(), Some(200.0));
        assert_eq!(value["lineItems"][0]["taxAmount"].as_f64(), Some(32.0));
        assert_eq!(value["subTotal"].as_f64(), Some(200.0));
        assert_eq!(value["totalTax"].as_f64(), Some(32.0));
        assert_eq!(value["totalAmount"].as_f64(), Some(232.0));
    }

    #[test]
    fn amounts_travel_as_exact_json_numbers() {
        let body = r#"{
            "invoiceNumber": "INV-8",
            "customer": {"customerName": "Acme"},
            "lineItems": [{"itemName": "Bulk", "quantity": 1, "unitPrice": 12345678901234567.89, "taxRate": 16}]
        }"#;
        let invoice: InvoiceRequest = serde_json::from_str(body).unwrap();
        assert_eq!(invoice.line_items[0].unit_price, dec!(12345678901234567.89));

        let json = serialize_invoice_request(&invoice).unwrap();
        assert!(json.contains(r#""quantity":1,"#), "{json}");
        assert!(json.contains(r#""taxRate":16,"#), "{json}");
        assert!(json.contains(r#""unitPrice":12345678901234567.89,"#), "{json}");
        assert!(json.contains(r#""subTotal":12345678901234567.89,"#), "{json}");
        assert!(!json.contains("e+"), "{json}");
    }

    #[test]
    fn request_omits_none_fields_and_is_compact() {
        let json = serialize_invoice_request(&sample_invoice()).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();

        assert!(!json.contains('\n'));
        assert!(value.get("remarks").is_none());
        assert!(value["customer"].get("customerPin").is_none());
        assert!(value["lineItems"][0].get("itemCode").is_none());
        assert!(value["paymentInfo"].get("paymentReference").is_none());
    }

    #[test]
    fn inbound_request_ignores_derived_fields() {
        let body = r#"{
            "invoiceNumber": "INV-7",
            "invoiceDate": "2024-03-15T10:30:00",
            "customer": {"customerName": "Acme"},
            "lineItems": [{"itemName": "Widget", "itemCode": "W-1", "quantity": 2, "unitPrice": 100, "lineTotal": 999}],
            "subTotal": 12345
        }"#;
        let invoice: InvoiceRequest = serde_json::from_str(body).unwrap();

        assert_eq!(invoice.line_items[0].code.as_deref(), Some("W-1"));
        assert_eq!(invoice.line_items[0].tax_rate, dec!(16));
        assert_eq!(invoice.line_items[0].line_total(), dec!(200));
        assert_eq!(invoice.sub_total(), dec!(200));
        assert_eq!(invoice.currency, "KES");
    }

    #[test]
    fn response_field_names_are_case_insensitive() {
        let json = r#"{"SUCCESS": true, "Message": "ok", "kraInvoiceNUMBER": "KRA-1", "TotalAmount": 232.5, "extra": 1}"#;
        let response = deserialize_invoice_response(json).unwrap().unwrap();

        assert!(response.success);
        assert_eq!(response.message.as_deref(), Some("ok"));
        assert_eq!(response.kra_invoice_number.as_deref(), Some("KRA-1"));
        assert_eq!(response.total_amount, Some(dec!(232.5)));
    }

    #[test]
    fn missing_fields_default() {
        let response = deserialize_invoice_response(r#"{"message":"PIN mismatch"}"#)
            .unwrap()
            .unwrap();
        assert!(!response.success);
        assert_eq!(response.message.as_deref(), Some("PIN mismatch"));
        assert!(response.errors.is_none());
    }

    #[test]
    fn null_body_is_no_response() {
        assert!(deserialize_invoice_response("null").unwrap().is_none());
    }

    #[test]
    fn malformed_json_is_an_error() {
        let err = deserialize_invoice_response("<!DOCTYPE html><html></html>").unwrap_err();
        assert!(matches!(err, CodecError::Deserialize(_)));
        assert!(deserialize_invoice_response("").is_err());
        assert!(deserialize_invoice_response(r#"{"success": "yes"}"#).is_err());
    }

    #[test]
    fn decoded_response_survives_a_round_trip() {
        let json = r#"{
            "success": true,
            "message": "Invoice accepted",
            "invoiceNumber": "INV-001",
            "kraInvoiceNumber": "KRA-0001",
            "invoiceDate": "2024-03-15T10:30:00",
            "qrCodeData": "https://etims.kra.go.ke/verify?x=1",
            "digitalSignature": "c2lnbmF0dXJl",
            "timestamp": "2024-03-15T10:30:05+03:00",
            "totalAmount": 232,
            "taxAmount": 32.5,
            "errors": []
        }"#;
        let first = deserialize_invoice_response(json).unwrap().unwrap();
        let encoded = serialize_invoice_response(&first).unwrap();
        let second = deserialize_invoice_response(&encoded).unwrap().unwrap();

        assert_eq!(first, second);
        assert_eq!(second.errors, Some(Vec::new()));
    }
}
