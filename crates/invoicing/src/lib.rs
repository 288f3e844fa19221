//! Invoicing domain for KRA eTIMS submissions.
//!
//! This crate contains the invoice model and its business rules (validation,
//! tax derivation, wire codec), implemented purely as deterministic domain
//! logic (no HTTP, no storage).

pub mod codec;
pub mod datetime;
pub mod helpers;
pub mod invoice;
pub mod response;
pub mod tax;
pub mod validation;

pub use codec::{
    CodecError, deserialize_invoice_response, serialize_invoice_request,
    serialize_invoice_response,
};
pub use helpers::{SimpleLineItem, create_invoice_request, format_invoice_summary};
pub use invoice::{
    Customer, DEFAULT_CURRENCY, DEFAULT_PAYMENT_MODE, DEFAULT_TAX_CATEGORY, DEFAULT_TAX_RATE,
    InvoiceRequest, LineItem, PaymentInfo, TaxInfo,
};
pub use response::InvoiceResponse;
pub use tax::{calculate_standard_tax, calculate_tax};
pub use validation::{InvoiceTotals, ValidationResult, compare_totals, validate_invoice};
