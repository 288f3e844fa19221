//! Pre-submission checks over a populated invoice.
//!
//! Every rule runs and every violation is collected, so a caller sees all
//! problems in one pass. The only exception is a missing invoice, which yields
//! a single error.

use rust_decimal::Decimal;
use serde::Serialize;

use etims_core::money;

use crate::invoice::{InvoiceRequest, LineItem};

pub const NULL_INVOICE: &str = "Invoice request cannot be null";
pub const MISSING_INVOICE_NUMBER: &str = "Invoice number is required";
pub const MISSING_CUSTOMER_NAME: &str = "Customer name is required";
pub const NO_LINE_ITEMS: &str = "At least one line item is required";
pub const SUBTOTAL_MISMATCH: &str = "Subtotal calculation mismatch";
pub const TAX_MISMATCH: &str = "Tax calculation mismatch";
pub const TOTAL_MISMATCH: &str = "Total amount calculation mismatch";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    /// Errors joined with `", "`.
    pub fn joined(&self) -> String {
        self.errors.join(", ")
    }
}

/// The three invoice aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvoiceTotals {
    pub sub_total: Decimal,
    pub total_tax: Decimal,
    pub total_amount: Decimal,
}

impl InvoiceTotals {
    /// Totals as the invoice reports them.
    pub fn declared(invoice: &InvoiceRequest) -> Self {
        Self {
            sub_total: invoice.sub_total(),
            total_tax: invoice.total_tax(),
            total_amount: invoice.total_amount(),
        }
    }

    /// Totals rebuilt line by line, without going through the invoice.
    pub fn recompute(line_items: &[LineItem]) -> Self {
        let mut sub_total = Decimal::ZERO;
        let mut total_tax = Decimal::ZERO;
        for item in line_items {
            sub_total = sub_total.saturating_add(item.line_total());
            total_tax = total_tax.saturating_add(item.tax_amount());
        }
        Self {
            sub_total,
            total_tax,
            total_amount: sub_total.saturating_add(total_tax),
        }
    }
}

/// One error per aggregate that differs by more than [`money::MONEY_TOLERANCE`].
pub fn compare_totals(declared: &InvoiceTotals, computed: &InvoiceTotals) -> Vec<String> {
    let checks = [
        (declared.sub_total, computed.sub_total, SUBTOTAL_MISMATCH),
        (declared.total_tax, computed.total_tax, TAX_MISMATCH),
        (declared.total_amount, computed.total_amount, TOTAL_MISMATCH),
    ];
    checks
        .into_iter()
        .filter(|(declared, computed, _)| !money::within_tolerance(*declared, *computed))
        .map(|(_, _, message)| message.to_string())
        .collect()
}

/// Validate an invoice before submission. Pure; no side effects.
pub fn validate_invoice(invoice: Option<&InvoiceRequest>) -> ValidationResult {
    let Some(invoice) = invoice else {
        return ValidationResult::from_errors(vec![NULL_INVOICE.to_string()]);
    };

    let mut errors = Vec::new();

    if invoice.invoice_number.trim().is_empty() {
        errors.push(MISSING_INVOICE_NUMBER.to_string());
    }

    if invoice.customer.name.trim().is_empty() {
        errors.push(MISSING_CUSTOMER_NAME.to_string());
    }

    if invoice.line_items.is_empty() {
        errors.push(NO_LINE_ITEMS.to_string());
    } else {
        for (idx, item) in invoice.line_items.iter().enumerate() {
            let position = idx + 1;
            if item.name.trim().is_empty() {
                errors.push(format!("Line item {position}: Item name is required"));
            }
            if item.quantity <= Decimal::ZERO {
                errors.push(format!(
                    "Line item {position}: Quantity must be greater than zero"
                ));
            }
            if item.unit_price < Decimal::ZERO {
                errors.push(format!("Line item {position}: Unit price cannot be negative"));
            }
        }
    }

    errors.extend(compare_totals(
        &InvoiceTotals::declared(invoice),
        &InvoiceTotals::recompute(&invoice.line_items),
    ));

    ValidationResult::from_errors(errors)
}

impl InvoiceRequest {
    pub fn validate(&self) -> ValidationResult {
        validate_invoice(Some(self))
    }
}
