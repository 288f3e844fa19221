//! Tax snapshot derivation.

use rust_decimal::Decimal;

use etims_core::money;

use crate::invoice::{DEFAULT_TAX_CATEGORY, DEFAULT_TAX_RATE, LineItem, TaxInfo};

/// Build a [`TaxInfo`] snapshot for `line_items` at `tax_rate` percent.
///
/// The taxable amount is the sum of line totals (each already net of its own
/// discount). The tax amount applies the single `tax_rate` to that sum, so it
/// can differ from the sum of per-line tax amounts when lines carry different
/// rates. Callers rely on that difference; it is not reconciled here.
pub fn calculate_tax(line_items: &[LineItem], tax_rate: Decimal) -> TaxInfo {
    let taxable_amount = money::sum(line_items.iter().map(LineItem::line_total));
    TaxInfo {
        category: DEFAULT_TAX_CATEGORY.to_string(),
        tax_rate,
        taxable_amount,
        tax_amount: money::percent_of(taxable_amount, tax_rate),
    }
}

/// [`calculate_tax`] at the standard 16% rate.
pub fn calculate_standard_tax(line_items: &[LineItem]) -> TaxInfo {
    calculate_tax(line_items, DEFAULT_TAX_RATE)
}
