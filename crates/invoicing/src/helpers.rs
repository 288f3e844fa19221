//! Convenience constructors and text rendering for invoices.

use chrono::Local;
use rust_decimal::Decimal;

use etims_core::money::{self, format_amount};

use crate::datetime::DISPLAY_FORMAT;
use crate::invoice::{
    Customer, DEFAULT_PAYMENT_MODE, DEFAULT_TAX_RATE, InvoiceRequest, LineItem, PaymentInfo,
};
use crate::tax::calculate_tax;

/// Minimal line description for [`create_invoice_request`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleLineItem {
    pub name: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub tax_rate: Decimal,
}

impl SimpleLineItem {
    pub fn new(
        name: impl Into<String>,
        quantity: Decimal,
        unit_price: Decimal,
        tax_rate: Decimal,
    ) -> Self {
        Self {
            name: name.into(),
            quantity,
            unit_price,
            tax_rate,
        }
    }
}

/// Build a ready-to-submit invoice dated now.
///
/// The tax snapshot uses the first item's rate (16% when there are no items)
/// and the payment amount covers every line including its tax.
pub fn create_invoice_request(
    invoice_number: &str,
    customer_name: &str,
    items: &[SimpleLineItem],
    payment_mode: Option<&str>,
    customer_pin: Option<&str>,
) -> InvoiceRequest {
    let line_items: Vec<LineItem> = items
        .iter()
        .map(|item| {
            LineItem::new(item.name.clone(), item.quantity, item.unit_price)
                .with_tax_rate(item.tax_rate)
        })
        .collect();

    let rate = line_items
        .first()
        .map(|item| item.tax_rate)
        .unwrap_or(DEFAULT_TAX_RATE);
    let tax_info = calculate_tax(&line_items, rate);
    let payment_amount = money::sum(
        line_items
            .iter()
            .map(|item| item.line_total().saturating_add(item.tax_amount())),
    );

    InvoiceRequest {
        invoice_number: invoice_number.to_string(),
        invoice_date: Local::now().naive_local(),
        customer: Customer {
            pin: customer_pin.map(str::to_string),
            ..Customer::named(customer_name)
        },
        line_items,
        tax_info,
        payment_info: PaymentInfo {
            mode: payment_mode.unwrap_or(DEFAULT_PAYMENT_MODE).to_string(),
            amount: payment_amount,
            reference: None,
        },
        ..InvoiceRequest::default()
    }
}

/// Multi-line, human-readable summary of an invoice.
pub fn format_invoice_summary(invoice: &InvoiceRequest) -> String {
    let currency = &invoice.currency;
    format!(
        "Invoice Number: {}\n\
         Date: {}\n\
         Customer: {}\n\
         Items: {}\n\
         Subtotal: {currency} {}\n\
         Tax: {currency} {}\n\
         Total: {currency} {}",
        invoice.invoice_number,
        invoice.invoice_date.format(DISPLAY_FORMAT),
        invoice.customer.name,
        invoice.line_items.len(),
        format_amount(invoice.sub_total()),
        format_amount(invoice.total_tax()),
        format_amount(invoice.total_amount()),
    )
}
