use chrono::{Local, NaiveDateTime};
use rust_decimal::Decimal;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use etims_core::{ValueObject, money};

use crate::datetime;

/// Standard VAT rate in Kenya (percent).
pub const DEFAULT_TAX_RATE: Decimal = Decimal::from_parts(16, 0, 0, false, 0);

/// Standard VAT category code.
pub const DEFAULT_TAX_CATEGORY: &str = "A";

pub const DEFAULT_PAYMENT_MODE: &str = "CASH";

pub const DEFAULT_CURRENCY: &str = "KES";

/// Buyer details embedded in an invoice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(rename = "customerName", default)]
    pub name: String,
    /// KRA PIN of the buyer, when registered.
    #[serde(rename = "customerPin", default, skip_serializing_if = "Option::is_none")]
    pub pin: Option<String>,
    #[serde(rename = "customerAddress", default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(rename = "customerPhone", default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "customerEmail", default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Customer {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl ValueObject for Customer {}

/// Tax snapshot attached to an invoice.
///
/// `taxable_amount` and `tax_amount` are stored values written once by
/// [`crate::calculate_tax`]. They are not kept in sync with the line items;
/// the invoice's own totals are the live figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaxInfo {
    #[serde(rename = "taxCategory")]
    pub category: String,
    pub tax_rate: Decimal,
    pub tax_amount: Decimal,
    pub taxable_amount: Decimal,
}

impl Default for TaxInfo {
    fn default() -> Self {
        Self {
            category: DEFAULT_TAX_CATEGORY.to_string(),
            tax_rate: DEFAULT_TAX_RATE,
            tax_amount: Decimal::ZERO,
            taxable_amount: Decimal::ZERO,
        }
    }
}

impl ValueObject for TaxInfo {}

/// How the invoice was settled. The mode is free text (CASH, CARD, MOBILE, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentInfo {
    #[serde(rename = "paymentMode")]
    pub mode: String,
    #[serde(rename = "paymentAmount")]
    pub amount: Decimal,
    #[serde(rename = "paymentReference", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl Default for PaymentInfo {
    fn default() -> Self {
        Self {
            mode: DEFAULT_PAYMENT_MODE.to_string(),
            amount: Decimal::ZERO,
            reference: None,
        }
    }
}

impl ValueObject for PaymentInfo {}

/// One invoice line.
///
/// `line_total` and `tax_amount` are always derived from the source fields and
/// are emitted on serialization only; incoming values for them are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LineItem {
    #[serde(rename = "itemName")]
    pub name: String,
    #[serde(rename = "itemCode")]
    pub code: Option<String>,
    pub quantity: Decimal,
    #[serde(rename = "unitPrice")]
    pub unit_price: Decimal,
    /// Percent, e.g. `16` for 16% VAT.
    #[serde(rename = "taxRate")]
    pub tax_rate: Decimal,
    pub discount: Decimal,
}

impl Default for LineItem {
    fn default() -> Self {
        Self {
            name: String::new(),
            code: None,
            quantity: Decimal::ZERO,
            unit_price: Decimal::ZERO,
            tax_rate: DEFAULT_TAX_RATE,
            discount: Decimal::ZERO,
        }
    }
}

impl LineItem {
    /// Line at the standard rate with no discount.
    pub fn new(name: impl Into<String>, quantity: Decimal, unit_price: Decimal) -> Self {
        Self {
            name: name.into(),
            quantity,
            unit_price,
            ..Self::default()
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_tax_rate(mut self, tax_rate: Decimal) -> Self {
        self.tax_rate = tax_rate;
        self
    }

    pub fn with_discount(mut self, discount: Decimal) -> Self {
        self.discount = discount;
        self
    }

    /// `quantity * unit_price - discount`
    pub fn line_total(&self) -> Decimal {
        self.quantity
            .saturating_mul(self.unit_price)
            .saturating_sub(self.discount)
    }

    /// `line_total * tax_rate / 100`
    pub fn tax_amount(&self) -> Decimal {
        money::percent_of(self.line_total(), self.tax_rate)
    }
}

impl ValueObject for LineItem {}

impl Serialize for LineItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("LineItem", 8)?;
        state.serialize_field("itemName", &self.name)?;
        match &self.code {
            Some(code) => state.serialize_field("itemCode", code)?,
            None => state.skip_field("itemCode")?,
        }
        state.serialize_field("quantity", &self.quantity)?;
        state.serialize_field("unitPrice", &self.unit_price)?;
        state.serialize_field("taxRate", &self.tax_rate)?;
        state.serialize_field("discount", &self.discount)?;
        state.serialize_field("lineTotal", &self.line_total())?;
        state.serialize_field("taxAmount", &self.tax_amount())?;
        state.end()
    }
}

/// Invoice as submitted to KRA eTIMS.
///
/// Sub-total, total tax and total amount are computed on every access from
/// the current line items and never stored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InvoiceRequest {
    pub invoice_number: String,
    #[serde(deserialize_with = "datetime::deserialize")]
    pub invoice_date: NaiveDateTime,
    #[serde(deserialize_with = "null_as_default")]
    pub customer: Customer,
    #[serde(deserialize_with = "null_as_default")]
    pub line_items: Vec<LineItem>,
    #[serde(deserialize_with = "null_as_default")]
    pub tax_info: TaxInfo,
    #[serde(deserialize_with = "null_as_default")]
    pub payment_info: PaymentInfo,
    pub currency: String,
    pub remarks: Option<String>,
}

/// Explicit `null` for a nested part reads as its empty default, leaving the
/// validator to report what is missing.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Default for InvoiceRequest {
    fn default() -> Self {
        Self {
            invoice_number: String::new(),
            invoice_date: Local::now().naive_local(),
            customer: Customer::default(),
            line_items: Vec::new(),
            tax_info: TaxInfo::default(),
            payment_info: PaymentInfo::default(),
            currency: DEFAULT_CURRENCY.to_string(),
            remarks: None,
        }
    }
}

impl InvoiceRequest {
    /// Invoice dated now, with default tax snapshot, payment and currency.
    pub fn new(
        invoice_number: impl Into<String>,
        customer: Customer,
        line_items: Vec<LineItem>,
    ) -> Self {
        Self {
            invoice_number: invoice_number.into(),
            customer,
            line_items,
            ..Self::default()
        }
    }

    /// Σ line totals.
    pub fn sub_total(&self) -> Decimal {
        money::sum(self.line_items.iter().map(LineItem::line_total))
    }

    /// Σ per-line tax amounts.
    pub fn total_tax(&self) -> Decimal {
        money::sum(self.line_items.iter().map(LineItem::tax_amount))
    }

    pub fn total_amount(&self) -> Decimal {
        self.sub_total().saturating_add(self.total_tax())
    }
}

impl Serialize for InvoiceRequest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("InvoiceRequest", 11)?;
        state.serialize_field("invoiceNumber", &self.invoice_number)?;
        state.serialize_field("invoiceDate", &datetime::format(&self.invoice_date))?;
        state.serialize_field("customer", &self.customer)?;
        state.serialize_field("lineItems", &self.line_items)?;
        state.serialize_field("taxInfo", &self.tax_info)?;
        state.serialize_field("paymentInfo", &self.payment_info)?;
        state.serialize_field("currency", &self.currency)?;
        match &self.remarks {
            Some(remarks) => state.serialize_field("remarks", remarks)?,
            None => state.skip_field("remarks")?,
        }
        state.serialize_field("subTotal", &self.sub_total())?;
        state.serialize_field("totalTax", &self.total_tax())?;
        state.serialize_field("totalAmount", &self.total_amount())?;
        state.end()
    }
}
