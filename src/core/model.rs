//! Document shapes as stored by the ProFlow backend.
//!
//! Records arrive as loosely-typed JSON: numeric fields may be numbers,
//! numeric strings, null, or missing entirely, and currency codes come in
//! inconsistent casing. All of that is coerced once here, at the boundary,
//! so the rest of the engine works with defaulted, well-typed values.

use crate::core::currency;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

mod de {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub(super) fn coerce_f64(v: &Value) -> Option<f64> {
        match v {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
        .filter(|f| f.is_finite())
    }

    /// Numbers, numeric strings, null, or absent; anything else is 0.
    pub(super) fn lenient_f64<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        let v = Option::<Value>::deserialize(d)?;
        Ok(v.as_ref().and_then(coerce_f64).unwrap_or(0.0))
    }

    /// Like `lenient_f64`, but absence stays observable.
    pub(super) fn lenient_opt_f64<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<f64>, D::Error> {
        let v = Option::<Value>::deserialize(d)?;
        Ok(v.as_ref().and_then(coerce_f64))
    }

    pub(super) fn value_as_str(v: &Option<Value>) -> &str {
        v.as_ref().and_then(Value::as_str).unwrap_or("")
    }
}

/// Payment state of an invoice. Anything that is not literally "paid"
/// (any casing) counts as unpaid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InvoiceStatus {
    #[default]
    Unpaid,
    Paid,
}

impl<'d> Deserialize<'d> for InvoiceStatus {
    fn deserialize<D: serde::Deserializer<'d>>(d: D) -> Result<Self, D::Error> {
        let v = Option::<serde_json::Value>::deserialize(d)?;
        if de::value_as_str(&v).eq_ignore_ascii_case("paid") {
            Ok(InvoiceStatus::Paid)
        } else {
            Ok(InvoiceStatus::Unpaid)
        }
    }
}

impl Serialize for InvoiceStatus {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(match self {
            InvoiceStatus::Unpaid => "unpaid",
            InvoiceStatus::Paid => "paid",
        })
    }
}

impl Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvoiceStatus::Unpaid => write!(f, "unpaid"),
            InvoiceStatus::Paid => write!(f, "paid"),
        }
    }
}

/// Lifecycle state of a quote. Conversion to an invoice is one-way.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QuoteStatus {
    #[default]
    Draft,
    Converted,
}

impl<'d> Deserialize<'d> for QuoteStatus {
    fn deserialize<D: serde::Deserializer<'d>>(d: D) -> Result<Self, D::Error> {
        let v = Option::<serde_json::Value>::deserialize(d)?;
        if de::value_as_str(&v).eq_ignore_ascii_case("converted") {
            Ok(QuoteStatus::Converted)
        } else {
            Ok(QuoteStatus::Draft)
        }
    }
}

impl Serialize for QuoteStatus {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(match self {
            QuoteStatus::Draft => "draft",
            QuoteStatus::Converted => "converted",
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LineItem {
    pub description: String,
    #[serde(deserialize_with = "de::lenient_f64")]
    pub qty: f64,
    #[serde(deserialize_with = "de::lenient_f64")]
    pub unit_price: f64,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Expense {
    pub id: String,
    pub project_id: String,
    #[serde(deserialize_with = "de::lenient_f64")]
    pub amount: f64,
    pub currency: String,
    pub fx_base: String,
    #[serde(deserialize_with = "de::lenient_f64")]
    pub fx_rate: f64,
    #[serde(deserialize_with = "de::lenient_opt_f64")]
    pub amount_base: Option<f64>,
    pub category: String,
    pub date: String,
    pub note: String,
}

impl Expense {
    /// Amount in the base currency. A stored `amountBase` is an
    /// authoritative snapshot from creation time and wins over
    /// recomputation.
    pub fn base_amount(&self) -> f64 {
        self.amount_base
            .filter(|a| a.is_finite())
            .unwrap_or_else(|| {
                currency::to_base(self.amount, &self.currency, &self.fx_base, self.fx_rate)
            })
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Invoice {
    pub id: String,
    pub project_id: String,
    pub client: String,
    pub currency: String,
    pub fx_base: String,
    #[serde(deserialize_with = "de::lenient_f64")]
    pub fx_rate: f64,
    pub items: Vec<LineItem>,
    #[serde(deserialize_with = "de::lenient_f64")]
    pub subtotal: f64,
    #[serde(deserialize_with = "de::lenient_f64")]
    pub tax_rate: f64,
    #[serde(deserialize_with = "de::lenient_f64")]
    pub tax_amount: f64,
    #[serde(deserialize_with = "de::lenient_f64")]
    pub discount: f64,
    #[serde(deserialize_with = "de::lenient_f64")]
    pub total: f64,
    #[serde(deserialize_with = "de::lenient_opt_f64")]
    pub subtotal_base: Option<f64>,
    #[serde(deserialize_with = "de::lenient_opt_f64")]
    pub tax_amount_base: Option<f64>,
    #[serde(deserialize_with = "de::lenient_opt_f64")]
    pub discount_base: Option<f64>,
    #[serde(deserialize_with = "de::lenient_opt_f64")]
    pub total_base: Option<f64>,
    pub status: InvoiceStatus,
    pub due_date: String,
    pub created_at: String,
}

impl Invoice {
    pub fn is_paid(&self) -> bool {
        self.status == InvoiceStatus::Paid
    }

    /// Invoice total in the base currency, preferring the frozen
    /// `totalBase` snapshot when present.
    pub fn base_total(&self) -> f64 {
        self.total_base
            .filter(|t| t.is_finite())
            .unwrap_or_else(|| {
                currency::to_base(self.total, &self.currency, &self.fx_base, self.fx_rate)
            })
    }

    /// The customer name to group this invoice under, falling back to the
    /// owning project's customer when the free-text `client` field is blank.
    pub fn customer_key<'a>(&'a self, project_customer: &'a str) -> &'a str {
        let client = self.client.trim();
        if client.is_empty() {
            project_customer
        } else {
            client
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Quote {
    pub id: String,
    pub project_id: String,
    pub client: String,
    pub currency: String,
    pub fx_base: String,
    #[serde(deserialize_with = "de::lenient_f64")]
    pub fx_rate: f64,
    pub items: Vec<LineItem>,
    #[serde(deserialize_with = "de::lenient_f64")]
    pub subtotal: f64,
    #[serde(deserialize_with = "de::lenient_f64")]
    pub tax_rate: f64,
    #[serde(deserialize_with = "de::lenient_f64")]
    pub tax_amount: f64,
    #[serde(deserialize_with = "de::lenient_f64")]
    pub discount: f64,
    #[serde(deserialize_with = "de::lenient_f64")]
    pub total: f64,
    #[serde(deserialize_with = "de::lenient_opt_f64")]
    pub subtotal_base: Option<f64>,
    #[serde(deserialize_with = "de::lenient_opt_f64")]
    pub tax_amount_base: Option<f64>,
    #[serde(deserialize_with = "de::lenient_opt_f64")]
    pub discount_base: Option<f64>,
    #[serde(deserialize_with = "de::lenient_opt_f64")]
    pub total_base: Option<f64>,
    pub status: QuoteStatus,
    pub converted_to_invoice_id: Option<String>,
}

impl Quote {
    /// Converts this quote into an invoice, carrying the pricing fields
    /// (including the frozen base mirrors) across unchanged.
    ///
    /// Conversion is one-way: once a quote is converted the action is
    /// refused and `None` is returned. The returned `Quote` is the updated
    /// record linking back to the new invoice.
    pub fn convert(&self, invoice_id: &str, created_at: &str) -> Option<(Invoice, Quote)> {
        if self.status == QuoteStatus::Converted {
            return None;
        }
        let invoice = Invoice {
            id: invoice_id.to_string(),
            project_id: self.project_id.clone(),
            client: self.client.clone(),
            currency: self.currency.clone(),
            fx_base: self.fx_base.clone(),
            fx_rate: self.fx_rate,
            items: self.items.clone(),
            subtotal: self.subtotal,
            tax_rate: self.tax_rate,
            tax_amount: self.tax_amount,
            discount: self.discount,
            total: self.total,
            subtotal_base: self.subtotal_base,
            tax_amount_base: self.tax_amount_base,
            discount_base: self.discount_base,
            total_base: self.total_base,
            status: InvoiceStatus::Unpaid,
            due_date: String::new(),
            created_at: created_at.to_string(),
        };
        let converted = Quote {
            status: QuoteStatus::Converted,
            converted_to_invoice_id: Some(invoice_id.to_string()),
            ..self.clone()
        };
        Some((invoice, converted))
    }
}

/// A project as listed by the backing store.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectRef {
    pub id: String,
    pub name: String,
    pub customer: String,
}

/// A full point-in-time listing of a project's finance documents.
///
/// The store pushes complete collections, never deltas: every snapshot
/// replaces all prior knowledge of the project.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectSnapshot {
    pub expenses: Vec<Expense>,
    pub invoices: Vec<Invoice>,
    pub quotes: Vec<Quote>,
}
