//! Line-item pricing for invoices and quotes.

use crate::core::currency;
use crate::core::model::LineItem;

/// The computed pricing of a single invoice or quote, in its own currency.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PricingTotals {
    pub subtotal: f64,
    pub tax_amount: f64,
    pub discount: f64,
    pub total: f64,
}

/// Base-currency mirrors of the four pricing quantities, converted
/// independently and frozen into the record at creation time.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BasePricing {
    pub subtotal_base: f64,
    pub tax_amount_base: f64,
    pub discount_base: f64,
    pub total_base: f64,
}

impl PricingTotals {
    /// Prices a set of line items.
    ///
    /// `subtotal = Σ qty × unit_price`, `tax_amount = subtotal × tax_rate/100`,
    /// `total = subtotal + tax_amount - discount`. Malformed qty or unit
    /// price has already been coerced to 0 at the parsing boundary. The
    /// total is not clamped: a discount larger than subtotal plus tax
    /// yields a negative total.
    pub fn from_items(items: &[LineItem], tax_rate: f64, discount: f64) -> Self {
        let subtotal: f64 = items.iter().map(|i| i.qty * i.unit_price).sum();
        let tax_rate = if tax_rate.is_finite() { tax_rate } else { 0.0 };
        let discount = if discount.is_finite() { discount } else { 0.0 };
        let tax_amount = subtotal * (tax_rate / 100.0);
        PricingTotals {
            subtotal,
            tax_amount,
            discount,
            total: subtotal + tax_amount - discount,
        }
    }

    /// Converts each of the four quantities to the base currency
    /// independently, using the record's conversion triple.
    pub fn to_base(&self, currency: &str, fx_base: &str, fx_rate: f64) -> BasePricing {
        BasePricing {
            subtotal_base: currency::to_base(self.subtotal, currency, fx_base, fx_rate),
            tax_amount_base: currency::to_base(self.tax_amount, currency, fx_base, fx_rate),
            discount_base: currency::to_base(self.discount, currency, fx_base, fx_rate),
            total_base: currency::to_base(self.total, currency, fx_base, fx_rate),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(qty: f64, unit_price: f64) -> LineItem {
        LineItem {
            description: String::new(),
            qty,
            unit_price,
        }
    }

    #[test]
    fn test_invoice_total_invariant() {
        let items = [item(2.0, 50.0), item(1.0, 25.0)];
        let t = PricingTotals::from_items(&items, 10.0, 5.0);
        assert_eq!(t.subtotal, 125.0);
        assert_eq!(t.tax_amount, 12.5);
        assert_eq!(t.total, 132.5);
        assert_eq!(t.total, t.subtotal + t.tax_amount - t.discount);
    }

    #[test]
    fn test_defaults_when_tax_and_discount_absent() {
        let items = [item(3.0, 10.0)];
        let t = PricingTotals::from_items(&items, 0.0, 0.0);
        assert_eq!(t.subtotal, 30.0);
        assert_eq!(t.tax_amount, 0.0);
        assert_eq!(t.total, 30.0);
    }

    #[test]
    fn test_empty_items_price_to_zero() {
        let t = PricingTotals::from_items(&[], 18.0, 0.0);
        assert_eq!(t.subtotal, 0.0);
        assert_eq!(t.tax_amount, 0.0);
        assert_eq!(t.total, 0.0);
    }

    #[test]
    fn test_negative_total_is_not_clamped() {
        let items = [item(1.0, 10.0)];
        let t = PricingTotals::from_items(&items, 0.0, 25.0);
        assert_eq!(t.total, -15.0);
    }

    #[test]
    fn test_base_mirrors_convert_each_quantity() {
        let items = [item(2.0, 50.0), item(1.0, 25.0)];
        let t = PricingTotals::from_items(&items, 10.0, 5.0);
        let b = t.to_base("EUR", "USD", 0.92);
        assert_eq!(b.subtotal_base, 125.0 / 0.92);
        assert_eq!(b.tax_amount_base, 12.5 / 0.92);
        assert_eq!(b.discount_base, 5.0 / 0.92);
        assert_eq!(b.total_base, 132.5 / 0.92);
    }

    #[test]
    fn test_base_mirrors_pass_through_without_rate() {
        let t = PricingTotals::from_items(&[item(1.0, 100.0)], 0.0, 0.0);
        let b = t.to_base("EUR", "USD", 0.0);
        assert_eq!(b.total_base, 100.0);
    }
}
