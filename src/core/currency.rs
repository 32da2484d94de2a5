//! Base-currency conversion.
//!
//! Every document carries its own conversion triple `(currency, fxBase,
//! fxRate)` frozen at creation time, where `fxRate` is how many units of
//! `currency` equal one unit of `fxBase`. Converting to the base therefore
//! divides by the rate. Missing or non-positive rates degrade to a
//! passthrough of the original amount so that a gap in FX data can never
//! block an aggregation.

use tracing::debug;

/// Currency assumed when a document carries no code at all.
pub const DEFAULT_BASE: &str = "USD";

/// Uppercases a currency code for comparison, defaulting blanks to USD.
/// Codes are not validated against an ISO-4217 table; any string is
/// accepted.
pub fn normalize(code: &str) -> String {
    let trimmed = code.trim();
    if trimmed.is_empty() {
        DEFAULT_BASE.to_string()
    } else {
        trimmed.to_ascii_uppercase()
    }
}

/// Converts `amount` from `currency` into `fx_base`.
///
/// Fallback ladder, in order:
/// 1. same currency (case-insensitive, blank means USD): identity
/// 2. positive finite rate: `amount / fx_rate`
/// 3. anything else: the amount passes through unconverted
///
/// Never returns NaN or infinity for a finite `amount`.
pub fn to_base(amount: f64, currency: &str, fx_base: &str, fx_rate: f64) -> f64 {
    if !amount.is_finite() {
        return 0.0;
    }
    let from = normalize(currency);
    let to = normalize(fx_base);
    if from == to {
        return amount;
    }
    if fx_rate.is_finite() && fx_rate > 0.0 {
        return amount / fx_rate;
    }
    debug!(%from, %to, fx_rate, "missing FX rate, passing amount through unconverted");
    amount
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_when_currencies_match() {
        assert_eq!(to_base(123.45, "USD", "USD", 0.92), 123.45);
        // Rate is irrelevant for matching currencies.
        assert_eq!(to_base(123.45, "usd", "USD", 0.0), 123.45);
        assert_eq!(to_base(123.45, "eur", "EUR", -3.0), 123.45);
    }

    #[test]
    fn test_blank_codes_default_to_usd() {
        assert_eq!(to_base(50.0, "", "USD", 2.0), 50.0);
        assert_eq!(to_base(50.0, "usd", "", 2.0), 50.0);
        assert_eq!(to_base(50.0, "", "", 0.0), 50.0);
    }

    #[test]
    fn test_divides_by_positive_rate() {
        assert_eq!(to_base(100.0, "EUR", "USD", 0.92), 100.0 / 0.92);
        assert_eq!(to_base(200.0, "EUR", "USD", 0.9), 200.0 / 0.9);
    }

    #[test]
    fn test_non_positive_rate_passes_through() {
        assert_eq!(to_base(75.0, "EUR", "USD", 0.0), 75.0);
        assert_eq!(to_base(75.0, "EUR", "USD", -1.0), 75.0);
    }

    #[test]
    fn test_never_propagates_nan_or_infinity() {
        assert_eq!(to_base(75.0, "EUR", "USD", f64::NAN), 75.0);
        assert_eq!(to_base(75.0, "EUR", "USD", f64::INFINITY), 75.0);
        assert_eq!(to_base(f64::NAN, "EUR", "USD", 0.9), 0.0);
        // Deterministic: repeated calls with the same inputs agree bit-for-bit.
        let a = to_base(75.0, "EUR", "USD", 0.0);
        let b = to_base(75.0, "EUR", "USD", 0.0);
        assert_eq!(a.to_bits(), b.to_bits());
    }
}
