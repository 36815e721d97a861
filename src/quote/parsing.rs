//! Parsing of raw form values into numbers and flags.
//!
//! Numeric parsing never fails outright: a value that cannot be read comes
//! back as [`ParsedNumber::Defaulted`] carrying the raw input, so callers can
//! either fall back to zero or report the field as invalid.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Unit prices above this amount are treated as malformed input.
pub const MAX_UNIT_PRICE: i64 = 1_000_000_000_000;

/// VAT (IVA) markup factor, 16%.
pub fn iva_rate() -> Decimal {
    Decimal::new(116, 2)
}

/// Result of parsing one numeric form field.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedNumber<T> {
    Valid(T),
    Defaulted { raw: String },
}

impl<T: Copy + Default> ParsedNumber<T> {
    /// The parsed number, or `T::default()` (zero) if it could not be parsed.
    pub fn value(&self) -> T {
        match self {
            Self::Valid(value) => *value,
            Self::Defaulted { .. } => T::default(),
        }
    }

    pub fn is_defaulted(&self) -> bool {
        matches!(self, Self::Defaulted { .. })
    }
}

fn defaulted<T>(raw: &str) -> ParsedNumber<T> {
    ParsedNumber::Defaulted {
        raw: raw.to_string(),
    }
}

/// Parse a quantity as a non-negative base-10 integer.
pub fn parse_quantity(raw: &str) -> ParsedNumber<u32> {
    match raw.trim().parse::<u32>() {
        Ok(value) => ParsedNumber::Valid(value),
        Err(_) => defaulted(raw),
    }
}

/// Parse a unit price as a non-negative decimal amount in pesos.
pub fn parse_unit_price(raw: &str) -> ParsedNumber<Decimal> {
    match Decimal::from_str(raw.trim()) {
        Ok(value) if value >= Decimal::ZERO && value <= Decimal::from(MAX_UNIT_PRICE) => {
            ParsedNumber::Valid(value)
        }
        _ => defaulted(raw),
    }
}

/// The `iva` checkbox is set when it was sent as `on` (browser checkbox) or
/// `true` (hidden field re-posted from the preview page).
pub fn parse_tax_flag(raw: Option<&str>) -> bool {
    raw.map(str::trim)
        .map(|value| value.eq_ignore_ascii_case("on") || value.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// Apply the VAT markup, truncating to whole pesos. Without tax the price is
/// returned untouched, cents included.
pub fn adjusted_unit_price(unit_price: Decimal, apply_tax: bool) -> Decimal {
    if apply_tax {
        (unit_price * iva_rate()).floor()
    } else {
        unit_price
    }
}
