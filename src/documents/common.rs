//! Common utilities for document rendering.
//!
//! Shared helpers for money formatting, Typst escaping, and file naming.

use rust_decimal::{Decimal, RoundingStrategy};

/// Format an amount as whole pesos, e.g. `$116`.
///
/// Cents are rounded away at display time (half to even), the same way a
/// `%.0f` printf conversion does.
pub fn format_currency(amount: Decimal) -> String {
    let whole = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven);
    format!("${}", whole)
}

/// Escape special characters for Typst strings.
pub fn escape_typst_string(value: &str) -> String {
    value
        .replace('\\', r"\\")
        .replace('"', r#"\""#)
        .replace('\r', "")
        .replace('\n', r"\n")
}

/// Sanitize a string for use in filenames.
pub fn sanitize_filename(name: &str, fallback: &str) -> String {
    let mut result = String::new();
    let mut last_dash = false;

    for ch in name.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            result.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if (ch.is_whitespace() || ch == '-' || ch == '_')
            && !last_dash
            && !result.is_empty()
        {
            result.push('-');
            last_dash = true;
        }
    }

    let result = result.trim_matches('-');
    if result.is_empty() {
        return fallback.to_string();
    }

    result.to_string()
}

/// Download name for a quote: `cotizacion.pdf`, or `cotizacion-<subject>.pdf`
/// when the subject has something filename-safe in it.
pub fn quote_filename(subject: &str) -> String {
    let slug = sanitize_filename(subject, "");
    if slug.is_empty() {
        "cotizacion.pdf".to_string()
    } else {
        format!("cotizacion-{}.pdf", slug)
    }
}
