//! HTML preview of a quote, rendered from `templates/preview.html`.

use askama::Template;

use crate::quote::Quote;

use super::common::format_currency;
use super::traits::Renderer;
use super::DocumentError;

struct PreviewRow<'a> {
    quantity: u32,
    part_number: &'a str,
    description: &'a str,
    unit_price: String,
    line_total: String,
    /// Pre-tax price re-posted to `/download`
    raw_unit_price: String,
}

#[derive(Template)]
#[template(path = "preview.html")]
struct PreviewTemplate<'a> {
    date: &'a str,
    recipient: &'a str,
    subject: &'a str,
    tax_applied: bool,
    rows: Vec<PreviewRow<'a>>,
    grand_total: String,
}

/// Renders a quote as a standalone HTML page with a button that requests
/// the PDF for the same data.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreviewRenderer;

impl Renderer for PreviewRenderer {
    type Output = String;

    fn render(&self, quote: &Quote) -> Result<String, DocumentError> {
        let rows = quote
            .items()
            .iter()
            .map(|item| PreviewRow {
                quantity: item.quantity(),
                part_number: item.part_number(),
                description: item.description(),
                unit_price: format_currency(item.adjusted_unit_price()),
                line_total: format_currency(item.line_total()),
                raw_unit_price: item.unit_price().to_string(),
            })
            .collect();

        let page = PreviewTemplate {
            date: quote.date(),
            recipient: quote.recipient(),
            subject: quote.subject(),
            tax_applied: quote.tax_applied(),
            rows,
            grand_total: format_currency(quote.grand_total()),
        };

        Ok(page.render()?)
    }
}
