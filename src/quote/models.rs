use rust_decimal::Decimal;

use super::parsing::adjusted_unit_price;

/// One row of the quotation table.
///
/// The adjusted unit price and the line total are derived in [`LineItem::new`]
/// and cannot be set independently.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    quantity: u32,
    part_number: String,
    description: String,
    unit_price: Decimal,
    adjusted_unit_price: Decimal,
    line_total: Decimal,
}

impl LineItem {
    pub fn new(
        quantity: u32,
        part_number: impl Into<String>,
        description: impl Into<String>,
        unit_price: Decimal,
        apply_tax: bool,
    ) -> Self {
        let adjusted_unit_price = adjusted_unit_price(unit_price, apply_tax);
        Self {
            quantity,
            part_number: part_number.into(),
            description: description.into(),
            unit_price,
            adjusted_unit_price,
            line_total: Decimal::from(quantity) * adjusted_unit_price,
        }
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn part_number(&self) -> &str {
        &self.part_number
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Price as entered on the form, before tax.
    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    pub fn adjusted_unit_price(&self) -> Decimal {
        self.adjusted_unit_price
    }

    pub fn line_total(&self) -> Decimal {
        self.line_total
    }
}

/// Header fields of a quote as they arrive from the form.
#[derive(Debug, Clone, Default)]
pub struct QuoteHeader {
    pub date: String,
    pub recipient: String,
    pub subject: String,
    pub tax_applied: bool,
}

/// Normalized quote handed to the renderers.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    date: String,
    recipient: String,
    subject: String,
    tax_applied: bool,
    items: Vec<LineItem>,
}

impl Quote {
    /// Combine the header with parsed line items. Display fields are
    /// upper-cased here so every renderer shows them the same way.
    pub fn aggregate(header: QuoteHeader, items: Vec<LineItem>) -> Self {
        Self {
            date: header.date.to_uppercase(),
            recipient: header.recipient.to_uppercase(),
            subject: header.subject.to_uppercase(),
            tax_applied: header.tax_applied,
            items,
        }
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn tax_applied(&self) -> bool {
        self.tax_applied
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn grand_total(&self) -> Decimal {
        self.items.iter().map(LineItem::line_total).sum()
    }
}
