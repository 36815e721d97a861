//! Decoding of the quote form into line items and a [`Quote`].
//!
//! The form sends four repeated field groups (`cantidad`, `parte`,
//! `descripcion`, `precio`), one entry per row. Rows are matched by index;
//! when the groups differ in length only the first `min(len)` rows are kept.

use serde::Deserialize;
use utoipa::ToSchema;

use super::models::{LineItem, Quote, QuoteHeader};
use super::parsing::{parse_quantity, parse_tax_flag, parse_unit_price};
use super::validation::{validate_price, validate_quantity, ValidationErrors, Validator};

/// Raw form values, in submission order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuoteForm {
    pub fecha: String,
    pub destinatario: String,
    pub concepto: String,
    pub iva: Option<String>,
    pub cantidad: Vec<String>,
    pub parte: Vec<String>,
    pub descripcion: Vec<String>,
    pub precio: Vec<String>,
}

/// OpenAPI description of the form body accepted by `/preview` and `/download`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct QuoteFormSchema {
    #[schema(example = "14 de octubre de 2026")]
    pub fecha: String,
    #[schema(example = "Refaccionaria del Valle")]
    pub destinatario: String,
    #[schema(example = "Refacciones para bomba de agua")]
    pub concepto: String,
    /// `on` or `true` to add 16% IVA to every unit price
    #[schema(example = "on")]
    pub iva: Option<String>,
    #[schema(example = json!(["2", "1"]))]
    pub cantidad: Vec<String>,
    #[schema(example = json!(["BX-100", "RT-7"]))]
    pub parte: Vec<String>,
    #[schema(example = json!(["Balero sellado", "Retén de flecha"]))]
    pub descripcion: Vec<String>,
    #[schema(example = json!(["100", "99.99"]))]
    pub precio: Vec<String>,
}

impl QuoteForm {
    /// Build the form from decoded `application/x-www-form-urlencoded` pairs.
    ///
    /// Scalar fields take their first occurrence; unknown fields are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut form = Self::default();
        let mut fecha: Option<String> = None;
        let mut destinatario: Option<String> = None;
        let mut concepto: Option<String> = None;

        for (key, value) in pairs {
            match key.as_ref() {
                "fecha" => {
                    fecha.get_or_insert_with(|| value.into());
                }
                "destinatario" => {
                    destinatario.get_or_insert_with(|| value.into());
                }
                "concepto" => {
                    concepto.get_or_insert_with(|| value.into());
                }
                "iva" => {
                    form.iva.get_or_insert_with(|| value.into());
                }
                "cantidad" => form.cantidad.push(value.into()),
                "parte" => form.parte.push(value.into()),
                "descripcion" => form.descripcion.push(value.into()),
                "precio" => form.precio.push(value.into()),
                _ => {}
            }
        }

        form.fecha = fecha.unwrap_or_default();
        form.destinatario = destinatario.unwrap_or_default();
        form.concepto = concepto.unwrap_or_default();
        form
    }

    pub fn tax_applied(&self) -> bool {
        parse_tax_flag(self.iva.as_deref())
    }

    /// Number of complete rows, i.e. the length of the shortest field group.
    pub fn line_count(&self) -> usize {
        [
            self.cantidad.len(),
            self.parte.len(),
            self.descripcion.len(),
            self.precio.len(),
        ]
        .into_iter()
        .min()
        .unwrap_or(0)
    }

    fn has_mismatched_groups(&self) -> bool {
        let count = self.cantidad.len();
        self.parte.len() != count || self.descripcion.len() != count || self.precio.len() != count
    }

    pub fn header(&self) -> QuoteHeader {
        QuoteHeader {
            date: self.fecha.clone(),
            recipient: self.destinatario.clone(),
            subject: self.concepto.clone(),
            tax_applied: self.tax_applied(),
        }
    }

    pub fn line_items(&self) -> Vec<LineItem> {
        if self.has_mismatched_groups() {
            log::warn!(
                "line item groups differ in length \
                 (cantidad={}, parte={}, descripcion={}, precio={}); keeping {} rows",
                self.cantidad.len(),
                self.parte.len(),
                self.descripcion.len(),
                self.precio.len(),
                self.line_count()
            );
        }

        parse_line_items(
            &self.cantidad,
            &self.parte,
            &self.descripcion,
            &self.precio,
            self.tax_applied(),
        )
    }

    pub fn into_quote(self) -> Quote {
        let items = self.line_items();
        Quote::aggregate(self.header(), items)
    }
}

impl Validator for QuoteForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        for index in 0..self.line_count() {
            validate_quantity(&parse_quantity(&self.cantidad[index]), index, &mut errors);
            validate_price(&parse_unit_price(&self.precio[index]), index, &mut errors);
        }

        errors.into_result()
    }
}

/// Turn index-aligned raw row values into line items.
///
/// Malformed quantities and prices become zero. The result has as many
/// items as the shortest input slice.
pub fn parse_line_items<S: AsRef<str>>(
    quantities: &[S],
    part_numbers: &[S],
    descriptions: &[S],
    unit_prices: &[S],
    apply_tax: bool,
) -> Vec<LineItem> {
    quantities
        .iter()
        .zip(part_numbers)
        .zip(descriptions)
        .zip(unit_prices)
        .map(|(((quantity, part_number), description), unit_price)| {
            let quantity = parse_quantity(quantity.as_ref());
            let unit_price = parse_unit_price(unit_price.as_ref());
            if quantity.is_defaulted() || unit_price.is_defaulted() {
                log::debug!(
                    "malformed numeric input defaulted to zero: quantity={:?} price={:?}",
                    quantity,
                    unit_price
                );
            }

            LineItem::new(
                quantity.value(),
                part_number.as_ref(),
                description.as_ref(),
                unit_price.value(),
                apply_tax,
            )
        })
        .collect()
}
