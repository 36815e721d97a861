//! Generator for the PDF quotation (cotización).
//!
//! The layout lives in `static/cotizacion.typ`. The generator prepends a
//! `#let datos = (...)` dictionary with the quote, the letterhead and the
//! terms, then compiles the result with [`TypstRenderEngine`].

use std::fmt::{self, Write};
use std::fs;
use std::path::Path;

use crate::config::{AppConfig, Letterhead};
use crate::quote::Quote;

use super::common::{escape_typst_string, format_currency, quote_filename};
use super::engine::{Asset, TypstRenderEngine};
use super::traits::Renderer;
use super::{DocumentError, GeneratedDocument};

pub const TEMPLATE_FILE: &str = "cotizacion.typ";
pub const LOGO_FILE: &str = "logo.png";

pub struct QuotationGenerator {
    template: String,
    logo: Vec<u8>,
    letterhead: Letterhead,
    engine: TypstRenderEngine,
}

impl QuotationGenerator {
    /// Load the template and logo from the configured static directory.
    pub fn new(config: &AppConfig) -> Result<Self, DocumentError> {
        let template_path = config.static_dir.join(TEMPLATE_FILE);
        let template =
            fs::read_to_string(&template_path).map_err(|source| DocumentError::TemplateIo {
                path: template_path.clone(),
                source,
            })?;
        let logo = read_resource(&config.static_dir.join(LOGO_FILE))?;

        Ok(Self {
            template,
            logo,
            letterhead: config.letterhead.clone(),
            engine: TypstRenderEngine::new(config.typst_bin.clone(), config.font_dir.clone()),
        })
    }

    /// Full Typst source for a quote: data preamble followed by the layout.
    pub fn render_source(&self, quote: &Quote) -> String {
        let mut source = String::with_capacity(self.template.len() + 1024);
        // Writing into a String never fails.
        let _ = write_data_preamble(&mut source, quote, &self.letterhead);
        source.push('\n');
        source.push_str(&self.template);
        source
    }
}

impl Renderer for QuotationGenerator {
    type Output = GeneratedDocument;

    fn render(&self, quote: &Quote) -> Result<GeneratedDocument, DocumentError> {
        let source = self.render_source(quote);
        let assets = [Asset {
            filename: LOGO_FILE,
            data: &self.logo,
        }];

        let pdf = self.engine.render(TEMPLATE_FILE, &source, &assets)?;

        Ok(GeneratedDocument {
            filename: quote_filename(quote.subject()),
            pdf,
        })
    }
}

fn read_resource(path: &Path) -> Result<Vec<u8>, DocumentError> {
    if !path.is_file() {
        return Err(DocumentError::MissingResource(path.to_path_buf()));
    }
    fs::read(path).map_err(|source| DocumentError::ResourceIo {
        path: path.to_path_buf(),
        source,
    })
}

fn typst_str(value: &str) -> String {
    format!("\"{}\"", escape_typst_string(value))
}

fn write_data_preamble(out: &mut String, quote: &Quote, letterhead: &Letterhead) -> fmt::Result {
    writeln!(out, "#let datos = (")?;
    writeln!(out, "  emisor: (")?;
    writeln!(out, "    nombre: {},", typst_str(&letterhead.business_name))?;
    writeln!(out, "    rfc: {},", typst_str(&letterhead.tax_id))?;
    writeln!(out, "    direccion: {},", typst_str(&letterhead.address))?;
    writeln!(out, "  ),")?;
    writeln!(out, "  logo: {},", typst_str(LOGO_FILE))?;
    writeln!(out, "  fecha: {},", typst_str(quote.date()))?;
    writeln!(out, "  destinatario: {},", typst_str(quote.recipient()))?;
    writeln!(out, "  concepto: {},", typst_str(quote.subject()))?;
    writeln!(out, "  iva: {},", quote.tax_applied())?;

    writeln!(out, "  partidas: (")?;
    for item in quote.items() {
        writeln!(
            out,
            "    (cantidad: {}, parte: {}, descripcion: {}, unitario: {}, total: {}),",
            typst_str(&item.quantity().to_string()),
            typst_str(item.part_number()),
            typst_str(item.description()),
            typst_str(&format_currency(item.adjusted_unit_price())),
            typst_str(&format_currency(item.line_total())),
        )?;
    }
    writeln!(out, "  ),")?;
    writeln!(out, "  total: {},", typst_str(&format_currency(quote.grand_total())))?;

    writeln!(out, "  condiciones: (")?;
    for term in &letterhead.terms {
        writeln!(out, "    {},", typst_str(term))?;
    }
    writeln!(out, "  ),")?;
    writeln!(out, ")")
}
