//! Documents module - renderers that turn a [`Quote`](crate::quote::Quote)
//! into something a client can look at.
//!
//! - `preview` - HTML preview rendered with askama
//! - `quotation` - PDF quotation compiled from a Typst template

pub mod common;
pub mod engine;
pub mod preview;
pub mod quotation;
pub mod traits;

pub use engine::TypstRenderEngine;
pub use preview::PreviewRenderer;
pub use quotation::QuotationGenerator;
pub use traits::Renderer;

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while rendering a quote.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to load Typst template {path}: {source}")]
    TemplateIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("required resource not found: {0}")]
    MissingResource(PathBuf),
    #[error("failed to read resource {path}: {source}")]
    ResourceIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to create temporary directory: {0}")]
    TempDir(#[source] std::io::Error),
    #[error("failed to write Typst workspace file: {0}")]
    WriteTypst(#[source] std::io::Error),
    #[error("Typst CLI execution failed: {0}")]
    TypstIo(#[source] std::io::Error),
    #[error("Typst CLI exited with status {code}: {stderr}")]
    TypstExit { code: i32, stderr: String },
    #[error("failed to read generated PDF: {0}")]
    ReadPdf(#[source] std::io::Error),
    #[error("failed to render HTML preview: {0}")]
    Preview(#[from] askama::Error),
}

/// Result of a successful PDF generation.
#[derive(Debug)]
pub struct GeneratedDocument {
    pub filename: String,
    pub pdf: Vec<u8>,
}
