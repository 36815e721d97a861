//! Traits shared by the quote renderers.

use crate::quote::Quote;

use super::DocumentError;

/// A sink that consumes a normalized quote.
pub trait Renderer {
    type Output;

    fn render(&self, quote: &Quote) -> Result<Self::Output, DocumentError>;
}
