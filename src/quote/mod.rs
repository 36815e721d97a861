//! Quote module - turns the submitted form into a normalized [`Quote`].
//!
//! - `parsing` - numeric and flag parsing, IVA rule
//! - `form` - form decoding and the line item parser
//! - `models` - `LineItem` and `Quote` value objects
//! - `validation` - strict-mode checks for numeric fields
//! - `handlers` - HTTP endpoints and route table

pub mod form;
pub mod handlers;
pub mod models;
pub mod parsing;
pub mod validation;

pub use form::{parse_line_items, QuoteForm};
pub use handlers::config;
pub use models::{LineItem, Quote, QuoteHeader};
pub use parsing::ParsedNumber;
