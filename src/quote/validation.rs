//! Strict validation of quote form input.
//!
//! By default malformed numbers silently become zero. When strict mode is
//! enabled the handlers run the [`Validator`] impl first and reject the
//! request with one message per offending field.

use std::fmt;

use super::parsing::ParsedNumber;

/// Trait for validating request objects.
pub trait Validator {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

/// A single invalid field.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Form field with its row index, e.g. `cantidad[2]`
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn invalid_quantity(field: &str, value: &str) -> Self {
        Self::new(field, format!("La cantidad '{}' no es válida", value))
            .with_suggestion("Use un número entero sin decimales, por ejemplo: 3")
    }

    pub fn invalid_price(field: &str, value: &str) -> Self {
        Self::new(field, format!("El precio '{}' no es válido", value))
            .with_suggestion("Use un importe en pesos con punto decimal, por ejemplo: 1250.50")
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.field, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, ". {}", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Collection of validation errors with formatted output.
#[derive(Debug, Default)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Validación fallida: {} error(es) encontrado(s)",
            self.errors.len()
        )?;
        for (i, error) in self.errors.iter().enumerate() {
            writeln!(f, "{}. {}", i + 1, error)?;
        }
        write!(f, "Corrija los datos anteriores e intente de nuevo.")
    }
}

impl std::error::Error for ValidationErrors {}

pub fn validate_quantity<T>(parsed: &ParsedNumber<T>, index: usize, errors: &mut ValidationErrors) {
    if let ParsedNumber::Defaulted { raw } = parsed {
        errors.add(ValidationError::invalid_quantity(
            &format!("cantidad[{}]", index),
            raw,
        ));
    }
}

pub fn validate_price<T>(parsed: &ParsedNumber<T>, index: usize, errors: &mut ValidationErrors) {
    if let ParsedNumber::Defaulted { raw } = parsed {
        errors.add(ValidationError::invalid_price(
            &format!("precio[{}]", index),
            raw,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quote::parsing::{parse_quantity, parse_unit_price};

    #[test]
    fn test_valid_numbers_add_no_errors() {
        let mut errors = ValidationErrors::new();
        validate_quantity(&parse_quantity("4"), 0, &mut errors);
        validate_price(&parse_unit_price("12.50"), 0, &mut errors);
        assert!(errors.into_result().is_ok());
    }

    #[test]
    fn test_invalid_numbers_are_reported_with_index() {
        let mut errors = ValidationErrors::new();
        validate_quantity(&parse_quantity("abc"), 0, &mut errors);
        validate_price(&parse_unit_price("mucho"), 3, &mut errors);

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.errors()[0].field, "cantidad[0]");
        assert_eq!(errors.errors()[1].field, "precio[3]");
    }

    #[test]
    fn test_display_lists_every_error() {
        let mut errors = ValidationErrors::new();
        validate_quantity(&parse_quantity("x"), 1, &mut errors);

        let message = errors.to_string();
        assert!(message.contains("1 error(es)"));
        assert!(message.contains("[cantidad[1]] La cantidad 'x' no es válida"));
        assert!(message.contains("por ejemplo: 3"));
    }
}
