//! Server configuration loaded from the environment.

use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid PORT value '{0}'")]
    InvalidPort(String),
    #[error("invalid boolean for {name}: '{value}'")]
    InvalidFlag { name: &'static str, value: String },
    #[error("failed to read letterhead file {path}: {source}")]
    LetterheadIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse letterhead file {path}: {source}")]
    LetterheadParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Sender data printed at the top of every quotation, plus the terms footer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Letterhead {
    pub business_name: String,
    pub tax_id: String,
    pub address: String,
    pub terms: Vec<String>,
}

impl Default for Letterhead {
    fn default() -> Self {
        Self {
            business_name: "FELIPE FERNANDEZ LOPEZ".to_string(),
            tax_id: "FELF740411830".to_string(),
            address: concat!(
                "CALLE 20 DE NOVIEMBRE S/N, COL. BENITO JUAREZ, ",
                "MIXQUIAHUALA DE JUAREZ, HGO. C.P 42719"
            )
            .to_string(),
            terms: vec![
                "Precios netos con IVA en pesos mexicanos (MXN)".to_string(),
                "Es necesario cubrir el importe total de las piezas al contado.".to_string(),
                "Vigencia de cotización: 30 días después de su emisión.".to_string(),
                "Flete incluido al lugar de preferencia del cliente.".to_string(),
            ],
        }
    }
}

impl Letterhead {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::LetterheadIo {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| ConfigError::LetterheadParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Directory holding the Typst template, the logo and other static files
    pub static_dir: PathBuf,
    pub typst_bin: String,
    /// Extra font directory handed to Typst
    pub font_dir: Option<PathBuf>,
    /// Reject malformed quantities and prices instead of treating them as zero
    pub strict_numeric_input: bool,
    pub letterhead: Letterhead,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            static_dir: default_static_dir(),
            typst_bin: "typst".to_string(),
            font_dir: None,
            strict_numeric_input: false,
            letterhead: Letterhead::default(),
        }
    }
}

impl AppConfig {
    /// Read the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let port = match var("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw.clone()))?,
            None => defaults.port,
        };

        let strict_numeric_input = match var("STRICT_NUMERIC_INPUT") {
            Some(raw) => parse_flag("STRICT_NUMERIC_INPUT", &raw)?,
            None => defaults.strict_numeric_input,
        };

        let letterhead = match var("LETTERHEAD_FILE") {
            Some(path) => Letterhead::from_file(Path::new(&path))?,
            None => defaults.letterhead,
        };

        Ok(Self {
            host: var("HOST").unwrap_or(defaults.host),
            port,
            static_dir: var("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
            typst_bin: var("TYPST_BIN").unwrap_or(defaults.typst_bin),
            font_dir: var("FONT_DIR").map(PathBuf::from),
            strict_numeric_input,
            letterhead,
        })
    }
}

fn parse_flag(name: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            name,
            value: raw.to_string(),
        }),
    }
}

/// Get the static assets directory shipped with the crate.
pub fn default_static_dir() -> PathBuf {
    PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/static"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.typst_bin, "typst");
        assert!(config.font_dir.is_none());
        assert!(!config.strict_numeric_input);
        assert_eq!(config.letterhead, Letterhead::default());
        assert!(config.static_dir.ends_with("static"));
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "9090"),
            ("TYPST_BIN", "/usr/local/bin/typst"),
            ("FONT_DIR", "/srv/fonts"),
            ("STRICT_NUMERIC_INPUT", "true"),
        ]))
        .unwrap();

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 9090);
        assert_eq!(config.typst_bin, "/usr/local/bin/typst");
        assert_eq!(config.font_dir, Some(PathBuf::from("/srv/fonts")));
        assert!(config.strict_numeric_input);
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let config = AppConfig::from_lookup(lookup(&[("PORT", " "), ("FONT_DIR", "")])).unwrap();
        assert_eq!(config.port, 8080);
        assert!(config.font_dir.is_none());
    }

    #[test]
    fn test_invalid_port() {
        let result = AppConfig::from_lookup(lookup(&[("PORT", "ochenta")]));
        assert!(matches!(result, Err(ConfigError::InvalidPort(value)) if value == "ochenta"));
    }

    #[test]
    fn test_invalid_flag() {
        let result = AppConfig::from_lookup(lookup(&[("STRICT_NUMERIC_INPUT", "quizas")]));
        assert!(matches!(result, Err(ConfigError::InvalidFlag { .. })));
    }

    #[test]
    fn test_default_letterhead_has_four_terms() {
        let letterhead = Letterhead::default();
        assert_eq!(letterhead.terms.len(), 4);
        assert_eq!(letterhead.tax_id, "FELF740411830");
    }

    #[test]
    fn test_letterhead_from_file_with_partial_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("membrete.json");
        fs::write(
            &path,
            r#"{
                "business_name": "REFACCIONES DEL VALLE",
                "terms": ["Precios sujetos a cambio."]
            }"#,
        )
        .unwrap();

        let letterhead = Letterhead::from_file(&path).unwrap();
        assert_eq!(letterhead.business_name, "REFACCIONES DEL VALLE");
        assert_eq!(letterhead.terms, vec!["Precios sujetos a cambio."]);
        // Keys not present keep their defaults
        assert_eq!(letterhead.tax_id, Letterhead::default().tax_id);
    }

    #[test]
    fn test_letterhead_file_errors() {
        let missing = Letterhead::from_file(Path::new("/nonexistent/membrete.json"));
        assert!(matches!(missing, Err(ConfigError::LetterheadIo { .. })));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roto.json");
        fs::write(&path, "{ no es json").unwrap();
        let broken = Letterhead::from_file(&path);
        assert!(matches!(broken, Err(ConfigError::LetterheadParse { .. })));
    }
}
