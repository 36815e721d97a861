//! Typst rendering engine.
//!
//! Handles the low-level details of writing Typst source and its assets to a
//! temporary directory, invoking the compiler, and reading back the PDF.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::{tempdir, TempDir};

use super::DocumentError;

/// A file the Typst source refers to by name, e.g. the letterhead logo.
#[derive(Debug, Clone, Copy)]
pub struct Asset<'a> {
    pub filename: &'a str,
    pub data: &'a [u8],
}

/// Stateless engine for rendering Typst sources to PDF with the `typst` CLI.
#[derive(Debug, Clone)]
pub struct TypstRenderEngine {
    typst_bin: String,
    font_dir: Option<PathBuf>,
}

impl TypstRenderEngine {
    pub fn new(typst_bin: impl Into<String>, font_dir: Option<PathBuf>) -> Self {
        Self {
            typst_bin: typst_bin.into(),
            font_dir,
        }
    }

    /// Render a Typst string to PDF bytes.
    ///
    /// # Arguments
    /// * `source_filename` - Name the source is written under inside the temp dir.
    /// * `typst_source` - The complete Typst source code.
    /// * `assets` - Files copied next to the source before compiling.
    pub fn render(
        &self,
        source_filename: &str,
        typst_source: &str,
        assets: &[Asset<'_>],
    ) -> Result<Vec<u8>, DocumentError> {
        if let Some(font_dir) = &self.font_dir {
            if !font_dir.is_dir() {
                return Err(DocumentError::MissingResource(font_dir.clone()));
            }
        }

        let temp_dir = tempdir().map_err(DocumentError::TempDir)?;

        fs::write(temp_dir.path().join(source_filename), typst_source)
            .map_err(DocumentError::WriteTypst)?;
        for asset in assets {
            fs::write(temp_dir.path().join(asset.filename), asset.data)
                .map_err(DocumentError::WriteTypst)?;
        }

        let output_filename = format!("{}.pdf", source_filename.trim_end_matches(".typ"));
        self.compile(&temp_dir, source_filename, &output_filename)
    }

    fn compile(
        &self,
        temp_dir: &TempDir,
        source_filename: &str,
        output_filename: &str,
    ) -> Result<Vec<u8>, DocumentError> {
        let source_path = temp_dir.path().join(source_filename);
        let output_path = temp_dir.path().join(output_filename);

        let mut command = Command::new(&self.typst_bin);
        command.arg("compile");
        if let Some(font_dir) = &self.font_dir {
            command.arg("--font-path").arg(font_dir);
        }
        command
            .arg(&source_path)
            .arg(&output_path)
            .current_dir(temp_dir.path());

        log::debug!("running {:?}", command);
        let output = command.output().map_err(DocumentError::TypstIo)?;

        if !output.status.success() {
            return Err(DocumentError::TypstExit {
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        read_pdf(&output_path)
    }
}

fn read_pdf(path: &Path) -> Result<Vec<u8>, DocumentError> {
    fs::read(path).map_err(DocumentError::ReadPdf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_font_dir_is_reported() {
        let engine = TypstRenderEngine::new("typst", Some(PathBuf::from("/nonexistent/fonts")));
        let result = engine.render("cotizacion.typ", "Hola", &[]);

        assert!(matches!(
            result,
            Err(DocumentError::MissingResource(path)) if path.ends_with("fonts")
        ));
    }

    #[test]
    fn test_missing_binary_is_an_io_error() {
        let engine = TypstRenderEngine::new("typst-binary-that-does-not-exist", None);
        let result = engine.render("cotizacion.typ", "Hola", &[]);

        assert!(matches!(result, Err(DocumentError::TypstIo(_))));
    }
}
