#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use cotizador_server::AppConfig;
use tempfile::TempDir;

/// Stand-in for `typst compile ... <out>` that writes a minimal PDF header to
/// its last argument.
const PDF_STUB: &str = r#"#!/bin/sh
for arg in "$@"; do out="$arg"; done
printf '%%PDF-1.7\n%%stub\n' > "$out"
"#;

/// Stand-in for a Typst compile error.
const FAILING_STUB: &str = r#"#!/bin/sh
echo "error: unknown variable: datos" >&2
exit 1
"#;

/// Fake Typst executable kept alive as long as this value is.
pub struct TypstStub {
    _dir: TempDir,
    path: PathBuf,
}

impl TypstStub {
    pub fn succeeding() -> Self {
        Self::with_script(PDF_STUB)
    }

    pub fn failing() -> Self {
        Self::with_script(FAILING_STUB)
    }

    fn with_script(script: &str) -> Self {
        let dir = tempfile::tempdir().expect("temp dir for typst stub");
        let path = dir.path().join("typst");
        fs::write(&path, script).expect("write typst stub");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
            .expect("make typst stub executable");
        Self { _dir: dir, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Default configuration with `typst_bin` pointing at this stub.
    pub fn config(&self) -> AppConfig {
        AppConfig {
            typst_bin: self.path.to_string_lossy().into_owned(),
            ..AppConfig::default()
        }
    }
}
