//! Statement file discovery

use anyhow::{Context, Result, bail};
use glob::glob;
use std::path::{Path, PathBuf};

/// How a statement file's pages are obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// Rasterize and OCR
    Pdf,
    /// Already extracted text, pages separated by form feeds
    Text,
}

impl InputKind {
    pub fn of(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Some(InputKind::Pdf),
            "txt" => Some(InputKind::Text),
            _ => None,
        }
    }
}

/// Explicit files win; otherwise every `*.pdf` and `*.txt` in `source_dir`.
/// Sorted and de-duplicated so runs are repeatable.
pub fn resolve_inputs(files: &[PathBuf], source_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();

    if files.is_empty() {
        for ext in ["pdf", "txt"] {
            let pattern = source_dir.join(format!("*.{ext}"));
            let pattern = pattern.to_string_lossy();
            let paths = glob(&pattern).with_context(|| format!("invalid glob pattern: {pattern}"))?;
            for path in paths {
                let path = path.with_context(|| format!("error resolving pattern: {pattern}"))?;
                if path.is_file() {
                    out.push(path);
                }
            }
        }
    } else {
        for file in files {
            if !file.is_file() {
                bail!("not a file: {}", file.display());
            }
            if InputKind::of(file).is_none() {
                bail!("unsupported statement file (expected .pdf or .txt): {}", file.display());
            }
            out.push(file.clone());
        }
    }

    if out.is_empty() {
        bail!("no statements found in {}", source_dir.display());
    }

    out.sort();
    out.dedup();
    Ok(out)
}
