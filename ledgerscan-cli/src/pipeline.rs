//! Concurrent per-document parsing.
//!
//! Each document gets its own task: page text is gathered first (OCR or a
//! text file), then the CPU-bound parse runs on the blocking pool. Documents
//! share nothing but the read-only format registry.

use anyhow::{Context, Result, anyhow, bail};
use ledgerscan_ingest::{DocumentError, FormatRegistry, ParsedStatement, StatementParser, TextPages};
use log::{debug, error};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinSet;

use crate::config::Config;
use crate::discover::InputKind;
use crate::ocr::OcrTools;

pub struct DocumentResult {
    pub path: PathBuf,
    /// File name, used for format and period detection
    pub identity: String,
    pub outcome: Result<ParsedStatement>,
}

pub struct Pipeline {
    registry: Arc<FormatRegistry>,
    ocr: Option<Arc<OcrTools>>,
}

impl Pipeline {
    /// OCR tools are only resolved when some input is a PDF.
    pub fn new(cfg: &Config, inputs: &[PathBuf]) -> Result<Self> {
        let needs_ocr = inputs.iter().any(|p| InputKind::of(p) == Some(InputKind::Pdf));
        let ocr = if needs_ocr {
            Some(Arc::new(OcrTools::resolve(cfg)?))
        } else {
            None
        };
        Ok(Self {
            registry: Arc::new(cfg.registry()),
            ocr,
        })
    }

    /// Parse every input concurrently. Results come back in input order,
    /// which is the order documents are merged into periods.
    pub async fn parse_all(&self, inputs: Vec<PathBuf>) -> Vec<DocumentResult> {
        let mut set = JoinSet::new();
        for (slot, path) in inputs.iter().cloned().enumerate() {
            let registry = Arc::clone(&self.registry);
            let ocr = self.ocr.clone();
            set.spawn(async move { (slot, parse_document(registry, ocr, path).await) });
        }

        let mut slots: Vec<Option<DocumentResult>> = inputs.iter().map(|_| None).collect();
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((slot, result)) => slots[slot] = Some(result),
                Err(e) => error!("document task failed: {e}"),
            }
        }

        slots
            .into_iter()
            .zip(inputs)
            .map(|(slot, path)| {
                slot.unwrap_or_else(|| DocumentResult {
                    identity: identity_of(&path),
                    outcome: Err(anyhow!("document task did not complete")),
                    path,
                })
            })
            .collect()
    }
}

pub fn identity_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

async fn parse_document(registry: Arc<FormatRegistry>, ocr: Option<Arc<OcrTools>>, path: PathBuf) -> DocumentResult {
    let identity = identity_of(&path);
    let outcome = load_and_parse(registry, ocr, &path, &identity).await;
    DocumentResult {
        path,
        identity,
        outcome,
    }
}

async fn load_and_parse(
    registry: Arc<FormatRegistry>,
    ocr: Option<Arc<OcrTools>>,
    path: &Path,
    identity: &str,
) -> Result<ParsedStatement> {
    let skip_leading = match registry.detect(identity) {
        Some(format) => format.skipped_leading_pages(),
        None => {
            return Err(DocumentError::UnknownFormat {
                identity: identity.to_string(),
            }
            .into());
        }
    };

    let pages = match InputKind::of(path) {
        Some(InputKind::Pdf) => {
            let ocr = ocr.context("OCR tools are not available")?;
            ocr.document_pages(path, skip_leading).await?
        }
        Some(InputKind::Text) => {
            let text = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("read {}", path.display()))?;
            TextPages::from_form_feed(&text)
        }
        None => bail!("unsupported statement file: {}", path.display()),
    };
    debug!("{identity}: page text ready, parsing");

    let identity = identity.to_string();
    let parsed = tokio::task::spawn_blocking(move || StatementParser::new(&registry).parse(&identity, &pages))
        .await
        .context("parse task panicked")??;
    Ok(parsed)
}
