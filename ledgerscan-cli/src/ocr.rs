//! Rasterizer and OCR collaborators, run as external processes.
//!
//! `pdftoppm` turns a statement into one PNG per page, `tesseract` reads each
//! page back as text. An OCR failure or timeout costs only that page.

use anyhow::{Context, Result, bail};
use ledgerscan_ingest::{PageTextError, TextPages};
use log::debug;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;

use crate::config::Config;

#[derive(Debug, Clone)]
pub struct OcrTools {
    tesseract: PathBuf,
    tesseract_args: Vec<String>,
    pdftoppm: PathBuf,
    dpi: u32,
    timeout: Duration,
}

impl OcrTools {
    /// Configured binaries, or the ones found on PATH.
    pub fn resolve(cfg: &Config) -> Result<Self> {
        let tesseract = match &cfg.ocr.tesseract {
            Some(p) => p.clone(),
            None => which::which("tesseract").context("tesseract not found on PATH (set ocr.tesseract)")?,
        };
        let pdftoppm = match &cfg.rasterizer.pdftoppm {
            Some(p) => p.clone(),
            None => which::which("pdftoppm").context("pdftoppm not found on PATH (set rasterizer.pdftoppm)")?,
        };

        Ok(Self {
            tesseract,
            tesseract_args: cfg.ocr.args.clone(),
            pdftoppm,
            dpi: cfg.rasterizer.dpi,
            timeout: Duration::from_secs(cfg.ocr.timeout_secs),
        })
    }

    /// Render every page of `pdf` into `out_dir`, returning images in page order.
    pub async fn rasterize(&self, pdf: &Path, out_dir: &Path) -> Result<Vec<PathBuf>> {
        let output = Command::new(&self.pdftoppm)
            .arg("-r")
            .arg(self.dpi.to_string())
            .arg("-png")
            .arg(pdf)
            .arg(out_dir.join("page"))
            .kill_on_drop(true)
            .output()
            .await
            .with_context(|| format!("running {}", self.pdftoppm.display()))?;

        if !output.status.success() {
            bail!(
                "{} failed on {} with status {}: {}",
                self.pdftoppm.display(),
                pdf.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        // pdftoppm zero-pads page numbers to a common width, so name order is page order
        let mut images = Vec::new();
        let mut entries = tokio::fs::read_dir(out_dir)
            .await
            .with_context(|| format!("read {}", out_dir.display()))?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "png") {
                images.push(path);
            }
        }
        images.sort();
        Ok(images)
    }

    /// OCR one page image, bounded by the configured timeout.
    pub async fn page_text(&self, index: usize, image: &Path) -> Result<String, PageTextError> {
        let run = Command::new(&self.tesseract)
            .arg(image)
            .arg("stdout")
            .args(&self.tesseract_args)
            .kill_on_drop(true)
            .output();

        let output = match tokio::time::timeout(self.timeout, run).await {
            Err(_) => {
                return Err(PageTextError::new(
                    index,
                    format!("OCR timed out after {}s", self.timeout.as_secs()),
                ));
            }
            Ok(Err(e)) => return Err(PageTextError::new(index, format!("running tesseract: {e}"))),
            Ok(Ok(output)) => output,
        };

        if !output.status.success() {
            return Err(PageTextError::new(
                index,
                format!(
                    "tesseract exited with {}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            ));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Rasterize and OCR a whole document, one page after another.
    ///
    /// The first `skip_leading` pages are never OCR'd; the parser ignores
    /// them anyway.
    pub async fn document_pages(&self, pdf: &Path, skip_leading: usize) -> Result<TextPages> {
        let scratch = tempfile::tempdir().context("creating page image directory")?;
        let images = self.rasterize(pdf, scratch.path()).await?;
        debug!("{}: {} page image(s)", pdf.display(), images.len());

        let mut pages = Vec::with_capacity(images.len());
        for (index, image) in images.iter().enumerate() {
            if index < skip_leading {
                pages.push(Ok(String::new()));
                continue;
            }
            pages.push(self.page_text(index, image).await);
        }
        Ok(TextPages::from_results(pages))
    }
}
