use anyhow::{Context, Result, bail};
use ledgerscan_ingest::{CommBankFormat, FormatRegistry, NabFormat};
use ledgerscan_report::{DEFAULT_PERIOD_PATTERN, PeriodPattern};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "ledgerscan.toml";

/// Run configuration. Built once before any document is touched and only
/// read afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub ocr: OcrSection,
    pub rasterizer: RasterizerSection,
    pub paths: PathsSection,
    pub period: PeriodSection,
    pub formats: FormatsSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrSection {
    /// tesseract binary; looked up on PATH when unset
    pub tesseract: Option<PathBuf>,
    /// Extra arguments after `<image> stdout`
    pub args: Vec<String>,
    /// Upper bound for one page's OCR call
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterizerSection {
    /// pdftoppm binary; looked up on PATH when unset
    pub pdftoppm: Option<PathBuf>,
    pub dpi: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsSection {
    pub source_dir: PathBuf,
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PeriodSection {
    /// Regex with a month group and a year group, matched against file names
    pub pattern: String,
}

/// File-name tokens selecting each statement format.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatsSection {
    pub commbank: Vec<String>,
    pub nab: Vec<String>,
}

impl Default for OcrSection {
    fn default() -> Self {
        Self {
            tesseract: None,
            args: vec!["--psm".to_string(), "3".to_string()],
            timeout_secs: 120,
        }
    }
}

impl Default for RasterizerSection {
    fn default() -> Self {
        Self {
            pdftoppm: None,
            dpi: 300,
        }
    }
}

impl Default for PathsSection {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("."),
            output_dir: PathBuf::from("statements"),
        }
    }
}

impl Default for PeriodSection {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_PERIOD_PATTERN.to_string(),
        }
    }
}

impl Default for FormatsSection {
    fn default() -> Self {
        Self {
            commbank: CommBankFormat::DEFAULT_TOKENS.iter().map(|t| t.to_string()).collect(),
            nab: NabFormat::DEFAULT_TOKENS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl Config {
    /// CommBank first, then NAB, with the configured identity tokens.
    pub fn registry(&self) -> FormatRegistry {
        let mut registry = FormatRegistry::empty();
        registry
            .register(CommBankFormat::with_tokens(self.formats.commbank.clone()))
            .register(NabFormat::with_tokens(self.formats.nab.clone()));
        registry
    }

    pub fn period_pattern(&self) -> Result<PeriodPattern> {
        PeriodPattern::new(&self.period.pattern).context("period.pattern")
    }
}

/// Missing file means defaults.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

pub fn save_config(path: &Path, cfg: &Config) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn init_config(path: &Path) -> Result<()> {
    if path.exists() {
        bail!("config already exists: {}", path.display());
    }
    save_config(path, &Config::default())?;
    println!("Wrote {}", path.display());
    Ok(())
}
