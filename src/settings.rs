use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{Config, File};
use serde::Deserialize;

use crate::error::ExtractError;

const DEFAULT_CONFIG_FILE: &str = "chamber.toml";

/// Parameters for turning a scanned PDF page range into a records sheet.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    pub pdf: PathBuf,
    pub output: PathBuf,
    pub first_page: u32,
    pub last_page: u32,
    pub dpi: u32,
    pub lang: String,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            pdf: PathBuf::from("npt_chamber.pdf"),
            output: PathBuf::from("output.xlsx"),
            first_page: 30,
            last_page: 40,
            dpi: 200,
            lang: "eng".to_string(),
        }
    }
}

impl ExtractConfig {
    pub fn validate(&self) -> Result<(), ExtractError> {
        if self.first_page == 0 || self.first_page > self.last_page {
            return Err(ExtractError::PageRange {
                first: self.first_page,
                last: self.last_page,
            });
        }
        if self.dpi == 0 {
            return Err(ExtractError::Dpi);
        }
        Ok(())
    }
}

/// Parameters for pulling a flat email list out of a records sheet.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HarvestConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub columns: Vec<String>,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("output.xlsx"),
            output: PathBuf::from("chamber_email_list.txt"),
            columns: vec!["Name".to_string(), "Email".to_string()],
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub extract: ExtractConfig,
    pub emails: HarvestConfig,
}

impl Settings {
    /// Defaults, overlaid by `path` when given (must exist) or by
    /// `chamber.toml` in the working directory when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let source = match path {
            Some(p) => File::from(p).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };
        let settings = Config::builder()
            .add_source(source)
            .build()
            .with_context(|| match path {
                Some(p) => format!("Failed to read config {:?}", p),
                None => format!("Failed to read {}", DEFAULT_CONFIG_FILE),
            })?;
        Ok(settings.try_deserialize()?)
    }
}

// ── Tests ──
