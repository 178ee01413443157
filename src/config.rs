//! Configuration handling for the formlink binary

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::l10n::Catalog;

/// Log filter used when neither `RUST_LOG` nor the config sets one
pub const DEFAULT_LOG_FILTER: &str = "formlink=info";

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Translation catalog used for placeholders
    pub locale_catalog: Option<PathBuf>,
    /// Tracing filter directive, e.g. `formlink=debug`
    pub log_filter: Option<String>,
}

impl AppConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("io", "formlink", "formlink")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from file
    pub fn load() -> Result<Self> {
        if let Some(path) = Self::config_path() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }

        Ok(Self::default())
    }

    fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: AppConfig = serde_json::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    pub fn log_filter(&self) -> &str {
        self.log_filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }

    /// Load the configured translation catalog, if any
    pub fn load_catalog(&self) -> Result<Option<Catalog>> {
        let Some(path) = &self.locale_catalog else {
            return Ok(None);
        };
        let catalog = Catalog::load(path)
            .with_context(|| format!("loading locale catalog {}", path.display()))?;
        tracing::debug!(entries = catalog.len(), "locale catalog loaded");
        Ok(Some(catalog))
    }
}
