//! Localization of display strings

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::Result;

/// Looks up a display string by key
pub trait Localize {
    /// Translation for `key`, or `default` when there is none
    fn localize(&self, key: &str, default: &str) -> String;
}

/// Returns every default unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLocalization;

impl Localize for NoLocalization {
    fn localize(&self, _key: &str, default: &str) -> String {
        default.to_string()
    }
}

/// Flat key to string translation table, stored as a JSON object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    entries: HashMap<String, String>,
}

impl Catalog {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn insert(&mut self, key: &str, text: &str) {
        self.entries.insert(key.to_string(), text.to_string());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Localize for Catalog {
    fn localize(&self, key: &str, default: &str) -> String {
        match self.entries.get(key) {
            Some(text) => text.clone(),
            None => {
                tracing::trace!(key, "no translation");
                default.to_string()
            }
        }
    }
}
