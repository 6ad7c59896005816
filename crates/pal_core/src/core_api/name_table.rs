use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::error::{CoreError, CoreErrorCode};

pub const DEFAULT_NAME_TABLE_PATH: &str = "resources/pals.json";

#[derive(Debug, Deserialize)]
struct NameDataset {
    values: Vec<NameDatasetEntry>,
}

#[derive(Debug, Deserialize)]
struct NameDatasetEntry {
    #[serde(rename = "CodeName")]
    code_name: String,
    #[serde(rename = "Name")]
    name: String,
}

/// Creature code to display name lookup. Codes are matched case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameTable {
    entries: HashMap<String, String>,
}

impl NameTable {
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        if !path.exists() {
            return Err(CoreError::new(
                CoreErrorCode::NotFound,
                format!("{} not found", path.display()),
            ));
        }
        let bytes = fs::read(path).map_err(|e| {
            CoreError::new(
                CoreErrorCode::Io,
                format!("failed to read {}: {e}", path.display()),
            )
        })?;
        Self::from_slice(&bytes).map_err(|e| {
            CoreError::new(e.code, format!("{}: {}", path.display(), e.message))
        })
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, CoreError> {
        let dataset: NameDataset = serde_json::from_slice(bytes).map_err(|e| {
            CoreError::new(
                CoreErrorCode::ReferenceData,
                format!("invalid name dataset: {e}"),
            )
        })?;
        Ok(Self::from_entries(
            dataset
                .values
                .into_iter()
                .map(|entry| (entry.code_name, entry.name)),
        ))
    }

    /// Later entries win when two codes collide after lowercasing.
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(code, name)| (code.as_ref().to_lowercase(), name.into()))
                .collect(),
        }
    }

    pub fn get(&self, code: &str) -> Option<&str> {
        self.entries.get(&code.to_lowercase()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
