use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Result, ValidatorError};
use crate::types::FormatTag;

pub const DEFAULT_DATASTREAM: &str = "OBJ";
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidationConfig {
    /// Datastream validated when the caller names only an object.
    pub datastream: String,
    /// Root directory of a [`crate::source::DirectorySource`].
    pub store_root: Option<PathBuf>,
    /// Whether generic images are decoded or the probe is skipped.
    pub image_probe: bool,
    pub mime_overrides: BTreeMap<String, FormatTag>,
    pub log_level: String,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            datastream: DEFAULT_DATASTREAM.to_string(),
            store_root: None,
            image_probe: true,
            mime_overrides: BTreeMap::new(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl ValidationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ValidatorError::Config(e.to_string()))
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
            .map_err(|e| ValidatorError::Config(format!("{}: {e}", path.display())))
    }

    pub fn with_datastream(mut self, datastream: impl Into<String>) -> Self {
        self.datastream = datastream.into();
        self
    }

    pub fn with_store_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.store_root = Some(root.into());
        self
    }

    pub fn with_image_probe(mut self, enabled: bool) -> Self {
        self.image_probe = enabled;
        self
    }

    pub fn with_mime_override(mut self, mime: impl Into<String>, tag: FormatTag) -> Self {
        self.mime_overrides.insert(mime.into(), tag);
        self
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }
}
