//! Layout and rendering settings, loadable from JSON.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::measure::TextMetrics;
use crate::render::Theme;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Gap between isolated boxes, levels, stacked boxes and regions.
    pub spacing: i32,
    pub metrics: TextMetrics,
    pub theme: Theme,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            spacing: 48,
            metrics: TextMetrics::default(),
            theme: Theme::default(),
        }
    }
}

impl Config {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }
}
