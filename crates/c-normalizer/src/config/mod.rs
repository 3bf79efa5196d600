//! Layered configuration.
//!
//! Settings are split into one file per category. [`Settings`] aggregates
//! them and applies partial `*Patch` structs deserialized from a
//! `c-normalizer.toml` file, so a file only needs to name what it overrides.

pub(crate) mod logging;
pub(crate) mod output;
pub(crate) mod tools;

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

pub use logging::{LogLevel, LoggingSettings};
use logging::LoggingSettingsPatch;
pub use output::OutputSettings;
use output::OutputSettingsPatch;
use serde::Deserialize;
pub use tools::{DEFAULT_CLANG, DEFAULT_COMPILER, DEFAULT_PREPROCESSOR, ToolSettings};
use tools::ToolSettingsPatch;
use tracing::debug;

use crate::error::{NormalizeError, Result};

pub const CONFIG_FILENAME: &str = "c-normalizer.toml";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Settings {
    pub tools: ToolSettings,
    pub output: OutputSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    /// Parse a TOML document and layer it over the defaults.
    pub fn from_toml_str(
        content: &str,
        origin: &Path,
    ) -> Result<Self> {
        let patch: SettingsPatch = toml::from_str(content).map_err(|error| NormalizeError::ParseError {
            path: origin.to_path_buf(),
            reason: error.to_string(),
        })?;
        let mut settings = Self::default();
        settings.apply_patch(patch);
        settings.normalize();
        Ok(settings)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|error| NormalizeError::io(path, error))?;
        debug!("Loaded settings from {}", path.display());
        Self::from_toml_str(&content, path)
    }

    /// Load the nearest `c-normalizer.toml` above `source`, or the defaults.
    pub fn discover(source: &Path) -> Result<Self> {
        match find_config_file(source) {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    fn apply_patch(
        &mut self,
        patch: SettingsPatch,
    ) {
        if let Some(p) = patch.tools {
            self.tools.apply_patch(p);
        }
        if let Some(p) = patch.output {
            self.output.apply_patch(p);
        }
        if let Some(p) = patch.logging {
            self.logging.apply_patch(p);
        }
    }

    fn normalize(&mut self) {
        self.tools.normalize();
        self.output.normalize();
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct SettingsPatch {
    tools: Option<ToolSettingsPatch>,
    output: Option<OutputSettingsPatch>,
    logging: Option<LoggingSettingsPatch>,
    #[serde(flatten)]
    _extra: HashMap<String, toml::Value>,
}

/// Walks parent directories from `start` looking for `c-normalizer.toml`.
pub fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut dir = if start.is_file() {
        start.parent()?
    } else {
        start
    };
    loop {
        let candidate = dir.join(CONFIG_FILENAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        dir = dir.parent()?;
    }
}

#[cfg(test)]
#[path = "../../tests/src/config/settings_tests.rs"]
mod tests;
