use std::{collections::HashMap, path::PathBuf};

use serde::Deserialize;

/// Where derived files (`expanded_*`, `stripped_*`) are written.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OutputSettings {
    /// `None` writes next to the input file.
    pub directory: Option<PathBuf>,
}

impl OutputSettings {
    pub(crate) fn apply_patch(
        &mut self,
        patch: OutputSettingsPatch,
    ) {
        if let Some(v) = patch.directory {
            self.directory = Some(v);
        }
    }

    pub(crate) fn normalize(&mut self) {
        if self.directory.as_ref().is_some_and(|d| d.as_os_str().is_empty()) {
            self.directory = None;
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub(crate) struct OutputSettingsPatch {
    pub(crate) directory: Option<PathBuf>,
    #[serde(flatten)]
    pub(crate) _extra: HashMap<String, toml::Value>,
}
