use std::collections::HashMap;

use serde::Deserialize;

pub const DEFAULT_CLANG: &str = "clang";
pub const DEFAULT_PREPROCESSOR: &str = "cpp";
pub const DEFAULT_COMPILER: &str = "cc";

/// External tools driven by the normalizer and the flags forwarded to them.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolSettings {
    /// Clang binary used for `-ast-dump=json`.
    pub clang: String,
    pub clang_flags: Vec<String>,
    pub preprocessor: String,
    /// `-C` keeps comments, `-P` drops line markers. `-nostdinc` keeps the
    /// implicit `stdc-predef.h` (and its comments) out of the output; the
    /// file's own includes are detached before preprocessing anyway.
    pub preprocessor_flags: Vec<String>,
    /// Compiler used for the post-expansion validation build.
    pub compiler: String,
    pub compiler_flags: Vec<String>,
    /// Extra `-I` directories for parsing and validation.
    pub include_paths: Vec<String>,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            clang: DEFAULT_CLANG.to_owned(),
            clang_flags: Vec::new(),
            preprocessor: DEFAULT_PREPROCESSOR.to_owned(),
            preprocessor_flags: vec!["-C".to_owned(), "-P".to_owned(), "-nostdinc".to_owned()],
            compiler: DEFAULT_COMPILER.to_owned(),
            compiler_flags: Vec::new(),
            include_paths: Vec::new(),
        }
    }
}

impl ToolSettings {
    pub(crate) fn apply_patch(
        &mut self,
        patch: ToolSettingsPatch,
    ) {
        if let Some(v) = patch.clang {
            self.clang = v;
        }
        if let Some(v) = patch.clang_flags {
            self.clang_flags = v;
        }
        if let Some(v) = patch.preprocessor {
            self.preprocessor = v;
        }
        if let Some(v) = patch.preprocessor_flags {
            self.preprocessor_flags = v;
        }
        if let Some(v) = patch.compiler {
            self.compiler = v;
        }
        if let Some(v) = patch.compiler_flags {
            self.compiler_flags = v;
        }
        if let Some(v) = patch.include_paths {
            self.include_paths = v;
        }
    }

    pub(crate) fn normalize(&mut self) {
        let defaults = Self::default();
        normalize_command(&mut self.clang, &defaults.clang);
        normalize_command(&mut self.preprocessor, &defaults.preprocessor);
        normalize_command(&mut self.compiler, &defaults.compiler);
        for list in [
            &mut self.clang_flags,
            &mut self.preprocessor_flags,
            &mut self.compiler_flags,
            &mut self.include_paths,
        ] {
            *list = list.iter().map(|f| f.trim().to_string()).filter(|f| !f.is_empty()).collect();
        }
    }
}

fn normalize_command(
    command: &mut String,
    default: &str,
) {
    let trimmed = command.trim();
    *command = if trimmed.is_empty() {
        default.to_owned()
    } else {
        trimmed.to_owned()
    };
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub(crate) struct ToolSettingsPatch {
    pub(crate) clang: Option<String>,
    pub(crate) clang_flags: Option<Vec<String>>,
    pub(crate) preprocessor: Option<String>,
    pub(crate) preprocessor_flags: Option<Vec<String>>,
    pub(crate) compiler: Option<String>,
    pub(crate) compiler_flags: Option<Vec<String>>,
    pub(crate) include_paths: Option<Vec<String>>,
    #[serde(flatten)]
    pub(crate) _extra: HashMap<String, toml::Value>,
}
