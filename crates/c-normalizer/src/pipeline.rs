//! Macro expansion followed by typedef unfolding, optionally preceded by
//! stripping `static` from selected functions.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::{
    ast::AstProvider,
    config::{Settings, ToolSettings},
    error::{NormalizeError, Result},
    expand::{MacroExpander, derived_path},
    strip::StaticStripper,
    unfold::TypedefUnfolder,
};

pub const STRIPPED_PREFIX: &str = "stripped_";

#[derive(Debug, Clone)]
pub struct Pipeline {
    tools: ToolSettings,
    output_dir: Option<PathBuf>,
}

impl Pipeline {
    pub fn new(settings: &Settings) -> Self {
        Self {
            tools: settings.tools.clone(),
            output_dir: settings.output.directory.clone(),
        }
    }

    pub fn expander(&self) -> MacroExpander {
        MacroExpander::new(self.tools.clone()).with_output_dir(self.output_dir.clone())
    }

    pub fn unfolder(&self) -> TypedefUnfolder {
        TypedefUnfolder::new(AstProvider::new(self.tools.clone()))
    }

    pub fn stripper(&self) -> StaticStripper {
        StaticStripper::new(AstProvider::new(self.tools.clone()))
    }

    /// Expand macros in `input`, then unfold typedefs in the expanded file.
    ///
    /// Returns the path of the canonical file. The first failing stage ends
    /// the run; a file left behind by an earlier stage is not a result.
    pub async fn canonicalize(
        &self,
        input: &Path,
    ) -> Result<PathBuf> {
        self.run(input, input).await
    }

    /// Strip `static` from each of `functions`, write the result to
    /// `stripped_<name>`, then canonicalize that file.
    pub async fn canonicalize_with_strip<S: AsRef<str>>(
        &self,
        input: &Path,
        functions: &[S],
    ) -> Result<PathBuf> {
        if functions.is_empty() {
            return self.canonicalize(input).await;
        }

        let stripped = self.stripper().strip_functions(functions, input).await?;
        let stripped_path = derived_path(input, STRIPPED_PREFIX, self.output_dir.as_deref());
        tokio::fs::write(&stripped_path, stripped).await.map_err(|error| NormalizeError::io(&stripped_path, error))?;
        info!("Wrote stripped source to {}", stripped_path.display());

        self.run(&stripped_path, input).await
    }

    /// `origin` is the user's file; its directory stays on the include path
    /// even when `input` was written elsewhere.
    async fn run(
        &self,
        input: &Path,
        origin: &Path,
    ) -> Result<PathBuf> {
        let mut expander = self.expander();
        let mut unfolder = self.unfolder();
        if let Some(dir) = origin.parent().filter(|p| !p.as_os_str().is_empty()) {
            expander = expander.with_include_dir(dir);
            unfolder = unfolder.with_include_dir(dir);
        }

        let expanded = expander.expand(input).await?;
        let canonical = unfolder.unfold(&expanded).await?;
        info!("Canonicalized {} into {}", origin.display(), canonical.display());
        Ok(canonical)
    }
}

#[cfg(test)]
#[path = "../tests/src/pipeline_tests.rs"]
mod tests;
