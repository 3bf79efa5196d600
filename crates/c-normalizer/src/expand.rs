//! Macro expansion that leaves headers untouched.
//!
//! Include directives are lifted out before the preprocessor runs so only
//! macros defined in the file itself are expanded, then put back on top of
//! the expanded text. The result must still compile.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::{
    config::ToolSettings,
    error::{NormalizeError, Result},
    tools::{preprocess, validate_compiles},
    workspace::Workspace,
};

pub const EXPANDED_PREFIX: &str = "expanded_";

const CPLUSPLUS_GUARD: &str = "#ifdef __cplusplus";
const GUARD_TERMINATOR: &str = "#endif";
const INCLUDE_DIRECTIVE: &str = "#include";
const VALIDATION_OBJECT: &str = "validate.o";

#[derive(Debug, Clone)]
pub struct MacroExpander {
    tools: ToolSettings,
    output_dir: Option<PathBuf>,
}

impl MacroExpander {
    pub fn new(tools: ToolSettings) -> Self {
        Self {
            tools,
            output_dir: None,
        }
    }

    /// Write expanded files into `dir` instead of next to the input.
    pub fn with_output_dir(
        mut self,
        dir: Option<PathBuf>,
    ) -> Self {
        self.output_dir = dir;
        self
    }

    /// Extra include directory for validation, after the input's own directory.
    pub fn with_include_dir(
        mut self,
        dir: &Path,
    ) -> Self {
        let dir = dir.display().to_string();
        if !self.tools.include_paths.contains(&dir) {
            self.tools.include_paths.push(dir);
        }
        self
    }

    /// Expand `input` and return the path of the validated `expanded_*` file.
    pub async fn expand(
        &self,
        input: &Path,
    ) -> Result<PathBuf> {
        let content = tokio::fs::read_to_string(input).await.map_err(|error| NormalizeError::io(input, error))?;
        let file_name = input.file_name().and_then(|n| n.to_str()).ok_or_else(|| NormalizeError::ParseError {
            path: input.to_path_buf(),
            reason: "input path has no UTF-8 file name".to_owned(),
        })?;

        let mut lines = remove_cplusplus_guards(content.lines().map(str::to_owned).collect());
        let includes = detach_includes(&mut lines);
        debug!("[expand] {}: detached {} include lines", input.display(), includes.len());

        let workspace = Workspace::create("expand")?;
        let working_copy = workspace.write(file_name, &lines.join("\n")).await?;
        let expanded = preprocess(&self.tools, &working_copy).await.map_err(|error| match error {
            NormalizeError::PreprocessError {
                output, ..
            } => NormalizeError::PreprocessError {
                path: input.to_path_buf(),
                output,
            },
            other => other,
        })?;

        let output_path = expanded_output_path(input, self.output_dir.as_deref());
        tokio::fs::write(&output_path, assemble_output(&includes, &expanded))
            .await
            .map_err(|error| NormalizeError::io(&output_path, error))?;

        let include_dirs = self.include_dirs(input);
        validate_compiles(&self.tools, &output_path, &workspace.file(VALIDATION_OBJECT), &include_dirs).await?;
        workspace.close()?;

        info!("Expanded macros of {} into {}", input.display(), output_path.display());
        Ok(output_path)
    }

    fn include_dirs(
        &self,
        input: &Path,
    ) -> Vec<String> {
        let mut dirs: Vec<String> = input
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(|p| p.display().to_string())
            .into_iter()
            .collect();
        for path in &self.tools.include_paths {
            if !dirs.contains(path) {
                dirs.push(path.clone());
            }
        }
        dirs
    }
}

/// Derived output path: `expanded_<name>` beside the input or in `output_dir`.
pub fn expanded_output_path(
    input: &Path,
    output_dir: Option<&Path>,
) -> PathBuf {
    derived_path(input, EXPANDED_PREFIX, output_dir)
}

pub(crate) fn derived_path(
    input: &Path,
    prefix: &str,
    output_dir: Option<&Path>,
) -> PathBuf {
    let name = input.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    let dir = output_dir.map(Path::to_path_buf).or_else(|| input.parent().map(Path::to_path_buf)).unwrap_or_default();
    dir.join(format!("{prefix}{name}"))
}

/// Drop every `#ifdef __cplusplus` ... `#endif` range, inclusive.
///
/// An opener pairs with the first `#endif` after it; conditionals nested
/// inside the guard are not tracked. An opener with no terminator is kept.
pub(crate) fn remove_cplusplus_guards(lines: Vec<String>) -> Vec<String> {
    let mut kept = Vec::with_capacity(lines.len());
    let mut i = 0;
    while i < lines.len() {
        if lines[i].trim().starts_with(CPLUSPLUS_GUARD)
            && let Some(offset) = lines[i + 1..].iter().position(|l| l.trim().starts_with(GUARD_TERMINATOR))
        {
            i += offset + 2;
            continue;
        }
        kept.push(lines[i].clone());
        i += 1;
    }
    kept
}

/// Blank every include line and return the originals in order.
pub(crate) fn detach_includes(lines: &mut [String]) -> Vec<String> {
    let mut includes = Vec::new();
    for line in lines.iter_mut() {
        if line.trim().starts_with(INCLUDE_DIRECTIVE) {
            includes.push(std::mem::take(line));
        }
    }
    includes
}

pub(crate) fn assemble_output(
    includes: &[String],
    expanded: &str,
) -> String {
    format!("{}\n{expanded}", includes.join("\n"))
}

#[cfg(test)]
#[path = "../tests/src/expand_tests.rs"]
mod tests;
