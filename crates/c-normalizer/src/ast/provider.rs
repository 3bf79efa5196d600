use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::{
    ast::{clang_nodes::Node, unit::ParsedUnit},
    config::ToolSettings,
    error::{NormalizeError, Result},
    text::SourceText,
    tools::run_tool,
};

/// Parses C files through clang's JSON AST dump.
#[derive(Debug, Clone)]
pub struct AstProvider {
    tools: ToolSettings,
    include_dirs: Vec<PathBuf>,
}

impl AstProvider {
    pub fn new(tools: ToolSettings) -> Self {
        Self {
            tools,
            include_dirs: Vec::new(),
        }
    }

    /// Add a `-I` directory, typically the original file's directory when
    /// parsing a copy that lives in a workspace.
    pub fn with_include_dir(
        mut self,
        dir: impl Into<PathBuf>,
    ) -> Self {
        let dir = dir.into();
        if !self.include_dirs.contains(&dir) {
            self.include_dirs.push(dir);
        }
        self
    }

    /// Provider that also resolves includes next to `path`.
    pub fn for_file(
        &self,
        path: &Path,
    ) -> Self {
        match path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(dir) => self.clone().with_include_dir(dir),
            None => self.clone(),
        }
    }

    /// Parse `path` and snapshot its text together with the AST.
    ///
    /// Clang errors do not fail the parse as long as a JSON dump is produced;
    /// partial ASTs are still usable for extent queries.
    pub async fn parse(
        &self,
        path: &Path,
    ) -> Result<ParsedUnit> {
        let content = tokio::fs::read_to_string(path).await.map_err(|error| NormalizeError::io(path, error))?;
        let ast_json = self.run_ast_dump(path).await?;

        let root: Node = serde_json::from_str(&ast_json).map_err(|error| NormalizeError::ParseError {
            path: path.to_path_buf(),
            reason: format!("invalid AST JSON: {error}"),
        })?;

        Ok(ParsedUnit::from_root(path.to_path_buf(), SourceText::parse(&content), &root, &main_file_spellings(path)))
    }

    fn ast_dump_args(
        &self,
        path: &Path,
    ) -> Vec<String> {
        let mut args = vec![
            "-Xclang".to_string(),
            "-ast-dump=json".to_string(),
            "-fsyntax-only".to_string(),
            "-fno-color-diagnostics".to_string(),
        ];
        let mut seen_includes = std::collections::HashSet::new();
        let include_dirs = self.include_dirs.iter().map(|d| d.display().to_string()).chain(self.tools.include_paths.iter().cloned());
        for dir in include_dirs {
            if seen_includes.insert(dir.clone()) {
                args.push("-I".to_string());
                args.push(dir);
            }
        }
        args.extend(self.tools.clang_flags.iter().cloned());
        args.push(path.display().to_string());
        args
    }

    async fn run_ast_dump(
        &self,
        path: &Path,
    ) -> Result<String> {
        let output = run_tool(&self.tools.clang, &self.ast_dump_args(path)).await?;

        if !output.success() {
            for line in output.stderr.lines() {
                if line.contains("error:") {
                    warn!("[ast-dump] compiler error: {line}");
                }
            }
            debug!("[ast-dump] exited with non-zero status (partial AST may still be usable)");
        }

        if output.stdout.is_empty() || !output.stdout.starts_with('{') {
            return Err(NormalizeError::ParseError {
                path: path.to_path_buf(),
                reason: format!("clang produced no AST:\n{}", output.combined()),
            });
        }

        debug!("[ast-dump] produced {} bytes of JSON for {}", output.stdout.len(), path.display());
        Ok(output.stdout)
    }
}

/// Every spelling under which clang may report `path` in the dump.
fn main_file_spellings(path: &Path) -> Vec<String> {
    let mut spellings = vec![path.display().to_string()];
    if let Ok(canonical) = std::fs::canonicalize(path) {
        let canonical = canonical.display().to_string();
        if !spellings.contains(&canonical) {
            spellings.push(canonical);
        }
    }
    spellings
}

#[cfg(test)]
#[path = "../../tests/src/ast/provider_tests.rs"]
mod tests;
