//! Removal of the internal-linkage qualifier from a named function.

use std::path::Path;

use tracing::{debug, info};

use crate::{
    ast::{AstProvider, FunctionInfo, ParsedUnit},
    error::{NormalizeError, Result},
    syntax::{Token, TokenKind, remove_token},
    text::SourceText,
    workspace::Workspace,
};

pub const INTERNAL_LINKAGE_KEYWORD: &str = "static";

const WORKING_FILE: &str = "unit.c";

/// Strips a leading `static` from a function's declaration and definition.
#[derive(Debug, Clone)]
pub struct StaticStripper {
    provider: AstProvider,
}

impl StaticStripper {
    pub fn new(provider: AstProvider) -> Self {
        Self {
            provider,
        }
    }

    /// Return `source` with `static` removed from `function_name`.
    ///
    /// The source is parsed from a private workspace that is deleted on
    /// every exit path. Running this on its own output is a no-op.
    pub async fn strip(
        &self,
        function_name: &str,
        source: &str,
    ) -> Result<String> {
        strip_labeled(&self.provider, function_name, source, Path::new("<source>")).await
    }

    /// Like [`StaticStripper::strip`] for the contents of `path`; includes
    /// are resolved relative to `path` and errors name it.
    pub async fn strip_file(
        &self,
        function_name: &str,
        path: &Path,
    ) -> Result<String> {
        self.strip_functions(&[function_name], path).await
    }

    /// Strip every function in `function_names` from the contents of `path`,
    /// in order, each pass re-parsing the previous pass's output.
    pub async fn strip_functions<S: AsRef<str>>(
        &self,
        function_names: &[S],
        path: &Path,
    ) -> Result<String> {
        let mut source = tokio::fs::read_to_string(path).await.map_err(|error| NormalizeError::io(path, error))?;
        let provider = self.provider.for_file(path);
        for name in function_names {
            source = strip_labeled(&provider, name.as_ref(), &source, path).await?;
        }
        Ok(source)
    }
}

async fn strip_labeled(
    provider: &AstProvider,
    function_name: &str,
    source: &str,
    label: &Path,
) -> Result<String> {
    let workspace = Workspace::create("strip")?;
    let stripped =
        strip_in_workspace(provider, &workspace, function_name, source).await.map_err(|error| match error {
            NormalizeError::NotFound {
                kind,
                name,
                ..
            } => NormalizeError::NotFound {
                kind,
                name,
                path: label.to_path_buf(),
            },
            other => other,
        })?;
    workspace.close()?;
    info!("Stripped `{INTERNAL_LINKAGE_KEYWORD}` from `{function_name}` in {}", label.display());
    Ok(stripped)
}

async fn strip_in_workspace(
    provider: &AstProvider,
    workspace: &Workspace,
    function_name: &str,
    source: &str,
) -> Result<String> {
    let path = workspace.write(WORKING_FILE, source).await?;
    let mut unit = provider.parse(&path).await?;
    let FunctionInfo {
        mut definition,
        declaration,
        ..
    } = unit.find_function(function_name)?;
    let mut text = unit.text().clone();

    if let Some(declaration) = declaration {
        let tokens = unit.node_tokens(&declaration);
        if tokens.is_empty() {
            debug!("[strip] declaration of `{function_name}` has no tokens, skipping");
        } else if remove_leading_qualifier(&mut text, &tokens) {
            // The definition's extent was computed against the old text.
            unit = reparse(provider, workspace, &path, &text).await?;
            definition = unit.find_function(function_name).map(|info| info.definition).map_err(|error| {
                NormalizeError::InvariantViolation {
                    function: function_name.to_owned(),
                    reason: format!("definition lost after re-parse: {error}"),
                }
            })?;
        }
    }

    let tokens = unit.node_tokens(&definition);
    remove_leading_qualifier(&mut text, &tokens);

    Ok(text.render())
}

async fn reparse(
    provider: &AstProvider,
    workspace: &Workspace,
    path: &Path,
    text: &SourceText,
) -> Result<ParsedUnit> {
    workspace.write(WORKING_FILE, &text.render()).await?;
    provider.parse(path).await
}

/// Delete the first token when it is the internal-linkage keyword.
///
/// One space or tab directly after the keyword is removed with it so
/// `static int f` becomes `int f`. Returns whether the text changed.
pub(crate) fn remove_leading_qualifier(
    text: &mut SourceText,
    tokens: &[Token],
) -> bool {
    match tokens.first() {
        Some(first) if first.kind == Some(TokenKind::KwStatic) => remove_token(text, first),
        _ => false,
    }
}

#[cfg(test)]
#[path = "../tests/src/strip_tests.rs"]
mod tests;
