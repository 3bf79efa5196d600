use std::{
    fmt::{Display, Formatter},
    path::PathBuf,
};

use crate::tools::CompilerDiagnostic;

pub type Result<T, E = NormalizeError> = std::result::Result<T, E>;

/// What kind of symbol a failed lookup was looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Function,
}

impl SymbolKind {
    fn as_str(self) -> &'static str {
        match self {
            Self::Function => "function",
        }
    }
}

/// Failure of one normalization stage.
///
/// Every variant carries enough context (symbol name, file, captured tool
/// output) to diagnose the failure without re-running with extra flags.
#[derive(Debug)]
pub enum NormalizeError {
    NotFound {
        kind: SymbolKind,
        name: String,
        path: PathBuf,
    },
    ParseError {
        path: PathBuf,
        reason: String,
    },
    PreprocessError {
        path: PathBuf,
        output: String,
    },
    CompileValidationError {
        path: PathBuf,
        diagnostics: Vec<CompilerDiagnostic>,
        output: String,
    },
    InvariantViolation {
        function: String,
        reason: String,
    },
    ToolLaunch {
        tool: String,
        reason: String,
    },
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl NormalizeError {
    pub(crate) fn io(
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl Display for NormalizeError {
    fn fmt(
        &self,
        f: &mut Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            Self::NotFound {
                kind,
                name,
                path,
            } => write!(f, "{} `{name}` not found in {}", kind.as_str(), path.display()),
            Self::ParseError {
                path,
                reason,
            } => write!(f, "failed to parse {}: {reason}", path.display()),
            Self::PreprocessError {
                path,
                output,
            } => write!(f, "preprocessing {} failed:\n{output}", path.display()),
            Self::CompileValidationError {
                path,
                diagnostics,
                output,
            } => {
                write!(f, "{} does not compile after normalization:", path.display())?;
                if diagnostics.is_empty() {
                    write!(f, "\n{output}")
                } else {
                    for diagnostic in diagnostics {
                        write!(f, "\n{diagnostic}")?;
                    }
                    Ok(())
                }
            },
            Self::InvariantViolation {
                function,
                reason,
            } => write!(f, "invariant violated while editing `{function}`: {reason}"),
            Self::ToolLaunch {
                tool,
                reason,
            } => write!(f, "failed to launch {tool}: {reason}"),
            Self::Io {
                path,
                source,
            } => write!(f, "io error on {}: {source}", path.display()),
        }
    }
}

impl std::error::Error for NormalizeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io {
                source, ..
            } => Some(source),
            _ => None,
        }
    }
}
