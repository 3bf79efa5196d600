use std::{
    fmt::{Display, Formatter},
    path::Path,
    process::{ExitStatus, Stdio},
};

use once_cell::sync::Lazy;
use regex::Regex;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::{
    config::ToolSettings,
    error::{NormalizeError, Result},
};

static DIAGNOSTIC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(.*?):(\d+):(\d+):\s*(fatal error|error|warning|note):\s*(.*)$").expect("diagnostic regex is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl Severity {
    fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Note => "note",
        }
    }
}

/// A parsed `file:line:col: severity: message` line from a C compiler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerDiagnostic {
    pub file: String,
    /// 1-based, as printed by the compiler.
    pub line: u32,
    pub column: u32,
    pub severity: Severity,
    pub message: String,
}

impl Display for CompilerDiagnostic {
    fn fmt(
        &self,
        f: &mut Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "{}:{}:{}: {}: {}", self.file, self.line, self.column, self.severity.as_str(), self.message)
    }
}

/// Parse every diagnostic line of a compiler's stderr, skipping context lines.
pub fn parse_diagnostics(output: &str) -> Vec<CompilerDiagnostic> {
    output.lines().filter_map(parse_diagnostic_line).collect()
}

fn parse_diagnostic_line(line: &str) -> Option<CompilerDiagnostic> {
    let caps = DIAGNOSTIC_RE.captures(line)?;

    let severity = match caps.get(4)?.as_str() {
        "fatal error" | "error" => Severity::Error,
        "warning" => Severity::Warning,
        _ => Severity::Note,
    };

    Some(CompilerDiagnostic {
        file: caps.get(1)?.as_str().to_owned(),
        line: caps.get(2)?.as_str().parse().ok()?,
        column: caps.get(3)?.as_str().parse().ok()?,
        severity,
        message: caps.get(5)?.as_str().to_owned(),
    })
}

/// Captured result of one external tool run.
#[derive(Debug)]
pub(crate) struct ToolOutput {
    pub(crate) status: ExitStatus,
    pub(crate) stdout: String,
    pub(crate) stderr: String,
}

impl ToolOutput {
    pub(crate) fn success(&self) -> bool {
        self.status.success()
    }

    /// Stderr followed by stdout, for error reports.
    pub(crate) fn combined(&self) -> String {
        let stderr = self.stderr.trim_end();
        let stdout = self.stdout.trim_end();
        match (stderr.is_empty(), stdout.is_empty()) {
            (true, true) => format!("process exited with status {}", self.status),
            (false, true) => stderr.to_owned(),
            (true, false) => stdout.to_owned(),
            (false, false) => format!("{stderr}\n{stdout}"),
        }
    }
}

pub(crate) fn tool_command(program: &str) -> Command {
    let mut command = Command::new(program);
    command.kill_on_drop(true).stdin(Stdio::null()).stdout(Stdio::piped()).stderr(Stdio::piped());
    command
}

/// Run `program` to completion and capture its output. There is no timeout.
pub(crate) async fn run_tool(
    program: &str,
    args: &[String],
) -> Result<ToolOutput> {
    debug!("Running: {} {}", program, args.join(" "));

    let output = tool_command(program).args(args).output().await.map_err(|error| NormalizeError::ToolLaunch {
        tool: program.to_owned(),
        reason: match error.kind() {
            std::io::ErrorKind::NotFound => "command not found".to_owned(),
            _ => error.to_string(),
        },
    })?;

    let output = ToolOutput {
        status: output.status,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };
    if !output.success() {
        debug!("{program} exited with {}", output.status);
    }
    Ok(output)
}

/// Run the C preprocessor over `file` and return the expanded text.
pub(crate) async fn preprocess(
    tools: &ToolSettings,
    file: &Path,
) -> Result<String> {
    let mut args = tools.preprocessor_flags.clone();
    args.push(file.display().to_string());

    let output = run_tool(&tools.preprocessor, &args).await?;
    if !output.success() {
        return Err(NormalizeError::PreprocessError {
            path: file.to_path_buf(),
            output: output.combined(),
        });
    }
    Ok(output.stdout)
}

/// Compile `file` to an object in `object_path`, failing on a non-zero exit.
pub(crate) async fn validate_compiles(
    tools: &ToolSettings,
    file: &Path,
    object_path: &Path,
    include_dirs: &[String],
) -> Result<()> {
    let mut args = tools.compiler_flags.clone();
    for dir in include_dirs {
        args.push("-I".to_owned());
        args.push(dir.clone());
    }
    args.extend([
        "-c".to_owned(),
        file.display().to_string(),
        "-o".to_owned(),
        object_path.display().to_string(),
    ]);

    let output = run_tool(&tools.compiler, &args).await?;
    if output.success() {
        return Ok(());
    }

    let diagnostics = parse_diagnostics(&output.stderr);
    for diagnostic in diagnostics.iter().filter(|d| d.severity == Severity::Error) {
        warn!("[validate] {diagnostic}");
    }
    Err(NormalizeError::CompileValidationError {
        path: file.to_path_buf(),
        diagnostics,
        output: output.combined(),
    })
}

/// Whether `program` can be launched and answers `--version`.
pub async fn tool_available(program: &str) -> bool {
    tool_command(program).arg("--version").output().await.is_ok_and(|o| o.status.success())
}

#[cfg(test)]
#[path = "../tests/src/tools_tests.rs"]
mod tests;
