//! Running external toolchain processes.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::report;

/// One external process call: executable, argument vector, working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    pub working_dir: Option<PathBuf>,
}

impl Invocation {
    /// Create an invocation that runs in the current directory.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Run the process in `dir`.
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Arguments as lossy strings, for logging and assertions.
    pub fn args_lossy(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect()
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Outcome of one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageResult {
    /// Whether the process exited successfully.
    pub succeeded: bool,

    /// Captured stdout followed by stderr, decoded lossily.
    pub raw_output: String,

    /// `raw_output` split into lines.
    pub normalized_output: Vec<String>,
}

impl StageResult {
    /// Build a result from raw captured bytes.
    pub fn from_bytes(succeeded: bool, raw: &[u8]) -> Self {
        let raw_output = report::decode(raw);
        let normalized_output = report::normalize(&raw_output);
        Self {
            succeeded,
            raw_output,
            normalized_output,
        }
    }

    /// A successful result with the given output.
    pub fn success(output: impl AsRef<str>) -> Self {
        Self::from_bytes(true, output.as_ref().as_bytes())
    }

    /// A failed result with the given output.
    pub fn failure(output: impl AsRef<str>) -> Self {
        Self::from_bytes(false, output.as_ref().as_bytes())
    }
}

/// Runs one external process to completion.
///
/// Implementations make exactly one attempt and never retry.
pub trait StageInvoker {
    fn invoke(&self, invocation: &Invocation) -> StageResult;
}

/// [`StageInvoker`] backed by [`std::process::Command`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessInvoker;

impl ProcessInvoker {
    pub fn new() -> Self {
        Self
    }
}

impl StageInvoker for ProcessInvoker {
    fn invoke(&self, invocation: &Invocation) -> StageResult {
        tracing::debug!("Running {}", invocation);

        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args);
        if let Some(dir) = &invocation.working_dir {
            tracing::debug!("  in {}", dir.display());
            cmd.current_dir(dir);
        }

        let output = match cmd.output() {
            Ok(output) => output,
            Err(e) => {
                tracing::debug!("Failed to start {}: {}", invocation.program.display(), e);
                return StageResult::failure(start_failure_message(&invocation.program, &e));
            }
        };

        tracing::debug!("{} exited with {}", invocation.program.display(), output.status);

        let mut combined = output.stdout;
        combined.extend_from_slice(&output.stderr);
        StageResult::from_bytes(output.status.success(), &combined)
    }
}

fn start_failure_message(program: &Path, error: &std::io::Error) -> String {
    if error.kind() == std::io::ErrorKind::NotFound {
        format!("{}: process not found", program.display())
    } else {
        format!("{}: failed to start: {}", program.display(), error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invocation_builder() {
        let invocation = Invocation::new("zc")
            .arg("-nowarning:292")
            .arg("output.zing")
            .current_dir("/tmp/out");

        assert_eq!(invocation.args_lossy(), vec!["-nowarning:292", "output.zing"]);
        assert_eq!(invocation.working_dir, Some(PathBuf::from("/tmp/out")));
        assert_eq!(invocation.to_string(), "zc -nowarning:292 output.zing");
    }

    #[test]
    fn test_missing_program() {
        let result = ProcessInvoker::new()
            .invoke(&Invocation::new("/nonexistent/pforge-test-tool").arg("x"));

        assert!(!result.succeeded);
        assert!(result.raw_output.contains("process not found"));
        assert_eq!(result.normalized_output.len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_exit_status_and_combined_output() {
        let ok = ProcessInvoker::new().invoke(
            &Invocation::new("sh")
                .arg("-c")
                .arg("echo out; echo err 1>&2"),
        );
        assert!(ok.succeeded);
        assert_eq!(ok.normalized_output, vec!["out", "err"]);

        let failed = ProcessInvoker::new().invoke(
            &Invocation::new("sh").arg("-c").arg("echo broken; exit 3"),
        );
        assert!(!failed.succeeded);
        assert_eq!(failed.normalized_output, vec!["broken"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_working_dir() {
        let temp = tempfile::TempDir::new().expect("Failed to create temp dir");
        let result = ProcessInvoker::new()
            .invoke(&Invocation::new("sh").arg("-c").arg("pwd").current_dir(temp.path()));

        assert!(result.succeeded);
        let reported = PathBuf::from(&result.normalized_output[0]);
        assert_eq!(
            reported.canonicalize().unwrap(),
            temp.path().canonicalize().unwrap()
        );
    }
}
