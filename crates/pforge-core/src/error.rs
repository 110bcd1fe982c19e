//! Error types for pforge-core.

use std::path::PathBuf;

use thiserror::Error;

use crate::pipeline::Stage;

/// Result type for pforge-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Exit status for a rejected request (bad flag combination, missing input).
pub const VALIDATION_EXIT_CODE: u8 = 2;

/// Exit status for any failure once the pipeline has started.
pub const PIPELINE_EXIT_CODE: u8 = 255;

/// Errors that can occur while driving the toolchain.
#[derive(Debug, Error)]
pub enum Error {
    /// Contradictory or malformed request, detected before any stage runs.
    #[error("invalid request: {0}")]
    Validation(String),

    /// The native build was requested without project generation.
    #[error("invalid request: --cc requires --proj, the native build needs the generated project")]
    NativeBuildWithoutProject,

    /// No main machine declaration could be found in the source program.
    #[error("no main machine declaration found in {}", path.display())]
    Extraction { path: PathBuf },

    /// An external tool exited abnormally or reported a failed build.
    #[error("{stage} failed")]
    StageFailed { stage: Stage, output: Vec<String> },

    /// Filesystem error around a stage (support file, output directory, source).
    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Toolchain could not be located.
    #[error("toolchain error: {0}")]
    Toolchain(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the error was raised before any external tool was invoked.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::NativeBuildWithoutProject)
    }

    /// Captured tool output for stage failures; empty for everything else.
    pub fn diagnostic_lines(&self) -> &[String] {
        match self {
            Self::StageFailed { output, .. } => output,
            _ => &[],
        }
    }

    /// Process exit status this error should terminate with.
    pub fn exit_code(&self) -> u8 {
        if self.is_validation() {
            VALIDATION_EXIT_CODE
        } else {
            PIPELINE_EXIT_CODE
        }
    }

    /// A short recovery hint for the user, when one applies.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::NativeBuildWithoutProject => {
                Some("pass --proj together with --cc so the project file exists before building")
            }
            Self::Extraction { .. } => {
                Some("declare the entry point as `main machine <Name>` in the source program")
            }
            Self::Toolchain(_) => {
                Some("set PFORGE_ROOT or pass --toolchain-root to point at the P toolchain")
            }
            _ => None,
        }
    }
}
