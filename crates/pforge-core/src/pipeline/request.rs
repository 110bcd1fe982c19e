//! Pipeline requests and the stages they enable.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// One step of the toolchain, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    /// P source to intermediate C and Zing artifacts. Always runs.
    DomainCompile,
    /// Zing model to a verification library.
    ModelCheck,
    /// Generated C to a native build project.
    GenerateProject,
    /// Native build project to an executable.
    NativeBuild,
}

impl Stage {
    /// All stages in pipeline order.
    pub const ALL: [Stage; 4] = [
        Stage::DomainCompile,
        Stage::ModelCheck,
        Stage::GenerateProject,
        Stage::NativeBuild,
    ];

    /// Human-readable stage name.
    pub fn name(self) -> &'static str {
        match self {
            Self::DomainCompile => "domain compile",
            Self::ModelCheck => "model check",
            Self::GenerateProject => "project generation",
            Self::NativeBuild => "native build",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The optional stages switched on for a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnabledStages {
    pub model_check: bool,
    pub generate_project: bool,
    pub native_build: bool,
}

impl EnabledStages {
    /// Whether `stage` will run. The domain compiler is always on.
    pub fn contains(&self, stage: Stage) -> bool {
        match stage {
            Stage::DomainCompile => true,
            Stage::ModelCheck => self.model_check,
            Stage::GenerateProject => self.generate_project,
            Stage::NativeBuild => self.native_build,
        }
    }
}

/// Immutable description of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineRequest {
    source_path: PathBuf,
    output_dir: PathBuf,
    unit_name: String,
    stages: EnabledStages,
}

impl PipelineRequest {
    /// Validate and build a request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NativeBuildWithoutProject`] if the native build is
    /// enabled without project generation, or [`Error::Validation`] if no unit
    /// name can be derived from `source_path`.
    pub fn new(
        source_path: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        stages: EnabledStages,
    ) -> Result<Self> {
        let source_path = source_path.into();

        if stages.native_build && !stages.generate_project {
            return Err(Error::NativeBuildWithoutProject);
        }

        let unit_name = unit_name_of(&source_path).ok_or_else(|| {
            Error::Validation(format!(
                "cannot derive a unit name from '{}'",
                source_path.display()
            ))
        })?;

        Ok(Self {
            source_path,
            output_dir: output_dir.into(),
            unit_name,
            stages,
        })
    }

    /// Path to the P source file.
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// Directory every artifact is written into.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Base name of the source file, without extension.
    pub fn unit_name(&self) -> &str {
        &self.unit_name
    }

    /// Optional stages enabled for this run.
    pub fn stages(&self) -> EnabledStages {
        self.stages
    }

    /// Stages the orchestrator will attempt, in order.
    pub fn planned_stages(&self) -> Vec<Stage> {
        Stage::ALL
            .into_iter()
            .filter(|stage| self.stages.contains(*stage))
            .collect()
    }
}

fn unit_name_of(path: &Path) -> Option<String> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty())
}
