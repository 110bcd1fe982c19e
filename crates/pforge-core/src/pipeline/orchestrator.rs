//! The pipeline state machine.
//!
//! ```text
//! Start ──► DomainCompile ──► [ModelCheck] ──► [GenerateProject] ──► [NativeBuild] ──► Done
//!               │                  │                  │                   │
//!               └──────────────────┴──────────────────┴───────────────────┴──► Failed
//! ```
//!
//! Stages run strictly in order and each blocks until its tool exits. The
//! first failure stops the run; artifacts from earlier stages stay on disk.

use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::Path;

use crate::artifacts::ArtifactSet;
use crate::config::ToolchainConfig;
use crate::entry_point::{EntryPointExtractor, EntryPointInfo, MainMachinePattern};
use crate::error::{Error, Result};
use crate::invoke::{Invocation, ProcessInvoker, StageInvoker, StageResult};
use crate::report::{self, BuildOutcome};

use super::callback::PipelineCallback;
use super::support::SupportFileGuard;
use super::{PipelineRequest, Stage};

/// Summary of a successful run.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    /// Stages that ran, in order.
    pub stages_run: Vec<Stage>,

    /// Artifact layout used by the run.
    pub artifacts: ArtifactSet,

    /// Main machine, when project generation ran.
    pub main_machine: Option<EntryPointInfo>,
}

impl PipelineReport {
    /// The native binary, if the native build ran.
    pub fn binary_path(&self) -> Option<&Path> {
        self.stages_run
            .contains(&Stage::NativeBuild)
            .then_some(self.artifacts.binary_path.as_path())
    }
}

/// Drives the toolchain stages for a [`PipelineRequest`].
pub struct PipelineOrchestrator {
    /// Tool locations
    toolchain: ToolchainConfig,
    /// Process runner
    invoker: Box<dyn StageInvoker>,
    /// Main machine extraction
    extractor: Box<dyn EntryPointExtractor>,
    /// Progress reporting
    callback: Option<Box<dyn PipelineCallback>>,
}

impl PipelineOrchestrator {
    /// Create an orchestrator that runs real processes.
    pub fn new(toolchain: ToolchainConfig) -> Self {
        Self {
            toolchain,
            invoker: Box::new(ProcessInvoker::new()),
            extractor: Box::new(MainMachinePattern::new()),
            callback: None,
        }
    }

    /// Replace the process runner.
    pub fn with_invoker(mut self, invoker: impl StageInvoker + 'static) -> Self {
        self.invoker = Box::new(invoker);
        self
    }

    /// Replace the main machine extractor.
    pub fn with_extractor(mut self, extractor: impl EntryPointExtractor + 'static) -> Self {
        self.extractor = Box::new(extractor);
        self
    }

    /// Set the progress callback.
    pub fn set_callback(&mut self, callback: impl PipelineCallback + 'static) {
        self.callback = Some(Box::new(callback));
    }

    /// Run every enabled stage in order, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// - [`Error::Io`] if the output directory, source file, or support file
    ///   cannot be accessed
    /// - [`Error::StageFailed`] if a tool fails, carrying its full output
    /// - [`Error::Extraction`] if project generation is enabled and the
    ///   source declares no main machine
    pub fn run(&self, request: &PipelineRequest) -> Result<PipelineReport> {
        let artifacts = ArtifactSet::locate(request);

        fs::create_dir_all(&artifacts.domain_compiler_output_dir)
            .map_err(|e| Error::io(&artifacts.domain_compiler_output_dir, e))?;

        let mut report = PipelineReport {
            stages_run: Vec::new(),
            artifacts,
            main_machine: None,
        };

        for stage in request.planned_stages() {
            tracing::info!("Starting {}", stage);
            if let Some(callback) = &self.callback {
                callback.on_stage_started(stage);
            }

            let outcome = match stage {
                Stage::DomainCompile => self.domain_compile(request, &report.artifacts),
                Stage::ModelCheck => self.model_check(&report.artifacts),
                Stage::GenerateProject => {
                    self.generate_project(request).map(|info| {
                        report.main_machine = Some(info);
                    })
                }
                Stage::NativeBuild => self.native_build(&report.artifacts),
            };

            if let Err(e) = outcome {
                tracing::info!("{} failed: {}", stage, e);
                if let Some(callback) = &self.callback {
                    callback.on_stage_failed(stage, &e);
                }
                return Err(e);
            }

            tracing::info!("Finished {}", stage);
            if let Some(callback) = &self.callback {
                callback.on_stage_completed(stage);
            }
            report.stages_run.push(stage);
        }

        Ok(report)
    }

    /// Compile the P program into intermediate artifacts.
    fn domain_compile(&self, request: &PipelineRequest, artifacts: &ArtifactSet) -> Result<()> {
        let invocation = Invocation::new(&self.toolchain.domain_compiler)
            .arg("/doNotErase")
            .arg(request.source_path())
            .arg(&self.toolchain.data_dir)
            .arg(prefixed("/outputDir:", artifacts.domain_compiler_output_dir.as_os_str()));

        let result = self.invoker.invoke(&invocation);
        check_exit(Stage::DomainCompile, result)
    }

    /// Compile the Zing model into a library, with the runtime support file
    /// present in the output directory only for the duration of the call.
    fn model_check(&self, artifacts: &ArtifactSet) -> Result<()> {
        let support = SupportFileGuard::copy(
            &self.toolchain.runtime_support_file,
            &artifacts.model_checker_support_file,
        )?;

        let invocation = Invocation::new(&self.toolchain.model_checker)
            .arg("-nowarning:292")
            .arg(file_name(&artifacts.model_checker_source_file))
            .arg(file_name(support.path()))
            .arg(prefixed("/out:", &file_name(&artifacts.model_checker_output_library)))
            .current_dir(&artifacts.domain_compiler_output_dir);

        let result = self.invoker.invoke(&invocation);
        let removed = support.remove();
        check_exit(Stage::ModelCheck, result)?;
        removed
    }

    /// Find the main machine and generate the native project around it.
    fn generate_project(&self, request: &PipelineRequest) -> Result<EntryPointInfo> {
        let source_path = request.source_path();
        let bytes = fs::read(source_path).map_err(|e| Error::io(source_path, e))?;
        let source = report::decode(&bytes);

        let main = self
            .extractor
            .extract_main_unit(&source)
            .ok_or_else(|| Error::Extraction {
                path: source_path.to_path_buf(),
            })?;

        tracing::info!("Main machine is {}", main.unit_name);
        if let Some(callback) = &self.callback {
            callback.on_main_machine(&main.unit_name);
        }

        let harness = if self.toolchain.generator_test_harness {
            "true"
        } else {
            "false"
        };

        let invocation = Invocation::new(&self.toolchain.project_generator)
            .arg(request.output_dir())
            .arg(request.unit_name())
            .arg(&self.toolchain.include_dir)
            .arg(&self.toolchain.lib_dir)
            .arg(&main.unit_name)
            .arg(harness);

        let result = self.invoker.invoke(&invocation);
        check_exit(Stage::GenerateProject, result)?;
        Ok(main)
    }

    /// Build the generated project.
    ///
    /// Success is decided by the build tool's output, not its exit status.
    fn native_build(&self, artifacts: &ArtifactSet) -> Result<()> {
        let invocation = Invocation::new(&self.toolchain.native_build).arg(&artifacts.project_file);

        let result = self.invoker.invoke(&invocation);
        let outcome = report::classify_build_output(&result.normalized_output);
        tracing::debug!(
            "Native build outcome: {:?} (exit status success: {})",
            outcome,
            result.succeeded
        );

        if report::classify_success(&result.normalized_output) {
            return Ok(());
        }

        if outcome == BuildOutcome::Inconclusive {
            tracing::warn!("Native build output has no success marker, treating as failure");
        }

        Err(Error::StageFailed {
            stage: Stage::NativeBuild,
            output: result.normalized_output,
        })
    }
}

fn check_exit(stage: Stage, result: StageResult) -> Result<()> {
    if result.succeeded {
        Ok(())
    } else {
        Err(Error::StageFailed {
            stage,
            output: result.normalized_output,
        })
    }
}

fn file_name(path: &Path) -> OsString {
    path.file_name()
        .unwrap_or(path.as_os_str())
        .to_os_string()
}

fn prefixed(prefix: &str, value: &OsStr) -> OsString {
    let mut arg = OsString::from(prefix);
    arg.push(value);
    arg
}
