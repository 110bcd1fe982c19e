//! Core engine for pforge, the P compile-to-native build driver.
//!
//! This crate provides:
//! - Toolchain configuration (where the external tools live)
//! - Artifact naming for a run
//! - Main machine extraction from P source
//! - External process invocation and output normalization
//! - The pipeline orchestrator that chains the stages

pub mod artifacts;
pub mod config;
pub mod entry_point;
pub mod error;
pub mod invoke;
pub mod pipeline;
pub mod report;

pub use artifacts::ArtifactSet;
pub use config::ToolchainConfig;
pub use entry_point::{EntryPointExtractor, EntryPointInfo, MainMachinePattern};
pub use error::{Error, Result};
pub use invoke::{Invocation, ProcessInvoker, StageInvoker, StageResult};
pub use pipeline::{
    EnabledStages, PipelineCallback, PipelineOrchestrator, PipelineReport, PipelineRequest, Stage,
};
pub use report::{BuildOutcome, classify_success};
