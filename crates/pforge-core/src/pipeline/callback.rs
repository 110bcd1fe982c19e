//! Progress hooks for pipeline runs.

use crate::error::Error;

use super::Stage;

/// Receives progress notifications from the orchestrator.
///
/// The core never prints; front ends implement this to render progress.
pub trait PipelineCallback {
    /// Called before a stage invokes its tool.
    fn on_stage_started(&self, stage: Stage);

    /// Called after a stage finished successfully.
    fn on_stage_completed(&self, stage: Stage);

    /// Called once the main machine has been extracted.
    fn on_main_machine(&self, _name: &str) {}

    /// Called when a stage fails, before the pipeline stops.
    fn on_stage_failed(&self, _stage: Stage, _error: &Error) {}
}
