//! Terminal progress output for pipeline runs.

use pforge_core::{Error, PipelineCallback, Stage};

use crate::colors;

/// Prints one line per pipeline event to stdout.
pub struct TerminalProgress;

impl TerminalProgress {
    fn label(stage: Stage) -> &'static str {
        match stage {
            Stage::DomainCompile => "Running PCompiler",
            Stage::ModelCheck => "Running zc",
            Stage::GenerateProject => "Generating project",
            Stage::NativeBuild => "Building generated C",
        }
    }
}

impl PipelineCallback for TerminalProgress {
    fn on_stage_started(&self, stage: Stage) {
        println!("{}  ◆ {}{} ...", colors::BLUE, Self::label(stage), colors::RESET);
    }

    fn on_stage_completed(&self, stage: Stage) {
        println!("    {}✓{} {}", colors::GREEN, colors::RESET, stage);
    }

    fn on_main_machine(&self, name: &str) {
        println!("    Main machine is {}{}{}", colors::CYAN, name, colors::RESET);
    }

    fn on_stage_failed(&self, stage: Stage, _error: &Error) {
        println!("    {}✗{} {}", colors::RED, colors::RESET, stage);
    }
}
