//! Build command implementation for the pforge CLI.
//!
//! Validates the request, locates the toolchain and runs the pipeline.

use std::io::{self, Write};
use std::path::Path;
use std::time::Instant;

use pforge_core::report;
use pforge_core::{EnabledStages, Error, PipelineOrchestrator, PipelineRequest, ToolchainConfig};

use crate::colors;
use crate::progress::TerminalProgress;

/// Result type for CLI operations.
pub type CliResult = anyhow::Result<()>;

/// Arguments for one build.
pub struct BuildArgs<'a> {
    pub input: &'a Path,
    pub output: &'a Path,
    pub stages: EnabledStages,
    pub toolchain_root: Option<&'a Path>,
}

/// Build a P program.
pub fn execute(args: &BuildArgs<'_>) -> CliResult {
    // Flag combinations are checked before anything touches the filesystem.
    let request = PipelineRequest::new(args.input, args.output, args.stages)?;

    if !args.input.exists() {
        return Err(Error::Validation(format!(
            "input not found: {} (current directory: {})",
            args.input.display(),
            std::env::current_dir()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "<unknown>".to_string())
        ))
        .into());
    }

    let toolchain = ToolchainConfig::discover(args.toolchain_root)?;
    tracing::debug!("Toolchain: {:?}", toolchain);

    let start = Instant::now();

    println!(
        "\n{}pforge{} - Building {}{}{}\n",
        colors::BOLD,
        colors::RESET,
        colors::CYAN,
        args.input.file_name().unwrap_or_default().to_string_lossy(),
        colors::RESET
    );

    let mut orchestrator = PipelineOrchestrator::new(toolchain);
    orchestrator.set_callback(TerminalProgress);
    let report = orchestrator.run(&request)?;

    let duration = start.elapsed();

    println!();
    match report.binary_path() {
        Some(binary) => println!("{}Built:{} {}", colors::GREEN, colors::RESET, binary.display()),
        None => println!(
            "{}Output:{} {}",
            colors::GREEN,
            colors::RESET,
            request.output_dir().display()
        ),
    }
    println!(
        "{}Stages:{} {}",
        colors::DIM,
        colors::RESET,
        report
            .stages_run
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!(
        "{}Time:{} {:.2}s",
        colors::DIM,
        colors::RESET,
        duration.as_secs_f64()
    );

    Ok(())
}

/// Print a failure with all captured tool output to stderr.
pub fn report_failure(err: &anyhow::Error) {
    let stderr = io::stderr();
    let mut out = stderr.lock();

    let _ = writeln!(out, "{}error:{} {}", colors::RED, colors::RESET, err);

    if let Some(core_err) = err.downcast_ref::<Error>() {
        let lines = core_err.diagnostic_lines();
        if !lines.is_empty() {
            let _ = writeln!(out);
            let _ = report::write_lines(&mut out, lines);
        }
        if let Some(hint) = core_err.hint() {
            let _ = writeln!(out, "\n{}hint:{} {}", colors::YELLOW, colors::RESET, hint);
        }
    }
}

/// Exit status for a failed run.
pub fn exit_code(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<Error>()
        .map_or(pforge_core::error::PIPELINE_EXIT_CODE, Error::exit_code)
}
