//! pforge CLI - compile a P program into a native binary.

mod build;
mod colors;
mod progress;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use pforge_core::EnabledStages;

#[derive(Parser)]
#[command(name = "pforge")]
#[command(about = "Compile a P program and drive it through the native toolchain")]
#[command(version)]
struct Cli {
    /// The P file to compile
    #[arg(value_name = "INPUT.p")]
    input: PathBuf,

    /// Output directory for generated artifacts
    #[arg(value_name = "OUTPUT_DIR")]
    output: PathBuf,

    /// Run the Zing compiler on the generated model
    #[arg(long)]
    zc: bool,

    /// Generate a native project for the generated C code
    #[arg(long)]
    proj: bool,

    /// Build the generated C code (requires --proj)
    #[arg(long)]
    cc: bool,

    /// Root of the P toolchain (defaults to $PFORGE_ROOT)
    #[arg(long, value_name = "DIR")]
    toolchain_root: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::from_default_env()
            .add_directive(tracing::Level::DEBUG.into())
    } else {
        tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = build::BuildArgs {
        input: &cli.input,
        output: &cli.output,
        stages: EnabledStages {
            model_check: cli.zc,
            generate_project: cli.proj,
            native_build: cli.cc,
        },
        toolchain_root: cli.toolchain_root.as_deref(),
    };

    match build::execute(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            build::report_failure(&err);
            ExitCode::from(build::exit_code(&err))
        }
    }
}
