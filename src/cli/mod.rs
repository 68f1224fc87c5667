//! Command line interface for oci2docker.
//!
//! A thin shell over [`Converter`]: parses arguments, builds settings, runs
//! one conversion and maps the outcome to an exit code.

mod args;
mod output;

pub use args::{Args, Command, ConvertArgs, RuntimeConfig};
pub use output::OutputManager;

use crate::converter::{ConversionReport, Converter, Outcome};
use crate::error::{CliError, Result};

/// Exit code for a completed conversion
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code when usage help was shown instead of converting
pub const EXIT_USAGE: i32 = 2;

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    run_with(Args::parse_args()).await
}

/// Executes already parsed arguments
pub async fn run_with(args: Args) -> Result<i32> {
    match args.command {
        Command::Convert(convert) => run_convert(&convert).await,
    }
}

async fn run_convert(args: &ConvertArgs) -> Result<i32> {
    args.validate()
        .map_err(|reason| CliError::InvalidArguments { reason })?;

    let runtime_config = RuntimeConfig::from(args);
    let output = runtime_config.output();
    let converter = Converter::new(args.settings()?)?;

    match converter.convert(&args.oci_bundle).await? {
        Outcome::Converted(report) => {
            print_report(output, &report).map_err(CliError::from)?;
            Ok(EXIT_SUCCESS)
        }
        Outcome::HelpRequested { bundle } => {
            output
                .failure(&format!("OCI bundle not found: {}\n", bundle.display()))
                .map_err(CliError::from)?;
            output
                .error(&Args::subcommand_help("convert"))
                .map_err(CliError::from)?;
            Ok(EXIT_USAGE)
        }
    }
}

fn print_report(output: &OutputManager, report: &ConversionReport) -> std::io::Result<()> {
    for warning in &report.warnings {
        output.warn(warning)?;
    }

    if output.is_quiet() {
        return output.result(&report.build_context.path().display().to_string());
    }

    let context = &report.build_context;
    let copy = context.copy_report();
    output.verbose(&format!(
        "Copied {} files, {} directories, {} symlinks{}",
        copy.files,
        copy.directories,
        copy.symlinks,
        if copy.is_complete() { "" } else { " (incomplete)" }
    ))?;
    if let Some(digest) = context.digest() {
        output.verbose(&format!("rootfs sha256 {}", digest.staged))?;
    }
    output.verbose(&format!("Dockerfile: {}", context.dockerfile_path().display()))?;

    output.success(&format!("Build context created: {}", context.path().display()))?;
    output.info("Dockerfile generated, you can build the image with:")?;
    output.info(&format!("$ {}", report.suggested_command()))
}
