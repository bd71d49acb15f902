//! tact-srcmap: assemble fragment manifests and inspect their source maps.

mod app;
mod cli;
mod output;

use clap::Parser;
use cli::Args;
use miette::{IntoDiagnostic, Result, WrapErr};
use output::Formatter;

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .format_timestamp(None)
        .filter_level(args.log_level)
        .target(env_logger::Target::Stderr)
        .init();

    let report = app::run(&args)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to process {}", args.manifest))?;

    let formatted = Formatter::new(args.output)
        .format(&report)
        .into_diagnostic()?;
    print!("{formatted}");

    Ok(())
}
