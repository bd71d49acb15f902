//! CLI argument parsing.

use camino::Utf8PathBuf;
use clap::{Parser, ValueEnum};
use compiler_context::Feature;
use log::LevelFilter;

/// Assemble a fragment manifest and inspect its source map.
#[derive(Debug, Parser)]
#[command(name = "tact-srcmap")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Fragment manifest (JSON)
    pub manifest: Utf8PathBuf,

    /// Project configuration file (tact.config.json)
    #[arg(long)]
    pub config: Option<Utf8PathBuf>,

    /// Project whose options to use (defaults to the manifest's program name)
    #[arg(long, requires = "config")]
    pub project: Option<String>,

    /// Enable a feature (inline, debug, external, ipfsAbiGetter, interfacesGetter)
    #[arg(long = "feature")]
    pub features: Vec<Feature>,

    /// Output format
    #[arg(long, value_enum, default_value = "human")]
    pub output: OutputFormat,

    /// Output offsets to map back to source
    #[arg(long)]
    pub lookup: Vec<u32>,

    /// Write generated files and the source map to this directory
    #[arg(long = "out-dir")]
    pub out_dir: Option<Utf8PathBuf>,

    /// Basename for generated files (defaults to the manifest's program name)
    #[arg(long)]
    pub basename: Option<String>,

    /// Log level
    #[arg(long = "log-level", default_value = "warn")]
    pub log_level: LevelFilter,
}

/// Output format options.
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output
    Json,
    /// Machine-readable (tab-separated, one line per record)
    Machine,
}
