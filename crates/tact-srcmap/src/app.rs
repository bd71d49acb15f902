//! Runs the pipeline for one manifest and collects what to report.

use crate::cli::Args;
use camino::{Utf8Path, Utf8PathBuf};
use compiler_context::{CompilerContext, ConfigError, ProjectConfig};
use serde::Serialize;
use source_map::{Location, SourceMap};
use std::fs;
use tact_pipeline::{compile, FragmentBackend, FragmentManifest, PipelineError};
use text_size::TextSize;
use thiserror::Error;

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    /// Failed to read an input file.
    #[error("failed to read {path}: {source}")]
    Read {
        path: Utf8PathBuf,
        source: std::io::Error,
    },

    /// Failed to write an output file.
    #[error("failed to write {path}: {source}")]
    Write {
        path: Utf8PathBuf,
        source: std::io::Error,
    },

    /// The manifest is not valid.
    #[error("invalid manifest {path}: {source}")]
    Manifest {
        path: Utf8PathBuf,
        source: serde_json::Error,
    },

    /// Project configuration error.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Compilation error.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// The source map could not be serialized.
    #[error("failed to serialize source map: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// The answer to one `--lookup` query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Lookup {
    /// The queried output offset.
    pub offset: u32,
    /// Index into the source map's locations, if the offset is mapped.
    pub index: Option<usize>,
    /// The source location, if the offset is mapped.
    pub location: Option<Location>,
}

impl Lookup {
    /// Looks up `offset` in `map`.
    pub fn resolve(map: &SourceMap, offset: u32) -> Self {
        let offset_size = TextSize::from(offset);
        Self {
            offset,
            index: map.index_at(offset_size),
            location: map.location_at(offset_size).cloned(),
        }
    }
}

/// Everything produced by one run.
#[derive(Debug, Clone)]
pub struct Report {
    /// The generated entrypoint file name.
    pub entrypoint: String,
    /// The entrypoint's source map.
    pub source_map: SourceMap,
    /// Lookup results, in query order.
    pub lookups: Vec<Lookup>,
    /// Files written to `--out-dir`.
    pub written: Vec<Utf8PathBuf>,
}

/// Runs the pipeline according to `args`.
pub fn run(args: &Args) -> Result<Report, AppError> {
    let manifest = load_manifest(&args.manifest)?;

    let mut ctx = match &args.config {
        Some(config_path) => {
            let config = ProjectConfig::load(config_path)?;
            let project = args.project.as_deref().unwrap_or(&manifest.name);
            config.project(project)?.options.to_context()
        }
        None => CompilerContext::new(),
    };
    for feature in &args.features {
        ctx.enable(*feature);
    }
    log::info!("enabled features: {:?}", ctx.features().enabled_keys());

    let name = manifest.name.clone();
    let basename = args.basename.clone().unwrap_or_else(|| name.clone());
    let backend = FragmentBackend::new(manifest)?;
    let result = compile(&ctx, &backend, &name, &basename)?;

    let lookups = args
        .lookup
        .iter()
        .map(|&offset| Lookup::resolve(&result.locations, offset))
        .collect();

    let mut written = Vec::new();
    if let Some(out_dir) = &args.out_dir {
        fs::create_dir_all(out_dir).map_err(|source| AppError::Write {
            path: out_dir.clone(),
            source,
        })?;
        for file in &result.output.files {
            written.push(write_file(out_dir, &file.name, &file.code)?);
        }
        let source_map_json = serde_json::to_string_pretty(&result.locations)?;
        written.push(write_file(
            out_dir,
            &format!("{basename}.srcmap.json"),
            &source_map_json,
        )?);
    }

    Ok(Report {
        entrypoint: result.output.entrypoint,
        source_map: result.locations,
        lookups,
        written,
    })
}

fn load_manifest(path: &Utf8Path) -> Result<FragmentManifest, AppError> {
    let content = fs::read_to_string(path).map_err(|source| AppError::Read {
        path: path.to_owned(),
        source,
    })?;
    FragmentManifest::from_json(&content).map_err(|source| AppError::Manifest {
        path: path.to_owned(),
        source,
    })
}

fn write_file(dir: &Utf8Path, name: &str, contents: &str) -> Result<Utf8PathBuf, AppError> {
    let path = dir.join(name);
    fs::write(&path, contents).map_err(|source| AppError::Write {
        path: path.clone(),
        source,
    })?;
    log::debug!("wrote {path}");
    Ok(path)
}
