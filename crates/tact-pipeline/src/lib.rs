//! Compilation pipeline.
//!
//! [`compile`] runs a [`Backend`] in two steps (ABI construction, then program
//! emission) and bundles the emitted files with the program's [`SourceMap`].
//! [`FragmentBackend`] is a backend that assembles a program from a JSON manifest of
//! pre-generated fragments.

mod error;
mod fragments;

pub use error::PipelineError;
pub use fragments::{Fragment, FragmentAbi, FragmentBackend, FragmentKind, FragmentManifest};

use compiler_context::CompilerContext;
use serde::Serialize;
use source_map::SourceMap;

/// A generated output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputFile {
    /// File name, relative to the output directory.
    pub name: String,
    /// File contents.
    pub code: String,
}

/// Everything a backend emits for one program.
#[derive(Debug, Clone)]
pub struct WrittenProgram {
    /// Name of the file execution starts from.
    pub entrypoint: String,
    /// Emitted files.
    pub files: Vec<OutputFile>,
    /// Serialized ABI.
    pub abi: String,
    /// Correspondence between the entrypoint's text and the original sources.
    pub locations: SourceMap,
}

/// Emitted program text and its ABI.
#[derive(Debug, Clone, Serialize)]
pub struct CompileOutput {
    pub entrypoint: String,
    pub files: Vec<OutputFile>,
    pub abi: String,
}

/// The result of [`compile`].
#[derive(Debug, Clone, Serialize)]
pub struct CompileResult {
    pub output: CompileOutput,
    pub locations: SourceMap,
}

/// A code generator driven by [`compile`].
pub trait Backend {
    /// The backend's structured ABI description.
    type Abi;

    /// Computes the ABI of the program called `name`.
    fn create_abi(&self, ctx: &CompilerContext, name: &str) -> Result<Self::Abi, PipelineError>;

    /// Emits the program described by `abi`, naming output files after `basename`.
    fn write_program(
        &self,
        ctx: &CompilerContext,
        abi: &Self::Abi,
        basename: &str,
    ) -> Result<WrittenProgram, PipelineError>;
}

/// Compiles one program.
pub fn compile<B: Backend>(
    ctx: &CompilerContext,
    backend: &B,
    name: &str,
    basename: &str,
) -> Result<CompileResult, PipelineError> {
    log::debug!("creating ABI for `{name}`");
    let abi = backend.create_abi(ctx, name)?;

    log::debug!("writing program `{basename}`");
    let written = backend.write_program(ctx, &abi, basename)?;
    log::debug!(
        "`{basename}`: {} files, {} source locations",
        written.files.len(),
        written.locations.len()
    );

    Ok(CompileResult {
        output: CompileOutput {
            entrypoint: written.entrypoint,
            files: written.files,
            abi: written.abi,
        },
        locations: written.locations,
    })
}
