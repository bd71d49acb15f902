//! A backend that assembles programs from pre-generated fragments.
//!
//! A manifest lists fragments in emission order. Each fragment carries its code and
//! the source map entries it produced, in coordinates relative to the start of that
//! code. The backend decides which fragments to emit from the context's feature
//! flags, concatenates them, and resolves every fragment at its final offset.

use crate::{Backend, OutputFile, PipelineError, WrittenProgram};
use compiler_context::CompilerContext;
use serde::{Deserialize, Serialize};
use source_map::{Entry, Mapper};
use std::collections::HashSet;
use text_size::TextSize;

/// Separator between emitted fragments.
const SEPARATOR: &str = "\n\n";

/// Prefix for inlined fragments when the `inline` feature is on.
const INLINE_PREFIX: &str = "inline ";

/// Getter emitted when the `ipfsAbiGetter` feature is on.
const IPFS_ABI_GETTER: &str = "get_abi_ipfs";

/// Getter emitted when the `interfacesGetter` feature is on.
const INTERFACES_GETTER: &str = "supported_interfaces";

/// When a fragment is emitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FragmentKind {
    /// Always emitted.
    #[default]
    Normal,
    /// Emitted only with the `debug` feature.
    Debug,
    /// Emitted only with the `external` feature.
    External,
}

/// One pre-generated piece of program text.
#[derive(Debug, Clone, Deserialize)]
pub struct Fragment {
    /// Unique fragment name.
    pub name: String,
    /// The fragment's code.
    pub code: String,
    #[serde(default)]
    pub kind: FragmentKind,
    /// Whether the fragment may be marked `inline`.
    #[serde(default)]
    pub inline: bool,
    /// Entries relative to the start of `code`.
    #[serde(default)]
    pub entries: Vec<Entry>,
}

impl Fragment {
    fn is_emitted(&self, ctx: &CompilerContext) -> bool {
        match self.kind {
            FragmentKind::Normal => true,
            FragmentKind::Debug => ctx.enabled_debug(),
            FragmentKind::External => ctx.enabled_externals(),
        }
    }

    /// Rejects entries that would not map into this fragment's code.
    fn validate(&self) -> Result<(), PipelineError> {
        let len = TextSize::of(self.code.as_str());
        for entry in &self.entries {
            if entry.end < entry.start {
                return Err(PipelineError::InvalidEntry {
                    fragment: self.name.clone(),
                    loc: entry.loc.to_string(),
                    start: entry.start.into(),
                    end: entry.end.into(),
                });
            }
            if entry.end >= len {
                return Err(PipelineError::EntryOutOfBounds {
                    fragment: self.name.clone(),
                    end: entry.end.into(),
                    len: len.into(),
                });
            }
        }
        Ok(())
    }
}

/// A program described as a list of fragments.
#[derive(Debug, Clone, Deserialize)]
pub struct FragmentManifest {
    /// Program name.
    pub name: String,
    /// Fragments in emission order.
    #[serde(default)]
    pub fragments: Vec<Fragment>,
}

impl FragmentManifest {
    /// Parses a manifest from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// The ABI produced by [`FragmentBackend`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FragmentAbi {
    /// Program name.
    pub name: String,
    /// Emitted fragments, in order.
    pub functions: Vec<String>,
    /// Synthetic getters appended after the fragments.
    pub getters: Vec<String>,
}

/// Assembles a program from a [`FragmentManifest`].
#[derive(Debug, Clone)]
pub struct FragmentBackend {
    manifest: FragmentManifest,
}

impl FragmentBackend {
    /// Creates a backend, rejecting manifests with duplicate or reserved fragment names.
    pub fn new(manifest: FragmentManifest) -> Result<Self, PipelineError> {
        let mut seen = HashSet::new();
        for fragment in &manifest.fragments {
            if [IPFS_ABI_GETTER, INTERFACES_GETTER].contains(&fragment.name.as_str()) {
                return Err(PipelineError::ReservedFragmentName(fragment.name.clone()));
            }
            if !seen.insert(fragment.name.as_str()) {
                return Err(PipelineError::DuplicateFragment(fragment.name.clone()));
            }
        }
        Ok(Self { manifest })
    }

    fn fragment(&self, name: &str) -> Option<&Fragment> {
        self.manifest.fragments.iter().find(|f| f.name == name)
    }
}

impl Backend for FragmentBackend {
    type Abi = FragmentAbi;

    fn create_abi(&self, ctx: &CompilerContext, name: &str) -> Result<FragmentAbi, PipelineError> {
        let functions = self
            .manifest
            .fragments
            .iter()
            .filter(|fragment| fragment.is_emitted(ctx))
            .map(|fragment| fragment.name.clone())
            .collect();

        let mut getters = Vec::new();
        if ctx.enabled_ipfs_abi_getter() {
            getters.push(IPFS_ABI_GETTER.to_string());
        }
        if ctx.enabled_interfaces_getter() {
            getters.push(INTERFACES_GETTER.to_string());
        }

        Ok(FragmentAbi {
            name: name.to_string(),
            functions,
            getters,
        })
    }

    fn write_program(
        &self,
        ctx: &CompilerContext,
        abi: &FragmentAbi,
        basename: &str,
    ) -> Result<WrittenProgram, PipelineError> {
        let mut code = String::new();
        let mut mapper = Mapper::new();

        for name in &abi.functions {
            let fragment = self
                .fragment(name)
                .ok_or_else(|| PipelineError::UnknownFragment(name.clone()))?;
            fragment.validate()?;
            for entry in &fragment.entries {
                mapper.add_entry(name.as_str(), entry.clone());
            }

            if !code.is_empty() {
                code.push_str(SEPARATOR);
            }
            if fragment.inline && ctx.enabled_inline() {
                code.push_str(INLINE_PREFIX);
            }
            mapper.resolve(name, TextSize::of(code.as_str()));
            code.push_str(&fragment.code);
        }

        // Getters have no source counterpart and are never resolved.
        for getter in &abi.getters {
            if !code.is_empty() {
                code.push_str(SEPARATOR);
            }
            code.push_str(&format!("_ {getter}() method_id {{\n}}"));
        }

        let entrypoint = format!("{basename}.code.fc");
        let abi_json = serde_json::to_string_pretty(abi)?;
        log::debug!(
            "emitted {} bytes for `{}` from {} fragments",
            code.len(),
            abi.name,
            abi.functions.len()
        );

        Ok(WrittenProgram {
            entrypoint: entrypoint.clone(),
            files: vec![
                OutputFile {
                    name: entrypoint,
                    code,
                },
                OutputFile {
                    name: format!("{basename}.abi"),
                    code: abi_json.clone(),
                },
            ],
            abi: abi_json,
            locations: mapper.build_source_map(),
        })
    }
}
