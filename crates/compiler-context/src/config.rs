//! Project configuration loading.

use crate::{CompilerContext, Feature};
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use std::fs;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// The file that was read.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON for this schema.
    #[error("failed to parse project configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// No project with the requested name exists.
    #[error("no project named `{0}` in configuration")]
    UnknownProject(String),
}

/// A project configuration file (`tact.config.json`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectConfig {
    /// Projects declared in the file.
    #[serde(default)]
    pub projects: Vec<Project>,
}

/// One compilable project.
#[derive(Debug, Clone, Deserialize)]
pub struct Project {
    /// Project name; used as the contract name and output basename.
    pub name: String,
    /// Entry source path.
    pub path: Utf8PathBuf,
    /// Output directory.
    pub output: Utf8PathBuf,
    /// Compiler options.
    #[serde(default)]
    pub options: ProjectOptions,
}

/// Compiler options of a project.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectOptions {
    /// Emit debug-only code paths.
    #[serde(default)]
    pub debug: Option<bool>,
    /// Emit external message handlers.
    #[serde(default)]
    pub external: Option<bool>,
    /// Emit the IPFS ABI getter.
    #[serde(default)]
    pub ipfs_abi_getter: Option<bool>,
    /// Emit the supported-interfaces getter.
    #[serde(default)]
    pub interfaces_getter: Option<bool>,
    /// Unstable options.
    #[serde(default)]
    pub experimental: Option<ExperimentalOptions>,
}

/// Options that are not yet stable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExperimentalOptions {
    /// Emit `inline` specifiers for inlinable functions.
    #[serde(default)]
    pub inline: Option<bool>,
}

impl ProjectConfig {
    /// Loads a configuration file.
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        log::debug!("loaded project configuration from {path}");
        Self::parse(&content)
    }

    /// Parses configuration text. Comments are allowed.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(&strip_json_comments(content))?)
    }

    /// Finds a project by name.
    pub fn project(&self, name: &str) -> Result<&Project, ConfigError> {
        self.projects
            .iter()
            .find(|project| project.name == name)
            .ok_or_else(|| ConfigError::UnknownProject(name.to_string()))
    }
}

impl ProjectOptions {
    /// Features switched on by these options.
    pub fn features(&self) -> Vec<Feature> {
        let inline = self.experimental.as_ref().and_then(|e| e.inline);
        [
            (Feature::Debug, self.debug),
            (Feature::External, self.external),
            (Feature::IpfsAbiGetter, self.ipfs_abi_getter),
            (Feature::InterfacesGetter, self.interfaces_getter),
            (Feature::Inline, inline),
        ]
        .into_iter()
        .filter(|(_, value)| *value == Some(true))
        .map(|(feature, _)| feature)
        .collect()
    }

    /// Builds a compilation context with these options applied.
    pub fn to_context(&self) -> CompilerContext {
        CompilerContext::with_features(self.features())
    }
}

/// Removes `//` and `/* */` comments outside of string literals.
fn strip_json_comments(json: &str) -> String {
    let mut result = String::with_capacity(json.len());
    let mut chars = json.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            result.push(c);
            if c == '"' {
                in_string = false;
            } else if c == '\\' {
                if let Some(next) = chars.next() {
                    result.push(next);
                }
            }
            continue;
        }

        match (c, chars.peek()) {
            ('"', _) => {
                result.push(c);
                in_string = true;
            }
            ('/', Some('/')) => {
                while chars.peek().is_some_and(|&next| next != '\n') {
                    chars.next();
                }
            }
            ('/', Some('*')) => {
                chars.next();
                while let Some(next) = chars.next() {
                    if next == '*' && chars.peek() == Some(&'/') {
                        chars.next();
                        break;
                    }
                }
            }
            _ => result.push(c),
        }
    }

    result
}
