//! Compilation context shared by every pipeline stage.
//!
//! The context owns the feature flags that gate upstream producers. It is created once
//! per compilation and passed by reference; there is no process-wide flag state.

mod config;
mod context;
mod features;

pub use config::{ConfigError, ExperimentalOptions, Project, ProjectConfig, ProjectOptions};
pub use context::CompilerContext;
pub use features::{Feature, FeatureFlags, FeatureValue, UnknownFeature};
