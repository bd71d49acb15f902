//! Feature flag storage.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A value stored under a feature key.
///
/// Only `Bool(true)` counts as enabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    /// A boolean switch.
    Bool(bool),
    /// A string setting.
    Str(String),
    /// An explicitly cleared key.
    Null,
}

/// Features known to the code generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    /// Emit `inline` specifiers for inlinable functions.
    Inline,
    /// Emit debug-only code paths.
    Debug,
    /// Emit external message handlers.
    External,
    /// Emit the IPFS ABI getter.
    IpfsAbiGetter,
    /// Emit the supported-interfaces getter.
    InterfacesGetter,
}

impl Feature {
    /// All known features.
    pub const ALL: [Feature; 5] = [
        Feature::Inline,
        Feature::Debug,
        Feature::External,
        Feature::IpfsAbiGetter,
        Feature::InterfacesGetter,
    ];

    /// The key this feature is stored under.
    pub fn key(self) -> &'static str {
        match self {
            Feature::Inline => "inline",
            Feature::Debug => "debug",
            Feature::External => "external",
            Feature::IpfsAbiGetter => "ipfsAbiGetter",
            Feature::InterfacesGetter => "interfacesGetter",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Returned when parsing a feature name that is not known.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "unknown feature `{0}` (expected one of: inline, debug, external, ipfsAbiGetter, interfacesGetter)"
)]
pub struct UnknownFeature(pub String);

impl FromStr for Feature {
    type Err = UnknownFeature;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Feature::ALL
            .into_iter()
            .find(|feature| feature.key() == s)
            .ok_or_else(|| UnknownFeature(s.to_string()))
    }
}

/// Keyed feature values for one compilation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureFlags {
    values: FxHashMap<SmolStr, FeatureValue>,
}

impl FeatureFlags {
    /// Creates an empty flag store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the raw value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&FeatureValue> {
        self.values.get(key)
    }

    /// Stores `value` under `key`, replacing any previous value.
    pub fn set(&mut self, key: impl Into<SmolStr>, value: FeatureValue) {
        self.values.insert(key.into(), value);
    }

    /// Returns true only if `key` holds `Bool(true)`.
    pub fn is_enabled(&self, key: &str) -> bool {
        matches!(self.get(key), Some(FeatureValue::Bool(true)))
    }

    /// Sets `key` to `Bool(true)`.
    pub fn enable(&mut self, key: impl Into<SmolStr>) {
        let key = key.into();
        log::debug!("enabling feature `{key}`");
        self.set(key, FeatureValue::Bool(true));
    }

    /// Keys that are currently enabled, sorted.
    pub fn enabled_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .values
            .iter()
            .filter(|(_, value)| **value == FeatureValue::Bool(true))
            .map(|(key, _)| key.as_str())
            .collect();
        keys.sort_unstable();
        keys
    }
}
