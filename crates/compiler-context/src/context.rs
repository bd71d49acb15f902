//! The per-compilation context object.

use crate::{Feature, FeatureFlags};

/// State threaded through every stage of one compilation.
#[derive(Debug, Clone, Default)]
pub struct CompilerContext {
    features: FeatureFlags,
}

impl CompilerContext {
    /// Creates a context with no features enabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context with the given features enabled.
    pub fn with_features(features: impl IntoIterator<Item = Feature>) -> Self {
        let mut ctx = Self::new();
        for feature in features {
            ctx.enable(feature);
        }
        ctx
    }

    /// The feature flag store.
    #[inline]
    pub fn features(&self) -> &FeatureFlags {
        &self.features
    }

    /// Mutable access to the feature flag store.
    #[inline]
    pub fn features_mut(&mut self) -> &mut FeatureFlags {
        &mut self.features
    }

    /// Enables a known feature.
    pub fn enable(&mut self, feature: Feature) {
        self.features.enable(feature.key());
    }

    /// Returns true if a known feature is enabled.
    pub fn is_enabled(&self, feature: Feature) -> bool {
        self.features.is_enabled(feature.key())
    }

    pub fn enabled_inline(&self) -> bool {
        self.is_enabled(Feature::Inline)
    }

    pub fn enabled_debug(&self) -> bool {
        self.is_enabled(Feature::Debug)
    }

    pub fn enabled_externals(&self) -> bool {
        self.is_enabled(Feature::External)
    }

    pub fn enabled_ipfs_abi_getter(&self) -> bool {
        self.is_enabled(Feature::IpfsAbiGetter)
    }

    pub fn enabled_interfaces_getter(&self) -> bool {
        self.is_enabled(Feature::InterfacesGetter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FeatureValue;

    #[test]
    fn test_default_context_disables_everything() {
        let ctx = CompilerContext::new();
        assert!(!ctx.enabled_inline());
        assert!(!ctx.enabled_debug());
        assert!(!ctx.enabled_externals());
        assert!(!ctx.enabled_ipfs_abi_getter());
        assert!(!ctx.enabled_interfaces_getter());
    }

    #[test]
    fn test_with_features() {
        let ctx = CompilerContext::with_features([Feature::Debug, Feature::InterfacesGetter]);
        assert!(ctx.enabled_debug());
        assert!(ctx.enabled_interfaces_getter());
        assert!(!ctx.enabled_externals());
    }

    #[test]
    fn test_raw_store_is_shared_with_helpers() {
        let mut ctx = CompilerContext::new();
        ctx.features_mut()
            .set("external", FeatureValue::Str("on".to_string()));
        assert!(!ctx.enabled_externals());

        ctx.features_mut().enable("external");
        assert!(ctx.enabled_externals());
    }

    #[test]
    fn test_contexts_are_independent() {
        let mut a = CompilerContext::new();
        let b = CompilerContext::new();
        a.enable(Feature::Inline);
        assert!(a.enabled_inline());
        assert!(!b.enabled_inline());
    }
}
