//! Feature registry.

use crate::backend::Backend;
use crate::config::{FeatureConfig, RegistryConfig};
use crate::error::{FeatureError, FeatureResult};
use crate::feature::{EvaluationContext, Feature};
use crate::group::Group;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::info;

/// Table of declared features sharing one backend.
///
/// Features are built on first lookup and cached; every later lookup of
/// the same identifier returns the same instance.
pub struct Registry {
    backend: Arc<dyn Backend>,
    declarations: RwLock<Vec<FeatureConfig>>,
    features: RwLock<HashMap<String, Arc<Feature>>>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            declarations: RwLock::new(Vec::new()),
            features: RwLock::new(HashMap::new()),
        }
    }

    /// Create a registry from validated declarations.
    ///
    /// # Examples
    ///
    /// ```
    /// use signalbox_features::*;
    /// use std::sync::Arc;
    ///
    /// let config = RegistryConfig::new()
    ///     .with_feature(FeatureConfig::new("dark_mode"))
    ///     .with_feature(FeatureConfig::new("beta_api").with_default(false).with_group("beta_testers"));
    ///
    /// let registry = Registry::from_config(config, Arc::new(InMemoryBackend::new())).unwrap();
    /// assert!(registry.is_declared("beta_api"));
    /// ```
    pub fn from_config(config: RegistryConfig, backend: Arc<dyn Backend>) -> FeatureResult<Self> {
        config.validate()?;
        Ok(Self {
            backend,
            declarations: RwLock::new(config.features),
            features: RwLock::new(HashMap::new()),
        })
    }

    /// Add a declaration at runtime.
    pub fn declare(&self, config: FeatureConfig) -> FeatureResult<()> {
        config.validate()?;

        let mut declarations = self.declarations.write();
        if declarations.iter().any(|d| d.name == config.name) {
            return Err(FeatureError::InvalidConfiguration(format!(
                "feature {} is declared more than once",
                config.name
            )));
        }
        declarations.push(config);
        Ok(())
    }

    /// Check whether `id` has a declaration.
    pub fn is_declared(&self, id: &str) -> bool {
        self.declarations.read().iter().any(|d| d.name == id)
    }

    /// Shared backend.
    pub fn backend(&self) -> &Arc<dyn Backend> {
        &self.backend
    }

    /// Get the feature declared as `id`, building it on first use.
    ///
    /// Never reads the backend.
    pub fn feature_for(&self, id: &str) -> FeatureResult<Arc<Feature>> {
        if let Some(feature) = self.features.read().get(id) {
            return Ok(Arc::clone(feature));
        }

        let config = self
            .declarations
            .read()
            .iter()
            .find(|d| d.name == id)
            .cloned()
            .ok_or_else(|| FeatureError::UnknownFeature(id.to_string()))?;

        Ok(self.get_or_build(&config))
    }

    /// Resolve the feature `id` for `context`.
    pub async fn is_enabled(&self, id: &str, context: &EvaluationContext) -> FeatureResult<bool> {
        let feature = self.feature_for(id)?;
        feature.resolve(context).await
    }

    /// All declared features, in declaration order.
    pub fn known_features(&self) -> Vec<Arc<Feature>> {
        let declarations = self.declarations.read().clone();
        declarations
            .iter()
            .map(|config| self.get_or_build(config))
            .collect()
    }

    /// A view of the group `name` over the shared backend.
    pub fn group(&self, name: impl Into<String>) -> Group {
        Group::new(name, Arc::clone(&self.backend))
    }

    /// Clear all backend state. Declarations and cached features stay.
    pub async fn reset(&self) -> FeatureResult<()> {
        info!("Resetting feature backend");
        self.backend.reset().await
    }

    fn get_or_build(&self, config: &FeatureConfig) -> Arc<Feature> {
        // Re-check under the write lock so concurrent first lookups build once.
        let mut features = self.features.write();
        let feature = features.entry(config.name.clone()).or_insert_with(|| {
            info!(feature = %config.name, groups = config.groups.len(), "Registering feature");
            Arc::new(Feature::from_config(config, Arc::clone(&self.backend)))
        });
        Arc::clone(feature)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("declarations", &*self.declarations.read())
            .field("cached", &self.features.read().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryBackend;

    fn registry() -> Registry {
        let config = RegistryConfig::new()
            .with_feature(FeatureConfig::new("dark_mode"))
            .with_feature(FeatureConfig::new("beta_api").with_default(false).with_group("beta_testers"))
            .with_feature(FeatureConfig::new("rollout").with_group("region_us"));
        Registry::from_config(config, Arc::new(InMemoryBackend::new())).unwrap()
    }

    #[test]
    fn test_same_instance() {
        let registry = registry();
        let first = registry.feature_for("beta_api").unwrap();
        let second = registry.feature_for("beta_api").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_unknown_feature() {
        let registry = registry();
        assert!(matches!(
            registry.feature_for("missing"),
            Err(FeatureError::UnknownFeature(id)) if id == "missing"
        ));
    }

    #[test]
    fn test_known_features_order() {
        let registry = registry();
        // Warm the cache out of order.
        registry.feature_for("rollout").unwrap();

        let names: Vec<_> = registry
            .known_features()
            .iter()
            .map(|f| f.name().to_string())
            .collect();
        assert_eq!(names, vec!["dark_mode", "beta_api", "rollout"]);

        let cached = registry.feature_for("rollout").unwrap();
        assert!(Arc::ptr_eq(&cached, &registry.known_features()[2]));
    }

    #[test]
    fn test_declare() {
        let registry = registry();
        registry.declare(FeatureConfig::new("maintenance")).unwrap();
        assert!(registry.is_declared("maintenance"));

        assert!(matches!(
            registry.declare(FeatureConfig::new("dark_mode")),
            Err(FeatureError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_from_config_rejects_duplicates() {
        let config = RegistryConfig::new()
            .with_feature(FeatureConfig::new("dark_mode"))
            .with_feature(FeatureConfig::new("dark_mode"));
        assert!(Registry::from_config(config, Arc::new(InMemoryBackend::new())).is_err());
    }

    #[tokio::test]
    async fn test_is_enabled() {
        let registry = registry();
        assert!(registry.is_enabled("dark_mode", &EvaluationContext::new()).await.unwrap());
        assert!(!registry.is_enabled("beta_api", &EvaluationContext::new()).await.unwrap());

        registry.group("beta_testers").add_member("user42").await.unwrap();
        let context = EvaluationContext::new().for_any(["user42"]);
        assert!(registry.is_enabled("beta_api", &context).await.unwrap());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_concurrent_first_access() {
        let registry = Arc::new(registry());
        let barrier = Arc::new(tokio::sync::Barrier::new(16));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let registry = Arc::clone(&registry);
                let barrier = Arc::clone(&barrier);
                tokio::spawn(async move {
                    barrier.wait().await;
                    registry.feature_for("rollout").unwrap()
                })
            })
            .collect();

        let mut features = Vec::new();
        for handle in handles {
            features.push(handle.await.unwrap());
        }
        assert!(features.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    }
}
