//! Administrative operations over a registry.
//!
//! Mirrors what an operator dashboard needs: listing features with their
//! stored state, flipping global values, and managing group members. No
//! transport is attached; callers translate results into notices.

use crate::backend::GlobalValue;
use crate::error::{FeatureError, FeatureResult};
use crate::registry::Registry;
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Snapshot of one feature for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureStatus {
    pub name: String,
    pub default: bool,
    pub groups: Vec<String>,
    /// Value stored in the backend
    pub stored: GlobalValue,
    /// Stored value, or the default when unset
    pub enabled: bool,
}

/// Administrative facade over a [`Registry`].
#[derive(Debug, Clone)]
pub struct FeatureAdmin {
    registry: Arc<Registry>,
}

impl FeatureAdmin {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Status of every declared feature, in declaration order.
    pub async fn list(&self) -> FeatureResult<Vec<FeatureStatus>> {
        let mut statuses = Vec::new();
        for feature in self.registry.known_features() {
            let stored = feature.global_value().await?;
            statuses.push(FeatureStatus {
                name: feature.name().to_string(),
                default: feature.default_value(),
                groups: feature.groups().iter().map(|g| g.name().to_string()).collect(),
                stored,
                enabled: stored.or_default(feature.default_value()),
            });
        }
        Ok(statuses)
    }

    pub async fn enable(&self, id: &str) -> FeatureResult<bool> {
        self.registry.feature_for(id)?.enable().await
    }

    pub async fn disable(&self, id: &str) -> FeatureResult<bool> {
        self.registry.feature_for(id)?.disable().await
    }

    pub async fn group_members(&self, group: &str) -> FeatureResult<BTreeSet<String>> {
        self.registry.group(group).members().await
    }

    /// Add `member` to `group`. An empty member ID is rejected.
    pub async fn add_member(&self, group: &str, member: &str) -> FeatureResult<bool> {
        if member.is_empty() {
            return Err(FeatureError::InvalidArgument("No member ID".to_string()));
        }
        self.registry.group(group).add_member(member).await
    }

    pub async fn remove_member(&self, group: &str, member: &str) -> FeatureResult<bool> {
        self.registry.group(group).remove_member(member).await
    }
}
