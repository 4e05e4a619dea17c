//! In-memory backend.

use crate::backend::{Backend, GlobalValue};
use crate::error::FeatureResult;
use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap, HashSet};
use tokio::sync::RwLock;

/// Backend that keeps all state in process memory.
///
/// Flags and groups are held in separate maps, so feature and group
/// identifiers can never collide.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    flags: RwLock<HashMap<String, bool>>,
    groups: RwLock<HashMap<String, HashSet<String>>>,
}

impl InMemoryBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Backend for InMemoryBackend {
    async fn global_value(&self, feature: &str) -> FeatureResult<GlobalValue> {
        let flags = self.flags.read().await;
        Ok(flags
            .get(feature)
            .map(|enabled| GlobalValue::from(*enabled))
            .unwrap_or(GlobalValue::Unset))
    }

    async fn set_global_value(&self, feature: &str, enabled: bool) -> FeatureResult<bool> {
        self.flags.write().await.insert(feature.to_string(), enabled);
        Ok(true)
    }

    async fn add_member(&self, group: &str, member: &str) -> FeatureResult<bool> {
        let mut groups = self.groups.write().await;
        Ok(groups
            .entry(group.to_string())
            .or_default()
            .insert(member.to_string()))
    }

    async fn remove_member(&self, group: &str, member: &str) -> FeatureResult<bool> {
        let mut groups = self.groups.write().await;
        let Some(members) = groups.get_mut(group) else {
            return Ok(false);
        };

        let removed = members.remove(member);
        // An empty set is indistinguishable from a missing group.
        if members.is_empty() {
            groups.remove(group);
        }
        Ok(removed)
    }

    async fn is_member(&self, group: &str, member: &str) -> FeatureResult<bool> {
        let groups = self.groups.read().await;
        Ok(groups
            .get(group)
            .map(|members| members.contains(member))
            .unwrap_or(false))
    }

    async fn members(&self, group: &str) -> FeatureResult<BTreeSet<String>> {
        let groups = self.groups.read().await;
        Ok(groups
            .get(group)
            .map(|members| members.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn delete_group(&self, group: &str) -> FeatureResult<()> {
        self.groups.write().await.remove(group);
        Ok(())
    }

    async fn reset(&self) -> FeatureResult<()> {
        self.flags.write().await.clear();
        self.groups.write().await.clear();
        Ok(())
    }
}
