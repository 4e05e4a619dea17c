//! Backend contract for persisting flag state and group membership.

use crate::error::FeatureResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Stored global value of a feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GlobalValue {
    Enabled,
    Disabled,
    Unset,
}

impl GlobalValue {
    /// Storage representation, `None` for [`GlobalValue::Unset`].
    pub fn as_stored(&self) -> Option<&'static str> {
        match self {
            Self::Enabled => Some("enabled"),
            Self::Disabled => Some("disabled"),
            Self::Unset => None,
        }
    }

    /// Parse a stored string. Anything other than `enabled`/`disabled`
    /// reads as unset.
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some("enabled") => Self::Enabled,
            Some("disabled") => Self::Disabled,
            Some(other) => {
                tracing::warn!(value = %other, "Unrecognized stored global value, treating as unset");
                Self::Unset
            }
            None => Self::Unset,
        }
    }

    /// Resolve to a boolean, substituting `default` when unset.
    pub fn or_default(&self, default: bool) -> bool {
        match self {
            Self::Enabled => true,
            Self::Disabled => false,
            Self::Unset => default,
        }
    }
}

impl From<bool> for GlobalValue {
    fn from(enabled: bool) -> Self {
        if enabled { Self::Enabled } else { Self::Disabled }
    }
}

/// Storage backend for feature state.
///
/// Feature identifiers and group identifiers live in separate namespaces:
/// a feature and a group with the same name never share storage.
///
/// Every storage failure is reported as
/// [`FeatureError::BackendUnavailable`](crate::FeatureError::BackendUnavailable).
/// Implementations own any retry or timeout policy.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Get the stored global value. A missing key is [`GlobalValue::Unset`].
    async fn global_value(&self, feature: &str) -> FeatureResult<GlobalValue>;

    /// Store the global value. Idempotent.
    ///
    /// Returns `true` when the write was acknowledged.
    async fn set_global_value(&self, feature: &str, enabled: bool) -> FeatureResult<bool>;

    /// Add a member to a group. Returns `true` if it was newly added.
    async fn add_member(&self, group: &str, member: &str) -> FeatureResult<bool>;

    /// Remove a member from a group. Returns `true` if it was present.
    async fn remove_member(&self, group: &str, member: &str) -> FeatureResult<bool>;

    /// Check whether `member` belongs to `group`.
    async fn is_member(&self, group: &str, member: &str) -> FeatureResult<bool>;

    /// List all members of a group. A missing group is empty.
    async fn members(&self, group: &str) -> FeatureResult<BTreeSet<String>>;

    /// Delete a group's membership set. Idempotent.
    async fn delete_group(&self, group: &str) -> FeatureResult<()>;

    /// Remove every flag and group owned by this backend.
    ///
    /// **Warning:** intended for test isolation. Data outside the backend's
    /// namespace must be left untouched.
    async fn reset(&self) -> FeatureResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_stored() {
        assert_eq!(GlobalValue::from_stored(Some("enabled")), GlobalValue::Enabled);
        assert_eq!(GlobalValue::from_stored(Some("disabled")), GlobalValue::Disabled);
        assert_eq!(GlobalValue::from_stored(Some("maybe")), GlobalValue::Unset);
        assert_eq!(GlobalValue::from_stored(None), GlobalValue::Unset);
    }

    #[test]
    fn test_or_default() {
        assert!(GlobalValue::Enabled.or_default(false));
        assert!(!GlobalValue::Disabled.or_default(true));
        assert!(GlobalValue::Unset.or_default(true));
        assert!(!GlobalValue::Unset.or_default(false));
    }

    #[test]
    fn test_stored_representation() {
        assert_eq!(GlobalValue::from(true).as_stored(), Some("enabled"));
        assert_eq!(GlobalValue::from(false).as_stored(), Some("disabled"));
        assert_eq!(GlobalValue::Unset.as_stored(), None);
    }
}
