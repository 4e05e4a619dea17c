//! Membership groups.

use crate::backend::Backend;
use crate::error::FeatureResult;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// A named set of members held by the backend.
///
/// A group is a view: it owns no membership state and every query is a
/// backend round trip.
#[derive(Clone)]
pub struct Group {
    name: String,
    backend: Arc<dyn Backend>,
}

impl Group {
    /// Create a view of the group `name`.
    pub fn new(name: impl Into<String>, backend: Arc<dyn Backend>) -> Self {
        Self {
            name: name.into(),
            backend,
        }
    }

    /// Group name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check whether `member` belongs to this group.
    pub async fn is_member(&self, member: &str) -> FeatureResult<bool> {
        self.backend.is_member(&self.name, member).await
    }

    /// Check whether **any** of `members` belongs to this group.
    ///
    /// An empty slice is never a member.
    pub async fn is_member_of_any<S: AsRef<str>>(&self, members: &[S]) -> FeatureResult<bool> {
        for member in members {
            if self.is_member(member.as_ref()).await? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Check whether **every** one of `members` belongs to this group.
    ///
    /// An empty slice is vacuously a member; guard against it if that is
    /// not what you mean.
    pub async fn is_member_of_all<S: AsRef<str>>(&self, members: &[S]) -> FeatureResult<bool> {
        for member in members {
            if !self.is_member(member.as_ref()).await? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Add a member. Returns `true` if it was newly added.
    pub async fn add_member(&self, member: &str) -> FeatureResult<bool> {
        self.backend.add_member(&self.name, member).await
    }

    /// Remove a member. Returns `true` if it was present.
    pub async fn remove_member(&self, member: &str) -> FeatureResult<bool> {
        self.backend.remove_member(&self.name, member).await
    }

    /// List all members.
    pub async fn members(&self) -> FeatureResult<BTreeSet<String>> {
        self.backend.members(&self.name).await
    }

    /// Delete the whole membership set.
    pub async fn delete(&self) -> FeatureResult<()> {
        tracing::info!(group = %self.name, "Deleting group");
        self.backend.delete_group(&self.name).await
    }
}

impl fmt::Debug for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Group").field("name", &self.name).finish()
    }
}
