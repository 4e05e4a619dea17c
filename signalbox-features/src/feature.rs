//! Features and the resolution algorithm.

use crate::backend::{Backend, GlobalValue};
use crate::config::FeatureConfig;
use crate::error::FeatureResult;
use crate::group::Group;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Membership identifiers supplied by the caller of a resolution.
///
/// # Examples
///
/// ```
/// use signalbox_features::EvaluationContext;
///
/// let context = EvaluationContext::new().for_any(["user42", "team7"]);
/// assert!(context.has_members());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvaluationContext {
    any: Option<Vec<String>>,
    all: Option<Vec<String>>,
}

/// How a group's membership is tested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipCheck<'a> {
    /// At least one identifier must be a member.
    Any(&'a [String]),
    /// Every identifier must be a member.
    All(&'a [String]),
}

impl EvaluationContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Require that any of `members` is in a configured group.
    pub fn for_any<I, S>(mut self, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.any = Some(members.into_iter().map(Into::into).collect());
        self
    }

    /// Require that all of `members` are in a configured group.
    pub fn for_all<I, S>(mut self, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.all = Some(members.into_iter().map(Into::into).collect());
        self
    }

    /// Shorthand for a single identifier.
    pub fn for_member(self, member: impl Into<String>) -> Self {
        self.for_all([member.into()])
    }

    /// Identifiers for the any-of test.
    pub fn any(&self) -> Option<&[String]> {
        self.any.as_deref()
    }

    /// Identifiers for the all-of test.
    pub fn all(&self) -> Option<&[String]> {
        self.all.as_deref()
    }

    /// Whether any identifier set was supplied. An empty set counts.
    pub fn has_members(&self) -> bool {
        self.any.is_some() || self.all.is_some()
    }

    /// The membership test to apply. The "any" set wins when both are given.
    pub fn membership(&self) -> Option<MembershipCheck<'_>> {
        match (&self.any, &self.all) {
            (Some(any), _) => Some(MembershipCheck::Any(any)),
            (None, Some(all)) => Some(MembershipCheck::All(all)),
            (None, None) => None,
        }
    }
}

/// A named toggle with a default value and optional groups.
#[derive(Clone)]
pub struct Feature {
    name: String,
    default: bool,
    groups: Vec<Group>,
    backend: Arc<dyn Backend>,
}

impl Feature {
    /// Create a feature with default `true` and no groups.
    pub fn new(name: impl Into<String>, backend: Arc<dyn Backend>) -> Self {
        Self {
            name: name.into(),
            default: true,
            groups: Vec::new(),
            backend,
        }
    }

    /// Build a feature from its declaration. Does not touch the backend.
    pub fn from_config(config: &FeatureConfig, backend: Arc<dyn Backend>) -> Self {
        let groups = config
            .groups
            .iter()
            .map(|name| Group::new(name.clone(), Arc::clone(&backend)))
            .collect();

        Self {
            name: config.name.clone(),
            default: config.default,
            groups,
            backend,
        }
    }

    /// Set the value used when the backend has none stored.
    pub fn with_default(mut self, default: bool) -> Self {
        self.default = default;
        self
    }

    /// Append a group.
    pub fn with_group(mut self, name: impl Into<String>) -> Self {
        self.groups.push(Group::new(name, Arc::clone(&self.backend)));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn default_value(&self) -> bool {
        self.default
    }

    /// Configured groups, in declaration order.
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Raw stored global value.
    pub async fn global_value(&self) -> FeatureResult<GlobalValue> {
        self.backend.global_value(&self.name).await
    }

    /// Stored global value, or the default when unset.
    pub async fn global_setting(&self) -> FeatureResult<bool> {
        Ok(self.global_value().await?.or_default(self.default))
    }

    /// Resolve without membership identifiers.
    pub async fn is_enabled(&self) -> FeatureResult<bool> {
        self.resolve(&EvaluationContext::default()).await
    }

    /// Decide whether the feature is active for `context`.
    ///
    /// A globally enabled feature is always active. Groups are only
    /// consulted when the feature is globally off, has groups, and the
    /// context carries identifiers; the feature is then active if any
    /// group passes the membership test.
    pub async fn resolve(&self, context: &EvaluationContext) -> FeatureResult<bool> {
        let global = self.global_setting().await?;

        let check = match context.membership() {
            Some(check) if !global && !self.groups.is_empty() => check,
            _ => {
                debug!(feature = %self.name, global, "Resolved from global setting");
                return Ok(global);
            }
        };

        let mut enabled = false;
        for group in &self.groups {
            let matched = match check {
                MembershipCheck::Any(members) => group.is_member_of_any(members).await?,
                MembershipCheck::All(members) => group.is_member_of_all(members).await?,
            };
            if matched {
                enabled = true;
                break;
            }
        }

        debug!(
            feature = %self.name,
            mode = ?check,
            enabled,
            "Resolved from group membership"
        );
        Ok(enabled)
    }

    /// Globally enable the feature.
    pub async fn enable(&self) -> FeatureResult<bool> {
        info!(feature = %self.name, "Enabling feature");
        self.backend.set_global_value(&self.name, true).await
    }

    /// Globally disable the feature.
    pub async fn disable(&self) -> FeatureResult<bool> {
        info!(feature = %self.name, "Disabling feature");
        self.backend.set_global_value(&self.name, false).await
    }
}

impl fmt::Debug for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Feature")
            .field("name", &self.name)
            .field("default", &self.default)
            .field("groups", &self.groups)
            .finish()
    }
}
