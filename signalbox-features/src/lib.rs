//! Feature Toggles for Signalbox
//!
//! Decides whether a named feature is active, from a backend-stored
//! global value, a configured default, and optional membership groups.
//!
//! # Features
//!
//! - **Global toggles** - Enable or disable a feature for everyone
//! - **Groups** - Backend-persisted member sets scoping a disabled feature
//! - **Any/All checks** - Match any or all caller identifiers against groups
//! - **Pluggable backends** - In-memory here, Redis in `signalbox-redis`
//!
//! # Resolution
//!
//! A feature stored as enabled (or unset with default `true`) is always
//! active. Otherwise, if it has groups and the caller supplied
//! identifiers, it is active when any group passes the membership test.
//!
//! # Quick Start
//!
//! ```
//! use signalbox_features::*;
//! use std::sync::Arc;
//!
//! # tokio_test::block_on(async {
//! let config = RegistryConfig::new()
//!     .with_feature(FeatureConfig::new("beta_api").with_default(false).with_group("beta_testers"));
//! let registry = Registry::from_config(config, Arc::new(InMemoryBackend::new()))?;
//!
//! registry.group("beta_testers").add_member("user42").await?;
//!
//! let context = EvaluationContext::new().for_any(["user42"]);
//! assert!(registry.is_enabled("beta_api", &context).await?);
//!
//! let context = EvaluationContext::new().for_any(["user99"]);
//! assert!(!registry.is_enabled("beta_api", &context).await?);
//! # Ok::<(), FeatureError>(())
//! # }).unwrap();
//! ```
//!
//! # Loading Declarations
//!
//! ```
//! use signalbox_features::RegistryConfig;
//!
//! let config = RegistryConfig::from_toml_str(r#"
//!     [[features]]
//!     name = "rollout"
//!     default = false
//!     groups = ["region_us"]
//! "#).unwrap();
//! assert_eq!(config.features[0].groups, vec!["region_us".to_string()]);
//! ```

pub mod admin;
pub mod backend;
pub mod config;
pub mod error;
pub mod feature;
pub mod group;
pub mod memory;
pub mod registry;

pub use admin::{FeatureAdmin, FeatureStatus};
pub use backend::{Backend, GlobalValue};
pub use config::{FeatureConfig, FileFormat, RegistryConfig};
pub use error::{FeatureError, FeatureResult};
pub use feature::{EvaluationContext, Feature, MembershipCheck};
pub use group::Group;
pub use memory::InMemoryBackend;
pub use registry::Registry;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::admin::FeatureAdmin;
    pub use crate::backend::{Backend, GlobalValue};
    pub use crate::config::{FeatureConfig, RegistryConfig};
    pub use crate::error::{FeatureError, FeatureResult};
    pub use crate::feature::{EvaluationContext, Feature};
    pub use crate::group::Group;
    pub use crate::memory::InMemoryBackend;
    pub use crate::registry::Registry;
}
