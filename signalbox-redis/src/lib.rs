//! # Signalbox Redis
//!
//! Redis storage for Signalbox feature toggles.
//!
//! ## Features
//!
//! - **Connection Pooling**: Connection management with bb8
//! - **Namespaced Keys**: Flags and groups under separate prefixes
//! - **Safe Reset**: `SCAN`-driven cleanup that never leaves the namespace
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use signalbox_features::{EvaluationContext, FeatureConfig, Registry, RegistryConfig};
//! use signalbox_redis::{RedisBackend, RedisConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RedisConfig::builder()
//!         .url("redis://localhost:6379")
//!         .namespace("feature")
//!         .build();
//!
//!     let backend = Arc::new(RedisBackend::connect(config).await?);
//!     let registry = Registry::from_config(
//!         RegistryConfig::new().with_feature(FeatureConfig::new("beta_api").with_group("beta_testers")),
//!         backend,
//!     )?;
//!
//!     let context = EvaluationContext::new().for_any(["user42"]);
//!     let enabled = registry.is_enabled("beta_api", &context).await?;
//!     println!("beta_api: {}", enabled);
//!
//!     Ok(())
//! }
//! ```

mod backend;
mod config;
mod error;
mod pool;
mod service;

pub use backend::{KeySpace, RedisBackend};
pub use config::{DEFAULT_NAMESPACE, RedisConfig, RedisConfigBuilder};
pub use error::{RedisError, Result};
pub use pool::{RedisConnection, RedisPool, RedisPoolBuilder};
pub use service::RedisService;

// Re-export redis crate for convenience
pub use redis;

/// Prelude for common imports.
pub mod prelude {
    pub use crate::backend::RedisBackend;
    pub use crate::config::{RedisConfig, RedisConfigBuilder};
    pub use crate::error::{RedisError, Result};
    pub use crate::service::RedisService;
}
