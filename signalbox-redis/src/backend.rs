//! Feature backend over Redis.

use async_trait::async_trait;
use redis::AsyncCommands;
use signalbox_features::{Backend, FeatureResult, GlobalValue};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info};

use crate::{RedisConfig, RedisError, RedisService, Result};

/// Keys scanned per `SCAN` round during reset.
const SCAN_BATCH: usize = 100;

/// Key layout for one namespace.
///
/// Flags live under `{namespace}:flag:` and groups under
/// `{namespace}:group:`, so a feature and a group may share a name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySpace {
    namespace: String,
}

impl KeySpace {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn flag_key(&self, feature: &str) -> String {
        format!("{}:flag:{}", self.namespace, feature)
    }

    pub fn group_key(&self, group: &str) -> String {
        format!("{}:group:{}", self.namespace, group)
    }

    /// `SCAN MATCH` patterns for the flag and group prefixes.
    ///
    /// Matching `{namespace}:*` would also catch nested namespaces such as
    /// `{namespace}:beta`, so each prefix is scanned on its own.
    pub fn patterns(&self) -> [String; 2] {
        let namespace = escape_glob(&self.namespace);
        [format!("{}:flag:*", namespace), format!("{}:group:*", namespace)]
    }
}

fn escape_glob(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Redis-backed feature storage.
///
/// # Examples
///
/// ```rust,ignore
/// use signalbox_features::{Registry, RegistryConfig};
/// use signalbox_redis::{RedisBackend, RedisConfig};
/// use std::sync::Arc;
///
/// let backend = RedisBackend::connect(RedisConfig::from_env().build()).await?;
/// let registry = Registry::from_config(RegistryConfig::from_file("features.toml")?, Arc::new(backend))?;
/// ```
pub struct RedisBackend {
    service: Arc<RedisService>,
    keys: KeySpace,
}

impl RedisBackend {
    /// Wrap an existing service, using its configured namespace.
    pub fn new(service: Arc<RedisService>) -> Self {
        let keys = KeySpace::new(service.config().namespace.clone());
        Self { service, keys }
    }

    /// Connect using `config`.
    pub async fn connect(config: RedisConfig) -> Result<Self> {
        let service = RedisService::new(config).await?;
        Ok(Self::new(Arc::new(service)))
    }

    pub fn keys(&self) -> &KeySpace {
        &self.keys
    }

    pub fn service(&self) -> &Arc<RedisService> {
        &self.service
    }
}

#[async_trait]
impl Backend for RedisBackend {
    async fn global_value(&self, feature: &str) -> FeatureResult<GlobalValue> {
        let mut conn = self.service.get().await?;
        let value: Option<String> = conn
            .get(self.keys.flag_key(feature))
            .await
            .map_err(RedisError::command)?;
        Ok(GlobalValue::from_stored(value.as_deref()))
    }

    async fn set_global_value(&self, feature: &str, enabled: bool) -> FeatureResult<bool> {
        let stored = GlobalValue::from(enabled).as_stored().unwrap_or("disabled");
        let mut conn = self.service.get().await?;
        let _: () = conn
            .set(self.keys.flag_key(feature), stored)
            .await
            .map_err(RedisError::command)?;
        Ok(true)
    }

    async fn add_member(&self, group: &str, member: &str) -> FeatureResult<bool> {
        let mut conn = self.service.get().await?;
        let added: u64 = conn
            .sadd(self.keys.group_key(group), member)
            .await
            .map_err(RedisError::command)?;
        Ok(added > 0)
    }

    async fn remove_member(&self, group: &str, member: &str) -> FeatureResult<bool> {
        let mut conn = self.service.get().await?;
        let removed: u64 = conn
            .srem(self.keys.group_key(group), member)
            .await
            .map_err(RedisError::command)?;
        Ok(removed > 0)
    }

    async fn is_member(&self, group: &str, member: &str) -> FeatureResult<bool> {
        let mut conn = self.service.get().await?;
        let is_member: bool = conn
            .sismember(self.keys.group_key(group), member)
            .await
            .map_err(RedisError::command)?;
        Ok(is_member)
    }

    async fn members(&self, group: &str) -> FeatureResult<BTreeSet<String>> {
        let mut conn = self.service.get().await?;
        let members: Vec<String> = conn
            .smembers(self.keys.group_key(group))
            .await
            .map_err(RedisError::command)?;
        Ok(members.into_iter().collect())
    }

    async fn delete_group(&self, group: &str) -> FeatureResult<()> {
        let mut conn = self.service.get().await?;
        let _: u64 = conn
            .del(self.keys.group_key(group))
            .await
            .map_err(RedisError::command)?;
        Ok(())
    }

    async fn reset(&self) -> FeatureResult<()> {
        let mut conn = self.service.get().await?;
        let mut deleted: u64 = 0;

        for pattern in self.keys.patterns() {
            let mut cursor: u64 = 0;
            loop {
                let (next, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                    .arg(cursor)
                    .arg("MATCH")
                    .arg(&pattern)
                    .arg("COUNT")
                    .arg(SCAN_BATCH)
                    .query_async(&mut *conn)
                    .await
                    .map_err(RedisError::command)?;

                if !keys.is_empty() {
                    let count: u64 = conn.del(&keys).await.map_err(RedisError::command)?;
                    deleted += count;
                    debug!(count, pattern = %pattern, "Deleted namespaced keys");
                }

                if next == 0 {
                    break;
                }
                cursor = next;
            }
        }

        info!(namespace = %self.keys.namespace(), deleted, "Reset Redis feature backend");
        Ok(())
    }
}
