//! Redis connection pool.

use bb8::{CustomizeConnection, Pool, PooledConnection};
use bb8_redis::RedisConnectionManager;
use redis::aio::MultiplexedConnection;
use std::future::Future;
use std::ops::{Deref, DerefMut};
use std::pin::Pin;
use tracing::{debug, info};

use crate::{RedisConfig, RedisError, Result};

/// Type alias for the connection pool.
pub type RedisPool = Pool<RedisConnectionManager>;

/// A pooled Redis connection.
pub struct RedisConnection<'a> {
    conn: PooledConnection<'a, RedisConnectionManager>,
}

impl<'a> RedisConnection<'a> {
    /// Create a new connection wrapper.
    pub fn new(conn: PooledConnection<'a, RedisConnectionManager>) -> Self {
        Self { conn }
    }
}

impl Deref for RedisConnection<'_> {
    type Target = MultiplexedConnection;

    fn deref(&self) -> &Self::Target {
        &self.conn
    }
}

impl DerefMut for RedisConnection<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.conn
    }
}

/// Names every new pooled connection with `CLIENT SETNAME`.
#[derive(Debug)]
struct ConnectionNamer {
    name: String,
}

impl CustomizeConnection<MultiplexedConnection, redis::RedisError> for ConnectionNamer {
    fn on_acquire<'a>(
        &'a self,
        conn: &'a mut MultiplexedConnection,
    ) -> Pin<Box<dyn Future<Output = std::result::Result<(), redis::RedisError>> + Send + 'a>> {
        Box::pin(async move {
            let _: () = redis::cmd("CLIENT")
                .arg("SETNAME")
                .arg(&self.name)
                .query_async(conn)
                .await?;
            debug!(name = %self.name, "Named pooled Redis connection");
            Ok(())
        })
    }
}

/// Builder for creating Redis connection pools.
pub struct RedisPoolBuilder {
    config: RedisConfig,
}

impl RedisPoolBuilder {
    /// Create a new pool builder.
    pub fn new(config: RedisConfig) -> Self {
        Self { config }
    }

    /// Build the connection pool and verify it with a `PING`.
    pub async fn build(self) -> Result<RedisPool> {
        self.config.validate()?;

        let manager = RedisConnectionManager::new(self.config.connection_url())
            .map_err(|e| RedisError::Connection(e.to_string()))?;

        let mut builder = RedisPool::builder()
            .max_size(self.config.pool_size)
            .min_idle(self.config.min_idle)
            .connection_timeout(self.config.connection_timeout);

        if let Some(name) = &self.config.connection_name {
            let namer = ConnectionNamer { name: name.clone() };
            builder = builder.connection_customizer(Box::new(namer));
        }

        let pool = builder
            .build(manager)
            .await
            .map_err(|e| RedisError::Pool(e.to_string()))?;

        // Scoped so the connection returns to the pool before we hand it out.
        {
            let mut conn = pool.get().await?;
            let _: String = redis::cmd("PING")
                .query_async(&mut *conn)
                .await
                .map_err(RedisError::command)?;
        }

        info!(
            pool_size = self.config.pool_size,
            url = %self.config.url,
            namespace = %self.config.namespace,
            connection_name = ?self.config.connection_name,
            "Redis connection pool created"
        );

        Ok(pool)
    }
}
