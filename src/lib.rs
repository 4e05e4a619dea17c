// Signalbox - feature toggles with global switches and membership groups
//
// The resolution engine lives in signalbox-features; storage backends are
// separate crates enabled through cargo features.

// Re-export the engine
pub use signalbox_features::*;

// Re-export optional backends
#[cfg(feature = "redis")]
pub use signalbox_redis;

#[cfg(feature = "redis")]
pub use signalbox_redis::{RedisBackend, RedisConfig};

// Prelude for common imports
pub mod prelude {
    pub use signalbox_features::prelude::*;

    #[cfg(feature = "redis")]
    pub use signalbox_redis::prelude::*;
}
