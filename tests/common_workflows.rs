//! Integration tests for common Signalbox workflows.
//!
//! These tests exercise the facade crate the way an application would.

use signalbox::prelude::*;
use std::sync::Arc;

const DECLARATIONS: &str = r#"
[[features]]
name = "dark_mode"

[[features]]
name = "beta_api"
default = false
groups = ["beta_testers"]

[[features]]
name = "rollout"
default = false
groups = ["region_us", "region_eu"]
"#;

fn registry() -> Arc<Registry> {
    let config = RegistryConfig::from_toml_str(DECLARATIONS).unwrap();
    Arc::new(Registry::from_config(config, Arc::new(InMemoryBackend::new())).unwrap())
}

#[tokio::test]
async fn test_declare_then_resolve() {
    let registry = registry();

    assert!(registry.is_enabled("dark_mode", &EvaluationContext::new()).await.unwrap());
    assert!(!registry.is_enabled("beta_api", &EvaluationContext::new()).await.unwrap());
}

#[tokio::test]
async fn test_operator_workflow() {
    let registry = registry();
    let admin = FeatureAdmin::new(Arc::clone(&registry));

    admin.add_member("region_eu", "server7").await.unwrap();
    admin.add_member("region_eu", "server8").await.unwrap();

    let both = EvaluationContext::new().for_all(["server7", "server8"]);
    let mixed = EvaluationContext::new().for_all(["server7", "server1"]);
    assert!(registry.is_enabled("rollout", &both).await.unwrap());
    assert!(!registry.is_enabled("rollout", &mixed).await.unwrap());

    // Flip globally, groups no longer matter.
    admin.enable("rollout").await.unwrap();
    assert!(registry.is_enabled("rollout", &mixed).await.unwrap());

    let names: Vec<_> = admin.list().await.unwrap().into_iter().map(|s| s.name).collect();
    assert_eq!(names, vec!["dark_mode", "beta_api", "rollout"]);
}

#[tokio::test]
async fn test_status_listing_serializes() {
    let admin = FeatureAdmin::new(registry());
    admin.disable("dark_mode").await.unwrap();

    let json = serde_json::to_value(admin.list().await.unwrap()).unwrap();
    assert_eq!(json[0]["name"], "dark_mode");
    assert_eq!(json[0]["stored"], "disabled");
    assert_eq!(json[2]["groups"][1], "region_eu");
}

#[test]
fn test_invalid_declarations_rejected() {
    let err = RegistryConfig::from_toml_str(
        r#"
        [[features]]
        name = "dark_mode"

        [[features]]
        name = "dark_mode"
        "#,
    )
    .unwrap_err();
    assert!(matches!(err, FeatureError::InvalidConfiguration(_)));
}

#[cfg(feature = "redis")]
#[test]
fn test_redis_config_from_facade() {
    let config = signalbox::RedisConfig::builder().namespace("flags").build();
    assert_eq!(config.namespace, "flags");
}
