//! Feature declarations.

use crate::error::{FeatureError, FeatureResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Static declaration of a single feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureConfig {
    /// Feature identifier
    pub name: String,

    /// Value used when the backend has none stored
    #[serde(default = "default_enabled")]
    pub default: bool,

    /// Group names, in display order
    #[serde(default)]
    pub groups: Vec<String>,
}

fn default_enabled() -> bool {
    true
}

impl FeatureConfig {
    /// Declare a feature with default `true` and no groups.
    ///
    /// # Examples
    ///
    /// ```
    /// use signalbox_features::FeatureConfig;
    ///
    /// let config = FeatureConfig::new("beta_api")
    ///     .with_default(false)
    ///     .with_group("beta_testers");
    /// assert_eq!(config.groups, vec!["beta_testers".to_string()]);
    /// ```
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: true,
            groups: Vec::new(),
        }
    }

    pub fn with_default(mut self, default: bool) -> Self {
        self.default = default;
        self
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.groups.push(group.into());
        self
    }

    /// Check the name and group list.
    pub fn validate(&self) -> FeatureResult<()> {
        if self.name.trim().is_empty() {
            return Err(FeatureError::InvalidConfiguration(
                "feature name must not be empty".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for group in &self.groups {
            if group.trim().is_empty() {
                return Err(FeatureError::InvalidConfiguration(format!(
                    "feature {} has an empty group name",
                    self.name
                )));
            }
            if !seen.insert(group.as_str()) {
                return Err(FeatureError::InvalidConfiguration(format!(
                    "feature {} lists group {} more than once",
                    self.name, group
                )));
            }
        }

        Ok(())
    }
}

/// Supported declaration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Toml,
}

impl FileFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "json" => Some(FileFormat::Json),
            "toml" => Some(FileFormat::Toml),
            _ => None,
        }
    }
}

/// The full set of feature declarations for a registry.
///
/// In TOML:
///
/// ```toml
/// [[features]]
/// name = "beta_api"
/// default = false
/// groups = ["beta_testers"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    #[serde(default)]
    pub features: Vec<FeatureConfig>,
}

impl RegistryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a declaration.
    pub fn with_feature(mut self, feature: FeatureConfig) -> Self {
        self.features.push(feature);
        self
    }

    /// Parse and validate TOML.
    pub fn from_toml_str(content: &str) -> FeatureResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate JSON.
    pub fn from_json_str(content: &str) -> FeatureResult<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a `.toml` or `.json` file.
    pub fn from_file(path: impl AsRef<Path>) -> FeatureResult<Self> {
        let path = path.as_ref();
        let format = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(FileFormat::from_extension)
            .ok_or_else(|| {
                FeatureError::InvalidConfiguration(format!(
                    "unsupported configuration file: {}",
                    path.display()
                ))
            })?;

        let content = fs::read_to_string(path).map_err(|e| {
            FeatureError::InvalidConfiguration(format!(
                "failed to read {}: {}",
                path.display(),
                e
            ))
        })?;

        match format {
            FileFormat::Json => Self::from_json_str(&content),
            FileFormat::Toml => Self::from_toml_str(&content),
        }
    }

    /// Validate every declaration and reject duplicate feature names.
    pub fn validate(&self) -> FeatureResult<()> {
        let mut seen = HashSet::new();
        for feature in &self.features {
            feature.validate()?;
            if !seen.insert(feature.name.as_str()) {
                return Err(FeatureError::InvalidConfiguration(format!(
                    "feature {} is declared more than once",
                    feature.name
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_toml() {
        let config = RegistryConfig::from_toml_str(
            r#"
            [[features]]
            name = "dark_mode"

            [[features]]
            name = "beta_api"
            default = false
            groups = ["beta_testers", "staff"]
            "#,
        )
        .unwrap();

        assert_eq!(config.features.len(), 2);
        assert!(config.features[0].default);
        assert!(config.features[0].groups.is_empty());
        assert!(!config.features[1].default);
        assert_eq!(config.features[1].groups, vec!["beta_testers", "staff"]);
    }

    #[test]
    fn test_parse_json() {
        let config = RegistryConfig::from_json_str(
            r#"{"features": [{"name": "rollout", "groups": ["region_us"]}]}"#,
        )
        .unwrap();

        assert_eq!(config.features[0], FeatureConfig::new("rollout").with_group("region_us"));
    }

    #[test]
    fn test_malformed_default() {
        let err = RegistryConfig::from_toml_str(
            r#"
            [[features]]
            name = "dark_mode"
            default = "yes"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, FeatureError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_duplicate_feature() {
        let config = RegistryConfig::new()
            .with_feature(FeatureConfig::new("dark_mode"))
            .with_feature(FeatureConfig::new("dark_mode").with_default(false));
        assert!(matches!(
            config.validate(),
            Err(FeatureError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_duplicate_group() {
        let config = FeatureConfig::new("beta_api")
            .with_group("beta")
            .with_group("beta");
        assert!(matches!(
            config.validate(),
            Err(FeatureError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_empty_names() {
        assert!(FeatureConfig::new("  ").validate().is_err());
        assert!(FeatureConfig::new("x").with_group("").validate().is_err());
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(FileFormat::from_extension("json"), Some(FileFormat::Json));
        assert_eq!(FileFormat::from_extension("TOML"), Some(FileFormat::Toml));
        assert_eq!(FileFormat::from_extension("yaml"), None);
    }

    #[test]
    fn test_from_file_unsupported_extension() {
        let err = RegistryConfig::from_file("features.yaml").unwrap_err();
        assert!(matches!(err, FeatureError::InvalidConfiguration(_)));
    }
}
