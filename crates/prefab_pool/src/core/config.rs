//! # Unified Configuration
//!
//! All configuration structures live here so that an application can describe
//! its pooling setup in a single file (TOML or RON).
//!
//! ```toml
//! application_name = "Arena"
//! log_level = "debug"
//!
//! [pooling]
//! default_prefill_quantity = 2
//! force_recycle_cleanup = true
//!
//! [[pooling.pools]]
//! template = "Enemy"
//! prefill = 3
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{Config, ConfigError};
use crate::foundation::math::Transform;

/// # Pool Preset
///
/// A pool declared up front, resolved by template name when the manager
/// initializes its pools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolPreset {
    /// Name of the template the pool is built from
    pub template: String,
    /// Number of instances created eagerly
    #[serde(default)]
    pub prefill: usize,
}

impl PoolPreset {
    /// Create a preset for `template` with `prefill` eager instances
    pub fn new(template: impl Into<String>, prefill: usize) -> Self {
        Self {
            template: template.into(),
            prefill,
        }
    }
}

/// # Pool Manager Configuration
///
/// Behaviour knobs of a [`PoolManager`](crate::pooling::PoolManager).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolManagerConfig {
    /// Instances created eagerly for pools the manager creates on its own
    pub default_prefill_quantity: usize,
    /// Give every pool its own holder node under the manager root.
    /// When off, stored instances of all pools share the root node.
    pub create_child_for_pools: bool,
    /// Drop the instance→pool association as soon as an instance is recycled.
    /// When off, the association stays until the next maintenance pass.
    pub force_recycle_cleanup: bool,
    /// Run the maintenance pass on every `late_update`, not only when the
    /// registry sizes disagree
    pub maintain_every_frame: bool,
    /// Pools created when the manager initializes
    pub pools: Vec<PoolPreset>,
}

impl Default for PoolManagerConfig {
    fn default() -> Self {
        Self {
            default_prefill_quantity: 0,
            create_child_for_pools: true,
            force_recycle_cleanup: false,
            maintain_every_frame: true,
            pools: Vec::new(),
        }
    }
}

impl PoolManagerConfig {
    /// Set the prefill used for lazily created pools
    #[must_use]
    pub fn with_default_prefill(mut self, quantity: usize) -> Self {
        self.default_prefill_quantity = quantity;
        self
    }

    /// Enable or disable one holder node per pool
    #[must_use]
    pub fn with_child_for_pools(mut self, enabled: bool) -> Self {
        self.create_child_for_pools = enabled;
        self
    }

    /// Enable or disable immediate association cleanup on recycle
    #[must_use]
    pub fn with_force_recycle_cleanup(mut self, enabled: bool) -> Self {
        self.force_recycle_cleanup = enabled;
        self
    }

    /// Enable or disable the unconditional per-frame maintenance pass
    #[must_use]
    pub fn with_maintain_every_frame(mut self, enabled: bool) -> Self {
        self.maintain_every_frame = enabled;
        self
    }

    /// Declare a pool to create at initialization
    #[must_use]
    pub fn with_pool(mut self, preset: PoolPreset) -> Self {
        self.pools.push(preset);
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (i, preset) in self.pools.iter().enumerate() {
            if preset.template.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("pool preset {i} has an empty template name")));
            }
            if self.pools[..i].iter().any(|earlier| earlier.template == preset.template) {
                return Err(ConfigError::Invalid(format!(
                    "template '{}' is declared by more than one pool preset",
                    preset.template
                )));
            }
        }
        Ok(())
    }
}

/// # Template Definition
///
/// A named blueprint with its baseline placement. Hosts that build their
/// template table from configuration (the in-memory scene, the demo) read
/// these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateDefinition {
    /// Unique template name
    pub name: String,
    /// Baseline placement of the template
    #[serde(default)]
    pub transform: Transform,
}

impl TemplateDefinition {
    /// Create a definition with an identity placement
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::identity(),
        }
    }

    /// Set the baseline placement
    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }
}

/// # Application Configuration
///
/// Top-level configuration of an application using the pooling layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    /// Application name, used in log output
    pub application_name: String,
    /// Default log level (`error`, `warn`, `info`, `debug`, `trace`)
    pub log_level: String,
    /// Number of frames a headless run lasts; `0` runs until the application stops
    pub frame_limit: u64,
    /// Pool manager settings
    pub pooling: PoolManagerConfig,
    /// Templates to register with the host
    pub templates: Vec<TemplateDefinition>,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            application_name: "Prefab Pool Application".to_string(),
            log_level: "info".to_string(),
            frame_limit: 0,
            pooling: PoolManagerConfig::default(),
            templates: Vec::new(),
        }
    }
}

impl ApplicationConfig {
    /// Create a configuration with the given application name
    pub fn new(application_name: impl Into<String>) -> Self {
        Self {
            application_name: application_name.into(),
            ..Default::default()
        }
    }

    /// Set the log level
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Set the headless frame limit
    #[must_use]
    pub fn with_frame_limit(mut self, frames: u64) -> Self {
        self.frame_limit = frames;
        self
    }

    /// Replace the pooling settings
    #[must_use]
    pub fn with_pooling(mut self, pooling: PoolManagerConfig) -> Self {
        self.pooling = pooling;
        self
    }

    /// Register a template definition
    #[must_use]
    pub fn with_template(mut self, template: TemplateDefinition) -> Self {
        self.templates.push(template);
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.application_name.is_empty() {
            return Err(ConfigError::Invalid("application name cannot be empty".to_string()));
        }

        for (i, template) in self.templates.iter().enumerate() {
            if self.templates[..i].iter().any(|earlier| earlier.name == template.name) {
                return Err(ConfigError::Invalid(format!("template '{}' is defined twice", template.name)));
            }
        }

        self.pooling.validate()
    }
}

impl Config for PoolManagerConfig {}
impl Config for ApplicationConfig {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;

    #[test]
    fn test_defaults_match_documented_knobs() {
        let config = PoolManagerConfig::default();
        assert_eq!(config.default_prefill_quantity, 0);
        assert!(config.create_child_for_pools);
        assert!(!config.force_recycle_cleanup);
        assert!(config.pools.is_empty());
    }

    #[test]
    fn test_parse_toml_with_missing_fields() {
        let text = r#"
            application_name = "Arena"

            [pooling]
            default_prefill_quantity = 2

            [[pooling.pools]]
            template = "Enemy"
            prefill = 3

            [[pooling.pools]]
            template = "Bullet"
        "#;

        let config: ApplicationConfig = toml::from_str(text).expect("Should parse");
        assert_eq!(config.application_name, "Arena");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.pooling.default_prefill_quantity, 2);
        assert!(config.pooling.create_child_for_pools);
        assert_eq!(
            config.pooling.pools,
            vec![PoolPreset::new("Enemy", 3), PoolPreset::new("Bullet", 0)]
        );
        config.validate().expect("Should validate");
    }

    #[test]
    fn test_save_and_load_ron() {
        let dir = tempfile::tempdir().expect("Should create temp dir");
        let path = dir.path().join("app.ron");

        let config = ApplicationConfig::new("Round Trip")
            .with_log_level("debug")
            .with_pooling(PoolManagerConfig::default().with_default_prefill(4).with_pool(PoolPreset::new("Enemy", 3)))
            .with_template(
                TemplateDefinition::new("Enemy")
                    .with_transform(Transform::from_position(Vec3::new(0.0, 1.0, 0.0))),
            );

        config.save_to_file(&path).expect("Should save");
        let loaded = ApplicationConfig::load_from_file(&path).expect("Should load");
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_unsupported_extension() {
        let result = ApplicationConfig::load_from_file("settings.json");
        assert!(matches!(result, Err(ConfigError::Io(_)) | Err(ConfigError::UnsupportedFormat(_))));

        let dir = tempfile::tempdir().expect("Should create temp dir");
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{}").expect("Should write");
        let result = ApplicationConfig::load_from_file(&path);
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_validate_rejects_duplicate_presets() {
        let config = PoolManagerConfig::default()
            .with_pool(PoolPreset::new("Enemy", 1))
            .with_pool(PoolPreset::new("Enemy", 2));
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let config = PoolManagerConfig::default().with_pool(PoolPreset::new("  ", 1));
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }
}
