//! Declarative topology configuration.
//!
//! This module provides YAML/JSON configuration file support for
//! defining a multi-core topology declaratively. Parsing and validation
//! both run before any hardware object is constructed; an invalid value
//! aborts configuration with an error naming the value and the violated
//! constraint.
//!
//! # Configuration File Structure
//!
//! ```yaml
//! system:
//!   cache_line_size: 64
//!   log_level: info
//!
//! isa:
//!   base: RV64
//!   enable_rvv: true
//!   vlen: 256
//!   elen: 64
//!
//! controllers:
//!   - kind: L1
//!     count: 4
//!   - kind: Directory
//!     count: 2
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

use crate::controller::TopologyError;
use crate::isa::IsaParams;
use crate::param::{Constraint, ValidationError};
use crate::types::LineSize;

/// Bounds for the system cache line size: powers of two spanning real
/// hardware line sizes.
pub const LINE_SIZE_CONSTRAINT: Constraint = Constraint::PowerOfTwoRange { min: 16, max: 1024 };

/// Errors that can occur during configuration loading or assembly.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Topology error: {0}")]
    Topology(#[from] TopologyError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Unknown file format: {0}")]
    UnknownFormat(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// System-wide parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SystemParams {
    /// Cache line size in bytes, shared by every controller.
    #[serde(default = "default_cache_line_size")]
    pub cache_line_size: LineSize,

    /// Logging level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_cache_line_size() -> LineSize {
    64
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for SystemParams {
    fn default() -> Self {
        Self {
            cache_line_size: default_cache_line_size(),
            log_level: default_log_level(),
        }
    }
}

impl SystemParams {
    /// Validates the system parameters.
    pub fn validate(&self) -> ConfigResult<()> {
        LINE_SIZE_CONSTRAINT.check("cache_line_size", self.cache_line_size)?;
        Ok(())
    }
}

/// Declares N instances of one controller kind.
///
/// Groups are instantiated in declaration order, which fixes both the
/// version numbering within each kind and the queue registration order
/// on the network.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ControllerGroup {
    /// Controller kind name, resolved against the factory registry.
    pub kind: String,

    /// Number of instances to declare.
    #[serde(default = "default_count")]
    pub count: u32,

    /// Custom attributes passed to the factory as key-value pairs.
    #[serde(default)]
    pub attrs: HashMap<String, String>,
}

fn default_count() -> u32 {
    1
}

impl ControllerGroup {
    /// Validates the group declaration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.kind.is_empty() {
            return Err(ConfigError::Invalid(
                "controller group has an empty kind name".to_string(),
            ));
        }
        if self.count == 0 {
            return Err(ConfigError::Invalid(format!(
                "controller group {} declares zero instances",
                self.kind
            )));
        }
        Ok(())
    }
}

/// Complete topology configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TopologyConfig {
    /// System-wide parameters
    #[serde(default)]
    pub system: SystemParams,

    /// ISA parameter block
    #[serde(default)]
    pub isa: IsaParams,

    /// Controller group declarations, in instantiation order
    #[serde(default)]
    pub controllers: Vec<ControllerGroup>,
}

impl TopologyConfig {
    /// Creates a new empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Loads configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> ConfigResult<Self> {
        let config: TopologyConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Loads configuration from a JSON string.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: TopologyConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a file, auto-detecting format.
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        match ext.to_lowercase().as_str() {
            "yaml" | "yml" => Self::from_yaml_file(path),
            "json" => Self::from_json_file(path),
            _ => Err(ConfigError::UnknownFormat(ext.to_string())),
        }
    }

    /// Validates the entire configuration.
    ///
    /// Per-value constraints (vlen, elen) were already enforced during
    /// deserialization; this checks the system parameters, ISA cross
    /// invariants, and the controller declarations.
    pub fn validate(&self) -> ConfigResult<()> {
        self.system.validate()?;
        self.isa.validate()?;

        for group in &self.controllers {
            group.validate()?;
        }

        Ok(())
    }

    /// Converts to YAML string.
    pub fn to_yaml(&self) -> ConfigResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Converts to JSON string.
    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Returns the total number of controller instances declared.
    pub fn controller_count(&self) -> u32 {
        self.controllers.iter().map(|g| g.count).sum()
    }

    /// Finds a controller group by kind name.
    pub fn find_group(&self, kind: &str) -> Option<&ControllerGroup> {
        self.controllers.iter().find(|g| g.kind == kind)
    }
}

/// Builder for creating a `TopologyConfig` programmatically.
#[derive(Default)]
pub struct TopologyConfigBuilder {
    config: TopologyConfig,
}

impl TopologyConfigBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the cache line size in bytes.
    pub fn cache_line_size(mut self, bytes: LineSize) -> Self {
        self.config.system.cache_line_size = bytes;
        self
    }

    /// Sets the log level.
    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.config.system.log_level = level.into();
        self
    }

    /// Sets the ISA parameter block.
    pub fn isa(mut self, isa: IsaParams) -> Self {
        self.config.isa = isa;
        self
    }

    /// Declares `count` instances of a controller kind.
    pub fn add_controllers(mut self, kind: impl Into<String>, count: u32) -> Self {
        self.config.controllers.push(ControllerGroup {
            kind: kind.into(),
            count,
            attrs: HashMap::new(),
        });
        self
    }

    /// Declares a single instance of a controller kind.
    pub fn add_controller(self, kind: impl Into<String>) -> Self {
        self.add_controllers(kind, 1)
    }

    /// Builds and validates the configuration.
    pub fn build(self) -> ConfigResult<TopologyConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::isa::BaseIsa;

    #[test]
    fn test_default_config() {
        let config = TopologyConfig::new();
        assert_eq!(config.system.cache_line_size, 64);
        assert_eq!(config.system.log_level, "info");
        assert!(config.controllers.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r#"
system:
  cache_line_size: 128
  log_level: debug

isa:
  base: RV64
  vlen: 512
  elen: 32

controllers:
  - kind: L1
    count: 4
  - kind: Directory
    count: 2
    attrs:
      slice: "low"
"#;

        let config = TopologyConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.system.cache_line_size, 128);
        assert_eq!(config.isa.base, BaseIsa::Rv64);
        assert_eq!(config.isa.vlen.bits(), 512);
        assert_eq!(config.isa.elen.bits(), 32);
        assert_eq!(config.controllers.len(), 2);
        assert_eq!(config.controller_count(), 6);
        assert_eq!(
            config.find_group("Directory").unwrap().attrs.get("slice"),
            Some(&"low".to_string())
        );
    }

    #[test]
    fn test_json_parsing() {
        let json = r#"{
            "system": {"cache_line_size": 64},
            "controllers": [
                {"kind": "L1", "count": 2}
            ]
        }"#;

        let config = TopologyConfig::from_json(json).unwrap();
        assert_eq!(config.system.cache_line_size, 64);
        assert_eq!(config.controller_count(), 2);
    }

    #[test]
    fn test_builder() {
        let config = TopologyConfigBuilder::new()
            .cache_line_size(256)
            .log_level("trace")
            .add_controllers("L1", 8)
            .add_controller("Directory")
            .build()
            .unwrap();

        assert_eq!(config.system.cache_line_size, 256);
        assert_eq!(config.controller_count(), 9);
    }

    #[test]
    fn test_validation_rejects_bad_line_size() {
        // Not a power of two
        let result = TopologyConfig::from_yaml("system:\n  cache_line_size: 60\n");
        assert!(matches!(
            result,
            Err(ConfigError::Validation(ValidationError::NotPowerOfTwo { .. }))
        ));

        // Out of the supported span
        let result = TopologyConfig::from_yaml("system:\n  cache_line_size: 8192\n");
        assert!(matches!(
            result,
            Err(ConfigError::Validation(ValidationError::OutOfRange { .. }))
        ));
    }

    #[test]
    fn test_validation_rejects_bad_vlen_at_parse_time() {
        let result = TopologyConfig::from_yaml("isa:\n  vlen: 100\n");
        assert!(matches!(result, Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn test_validation_rejects_elen_wider_than_vlen() {
        let yaml = "isa:\n  vlen: 32\n  elen: 64\n";
        let result = TopologyConfig::from_yaml(yaml);
        assert!(matches!(
            result,
            Err(ConfigError::Validation(
                ValidationError::ElementExceedsRegister { .. }
            ))
        ));
    }

    #[test]
    fn test_validation_rejects_zero_count() {
        let yaml = "controllers:\n  - kind: L1\n    count: 0\n";
        let result = TopologyConfig::from_yaml(yaml);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_unknown_format() {
        let result = TopologyConfig::from_file("topology.toml");
        assert!(matches!(result, Err(ConfigError::UnknownFormat(_))));
    }

    #[test]
    fn test_serialization_roundtrip() {
        let config = TopologyConfigBuilder::new()
            .cache_line_size(128)
            .add_controllers("L1", 4)
            .build()
            .unwrap();

        let yaml = config.to_yaml().unwrap();
        let restored = TopologyConfig::from_yaml(&yaml).unwrap();
        assert_eq!(restored.system.cache_line_size, 128);
        assert_eq!(restored.controller_count(), 4);

        let json = config.to_json().unwrap();
        let restored = TopologyConfig::from_json(&json).unwrap();
        assert_eq!(restored.isa.vlen.bits(), config.isa.vlen.bits());
    }
}
