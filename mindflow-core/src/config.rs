use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Storage key under which the whole state is persisted.
pub const DEFAULT_STORAGE_KEY: &str = "mind-map-storage";

/// Top-level MindFlow configuration, matching `.mindflow/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MindflowConfig {
    #[serde(default)]
    pub mindflow: MindflowSection,
    #[serde(default)]
    pub storage: StorageSection,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub import: ImportSection,
    #[serde(default)]
    pub render: RenderSection,
}

impl MindflowConfig {
    /// Read and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.key.trim().is_empty() {
            return Err(ConfigError::Invalid("storage.key must not be empty".into()));
        }
        if self.storage.db_file.trim().is_empty() {
            return Err(ConfigError::Invalid("storage.db_file must not be empty".into()));
        }
        let l = &self.layout;
        for (name, value) in [
            ("layout.child_offset_x", l.child_offset_x),
            ("layout.child_spacing_y", l.child_spacing_y),
            ("layout.middle_offset_x", l.middle_offset_x),
            ("layout.middle_offset_y", l.middle_offset_y),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::Invalid(format!("{name} must be a finite number")));
            }
        }
        if l.child_spacing_y <= 0.0 {
            return Err(ConfigError::Invalid(
                "layout.child_spacing_y must be positive".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MindflowSection {
    pub version: String,
}

impl Default for MindflowSection {
    fn default() -> Self {
        Self {
            version: "0.1.0".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSection {
    pub key: String,
    pub db_file: String,
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            key: DEFAULT_STORAGE_KEY.to_string(),
            db_file: "mindflow.db".to_string(),
        }
    }
}

/// Offsets used to place new nodes when no position is supplied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub child_offset_x: f64,
    pub child_spacing_y: f64,
    pub middle_offset_x: f64,
    pub middle_offset_y: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            child_offset_x: 200.0,
            child_spacing_y: 70.0,
            middle_offset_x: 50.0,
            middle_offset_y: 100.0,
        }
    }
}

/// What the import boundary does with structural defects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ImportPolicy {
    /// Drop unreachable nodes and dangling edges, insert a missing root.
    #[default]
    Repair,
    /// Reject any graph that would need repair.
    Strict,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportSection {
    #[serde(default)]
    pub policy: ImportPolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

/// Global edge routing style handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EdgeRouting {
    #[default]
    SmoothStep,
    Straight,
}

impl EdgeRouting {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SmoothStep => "smoothstep",
            Self::Straight => "straight",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderSection {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub routing: EdgeRouting,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_round_trip_through_toml() {
        let config = MindflowConfig::default();
        let text = config.to_toml().unwrap();
        let back = MindflowConfig::from_toml(&text).unwrap();
        assert_eq!(back, config);
        assert!(text.contains("mind-map-storage"));
    }

    #[test]
    fn partial_file_fills_defaults() {
        let config = MindflowConfig::from_toml(
            r#"
[layout]
child_offset_x = 300.0
child_spacing_y = 40.0
middle_offset_x = 10.0
middle_offset_y = 20.0

[render]
theme = "light"
routing = "straight"
"#,
        )
        .unwrap();
        assert!((config.layout.child_offset_x - 300.0).abs() < f64::EPSILON);
        assert_eq!(config.render.theme, Theme::Light);
        assert_eq!(config.render.routing, EdgeRouting::Straight);
        assert_eq!(config.storage.key, DEFAULT_STORAGE_KEY);
        assert_eq!(config.import.policy, ImportPolicy::Repair);
    }

    #[test]
    fn partial_section_keeps_other_fields() {
        let config = MindflowConfig::from_toml("[layout]\nchild_offset_x = 120.0\n").unwrap();
        assert!((config.layout.child_offset_x - 120.0).abs() < f64::EPSILON);
        assert!((config.layout.child_spacing_y - 70.0).abs() < f64::EPSILON);
    }

    #[test]
    fn strict_policy_parses() {
        let config = MindflowConfig::from_toml("[import]\npolicy = \"strict\"\n").unwrap();
        assert_eq!(config.import.policy, ImportPolicy::Strict);
    }

    #[test]
    fn rejects_empty_storage_key() {
        let err = MindflowConfig::from_toml("[storage]\nkey = \"\"\ndb_file = \"x.db\"\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_non_positive_spacing() {
        let err = MindflowConfig::from_toml(
            "[layout]\nchild_offset_x = 1.0\nchild_spacing_y = 0.0\nmiddle_offset_x = 1.0\nmiddle_offset_y = 1.0\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("child_spacing_y"));
    }

    #[test]
    fn bad_syntax_is_a_parse_error() {
        let err = MindflowConfig::from_toml("[layout").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = MindflowConfig::load(&dir.path().join("config.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = MindflowConfig::default();
        config.render.theme = Theme::Light;
        config.save(&path).unwrap();
        assert_eq!(MindflowConfig::load(&path).unwrap(), config);
    }
}
