use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::FieldName;
use crate::core::error::ConfigError;
use crate::core::record::Record;
use crate::core::trigger::Triggers;
use crate::core::value::Value;
use crate::schema::rules::{Rule, RuleSchema};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FieldConfig {
    #[serde(default)]
    pub default: Value,
    #[serde(default)]
    pub rules: Vec<Rule>,
}

/// Form description: fields in declaration order, each with a default value
/// and its rules, plus the trigger set.
///
/// ```yaml
/// triggers: BLUR | SUBMIT
/// fields:
///   name:
///     default: ""
///     rules:
///       - { type: required, message: "A name is required." }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FormConfig {
    #[serde(default)]
    pub triggers: Triggers,
    pub fields: IndexMap<FieldName, FieldConfig>,
}

impl FormConfig {
    pub fn from_yaml_str(input: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(input)?)
    }

    pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(input)?)
    }

    /// Load from a `.yaml`, `.yml` or `.json` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        let parse: fn(&str) -> Result<Self, ConfigError> = match extension.as_deref() {
            Some("yaml" | "yml") => Self::from_yaml_str,
            Some("json") => Self::from_json_str,
            _ => {
                return Err(ConfigError::UnsupportedFormat {
                    path: path.to_path_buf(),
                });
            }
        };
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        parse(&raw)
    }

    pub fn defaults(&self) -> Record {
        self.fields
            .iter()
            .map(|(name, field)| (name, field.default.clone()))
            .collect()
    }

    pub fn schema(&self) -> Result<RuleSchema, ConfigError> {
        self.fields
            .iter()
            .try_fold(RuleSchema::new(), |schema, (name, field)| {
                schema.field(name, field.rules.iter().cloned())
            })
    }
}
