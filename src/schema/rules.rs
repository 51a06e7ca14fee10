use std::sync::LazyLock;

use async_trait::async_trait;
use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::core::FieldName;
use crate::core::error::ConfigError;
use crate::core::record::Record;
use crate::core::value::Value;
use crate::schema::{SchemaError, SchemaValidator, Violation};

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex must compile"));

/// A declarative rule as written in a form description.
///
/// Absent values (null or empty text) only ever fail `required`; every other
/// rule is skipped for them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Rule {
    Required {
        #[serde(default)]
        message: Option<String>,
    },
    MinLength {
        len: usize,
        #[serde(default)]
        message: Option<String>,
    },
    MaxLength {
        len: usize,
        #[serde(default)]
        message: Option<String>,
    },
    Min {
        value: f64,
        #[serde(default)]
        message: Option<String>,
    },
    Max {
        value: f64,
        #[serde(default)]
        message: Option<String>,
    },
    Email {
        #[serde(default)]
        message: Option<String>,
    },
    Pattern {
        regex: String,
        #[serde(default)]
        message: Option<String>,
    },
}

impl Rule {
    pub fn required(message: impl Into<String>) -> Self {
        Self::Required {
            message: Some(message.into()),
        }
    }

    pub fn min(value: f64, message: impl Into<String>) -> Self {
        Self::Min {
            value,
            message: Some(message.into()),
        }
    }

    pub fn max(value: f64, message: impl Into<String>) -> Self {
        Self::Max {
            value,
            message: Some(message.into()),
        }
    }

    pub fn email(message: impl Into<String>) -> Self {
        Self::Email {
            message: Some(message.into()),
        }
    }

    pub fn pattern(regex: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Pattern {
            regex: regex.into(),
            message: Some(message.into()),
        }
    }
}

#[derive(Debug, Clone)]
enum Check {
    Required(String),
    MinLength(usize, String),
    MaxLength(usize, String),
    Min(f64, String),
    Max(f64, String),
    Email(String),
    Pattern(Regex, String),
}

impl Check {
    fn compile(field: &FieldName, rule: &Rule) -> Result<Self, ConfigError> {
        let msg = |message: &Option<String>, fallback: String| message.clone().unwrap_or(fallback);
        Ok(match rule {
            Rule::Required { message } => {
                Self::Required(msg(message, format!("{field} is a required field")))
            }
            Rule::MinLength { len, message } => Self::MinLength(
                *len,
                msg(message, format!("{field} must be at least {len} characters")),
            ),
            Rule::MaxLength { len, message } => Self::MaxLength(
                *len,
                msg(message, format!("{field} must be at most {len} characters")),
            ),
            Rule::Min { value, message } => Self::Min(
                *value,
                msg(message, format!("{field} must be greater than or equal to {value}")),
            ),
            Rule::Max { value, message } => Self::Max(
                *value,
                msg(message, format!("{field} must be less than or equal to {value}")),
            ),
            Rule::Email { message } => {
                Self::Email(msg(message, format!("{field} must be a valid email")))
            }
            Rule::Pattern { regex, message } => {
                let compiled = Regex::new(regex).map_err(|err| ConfigError::InvalidPattern {
                    field: field.clone(),
                    pattern: regex.clone(),
                    reason: err.to_string(),
                })?;
                Self::Pattern(
                    compiled,
                    msg(message, format!("{field} must match the following: \"{regex}\"")),
                )
            }
        })
    }

    /// `Err(message)` when the check fails, `Ok(())` when it passes or does not apply.
    fn run(&self, field: &FieldName, value: &Value) -> Result<(), String> {
        if value.is_empty() {
            return match self {
                Self::Required(message) => Err(message.clone()),
                _ => Ok(()),
            };
        }

        match self {
            Self::Required(_) => Ok(()),
            Self::MinLength(len, message) => {
                (value.to_string().chars().count() >= *len).then_some(()).ok_or_else(|| message.clone())
            }
            Self::MaxLength(len, message) => {
                (value.to_string().chars().count() <= *len).then_some(()).ok_or_else(|| message.clone())
            }
            Self::Min(min, message) => {
                let number = number_of(field, value)?;
                (number >= *min).then_some(()).ok_or_else(|| message.clone())
            }
            Self::Max(max, message) => {
                let number = number_of(field, value)?;
                (number <= *max).then_some(()).ok_or_else(|| message.clone())
            }
            Self::Email(message) => {
                EMAIL.is_match(&value.to_string()).then_some(()).ok_or_else(|| message.clone())
            }
            Self::Pattern(regex, message) => {
                regex.is_match(&value.to_string()).then_some(()).ok_or_else(|| message.clone())
            }
        }
    }
}

fn number_of(field: &FieldName, value: &Value) -> Result<f64, String> {
    value
        .as_number()
        .ok_or_else(|| format!("{field} must be a number"))
}

/// Rule-based [`SchemaValidator`]: a list of rules per field, evaluated in
/// declaration order. Fields without rules always pass.
#[derive(Debug, Clone, Default)]
pub struct RuleSchema {
    fields: IndexMap<FieldName, Vec<Check>>,
}

impl RuleSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(
        mut self,
        field: impl Into<FieldName>,
        rules: impl IntoIterator<Item = Rule>,
    ) -> Result<Self, ConfigError> {
        let field = field.into();
        let checks = rules
            .into_iter()
            .map(|rule| Check::compile(&field, &rule))
            .collect::<Result<Vec<_>, _>>()?;
        self.fields.entry(field).or_default().extend(checks);
        Ok(self)
    }

    pub fn check(&self, field: &FieldName, value: &Value) -> Vec<Violation> {
        let Some(checks) = self.fields.get(field) else {
            return Vec::new();
        };
        checks
            .iter()
            .filter_map(|check| check.run(field, value).err())
            .map(|message| Violation::new(field, message))
            .collect()
    }
}

#[async_trait]
impl SchemaValidator for RuleSchema {
    async fn validate_at(&self, field: &FieldName, partial: &Record) -> Result<(), SchemaError> {
        let value = partial.get(field.as_str()).cloned().unwrap_or_default();
        let violations = self.check(field, &value);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::Invalid(violations))
        }
    }
}
