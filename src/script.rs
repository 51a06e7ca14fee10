use serde::{Deserialize, Serialize};

use crate::core::FieldName;
use crate::core::error::FormError;
use crate::core::value::Value;
use crate::state::form::{FormState, SubmitOutcome};

/// One UI occurrence, as read from a JSON-lines event script:
///
/// ```json
/// {"on": "change", "field": "name", "value": "n"}
/// {"on": "blur", "field": "name", "value": "n"}
/// {"on": "submit"}
/// {"on": "reset"}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "on", rename_all = "snake_case")]
pub enum ScriptEvent {
    Change {
        field: FieldName,
        #[serde(default)]
        value: Value,
    },
    Blur {
        field: FieldName,
        #[serde(default)]
        value: Value,
    },
    Submit,
    Reset,
}

impl ScriptEvent {
    pub fn parse_line(line: &str) -> Result<Option<Self>, serde_json::Error> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }
        serde_json::from_str(line).map(Some)
    }

    /// Apply to `form`. Only a submit has an outcome.
    pub async fn apply(self, form: &FormState) -> Result<Option<SubmitOutcome>, FormError> {
        match self {
            Self::Change { field, value } => {
                form.on_change(field.as_str(), value).await?;
                Ok(None)
            }
            Self::Blur { field, value } => {
                form.on_blur(field.as_str(), value).await?;
                Ok(None)
            }
            Self::Submit => form.on_submit().await.map(Some),
            Self::Reset => {
                form.reset();
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ScriptEvent;
    use crate::core::record::Record;
    use crate::core::trigger::Triggers;
    use crate::core::value::Value;
    use crate::schema::rules::{Rule, RuleSchema};
    use crate::state::form::{FormState, SubmitOutcome};

    #[test]
    fn parses_tagged_lines_and_skips_blanks() {
        assert_eq!(
            ScriptEvent::parse_line(r#"{"on": "blur", "field": "address", "value": null}"#)
                .expect("line should parse"),
            Some(ScriptEvent::Blur {
                field: "address".into(),
                value: Value::Null,
            })
        );
        assert_eq!(ScriptEvent::parse_line("   ").expect("blank"), None);
        assert_eq!(ScriptEvent::parse_line("# comment").expect("comment"), None);
        assert!(ScriptEvent::parse_line(r#"{"on": "hover"}"#).is_err());
    }

    #[tokio::test]
    async fn applies_events_in_order() {
        let schema = RuleSchema::new()
            .field("name", [Rule::required("A name is required.")])
            .expect("schema should build");
        let form = FormState::new(Record::new().with("name", ""), |_| {}, schema, Triggers::default());

        let script = [
            r#"{"on": "submit"}"#,
            r#"{"on": "change", "field": "name", "value": "n"}"#,
            r#"{"on": "submit"}"#,
        ];
        let mut outcomes = Vec::new();
        for line in script {
            let event = ScriptEvent::parse_line(line).expect("parse").expect("event");
            outcomes.push(event.apply(&form).await.expect("apply"));
        }

        assert_eq!(
            outcomes,
            vec![Some(SubmitOutcome::Blocked), None, Some(SubmitOutcome::Submitted)]
        );
    }
}
