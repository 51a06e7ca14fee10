pub mod config;
pub mod core;
pub mod report;
pub mod schema;
pub mod script;
pub mod state;

pub use crate::core::error::{ConfigError, FormError};
pub use crate::core::form_event::FormEvent;
pub use crate::core::record::Record;
pub use crate::core::trigger::Triggers;
pub use crate::core::value::Value;
pub use crate::core::FieldName;

pub use config::FormConfig;
pub use schema::rules::{Rule, RuleSchema};
pub use schema::{SchemaError, SchemaValidator, Violation};
pub use state::errors::ErrorMap;
pub use state::form::{FormState, SubmitOutcome};
pub use state::subscribers::SubscriptionId;
