//! The form controller.
//!
//! A [`FormState`] owns the current values, the defaults they reset to, one
//! error message per field, the trigger set and the submit callback. UI code
//! feeds it three notifications (`on_change`, `on_blur`, `on_submit`) and
//! reads errors back after awaiting them.
//!
//! Every method takes `&self`. Values and errors sit behind a mutex that is
//! never held across an `.await`, so validations of different fields may run
//! concurrently. Each field carries a ticket: a verdict is written only if no
//! newer validation of that field (or a reset) started while it was in flight.

use std::sync::{Mutex, MutexGuard, PoisonError};

use indexmap::IndexMap;
use tracing::{debug, info, trace};

use crate::config::FormConfig;
use crate::core::FieldName;
use crate::core::error::{ConfigError, FormError};
use crate::core::form_event::FormEvent;
use crate::core::record::Record;
use crate::core::trigger::Triggers;
use crate::core::value::Value;
use crate::schema::{SchemaError, SchemaValidator, first_message};
use crate::state::errors::ErrorMap;
use crate::state::subscribers::{SubscriptionId, Subscribers};

pub type SubmitCallback = Box<dyn Fn(Record) + Send + Sync>;

/// Message stored when a validator rejects a value without saying why.
const FALLBACK_MESSAGE: &str = "invalid value";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Every field was error-free; the callback ran once.
    Submitted,
    /// At least one field has an error; the callback did not run.
    Blocked,
}

struct Inner {
    values: Record,
    errors: ErrorMap,
    tickets: IndexMap<FieldName, u64>,
}

impl Inner {
    fn next_ticket(&mut self, field: &str) -> Option<u64> {
        let ticket = self.tickets.get_mut(field)?;
        *ticket += 1;
        Some(*ticket)
    }

    fn is_current(&self, field: &str, ticket: u64) -> bool {
        self.tickets.get(field) == Some(&ticket)
    }
}

pub struct FormState {
    keys: Vec<FieldName>,
    defaults: Record,
    triggers: Triggers,
    validator: Box<dyn SchemaValidator>,
    on_submit: SubmitCallback,
    inner: Mutex<Inner>,
    submit_gate: tokio::sync::Mutex<()>,
    subscribers: Subscribers,
}

impl FormState {
    pub fn new(
        defaults: Record,
        on_submit: impl Fn(Record) + Send + Sync + 'static,
        validator: impl SchemaValidator + 'static,
        triggers: Triggers,
    ) -> Self {
        let keys: Vec<FieldName> = defaults.keys().cloned().collect();
        let inner = Inner {
            values: defaults.clone(),
            errors: ErrorMap::for_keys(&keys),
            tickets: keys.iter().map(|k| (k.clone(), 0)).collect(),
        };

        Self {
            keys,
            defaults,
            triggers,
            validator: Box::new(validator),
            on_submit: Box::new(on_submit),
            inner: Mutex::new(inner),
            submit_gate: tokio::sync::Mutex::new(()),
            subscribers: Subscribers::new(),
        }
    }

    pub fn from_config(
        config: &FormConfig,
        on_submit: impl Fn(Record) + Send + Sync + 'static,
    ) -> Result<Self, ConfigError> {
        let schema = config.schema()?;
        Ok(Self::new(config.defaults(), on_submit, schema, config.triggers))
    }

    fn inner(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn ensure_known(&self, field: &str) -> Result<(), FormError> {
        if self.defaults.contains(field) {
            Ok(())
        } else {
            Err(FormError::unknown_field(field))
        }
    }

    pub fn keys(&self) -> Vec<FieldName> {
        self.keys.clone()
    }

    pub fn triggers(&self) -> Triggers {
        self.triggers
    }

    pub fn get_value(&self, field: &str) -> Result<Value, FormError> {
        self.inner()
            .values
            .get(field)
            .cloned()
            .ok_or_else(|| FormError::unknown_field(field))
    }

    pub fn set_value(&self, field: &str, value: impl Into<Value>) -> Result<(), FormError> {
        let value = value.into();
        {
            let mut inner = self.inner();
            let slot = inner
                .values
                .get_mut(field)
                .ok_or_else(|| FormError::unknown_field(field))?;
            *slot = value.clone();
        }
        trace!(field, %value, "value set");
        self.subscribers.notify(&[FormEvent::ValueChanged {
            field: field.into(),
            value,
        }]);
        Ok(())
    }

    pub fn get_error(&self, field: &str) -> Result<String, FormError> {
        self.inner()
            .errors
            .get(field)
            .map(str::to_string)
            .ok_or_else(|| FormError::unknown_field(field))
    }

    pub fn has_error(&self, field: &str) -> Result<bool, FormError> {
        self.inner()
            .errors
            .has_error(field)
            .ok_or_else(|| FormError::unknown_field(field))
    }

    pub fn has_errors(&self) -> bool {
        self.inner().errors.has_errors()
    }

    /// Snapshot of the current values.
    pub fn values(&self) -> Record {
        self.inner().values.clone()
    }

    /// Snapshot of the current errors.
    pub fn errors(&self) -> ErrorMap {
        self.inner().errors.clone()
    }

    /// Restore defaults and clear every error. Validations still in flight
    /// are invalidated and will not write their verdicts.
    pub fn reset(&self) {
        {
            let mut inner = self.inner();
            inner.values = self.defaults.clone();
            inner.errors.clear_all();
            for ticket in inner.tickets.values_mut() {
                *ticket += 1;
            }
        }
        debug!("form reset to defaults");
        self.subscribers.notify(&[FormEvent::Reset]);
    }

    pub fn subscribe(&self, listener: impl Fn(&FormEvent) + Send + Sync + 'static) -> SubscriptionId {
        self.subscribers.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    /// Store `value`, then validate the field if `CHANGE` is among the triggers.
    pub async fn on_change(&self, field: &str, value: impl Into<Value>) -> Result<(), FormError> {
        self.set_value(field, value)?;
        if self.triggers.on_change() {
            self.validate_field(field).await?;
        }
        Ok(())
    }

    /// Validate the field's stored value if `BLUR` is among the triggers.
    /// `value` is the widget's value at blur time; it is not written.
    pub async fn on_blur(&self, field: &str, value: impl Into<Value>) -> Result<(), FormError> {
        self.ensure_known(field)?;
        let value = value.into();
        trace!(field, %value, "field blurred");
        if self.triggers.on_blur() {
            self.validate_field(field).await?;
        }
        Ok(())
    }

    /// Validate every field if `SUBMIT` is among the triggers, then hand a copy
    /// of the values to the submit callback if no field has an error.
    ///
    /// Submits are serialized: a second call waits for the first to finish,
    /// so the callback never runs concurrently with itself.
    pub async fn on_submit(&self) -> Result<SubmitOutcome, FormError> {
        let _gate = self.submit_gate.lock().await;

        if self.triggers.on_submit() {
            self.validate_all().await?;
        }

        if self.has_errors() {
            return Ok(SubmitOutcome::Blocked);
        }

        let snapshot = self.values();
        info!(fields = snapshot.len(), "submitting form");
        (self.on_submit)(snapshot.clone());
        self.subscribers
            .notify(&[FormEvent::Submitted { values: snapshot }]);
        Ok(SubmitOutcome::Submitted)
    }

    /// Validate one field against `{field: value}` and store the outcome.
    /// Only `field`'s error entry is ever written.
    pub async fn validate_field(&self, field: &str) -> Result<(), FormError> {
        let (name, partial, ticket) = {
            let mut inner = self.inner();
            let partial = inner
                .values
                .project(field)
                .ok_or_else(|| FormError::unknown_field(field))?;
            let ticket = inner
                .next_ticket(field)
                .ok_or_else(|| FormError::unknown_field(field))?;
            (FieldName::from(field), partial, ticket)
        };

        debug!(field, ticket, "validating field");
        let error = match self.validator.validate_at(&name, &partial).await {
            Ok(()) => String::new(),
            Err(SchemaError::Invalid(violations)) => {
                first_message(&name, &violations).unwrap_or_else(|| FALLBACK_MESSAGE.to_string())
            }
            Err(SchemaError::Misconfigured(reason)) => {
                return Err(FormError::Validator { field: name, reason });
            }
        };

        let changed = {
            let mut inner = self.inner();
            if !inner.is_current(field, ticket) {
                debug!(field, ticket, "discarding stale validation result");
                return Ok(());
            }
            inner.errors.set(field, error.clone())
        };

        debug!(field, ticket, error = error.as_str(), "validation settled");
        if changed {
            self.subscribers
                .notify(&[FormEvent::ErrorChanged { field: name, error }]);
        }
        Ok(())
    }

    /// Validate every field in key order, one at a time.
    pub async fn validate_all(&self) -> Result<(), FormError> {
        for field in &self.keys {
            self.validate_field(field.as_str()).await?;
        }
        Ok(())
    }
}
