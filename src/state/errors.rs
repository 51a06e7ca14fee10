use indexmap::IndexMap;
use serde::Serialize;

use crate::core::FieldName;

/// Current error message per field; an empty string means no error.
/// The key set is fixed when the map is built.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct ErrorMap {
    entries: IndexMap<FieldName, String>,
}

impl ErrorMap {
    pub fn for_keys<'a>(keys: impl IntoIterator<Item = &'a FieldName>) -> Self {
        Self {
            entries: keys.into_iter().map(|k| (k.clone(), String::new())).collect(),
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.entries.get(field).map(String::as_str)
    }

    pub fn has_error(&self, field: &str) -> Option<bool> {
        self.get(field).map(|error| !error.is_empty())
    }

    pub fn has_errors(&self) -> bool {
        self.entries.values().any(|error| !error.is_empty())
    }

    /// Returns `true` when the stored message changed. Unknown fields are ignored.
    pub(crate) fn set(&mut self, field: &str, error: impl Into<String>) -> bool {
        let Some(slot) = self.entries.get_mut(field) else {
            return false;
        };
        let error = error.into();
        if *slot == error {
            return false;
        }
        *slot = error;
        true
    }

    pub(crate) fn clear_all(&mut self) {
        for error in self.entries.values_mut() {
            error.clear();
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldName, &str)> {
        self.entries.iter().map(|(k, v)| (k, v.as_str()))
    }

    pub fn visible_entries(&self) -> impl Iterator<Item = (&FieldName, &str)> {
        self.iter().filter(|(_, error)| !error.is_empty())
    }
}
