use crate::core::FieldName;
use crate::core::record::Record;
use crate::core::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum FormEvent {
    ValueChanged {
        field: FieldName,
        value: Value,
    },
    /// Published only when the stored message actually changes.
    ErrorChanged {
        field: FieldName,
        error: String,
    },
    Reset,
    Submitted {
        values: Record,
    },
}
