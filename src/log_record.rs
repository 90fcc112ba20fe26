//! Log entry representation handed to hooks.
//!
//! A [`LogEntry`] carries the severity, the message and a map of structured
//! fields. Fields are kept in a [`BTreeMap`] so serialization order is stable
//! across calls. An error attached under [`ERROR_KEY`] is rendered next to the
//! message by the formatter.

use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::level::HookLevel;

/// Field name under which an error value is attached to an entry.
pub const ERROR_KEY: &str = "error";

/// Shared, thread-safe error object stored in a field.
pub type SharedError = Arc<dyn StdError + Send + Sync + 'static>;

/// Structured fields attached to a [`LogEntry`].
pub type Fields = BTreeMap<String, FieldValue>;

/// Value stored in a log entry field.
#[derive(Clone)]
pub enum FieldValue {
    /// Arbitrary JSON value.
    Value(Value),
    /// An error object. Serializes as its `Display` text.
    Error(SharedError),
}

impl FieldValue {
    /// Wrap an owned error.
    pub fn error<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::Error(Arc::new(err))
    }

    /// Return the error object if this field holds one.
    pub fn as_error(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        match self {
            Self::Error(err) => Some(err.as_ref()),
            Self::Value(_) => None,
        }
    }
}

impl fmt::Debug for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => write!(f, "{value}"),
            Self::Error(err) => write!(f, "Error({err})"),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Value(value) => value.serialize(serializer),
            Self::Error(err) => serializer.collect_str(err),
        }
    }
}

macro_rules! field_value_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for FieldValue {
                fn from(value: $ty) -> Self {
                    Self::Value(Value::from(value))
                }
            }
        )*
    };
}

field_value_from!(&str, String, bool, i32, i64, u32, u64, f64, Value);

impl From<SharedError> for FieldValue {
    fn from(err: SharedError) -> Self {
        Self::Error(err)
    }
}

/// A single log event.
#[derive(Clone, Debug, Default)]
pub struct LogEntry {
    level: HookLevel,
    message: String,
    fields: Fields,
}

impl LogEntry {
    /// Construct an entry with no fields.
    pub fn new(level: HookLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            fields: Fields::new(),
        }
    }

    /// Attach a field, replacing any previous value under `key`.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Attach an error under [`ERROR_KEY`].
    pub fn with_error<E>(mut self, err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        self.fields
            .insert(ERROR_KEY.to_owned(), FieldValue::error(err));
        self
    }

    /// Replace every field at once.
    pub fn with_fields(mut self, fields: Fields) -> Self {
        self.fields = fields;
        self
    }

    pub fn level(&self) -> HookLevel {
        self.level
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// The error stored under [`ERROR_KEY`], if that field holds an error
    /// object rather than a plain value.
    pub fn error(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.fields.get(ERROR_KEY).and_then(FieldValue::as_error)
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.level, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn error_accessor_ignores_plain_values() {
        let entry = LogEntry::new(HookLevel::Error, "oops").with_field(ERROR_KEY, "not an error");
        assert!(entry.error().is_none());
    }

    #[test]
    fn error_accessor_returns_attached_error() {
        let entry = LogEntry::new(HookLevel::Error, "oops")
            .with_error(io::Error::other("disk on fire"));
        let err = entry.error().expect("error field");
        assert_eq!(err.to_string(), "disk on fire");
    }

    #[test]
    fn error_fields_serialize_as_text() {
        let value = FieldValue::error(io::Error::other("boom"));
        let json = serde_json::to_string(&value).expect("serialize");
        assert_eq!(json, "\"boom\"");
    }

    #[test]
    fn fields_serialize_in_key_order() {
        let entry = LogEntry::new(HookLevel::Info, "ordered")
            .with_field("zebra", 1)
            .with_field("animal", "walrus");
        let json = serde_json::to_string(entry.fields()).expect("serialize");
        assert_eq!(json, r#"{"animal":"walrus","zebra":1}"#);
    }

    #[test]
    fn display_shows_level_and_message() {
        let entry = LogEntry::new(HookLevel::Fatal, "going down");
        assert_eq!(entry.to_string(), "FATAL - going down");
    }
}
