//! Compatibility bridge for the Rust `log` crate.
//!
//! [`TelegramLogAdapter`] implements `log::Log` on top of any [`Hook`]. Records
//! at levels the hook declares are converted into [`LogEntry`] values, with
//! the record's key/value pairs becoming entry fields, and fired
//! synchronously on the logging thread.

use std::sync::Arc;

use log::kv::{self, Key, Value, VisitSource};
use log::{LevelFilter, Metadata, Record, SetLoggerError};
use thiserror::Error;

use crate::hook::Hook;
use crate::level::HookLevel;
use crate::log_record::{FieldValue, Fields, LogEntry};

fn map_log_level(level: log::Level) -> HookLevel {
    match level {
        log::Level::Trace => HookLevel::Trace,
        log::Level::Debug => HookLevel::Debug,
        log::Level::Info => HookLevel::Info,
        log::Level::Warn => HookLevel::Warn,
        log::Level::Error => HookLevel::Error,
    }
}

impl From<log::Level> for HookLevel {
    fn from(level: log::Level) -> Self {
        map_log_level(level)
    }
}

/// Error captured from a key/value pair by its display text.
#[derive(Debug, Error)]
#[error("{0}")]
struct CapturedError(String);

fn field_value(value: &Value<'_>) -> FieldValue {
    if let Some(err) = value.to_borrowed_error() {
        return FieldValue::Error(Arc::new(CapturedError(err.to_string())));
    }
    if let Some(b) = value.to_bool() {
        return b.into();
    }
    if let Some(n) = value.to_i64() {
        return n.into();
    }
    if let Some(n) = value.to_u64() {
        return n.into();
    }
    if let Some(n) = value.to_f64() {
        return n.into();
    }
    if let Some(s) = value.to_borrowed_str() {
        return s.into();
    }
    value.to_string().into()
}

struct FieldCollector<'a> {
    fields: &'a mut Fields,
}

impl<'kvs> VisitSource<'kvs> for FieldCollector<'_> {
    fn visit_pair(&mut self, key: Key<'kvs>, value: Value<'kvs>) -> Result<(), kv::Error> {
        self.fields
            .insert(key.as_str().to_owned(), field_value(&value));
        Ok(())
    }
}

/// Build a [`LogEntry`] from a `log` record.
pub fn entry_from_record(record: &Record<'_>) -> LogEntry {
    let mut fields = Fields::new();
    // FieldCollector never fails.
    let _ = record
        .key_values()
        .visit(&mut FieldCollector { fields: &mut fields });
    LogEntry::new(record.level().into(), record.args().to_string()).with_fields(fields)
}

/// Adapter implementing the Rust `log::Log` trait for a [`Hook`].
pub struct TelegramLogAdapter<H> {
    hook: H,
}

impl<H: Hook> TelegramLogAdapter<H> {
    pub fn new(hook: H) -> Self {
        Self { hook }
    }

    pub fn hook(&self) -> &H {
        &self.hook
    }

    fn wants(&self, level: log::Level) -> bool {
        self.hook.levels().contains(&HookLevel::from(level))
    }
}

impl<H: Hook> log::Log for TelegramLogAdapter<H> {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        self.wants(metadata.level())
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        // Failures were already reported by the hook; `log` has no way to
        // surface them to the caller.
        let _ = self.hook.fire(&entry_from_record(record));
    }

    fn flush(&self) {}
}

/// Install `hook` as the global `log` backend.
///
/// The maximum level is lowered to `Error` because the hook ignores
/// everything below it.
///
/// # Errors
///
/// Fails when another global logger has already been set.
pub fn install<H: Hook + 'static>(hook: H) -> Result<(), SetLoggerError> {
    log::set_boxed_logger(Box::new(TelegramLogAdapter::new(hook)))?;
    log::set_max_level(LevelFilter::Error);
    Ok(())
}
