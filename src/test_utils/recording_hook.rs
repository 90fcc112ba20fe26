//! A hook that accumulates entries in memory for test assertions.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{ApiError, HookError};
use crate::hook::Hook;
use crate::level::HookLevel;
use crate::log_record::LogEntry;

/// Hook storing every entry it receives for later inspection.
#[derive(Clone)]
pub struct RecordingHook {
    levels: &'static [HookLevel],
    entries: Arc<Mutex<Vec<LogEntry>>>,
    fail: bool,
}

impl RecordingHook {
    /// Hook that accepts every entry.
    pub fn new(levels: &'static [HookLevel]) -> Self {
        Self {
            levels,
            entries: Arc::default(),
            fail: false,
        }
    }

    /// Hook that records entries but reports every delivery as failed.
    pub fn failing(levels: &'static [HookLevel]) -> Self {
        Self {
            fail: true,
            ..Self::new(levels)
        }
    }

    /// Return a snapshot of all entries received so far.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().clone()
    }
}

impl Hook for RecordingHook {
    fn levels(&self) -> &[HookLevel] {
        self.levels
    }

    fn fire(&self, entry: &LogEntry) -> Result<(), HookError> {
        self.entries.lock().push(entry.clone());
        if self.fail {
            return Err(ApiError {
                code: Some(500),
                description: Some("recording hook failure".into()),
                response: None,
            }
            .into());
        }
        Ok(())
    }
}
