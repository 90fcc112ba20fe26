use std::fmt;

/// Severity of a log entry, ordered from least to most severe.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HookLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Fatal,
    Panic,
}

/// Levels the Telegram hook asks its host to deliver.
pub const ALERT_LEVELS: [HookLevel; 3] = [HookLevel::Error, HookLevel::Fatal, HookLevel::Panic];

impl HookLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            HookLevel::Trace => "TRACE",
            HookLevel::Debug => "DEBUG",
            HookLevel::Info => "INFO",
            HookLevel::Warn => "WARN",
            HookLevel::Error => "ERROR",
            HookLevel::Fatal => "FATAL",
            HookLevel::Panic => "PANIC",
        }
    }

    /// Label rendered in bold ahead of alert-level messages.
    ///
    /// Returns `None` below [`HookLevel::Error`].
    pub fn alert_label(self) -> Option<&'static str> {
        (self >= HookLevel::Error).then(|| self.as_str())
    }
}

impl fmt::Display for HookLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
