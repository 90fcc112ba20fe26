//! Logging hook forwarding error-level records to a Telegram chat.
//!
//! [`TelegramHook`] verifies a bot token when it is built and then posts one
//! HTML-formatted message per [`LogEntry`] through the Bot API. Hosts drive it
//! through the [`Hook`] trait; adapters are provided for the `log` facade
//! ([`log_compat`]) and for process panics ([`panic_hook`]).
//!
//! ```no_run
//! use telegram_log_hook::{Hook, HookLevel, LogEntry, TelegramHook};
//!
//! let hook = TelegramHook::new("billing", "123456:ABC-DEF", -1001234567890_i64)?;
//! let entry = LogEntry::new(HookLevel::Error, "invoice run failed")
//!     .with_field("invoice", 42)
//!     .with_error(std::io::Error::other("connection reset"));
//! hook.fire(&entry)?;
//! # Ok::<(), telegram_log_hook::HookError>(())
//! ```

#[macro_use]
mod macros;

pub mod buffer;
pub mod builder;
mod diagnostics;
pub mod error;
pub mod formatter;
pub mod hook;
pub mod json;
pub mod level;
#[cfg(feature = "log-compat")]
pub mod log_compat;
pub mod log_record;
pub mod panic_hook;
pub mod pool;
pub mod telegram;

#[cfg(any(test, feature = "test-util"))]
pub mod test_utils;

pub use buffer::TextBuffer;
pub use builder::TelegramHookBuilder;
pub use error::{ApiError, HookError};
pub use formatter::{HtmlMessageFormatter, MessageFormatter, SharedFormatter, format_message};
pub use hook::{Hook, TelegramHook};
pub use level::{ALERT_LEVELS, HookLevel};
#[cfg(feature = "log-compat")]
pub use log_compat::TelegramLogAdapter;
pub use log_record::{ERROR_KEY, FieldValue, Fields, LogEntry};
pub use panic_hook::install_panic_hook;
pub use pool::{BufferPool, Pooled, Reusable};
pub use telegram::{ChatId, ClientConfig, TelegramClient};
