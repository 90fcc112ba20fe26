//! Hook trait and the Telegram hook implementation.

use std::fmt;

use crate::buffer::TextBuffer;
use crate::builder::TelegramHookBuilder;
use crate::error::HookError;
use crate::formatter::SharedFormatter;
use crate::level::{ALERT_LEVELS, HookLevel};
use crate::log_record::LogEntry;
use crate::pool::BufferPool;
use crate::telegram::{ChatId, TelegramClient};

/// Contract between a host logging framework and a hook.
///
/// The host calls [`Hook::fire`] for every entry whose level appears in
/// [`Hook::levels`]. Filtering is the host's job; `fire` handles any level.
/// Implementations must tolerate concurrent `fire` calls.
pub trait Hook: Send + Sync {
    /// Levels this hook wants to receive.
    fn levels(&self) -> &[HookLevel];

    /// Process one entry, returning any delivery failure to the host.
    fn fire(&self, entry: &LogEntry) -> Result<(), HookError>;
}

/// Hook posting error-level entries to a Telegram chat.
///
/// Construction verifies the bot token, so every `TelegramHook` is ready to
/// send. Each [`fire`](Hook::fire) formats the entry into a pooled buffer and
/// posts it synchronously. Failed deliveries are reported on stderr and
/// returned; they are never retried.
pub struct TelegramHook {
    app_name: String,
    client: TelegramClient,
    formatter: SharedFormatter,
    messages: BufferPool<TextBuffer>,
}

impl TelegramHook {
    /// Create a hook for `app_name`, verifying `token` against the API.
    ///
    /// # Errors
    ///
    /// Returns [`HookError::InvalidConfig`] for a blank token, otherwise any
    /// failure of the token verification call.
    pub fn new(
        app_name: impl Into<String>,
        token: impl Into<String>,
        chat_id: impl Into<ChatId>,
    ) -> Result<Self, HookError> {
        TelegramHookBuilder::new()
            .with_app_name(app_name)
            .with_token(token)
            .with_chat_id(chat_id)
            .build()
    }

    /// Start configuring a hook.
    pub fn builder() -> TelegramHookBuilder {
        TelegramHookBuilder::new()
    }

    pub(crate) fn from_parts(
        app_name: String,
        client: TelegramClient,
        formatter: SharedFormatter,
    ) -> Self {
        Self {
            app_name,
            client,
            formatter,
            messages: BufferPool::new(),
        }
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn client(&self) -> &TelegramClient {
        &self.client
    }

    fn deliver(&self, entry: &LogEntry) -> Result<(), HookError> {
        let mut text = self.messages.acquire();
        self.formatter
            .format(entry, &mut text)
            .map_err(HookError::Encode)?;
        self.client.send_message(&text)
    }
}

impl Hook for TelegramHook {
    fn levels(&self) -> &[HookLevel] {
        &ALERT_LEVELS
    }

    fn fire(&self, entry: &LogEntry) -> Result<(), HookError> {
        self.deliver(entry).inspect_err(|err| {
            diagnostic!("Unable to send message, {err}");
        })
    }
}

impl<H: Hook + ?Sized> Hook for std::sync::Arc<H> {
    fn levels(&self) -> &[HookLevel] {
        (**self).levels()
    }

    fn fire(&self, entry: &LogEntry) -> Result<(), HookError> {
        (**self).fire(entry)
    }
}

impl<H: Hook + ?Sized> Hook for Box<H> {
    fn levels(&self) -> &[HookLevel] {
        (**self).levels()
    }

    fn fire(&self, entry: &LogEntry) -> Result<(), HookError> {
        (**self).fire(entry)
    }
}

impl fmt::Debug for TelegramHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramHook")
            .field("app_name", &self.app_name)
            .field("client", &self.client)
            .field("formatter", &self.formatter)
            .field("messages", &self.messages)
            .finish()
    }
}
