//! Builder for [`TelegramHook`].
//!
//! Collects the application name, bot credentials and transport settings,
//! validates them without touching the network, and then connects. Settings
//! can also be read from the environment with
//! [`TelegramHookBuilder::from_env`].

use std::env;
use std::fmt;
use std::time::Duration;

use crate::error::HookError;
use crate::formatter::{HtmlMessageFormatter, MessageFormatter, SharedFormatter};
use crate::hook::TelegramHook;
use crate::telegram::{ChatId, ClientConfig, DEFAULT_API_BASE, TelegramClient};

/// Environment variable holding the bot token.
pub const ENV_TOKEN: &str = "TELEGRAM_TOKEN";
/// Environment variable holding the destination chat.
pub const ENV_TARGET: &str = "TELEGRAM_TARGET";
/// Environment variable holding the application name.
pub const ENV_APP_NAME: &str = "TELEGRAM_APP_NAME";
/// Environment variable overriding the Bot API host.
pub const ENV_API_URL: &str = "TELEGRAM_API_URL";

macro_rules! ensure_positive {
    ($value:expr, $field:expr) => {{
        if $value == 0 {
            Err(HookError::InvalidConfig(format!(
                "{} must be greater than zero",
                $field
            )))
        } else {
            Ok($value)
        }
    }};
}

macro_rules! option_setter {
    ($(#[$meta:meta])* $fn_name:ident, $field:ident, $ty:ty) => {
        $(#[$meta])*
        pub fn $fn_name(mut self, value: $ty) -> Self {
            self.$field = Some(value);
            self
        }
    };
}

#[derive(Clone, Default)]
pub struct TelegramHookBuilder {
    app_name: String,
    token: Option<String>,
    chat_id: Option<ChatId>,
    api_base: Option<String>,
    connect_timeout_ms: Option<u64>,
    timeout_ms: Option<u64>,
    formatter: Option<SharedFormatter>,
}

impl TelegramHookBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a builder from `TELEGRAM_*` environment variables.
    ///
    /// Missing variables are left unset; [`build`](Self::build) reports a
    /// missing token.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            app_name: lookup(ENV_APP_NAME).unwrap_or_default(),
            token: lookup(ENV_TOKEN),
            chat_id: lookup(ENV_TARGET).map(ChatId::from),
            api_base: lookup(ENV_API_URL),
            ..Self::default()
        }
    }

    /// Name shown after the `@` in every message.
    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = app_name.into();
        self
    }

    /// Bot token issued by BotFather (required).
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_chat_id(mut self, chat_id: impl Into<ChatId>) -> Self {
        self.chat_id = Some(chat_id.into());
        self
    }

    /// Override the Bot API host, e.g. for a local Bot API server.
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base = Some(url.into());
        self
    }

    /// Replace the default [`HtmlMessageFormatter`].
    pub fn with_formatter<F>(mut self, formatter: F) -> Self
    where
        F: MessageFormatter + 'static,
    {
        self.formatter = Some(SharedFormatter::new(formatter));
        self
    }

    option_setter!(
        #[doc = "Set the connect timeout in milliseconds."]
        with_connect_timeout_ms,
        connect_timeout_ms,
        u64
    );
    option_setter!(
        #[doc = "Set the overall request timeout in milliseconds."]
        with_timeout_ms,
        timeout_ms,
        u64
    );

    fn validate(&self) -> Result<(), HookError> {
        self.validate_token()?;
        self.validate_api_base()?;
        self.validate_timeouts()?;
        Ok(())
    }

    fn validate_token(&self) -> Result<(), HookError> {
        match &self.token {
            None => Err(HookError::InvalidConfig(
                "Telegram hook requires a bot token".into(),
            )),
            Some(token) if token.trim().is_empty() => Err(HookError::InvalidConfig(
                "bot token must not be empty".into(),
            )),
            _ => Ok(()),
        }
    }

    fn validate_api_base(&self) -> Result<(), HookError> {
        match &self.api_base {
            Some(url) if url.trim().is_empty() => Err(HookError::InvalidConfig(
                "API base URL must not be empty".into(),
            )),
            _ => Ok(()),
        }
    }

    fn validate_timeouts(&self) -> Result<(), HookError> {
        if let Some(timeout) = self.connect_timeout_ms {
            ensure_positive!(timeout, "connect_timeout_ms")?;
        }
        if let Some(timeout) = self.timeout_ms {
            ensure_positive!(timeout, "timeout_ms")?;
        }
        Ok(())
    }

    /// Validate the settings into a [`ClientConfig`] without connecting.
    pub fn client_config(&self) -> Result<ClientConfig, HookError> {
        self.validate()?;
        Ok(ClientConfig {
            api_base: self
                .api_base
                .clone()
                .unwrap_or_else(|| DEFAULT_API_BASE.to_owned()),
            token: self.token.clone().unwrap_or_default(),
            chat_id: self
                .chat_id
                .clone()
                .unwrap_or_else(|| ChatId::Username(String::new())),
            connect_timeout: self.connect_timeout_ms.map(Duration::from_millis),
            timeout: self.timeout_ms.map(Duration::from_millis),
        })
    }

    /// Validate, verify the token with the API, and build the hook.
    ///
    /// # Errors
    ///
    /// [`HookError::InvalidConfig`] for invalid settings, otherwise any error
    /// from [`TelegramClient::connect`].
    pub fn build(&self) -> Result<TelegramHook, HookError> {
        let config = self.client_config()?;
        let client = TelegramClient::connect(&config)?;
        let formatter = self
            .formatter
            .clone()
            .unwrap_or_else(|| SharedFormatter::new(HtmlMessageFormatter::new(&self.app_name)));
        Ok(TelegramHook::from_parts(
            self.app_name.clone(),
            client,
            formatter,
        ))
    }
}

impl fmt::Debug for TelegramHookBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramHookBuilder")
            .field("app_name", &self.app_name)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("chat_id", &self.chat_id)
            .field("api_base", &self.api_base)
            .field("connect_timeout_ms", &self.connect_timeout_ms)
            .field("timeout_ms", &self.timeout_ms)
            .finish_non_exhaustive()
    }
}
