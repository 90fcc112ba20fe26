//! Connection settings consumed by [`TelegramClient`](super::TelegramClient).

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Production Bot API host.
pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Destination chat: a numeric id or a public `@channelusername`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChatId {
    Id(i64),
    Username(String),
}

impl From<i64> for ChatId {
    fn from(id: i64) -> Self {
        Self::Id(id)
    }
}

impl From<&str> for ChatId {
    fn from(s: &str) -> Self {
        Self::from(s.to_owned())
    }
}

impl From<String> for ChatId {
    /// Numeric strings become [`ChatId::Id`]; anything else is kept verbatim.
    fn from(s: String) -> Self {
        match s.trim().parse::<i64>() {
            Ok(id) => Self::Id(id),
            Err(_) => Self::Username(s),
        }
    }
}

impl FromStr for ChatId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Username(name) => f.write_str(name),
        }
    }
}

/// Settings for a [`TelegramClient`](super::TelegramClient).
#[derive(Clone)]
pub struct ClientConfig {
    /// Bot API host, without a trailing slash.
    pub api_base: String,
    /// Bot authentication token.
    pub token: String,
    /// Destination chat.
    pub chat_id: ChatId,
    /// Connection timeout. `None` keeps the transport default.
    pub connect_timeout: Option<Duration>,
    /// Overall request timeout. `None` keeps the transport default.
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(token: impl Into<String>, chat_id: impl Into<ChatId>) -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_owned(),
            token: token.into(),
            chat_id: chat_id.into(),
            connect_timeout: None,
            timeout: None,
        }
    }

    pub fn endpoints(&self) -> Endpoints {
        Endpoints::new(&self.api_base, &self.token)
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_base", &self.api_base)
            .field("token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .field("connect_timeout", &self.connect_timeout)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// URLs derived from the API base and the bot token.
#[derive(Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// `<base>/bot<token>`
    pub api: String,
    /// Token verification endpoint.
    pub get_me: String,
    /// Message delivery endpoint.
    pub send_message: String,
}

impl Endpoints {
    pub fn new(api_base: &str, token: &str) -> Self {
        let api = format!("{}/bot{}", api_base.trim_end_matches('/'), token);
        Self {
            get_me: format!("{api}/getme"),
            send_message: format!("{api}/sendmessage"),
            api,
        }
    }
}

impl fmt::Debug for Endpoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Endpoints(<contains token>)")
    }
}
