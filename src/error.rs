//! Error types returned by the hook and the Telegram client.

use std::fmt;

use thiserror::Error;

use crate::json::to_string_indented;
use crate::telegram::ApiResponse;

/// Errors surfaced while building a hook or delivering a message.
#[derive(Debug, Error)]
pub enum HookError {
    /// Invalid user supplied configuration.
    #[error("invalid hook configuration: {0}")]
    InvalidConfig(String),
    /// The TLS backend could not be initialised.
    #[error(transparent)]
    Tls(#[from] native_tls::Error),
    /// DNS, connect, TLS handshake or I/O failure talking to the API.
    #[error(transparent)]
    Transport(Box<ureq::Transport>),
    /// The response body was not a valid response envelope.
    #[error(transparent)]
    Decode(serde_json::Error),
    /// The request or message could not be encoded.
    #[error(transparent)]
    Encode(serde_json::Error),
    /// The API answered with `ok: false`.
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl From<ureq::Transport> for HookError {
    fn from(err: ureq::Transport) -> Self {
        Self::Transport(Box::new(err))
    }
}

/// Error reported by the Telegram API in a response envelope.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiError {
    /// Numeric `error_code`, when the API supplied one.
    pub code: Option<i64>,
    /// Human readable `description`, when the API supplied one.
    pub description: Option<String>,
    /// Tab-indented dump of the decoded envelope.
    ///
    /// Only token verification attaches it; message delivery failures do not.
    pub response: Option<String>,
}

impl ApiError {
    pub(crate) fn from_response(response: &ApiResponse) -> Self {
        Self {
            code: response.error_code,
            description: response.description.clone(),
            response: None,
        }
    }

    pub(crate) fn with_response_dump(mut self, response: &ApiResponse) -> Self {
        self.response = to_string_indented(response).ok();
        self
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Received error response from Telegram API")?;
        if let Some(code) = self.code {
            write!(f, " (error code {code})")?;
        }
        if let Some(description) = &self.description {
            write!(f, ": {description}")?;
        }
        if let Some(dump) = &self.response {
            write!(f, "\n{dump}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}
