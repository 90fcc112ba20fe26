//! Blocking client for the Telegram Bot API.
//!
//! [`TelegramClient`] verifies its bot token with a `getme` call when it is
//! created and afterwards posts one `sendmessage` request per message. Both
//! calls block the calling thread until the API answers or the transport
//! fails.
//!
//! # Error semantics
//!
//! - **Transport errors** (DNS, connect, TLS, timeouts) are returned as
//!   [`HookError::Transport`](crate::HookError::Transport).
//! - **Decode errors** (body is not a response envelope) are returned as
//!   [`HookError::Decode`](crate::HookError::Decode). Non-2xx HTTP statuses
//!   are not errors by themselves: the API still answers with an envelope.
//! - **API errors** (`ok: false`) become [`ApiError`](crate::ApiError).
//!
//! Nothing is retried.

mod api;
mod client;
mod config;

#[cfg(test)]
mod tests;

pub use api::{ApiRequest, ApiResponse, PARSE_MODE_HTML};
pub use client::TelegramClient;
pub use config::{ChatId, ClientConfig, DEFAULT_API_BASE, Endpoints};
