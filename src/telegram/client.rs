//! Blocking Bot API client built on a shared `ureq` agent.

use std::fmt;
use std::sync::Arc;

use log::debug;
use ureq::{Agent, AgentBuilder};

use crate::buffer::TextBuffer;
use crate::error::{ApiError, HookError};
use crate::json::encode_compact;
use crate::pool::BufferPool;

use super::api::{ApiRequest, ApiResponse, PARSE_MODE_HTML};
use super::config::{ChatId, ClientConfig, Endpoints};

/// Client bound to one bot token and one destination chat.
///
/// A value of this type only exists once the token has been accepted by the
/// API; [`TelegramClient::connect`] fails otherwise.
pub struct TelegramClient {
    agent: Agent,
    chat_id: ChatId,
    endpoints: Endpoints,
    pub(crate) requests: BufferPool<Vec<u8>>,
}

impl TelegramClient {
    /// Build the client and verify the token with a `getme` call.
    ///
    /// # Errors
    ///
    /// Returns the transport, decode or [`ApiError`] failure of the
    /// verification call. Rejections carry a dump of the decoded response.
    pub fn connect(config: &ClientConfig) -> Result<Self, HookError> {
        let client = Self {
            agent: build_agent(config)?,
            chat_id: config.chat_id.clone(),
            endpoints: config.endpoints(),
            requests: BufferPool::new(),
        };
        client.verify_token()?;
        debug!("telegram_hook: bot token verified for chat {}", client.chat_id);
        Ok(client)
    }

    pub fn chat_id(&self) -> &ChatId {
        &self.chat_id
    }

    fn verify_token(&self) -> Result<(), HookError> {
        let response = decode(self.agent.get(&self.endpoints.get_me).call())?;
        if !response.ok {
            return Err(ApiError::from_response(&response)
                .with_response_dump(&response)
                .into());
        }
        Ok(())
    }

    /// Deliver `text` to the configured chat using the HTML parse mode.
    ///
    /// Failures are reported on stderr before being returned.
    ///
    /// # Errors
    ///
    /// Returns [`HookError::Encode`], [`HookError::Transport`],
    /// [`HookError::Decode`] or [`HookError::Api`].
    pub fn send_message(&self, text: &TextBuffer) -> Result<(), HookError> {
        self.try_send(text).inspect_err(|err| {
            diagnostic!("Encountered error when issuing request to Telegram API, {err}");
        })
    }

    fn try_send(&self, text: &TextBuffer) -> Result<(), HookError> {
        let request = ApiRequest {
            chat_id: &self.chat_id,
            text,
            parse_mode: PARSE_MODE_HTML,
        };

        let mut body = self.requests.acquire();
        encode_compact(&mut *body, &request).map_err(HookError::Encode)?;

        let response = decode(
            self.agent
                .post(&self.endpoints.send_message)
                .set("Content-Type", "application/json")
                .send_bytes(&body),
        )?;
        if !response.ok {
            return Err(ApiError::from_response(&response).into());
        }
        Ok(())
    }
}

fn build_agent(config: &ClientConfig) -> Result<Agent, HookError> {
    let connector = native_tls::TlsConnector::new()?;
    let mut builder = AgentBuilder::new().tls_connector(Arc::new(connector));
    if let Some(timeout) = config.connect_timeout {
        builder = builder.timeout_connect(timeout);
    }
    if let Some(timeout) = config.timeout {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build())
}

/// Decode the response envelope, including bodies of non-2xx responses.
fn decode(result: Result<ureq::Response, ureq::Error>) -> Result<ApiResponse, HookError> {
    let response = match result {
        Ok(response) => response,
        Err(ureq::Error::Status(_, response)) => response,
        Err(ureq::Error::Transport(transport)) => return Err(transport.into()),
    };
    serde_json::from_reader(response.into_reader()).map_err(HookError::Decode)
}

impl fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramClient")
            .field("chat_id", &self.chat_id)
            .field("requests", &self.requests)
            .finish_non_exhaustive()
    }
}
