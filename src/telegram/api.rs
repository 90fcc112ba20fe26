//! Request and response envelopes exchanged with the Bot API.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::buffer::TextBuffer;

use super::config::ChatId;

/// `parse_mode` value asking Telegram to render the text as HTML.
pub const PARSE_MODE_HTML: &str = "HTML";

/// Body of a `sendmessage` call.
///
/// `text` borrows the formatted [`TextBuffer`] and is escaped once while the
/// envelope is encoded.
#[derive(Debug, Serialize)]
pub struct ApiRequest<'a> {
    pub chat_id: &'a ChatId,
    pub text: &'a TextBuffer,
    #[serde(skip_serializing_if = "str::is_empty")]
    pub parse_mode: &'a str,
}

/// Envelope returned by every Bot API method.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    #[serde(default, deserialize_with = "null_as_false")]
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
}

/// `null` leaves the flag unset, like an absent field.
fn null_as_false<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or_default())
}
