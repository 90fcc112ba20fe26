//! Client tests against the loopback mock API.

use rstest::{fixture, rstest};
use serde_json::json;

use crate::buffer::TextBuffer;
use crate::error::HookError;
use crate::test_utils::{MockResponse, MockTelegramApi, closed_port_url};

use super::{ChatId, ClientConfig, TelegramClient};

#[fixture]
fn api() -> MockTelegramApi {
    MockTelegramApi::start()
}

fn config_for(base_url: String, token: &str, chat_id: impl Into<ChatId>) -> ClientConfig {
    ClientConfig {
        api_base: base_url,
        ..ClientConfig::new(token, chat_id)
    }
}

fn text(s: &str) -> TextBuffer {
    let mut buffer = TextBuffer::new();
    buffer.push_str(s);
    buffer
}

#[rstest]
fn connect_verifies_token_with_getme(api: MockTelegramApi) {
    let config = config_for(api.base_url(), MockTelegramApi::VALID_TOKEN, 42_i64);
    TelegramClient::connect(&config).expect("valid token");

    let requests = api.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "GET");
    assert_eq!(
        requests[0].path,
        format!("/bot{}/getme", MockTelegramApi::VALID_TOKEN)
    );
}

#[rstest]
fn connect_rejects_invalid_token_with_dump(api: MockTelegramApi) {
    let config = config_for(api.base_url(), "bogus", 42_i64);
    let err = TelegramClient::connect(&config).expect_err("invalid token");

    let HookError::Api(api_err) = &err else {
        panic!("expected API error, got {err:?}");
    };
    assert_eq!(api_err.code, Some(401));
    assert_eq!(api_err.description.as_deref(), Some("Unauthorized"));
    let expected = concat!(
        "Received error response from Telegram API (error code 401): Unauthorized\n",
        "{\n\t\"ok\": false,\n\t\"error_code\": 401,\n\t\"description\": \"Unauthorized\"\n}",
    );
    assert_eq!(err.to_string(), expected);
}

#[test]
fn connect_propagates_transport_errors() {
    let config = config_for(closed_port_url(), MockTelegramApi::VALID_TOKEN, 1_i64);
    let err = TelegramClient::connect(&config).expect_err("nothing listening");
    assert!(matches!(err, HookError::Transport(_)), "got {err:?}");
}

#[test]
fn connect_propagates_decode_errors() {
    let api = MockTelegramApi::with_responder(|_| MockResponse::raw(200, "<html>not json</html>"));
    let config = config_for(api.base_url(), MockTelegramApi::VALID_TOKEN, 1_i64);
    let err = TelegramClient::connect(&config).expect_err("malformed body");
    assert!(matches!(err, HookError::Decode(_)), "got {err:?}");
}

#[test]
fn missing_ok_flag_counts_as_failure() {
    let api = MockTelegramApi::with_responder(|_| MockResponse::raw(200, "{}"));
    let config = config_for(api.base_url(), MockTelegramApi::VALID_TOKEN, 1_i64);
    let err = TelegramClient::connect(&config).expect_err("ok missing");
    assert_eq!(
        err.to_string(),
        "Received error response from Telegram API\n{\n\t\"ok\": false\n}"
    );
}

#[test]
fn null_ok_flag_is_an_api_error() {
    let api = MockTelegramApi::with_responder(|_| {
        MockResponse::raw(200, r#"{"ok":null,"description":"gone"}"#)
    });
    let config = config_for(api.base_url(), MockTelegramApi::VALID_TOKEN, 1_i64);
    let err = TelegramClient::connect(&config).expect_err("ok is null");
    let HookError::Api(api_err) = &err else {
        panic!("expected API error, got {err:?}");
    };
    assert_eq!(api_err.description.as_deref(), Some("gone"));
}

#[rstest]
fn send_posts_json_envelope(api: MockTelegramApi) {
    let config = config_for(api.base_url(), MockTelegramApi::VALID_TOKEN, -1001_i64);
    let client = TelegramClient::connect(&config).expect("connect");

    client
        .send_message(&text("<b>ERROR</b>@app - hi"))
        .expect("send succeeds");

    let sent = api.sent_messages();
    assert_eq!(sent.len(), 1);
    let request = &sent[0];
    assert_eq!(request.method, "POST");
    assert_eq!(request.header("content-type"), Some("application/json"));
    assert_eq!(
        request.body,
        "{\"chat_id\":-1001,\"text\":\"\\u003cb\\u003eERROR\\u003c/b\\u003e@app - hi\",\"parse_mode\":\"HTML\"}\n"
    );
    assert_eq!(
        request.json(),
        json!({"chat_id": -1001, "text": "<b>ERROR</b>@app - hi", "parse_mode": "HTML"})
    );
}

#[rstest]
fn send_accepts_channel_usernames(api: MockTelegramApi) {
    let config = config_for(api.base_url(), MockTelegramApi::VALID_TOKEN, "@alerts");
    let client = TelegramClient::connect(&config).expect("connect");
    client.send_message(&text("hello")).expect("send");
    assert_eq!(api.sent_messages()[0].json()["chat_id"], "@alerts");
}

#[rstest]
fn send_reports_api_errors_without_dump(api: MockTelegramApi) {
    let config = config_for(api.base_url(), MockTelegramApi::VALID_TOKEN, "");
    let client = TelegramClient::connect(&config).expect("token is valid");

    let err = client.send_message(&text("lost")).expect_err("chat not found");

    assert_eq!(
        err.to_string(),
        "Received error response from Telegram API (error code 400): Bad Request: chat not found"
    );
}

#[test]
fn send_propagates_decode_errors() {
    let api = MockTelegramApi::with_responder(|req| {
        if req.path.ends_with("/getme") {
            MockResponse::ok(json!({"id": 1}))
        } else {
            MockResponse::raw(502, "Bad Gateway")
        }
    });
    let config = config_for(api.base_url(), MockTelegramApi::VALID_TOKEN, 1_i64);
    let client = TelegramClient::connect(&config).expect("connect");

    let err = client.send_message(&text("x")).expect_err("bad gateway");
    assert!(matches!(err, HookError::Decode(_)), "got {err:?}");
}

#[test]
fn send_does_not_retry() {
    let api = MockTelegramApi::with_responder(|req| {
        if req.path.ends_with("/getme") {
            MockResponse::ok(json!({"id": 1}))
        } else {
            MockResponse::error(429, "Too Many Requests: retry after 5")
        }
    });
    let config = config_for(api.base_url(), MockTelegramApi::VALID_TOKEN, 1_i64);
    let client = TelegramClient::connect(&config).expect("connect");

    assert!(client.send_message(&text("x")).is_err());
    assert_eq!(api.sent_messages().len(), 1);
}

#[rstest]
fn request_buffers_are_reused(api: MockTelegramApi) {
    let config = config_for(api.base_url(), MockTelegramApi::VALID_TOKEN, 1_i64);
    let client = TelegramClient::connect(&config).expect("connect");

    for i in 0..3 {
        client
            .send_message(&text(&format!("message {i}")))
            .expect("send");
    }

    assert_eq!(client.requests.idle(), 1);
    let texts: Vec<_> = api
        .sent_messages()
        .iter()
        .filter_map(|req| req.text())
        .collect();
    assert_eq!(texts, ["message 0", "message 1", "message 2"]);
}
