//! Loopback stand-in for the Telegram Bot API.
//!
//! [`MockTelegramApi`] accepts plain HTTP connections on an ephemeral port,
//! records every request and answers through a responder closure. The
//! default responder mimics the real API: it accepts one bot token, rejects
//! other tokens with `401 Unauthorized`, and rejects messages addressed to an
//! empty chat with `400 Bad Request: chat not found`.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::{Value, json};

#[derive(Clone, Debug)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl CapturedRequest {
    /// Header value by lower-case name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Body parsed as JSON, or `Value::Null` when it is not JSON.
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or(Value::Null)
    }

    /// The `text` field of a `sendmessage` body.
    pub fn text(&self) -> Option<String> {
        self.json()["text"].as_str().map(str::to_owned)
    }
}

#[derive(Clone, Debug)]
pub struct MockResponse {
    pub status: u16,
    pub body: String,
}

impl MockResponse {
    /// `200 OK` with `{"ok":true,"result":...}`.
    pub fn ok(result: Value) -> Self {
        Self {
            status: 200,
            body: json!({"ok": true, "result": result}).to_string(),
        }
    }

    /// Error envelope with the given HTTP status, code and description.
    pub fn error(status: u16, description: &str) -> Self {
        Self {
            status,
            body: json!({"ok": false, "error_code": status, "description": description})
                .to_string(),
        }
    }

    /// Arbitrary body, e.g. to exercise decode failures.
    pub fn raw(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

type Responder = dyn Fn(&CapturedRequest) -> MockResponse + Send + Sync;

pub struct MockTelegramApi {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
    shutdown: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl MockTelegramApi {
    /// Token accepted by the default responder.
    pub const VALID_TOKEN: &'static str = "123456:TEST-TOKEN";

    /// Start a server using the Telegram-like default responder.
    pub fn start() -> Self {
        Self::with_responder(telegram_responder(Self::VALID_TOKEN))
    }

    pub fn with_responder<F>(responder: F) -> Self
    where
        F: Fn(&CapturedRequest) -> MockResponse + Send + Sync + 'static,
    {
        let listener = TcpListener::bind(("127.0.0.1", 0)).expect("bind ephemeral listener");
        let addr = listener.local_addr().expect("listener has address");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let shutdown = Arc::new(AtomicBool::new(false));
        let responder: Arc<Responder> = Arc::new(responder);

        let handle = {
            let requests = Arc::clone(&requests);
            let shutdown = Arc::clone(&shutdown);
            thread::spawn(move || accept_loop(listener, responder, requests, shutdown))
        };

        Self {
            addr,
            requests,
            shutdown,
            handle: Some(handle),
        }
    }

    /// Base URL to pass as the API host.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Snapshot of every request received so far.
    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.requests.lock().clone()
    }

    /// Requests made to the `sendmessage` endpoint.
    pub fn sent_messages(&self) -> Vec<CapturedRequest> {
        self.requests()
            .into_iter()
            .filter(|req| req.path.ends_with("/sendmessage"))
            .collect()
    }
}

impl Drop for MockTelegramApi {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
        // Wake the blocking accept so the loop observes the flag.
        let _ = TcpStream::connect(self.addr);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// URL of a loopback port with nothing listening on it.
pub fn closed_port_url() -> String {
    let listener = TcpListener::bind(("127.0.0.1", 0)).expect("bind ephemeral listener");
    let addr = listener.local_addr().expect("listener has address");
    drop(listener);
    format!("http://{addr}")
}

/// Responder behaving like the Bot API for a single valid `token`.
pub fn telegram_responder(token: &str) -> impl Fn(&CapturedRequest) -> MockResponse + use<> {
    let prefix = format!("/bot{token}/");
    move |req: &CapturedRequest| {
        let Some(method) = req.path.strip_prefix(&prefix) else {
            return MockResponse::error(401, "Unauthorized");
        };
        match (req.method.as_str(), method) {
            ("GET", "getme") => MockResponse::ok(json!({
                "id": 123456,
                "is_bot": true,
                "first_name": "Test",
                "username": "test_bot",
            })),
            ("POST", "sendmessage") => {
                let body = req.json();
                match &body["chat_id"] {
                    Value::Null => MockResponse::error(400, "Bad Request: chat_id is empty"),
                    Value::String(s) if s.is_empty() => {
                        MockResponse::error(400, "Bad Request: chat not found")
                    }
                    chat => MockResponse::ok(json!({
                        "message_id": 1,
                        "chat": {"id": chat},
                        "text": body["text"],
                    })),
                }
            }
            _ => MockResponse::error(404, "Not Found"),
        }
    }
}

fn accept_loop(
    listener: TcpListener,
    responder: Arc<Responder>,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
    shutdown: Arc<AtomicBool>,
) {
    for stream in listener.incoming() {
        if shutdown.load(Ordering::SeqCst) {
            break;
        }
        let Ok(stream) = stream else {
            continue;
        };
        let responder = Arc::clone(&responder);
        let requests = Arc::clone(&requests);
        thread::spawn(move || serve_connection(stream, responder.as_ref(), &requests));
    }
}

fn serve_connection(
    mut stream: TcpStream,
    responder: &Responder,
    requests: &Mutex<Vec<CapturedRequest>>,
) {
    let Some(captured) = read_http_request(&mut stream) else {
        return;
    };
    let response = responder(&captured);
    // Record before replying so callers observe the request once they have
    // their response.
    requests.lock().push(captured);
    let reply = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        response.status,
        status_text(response.status),
        response.body.len(),
        response.body
    );
    let _ = stream.write_all(reply.as_bytes());
    let _ = stream.flush();
}

fn status_text(code: u16) -> &'static str {
    match code {
        200 => "OK",
        400 => "Bad Request",
        401 => "Unauthorized",
        404 => "Not Found",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        _ => "Unknown",
    }
}

/// Parses a single header line into a key-value pair.
fn parse_header_line(line: &str) -> Option<(String, String)> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    line.split_once(':')
        .map(|(key, value)| (key.trim().to_lowercase(), value.trim().to_string()))
}

fn read_http_request(stream: &mut TcpStream) -> Option<CapturedRequest> {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
    let mut reader = BufReader::new(stream.try_clone().ok()?);

    let mut request_line = String::new();
    if reader.read_line(&mut request_line).ok()? == 0 {
        return None;
    }
    let mut parts = request_line.split_whitespace();
    let method = parts.next()?.to_string();
    let path = parts.next()?.to_string();

    let mut headers = Vec::new();
    let mut content_length = 0usize;
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).ok()? == 0 || line.trim().is_empty() {
            break;
        }
        let Some((key, value)) = parse_header_line(&line) else {
            continue;
        };
        if key == "content-length" {
            content_length = value.parse().unwrap_or(0);
        }
        headers.push((key, value));
    }

    let mut body = vec![0u8; content_length];
    reader.read_exact(&mut body).ok()?;

    Some(CapturedRequest {
        method,
        path,
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}
