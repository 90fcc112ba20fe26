//! Helpers shared by unit and integration tests.
//!
//! Compiled for the crate's own tests and, through the `test-util` feature,
//! for the integration tests under `tests/`.

pub mod mock_api;
pub mod recording_hook;

pub use mock_api::{
    CapturedRequest, MockResponse, MockTelegramApi, closed_port_url, telegram_responder,
};
pub use recording_hook::RecordingHook;

pub use crate::diagnostics::capture as capture_diagnostics;
