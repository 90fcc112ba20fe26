//! Reusable byte buffer that serializes as a JSON string.
//!
//! The formatter writes the outgoing message into a [`TextBuffer`]; the
//! request envelope then embeds the buffer directly through its
//! [`Serialize`] impl, so the message bytes are escaped exactly once by the
//! JSON encoder instead of being copied into an intermediate `String`.

use std::fmt;
use std::io;

use serde::{Serialize, Serializer};

use crate::pool::Reusable;

#[derive(Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    bytes: Vec<u8>,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_str(&mut self, s: &str) {
        self.bytes.extend_from_slice(s.as_bytes());
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// View the contents as text, replacing invalid UTF-8 sequences.
    pub fn to_text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn clear(&mut self) {
        self.bytes.clear();
    }
}

impl Reusable for TextBuffer {
    fn reset(&mut self) {
        self.clear();
    }
}

impl io::Write for TextBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl fmt::Write for TextBuffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.push_str(s);
        Ok(())
    }
}

impl Serialize for TextBuffer {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_text())
    }
}

impl fmt::Debug for TextBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TextBuffer").field(&self.to_text()).finish()
    }
}
