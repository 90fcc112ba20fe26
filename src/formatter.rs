//! Formatting of log entries into Telegram messages.
//!
//! [`HtmlMessageFormatter`] renders an entry as:
//!
//! ```text
//! <b>ERROR</b>@app - message: error text
//! <pre>
//! { ...fields as tab-indented JSON... }
//!
//! </pre>
//! ```
//!
//! The bold prefix is present only for error and above. Field values go
//! through HTML-safe JSON escaping; the message itself is written verbatim, so
//! callers must not put untrusted markup in messages.

use std::fmt::{self, Write as _};
use std::sync::Arc;

use crate::buffer::TextBuffer;
use crate::json::encode_indented;
use crate::log_record::LogEntry;

/// Trait for rendering log entries into outgoing message text.
///
/// Implementors must be thread-safe so one formatter can serve concurrent
/// `fire` calls.
pub trait MessageFormatter: Send + Sync {
    /// Append the rendering of `entry` to `out`.
    fn format(&self, entry: &LogEntry, out: &mut TextBuffer) -> serde_json::Result<()>;
}

/// Shared formatter trait object used by hooks.
#[derive(Clone)]
pub struct SharedFormatter {
    inner: Arc<dyn MessageFormatter>,
}

impl SharedFormatter {
    pub fn new<F>(formatter: F) -> Self
    where
        F: MessageFormatter + 'static,
    {
        Self {
            inner: Arc::new(formatter),
        }
    }

    pub fn format(&self, entry: &LogEntry, out: &mut TextBuffer) -> serde_json::Result<()> {
        self.inner.format(entry, out)
    }
}

impl fmt::Debug for SharedFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedFormatter(<dyn MessageFormatter>)")
    }
}

/// Default formatter producing HTML for Telegram's `HTML` parse mode.
#[derive(Clone, Debug)]
pub struct HtmlMessageFormatter {
    app_name: String,
}

impl HtmlMessageFormatter {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
        }
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }
}

impl MessageFormatter for HtmlMessageFormatter {
    fn format(&self, entry: &LogEntry, out: &mut TextBuffer) -> serde_json::Result<()> {
        if let Some(label) = entry.level().alert_label() {
            out.push_str("<b>");
            out.push_str(label);
            out.push_str("</b>");
        }

        out.push_str("@");
        out.push_str(&self.app_name);
        out.push_str(" - ");
        out.push_str(entry.message());

        if let Some(err) = entry.error() {
            // TextBuffer's fmt::Write impl never fails.
            let _ = write!(out, ": {err}");
        }

        out.push_str("\n<pre>\n");
        encode_indented(&mut *out, entry.fields())?;
        out.push_str("\n</pre>");
        Ok(())
    }
}

/// Render `entry` with [`HtmlMessageFormatter`] into a new string.
pub fn format_message(app_name: &str, entry: &LogEntry) -> serde_json::Result<String> {
    let mut out = TextBuffer::new();
    HtmlMessageFormatter::new(app_name).format(entry, &mut out)?;
    Ok(out.to_text().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::HookLevel;
    use static_assertions::assert_impl_all;
    use std::io;

    #[test]
    fn shared_formatter_is_send_sync() {
        assert_impl_all!(SharedFormatter: Send, Sync);
        assert_impl_all!(HtmlMessageFormatter: Send, Sync);
    }

    #[test]
    fn formats_error_entry_without_fields() {
        let entry = LogEntry::new(HookLevel::Error, "A walrus appears");
        let out = format_message("testing", &entry).expect("format");
        assert_eq!(out, "<b>ERROR</b>@testing - A walrus appears\n<pre>\n{}\n\n</pre>");
    }

    #[test]
    fn appends_error_text_and_keeps_error_field() {
        let entry = LogEntry::new(HookLevel::Fatal, "write failed")
            .with_error(io::Error::other("disk full"))
            .with_field("path", "/var/log");
        let out = format_message("svc", &entry).expect("format");
        let expected = concat!(
            "<b>FATAL</b>@svc - write failed: disk full\n",
            "<pre>\n",
            "{\n\t\"error\": \"disk full\",\n\t\"path\": \"/var/log\"\n}\n",
            "\n</pre>",
        );
        assert_eq!(out, expected);
    }

    #[test]
    fn lower_levels_have_no_prefix() {
        let entry = LogEntry::new(HookLevel::Info, "just saying");
        let out = format_message("app", &entry).expect("format");
        assert!(out.starts_with("@app - just saying\n<pre>\n"));
    }

    #[test]
    fn plain_error_field_is_not_treated_as_error() {
        let entry = LogEntry::new(HookLevel::Error, "msg").with_field("error", "text only");
        let out = format_message("app", &entry).expect("format");
        assert!(out.starts_with("<b>ERROR</b>@app - msg\n"));
        assert!(out.contains("\"error\": \"text only\""));
    }

    #[test]
    fn field_markup_is_escaped_but_message_is_not() {
        let entry = LogEntry::new(HookLevel::Panic, "<i>raw</i>").with_field("html", "<b>");
        let out = format_message("app", &entry).expect("format");
        assert!(out.starts_with("<b>PANIC</b>@app - <i>raw</i>"));
        assert!(out.contains("\"html\": \"\\u003cb\\u003e\""));
    }

    #[test]
    fn appends_to_existing_buffer_contents() {
        let mut out = TextBuffer::new();
        out.push_str(">>");
        HtmlMessageFormatter::new("app")
            .format(&LogEntry::new(HookLevel::Error, "x"), &mut out)
            .expect("format");
        assert!(out.to_text().starts_with(">><b>ERROR</b>@app - x"));
    }
}
