//! Forwarding of process panics to a [`Hook`].

use std::panic::{self, PanicHookInfo};
use std::thread;

use crate::hook::Hook;
use crate::level::HookLevel;
use crate::log_record::LogEntry;

/// Register a panic hook that fires a `PANIC` entry, then chains to the
/// previously installed panic hook.
///
/// Nothing is fired when `hook` does not declare [`HookLevel::Panic`].
pub fn install_panic_hook<H: Hook + 'static>(hook: H) {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        if hook.levels().contains(&HookLevel::Panic) {
            let _ = hook.fire(&panic_entry(info));
        }
        previous(info);
    }));
}

/// Build the entry describing a panic.
pub fn panic_entry(info: &PanicHookInfo<'_>) -> LogEntry {
    let mut entry = LogEntry::new(HookLevel::Panic, panic_message(info));
    if let Some(location) = info.location() {
        entry = entry.with_field(
            "location",
            format!("{}:{}", location.file(), location.line()),
        );
    }
    if let Some(name) = thread::current().name() {
        entry = entry.with_field("thread", name);
    }
    entry
}

fn panic_message(info: &PanicHookInfo<'_>) -> String {
    let payload = info.payload();
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Box<dyn Any>".to_owned()
    }
}
