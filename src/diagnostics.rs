//! Reporting of delivery failures on stderr.
//!
//! Lines are written with a `telegram_hook: ` prefix. Test builds can divert
//! the lines emitted on the current thread with [`capture`].

use std::fmt;

#[cfg(any(test, feature = "test-util"))]
use std::cell::RefCell;

const PREFIX: &str = "telegram_hook: ";

#[cfg(any(test, feature = "test-util"))]
thread_local! {
    static CAPTURED: RefCell<Option<Vec<String>>> = const { RefCell::new(None) };
}

pub(crate) fn emit(args: fmt::Arguments<'_>) {
    #[cfg(any(test, feature = "test-util"))]
    {
        let diverted = CAPTURED.with(|captured| match captured.borrow_mut().as_mut() {
            Some(lines) => {
                lines.push(format!("{PREFIX}{args}"));
                true
            }
            None => false,
        });
        if diverted {
            return;
        }
    }
    eprintln!("{PREFIX}{args}");
}

/// Run `f`, collecting the diagnostic lines it emits on this thread instead
/// of writing them to stderr.
#[cfg(any(test, feature = "test-util"))]
pub fn capture<R>(f: impl FnOnce() -> R) -> (R, Vec<String>) {
    let previous = CAPTURED.with(|captured| captured.replace(Some(Vec::new())));
    let result = f();
    let lines = CAPTURED
        .with(|captured| captured.replace(previous))
        .unwrap_or_default();
    (result, lines)
}
