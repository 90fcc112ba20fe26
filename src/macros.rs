//! Internal macros.

/// Report a failure on stderr.
///
/// Hook failures cannot go through the `log` facade: the hook may itself be
/// the installed logger, and reporting there would feed the failure back into
/// the hook.
macro_rules! diagnostic {
    ($($arg:tt)*) => {
        $crate::diagnostics::emit(format_args!($($arg)*))
    };
}
