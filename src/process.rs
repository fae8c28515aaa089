//! Termination helpers for unrecoverable conditions.
use std::{fmt, io, process};

use crate::constants::FATAL_EXIT_CODE;
use crate::log_error;
use crate::logging::LogFacade;

/// Logs `message` at error severity, closes the facade and exits with
/// status 255. Never returns to the caller.
pub fn fatal(log: &LogFacade, message: impl fmt::Display) -> ! {
    log_error!(log, "{message}");
    log.shutdown();
    process::exit(FATAL_EXIT_CODE)
}

/// Logs `"<context>: <last OS error>"` at error severity.
pub fn report_os_error(log: &LogFacade, context: &str) {
    let err = io::Error::last_os_error();
    log_error!(log, "{context}: {err}");
}

/// Turns a startup `Result` into its value or a call to [`fatal`].
pub trait OrFatal<T> {
    /// Returns the success value, or logs the error and exits.
    fn or_fatal(self, log: &LogFacade) -> T;
}

impl<T, E: fmt::Display> OrFatal<T> for Result<T, E> {
    fn or_fatal(self, log: &LogFacade) -> T {
        match self {
            Ok(value) => value,
            Err(err) => fatal(log, err),
        }
    }
}
