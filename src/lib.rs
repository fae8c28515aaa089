//! Process-infrastructure helpers for long-running network daemons: a logging
//! facade with interchangeable backends (host sink, file, syslog or
//! terminal), and the one-shot startup steps a daemon performs before its
//! main loop (detach, privilege drop, open-file limit), plus fatal-exit and
//! abort-on-OOM allocation helpers.

/// CLI interface.
pub mod cli;

/// Configuration management.
pub mod config;

/// Shared constants.
pub mod constants;

/// Background detach.
pub mod daemon;

/// Error handling.
pub mod error;

/// Logging facade.
pub mod logging;

/// Long-option codes.
pub mod options;

/// Privilege drop and resource limits.
pub mod privilege;

/// Fatal termination.
pub mod process;

/// Syslog connection.
pub mod syslog;

/// String and allocation helpers.
pub mod util;

pub use daemon::{daemonize, try_daemonize};
pub use logging::{LogBackend, LogFacade, LogSettings, Severity};
pub use privilege::{
    NofileLimit, drop_privileges, raise_file_descriptor_limit, try_drop_privileges,
};
pub use process::{OrFatal, fatal, report_os_error};
pub use util::{
    allocate, duplicate_string, int_to_string, is_numeric_string, reallocate, release,
    try_allocate,
};
