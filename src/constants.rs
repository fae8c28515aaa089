//! Constants shared by the logging facade and the process helpers.
//!
//! This module centralizes the fixed strings and sizes used throughout the
//! crate so the formatting contract lives in one place.

// ============================================================================
// Log Formatting
// ============================================================================

/// `strftime` pattern applied to every timestamp written by the File and
/// terminal backends.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Label written after the timestamp for info records.
pub const INFO_LABEL: &str = "INFO:";

/// Label written after the timestamp for error records.
pub const ERROR_LABEL: &str = "ERROR:";

/// Bold green, opens the prefix of info records on an interactive terminal.
pub const INFO_COLOR: &str = "\x1b[01;32m";

/// Bold magenta, opens the prefix of error records on an interactive terminal.
pub const ERROR_COLOR: &str = "\x1b[01;35m";

/// Resets terminal attributes after a coloured prefix.
pub const COLOR_RESET: &str = "\x1b[0m";

/// Syslog tag used when no identity is configured.
pub const DEFAULT_IDENTITY: &str = "dutil";

// ============================================================================
// Process Control
// ============================================================================

/// Exit status used by `fatal` (the historical `exit(-1)`).
pub const FATAL_EXIT_CODE: i32 = 255;

/// Device used to replace the standard streams of a daemonized process.
pub const DEV_NULL: &str = "/dev/null";

// ============================================================================
// Address Buffers
// ============================================================================

/// Room for a decimal port number and its terminator.
pub const PORT_STR_LEN: usize = 16;

/// Length of the longest textual IPv6 address, including the terminator.
pub const INET6_ADDR_STR_LEN: usize = 46;

/// Room for `address:port` text of either address family.
pub const ADDR_STR_LEN: usize = INET6_ADDR_STR_LEN + PORT_STR_LEN + 1;
