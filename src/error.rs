//! Error handling for daemon-utils.
use std::path::PathBuf;

use nix::errno::Errno;
use thiserror::Error;

/// Errors raised while configuring the logging facade.
#[derive(Debug, Error)]
pub enum LogError {
    /// `configure` was called on a facade that already has a backend.
    #[error("Logging facade is already configured")]
    AlreadyConfigured,

    /// The log file could not be created.
    #[error("Failed to open log file {path:?}: {source}")]
    Open {
        /// Path that was requested.
        path: PathBuf,
        /// The underlying error that occurred.
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while detaching the process into the background.
#[derive(Debug, Error)]
pub enum DaemonizeError {
    /// `fork(2)` failed.
    #[error("fork failed: {0}")]
    Fork(#[source] Errno),

    /// `setsid(2)` failed.
    #[error("setsid failed: {0}")]
    Setsid(#[source] Errno),

    /// Changing into the root directory failed.
    #[error("chdir to / failed: {0}")]
    Chdir(#[source] Errno),

    /// Redirecting standard streams to `/dev/null` failed.
    #[error("Failed to redirect standard streams: {0}")]
    Redirect(#[source] std::io::Error),

    /// The pid file could not be written.
    #[error("Failed to write pid file {path:?}: {source}")]
    PidFile {
        /// Path of the pid file.
        path: PathBuf,
        /// The underlying error that occurred.
        #[source]
        source: std::io::Error,
    },

    /// Another process holds the pid file lock.
    #[error("Pid file {0:?} is locked by another process")]
    PidFileLocked(PathBuf),
}

/// Errors raised while switching to a less privileged user.
#[derive(Debug, Error)]
pub enum PrivilegeError {
    /// No account matches the requested name or uid.
    #[error("User '{0}' not found")]
    UnknownUser(String),

    /// The account database lookup itself failed.
    #[error("Failed to look up user '{user}': {source}")]
    Lookup {
        /// Requested user.
        user: String,
        /// The underlying error that occurred.
        #[source]
        source: Errno,
    },

    /// Supplementary groups could not be initialised.
    #[error("Failed to set supplementary groups: {0}")]
    SetGroups(#[source] Errno),

    /// Group id could not be changed.
    #[error("Failed to set group id: {0}")]
    SetGid(#[source] Errno),

    /// User id could not be changed.
    #[error("Failed to set user id: {0}")]
    SetUid(#[source] Errno),

    /// Root privileges were still obtainable after the switch.
    #[error("Root privileges could be regained after switching to uid {0}")]
    RegainedRoot(u32),
}

/// Errors raised while loading a runtime configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Error reading or accessing a configuration file.
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    /// Error parsing YAML configuration.
    #[error("Invalid YAML format: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Errors from the fallible allocation helpers.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AllocError {
    /// The requested size does not fit in the address space.
    #[error("Requested allocation of {0} bytes overflows capacity")]
    CapacityOverflow(usize),

    /// The allocator could not satisfy the request.
    #[error("Out of memory allocating {0} bytes")]
    OutOfMemory(usize),
}
