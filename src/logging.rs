//! Logging facade that routes every record to exactly one backend.
//!
//! The backend is picked once by [`LogFacade::configure`] and never changes
//! afterwards. Callers only see [`LogFacade::info`] and [`LogFacade::error`]
//! (or the [`log_info!`](crate::log_info) / [`log_error!`](crate::log_error)
//! macros) and never learn which sink is active.
//!
//! Emission never fails from the caller's point of view: an unconfigured
//! facade, a closed facade, or a failed write all turn into silent no-ops.
use std::{
    fmt,
    fs::{File, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard, PoisonError},
};

use chrono::Local;
use crossterm::tty::IsTty;
use serde::Deserialize;
use strum_macros::{AsRefStr, Display};
use tracing::debug;

use crate::constants::{
    COLOR_RESET, DEFAULT_IDENTITY, ERROR_COLOR, ERROR_LABEL, INFO_COLOR, INFO_LABEL,
    TIME_FORMAT,
};
use crate::error::LogError;
use crate::syslog::Syslog;

/// Severity of a log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Informational message.
    Info,
    /// Error message.
    Error,
}

impl Severity {
    fn label(self) -> &'static str {
        match self {
            Severity::Info => INFO_LABEL,
            Severity::Error => ERROR_LABEL,
        }
    }

    fn color(self) -> &'static str {
        match self {
            Severity::Info => INFO_COLOR,
            Severity::Error => ERROR_COLOR,
        }
    }
}

/// The backend strategy a facade was configured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, Display)]
#[strum(serialize_all = "snake_case")]
pub enum LogBackend {
    /// Host structured log sink (the process's `tracing` subscriber).
    Platform,
    /// Timestamped lines appended to a process-owned file.
    File,
    /// Syslog when enabled, otherwise standard error.
    ConsoleSyslog,
}

/// Inputs that decide which backend a facade uses.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Colour terminal output when standard error is a tty.
    pub color: bool,
    /// Route console-mode records to syslog instead of standard error.
    pub syslog: bool,
    /// Write records to this file (truncated on configure).
    pub file: Option<PathBuf>,
    /// Process identity used as the syslog tag.
    pub identity: String,
    /// Running on a constrained platform with its own log sink.
    pub platform: bool,
    /// Library-only build: only the File backend is available.
    pub library_only: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            color: true,
            syslog: false,
            file: None,
            identity: DEFAULT_IDENTITY.to_string(),
            platform: false,
            library_only: false,
        }
    }
}

enum Backend {
    Platform { identity: String },
    // `None` when the library-only build was configured without a path.
    File(Option<File>),
    Syslog(Syslog),
    Console {
        sink: Box<dyn Write + Send>,
        color: bool,
    },
}

impl Backend {
    fn select(settings: &LogSettings) -> Result<Self, LogError> {
        if settings.platform {
            return Ok(Backend::Platform {
                identity: settings.identity.clone(),
            });
        }

        if settings.library_only || settings.file.is_some() {
            let file = settings.file.as_deref().map(open_log_file).transpose()?;
            return Ok(Backend::File(file));
        }

        if settings.syslog {
            return Ok(Backend::Syslog(Syslog::open(&settings.identity)));
        }

        let stderr = io::stderr();
        let color = settings.color && stderr.is_tty();
        Ok(Backend::Console {
            sink: Box::new(stderr),
            color,
        })
    }

    fn kind(&self) -> LogBackend {
        match self {
            Backend::Platform { .. } => LogBackend::Platform,
            Backend::File(_) => LogBackend::File,
            Backend::Syslog(_) | Backend::Console { .. } => LogBackend::ConsoleSyslog,
        }
    }

    fn emit(&mut self, severity: Severity, args: fmt::Arguments<'_>) -> io::Result<()> {
        match self {
            Backend::Platform { identity } => {
                match severity {
                    Severity::Info => debug!(ident = %identity, "{args}"),
                    Severity::Error => tracing::error!(ident = %identity, "{args}"),
                }
                Ok(())
            }
            Backend::File(Some(file)) => {
                let line = format_line(severity, &timestamp(), args, false);
                file.write_all(line.as_bytes())?;
                file.flush()?;
                file.sync_data()
            }
            Backend::File(None) => Ok(()),
            Backend::Syslog(syslog) => {
                syslog.send(severity, &args.to_string());
                Ok(())
            }
            Backend::Console { sink, color } => {
                let line = format_line(severity, &timestamp(), args, *color);
                sink.write_all(line.as_bytes())?;
                sink.flush()
            }
        }
    }

    fn close(self) {
        match self {
            Backend::File(Some(mut file)) => {
                let _ = file.flush();
                let _ = file.sync_all();
            }
            Backend::Console { mut sink, .. } => {
                let _ = sink.flush();
            }
            // Dropping the connection calls `closelog`.
            Backend::Syslog(_) | Backend::File(None) | Backend::Platform { .. } => {}
        }
    }
}

enum State {
    Unconfigured,
    Active(Backend),
    Closed,
}

/// Process-wide logging entry point.
///
/// Construct one per process, configure it during startup and share it by
/// reference (or behind an `Arc`) with everything that logs. All emission is
/// serialised behind an internal mutex.
pub struct LogFacade {
    state: Mutex<State>,
}

impl LogFacade {
    /// Creates an unconfigured facade. Every call is a no-op until
    /// [`configure`](Self::configure) succeeds.
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(State::Unconfigured),
        }
    }

    /// Creates a facade and configures it in one step.
    pub fn from_settings(settings: &LogSettings) -> Result<Self, LogError> {
        let facade = Self::new();
        facade.configure(settings)?;
        Ok(facade)
    }

    /// Selects and opens the backend.
    ///
    /// A platform sink wins over everything else, then the File backend
    /// (library-only builds or an explicit path), then syslog or standard
    /// error. Whether standard error is a terminal is checked here, once.
    pub fn configure(&self, settings: &LogSettings) -> Result<LogBackend, LogError> {
        let mut state = self.lock();
        if !matches!(*state, State::Unconfigured) {
            return Err(LogError::AlreadyConfigured);
        }

        let backend = Backend::select(settings)?;
        let kind = backend.kind();
        *state = State::Active(backend);
        debug!(backend = %kind, "logging facade configured");
        Ok(kind)
    }

    /// The active backend, or `None` before configure and after shutdown.
    pub fn backend(&self) -> Option<LogBackend> {
        match &*self.lock() {
            State::Active(backend) => Some(backend.kind()),
            State::Unconfigured | State::Closed => None,
        }
    }

    /// Emits an informational record.
    pub fn info(&self, args: fmt::Arguments<'_>) {
        self.log(Severity::Info, args);
    }

    /// Emits an error record.
    pub fn error(&self, args: fmt::Arguments<'_>) {
        self.log(Severity::Error, args);
    }

    /// Emits a record at `severity`. Write failures are discarded.
    pub fn log(&self, severity: Severity, args: fmt::Arguments<'_>) {
        if let State::Active(backend) = &mut *self.lock() {
            let _ = backend.emit(severity, args);
        }
    }

    /// Flushes and releases the backend. Safe to call repeatedly, or
    /// without a prior `configure`; later records are dropped.
    pub fn shutdown(&self) {
        let previous = std::mem::replace(&mut *self.lock(), State::Closed);
        if let State::Active(backend) = previous {
            backend.close();
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[cfg(test)]
    fn with_console(sink: Box<dyn Write + Send>, color: bool) -> Self {
        Self {
            state: Mutex::new(State::Active(Backend::Console { sink, color })),
        }
    }
}

impl Default for LogFacade {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LogFacade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogFacade")
            .field("backend", &self.backend())
            .finish()
    }
}

impl Drop for LogFacade {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Logs at info severity: `log_info!(log, "listening on {}", addr)`.
#[macro_export]
macro_rules! log_info {
    ($log:expr, $($arg:tt)+) => {
        $log.info(format_args!($($arg)+))
    };
}

/// Logs at error severity: `log_error!(log, "bind failed: {}", err)`.
#[macro_export]
macro_rules! log_error {
    ($log:expr, $($arg:tt)+) => {
        $log.error(format_args!($($arg)+))
    };
}

fn open_log_file(path: &Path) -> Result<File, LogError> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .map_err(|source| LogError::Open {
            path: path.to_path_buf(),
            source,
        })
}

fn timestamp() -> String {
    Local::now().format(TIME_FORMAT).to_string()
}

/// Renders `" <timestamp> INFO: <message>\n"`, wrapping the prefix in the
/// severity colour when `color` is set.
fn format_line(
    severity: Severity,
    timestamp: &str,
    args: fmt::Arguments<'_>,
    color: bool,
) -> String {
    let prefix = format!(" {timestamp} {} ", severity.label());
    if color {
        format!("{}{prefix}{COLOR_RESET}{args}\n", severity.color())
    } else {
        format!("{prefix}{args}\n")
    }
}
