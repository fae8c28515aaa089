//! Command-line interface for the `dutil` launcher.
use std::path::PathBuf;

use clap::Parser;
use tracing::level_filters::LevelFilter;

use crate::config::RuntimeConfig;

/// Accepts `off`, a level name, or its 0-5 index. Blank input is refused
/// rather than read as `error`.
fn parse_log_level(value: &str) -> Result<LevelFilter, String> {
    let value = value.trim();
    if value.is_empty() {
        return Err("log level cannot be empty".into());
    }
    value
        .parse::<LevelFilter>()
        .map_err(|_| format!("unknown log level '{value}' (use off, error..trace or 0-5)"))
}

/// Runs the daemon startup sequence: logging, open-file limit, detach and
/// privilege drop, in that order.
#[derive(Parser, Debug)]
#[command(name = "dutil", version, author)]
#[command(about = "Daemon startup helper: logging, limits, detach, privilege drop", long_about = None)]
pub struct Cli {
    /// Verbosity of the launcher's own diagnostics.
    #[arg(long, value_name = "LEVEL", value_parser = parse_log_level)]
    pub log_level: Option<LevelFilter>,

    /// YAML configuration file; flags below override its values.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write the detached process id to this file.
    #[arg(short = 'f', long, value_name = "PATH")]
    pub pid_file: Option<PathBuf>,

    /// Switch to this user (name or uid) after startup.
    #[arg(short = 'a', long, value_name = "USER")]
    pub user: Option<String>,

    /// Raise the open-file soft limit to this count.
    #[arg(short = 'n', long, value_name = "COUNT")]
    pub nofile: Option<u64>,

    /// Log to this file instead of the console.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Log to syslog instead of standard error.
    #[arg(long)]
    pub syslog: bool,

    /// Disable ANSI colors on standard error.
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Send records to the host log sink.
    #[arg(long)]
    pub platform_log: bool,

    /// Syslog identity tag.
    #[arg(long, value_name = "NAME")]
    pub identity: Option<String>,

    /// Detach from the controlling terminal.
    #[arg(short, long)]
    pub daemonize: bool,

    /// Seconds to keep running after startup.
    #[arg(long, value_name = "SECS", default_value_t = 0)]
    pub linger: u64,

    /// Messages to log at info severity once startup completes.
    pub messages: Vec<String>,
}

impl Cli {
    /// Overlays the flags that were given on top of `config`.
    pub fn apply(&self, config: &mut RuntimeConfig) {
        if let Some(path) = &self.pid_file {
            config.pid_file = Some(path.clone());
        }
        if let Some(user) = &self.user {
            config.user = Some(user.clone());
        }
        if let Some(nofile) = self.nofile {
            config.nofile = Some(nofile);
        }
        if let Some(path) = &self.log_file {
            config.log.file = Some(path.clone());
        }
        if let Some(identity) = &self.identity {
            config.log.identity = identity.clone();
        }
        config.log.syslog |= self.syslog;
        config.log.platform |= self.platform_log;
        config.log.color &= !self.no_color;
        config.daemonize |= self.daemonize;
    }
}

/// Parses process arguments.
pub fn parse_args() -> Cli {
    Cli::parse()
}
