use std::{error::Error, thread, time::Duration};

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use daemon_utils::{
    cli::{Cli, parse_args},
    config::{RuntimeConfig, load_config},
    daemonize, drop_privileges,
    logging::LogFacade,
    log_error, log_info, raise_file_descriptor_limit,
};

fn main() -> Result<(), Box<dyn Error>> {
    let args = parse_args();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => RuntimeConfig::default(),
    };
    args.apply(&mut config);
    init_logging(&args, &config);

    let log = LogFacade::new();
    let backend = log.configure(&config.log).inspect_err(|err| {
        error!("Failed to configure logging: {err}");
    })?;
    info!(%backend, "logging configured");

    if let Some(nofile) = config.nofile {
        raise_nofile(&log, nofile);
    }

    if config.daemonize {
        daemonize(&log, config.pid_file.as_deref());
    }

    if let Some(user) = &config.user {
        drop_privileges(&log, user);
        log_info!(log, "running as user {user}");
    }

    for message in &args.messages {
        log_info!(log, "{message}");
    }

    if args.linger > 0 {
        thread::sleep(Duration::from_secs(args.linger));
    }

    log.shutdown();
    Ok(())
}

/// Installs the subscriber for the launcher's own diagnostics. It is also
/// the sink behind the platform backend, whose info records arrive at debug
/// level.
fn init_logging(args: &Cli, config: &RuntimeConfig) {
    let default_level = if config.log.platform { "debug" } else { "info" };
    let filter = if let Some(level) = args.log_level {
        EnvFilter::default().add_directive(level.into())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
    };

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn raise_nofile(log: &LogFacade, nofile: u64) {
    match raise_file_descriptor_limit(nofile) {
        Ok(limit) if limit.satisfied() => {
            log_info!(log, "set open file limit to {}", limit.soft);
        }
        Ok(limit) => {
            log_error!(
                log,
                "open file limit is {} (hard limit {}), below requested {}",
                limit.soft,
                limit.hard,
                nofile
            );
        }
        Err(err) => {
            log_error!(log, "failed to raise open file limit: {err}");
        }
    }
}
