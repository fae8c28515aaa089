//! Detaching the process from its controlling terminal.
use std::{
    fs::{File, OpenOptions},
    io::{self, Write},
    os::fd::AsRawFd,
    path::{Path, PathBuf},
    process,
};

use fs2::FileExt;
use nix::{
    sys::stat::{Mode, umask},
    unistd::{ForkResult, chdir, dup2, fork, getpid, setsid},
};
use tracing::info;

use crate::constants::DEV_NULL;
use crate::error::DaemonizeError;
use crate::logging::LogFacade;
use crate::process::OrFatal;

/// Moves the process into the background, exiting on any failure.
///
/// See [`try_daemonize`] for the sequence. Must run before any other thread
/// is started.
pub fn daemonize(log: &LogFacade, pid_file: Option<&Path>) {
    try_daemonize(pid_file).or_fatal(log)
}

/// Classic double-fork detach.
///
/// The calling process and the intermediate session leader both exit with
/// status 0; only the grandchild returns. It runs in a new session with a
/// zero umask, `/` as working directory and standard streams on `/dev/null`.
/// When `pid_file` is given the grandchild writes its pid there and keeps an
/// exclusive lock on the file until it exits.
pub fn try_daemonize(pid_file: Option<&Path>) -> Result<(), DaemonizeError> {
    // Relative paths must be resolved before leaving the working directory.
    let pid_file = pid_file.map(absolute_path).transpose()?;

    if let ForkResult::Parent { .. } =
        unsafe { fork() }.map_err(DaemonizeError::Fork)?
    {
        process::exit(0);
    }

    setsid().map_err(DaemonizeError::Setsid)?;

    if let ForkResult::Parent { .. } =
        unsafe { fork() }.map_err(DaemonizeError::Fork)?
    {
        process::exit(0);
    }

    umask(Mode::empty());
    chdir("/").map_err(DaemonizeError::Chdir)?;
    redirect_standard_streams().map_err(DaemonizeError::Redirect)?;

    if let Some(path) = pid_file {
        let file = write_pid_file(&path)?;
        // The lock is released by the kernel when the process exits.
        std::mem::forget(file);
    }

    info!(pid = getpid().as_raw(), "process detached from terminal");
    Ok(())
}

fn absolute_path(path: &Path) -> Result<PathBuf, DaemonizeError> {
    std::path::absolute(path).map_err(|source| DaemonizeError::PidFile {
        path: path.to_path_buf(),
        source,
    })
}

fn redirect_standard_streams() -> io::Result<()> {
    let devnull = OpenOptions::new().read(true).write(true).open(DEV_NULL)?;
    let fd = devnull.as_raw_fd();
    for target in [libc::STDIN_FILENO, libc::STDOUT_FILENO, libc::STDERR_FILENO] {
        dup2(fd, target).map_err(io::Error::from)?;
    }
    // Opened onto an already-closed standard slot; closing it would undo the redirect.
    if fd <= libc::STDERR_FILENO {
        std::mem::forget(devnull);
    }
    Ok(())
}

/// Locks `path` exclusively and replaces its contents with the current pid.
fn write_pid_file(path: &Path) -> Result<File, DaemonizeError> {
    let pid_error = |source| DaemonizeError::PidFile {
        path: path.to_path_buf(),
        source,
    };

    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
        .map_err(pid_error)?;

    if file.try_lock_exclusive().is_err() {
        return Err(DaemonizeError::PidFileLocked(path.to_path_buf()));
    }

    file.set_len(0).map_err(pid_error)?;
    writeln!(file, "{}", getpid()).map_err(pid_error)?;
    file.sync_all().map_err(pid_error)?;
    Ok(file)
}
