//! Privilege and resource management helpers for daemon startup.
use std::io;

use nix::{
    errno::Errno,
    sys::resource::{Resource, getrlimit, setrlimit},
    unistd::{Gid, Uid, User, setuid},
};
use tracing::{info, warn};

use crate::error::PrivilegeError;
use crate::logging::LogFacade;
use crate::process::OrFatal;
use crate::util::is_numeric_string;

/// Switches to `user`, exiting the process if the switch is not possible.
///
/// A failed drop never falls back to running with the current identity.
pub fn drop_privileges(log: &LogFacade, user: &str) {
    try_drop_privileges(user).or_fatal(log)
}

/// Switches real, effective and saved ids to `user`.
///
/// `user` may be an account name or a numeric uid. Supplementary groups are
/// initialised from the account database, then the group id, then the user
/// id. The switch is skipped only when every uid the process holds is
/// already the target; a setuid launch whose real uid matches still drops
/// its effective and saved root ids. Either way root must not be regainable
/// afterwards.
pub fn try_drop_privileges(user: &str) -> Result<(), PrivilegeError> {
    let account = resolve_user(user)?;
    let switched = !holds_only(account.uid);
    if switched {
        set_supplementary_groups(&account)?;
        set_group(account.gid)?;
        set_user(account.uid)?;
    }

    if !account.uid.is_root() && setuid(Uid::from_raw(0)).is_ok() {
        return Err(PrivilegeError::RegainedRoot(account.uid.as_raw()));
    }

    if switched {
        info!(user = %account.name, uid = account.uid.as_raw(), "dropped privileges");
    }
    Ok(())
}

#[cfg(any(target_os = "linux", target_os = "android", target_os = "freebsd", target_os = "openbsd"))]
fn holds_only(uid: Uid) -> bool {
    nix::unistd::getresuid()
        .is_ok_and(|ids| ids.real == uid && ids.effective == uid && ids.saved == uid)
}

// The saved uid is not observable here; the regain check covers it.
#[cfg(not(any(target_os = "linux", target_os = "android", target_os = "freebsd", target_os = "openbsd")))]
fn holds_only(uid: Uid) -> bool {
    nix::unistd::getuid() == uid && nix::unistd::geteuid() == uid
}

fn resolve_user(user: &str) -> Result<User, PrivilegeError> {
    let lookup = if is_numeric_string(user) {
        match user.parse::<u32>() {
            Ok(uid) => User::from_uid(Uid::from_raw(uid)),
            Err(_) => Ok(None),
        }
    } else {
        User::from_name(user)
    };

    lookup
        .map_err(|source| PrivilegeError::Lookup {
            user: user.to_string(),
            source,
        })?
        .ok_or_else(|| PrivilegeError::UnknownUser(user.to_string()))
}

#[cfg(not(any(target_os = "macos", target_os = "ios")))]
fn set_supplementary_groups(account: &User) -> Result<(), PrivilegeError> {
    let name = std::ffi::CString::new(account.name.as_str())
        .map_err(|_| PrivilegeError::SetGroups(Errno::EINVAL))?;
    nix::unistd::initgroups(&name, account.gid).map_err(PrivilegeError::SetGroups)
}

#[cfg(any(target_os = "macos", target_os = "ios"))]
fn set_supplementary_groups(account: &User) -> Result<(), PrivilegeError> {
    warn!(
        user = %account.name,
        "supplementary groups are not initialised on this platform"
    );
    Ok(())
}

#[cfg(any(target_os = "linux", target_os = "android", target_os = "freebsd", target_os = "openbsd"))]
fn set_group(gid: Gid) -> Result<(), PrivilegeError> {
    nix::unistd::setresgid(gid, gid, gid).map_err(PrivilegeError::SetGid)
}

#[cfg(not(any(target_os = "linux", target_os = "android", target_os = "freebsd", target_os = "openbsd")))]
fn set_group(gid: Gid) -> Result<(), PrivilegeError> {
    nix::unistd::setgid(gid).map_err(PrivilegeError::SetGid)
}

#[cfg(any(target_os = "linux", target_os = "android", target_os = "freebsd", target_os = "openbsd"))]
fn set_user(uid: Uid) -> Result<(), PrivilegeError> {
    nix::unistd::setresuid(uid, uid, uid).map_err(PrivilegeError::SetUid)
}

#[cfg(not(any(target_os = "linux", target_os = "android", target_os = "freebsd", target_os = "openbsd")))]
fn set_user(uid: Uid) -> Result<(), PrivilegeError> {
    setuid(uid).map_err(PrivilegeError::SetUid)
}

/// Open-file limit after a call to [`raise_file_descriptor_limit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NofileLimit {
    /// The count that was asked for.
    pub requested: u64,
    /// Soft limit now in effect.
    pub soft: u64,
    /// Hard limit, the ceiling for `soft`.
    pub hard: u64,
}

impl NofileLimit {
    /// Whether the soft limit reached the requested count.
    pub fn satisfied(&self) -> bool {
        self.soft >= self.requested
    }
}

/// Raises the soft `RLIMIT_NOFILE` towards `desired`.
///
/// The new soft limit is capped at the hard limit and is never lower than
/// the soft limit at call time. Falling short is reported through
/// [`NofileLimit::satisfied`], not as an error. That includes a kernel that
/// refuses the new soft limit (macOS rejects values above `OPEN_MAX` even
/// under an unlimited hard limit); the limit in force is returned instead.
/// Only a failure to read the limit is an error.
pub fn raise_file_descriptor_limit(desired: u64) -> io::Result<NofileLimit> {
    raise_nofile_with(desired, |soft, hard| {
        setrlimit(Resource::RLIMIT_NOFILE, soft as _, hard as _)
    })
}

fn raise_nofile_with(
    desired: u64,
    set: impl FnOnce(u64, u64) -> nix::Result<()>,
) -> io::Result<NofileLimit> {
    let (soft, hard) = read_nofile()?;

    let target = desired.min(hard);
    if target > soft
        && let Err(errno) = set(target, hard)
    {
        warn!(requested = desired, soft = target, %errno, "kernel refused open file limit");
    }

    let (soft, hard) = read_nofile()?;
    let limit = NofileLimit {
        requested: desired,
        soft,
        hard,
    };
    if !limit.satisfied() {
        warn!(
            requested = desired,
            soft = limit.soft,
            hard = limit.hard,
            "open file limit capped below request"
        );
    }
    Ok(limit)
}

fn read_nofile() -> io::Result<(u64, u64)> {
    let (soft, hard) = getrlimit(Resource::RLIMIT_NOFILE).map_err(io::Error::from)?;
    Ok((soft as u64, hard as u64))
}
