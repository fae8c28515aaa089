//! Thin owner of the process's POSIX syslog connection.
//!
//! POSIX allows a single `openlog` per process, so at most one [`Syslog`]
//! should be alive at a time. The logging facade is its only constructor.
use std::ffi::CString;

use libc::c_int;

use crate::logging::Severity;

/// Open syslog connection tagged with a process identity.
#[derive(Debug)]
pub struct Syslog {
    // `openlog` keeps the pointer, so the tag has to outlive the connection.
    ident: CString,
}

impl Syslog {
    /// Calls `openlog(ident, LOG_CONS | LOG_PID, LOG_USER)`.
    pub fn open(identity: &str) -> Self {
        let ident = to_cstring(identity);
        unsafe {
            libc::openlog(ident.as_ptr(), libc::LOG_CONS | libc::LOG_PID, libc::LOG_USER);
        }
        Self { ident }
    }

    /// Identity the connection was opened with.
    pub fn identity(&self) -> &str {
        self.ident.to_str().unwrap_or_default()
    }

    /// Submits one message at the priority matching `severity`.
    pub fn send(&self, severity: Severity, message: &str) {
        let message = to_cstring(message);
        unsafe {
            libc::syslog(priority(severity), c"%s".as_ptr(), message.as_ptr());
        }
    }
}

impl Drop for Syslog {
    fn drop(&mut self) {
        unsafe { libc::closelog() };
    }
}

fn priority(severity: Severity) -> c_int {
    match severity {
        Severity::Info => libc::LOG_INFO,
        Severity::Error => libc::LOG_ERR,
    }
}

// Interior NULs would truncate the record, so they are dropped.
fn to_cstring(text: &str) -> CString {
    CString::new(text.replace('\0', "")).unwrap_or_default()
}
