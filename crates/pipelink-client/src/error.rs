//! Error reporting: raw OS error codes, resolved messages, and the uniform
//! failure result every fallible pipe operation returns.

use std::io;

#[cfg(windows)]
use windows_sys::Win32::Foundation::GetLastError;

use crate::sys;

/// Failure result for pipe operations: the raw OS error code captured at
/// the failure site plus its resolved message.
///
/// The code is snapshotted when the error is constructed, so callers can
/// branch on [`PipeError::raw_code`] long after the OS's thread-local
/// last-error state has been overwritten.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct PipeError {
    code: i32,
    message: String,
}

impl PipeError {
    /// Snapshot the calling thread's last OS error.
    pub fn last_os_error() -> Self {
        Self::from_raw_os_error(last_error_code())
    }

    /// Build a failure result from an explicit OS error code.
    pub fn from_raw_os_error(code: i32) -> Self {
        Self {
            code,
            message: format_os_error(Some(code)),
        }
    }

    /// Rejection error for operations on an already-closed handle.
    pub(crate) fn closed() -> Self {
        Self::from_raw_os_error(sys::ERROR_HANDLE_CLOSED)
    }

    pub(crate) fn from_io(err: io::Error) -> Self {
        Self {
            code: err.raw_os_error().unwrap_or(0),
            message: err.to_string(),
        }
    }

    /// The raw, unformatted OS error code.
    pub fn raw_code(&self) -> i32 {
        self.code
    }

    /// True when a non-blocking read found the channel alive but empty.
    pub fn is_no_data(&self) -> bool {
        self.code == sys::ERROR_NO_DATA
    }

    /// True for the nominal "operation pending" code. Non-blocking pipe
    /// reads are documented to surface this, but in practice report
    /// [`ERROR_NO_DATA`](crate::ERROR_NO_DATA); poll loops should check
    /// [`PipeError::is_no_data`] first.
    pub fn is_pending(&self) -> bool {
        self.code == sys::ERROR_IO_PENDING
    }
}

/// Raw last OS error code on the calling thread, unformatted.
///
/// Exposed for callers that need to branch on the code of an operation
/// (such as [`PipeHandle::write`](crate::PipeHandle::write)) that does not
/// return a failure result of its own.
pub fn last_error_code() -> i32 {
    #[cfg(windows)]
    {
        unsafe { GetLastError() as i32 }
    }
    #[cfg(unix)]
    {
        io::Error::last_os_error().raw_os_error().unwrap_or(0)
    }
}

/// Resolve an OS error code to the system-provided message, stripping any
/// trailing line terminator the OS appends. With `None`, resolves the
/// calling thread's current last error.
pub fn format_os_error(code: Option<i32>) -> String {
    let code = code.unwrap_or_else(last_error_code);
    let message = io::Error::from_raw_os_error(code).to_string();
    message.trim_end_matches(&['\r', '\n'][..]).to_string()
}
