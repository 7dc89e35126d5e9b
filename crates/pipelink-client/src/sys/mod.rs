//! Platform endpoints: the owned OS resource behind a pipe handle and the
//! error codes its non-blocking reads surface.

#[cfg(unix)]
mod unix;
#[cfg(unix)]
pub use unix::{PipeEndpoint, ERROR_HANDLE_CLOSED, ERROR_IO_PENDING, ERROR_NO_DATA};

#[cfg(windows)]
mod windows;
#[cfg(windows)]
pub use windows::{PipeEndpoint, ERROR_HANDLE_CLOSED, ERROR_IO_PENDING, ERROR_NO_DATA};
