//! Client-side handle for an OS named-pipe channel.
//!
//! Connects to an already-existing named channel (never creates one),
//! reads and writes through it synchronously, and guarantees that every
//! owned resource is released exactly once no matter how teardown is
//! reached. Reads are non-blocking where the platform allows it: an empty
//! channel reports a failure whose raw code equals [`ERROR_NO_DATA`], which
//! is how pollers tell "nothing yet" from a broken channel.
//!
//! On Windows the transport is a named pipe in message read mode; on Unix
//! hosts the equivalent client role is served by a Unix domain socket.

mod error;
mod handle;
mod sys;

pub use error::{format_os_error, last_error_code, PipeError};
pub use handle::{PipeHandle, SCRATCH_CAPACITY};
pub use sys::{PipeEndpoint, ERROR_IO_PENDING, ERROR_NO_DATA};

/// Connect to a named channel and return its handle, or the failure result.
///
/// `name` defaults to [`pipelink_common::platform::default_pipe_path`].
/// This is the boundary entry point host glue is expected to call.
pub fn open_pipe(name: Option<&str>) -> Result<PipeHandle, PipeError> {
    PipeHandle::open(name)
}
