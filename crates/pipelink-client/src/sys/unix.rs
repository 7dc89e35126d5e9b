//! Unix transport: a connected Unix domain socket stands in for the named
//! pipe. Message boundaries are a Windows pipe property; this side carries
//! a plain byte stream.

use std::io::{self, Read, Write};
use std::os::unix::net::UnixStream;

use crate::error::PipeError;

/// Nominal "operation pending" code for an in-progress request.
pub const ERROR_IO_PENDING: i32 = libc::EINPROGRESS;
/// Code a non-blocking read actually reports when no data is available.
pub const ERROR_NO_DATA: i32 = libc::EWOULDBLOCK;
/// Code used to reject operations on a released endpoint.
pub const ERROR_HANDLE_CLOSED: i32 = libc::EBADF;

/// One endpoint of a connected channel. The descriptor is released when
/// the endpoint is dropped.
pub struct PipeEndpoint {
    stream: UnixStream,
}

impl PipeEndpoint {
    /// Connect to an already-existing channel. The client never creates
    /// the channel; a missing socket path is a connection failure.
    pub fn connect(path: &str) -> Result<Self, PipeError> {
        let stream = UnixStream::connect(path).map_err(PipeError::from_io)?;
        Ok(Self { stream })
    }

    /// Best-effort switch to non-blocking reads.
    pub fn set_message_nonblocking(&self) -> io::Result<()> {
        self.stream.set_nonblocking(true)
    }

    /// One OS-level read into `buf`. Zero bytes means the call succeeded
    /// without moving data; the caller decides what that means.
    pub fn read(&self, buf: &mut [u8]) -> Result<usize, PipeError> {
        (&self.stream).read(buf).map_err(PipeError::from_io)
    }

    /// One OS-level write of `data`. Returns the count actually written,
    /// which may be short.
    pub fn write(&self, data: &[u8]) -> Result<usize, PipeError> {
        (&self.stream).write(data).map_err(PipeError::from_io)
    }
}

impl From<UnixStream> for PipeEndpoint {
    fn from(stream: UnixStream) -> Self {
        Self { stream }
    }
}
