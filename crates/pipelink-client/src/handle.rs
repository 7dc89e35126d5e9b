//! The duplex pipe handle: open, read, write, and exactly-once teardown.

use std::mem;

use tracing::{debug, warn};

use pipelink_common::platform;

use crate::error::PipeError;
use crate::sys;

/// Fixed capacity of the scratch buffer every read stages its result in.
/// Allocated once at construction, reused for the handle's whole lifetime.
pub const SCRATCH_CAPACITY: usize = 2048;

/// Ownership of the write side. Release logic performs exactly one OS
/// release per distinct resource, so aliasing is tracked here rather than
/// by comparing raw handle values at teardown time.
enum WriteSide {
    /// Writes go through the read endpoint (single duplex resource).
    Shared,
    /// Writes go through a distinct endpoint, released independently.
    Split(sys::PipeEndpoint),
    /// No write side: read-only use, or already released.
    Unset,
}

/// Client handle for a named channel.
///
/// Every owned resource sits in its own slot and is taken at most once, so
/// `close`, `Drop`, and any combination of the two converge to the same
/// released state. Reads and writes on a closed handle are rejected rather
/// than touching a released OS resource.
pub struct PipeHandle {
    read: Option<sys::PipeEndpoint>,
    write: WriteSide,
    scratch: Option<Box<[u8]>>,
}

impl PipeHandle {
    /// Connect to an already-existing named channel and return its handle.
    ///
    /// `name` defaults to [`platform::default_pipe_path`]. The channel is
    /// opened for reading and writing with no sharing, then switched to
    /// message-boundary, non-blocking mode on a best-effort basis: if the
    /// mode change fails the handle is still returned and reads may block
    /// until data arrives.
    pub fn open(name: Option<&str>) -> Result<Self, PipeError> {
        let path = match name {
            Some(name) => name.to_string(),
            None => platform::default_pipe_path(),
        };
        let endpoint = sys::PipeEndpoint::connect(&path)?;
        if let Err(err) = endpoint.set_message_nonblocking() {
            warn!(pipe = %path, "could not enable message/non-blocking mode: {}", err);
        }
        debug!(pipe = %path, "connected to named channel");
        Ok(Self::from_duplex(endpoint))
    }

    /// Wrap a single duplex endpoint: reads and writes share one resource.
    pub fn from_duplex(endpoint: sys::PipeEndpoint) -> Self {
        Self {
            read: Some(endpoint),
            write: WriteSide::Shared,
            scratch: Some(new_scratch()),
        }
    }

    /// Assemble a handle from already-connected endpoints: a distinct
    /// write endpoint, or none at all for read-only use.
    pub fn from_parts(read: sys::PipeEndpoint, write: Option<sys::PipeEndpoint>) -> Self {
        Self {
            read: Some(read),
            write: match write {
                Some(endpoint) => WriteSide::Split(endpoint),
                None => WriteSide::Unset,
            },
            scratch: Some(new_scratch()),
        }
    }

    /// Read whatever the channel currently holds, up to the scratch
    /// capacity minus one; a terminating NUL is written after the last
    /// byte received. Not buffered: each call reflects exactly one
    /// OS-level read, and splitting into lines or records is up to the
    /// caller.
    ///
    /// Zero bytes received counts as failure even when the OS call itself
    /// succeeded; "channel alive but empty" is not data. On a non-blocking
    /// channel with nothing available, the failure's raw code equals
    /// [`ERROR_NO_DATA`](crate::ERROR_NO_DATA).
    pub fn read(&mut self) -> Result<Vec<u8>, PipeError> {
        let endpoint = match self.read.as_ref() {
            Some(endpoint) => endpoint,
            None => return Err(PipeError::closed()),
        };
        let scratch = match self.scratch.as_mut() {
            Some(scratch) => scratch,
            None => return Err(PipeError::closed()),
        };

        let received = endpoint.read(&mut scratch[..SCRATCH_CAPACITY - 1])?;
        scratch[received] = 0;
        if received == 0 {
            return Err(PipeError::last_os_error());
        }
        Ok(scratch[..received].to_vec())
    }

    /// Write `data` in one OS call and return the count actually written.
    ///
    /// A short count is not an error at this layer, and neither is a
    /// failed write: both surface only as a smaller (possibly zero)
    /// count. Callers that need the cause can query
    /// [`last_error_code`](crate::last_error_code) immediately after.
    pub fn write(&mut self, data: &[u8]) -> usize {
        let endpoint = match (&self.write, &self.read) {
            (WriteSide::Split(endpoint), _) => endpoint,
            (WriteSide::Shared, Some(endpoint)) => endpoint,
            _ => {
                debug!("write on a closed or read-only pipe handle");
                return 0;
            }
        };
        match endpoint.write(data) {
            Ok(written) => written,
            Err(err) => {
                debug!(code = err.raw_code(), "pipe write failed: {}", err);
                0
            }
        }
    }

    /// Release every resource still pending: a distinct write endpoint,
    /// the scratch buffer, then the read endpoint. Each slot is taken at
    /// most once, so repeated calls (and `Drop` afterwards) find nothing
    /// left to do. A shared write side is released together with the read
    /// endpoint, never separately.
    pub fn close(&mut self) {
        if let WriteSide::Split(endpoint) = mem::replace(&mut self.write, WriteSide::Unset) {
            drop(endpoint);
        }
        self.scratch.take();
        if self.read.take().is_some() {
            debug!("pipe handle released");
        }
    }

    /// True once `close` has run (or the handle was partially torn down).
    pub fn is_closed(&self) -> bool {
        self.read.is_none()
    }
}

impl Drop for PipeHandle {
    fn drop(&mut self) {
        self.close();
    }
}

fn new_scratch() -> Box<[u8]> {
    vec![0u8; SCRATCH_CAPACITY].into_boxed_slice()
}
