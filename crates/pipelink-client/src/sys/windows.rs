//! Windows transport: a named pipe opened in the client role, switched to
//! message read mode with non-blocking waits.

use std::io;
use std::os::windows::io::{AsRawHandle, FromRawHandle, OwnedHandle};
use std::ptr;

use windows_sys::Win32::Foundation::{GENERIC_READ, GENERIC_WRITE, HANDLE, INVALID_HANDLE_VALUE};
use windows_sys::Win32::Storage::FileSystem::{CreateFileW, ReadFile, WriteFile, OPEN_EXISTING};
use windows_sys::Win32::System::Pipes::{
    SetNamedPipeHandleState, PIPE_NOWAIT, PIPE_READMODE_MESSAGE,
};

use crate::error::PipeError;

/// Nominal "operation pending" code the pipe documentation names for
/// non-blocking access.
pub const ERROR_IO_PENDING: i32 = windows_sys::Win32::Foundation::ERROR_IO_PENDING as i32;
/// Code non-blocking pipe reads actually report when no data is available.
/// Diverges from the documented pending code; both are exported so callers
/// can branch on either.
pub const ERROR_NO_DATA: i32 = windows_sys::Win32::Foundation::ERROR_NO_DATA as i32;
/// Code used to reject operations on a released endpoint.
pub const ERROR_HANDLE_CLOSED: i32 = windows_sys::Win32::Foundation::ERROR_INVALID_HANDLE as i32;

/// One endpoint of a connected pipe. The OS handle is released when the
/// endpoint is dropped.
pub struct PipeEndpoint {
    handle: OwnedHandle,
}

impl PipeEndpoint {
    /// Connect to an already-existing named pipe: read and write access,
    /// no sharing. The client never creates the pipe.
    pub fn connect(path: &str) -> Result<Self, PipeError> {
        let wide: Vec<u16> = path.encode_utf16().chain(std::iter::once(0)).collect();
        let raw = unsafe {
            CreateFileW(
                wide.as_ptr(),
                GENERIC_READ | GENERIC_WRITE,
                0,
                ptr::null(),
                OPEN_EXISTING,
                0,
                ptr::null_mut(),
            )
        };
        if raw == INVALID_HANDLE_VALUE {
            return Err(PipeError::last_os_error());
        }
        let handle = unsafe { OwnedHandle::from_raw_handle(raw as _) };
        Ok(Self { handle })
    }

    /// Best-effort switch to message read mode with non-blocking waits.
    pub fn set_message_nonblocking(&self) -> io::Result<()> {
        let mode = PIPE_READMODE_MESSAGE | PIPE_NOWAIT;
        let ok = unsafe {
            SetNamedPipeHandleState(self.raw(), &mode, ptr::null(), ptr::null())
        };
        if ok == 0 {
            Err(io::Error::last_os_error())
        } else {
            Ok(())
        }
    }

    /// One OS-level read into `buf`. A non-blocking read with nothing
    /// available fails with [`ERROR_NO_DATA`].
    pub fn read(&self, buf: &mut [u8]) -> Result<usize, PipeError> {
        let mut received: u32 = 0;
        let ok = unsafe {
            ReadFile(
                self.raw(),
                buf.as_mut_ptr() as *mut _,
                buf.len() as u32,
                &mut received,
                ptr::null_mut(),
            )
        };
        if ok == 0 {
            Err(PipeError::last_os_error())
        } else {
            Ok(received as usize)
        }
    }

    /// One OS-level write of `data`. Returns the count actually written.
    pub fn write(&self, data: &[u8]) -> Result<usize, PipeError> {
        let mut written: u32 = 0;
        let ok = unsafe {
            WriteFile(
                self.raw(),
                data.as_ptr() as *const _,
                data.len() as u32,
                &mut written,
                ptr::null_mut(),
            )
        };
        if ok == 0 {
            Err(PipeError::last_os_error())
        } else {
            Ok(written as usize)
        }
    }

    fn raw(&self) -> HANDLE {
        self.handle.as_raw_handle() as HANDLE
    }
}

impl From<OwnedHandle> for PipeEndpoint {
    fn from(handle: OwnedHandle) -> Self {
        Self { handle }
    }
}
