use std::ffi::{CStr, CString};
use std::fmt;
#[cfg(unix)]
use std::os::unix::ffi::OsStrExt;
use std::os::unix::io::RawFd;
use std::path::Path;
use std::ptr::NonNull;

use crate::entry::EntryType;
use crate::prelude::*;

/// Owned POSIX directory stream (DIR*).
pub(crate) struct DirStream {
    dir: NonNull<libc::DIR>,
}

// The stream is used by one thread at a time, it moves together with its handle.
unsafe impl Send for DirStream {}

impl DirStream {
    pub(crate) fn open(path: &Path) -> Result<DirStream, DirError> {
        let cpath =
            CString::new(path.as_os_str().as_bytes()).map_err(|_| DirError::Io(libc::EINVAL))?;

        trace!("opendir({:?})", path);
        let dir = unsafe { libc::opendir(cpath.as_ptr()) };

        NonNull::new(dir)
            .map(|dir| DirStream { dir })
            .ok_or_else(DirError::last_os_error)
    }

    /// Next raw entry, 'None' at the end of the stream. The name borrows storage of the
    /// stream which the next call overwrites.
    pub(crate) fn next_entry(&mut self) -> Result<Option<(&[u8], EntryType)>, DirError> {
        // readdir() only reports errors through errno
        set_errno(0);
        let entry = unsafe { libc::readdir(self.dir.as_ptr()) };

        if entry.is_null() {
            match errno() {
                0 => Ok(None),
                err => Err(DirError::from_errno(err)),
            }
        } else {
            let entry = unsafe { &*entry };
            let name = unsafe { CStr::from_ptr(entry.d_name.as_ptr()) }.to_bytes();
            Ok(Some((name, entry_type(entry))))
        }
    }

    pub(crate) fn raw_fd(&self) -> RawFd {
        unsafe { libc::dirfd(self.dir.as_ptr()) }
    }

    pub(crate) fn close(self) -> Result<(), DirError> {
        let dir = self.dir;
        std::mem::forget(self);

        trace!("closedir({:p})", dir);
        if unsafe { libc::closedir(dir.as_ptr()) } == -1 {
            Err(DirError::last_os_error())
        } else {
            Ok(())
        }
    }
}

impl Drop for DirStream {
    fn drop(&mut self) {
        trace!("closedir({:p}) on drop", self.dir);
        unsafe {
            libc::closedir(self.dir.as_ptr());
        }
    }
}

impl fmt::Debug for DirStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DirStream({:p})", self.dir)
    }
}

#[cfg(any(
    target_os = "linux",
    target_os = "android",
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "openbsd",
    target_os = "netbsd"
))]
#[inline]
fn entry_type(entry: &libc::dirent) -> EntryType {
    EntryType::from_d_type(entry.d_type)
}

#[cfg(not(any(
    target_os = "linux",
    target_os = "android",
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "openbsd",
    target_os = "netbsd"
)))]
#[inline]
fn entry_type(_entry: &libc::dirent) -> EntryType {
    EntryType::Unknown
}

#[cfg(target_os = "linux")]
fn errno_location() -> *mut libc::c_int {
    unsafe { libc::__errno_location() }
}

#[cfg(any(target_os = "android", target_os = "openbsd", target_os = "netbsd"))]
fn errno_location() -> *mut libc::c_int {
    unsafe { libc::__errno() }
}

#[cfg(any(target_os = "macos", target_os = "ios", target_os = "freebsd"))]
fn errno_location() -> *mut libc::c_int {
    unsafe { libc::__error() }
}

fn errno() -> i32 {
    unsafe { *errno_location() }
}

fn set_errno(value: i32) {
    unsafe { *errno_location() = value }
}
