use std::os::unix::io::RawFd;
use std::path::{Path, PathBuf};

use crate::batch::Scratch;
use crate::prelude::*;
use crate::stream::DirStream;

/// The operation which produced the current result of a handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsType {
    None,
    OpenDir,
    ReadDir,
    CloseDir,
}

/// Lifecycle of a handle, a stream is held only while 'Open'.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Unopened,
    Open,
    Closed,
}

/// Whether reads pass the "." and ".." entries through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DotEntries {
    Include,
    Skip,
}

impl Default for DotEntries {
    fn default() -> Self {
        DotEntries::Include
    }
}

#[derive(Debug)]
pub(crate) enum Resource {
    Unopened,
    Open(DirStream),
    Closed,
}

/// One directory handle shared by open, read and close. Every operation, synchronous or
/// asynchronous, leaves its kind and result here.
#[derive(Debug)]
pub struct DirHandle {
    fs_type: FsType,
    result: Result<usize, DirError>,
    pub(crate) resource: Resource,
    pub(crate) dirents: Option<Scratch>,
    pub(crate) path: Option<PathBuf>,
    dot_entries: DotEntries,
}

impl Default for DirHandle {
    fn default() -> Self {
        DirHandle {
            fs_type: FsType::None,
            result: Ok(0),
            resource: Resource::Unopened,
            dirents: None,
            path: None,
            dot_entries: DotEntries::default(),
        }
    }
}

impl DirHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dot_entries(mut self, dot_entries: DotEntries) -> Self {
        self.dot_entries = dot_entries;
        self
    }

    pub fn set_dot_entries(&mut self, dot_entries: DotEntries) {
        self.dot_entries = dot_entries;
    }

    pub fn dot_entries(&self) -> DotEntries {
        self.dot_entries
    }

    pub fn fs_type(&self) -> FsType {
        self.fs_type
    }

    /// The result as number: entries read or 0 on success, the negative error code
    /// otherwise.
    pub fn result(&self) -> isize {
        match self.result {
            Ok(count) => count as isize,
            Err(err) => err.code() as isize,
        }
    }

    pub fn outcome(&self) -> Result<usize, DirError> {
        self.result
    }

    pub fn state(&self) -> State {
        match self.resource {
            Resource::Unopened => State::Unopened,
            Resource::Open(_) => State::Open,
            Resource::Closed => State::Closed,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.resource, Resource::Open(_))
    }

    /// File descriptor of the open directory stream. Stays owned by the handle.
    pub fn raw_fd(&self) -> Option<RawFd> {
        match &self.resource {
            Resource::Open(stream) => Some(stream.raw_fd()),
            _ => None,
        }
    }

    /// The batch used by the last read, until 'reset_state()'.
    pub fn dirents(&self) -> Option<Scratch> {
        self.dirents
    }

    /// The path given to the last open, until 'reset_state()'. Diagnostic only, it is set
    /// when the open failed too.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Local cleanup, no syscall. Clears what the last call recorded for diagnostics, the
    /// open/closed state and the result stay as they are.
    pub fn reset_state(&mut self) {
        self.dirents = None;
        self.path = None;
    }

    pub(crate) fn begin(&mut self, fs_type: FsType) {
        self.fs_type = fs_type;
        self.result = Ok(0);
    }

    pub(crate) fn finish(&mut self, result: Result<usize, DirError>) {
        if let Err(err) = result {
            debug!("{:?} failed: {}", self.fs_type, err);
        }
        self.result = result;
    }
}

impl Drop for DirHandle {
    fn drop(&mut self) {
        if let Resource::Open(_) = self.resource {
            warn!("dropping open handle {:?}, stream gets closed", self.path);
        }
    }
}
