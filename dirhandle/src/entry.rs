use std::ffi::{OsStr, OsString};
use std::fmt;
#[cfg(unix)]
use std::os::unix::ffi::OsStrExt;

use crate::prelude::*;

/// Platforms where the enumeration reports the entry type without an extra stat call.
#[cfg(any(
    target_os = "linux",
    target_os = "android",
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "openbsd",
    target_os = "netbsd"
))]
pub const HAVE_DIRENT_TYPES: bool = true;

#[cfg(not(any(
    target_os = "linux",
    target_os = "android",
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "openbsd",
    target_os = "netbsd"
)))]
pub const HAVE_DIRENT_TYPES: bool = false;

// 'Unknown' only means the type was not reported, it does not imply a regular file.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum EntryType {
    Unknown,
    File,
    Dir,
    Link,
    Fifo,
    Socket,
    Char,
    Block,
}

impl Default for EntryType {
    fn default() -> Self {
        EntryType::Unknown
    }
}

impl EntryType {
    #[cfg(any(
        target_os = "linux",
        target_os = "android",
        target_os = "macos",
        target_os = "ios",
        target_os = "freebsd",
        target_os = "openbsd",
        target_os = "netbsd"
    ))]
    pub fn from_d_type(d_type: u8) -> EntryType {
        use EntryType::*;
        match d_type {
            libc::DT_REG => File,
            libc::DT_DIR => Dir,
            libc::DT_LNK => Link,
            libc::DT_FIFO => Fifo,
            libc::DT_SOCK => Socket,
            libc::DT_CHR => Char,
            libc::DT_BLK => Block,
            _ => Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        use EntryType::*;
        match self {
            Unknown => "unknown",
            File => "file",
            Dir => "dir",
            Link => "link",
            Fifo => "fifo",
            Socket => "socket",
            Char => "char",
            Block => "block",
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single directory member within a 'Batch'.
///
/// The name buffer is overwritten in place by the next read into the same batch slot,
/// callers copy names they want to keep.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Dirent {
    name: OsString,
    kind: EntryType,
}

impl Dirent {
    pub fn name(&self) -> &OsStr {
        &self.name
    }

    pub fn kind(&self) -> EntryType {
        self.kind
    }

    /// true for the "." and ".." entries
    pub fn is_dot(&self) -> bool {
        is_dot(self.name.as_bytes())
    }

    pub(crate) fn fill(&mut self, name: &[u8], kind: EntryType) {
        self.name.clear();
        self.name.push(OsStr::from_bytes(name));
        self.kind = kind;
    }

    pub(crate) fn clear(&mut self) {
        self.name.clear();
        self.kind = EntryType::Unknown;
    }
}

#[inline]
pub(crate) fn is_dot(name: &[u8]) -> bool {
    name == b"." || name == b".."
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    #[cfg(target_os = "linux")]
    fn d_type_mapping() {
        assert_eq!(EntryType::from_d_type(libc::DT_REG), EntryType::File);
        assert_eq!(EntryType::from_d_type(libc::DT_DIR), EntryType::Dir);
        assert_eq!(EntryType::from_d_type(libc::DT_LNK), EntryType::Link);
        assert_eq!(EntryType::from_d_type(libc::DT_FIFO), EntryType::Fifo);
        assert_eq!(EntryType::from_d_type(libc::DT_SOCK), EntryType::Socket);
        assert_eq!(EntryType::from_d_type(libc::DT_CHR), EntryType::Char);
        assert_eq!(EntryType::from_d_type(libc::DT_BLK), EntryType::Block);
        assert_eq!(EntryType::from_d_type(libc::DT_UNKNOWN), EntryType::Unknown);
    }

    #[test]
    fn fill_reuses_slot() {
        let mut dirent = Dirent::default();
        assert_eq!(dirent.kind(), EntryType::Unknown);

        dirent.fill(b"a_rather_long_name", EntryType::File);
        assert_eq!(dirent.name(), "a_rather_long_name");

        dirent.fill(b"..", EntryType::Dir);
        assert_eq!(dirent.name(), "..");
        assert_eq!(dirent.kind(), EntryType::Dir);
        assert!(dirent.is_dot());

        dirent.clear();
        assert_eq!(dirent.name(), "");
        assert!(!dirent.is_dot());
    }

    #[test]
    fn dots() {
        assert!(is_dot(b"."));
        assert!(is_dot(b".."));
        assert!(!is_dot(b"..."));
        assert!(!is_dot(b".hidden"));
    }
}
