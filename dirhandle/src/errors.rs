use crate::prelude::*;

/// Classified error of a directory operation. Classification happens where the OS reports
/// the error, anything without a class of its own keeps its errno in 'Io'.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirError {
    #[error("no such file or directory")]
    NotFound,

    #[error("not a directory")]
    NotADirectory,

    #[error("permission denied")]
    AccessDenied,

    #[error("too many levels of symbolic links")]
    TooManySymlinks,

    #[error("resources exhausted: {}", io::Error::from_raw_os_error(*.0))]
    ResourceExhausted(i32),

    #[error("handle is not open")]
    InvalidState,

    #[error("I/O error: {}", io::Error::from_raw_os_error(*.0))]
    Io(i32),
}

use DirError::*;

impl DirError {
    pub fn from_errno(errno: i32) -> DirError {
        match errno {
            libc::ENOENT => NotFound,
            libc::ENOTDIR => NotADirectory,
            libc::EACCES | libc::EPERM => AccessDenied,
            libc::ELOOP => TooManySymlinks,
            libc::EMFILE | libc::ENFILE | libc::ENOMEM => ResourceExhausted(errno),
            _ => Io(errno),
        }
    }

    /// classifies 'errno' as left by the last failed libc call
    pub fn last_os_error() -> DirError {
        DirError::from(io::Error::last_os_error())
    }

    /// The positive OS error number, used as process exit code.
    pub fn errno(&self) -> i32 {
        match *self {
            NotFound => libc::ENOENT,
            NotADirectory => libc::ENOTDIR,
            AccessDenied => libc::EACCES,
            TooManySymlinks => libc::ELOOP,
            ResourceExhausted(errno) | Io(errno) => errno,
            InvalidState => libc::EBADF,
        }
    }

    /// The negative code stored as result on a handle.
    pub fn code(&self) -> i32 {
        -self.errno()
    }

    /// Stable identifier of the class.
    pub fn name(&self) -> &'static str {
        match self {
            NotFound => "not-found",
            NotADirectory => "not-a-directory",
            AccessDenied => "access-denied",
            TooManySymlinks => "too-many-symlinks",
            ResourceExhausted(_) => "resource-exhausted",
            InvalidState => "invalid-state",
            Io(_) => "io-error",
        }
    }

    /// Only exhausted resources may go away by waiting, nothing is retried internally.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ResourceExhausted(_))
    }
}

impl From<io::Error> for DirError {
    fn from(err: io::Error) -> Self {
        match err.raw_os_error() {
            Some(errno) => DirError::from_errno(errno),
            None => match err.kind() {
                io::ErrorKind::NotFound => NotFound,
                io::ErrorKind::PermissionDenied => AccessDenied,
                _ => Io(libc::EIO),
            },
        }
    }
}

impl From<DirError> for io::Error {
    fn from(err: DirError) -> Self {
        io::Error::from_raw_os_error(err.errno())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn classify() {
        assert_eq!(DirError::from_errno(libc::ENOENT), NotFound);
        assert_eq!(DirError::from_errno(libc::ENOTDIR), NotADirectory);
        assert_eq!(DirError::from_errno(libc::EACCES), AccessDenied);
        assert_eq!(DirError::from_errno(libc::EPERM), AccessDenied);
        assert_eq!(DirError::from_errno(libc::ELOOP), TooManySymlinks);
        assert_eq!(
            DirError::from_errno(libc::EMFILE),
            ResourceExhausted(libc::EMFILE)
        );
        assert_eq!(
            DirError::from_errno(libc::ENFILE),
            ResourceExhausted(libc::ENFILE)
        );
        assert_eq!(DirError::from_errno(libc::EIO), Io(libc::EIO));
    }

    #[test]
    fn codes_are_negative_errno() {
        assert_eq!(NotFound.code(), -libc::ENOENT);
        assert_eq!(NotADirectory.code(), -libc::ENOTDIR);
        assert_eq!(InvalidState.code(), -libc::EBADF);
        assert_eq!(ResourceExhausted(libc::EMFILE).errno(), libc::EMFILE);
        assert_eq!(Io(libc::EINVAL).code(), -libc::EINVAL);
    }

    #[test]
    fn only_exhaustion_is_retryable() {
        assert!(ResourceExhausted(libc::EMFILE).is_retryable());
        assert!(!NotADirectory.is_retryable());
        assert!(!NotFound.is_retryable());
        assert!(!InvalidState.is_retryable());
    }

    #[test]
    fn io_error_conversion() {
        let err = io::Error::from_raw_os_error(libc::ENOTDIR);
        assert_eq!(DirError::from(err), NotADirectory);

        let err = io::Error::new(io::ErrorKind::Other, "no errno");
        assert_eq!(DirError::from(err), Io(libc::EIO));

        let err: io::Error = TooManySymlinks.into();
        assert_eq!(err.raw_os_error(), Some(libc::ELOOP));
    }

    #[test]
    fn names_are_distinct() {
        let all = [
            NotFound,
            NotADirectory,
            AccessDenied,
            TooManySymlinks,
            ResourceExhausted(libc::EMFILE),
            InvalidState,
            Io(libc::EIO),
        ];
        let mut names: Vec<_> = all.iter().map(DirError::name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), all.len());
    }
}
