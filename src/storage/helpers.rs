//! I/O error translation.
//!
//! The host filesystem reports `io::Error`; the storage contract speaks
//! `FsError`. Translation goes by raw OS code first (more precise on Unix), then
//! by `io::ErrorKind`. The adapter form logs the operation, path and a short
//! hint before collapsing the error, so the detail survives in the trace.
//!
//! Usage:
//!   fs::create_dir(&host).map_err(io_error_to_fs("create directory", &host))?;

use std::io;
use std::path::Path;
use tracing::debug;

use crate::errors::FsError;

#[cfg(unix)]
use libc;

/// Map a raw OS error code, when it is one we recognize.
#[cfg(unix)]
fn from_os_code(code: i32) -> Option<FsError> {
    let err = match code {
        libc::EACCES | libc::EPERM | libc::EROFS | libc::EISDIR | libc::ENOSPC => FsError::Denied,
        libc::ENOTEMPTY => FsError::Denied,
        libc::ENOENT | libc::ENOTDIR => FsError::NotExist,
        libc::EEXIST => FsError::Exist,
        libc::ENAMETOOLONG | libc::ELOOP => FsError::InvalidName,
        libc::EINVAL => FsError::InvalidParameter,
        libc::EBUSY | libc::ETXTBSY => FsError::AlreadyOpen,
        libc::EIO => FsError::Internal,
        libc::ENODEV | libc::ENXIO => FsError::NotReady,
        _ => return None,
    };
    Some(err)
}

#[cfg(windows)]
fn from_os_code(code: i32) -> Option<FsError> {
    let err = match code {
        5 | 19 | 112 => FsError::Denied,   // ACCESS_DENIED, WRITE_PROTECT, DISK_FULL
        2 | 3 => FsError::NotExist,        // FILE/PATH NOT FOUND
        80 | 183 => FsError::Exist,        // FILE_EXISTS, ALREADY_EXISTS
        123 | 206 => FsError::InvalidName, // INVALID_NAME, FILENAME_EXCED_RANGE
        32 | 33 => FsError::AlreadyOpen,   // SHARING/LOCK VIOLATION
        21 => FsError::NotReady,           // NOT_READY
        145 => FsError::Denied,            // DIR_NOT_EMPTY
        _ => return None,
    };
    Some(err)
}

#[cfg(not(any(unix, windows)))]
fn from_os_code(_code: i32) -> Option<FsError> {
    None
}

/// Translate an `io::Error` into the storage failure taxonomy.
pub fn fs_error_from_io(e: &io::Error) -> FsError {
    if let Some(mapped) = e.raw_os_error().and_then(from_os_code) {
        return mapped;
    }
    match e.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory => FsError::NotExist,
        io::ErrorKind::AlreadyExists => FsError::Exist,
        io::ErrorKind::PermissionDenied
        | io::ErrorKind::ReadOnlyFilesystem
        | io::ErrorKind::IsADirectory
        | io::ErrorKind::DirectoryNotEmpty
        | io::ErrorKind::StorageFull => FsError::Denied,
        io::ErrorKind::InvalidInput => FsError::InvalidParameter,
        io::ErrorKind::WouldBlock | io::ErrorKind::ResourceBusy => FsError::AlreadyOpen,
        _ => FsError::Internal,
    }
}

fn hint(err: FsError) -> &'static str {
    match err {
        FsError::Denied => "check ownership, free space and write permissions",
        FsError::NotExist => "verify the path exists",
        FsError::Exist => "pick a unique name or remove the target",
        FsError::InvalidName => "shorten path segments or fix the name",
        FsError::AlreadyOpen => "another process is using the file",
        FsError::NotReady => "volume not mounted",
        _ => "",
    }
}

/// Adapter for `.map_err(...)`: logs op/path/hint, returns the mapped `FsError`.
pub fn io_error_to_fs<'a>(op: &'a str, path: &'a Path) -> impl FnOnce(io::Error) -> FsError + 'a {
    move |e: io::Error| {
        let mapped = fs_error_from_io(&e);
        debug!(
            op,
            path = %path.display(),
            error = %e,
            code = mapped.code(),
            hint = hint(mapped),
            "storage primitive failed"
        );
        mapped
    }
}

/// True when a rename failed only because source and target live on
/// different host filesystems.
pub(super) fn is_cross_device(e: &io::Error) -> bool {
    #[cfg(unix)]
    {
        if e.raw_os_error() == Some(libc::EXDEV) {
            return true;
        }
    }
    #[cfg(windows)]
    {
        if e.raw_os_error() == Some(17) {
            return true;
        }
    }
    e.kind() == io::ErrorKind::CrossesDevices
}
