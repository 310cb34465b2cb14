//! Typed error definitions for storage_console.
//!
//! `FsError` is the flat failure taxonomy every storage primitive reports.
//! `CommandError` is what a command handler hands back to the dispatcher, which
//! decides how it is rendered on the console.

use std::io;
use thiserror::Error;

/// Failure reasons reported by the storage service. Success is `Ok(_)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FsError {
    #[error("filesystem not ready")]
    NotReady,

    #[error("file/dir already exist")]
    Exist,

    #[error("file/dir not exist")]
    NotExist,

    #[error("invalid parameter")]
    InvalidParameter,

    #[error("access denied")]
    Denied,

    #[error("invalid name/path")]
    InvalidName,

    #[error("internal error")]
    Internal,

    #[error("function not implemented")]
    NotImplemented,

    #[error("file is already open")]
    AlreadyOpen,
}

impl FsError {
    /// Stable short code, handy for structured log fields.
    pub fn code(&self) -> &'static str {
        match self {
            FsError::NotReady => "not_ready",
            FsError::Exist => "exist",
            FsError::NotExist => "not_exist",
            FsError::InvalidParameter => "invalid_parameter",
            FsError::Denied => "denied",
            FsError::InvalidName => "invalid_name",
            FsError::Internal => "internal",
            FsError::NotImplemented => "not_implemented",
            FsError::AlreadyOpen => "already_open",
        }
    }
}

pub type FsResult<T> = Result<T, FsError>;

/// Outcome of a failed command invocation.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Missing or malformed arguments; rendered as the usage block.
    #[error("invalid arguments")]
    Usage,

    /// A storage primitive failed.
    #[error("Storage error: {0}")]
    Storage(#[from] FsError),

    /// A write stored fewer bytes than the protocol expected.
    #[error("Storage error: short write ({written} of {expected} bytes)")]
    ShortWrite { written: usize, expected: usize },

    /// The console transport itself failed; the session cannot continue.
    #[error("console I/O failed: {0}")]
    Console(#[from] io::Error),
}

impl CommandError {
    /// Console failures end the session; everything else only ends the command.
    pub fn is_fatal(&self) -> bool {
        matches!(self, CommandError::Console(_))
    }
}
