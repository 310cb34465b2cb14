//! Storage service contract.
//!
//! Command handlers only see these traits. Every fallible primitive returns
//! [`FsResult`]; handles are released when dropped, so a handler that returns
//! early (usage error, storage error) still closes whatever it opened.

mod helpers;
mod local;

pub use helpers::{fs_error_from_io, io_error_to_fs};
pub use local::LocalStorage;

use crate::errors::FsResult;

/// Longest entry name a directory cursor reports, in bytes.
pub const MAX_NAME_LENGTH: usize = 254;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    Read,
    Write,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Fail with `NotExist` when the file is missing.
    OpenExisting,
    /// Create when missing; writes go to the end.
    OpenAppend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileInfo {
    pub kind: EntryKind,
    /// Byte length; meaningful for files only.
    pub size: u64,
}

impl FileInfo {
    pub fn file(size: u64) -> Self {
        Self { kind: EntryKind::File, size }
    }

    pub fn directory() -> Self {
        Self { kind: EntryKind::Directory, size: 0 }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub info: FileInfo,
}

/// Capacity of one volume.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsInfo {
    pub fs_type: String,
    pub total_space: u64,
    pub free_space: u64,
}

/// Identification block reported by an SD card controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardId {
    pub manufacturer_id: u8,
    pub oem_id: String,
    pub product_name: String,
    pub revision_major: u8,
    pub revision_minor: u8,
    pub serial_number: u32,
    pub manufacturing_month: u8,
    pub manufacturing_year: u16,
}

/// Removable card summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdInfo {
    pub label: String,
    pub fs_type: String,
    pub kb_total: u64,
    pub kb_free: u64,
    pub card: Option<CardId>,
}

/// An open file. Closed on drop.
pub trait FileHandle {
    /// Read up to `buf.len()` bytes; `Ok(0)` at end of file.
    fn read(&mut self, buf: &mut [u8]) -> FsResult<usize>;

    /// Write `buf`, returning how many bytes were actually stored.
    fn write(&mut self, buf: &[u8]) -> FsResult<usize>;

    fn size(&self) -> FsResult<u64>;
}

/// An open directory cursor. Closed on drop.
pub trait DirHandle {
    /// Next entry of this directory, `Ok(None)` once exhausted.
    fn next_entry(&mut self) -> FsResult<Option<DirEntry>>;
}

pub trait Storage {
    fn open_file(
        &self,
        path: &str,
        access: AccessMode,
        mode: OpenMode,
    ) -> FsResult<Box<dyn FileHandle + '_>>;

    fn open_dir(&self, path: &str) -> FsResult<Box<dyn DirHandle + '_>>;

    fn stat(&self, path: &str) -> FsResult<FileInfo>;

    /// `path` with volume aliases resolved and separators collapsed. Two
    /// paths name the same entry when their canonical forms are equal.
    fn canonical_path(&self, path: &str) -> String {
        path.to_string()
    }

    fn exists(&self, path: &str) -> bool {
        self.stat(path).is_ok()
    }

    /// Capacity of the volume holding `path`.
    fn fs_info(&self, path: &str) -> FsResult<FsInfo>;

    fn sd_info(&self) -> FsResult<SdInfo>;

    /// Name shown as the internal volume label.
    fn device_name(&self) -> Option<String> {
        None
    }

    /// Erase the removable card.
    fn format_external(&self) -> FsResult<()>;

    /// Create one directory level.
    fn mkdir(&self, path: &str) -> FsResult<()>;

    /// Copy a file or a directory tree; never overwrites.
    fn copy(&self, old_path: &str, new_path: &str) -> FsResult<()>;

    /// Move a file or directory; never overwrites.
    fn rename(&self, old_path: &str, new_path: &str) -> FsResult<()>;

    /// Remove a file or an empty directory.
    fn remove(&self, path: &str) -> FsResult<()>;

    /// Last modification time in Unix seconds.
    fn timestamp(&self, path: &str) -> FsResult<u32>;

    /// Wipe both volumes.
    fn factory_reset(&self) -> FsResult<()>;
}

/// Join a virtual directory path and an entry name.
pub fn join_path(dir: &str, name: &str) -> String {
    if dir.ends_with('/') {
        format!("{dir}{name}")
    } else {
        format!("{dir}/{name}")
    }
}

/// Split a virtual path into its parent directory and final name.
pub fn split_path(path: &str) -> (&str, &str) {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(0) => ("/", &trimmed[1..]),
        Some(idx) => (&trimmed[..idx], &trimmed[idx + 1..]),
        None => ("", trimmed),
    }
}
