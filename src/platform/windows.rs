//! No POSIX modes here; files inherit the directory ACLs.

use std::fs::OpenOptions;
use std::io;
use std::path::Path;

pub(super) fn private_on_create(_opts: &mut OpenOptions) {}

pub fn restrict_dir(_path: &Path) -> io::Result<()> {
    Ok(())
}

/// Directory handles cannot be synced on Windows; rename is already durable.
pub(super) fn sync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}
