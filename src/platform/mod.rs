//! Owner-only file helpers for the config file, the log file and the volume
//! roots. The OS modules only decide how "private" is expressed; the write
//! sequence lives here.

#[cfg(unix)]
mod unix;
#[cfg(not(unix))]
mod windows;

#[cfg(unix)]
use unix as os;
#[cfg(not(unix))]
use windows as os;

use anyhow::{Context, Result, bail};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub use os::restrict_dir;

/// Open `path` for appending, creating it owner-only when missing.
/// An existing file keeps its mode.
pub fn open_private_append(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut opts = OpenOptions::new();
    opts.create(true).append(true);
    os::private_on_create(&mut opts);
    opts.open(path)
}

/// Create `path` with `contents`, owner-only. The bytes land in a hidden
/// sibling first and are renamed into place, so readers never see a partial
/// file. Fails when `path` already exists.
pub fn write_private_new(path: &Path, contents: &[u8]) -> Result<()> {
    if path.exists() {
        bail!("refusing to overwrite '{}'", path.display());
    }
    let parent = path
        .parent()
        .with_context(|| format!("'{}' has no parent directory", path.display()))?;
    fs::create_dir_all(parent).with_context(|| format!("create '{}'", parent.display()))?;

    let staging = staging_name(path);
    let mut opts = OpenOptions::new();
    opts.write(true).create_new(true);
    os::private_on_create(&mut opts);
    let mut file = opts
        .open(&staging)
        .with_context(|| format!("create '{}'", staging.display()))?;
    let written = file.write_all(contents).and_then(|()| file.sync_all());
    drop(file);

    if let Err(e) = written.and_then(|()| fs::rename(&staging, path)) {
        let _ = fs::remove_file(&staging);
        return Err(e).with_context(|| format!("write '{}'", path.display()));
    }
    os::sync_dir(parent).with_context(|| format!("sync '{}'", parent.display()))?;
    Ok(())
}

fn staging_name(target: &Path) -> PathBuf {
    let stamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let name = format!(".storage_console.{}.{stamp}.part", std::process::id());
    target.parent().unwrap_or_else(|| Path::new(".")).join(name)
}
