//! Depth-first directory walker over the storage contract.
//!
//! Pre-order: a directory is yielded before its children. Entry order within a
//! directory is whatever the storage cursor hands out. Each open cursor lives
//! on an explicit stack and is dropped as soon as it is exhausted.

use crate::errors::FsResult;
use crate::storage::{DirHandle, FileInfo, Storage, join_path};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkEntry {
    /// Full virtual path of the entry.
    pub path: String,
    pub name: String,
    pub info: FileInfo,
}

pub struct DirWalk<'s> {
    storage: &'s dyn Storage,
    stack: Vec<(String, Box<dyn DirHandle + 's>)>,
    recursive: bool,
    failed: bool,
}

impl<'s> DirWalk<'s> {
    /// Open a walk rooted at `path`. Fails without yielding anything if the
    /// root cursor cannot be opened.
    pub fn open(storage: &'s dyn Storage, path: &str) -> FsResult<Self> {
        let root = storage.open_dir(path)?;
        Ok(Self {
            storage,
            stack: vec![(path.to_string(), root)],
            recursive: true,
            failed: false,
        })
    }

    /// Stay in the root directory.
    pub fn flat(mut self) -> Self {
        self.recursive = false;
        self
    }
}

impl Iterator for DirWalk<'_> {
    type Item = FsResult<WalkEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            let (dir, cursor) = self.stack.last_mut()?;
            let entry = match cursor.next_entry() {
                Ok(Some(entry)) => entry,
                Ok(None) => {
                    self.stack.pop();
                    continue;
                }
                Err(e) => {
                    self.failed = true;
                    self.stack.clear();
                    return Some(Err(e));
                }
            };

            let path = join_path(dir, &entry.name);
            if entry.info.is_dir() && self.recursive {
                match self.storage.open_dir(&path) {
                    Ok(child) => self.stack.push((path.clone(), child)),
                    Err(e) => {
                        self.failed = true;
                        self.stack.clear();
                        return Some(Err(e));
                    }
                }
            }
            return Some(Ok(WalkEntry {
                path,
                name: entry.name,
                info: entry.info,
            }));
        }
    }
}
