//! Subtree migration with collision renaming.
//!
//! Moves `src` to `dst` without ever overwriting:
//! - missing target: plain rename (the whole subtree travels with it);
//! - directory onto directory: merged, children migrated one by one;
//! - anything else that collides: placed at the next free `name_N`.
//!
//! Failures stop the migration where it is; entries already moved stay moved.

use tracing::{debug, info};

use crate::errors::{FsError, FsResult};
use crate::storage::{FileInfo, Storage, join_path, split_path};
use crate::volume::VolumePath;

use super::duplicate::unique_destination;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    /// Entries moved under their own name.
    pub moved: usize,
    /// Entries moved under a suffixed name: (source, final destination).
    pub renamed: Vec<(String, String)>,
    /// Directories merged into an existing directory.
    pub merged: usize,
}

/// Move the subtree at `src` to `dst`. A missing `src` is a successful no-op.
pub fn migrate(storage: &dyn Storage, src: &str, dst: &str) -> FsResult<MigrationReport> {
    let info = match storage.stat(src) {
        Ok(info) => info,
        Err(FsError::NotExist) => {
            debug!(src, "migrate: nothing to move");
            return Ok(MigrationReport::default());
        }
        Err(e) => return Err(e),
    };
    // Compare canonical forms so `/any/d` and `/ext/d` count as the same entry.
    let (src_id, dst_id) = (storage.canonical_path(src), storage.canonical_path(dst));
    let inside = dst_id
        .strip_prefix(src_id.as_str())
        .is_some_and(|rest| rest.starts_with('/') || src_id == "/");
    if src_id == dst_id || (info.is_dir() && inside) {
        return Err(FsError::InvalidParameter);
    }

    let mut report = MigrationReport::default();
    if VolumePath::classify(src).is_volume() {
        // A volume root cannot be moved itself; its contents can.
        match storage.stat(dst) {
            Ok(target) if target.is_dir() => {}
            Ok(_) => return Err(FsError::Exist),
            Err(FsError::NotExist) => storage.mkdir(dst)?,
            Err(e) => return Err(e),
        }
        merge_dir(storage, src, dst, &mut report)?;
        report.merged += 1;
    } else {
        migrate_entry(storage, src, dst, info, &mut report)?;
    }

    info!(
        src,
        dst,
        moved = report.moved,
        renamed = report.renamed.len(),
        merged = report.merged,
        "migration complete"
    );
    Ok(report)
}

fn migrate_entry(
    storage: &dyn Storage,
    src: &str,
    dst: &str,
    info: FileInfo,
    report: &mut MigrationReport,
) -> FsResult<()> {
    match storage.stat(dst) {
        Err(FsError::NotExist) => {
            storage.rename(src, dst)?;
            report.moved += 1;
        }
        Ok(target) if target.is_dir() && info.is_dir() => {
            merge_dir(storage, src, dst, report)?;
            storage.remove(src)?;
            report.merged += 1;
        }
        Ok(_) => {
            let (parent, name) = split_path(dst);
            let target = unique_destination(storage, parent, name, info.is_dir())?;
            debug!(src, dst = %target, "migrate: target taken, renaming");
            storage.rename(src, &target)?;
            report.renamed.push((src.to_string(), target));
        }
        Err(e) => return Err(e),
    }
    Ok(())
}

fn merge_dir(
    storage: &dyn Storage,
    src: &str,
    dst: &str,
    report: &mut MigrationReport,
) -> FsResult<()> {
    // Snapshot the children first; moving them invalidates a live cursor.
    let children = {
        let mut cursor = storage.open_dir(src)?;
        let mut children = Vec::new();
        while let Some(entry) = cursor.next_entry()? {
            children.push(entry);
        }
        children
    };

    for entry in children {
        migrate_entry(
            storage,
            &join_path(src, &entry.name),
            &join_path(dst, &entry.name),
            entry.info,
            report,
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::LocalStorage;
    use assert_fs::prelude::*;

    fn setup() -> (assert_fs::TempDir, LocalStorage) {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("int").create_dir_all().unwrap();
        temp.child("ext").create_dir_all().unwrap();
        let storage = LocalStorage::new(temp.child("int").path(), temp.child("ext").path());
        (temp, storage)
    }

    #[test]
    fn missing_source_is_noop() {
        let (_temp, storage) = setup();
        let report = migrate(&storage, "/int/ghost", "/ext/ghost").unwrap();
        assert_eq!(report, MigrationReport::default());
    }

    #[test]
    fn volume_root_contents_move_and_root_stays() {
        let (temp, storage) = setup();
        temp.child("int/a.txt").write_str("a").unwrap();
        temp.child("ext/migrated/a.txt").write_str("old").unwrap();

        let report = migrate(&storage, "/int", "/ext/migrated").unwrap();
        assert_eq!(report.renamed.len(), 1);
        assert!(temp.child("int").path().is_dir());
        assert!(!temp.child("int/a.txt").path().exists());
        temp.child("ext/migrated/a.txt").assert("old");
        temp.child("ext/migrated/a_1.txt").assert("a");
    }

    #[test]
    fn aliased_self_move_rejected() {
        let (temp, storage) = setup();
        temp.child("ext/d/a.txt").write_str("a").unwrap();
        assert_eq!(
            migrate(&storage, "/any/d", "/ext/d").unwrap_err(),
            FsError::InvalidParameter
        );
        assert_eq!(
            migrate(&storage, "/ext/d", "/any/d/inner").unwrap_err(),
            FsError::InvalidParameter
        );
        temp.child("ext/d/a.txt").assert("a");
    }

    #[test]
    fn into_own_subtree_rejected() {
        let (temp, storage) = setup();
        temp.child("ext/d").create_dir_all().unwrap();
        assert_eq!(
            migrate(&storage, "/ext/d", "/ext/d/inner").unwrap_err(),
            FsError::InvalidParameter
        );
    }
}
