//! Storage backed by two host directories.
//!
//! `/int` maps to `int_root`; `/ext` and `/any` map to `ext_root`. Virtual paths
//! are resolved component by component; `.`/`..` and anything outside a volume
//! prefix are rejected as invalid names rather than normalized.

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use filetime::FileTime;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::errors::{FsError, FsResult};
use crate::volume::{ANY_PATH_PREFIX, EXT_PATH_PREFIX, INT_PATH_PREFIX};

use super::helpers::{io_error_to_fs, is_cross_device};
use super::{
    AccessMode, DirEntry, DirHandle, FileHandle, FileInfo, FsInfo, MAX_NAME_LENGTH, OpenMode,
    SdInfo, Storage,
};

const LOCAL_FS_TYPE: &str = "LocalFS";

#[derive(Debug, Clone)]
pub struct LocalStorage {
    int_root: PathBuf,
    ext_root: PathBuf,
    ext_label: String,
    device_name: Option<String>,
}

impl LocalStorage {
    pub fn new(int_root: impl Into<PathBuf>, ext_root: impl Into<PathBuf>) -> Self {
        Self {
            int_root: int_root.into(),
            ext_root: ext_root.into(),
            ext_label: "SD".to_string(),
            device_name: None,
        }
    }

    pub fn with_ext_label(mut self, label: impl Into<String>) -> Self {
        self.ext_label = label.into();
        self
    }

    pub fn with_device_name(mut self, name: impl Into<String>) -> Self {
        self.device_name = Some(name.into());
        self
    }

    pub fn int_root(&self) -> &Path {
        &self.int_root
    }

    pub fn ext_root(&self) -> &Path {
        &self.ext_root
    }

    /// Split a virtual path into its volume root and the host path it names.
    fn resolve(&self, path: &str) -> FsResult<(&Path, PathBuf)> {
        let (root, rest) = [
            (INT_PATH_PREFIX, &self.int_root),
            (EXT_PATH_PREFIX, &self.ext_root),
            (ANY_PATH_PREFIX, &self.ext_root),
        ]
        .into_iter()
        .find_map(|(prefix, root)| {
            let rest = path.strip_prefix(prefix)?;
            (rest.is_empty() || rest.starts_with('/')).then_some((root, rest))
        })
        .ok_or(FsError::InvalidName)?;

        let mut host = root.clone();
        for component in rest.split('/').filter(|c| !c.is_empty()) {
            if component == "." || component == ".." || component.contains('\\') {
                return Err(FsError::InvalidName);
            }
            host.push(component);
        }
        Ok((root.as_path(), host))
    }

    fn ensure_volume(root: &Path) -> FsResult<()> {
        if root.is_dir() {
            Ok(())
        } else {
            Err(FsError::NotReady)
        }
    }
}

impl Storage for LocalStorage {
    fn open_file(
        &self,
        path: &str,
        access: AccessMode,
        mode: OpenMode,
    ) -> FsResult<Box<dyn FileHandle + '_>> {
        let (root, host) = self.resolve(path)?;
        Self::ensure_volume(root)?;
        if host == root || host.is_dir() {
            return Err(FsError::Denied);
        }

        let mut options = OpenOptions::new();
        match access {
            AccessMode::Read => options.read(true),
            AccessMode::Write => options.write(true),
        };
        if mode == OpenMode::OpenAppend {
            options.create(true).append(true);
        }
        let file = options
            .open(&host)
            .map_err(io_error_to_fs("open file", &host))?;
        debug!(path, ?access, ?mode, "file opened");
        Ok(Box::new(LocalFile { file, host }))
    }

    fn open_dir(&self, path: &str) -> FsResult<Box<dyn DirHandle + '_>> {
        let (root, host) = self.resolve(path)?;
        Self::ensure_volume(root)?;
        let meta = fs::metadata(&host).map_err(io_error_to_fs("stat directory", &host))?;
        if !meta.is_dir() {
            return Err(FsError::InvalidParameter);
        }

        let mut entries = Vec::new();
        for dirent in fs::read_dir(&host).map_err(io_error_to_fs("read directory", &host))? {
            let dirent = dirent.map_err(io_error_to_fs("read directory", &host))?;
            let name = dirent.file_name().to_string_lossy().into_owned();
            if name.len() > MAX_NAME_LENGTH {
                warn!(dir = %host.display(), "skipping entry with over-long name");
                continue;
            }
            // Follow symlinks so a linked file reports its target's size.
            let meta = match fs::metadata(dirent.path()) {
                Ok(m) => m,
                Err(e) => {
                    debug!(entry = %dirent.path().display(), error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            let info = if meta.is_dir() {
                FileInfo::directory()
            } else {
                FileInfo::file(meta.len())
            };
            entries.push(DirEntry { name, info });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        entries.reverse();
        Ok(Box::new(LocalDir { entries }))
    }

    fn stat(&self, path: &str) -> FsResult<FileInfo> {
        let (root, host) = self.resolve(path)?;
        Self::ensure_volume(root)?;
        let meta = fs::metadata(&host).map_err(io_error_to_fs("stat", &host))?;
        Ok(if meta.is_dir() {
            FileInfo::directory()
        } else {
            FileInfo::file(meta.len())
        })
    }

    fn canonical_path(&self, path: &str) -> String {
        let path = match path.strip_prefix(ANY_PATH_PREFIX) {
            Some(rest) if rest.is_empty() || rest.starts_with('/') => {
                format!("{EXT_PATH_PREFIX}{rest}")
            }
            _ => path.to_string(),
        };
        let mut canonical = String::with_capacity(path.len());
        for component in path.split('/').filter(|c| !c.is_empty()) {
            canonical.push('/');
            canonical.push_str(component);
        }
        if canonical.is_empty() {
            canonical.push('/');
        }
        canonical
    }

    fn fs_info(&self, path: &str) -> FsResult<FsInfo> {
        let (root, _) = self.resolve(path)?;
        Self::ensure_volume(root)?;
        let total_space = fs2::total_space(root).map_err(io_error_to_fs("query capacity", root))?;
        let free_space =
            fs2::available_space(root).map_err(io_error_to_fs("query free space", root))?;
        Ok(FsInfo {
            fs_type: LOCAL_FS_TYPE.to_string(),
            total_space,
            free_space,
        })
    }

    fn sd_info(&self) -> FsResult<SdInfo> {
        let info = self.fs_info(EXT_PATH_PREFIX)?;
        Ok(SdInfo {
            label: self.ext_label.clone(),
            fs_type: info.fs_type,
            kb_total: info.total_space / 1024,
            kb_free: info.free_space / 1024,
            card: None,
        })
    }

    fn device_name(&self) -> Option<String> {
        self.device_name.clone()
    }

    fn format_external(&self) -> FsResult<()> {
        Self::ensure_volume(&self.ext_root)?;
        clear_dir(&self.ext_root)?;
        info!(root = %self.ext_root.display(), "external volume formatted");
        Ok(())
    }

    fn mkdir(&self, path: &str) -> FsResult<()> {
        let (root, host) = self.resolve(path)?;
        Self::ensure_volume(root)?;
        fs::create_dir(&host).map_err(io_error_to_fs("create directory", &host))
    }

    fn copy(&self, old_path: &str, new_path: &str) -> FsResult<()> {
        let (old_root, src) = self.resolve(old_path)?;
        let (new_root, dst) = self.resolve(new_path)?;
        Self::ensure_volume(old_root)?;
        Self::ensure_volume(new_root)?;
        if dst.exists() {
            return Err(FsError::Exist);
        }
        let meta = fs::metadata(&src).map_err(io_error_to_fs("stat copy source", &src))?;
        if meta.is_dir() {
            if dst.starts_with(&src) {
                return Err(FsError::InvalidParameter);
            }
            copy_tree(&src, &dst)
        } else {
            fs::copy(&src, &dst)
                .map(|_| ())
                .map_err(io_error_to_fs("copy file", &dst))
        }
    }

    fn rename(&self, old_path: &str, new_path: &str) -> FsResult<()> {
        let (old_root, src) = self.resolve(old_path)?;
        let (new_root, dst) = self.resolve(new_path)?;
        Self::ensure_volume(old_root)?;
        Self::ensure_volume(new_root)?;
        if src == old_root {
            return Err(FsError::Denied);
        }
        if dst.exists() {
            return Err(FsError::Exist);
        }
        let meta = fs::metadata(&src).map_err(io_error_to_fs("stat rename source", &src))?;
        if meta.is_dir() && dst.starts_with(&src) {
            return Err(FsError::InvalidParameter);
        }

        match fs::rename(&src, &dst) {
            Ok(()) => Ok(()),
            Err(e) if is_cross_device(&e) => {
                warn!(src = %src.display(), dst = %dst.display(), "rename crosses filesystems, using copy+remove");
                if meta.is_dir() {
                    copy_tree(&src, &dst)?;
                    fs::remove_dir_all(&src)
                        .map_err(io_error_to_fs("remove moved directory", &src))
                } else {
                    fs::copy(&src, &dst).map_err(io_error_to_fs("copy file", &dst))?;
                    fs::remove_file(&src).map_err(io_error_to_fs("remove moved file", &src))
                }
            }
            Err(e) => Err(io_error_to_fs("rename", &src)(e)),
        }
    }

    fn remove(&self, path: &str) -> FsResult<()> {
        let (root, host) = self.resolve(path)?;
        Self::ensure_volume(root)?;
        if host == root {
            return Err(FsError::Denied);
        }
        let meta = fs::symlink_metadata(&host).map_err(io_error_to_fs("stat", &host))?;
        if meta.is_dir() {
            fs::remove_dir(&host).map_err(io_error_to_fs("remove directory", &host))
        } else {
            fs::remove_file(&host).map_err(io_error_to_fs("remove file", &host))
        }
    }

    fn timestamp(&self, path: &str) -> FsResult<u32> {
        let (root, host) = self.resolve(path)?;
        Self::ensure_volume(root)?;
        let meta = fs::metadata(&host).map_err(io_error_to_fs("stat", &host))?;
        let seconds = FileTime::from_last_modification_time(&meta).unix_seconds();
        u32::try_from(seconds).map_err(|_| FsError::Internal)
    }

    fn factory_reset(&self) -> FsResult<()> {
        for root in [&self.int_root, &self.ext_root] {
            Self::ensure_volume(root)?;
            clear_dir(root)?;
        }
        info!("both volumes wiped");
        Ok(())
    }
}

struct LocalFile {
    file: File,
    host: PathBuf,
}

impl FileHandle for LocalFile {
    fn read(&mut self, buf: &mut [u8]) -> FsResult<usize> {
        self.file
            .read(buf)
            .map_err(io_error_to_fs("read file", &self.host))
    }

    fn write(&mut self, buf: &[u8]) -> FsResult<usize> {
        let mut written = 0;
        while written < buf.len() {
            match self.file.write(&buf[written..]) {
                Ok(0) => break,
                Ok(n) => written += n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
                Err(e) if written > 0 => {
                    debug!(path = %self.host.display(), error = %e, written, "short write");
                    break;
                }
                Err(e) => return Err(io_error_to_fs("write file", &self.host)(e)),
            }
        }
        Ok(written)
    }

    fn size(&self) -> FsResult<u64> {
        self.file
            .metadata()
            .map(|m| m.len())
            .map_err(io_error_to_fs("stat open file", &self.host))
    }
}

/// Entries are held sorted in reverse so `pop` yields them in name order.
struct LocalDir {
    entries: Vec<DirEntry>,
}

impl DirHandle for LocalDir {
    fn next_entry(&mut self) -> FsResult<Option<DirEntry>> {
        Ok(self.entries.pop())
    }
}

/// Remove every child of `dir`, keeping `dir` itself.
fn clear_dir(dir: &Path) -> FsResult<()> {
    for dirent in fs::read_dir(dir).map_err(io_error_to_fs("read directory", dir))? {
        let path = dirent.map_err(io_error_to_fs("read directory", dir))?.path();
        let meta = fs::symlink_metadata(&path).map_err(io_error_to_fs("stat", &path))?;
        if meta.is_dir() {
            fs::remove_dir_all(&path).map_err(io_error_to_fs("remove directory", &path))?;
        } else {
            fs::remove_file(&path).map_err(io_error_to_fs("remove file", &path))?;
        }
    }
    Ok(())
}

/// Recursively copy `src` to a not-yet-existing `dst`.
fn copy_tree(src: &Path, dst: &Path) -> FsResult<()> {
    fs::create_dir(dst).map_err(io_error_to_fs("create directory", dst))?;
    for entry in WalkDir::new(src).min_depth(1).follow_links(false) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(src).to_path_buf();
            let io = e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("walk failed"));
            io_error_to_fs("walk copy source", &path)(io)
        })?;
        let rel = entry.path().strip_prefix(src).map_err(|_| FsError::Internal)?;
        let target = dst.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir(&target).map_err(io_error_to_fs("create directory", &target))?;
        } else {
            fs::copy(entry.path(), &target).map_err(io_error_to_fs("copy file", &target))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    fn storage(temp: &assert_fs::TempDir) -> LocalStorage {
        let int = temp.child("int");
        let ext = temp.child("ext");
        int.create_dir_all().unwrap();
        ext.create_dir_all().unwrap();
        LocalStorage::new(int.path(), ext.path())
    }

    #[test]
    fn resolves_volume_prefixes_exactly() {
        let temp = assert_fs::TempDir::new().unwrap();
        let s = storage(&temp);
        assert_eq!(s.resolve("/int").unwrap().1, temp.child("int").path());
        assert_eq!(s.resolve("/any/a").unwrap().1, temp.child("ext").path().join("a"));
        assert_eq!(s.resolve("/external").unwrap_err(), FsError::InvalidName);
        assert_eq!(s.resolve("/ext/../int").unwrap_err(), FsError::InvalidName);
        assert_eq!(s.resolve("relative").unwrap_err(), FsError::InvalidName);
    }

    #[test]
    fn any_is_canonically_ext() {
        let temp = assert_fs::TempDir::new().unwrap();
        let storage = storage(&temp);
        assert_eq!(storage.canonical_path("/any/d"), "/ext/d");
        assert_eq!(storage.canonical_path("/any"), "/ext");
        assert_eq!(storage.canonical_path("/ext//d/"), "/ext/d");
        assert_eq!(storage.canonical_path("/anything"), "/anything");
        assert_eq!(storage.canonical_path("/int/a"), "/int/a");
    }

    #[test]
    fn directory_cursor_is_sorted() {
        let temp = assert_fs::TempDir::new().unwrap();
        let s = storage(&temp);
        temp.child("ext/b.txt").write_str("bb").unwrap();
        temp.child("ext/a").create_dir_all().unwrap();
        let mut dir = s.open_dir("/ext").unwrap();
        let first = dir.next_entry().unwrap().unwrap();
        assert_eq!(first.name, "a");
        assert!(first.info.is_dir());
        let second = dir.next_entry().unwrap().unwrap();
        assert_eq!(second.name, "b.txt");
        assert_eq!(second.info.size, 2);
        assert!(dir.next_entry().unwrap().is_none());
    }

    #[test]
    fn rename_and_copy_never_overwrite() {
        let temp = assert_fs::TempDir::new().unwrap();
        let s = storage(&temp);
        temp.child("ext/a").write_str("a").unwrap();
        temp.child("ext/b").write_str("b").unwrap();
        assert_eq!(s.rename("/ext/a", "/ext/b").unwrap_err(), FsError::Exist);
        assert_eq!(s.copy("/ext/a", "/ext/b").unwrap_err(), FsError::Exist);
        temp.child("ext/b").assert("b");
    }

    #[test]
    fn remove_refuses_non_empty_dir_and_volume_root() {
        let temp = assert_fs::TempDir::new().unwrap();
        let s = storage(&temp);
        temp.child("int/d/f").write_str("x").unwrap();
        assert_eq!(s.remove("/int/d").unwrap_err(), FsError::Denied);
        assert_eq!(s.remove("/int").unwrap_err(), FsError::Denied);
        s.remove("/int/d/f").unwrap();
        s.remove("/int/d").unwrap();
        assert!(!s.exists("/int/d"));
    }

    #[test]
    fn copy_directory_recursively() {
        let temp = assert_fs::TempDir::new().unwrap();
        let s = storage(&temp);
        temp.child("int/tree/sub/leaf.txt").write_str("leaf").unwrap();
        s.copy("/int/tree", "/ext/tree").unwrap();
        temp.child("ext/tree/sub/leaf.txt").assert("leaf");
        temp.child("int/tree/sub/leaf.txt").assert("leaf");
    }

    #[test]
    fn missing_volume_is_not_ready() {
        let temp = assert_fs::TempDir::new().unwrap();
        let s = LocalStorage::new(temp.child("nope").path(), temp.path());
        assert_eq!(s.stat("/int/x").unwrap_err(), FsError::NotReady);
    }
}
