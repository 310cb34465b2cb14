use std::fs;

use storage_console::fs_ops::DirWalk;
use storage_console::storage::EntryKind;
use storage_console::{LocalStorage, MemoryConsole, dispatch};
use tempfile::tempdir;

fn setup() -> (tempfile::TempDir, LocalStorage) {
    let td = tempdir().unwrap();
    let int = td.path().join("int");
    let ext = td.path().join("ext");
    fs::create_dir_all(&int).unwrap();
    fs::create_dir_all(&ext).unwrap();
    (td, LocalStorage::new(int, ext))
}

#[test]
fn empty_directory_reports_empty() {
    let (td, storage) = setup();
    fs::create_dir_all(td.path().join("ext/void")).unwrap();

    assert_eq!(DirWalk::open(&storage, "/ext/void").unwrap().count(), 0);

    let mut console = MemoryConsole::new("");
    dispatch(&storage, &mut console, "tree /ext/void").unwrap();
    assert_eq!(console.output_lossy(), "\tEmpty\r\n");
}

#[test]
fn one_file_and_one_subdirectory() {
    let (td, storage) = setup();
    fs::create_dir_all(td.path().join("ext/top/sub")).unwrap();
    fs::write(td.path().join("ext/top/file.bin"), vec![0u8; 1234]).unwrap();

    let entries: Vec<_> = DirWalk::open(&storage, "/ext/top")
        .unwrap()
        .map(Result::unwrap)
        .collect();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].info.kind, EntryKind::File);
    assert_eq!(entries[0].info.size, 1234);
    assert_eq!(entries[1].info.kind, EntryKind::Directory);

    let mut console = MemoryConsole::new("");
    dispatch(&storage, &mut console, "tree /ext/top").unwrap();
    assert_eq!(
        console.output_lossy(),
        "\t[F] /ext/top/file.bin 1234b\r\n\t[D] /ext/top/sub\r\n"
    );
}

#[test]
fn nested_entries_follow_their_directory() {
    let (td, storage) = setup();
    fs::create_dir_all(td.path().join("int/a/b")).unwrap();
    fs::write(td.path().join("int/a/b/deep.txt"), b"xy").unwrap();
    fs::write(td.path().join("int/z.txt"), b"").unwrap();

    let mut console = MemoryConsole::new("");
    dispatch(&storage, &mut console, "tree /int").unwrap();
    assert_eq!(
        console.output_lossy(),
        "\t[D] /int/a\r\n\t[D] /int/a/b\r\n\t[F] /int/a/b/deep.txt 2b\r\n\t[F] /int/z.txt 0b\r\n"
    );
}

#[test]
fn root_walks_internal_then_external() {
    let (td, storage) = setup();
    fs::write(td.path().join("int/i.txt"), b"i").unwrap();

    let mut console = MemoryConsole::new("");
    dispatch(&storage, &mut console, "tree /").unwrap();
    assert_eq!(console.output_lossy(), "\t[F] /int/i.txt 1b\r\n\tEmpty\r\n");
}

#[test]
fn root_reports_a_missing_volume_and_continues() {
    let (td, storage) = setup();
    fs::remove_dir(td.path().join("int")).unwrap();
    fs::write(td.path().join("ext/e.txt"), b"ee").unwrap();

    let mut console = MemoryConsole::new("");
    dispatch(&storage, &mut console, "tree /").unwrap();
    assert_eq!(
        console.output_lossy(),
        "Storage error: filesystem not ready\r\n\t[F] /ext/e.txt 2b\r\n"
    );
}

#[test]
fn unopenable_path_reports_error_only() {
    let (td, storage) = setup();
    fs::write(td.path().join("ext/plain.txt"), b"p").unwrap();

    let mut console = MemoryConsole::new("");
    dispatch(&storage, &mut console, "tree /ext/missing").unwrap();
    assert_eq!(console.output_lossy(), "Storage error: file/dir not exist\r\n");

    let mut console = MemoryConsole::new("");
    dispatch(&storage, &mut console, "tree /ext/plain.txt").unwrap();
    assert_eq!(console.output_lossy(), "Storage error: invalid parameter\r\n");
}

#[test]
fn list_is_flat_and_uses_names() {
    let (td, storage) = setup();
    fs::create_dir_all(td.path().join("ext/dir/inner")).unwrap();
    fs::write(td.path().join("ext/a.txt"), b"abc").unwrap();

    let mut console = MemoryConsole::new("");
    dispatch(&storage, &mut console, "list /ext").unwrap();
    assert_eq!(console.output_lossy(), "\t[F] a.txt 3b\r\n\t[D] dir\r\n");

    let mut console = MemoryConsole::new("");
    dispatch(&storage, &mut console, "list /").unwrap();
    assert_eq!(console.output_lossy(), "\t[D] int\r\n\t[D] ext\r\n\t[D] any\r\n");
}
