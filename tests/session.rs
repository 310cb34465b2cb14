use std::fs;

use storage_console::console::ETX;
use storage_console::session::PROMPT;
use storage_console::{Flow, LocalStorage, MemoryConsole, run_line, run_session};
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
fn scripted_session_runs_commands_in_order() {
    let (td, storage) = setup();
    let script = "storage mkdir /ext/box\n\
                  storage write_chunk /ext/box/f.bin 3\nabc\
                  storage stat /ext/box/f.bin\n\
                  exit\n";
    let mut console = MemoryConsole::new(script);
    run_session(&storage, &mut console).unwrap();

    assert_eq!(fs::read(td.path().join("ext/box/f.bin")).unwrap(), b"abc");
    assert_eq!(
        console.output_lossy(),
        format!("{PROMPT}{PROMPT}Ready\r\n{PROMPT}File, size: 3b\r\n{PROMPT}")
    );
}

#[test]
fn end_of_input_closes_the_session() {
    let (_td, storage) = setup();
    let mut console = MemoryConsole::new("storage list /\n");
    run_session(&storage, &mut console).unwrap();
    assert_eq!(
        console.output_lossy(),
        format!("{PROMPT}\t[D] int\r\n\t[D] ext\r\n\t[D] any\r\n{PROMPT}\r\n")
    );
}

#[test]
fn write_session_inside_a_session() {
    let (td, storage) = setup();
    let mut script = b"storage write /int/memo.txt\n".to_vec();
    script.extend_from_slice(b"hi there");
    script.push(ETX);
    script.extend_from_slice(b"storage read /int/memo.txt\nquit\n");
    let mut console = MemoryConsole::new(script);
    run_session(&storage, &mut console).unwrap();

    assert_eq!(fs::read(td.path().join("int/memo.txt")).unwrap(), b"hi there");
    assert!(console.output_lossy().contains("Size: 8\r\nhi there\r\n"));
}

#[test]
fn session_level_commands() {
    let (_td, storage) = setup();
    let mut console = MemoryConsole::new("");
    assert_eq!(run_line(&storage, &mut console, "help").unwrap(), Flow::Continue);
    let out = console.output_lossy();
    assert!(out.contains("storage <cmd> <path> <args>"));
    assert!(out.contains("factory_reset"));

    let mut console = MemoryConsole::new("");
    run_line(&storage, &mut console, "storage").unwrap();
    assert!(console.output_lossy().starts_with("Usage:"));

    let mut console = MemoryConsole::new("n");
    run_line(&storage, &mut console, "factory_reset").unwrap();
    assert!(console.output_lossy().ends_with("Safe choice.\r\n"));
}
