use std::fs;

use storage_console::{LocalStorage, MemoryConsole, dispatch};
use tempfile::tempdir;

fn setup(content: &[u8]) -> (tempfile::TempDir, LocalStorage) {
    let td = tempdir().unwrap();
    let int = td.path().join("int");
    let ext = td.path().join("ext");
    fs::create_dir_all(&int).unwrap();
    fs::create_dir_all(&ext).unwrap();
    fs::write(ext.join("blob.bin"), content).unwrap();
    (td, LocalStorage::new(int, ext))
}

/// Strip the header, handshake prompts and trailer, returning the payload.
fn payload(out: &[u8], size: usize, handshakes: usize) -> Vec<u8> {
    let header = format!("Size: {size}\r\n");
    assert!(out.starts_with(header.as_bytes()));
    let mut body = &out[header.len()..out.len() - 2];
    let mut data = Vec::new();
    for _ in 0..handshakes {
        body = body.strip_prefix(b"\r\nReady?\r\n").expect("handshake prompt");
        let next = body
            .windows(10)
            .position(|w| w == b"\r\nReady?\r\n")
            .unwrap_or(body.len());
        data.extend_from_slice(&body[..next]);
        body = &body[next..];
    }
    assert!(body.is_empty());
    data
}

#[test]
fn emits_every_byte_across_ceil_l_over_n_handshakes() {
    let content: Vec<u8> = (0..1000u32).map(|i| (i * 7 % 256) as u8).collect();
    for chunk in [1usize, 3, 64, 999, 1000, 4096] {
        let (_td, storage) = setup(&content);
        let expected_handshakes = content.len().div_ceil(chunk);
        let mut console = MemoryConsole::new(vec![b'.'; expected_handshakes + 5]);

        dispatch(&storage, &mut console, &format!("read_chunks /ext/blob.bin {chunk}")).unwrap();

        assert_eq!(
            console.remaining_input(),
            5,
            "chunk {chunk}: one handshake byte per chunk"
        );
        let data = payload(console.output(), content.len(), expected_handshakes);
        assert_eq!(data, content, "chunk {chunk}");
    }
}

#[test]
fn zero_chunk_prints_header_only() {
    let (_td, storage) = setup(b"abcdef");
    let mut console = MemoryConsole::new("....");
    dispatch(&storage, &mut console, "read_chunks /ext/blob.bin 0").unwrap();
    assert_eq!(console.output(), b"Size: 6\r\n\r\n");
    assert_eq!(console.remaining_input(), 4);
}

#[test]
fn empty_file_needs_no_handshake() {
    let (_td, storage) = setup(b"");
    let mut console = MemoryConsole::new(".");
    dispatch(&storage, &mut console, "read_chunks /ext/blob.bin 16").unwrap();
    assert_eq!(console.output(), b"Size: 0\r\n\r\n");
    assert_eq!(console.getc_calls(), 0);
}

#[test]
fn missing_file_reports_storage_error() {
    let (_td, storage) = setup(b"x");
    let mut console = MemoryConsole::new("");
    dispatch(&storage, &mut console, "read_chunks /ext/nope.bin 4").unwrap();
    assert_eq!(console.output_lossy(), "Storage error: file/dir not exist\r\n");
}

#[test]
fn bulk_read_prints_size_and_content() {
    let (_td, storage) = setup(b"hello world");
    let mut console = MemoryConsole::new("");
    dispatch(&storage, &mut console, "read /ext/blob.bin").unwrap();
    assert_eq!(console.output_lossy(), "Size: 11\r\nhello world\r\n");
}
