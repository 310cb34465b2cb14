//! Chunked transfer protocols between an open file and the console.
//!
//! Four protocols share one shape: the caller opens the handle, the protocol
//! drives it, the handle is dropped by the caller on every exit path.
//! - `read_to_end`: unattended bulk read through a 128-byte buffer.
//! - `WriteSession`: echo-and-append until the operator sends ETX.
//! - `read_chunks`: caller-sized reads, each gated by a one-byte handshake.
//! - `write_chunk`: one bounded console read appended to the file.

use tracing::{debug, trace, warn};

use crate::console::{Console, ETX};
use crate::errors::{CommandError, FsError};
use crate::storage::FileHandle;

/// Buffer used by the unattended bulk read.
pub const READ_BUFFER_SIZE: usize = 128;
/// Buffer accumulating typed symbols before they are appended.
pub const WRITE_BUFFER_SIZE: usize = 512;

/// Counters from a chunked read, for logging and tests.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ChunkStats {
    pub handshakes: usize,
    pub bytes: u64,
}

/// Print the size header, then every byte of the file, then a line break.
pub fn read_to_end(
    file: &mut dyn FileHandle,
    console: &mut dyn Console,
) -> Result<u64, CommandError> {
    let size = file.size()?;
    console.print(&format!("Size: {size}\r\n"))?;

    let mut buffer = [0u8; READ_BUFFER_SIZE];
    let mut total = 0u64;
    loop {
        let n = file.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        console.write(&buffer[..n])?;
        total += n as u64;
    }
    console.print("\r\n")?;
    debug!(size, emitted = total, "read complete");
    Ok(total)
}

/// State of one write-until-cancel session.
///
/// Symbols accumulate in a fixed buffer; the buffer is appended to the file
/// each time it fills, and whatever is pending is appended once when ETX
/// arrives.
pub struct WriteSession {
    buffer: [u8; WRITE_BUFFER_SIZE],
    cursor: usize,
    total: u64,
}

impl Default for WriteSession {
    fn default() -> Self {
        Self::new()
    }
}

impl WriteSession {
    pub fn new() -> Self {
        Self {
            buffer: [0u8; WRITE_BUFFER_SIZE],
            cursor: 0,
            total: 0,
        }
    }

    /// Bytes stored so far.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Run until ETX. Returns the number of bytes appended to the file.
    pub fn run(
        &mut self,
        file: &mut dyn FileHandle,
        console: &mut dyn Console,
    ) -> Result<u64, CommandError> {
        console.println("Just write your text data. New line by Ctrl+Enter, exit by Ctrl+C.")?;

        let outcome = self.pump(file, console);
        console.print("\r\n")?;
        outcome.map(|()| self.total)
    }

    fn pump(
        &mut self,
        file: &mut dyn FileHandle,
        console: &mut dyn Console,
    ) -> Result<(), CommandError> {
        loop {
            let symbol = console.getc()?;
            if symbol == ETX {
                trace!(pending = self.cursor, "cancel received");
                return self.flush(file);
            }

            self.buffer[self.cursor] = symbol;
            console.write(&[symbol])?;
            self.cursor += 1;

            if self.cursor == WRITE_BUFFER_SIZE {
                self.flush(file)?;
            }
        }
    }

    /// Append pending bytes, if any, and reset the cursor.
    fn flush(&mut self, file: &mut dyn FileHandle) -> Result<(), CommandError> {
        if self.cursor == 0 {
            return Ok(());
        }
        let expected = self.cursor;
        let written = file.write(&self.buffer[..expected])?;
        self.cursor = 0;
        self.total += written as u64;
        if written != expected {
            warn!(written, expected, "write session flush came up short");
            return Err(CommandError::ShortWrite { written, expected });
        }
        Ok(())
    }
}

/// Emit the file in `chunk`-sized pieces, waiting for one console byte before each.
///
/// `chunk == 0` prints only the header.
pub fn read_chunks(
    file: &mut dyn FileHandle,
    console: &mut dyn Console,
    chunk: usize,
) -> Result<ChunkStats, CommandError> {
    let size = file.size()?;
    console.print(&format!("Size: {size}\r\n"))?;

    let mut stats = ChunkStats::default();
    if chunk > 0 {
        let capacity = usize::try_from(size).map_or(chunk, |s| chunk.min(s));
        let mut data = vec![0u8; capacity];
        let mut remaining = size;
        while remaining > 0 {
            console.print("\r\nReady?\r\n")?;
            console.getc()?;
            stats.handshakes += 1;

            let n = file.read(&mut data)?;
            if n == 0 {
                warn!(remaining, "file ended before its reported size");
                break;
            }
            console.write(&data[..n])?;
            stats.bytes += n as u64;
            remaining = remaining.saturating_sub(n as u64);
        }
    }
    console.print("\r\n")?;
    debug!(size, chunk, handshakes = stats.handshakes, "chunked read complete");
    Ok(stats)
}

/// Read up to `chunk` bytes from the console in one bounded read and append them.
///
/// The stored count is checked against `chunk`, not against what the console
/// delivered, so a short console read is reported as a short write.
pub fn write_chunk(
    file: &mut dyn FileHandle,
    console: &mut dyn Console,
    chunk: usize,
) -> Result<usize, CommandError> {
    console.println("Ready")?;
    if chunk == 0 {
        return Ok(0);
    }

    let mut buffer = Vec::new();
    if buffer.try_reserve_exact(chunk).is_err() {
        warn!(chunk, "chunk buffer allocation refused");
        return Err(FsError::InvalidParameter.into());
    }
    buffer.resize(chunk, 0);

    let received = console.read(&mut buffer)?;
    let written = file.write(&buffer[..received])?;
    debug!(chunk, received, written, "chunk appended");
    if written != chunk {
        return Err(CommandError::ShortWrite {
            written,
            expected: chunk,
        });
    }
    Ok(written)
}
