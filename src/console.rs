//! Console transport.
//!
//! Handlers talk to the operator through [`Console`]: blocking single-symbol
//! reads, bounded raw reads and unbuffered writes. [`StdConsole`] drives the
//! process stdin/stdout; [`MemoryConsole`] replays scripted input and captures
//! output.

use std::collections::VecDeque;
use std::io::{self, BufRead, Read, Write};

use tracing::debug;

use crate::shutdown;

/// ASCII "end of text", sent by Ctrl+C on a raw terminal.
pub const ETX: u8 = 0x03;

pub trait Console {
    /// Block until one input symbol is available.
    ///
    /// End of input and a pending interrupt are both reported as [`ETX`].
    fn getc(&mut self) -> io::Result<u8>;

    /// One bounded raw read; may return fewer bytes than `buf.len()`.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Unbuffered write: bytes are visible to the operator on return.
    fn write(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Read one command line without its terminator. `None` at end of input.
    fn read_line(&mut self) -> io::Result<Option<String>>;

    fn print(&mut self, text: &str) -> io::Result<()> {
        self.write(text.as_bytes())
    }

    /// Print `text` followed by the console line terminator.
    fn println(&mut self, text: &str) -> io::Result<()> {
        self.write(text.as_bytes())?;
        self.write(b"\r\n")
    }
}

/// Console over a byte stream pair; [`StdConsole`] is the process stdin/stdout.
///
/// An interrupt is only noticed between reads: with `SA_RESTART` a blocked
/// read is resumed, so the interrupt surfaces when the next byte arrives.
/// That byte is kept for the next reader, and the line it belongs to is
/// dropped by the following [`Console::read_line`] so leftover keystrokes are
/// never dispatched as a command.
pub struct StreamConsole<R, W> {
    input: R,
    output: W,
    pushback: Option<u8>,
    resync: bool,
    interrupted: fn() -> bool,
}

/// Console over the process standard streams.
pub type StdConsole = StreamConsole<io::StdinLock<'static>, io::Stdout>;

impl StdConsole {
    pub fn new() -> Self {
        StreamConsole::from_streams(io::stdin().lock(), io::stdout())
    }
}

impl Default for StdConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: BufRead, W: Write> StreamConsole<R, W> {
    pub fn from_streams(input: R, output: W) -> Self {
        Self {
            input,
            output,
            pushback: None,
            resync: false,
            interrupted: shutdown::take_requested,
        }
    }

    /// Replace the interrupt source (defaults to the process interrupt flag).
    pub fn with_interrupt_source(mut self, interrupted: fn() -> bool) -> Self {
        self.interrupted = interrupted;
        self
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        let mut byte = [0u8; 1];
        loop {
            match self.input.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(byte[0])),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}

impl<R: BufRead, W: Write> Console for StreamConsole<R, W> {
    fn getc(&mut self) -> io::Result<u8> {
        if (self.interrupted)() {
            return Ok(ETX);
        }
        if let Some(byte) = self.pushback.take() {
            if byte == b'\n' {
                self.resync = false;
            }
            return Ok(byte);
        }
        let Some(byte) = self.next_byte()? else {
            return Ok(ETX);
        };
        if (self.interrupted)() {
            self.pushback = Some(byte);
            self.resync = true;
            return Ok(ETX);
        }
        Ok(byte)
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        let n = match self.pushback.take() {
            Some(byte) => {
                buf[0] = byte;
                1
            }
            None => self.input.read(buf)?,
        };
        if buf[..n].contains(&b'\n') {
            self.resync = false;
        }
        Ok(n)
    }

    fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.output.write_all(bytes)?;
        self.output.flush()
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        loop {
            let mut raw = Vec::new();
            raw.extend(self.pushback.take());
            if raw.last() != Some(&b'\n') {
                self.input.read_until(b'\n', &mut raw)?;
            }
            if raw.is_empty() {
                return Ok(None);
            }
            if std::mem::take(&mut self.resync) {
                debug!(dropped = raw.len(), "discarding input cut by an interrupt");
                continue;
            }
            let line = String::from_utf8_lossy(&raw);
            return Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()));
        }
    }
}

/// In-memory console: scripted input, captured output.
///
/// `read` hands out at most `max_read` bytes per call so short console reads
/// can be reproduced.
#[derive(Debug, Default)]
pub struct MemoryConsole {
    input: VecDeque<u8>,
    output: Vec<u8>,
    max_read: Option<usize>,
    getc_calls: usize,
}

impl MemoryConsole {
    pub fn new(input: impl AsRef<[u8]>) -> Self {
        Self {
            input: input.as_ref().iter().copied().collect(),
            ..Self::default()
        }
    }

    /// Cap every bounded `read` at `limit` bytes.
    pub fn with_max_read(mut self, limit: usize) -> Self {
        self.max_read = Some(limit);
        self
    }

    pub fn push_input(&mut self, bytes: impl AsRef<[u8]>) {
        self.input.extend(bytes.as_ref());
    }

    pub fn output(&self) -> &[u8] {
        &self.output
    }

    pub fn output_lossy(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }

    pub fn take_output(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.output)
    }

    /// Number of single-symbol reads served so far.
    pub fn getc_calls(&self) -> usize {
        self.getc_calls
    }

    pub fn remaining_input(&self) -> usize {
        self.input.len()
    }
}

impl Console for MemoryConsole {
    fn getc(&mut self) -> io::Result<u8> {
        self.getc_calls += 1;
        Ok(self.input.pop_front().unwrap_or(ETX))
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let limit = self.max_read.unwrap_or(usize::MAX).min(buf.len());
        let n = limit.min(self.input.len());
        for (slot, byte) in buf.iter_mut().zip(self.input.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }

    fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.output.extend_from_slice(bytes);
        Ok(())
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        if self.input.is_empty() {
            return Ok(None);
        }
        let end = self
            .input
            .iter()
            .position(|&b| b == b'\n')
            .map(|p| p + 1)
            .unwrap_or(self.input.len());
        let raw: Vec<u8> = self.input.drain(..end).collect();
        let line = String::from_utf8_lossy(&raw);
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}
