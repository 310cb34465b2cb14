//! Data transfer commands. Handles are opened here and dropped on return.

use tracing::info;

use crate::args::read_size;
use crate::console::Console;
use crate::errors::CommandError;
use crate::fs_ops::{self, WriteSession};
use crate::storage::{AccessMode, OpenMode, Storage};

use super::Command;

/// Chunk size from the trailing arguments; checked before any handle is opened.
fn chunk_size(command: &Command) -> Result<usize, CommandError> {
    read_size(&command.rest_args).ok_or(CommandError::Usage)
}

pub(super) fn read(
    storage: &dyn Storage,
    console: &mut dyn Console,
    command: &Command,
) -> Result<(), CommandError> {
    let mut file = storage.open_file(&command.path, AccessMode::Read, OpenMode::OpenExisting)?;
    fs_ops::read_to_end(&mut *file, console)?;
    Ok(())
}

pub(super) fn read_chunks(
    storage: &dyn Storage,
    console: &mut dyn Console,
    command: &Command,
) -> Result<(), CommandError> {
    let chunk = chunk_size(command)?;
    let mut file = storage.open_file(&command.path, AccessMode::Read, OpenMode::OpenExisting)?;
    fs_ops::read_chunks(&mut *file, console, chunk)?;
    Ok(())
}

pub(super) fn write(
    storage: &dyn Storage,
    console: &mut dyn Console,
    command: &Command,
) -> Result<(), CommandError> {
    let mut file = storage.open_file(&command.path, AccessMode::Write, OpenMode::OpenAppend)?;
    let mut session = WriteSession::new();
    let outcome = session.run(&mut *file, console);
    info!(path = %command.path, bytes = session.total(), "write session ended");
    outcome.map(|_| ())
}

pub(super) fn write_chunk(
    storage: &dyn Storage,
    console: &mut dyn Console,
    command: &Command,
) -> Result<(), CommandError> {
    let chunk = chunk_size(command)?;
    let mut file = storage.open_file(&command.path, AccessMode::Write, OpenMode::OpenAppend)?;
    fs_ops::write_chunk(&mut *file, console, chunk)?;
    Ok(())
}
