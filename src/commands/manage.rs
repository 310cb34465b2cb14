//! Entry management commands: copy, remove, rename, migrate, mkdir and md5.

use tracing::info;

use crate::console::Console;
use crate::errors::CommandError;
use crate::fs_ops;
use crate::storage::Storage;

use super::{Command, second_path};

pub(super) fn copy(
    storage: &dyn Storage,
    _console: &mut dyn Console,
    command: &Command,
) -> Result<(), CommandError> {
    let new_path = second_path(command)?;
    storage.copy(&command.path, &new_path)?;
    info!(src = %command.path, dst = %new_path, "copied");
    Ok(())
}

pub(super) fn remove(
    storage: &dyn Storage,
    _console: &mut dyn Console,
    command: &Command,
) -> Result<(), CommandError> {
    storage.remove(&command.path)?;
    info!(path = %command.path, "removed");
    Ok(())
}

pub(super) fn rename(
    storage: &dyn Storage,
    _console: &mut dyn Console,
    command: &Command,
) -> Result<(), CommandError> {
    let new_path = second_path(command)?;
    storage.rename(&command.path, &new_path)?;
    info!(src = %command.path, dst = %new_path, "renamed");
    Ok(())
}

pub(super) fn migrate(
    storage: &dyn Storage,
    _console: &mut dyn Console,
    command: &Command,
) -> Result<(), CommandError> {
    let new_path = second_path(command)?;
    fs_ops::migrate(storage, &command.path, &new_path)?;
    Ok(())
}

pub(super) fn mkdir(
    storage: &dyn Storage,
    _console: &mut dyn Console,
    command: &Command,
) -> Result<(), CommandError> {
    storage.mkdir(&command.path)?;
    info!(path = %command.path, "directory created");
    Ok(())
}

pub(super) fn md5(
    storage: &dyn Storage,
    console: &mut dyn Console,
    command: &Command,
) -> Result<(), CommandError> {
    let digest = fs_ops::md5_file(storage, &command.path)?;
    console.println(&digest)?;
    Ok(())
}
