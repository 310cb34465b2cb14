//! Directory listings: `list` (one level) and `tree` (recursive).

use crate::console::Console;
use crate::errors::CommandError;
use crate::fs_ops::DirWalk;
use crate::storage::{FileInfo, Storage};
use crate::volume::{VOLUME_ROOTS, VolumePath};

use super::Command;

fn print_entry(console: &mut dyn Console, name: &str, info: &FileInfo) -> Result<(), CommandError> {
    if info.is_dir() {
        console.println(&format!("\t[D] {name}"))?;
    } else {
        console.println(&format!("\t[F] {name} {}b", info.size))?;
    }
    Ok(())
}

/// Print every entry the walk yields; `Empty` if it yields none.
///
/// Entries already printed stay printed when the walk fails part-way.
fn print_walk(
    console: &mut dyn Console,
    walk: DirWalk<'_>,
    full_paths: bool,
) -> Result<(), CommandError> {
    let mut any = false;
    for entry in walk {
        let entry = entry?;
        any = true;
        let shown = if full_paths { &entry.path } else { &entry.name };
        print_entry(console, shown, &entry.info)?;
    }
    if !any {
        console.println("\tEmpty")?;
    }
    Ok(())
}

pub(super) fn list(
    storage: &dyn Storage,
    console: &mut dyn Console,
    command: &Command,
) -> Result<(), CommandError> {
    if VolumePath::classify(&command.path) == VolumePath::Root {
        for name in ["int", "ext", "any"] {
            console.println(&format!("\t[D] {name}"))?;
        }
        return Ok(());
    }
    let walk = DirWalk::open(storage, &command.path)?.flat();
    print_walk(console, walk, false)
}

fn tree_one(
    storage: &dyn Storage,
    console: &mut dyn Console,
    path: &str,
) -> Result<(), CommandError> {
    let walk = DirWalk::open(storage, path)?;
    print_walk(console, walk, true)
}

pub(super) fn tree(
    storage: &dyn Storage,
    console: &mut dyn Console,
    command: &Command,
) -> Result<(), CommandError> {
    if VolumePath::classify(&command.path) != VolumePath::Root {
        return tree_one(storage, console, &command.path);
    }
    for root in VOLUME_ROOTS {
        // A failing volume is reported inline; the other one is still walked.
        if let Err(err) = tree_one(storage, console, root) {
            super::report(console, err)?;
        }
    }
    Ok(())
}
