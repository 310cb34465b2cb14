//! Volume-level commands: info, format, stat, timestamp and the factory reset.

use tracing::{debug, info};

use crate::console::Console;
use crate::errors::{CommandError, FsError};
use crate::storage::Storage;
use crate::volume::VolumePath;

use super::Command;

const UNKNOWN_LABEL: &str = "Unknown";

/// Read one symbol and accept `y`/`Y` only.
fn confirmed(console: &mut dyn Console) -> Result<bool, CommandError> {
    let answer = console.getc()?;
    Ok(matches!(answer, b'y' | b'Y'))
}

pub(super) fn info(
    storage: &dyn Storage,
    console: &mut dyn Console,
    command: &Command,
) -> Result<(), CommandError> {
    match VolumePath::classify(&command.path) {
        VolumePath::Internal => {
            let fs = storage.fs_info(&command.path)?;
            let label = storage
                .device_name()
                .unwrap_or_else(|| UNKNOWN_LABEL.to_string());
            console.print(&format!(
                "Label: {label}\r\nType: {}\r\n{}KiB total\r\n{}KiB free\r\n",
                fs.fs_type,
                fs.total_space / 1024,
                fs.free_space / 1024
            ))?;
        }
        VolumePath::External => {
            let sd = storage.sd_info()?;
            console.print(&format!(
                "Label: {}\r\nType: {}\r\n{}KiB total\r\n{}KiB free\r\n",
                sd.label, sd.fs_type, sd.kb_total, sd.kb_free
            ))?;
            if let Some(card) = sd.card {
                console.print(&format!(
                    "{:02x}{} {} v{}.{}\r\nSN:{:04x} {:02}/{}\r\n",
                    card.manufacturer_id,
                    card.oem_id,
                    card.product_name,
                    card.revision_major,
                    card.revision_minor,
                    card.serial_number,
                    card.manufacturing_month,
                    card.manufacturing_year
                ))?;
            }
        }
        _ => return Err(CommandError::Usage),
    }
    Ok(())
}

pub(super) fn format(
    storage: &dyn Storage,
    console: &mut dyn Console,
    command: &Command,
) -> Result<(), CommandError> {
    match VolumePath::classify(&command.path) {
        VolumePath::Internal => Err(FsError::NotImplemented.into()),
        VolumePath::External => {
            console.println("Formatting SD card, All data will be lost! Are you sure (y/n)?")?;
            if !confirmed(console)? {
                console.println("Cancelled.")?;
                return Ok(());
            }
            console.println("Formatting, please wait...")?;
            storage.format_external()?;
            info!("external volume formatted on operator request");
            console.println("SD card was successfully formatted.")?;
            Ok(())
        }
        _ => Err(CommandError::Usage),
    }
}

pub(super) fn stat(
    storage: &dyn Storage,
    console: &mut dyn Console,
    command: &Command,
) -> Result<(), CommandError> {
    let path = VolumePath::classify(&command.path);
    if path == VolumePath::Root {
        console.println("Storage")?;
    } else if path.is_volume() {
        let fs = storage.fs_info(&command.path)?;
        console.println(&format!(
            "Storage, {}KiB total, {}KiB free",
            fs.total_space / 1024,
            fs.free_space / 1024
        ))?;
    } else {
        let info = storage.stat(&command.path)?;
        if info.is_dir() {
            console.println("Directory")?;
        } else {
            console.println(&format!("File, size: {}b", info.size))?;
        }
    }
    Ok(())
}

pub(super) fn timestamp(
    storage: &dyn Storage,
    console: &mut dyn Console,
    command: &Command,
) -> Result<(), CommandError> {
    match storage.timestamp(&command.path) {
        Ok(seconds) => console.println(&format!("Timestamp {seconds}"))?,
        Err(e) => {
            debug!(path = %command.path, error = %e, "timestamp lookup failed");
            console.println("Invalid arguments")?;
        }
    }
    Ok(())
}

/// Wipe both volumes after an explicit confirmation.
pub fn factory_reset(
    storage: &dyn Storage,
    console: &mut dyn Console,
) -> Result<(), CommandError> {
    console.println("All data will be lost! Are you sure (y/n)?")?;
    if !confirmed(console)? {
        console.println("Safe choice.")?;
        return Ok(());
    }
    storage.factory_reset()?;
    info!("factory reset performed");
    console.println("Data wiped.")?;
    Ok(())
}
