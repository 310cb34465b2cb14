//! Config validation logic.
//! Creates missing volume roots and verifies they are distinct, disjoint directories.

use anyhow::{Context, Result, bail};
use std::fs;
use std::path::Path;
use tracing::{debug, error, info};

use crate::platform::restrict_dir;

use super::types::Config;

impl Config {
    /// Ensure both volume roots exist and do not overlap.
    pub fn validate(&self) -> Result<()> {
        ensure_dir_is_or_create(&self.int_root, "int_root")?;
        ensure_dir_is_or_create(&self.ext_root, "ext_root")?;

        let int_real = dunce::canonicalize(&self.int_root).unwrap_or_else(|_| self.int_root.clone());
        let ext_real = dunce::canonicalize(&self.ext_root).unwrap_or_else(|_| self.ext_root.clone());

        if int_real == ext_real {
            bail!(
                "int_root and ext_root resolve to the same path: '{}'",
                int_real.display()
            );
        }
        if int_real.starts_with(&ext_real) {
            bail!(
                "int_root '{}' must not be inside ext_root '{}'",
                int_real.display(),
                ext_real.display()
            );
        }
        if ext_real.starts_with(&int_real) {
            bail!(
                "ext_root '{}' must not be inside int_root '{}'",
                ext_real.display(),
                int_real.display()
            );
        }

        info!(
            "Config validated: int='{}' ext='{}' log_file='{}'",
            int_real.display(),
            ext_real.display(),
            self.log_file
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<none>".into())
        );
        Ok(())
    }
}

/// Ensure directory exists (create if missing). If it exists, it must be a directory.
fn ensure_dir_is_or_create(path: &Path, name: &str) -> Result<()> {
    if path.exists() {
        if !path.is_dir() {
            error!("{name} exists but isn't a directory: {}", path.display());
            bail!("{name} exists but isn't a directory: {}", path.display());
        }
        fs::read_dir(path).with_context(|| {
            format!("Cannot read {name} directory '{}'; check permissions", path.display())
        })?;
        debug!("{name} readable: {}", path.display());
    } else {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create {name} directory '{}'", path.display()))?;
        let _ = restrict_dir(path);
        info!("Created {name} directory: {}", path.display());
    }
    Ok(())
}
