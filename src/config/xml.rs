//! XML configuration support.
//! - Loads settings from config.xml (quick_xml + serde).
//! - Writes an owner-only template when the default file is missing.
//!
//! Notes:
//! - Only reads/writes the config file; directory validation happens elsewhere.
//! - Unknown XML fields are rejected so misspelled tags do not pass silently.

use anyhow::{Context, Result, bail};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use super::paths::{CONFIG_ENV_VAR, default_config_path, path_has_symlink_ancestor};
use super::types::{Config, LogLevel};
use crate::platform::{restrict_dir, write_private_new};

/// Struct mirroring the XML config for deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlConfig {
    #[serde(rename = "int_root")]
    int_root: Option<String>,
    #[serde(rename = "ext_root")]
    ext_root: Option<String>,
    #[serde(rename = "ext_label")]
    ext_label: Option<String>,
    #[serde(rename = "device_name")]
    device_name: Option<String>,
    #[serde(rename = "log_level")]
    log_level: Option<String>,
    #[serde(rename = "log_file")]
    log_file: Option<String>,
}

/// What `load_or_init` found.
#[derive(Debug)]
pub enum LoadResult {
    /// A config file was read.
    Loaded(Config, PathBuf),
    /// No file existed at the default location; a template was written there
    /// and defaults are in effect.
    CreatedTemplate(Config, PathBuf),
    /// No file and no template (explicit path missing); defaults are in effect.
    Defaults(Config),
}

impl LoadResult {
    pub fn into_config(self) -> Config {
        match self {
            LoadResult::Loaded(cfg, _)
            | LoadResult::CreatedTemplate(cfg, _)
            | LoadResult::Defaults(cfg) => cfg,
        }
    }
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

// Map XmlConfig -> Config; absent tags keep their defaults.
fn xml_to_config(parsed: XmlConfig) -> Config {
    let mut cfg = Config::default();
    if let Some(p) = non_empty(parsed.int_root) {
        cfg.int_root = PathBuf::from(p);
    }
    if let Some(p) = non_empty(parsed.ext_root) {
        cfg.ext_root = PathBuf::from(p);
    }
    if let Some(label) = non_empty(parsed.ext_label) {
        cfg.ext_label = label;
    }
    cfg.device_name = non_empty(parsed.device_name);
    if let Some(level) = non_empty(parsed.log_level).and_then(|s| LogLevel::parse(&s)) {
        cfg.log_level = level;
    }
    cfg.log_file = non_empty(parsed.log_file).map(PathBuf::from);
    cfg
}

/// Load a Config from a specific XML file path.
pub fn load_config_from_xml_path(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read config xml '{}'", path.display()))?;
    let parsed: XmlConfig = from_xml_str(&contents)
        .with_context(|| format!("parse config xml '{}'", path.display()))?;
    Ok(xml_to_config(parsed))
}

/// Load the config file, writing a template at the default location when none exists.
///
/// An explicit `$STORAGE_CONSOLE_CONFIG` that does not exist is not created;
/// defaults are used instead.
pub fn load_or_init() -> Result<LoadResult> {
    let explicit = env::var_os(CONFIG_ENV_VAR).is_some();
    let path = default_config_path()?;

    if path.exists() {
        let cfg = load_config_from_xml_path(&path)?;
        return Ok(LoadResult::Loaded(cfg, path));
    }
    if explicit {
        return Ok(LoadResult::Defaults(Config::default()));
    }
    create_template_config(&path)?;
    Ok(LoadResult::CreatedTemplate(Config::default(), path))
}

/// Create the template config file and its parent directory (owner-only on Unix).
pub fn create_template_config(path: &Path) -> Result<()> {
    if path_has_symlink_ancestor(path)? {
        bail!(
            "Refusing to create config: ancestor of {} is a symlink",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
        let _ = restrict_dir(parent);
    }

    let defaults = Config::default();
    let content = format!(
        "<!--\n  storage_console configuration (XML)\n\n    int_root     -> host directory backing /int\n    ext_root     -> host directory backing /ext (and /any)\n    ext_label    -> label reported by `info /ext`\n    device_name  -> label reported by `info /int` (optional)\n    log_level    -> quiet | normal | info | debug\n    log_file     -> path to a log file (optional; stderr is always used)\n\n  CLI flags override XML values.\n-->\n<config>\n  <int_root>{}</int_root>\n  <ext_root>{}</ext_root>\n  <ext_label>{}</ext_label>\n  <log_level>normal</log_level>\n</config>\n",
        defaults.int_root.display(),
        defaults.ext_root.display(),
        defaults.ext_label,
    );

    write_private_new(path, content.as_bytes())?;

    info!("Created template config at {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn reads_all_fields() {
        let td = tempdir().unwrap();
        let path = td.path().join("config.xml");
        fs::write(
            &path,
            "<config>\n  <int_root> /tmp/int </int_root>\n  <ext_root>/tmp/ext</ext_root>\n  <ext_label>CARD</ext_label>\n  <device_name>Flipper</device_name>\n  <log_level>DEBUG</log_level>\n  <log_file>/tmp/sc.log</log_file>\n</config>",
        )
        .unwrap();
        let cfg = load_config_from_xml_path(&path).unwrap();
        assert_eq!(cfg.int_root, PathBuf::from("/tmp/int"));
        assert_eq!(cfg.ext_root, PathBuf::from("/tmp/ext"));
        assert_eq!(cfg.ext_label, "CARD");
        assert_eq!(cfg.device_name.as_deref(), Some("Flipper"));
        assert_eq!(cfg.log_level, LogLevel::Debug);
        assert_eq!(cfg.log_file, Some(PathBuf::from("/tmp/sc.log")));
    }

    #[test]
    fn empty_tags_keep_defaults() {
        let td = tempdir().unwrap();
        let path = td.path().join("config.xml");
        fs::write(&path, "<config><ext_label>  </ext_label><log_file></log_file></config>").unwrap();
        let cfg = load_config_from_xml_path(&path).unwrap();
        assert_eq!(cfg.ext_label, super::super::EXT_LABEL_DEFAULT);
        assert!(cfg.log_file.is_none());
    }

    #[test]
    fn unknown_tag_is_rejected() {
        let td = tempdir().unwrap();
        let path = td.path().join("config.xml");
        fs::write(&path, "<config><int_rot>/x</int_rot></config>").unwrap();
        assert!(load_config_from_xml_path(&path).is_err());
    }

    #[test]
    fn template_parses_back() {
        let td = tempdir().unwrap();
        let path = td.path().join("nested").join("config.xml");
        create_template_config(&path).unwrap();
        let cfg = load_config_from_xml_path(&path).unwrap();
        assert_eq!(cfg.int_root, Config::default().int_root);
        assert_eq!(cfg.log_level, LogLevel::Normal);
    }
}
