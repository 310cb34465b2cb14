//! Runtime settings and the verbosity scale.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::EXT_LABEL_DEFAULT;
use super::paths;

/// Console verbosity. Only `info` and `debug` show per-command events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Quiet,
    #[default]
    Normal,
    Info,
    Debug,
}

/// Accepted spellings, matched case-insensitively. The first name of each
/// level is its canonical form.
const LEVEL_NAMES: &[(&str, LogLevel)] = &[
    ("quiet", LogLevel::Quiet),
    ("error", LogLevel::Quiet),
    ("none", LogLevel::Quiet),
    ("normal", LogLevel::Normal),
    ("warn", LogLevel::Normal),
    ("info", LogLevel::Info),
    ("verbose", LogLevel::Info),
    ("detailed", LogLevel::Info),
    ("debug", LogLevel::Debug),
    ("trace", LogLevel::Debug),
];

impl LogLevel {
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        LEVEL_NAMES
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(s))
            .map(|&(_, level)| level)
    }

    pub fn as_str(self) -> &'static str {
        LEVEL_NAMES
            .iter()
            .find(|&&(_, level)| level == self)
            .map(|&(name, _)| name)
            .unwrap_or("normal")
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown log level '{s}' (quiet|normal|info|debug)"))
    }
}

/// Where the two volumes live on the host, and how the console reports itself.
#[derive(Debug, Clone)]
pub struct Config {
    /// Backs `/int`.
    pub int_root: PathBuf,
    /// Backs `/ext` and `/any`.
    pub ext_root: PathBuf,
    pub ext_label: String,
    /// Shown as the `/int` label; `Unknown` when unset.
    pub device_name: Option<String>,
    pub log_level: LogLevel,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        let data = paths::default_data_dir().unwrap_or_else(|| PathBuf::from("storage_console"));
        Self::new(data.join("int"), data.join("ext"))
    }
}

impl Config {
    pub fn new(int_root: impl Into<PathBuf>, ext_root: impl Into<PathBuf>) -> Self {
        Self {
            int_root: int_root.into(),
            ext_root: ext_root.into(),
            ext_label: EXT_LABEL_DEFAULT.to_string(),
            device_name: None,
            log_level: LogLevel::default(),
            log_file: None,
        }
    }
}
