//! CLI definition and parsing.
//! Defines Args and provides parse() for command-line handling.
//!
//! Notes:
//! - --debug is a shorthand for --log-level debug.
//! - Anything after the flags is a single storage command run in one-shot mode.

use clap::{Parser, ValueHint};
use std::path::PathBuf;

use crate::config::types::{Config, LogLevel};

/// CLI flags override config values (which are loaded from XML if present).
#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Interactive maintenance console for the /int and /ext storage volumes"
)]
pub struct Args {
    /// Override the host directory backing /int.
    #[arg(long, value_hint = ValueHint::DirPath, help = "Override the host directory backing /int")]
    pub int_root: Option<PathBuf>,

    /// Override the host directory backing /ext and /any.
    #[arg(long, value_hint = ValueHint::DirPath, help = "Override the host directory backing /ext")]
    pub ext_root: Option<PathBuf>,

    /// Enable debug logging (equivalent to `--log-level debug`).
    #[arg(
        short = 'd',
        long,
        help = "Enable debug logging (shorthand for --log-level debug)"
    )]
    pub debug: bool,

    /// Set log level. One of: quiet, normal, info, debug.
    #[arg(long, help = "Set log level: quiet, normal, info, debug")]
    pub log_level: Option<String>,

    /// Also write logs to this file.
    #[arg(long, value_hint = ValueHint::FilePath, help = "Also write logs to this file")]
    pub log_file: Option<PathBuf>,

    /// Emit logs in structured JSON (includes timestamp, level, and structured fields).
    #[arg(long, help = "Emit logs in structured JSON")]
    pub json: bool,

    /// Print where storage_console will look for the config file, then exit.
    #[arg(
        long,
        help = "Print the config file location used by storage_console and exit"
    )]
    pub print_config: bool,

    /// Run one storage command and exit, e.g. `list /ext`.
    #[arg(
        value_name = "COMMAND",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub command: Vec<String>,
}

impl Args {
    /// Effective log level derived from flags.
    /// Precedence: --debug > --log-level value > None (use config default).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level.as_deref().and_then(LogLevel::parse)
    }

    /// Apply CLI overrides to a loaded Config (in-place). No-ops for unset flags.
    pub fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(root) = &self.int_root {
            cfg.int_root = root.clone();
        }
        if let Some(root) = &self.ext_root {
            cfg.ext_root = root.clone();
        }
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
        if let Some(file) = &self.log_file {
            cfg.log_file = Some(file.clone());
        }
    }

    /// The one-shot command as a session line, `None` for interactive mode.
    ///
    /// Words containing whitespace are re-quoted so paths survive the shell
    /// splitting. A leading `storage` is optional.
    pub fn command_line(&self) -> Option<String> {
        let first = self.command.first()?;
        let words = self.command.iter().map(|w| {
            if w.chars().any(char::is_whitespace) {
                format!("\"{w}\"")
            } else {
                w.clone()
            }
        });
        let joined = words.collect::<Vec<_>>().join(" ");
        if first == "storage" || first == "factory_reset" {
            Some(joined)
        } else {
            Some(format!("storage {joined}"))
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let args = Args::try_parse_from([
            "storage_console",
            "--int-root",
            "/srv/int",
            "--log-level",
            "info",
            "--log-file",
            "/tmp/sc.log",
        ])
        .unwrap();
        let mut cfg = Config::new("/a", "/b");
        args.apply_overrides(&mut cfg);
        assert_eq!(cfg.int_root, PathBuf::from("/srv/int"));
        assert_eq!(cfg.ext_root, PathBuf::from("/b"));
        assert_eq!(cfg.log_level, LogLevel::Info);
        assert_eq!(cfg.log_file, Some(PathBuf::from("/tmp/sc.log")));
    }

    #[test]
    fn debug_beats_log_level() {
        let args =
            Args::try_parse_from(["storage_console", "--log-level", "quiet", "-d"]).unwrap();
        assert_eq!(args.effective_log_level(), Some(LogLevel::Debug));
    }

    #[test]
    fn one_shot_command_line() {
        let args = Args::try_parse_from(["storage_console"]).unwrap();
        assert_eq!(args.command_line(), None);

        let args =
            Args::try_parse_from(["storage_console", "read_chunks", "/ext/my file", "64"]).unwrap();
        assert_eq!(
            args.command_line().as_deref(),
            Some("storage read_chunks \"/ext/my file\" 64")
        );

        let args = Args::try_parse_from(["storage_console", "storage", "list", "/"]).unwrap();
        assert_eq!(args.command_line().as_deref(), Some("storage list /"));
    }
}
