//! Core library for `storage_console`.
//!
//! An interactive, line-oriented maintenance console for two storage volumes:
//! `/int` (internal store) and `/ext` (removable card). Command handlers talk
//! to the [`storage::Storage`] and [`console::Console`] traits only; the binary
//! wires them to [`storage::LocalStorage`] and the process stdin/stdout.

pub mod args;
pub mod cli;
pub mod commands;
pub mod config;
pub mod console;
pub mod errors;
pub mod fs_ops;
pub mod output;
pub mod platform;
pub mod session;
pub mod shutdown;
pub mod storage;
pub mod volume;

pub use commands::{COMMANDS, Command, dispatch};
pub use config::{
    Config, LogLevel, default_config_path, default_log_path, path_has_symlink_ancestor,
};
pub use console::{Console, ETX, MemoryConsole, StdConsole, StreamConsole};
pub use errors::{CommandError, FsError, FsResult};
pub use session::{Flow, run_line, run_session};
pub use storage::{LocalStorage, Storage};
pub use volume::VolumePath;
