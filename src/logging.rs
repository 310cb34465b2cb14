//! Tracing initialization for the console binary.
//!
//! The console protocol owns stdout byte for byte, so every log layer writes
//! to stderr or to the optional log file. The verbosity comes from
//! [`LogLevel`] only; `RUST_LOG` is not consulted.

use anyhow::Result;
use chrono::Local;
use std::fmt as stdfmt;
use std::io;
use std::path::Path;
use storage_console::output as out;
use storage_console::platform::open_private_append;
use storage_console::{LogLevel, default_log_path, path_has_symlink_ancestor};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::Layer;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt as tsfmt;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry;
use tracing_subscriber::registry::Registry;
use tracing_subscriber::util::SubscriberInitExt;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// DD/MM/YY HH:MM:SS in local time.
struct ConsoleTime;

impl FormatTime for ConsoleTime {
    fn format_time(&self, w: &mut tsfmt::format::Writer<'_>) -> stdfmt::Result {
        write!(w, "{}", Local::now().format("%d/%m/%y %H:%M:%S"))
    }
}

/// `normal` stays at WARN so an interactive terminal only shows problems.
fn level_filter(lvl: &LogLevel) -> LevelFilter {
    match lvl {
        LogLevel::Quiet => LevelFilter::ERROR,
        LogLevel::Normal => LevelFilter::WARN,
        LogLevel::Info => LevelFilter::INFO,
        LogLevel::Debug => LevelFilter::TRACE,
    }
}

fn fmt_layer<W>(writer: W, json: bool, ansi: bool) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = tsfmt::layer().with_ansi(ansi).with_writer(writer);
    let format = tsfmt::format().with_timer(ConsoleTime).with_target(true);
    if json {
        layer.event_format(format.json()).boxed()
    } else {
        layer.event_format(format.compact()).boxed()
    }
}

/// Open the log file behind a non-blocking writer, or explain on stderr why not.
fn open_file_writer(path: &Path) -> Option<(NonBlocking, WorkerGuard)> {
    match path_has_symlink_ancestor(path) {
        Ok(false) => {}
        Ok(true) => {
            out::print_warn(&format!(
                "Refusing to log to {}: an ancestor directory is a symlink",
                path.display()
            ));
            return None;
        }
        Err(e) => {
            out::print_warn(&format!("Cannot inspect log path {}: {e}", path.display()));
            return None;
        }
    }

    match open_private_append(path) {
        Ok(file) => Some(tracing_appender::non_blocking(file)),
        Err(e) => {
            out::print_warn(&format!("Cannot open log file {}: {e}", path.display()));
            None
        }
    }
}

/// Install the global subscriber. The returned guard flushes the file writer
/// on drop and must outlive the session.
pub fn init_tracing(
    lvl: &LogLevel,
    log_file: Option<&Path>,
    json: bool,
) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::default().add_directive(level_filter(lvl).into());
    let mut layers: Vec<BoxedLayer> = vec![fmt_layer(io::stderr, json, out::stderr_is_tty())];
    let mut guard = None;

    if let Some(path) = log_file {
        match open_file_writer(path) {
            Some((writer, g)) => {
                layers.push(fmt_layer(writer, json, false));
                guard = Some(g);
            }
            None => {
                out::print_warn("File logging disabled; events still go to stderr.");
                if let Some(def) = default_log_path() {
                    out::print_info(&format!("The default log path is {}", def.display()));
                }
            }
        }
    }

    registry().with(layers).with(filter).try_init()?;
    Ok(guard)
}
