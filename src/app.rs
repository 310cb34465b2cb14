//! Application orchestrator.
//! Loads/merges config, initializes logging, installs the interrupt handler,
//! validates the volume roots, and runs either one command or the interactive session.

use anyhow::{Context, Result};
use tracing::{debug, info};

use storage_console::cli::Args;
use storage_console::config::{CONFIG_ENV_VAR, LoadResult, default_config_path, load_or_init};
use storage_console::output as out;
use storage_console::{Config, LocalStorage, StdConsole, run_line, run_session, shutdown};

use crate::logging::init_tracing;

fn print_config_location() {
    if let Ok(cfg_env) = std::env::var(CONFIG_ENV_VAR) {
        out::print_info(&format!("Using {CONFIG_ENV_VAR} (explicit):\n  {cfg_env}\n"));
        out::print_info(&format!(
            "To override, unset {CONFIG_ENV_VAR} or set it to another file."
        ));
        return;
    }
    match default_config_path() {
        Ok(p) => {
            out::print_info(&format!(
                "Default storage_console config path:\n  {}\n",
                p.display()
            ));
            if p.exists() {
                out::print_info("A config file already exists at that location.");
            } else {
                out::print_info(
                    "No config file exists there yet. Run without --print-config to create a template.",
                );
            }
        }
        Err(e) => {
            out::print_error(&format!("Could not determine a default config path: {e}"));
        }
    }
}

fn build_storage(cfg: &Config) -> LocalStorage {
    let storage = LocalStorage::new(&cfg.int_root, &cfg.ext_root).with_ext_label(&cfg.ext_label);
    match &cfg.device_name {
        Some(name) => storage.with_device_name(name),
        None => storage,
    }
}

/// Run the CLI application.
pub fn run(args: Args) -> Result<()> {
    // Handle --print-config before logging init
    if args.print_config {
        print_config_location();
        return Ok(());
    }

    let loaded = load_or_init()?;
    if let LoadResult::CreatedTemplate(_, path) = &loaded {
        out::print_success(&format!(
            "A template storage_console config was written to: {}",
            path.display()
        ));
        out::print_info("Edit `int_root` and `ext_root` there to point the volumes elsewhere.");
    }
    let mut cfg = loaded.into_config();
    args.apply_overrides(&mut cfg);

    // Keep the guard alive until the end of run() so file logs are flushed.
    let _guard = init_tracing(&cfg.log_level, cfg.log_file.as_deref(), args.json).map_err(|e| {
        out::print_error(&format!("Failed to initialize logging: {e}"));
        e
    })?;

    // Ctrl+C becomes a cancel symbol for the running command instead of killing the process.
    ctrlc::set_handler(shutdown::request).context("failed to install interrupt handler")?;

    debug!("Starting storage_console: {:?}", args);

    cfg.validate()?;
    let storage = build_storage(&cfg);
    let mut console = StdConsole::new();

    match args.command_line() {
        Some(line) => {
            info!(line = %line, "one-shot command");
            run_line(&storage, &mut console, &line)?;
        }
        None => {
            info!(
                int = %cfg.int_root.display(),
                ext = %cfg.ext_root.display(),
                "interactive session started"
            );
            run_session(&storage, &mut console)?;
        }
    }
    Ok(())
}
