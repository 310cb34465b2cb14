//! Interactive session loop.
//!
//! Reads one line at a time after a `>: ` prompt and routes it: `storage ...`
//! to the command dispatcher, `factory_reset` to the wipe prompt, plus `help`
//! and `exit`. Every command finishes before the next line is read.

use tracing::{debug, error};

use crate::args::read_word;
use crate::commands::{self, factory_reset};
use crate::console::Console;
use crate::errors::CommandError;
use crate::shutdown;
use crate::storage::Storage;

pub const PROMPT: &str = ">: ";

/// What the loop does after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

const SESSION_HELP: &str = "Commands:\r\n\
\tstorage <cmd> <path> <args>\t - storage maintenance, run `storage` alone for details\r\n\
\tfactory_reset\t - wipe both volumes\r\n\
\thelp\t - this list\r\n\
\texit\t - leave the console\r\n";

/// Handle one session line.
pub fn run_line(
    storage: &dyn Storage,
    console: &mut dyn Console,
    line: &str,
) -> Result<Flow, CommandError> {
    // An interrupt left over from the prompt must not cancel the next command.
    shutdown::reset();

    let mut rest = line;
    let Some(word) = read_word(&mut rest) else {
        return Ok(Flow::Continue);
    };
    match word.as_str() {
        "storage" => commands::dispatch(storage, console, rest)?,
        "factory_reset" => {
            if let Err(err) = factory_reset(storage, console) {
                commands::report(console, err)?;
            }
        }
        "help" | "?" => console.print(SESSION_HELP)?,
        "exit" | "quit" => return Ok(Flow::Exit),
        other => console.println(&format!("`{other}` command not found"))?,
    }
    Ok(Flow::Continue)
}

/// Prompt-read-dispatch until `exit` or end of input.
pub fn run_session(storage: &dyn Storage, console: &mut dyn Console) -> Result<(), CommandError> {
    loop {
        console.print(PROMPT)?;
        let Some(line) = console.read_line()? else {
            debug!("end of input, closing session");
            console.print("\r\n")?;
            return Ok(());
        };
        match run_line(storage, console, &line) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Exit) => return Ok(()),
            Err(err) => {
                error!(error = %err, "console failed, closing session");
                return Err(err);
            }
        }
    }
}
