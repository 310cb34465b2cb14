//! `storage` command dispatcher.
//!
//! A line is `<verb> <path> [<args>]`. The verb is looked up in a fixed table
//! (exact match, table order); the handler gets the storage, the console and
//! the parsed command, and owns whatever handles it opens until it returns.
//! The dispatcher never touches storage itself.

mod listing;
mod manage;
mod transfer;
mod volume;

pub use volume::factory_reset;

use tracing::debug;

use crate::args::{read_probably_quoted, read_word};
use crate::console::Console;
use crate::errors::CommandError;
use crate::storage::Storage;

/// One parsed `storage` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub verb: String,
    pub path: String,
    /// Unparsed remainder, trimmed.
    pub rest_args: String,
}

impl Command {
    /// Split a line into verb, path and the remaining arguments.
    ///
    /// `None` when the verb or the path is missing or malformed.
    pub fn parse(line: &str) -> Option<Self> {
        let mut args = line;
        let verb = read_word(&mut args)?;
        let path = read_probably_quoted(&mut args)?;
        Some(Self {
            verb,
            path,
            rest_args: args.trim().to_string(),
        })
    }
}

pub type Handler = fn(&dyn Storage, &mut dyn Console, &Command) -> Result<(), CommandError>;

/// Recognized verbs in lookup order.
pub const COMMANDS: &[(&str, Handler)] = &[
    ("info", volume::info),
    ("format", volume::format),
    ("list", listing::list),
    ("tree", listing::tree),
    ("read", transfer::read),
    ("read_chunks", transfer::read_chunks),
    ("write", transfer::write),
    ("write_chunk", transfer::write_chunk),
    ("copy", manage::copy),
    ("remove", manage::remove),
    ("rename", manage::rename),
    ("migrate", manage::migrate),
    ("mkdir", manage::mkdir),
    ("md5", manage::md5),
    ("stat", volume::stat),
    ("timestamp", volume::timestamp),
];

pub fn lookup(verb: &str) -> Option<Handler> {
    COMMANDS
        .iter()
        .find(|(name, _)| *name == verb)
        .map(|(_, handler)| *handler)
}

/// Run one `storage` command line.
///
/// Usage and storage failures are rendered on the console and count as
/// handled. Only a console transport failure is returned.
pub fn dispatch(
    storage: &dyn Storage,
    console: &mut dyn Console,
    line: &str,
) -> Result<(), CommandError> {
    let Some(command) = Command::parse(line) else {
        debug!(line, "malformed command line");
        print_usage(console)?;
        return Ok(());
    };
    let Some(handler) = lookup(&command.verb) else {
        debug!(verb = %command.verb, "unknown verb");
        print_usage(console)?;
        return Ok(());
    };

    debug!(verb = %command.verb, path = %command.path, args = %command.rest_args, "dispatch");
    match handler(storage, console, &command) {
        Ok(()) => Ok(()),
        Err(err) => report(console, err),
    }
}

/// Render a handler failure. Console failures are passed back up.
pub fn report(console: &mut dyn Console, err: CommandError) -> Result<(), CommandError> {
    if err.is_fatal() {
        return Err(err);
    }
    match err {
        CommandError::Usage => print_usage(console)?,
        other => {
            debug!(error = %other, "command failed");
            console.println(&other.to_string())?;
        }
    }
    Ok(())
}

const USAGE: &str = "Usage:\r\n\
storage <cmd> <path> <args>\r\n\
The path must start with /int or /ext\r\n\
Cmd list:\r\n\
\tinfo\t - get FS info\r\n\
\tformat\t - format filesystem\r\n\
\tlist\t - list files and dirs\r\n\
\ttree\t - list files and dirs, recursive\r\n\
\tremove\t - delete the file or directory\r\n\
\tread\t - read text from file and print file size and content to cli\r\n\
\tread_chunks\t - read data from file and print file size and content to cli, <args> should contain how many bytes you want to read in block\r\n\
\twrite\t - read text from cli and append it to file, stops by ctrl+c\r\n\
\twrite_chunk\t - read data from cli and append it to file, <args> should contain how many bytes you want to write\r\n\
\tcopy\t - copy file to new file, <args> must contain new path\r\n\
\trename\t - move file to new file, <args> must contain new path\r\n\
\tmigrate\t - move folder to new path, renaming already present files by adding numbers to the end\r\n\
\tmkdir\t - creates a new directory\r\n\
\tmd5\t - md5 hash of the file\r\n\
\tstat\t - info about file or dir\r\n\
\ttimestamp\t - last modification timestamp\r\n";

pub fn print_usage(console: &mut dyn Console) -> Result<(), CommandError> {
    console.print(USAGE)?;
    Ok(())
}

/// Second possibly-quoted path from the trailing arguments.
fn second_path(command: &Command) -> Result<String, CommandError> {
    let mut args = command.rest_args.as_str();
    read_probably_quoted(&mut args).ok_or(CommandError::Usage)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_splits_verb_path_and_rest() {
        let cmd = Command::parse("copy \"/ext/a b.txt\"  /int/c.txt ").unwrap();
        assert_eq!(cmd.verb, "copy");
        assert_eq!(cmd.path, "/ext/a b.txt");
        assert_eq!(cmd.rest_args, "/int/c.txt");

        assert_eq!(Command::parse("list"), None);
        assert_eq!(Command::parse("   "), None);
        assert_eq!(Command::parse("list \"/ext"), None);
    }

    #[test]
    fn table_is_complete_and_unique() {
        let names: Vec<&str> = COMMANDS.iter().map(|(n, _)| *n).collect();
        assert_eq!(
            names,
            [
                "info",
                "format",
                "list",
                "tree",
                "read",
                "read_chunks",
                "write",
                "write_chunk",
                "copy",
                "remove",
                "rename",
                "migrate",
                "mkdir",
                "md5",
                "stat",
                "timestamp"
            ]
        );
        assert!(lookup("read_chunk").is_none());
        assert!(lookup("READ").is_none());
    }

    #[test]
    fn usage_lists_every_verb() {
        for (name, _) in COMMANDS {
            assert!(USAGE.contains(&format!("\t{name}\t")), "{name} missing");
        }
    }
}
