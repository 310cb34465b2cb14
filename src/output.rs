//! Host-side status messages.
//!
//! Stdout belongs to the console protocol, so these go to stderr with a
//! short tag. The tag is colored only when stderr is a terminal.

use owo_colors::{AnsiColors, OwoColorize};

pub fn stderr_is_tty() -> bool {
    atty::is(atty::Stream::Stderr)
}

fn emit(tag: &str, color: AnsiColors, msg: &str) {
    if stderr_is_tty() {
        eprintln!("{} {msg}", tag.color(color).bold());
    } else {
        eprintln!("{tag} {msg}");
    }
}

pub fn print_info(msg: &str) {
    emit("info:", AnsiColors::Cyan, msg);
}

pub fn print_warn(msg: &str) {
    emit("warn:", AnsiColors::Yellow, msg);
}

pub fn print_error(msg: &str) {
    emit("error:", AnsiColors::Red, msg);
}

pub fn print_success(msg: &str) {
    emit("ok:", AnsiColors::Green, msg);
}
