use anyhow::Result;

mod app;
mod logging;

fn main() -> Result<()> {
    let args = storage_console::cli::parse();
    app::run(args)
}
