use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Parser;

use the_todo::editor::Editor;
use the_todo::prelude::{NAME, VERSION};

/// Terminal editor for markdown checkbox lists.
#[derive(Parser, Debug)]
#[command(name = NAME, version = VERSION, about)]
struct Cli {
    /// Markdown file to manage (defaults to todo.md, created on first save)
    path: Option<PathBuf>,

    /// Write debug logs to the-todo.log
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.debug
        && let Err(err) = setup_logging()
    {
        eprintln!("warning: failed to initialize logging: {err}");
    }

    let path = resolve_path(cli.path)?;
    let mut editor = Editor::new(path)?;
    editor.run();
    Ok(())
}

/// An explicitly given path must exist; the default is created lazily on the
/// first save so an empty session leaves nothing behind.
fn resolve_path(path: Option<PathBuf>) -> Result<PathBuf> {
    match path {
        Some(path) => {
            if !path.exists() {
                bail!("file {} does not exist", path.display());
            }
            Ok(path)
        }
        None => Ok(PathBuf::from("todo.md")),
    }
}

fn setup_logging() -> Result<()> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {}] {message}",
                record.level(),
                record.target()
            ))
        })
        .level(log::LevelFilter::Debug)
        .chain(fern::log_file(format!("{NAME}.log"))?)
        .apply()?;
    log::info!("logger initialized");
    Ok(())
}
