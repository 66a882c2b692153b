mod board;
pub use board::{CORRUPT_WARNING, bootstrap, cmd_board};

use std::path::Path;

use chrono::Local;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::store::{FileStore, load_tasks};
use crate::ops::task_ops::promote_urgent;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let data_dir = config_io::resolve_data_dir(cli.data_dir.as_deref())?;
    match cli.command {
        None => cmd_board(&data_dir),
        Some(Commands::List) => cmd_list(&data_dir, cli.json),
    }
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(data_dir: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let now = Local::now();
    let store = FileStore::in_dir(data_dir);
    let loaded = load_tasks(&store, now)?;
    if loaded.corrupt.is_some() {
        eprintln!("warning: {} is corrupt; listing nothing", store.path().display());
    }
    let mut tasks = loaded.tasks;
    promote_urgent(&mut tasks, now);

    if json {
        println!("{}", serde_json::to_string_pretty(&board_to_json(&tasks))?);
    } else {
        for line in format_board_listing(&tasks) {
            println!("{}", line);
        }
    }
    Ok(())
}
