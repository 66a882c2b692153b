use std::path::Path;

use chrono::{DateTime, Local};

use crate::io::config_io::read_config;
use crate::io::recovery::{RecoveryCategory, RecoveryEntry, log_recovery};
use crate::io::store::{FileStore, load_tasks};
use crate::tui::app::Session;

/// Footer message shown once when the task file could not be decoded
pub const CORRUPT_WARNING: &str = "Corrupt data detected; started empty";

/// Launch the interactive board
pub fn cmd_board(data_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let session = bootstrap(data_dir, Local::now())?;
    crate::tui::run(session)
}

/// Read config and tasks for a board session.
///
/// Undecodable task data is preserved in the recovery log and the session
/// starts empty with a one-time warning. Read and config errors are fatal.
pub fn bootstrap(
    data_dir: &Path,
    now: DateTime<Local>,
) -> Result<Session, Box<dyn std::error::Error>> {
    let config = read_config(data_dir)?;
    let store = FileStore::in_dir(data_dir);
    let loaded = load_tasks(&store, now)?;

    let warning = loaded.corrupt.map(|raw| {
        let entry = RecoveryEntry::new(RecoveryCategory::Corrupt, "task file could not be decoded")
            .field("path", store.path().display().to_string())
            .body(String::from_utf8_lossy(&raw));
        log_recovery(data_dir, entry);
        eprintln!("warning: {} is corrupt; starting empty", store.path().display());
        CORRUPT_WARNING.to_string()
    });

    Ok(Session {
        tasks: loaded.tasks,
        config: config.ui,
        data_dir: data_dir.to_path_buf(),
        store,
        warning,
    })
}
