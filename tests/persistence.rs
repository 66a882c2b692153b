//! File-backed persistence: the board's writes survive a restart.

use std::fs;

use actnow::cli::handlers::{CORRUPT_WARNING, bootstrap};
use actnow::io::recovery::recovery_log_path;
use actnow::io::store::{FileStore, TASKS_FILE_NAME, TaskStore, encode_tasks, load_tasks};
use actnow::model::task::{Task, TaskStatus};
use actnow::tui::app::{App, AppEvent, Command, persist, update};
use chrono::{DateTime, Local, TimeZone};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn now() -> DateTime<Local> {
    Local.with_ymd_and_hms(2025, 1, 5, 13, 0, 0).unwrap()
}

#[test]
fn saves_create_the_data_directory() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("nested").join(".iimq");
    let store = FileStore::in_dir(&dir);

    let mut task = Task::new("Fix outage", true, true, now());
    task.impact = "customers".into();
    store.save(&encode_tasks(&[task.clone()]).unwrap()).unwrap();

    let text = fs::read_to_string(dir.join(TASKS_FILE_NAME)).unwrap();
    assert!(text.starts_with("[\n  {"));
    assert!(text.contains("\"impact\": \"customers\""));
    assert!(!text.contains("delegate_to"));

    let loaded = load_tasks(&store, now()).unwrap();
    assert!(loaded.corrupt.is_none());
    assert_eq!(loaded.tasks, vec![task]);
}

#[test]
fn missing_file_loads_as_empty_list() {
    let tmp = TempDir::new().unwrap();
    let store = FileStore::in_dir(tmp.path());
    assert_eq!(store.load().unwrap(), b"[]".to_vec());
    assert!(load_tasks(&store, now()).unwrap().tasks.is_empty());
}

#[test]
fn board_changes_survive_restart() {
    let tmp = TempDir::new().unwrap();
    let session = bootstrap(tmp.path(), now()).unwrap();
    let mut app = App::new(vec![Task::new("Write plan", true, false, now())], session.config);

    // second quadrant, mark done
    for code in [KeyCode::Tab, KeyCode::Char('d')] {
        let key = KeyEvent::new(code, KeyModifiers::NONE);
        let (next, command) = update(app, AppEvent::Key(key), now());
        app = next;
        if command == Command::Persist {
            persist(&mut app, &session.store, Some(&session.data_dir), now());
        }
    }
    assert_eq!(app.last_saved, Some(now()));

    let reopened = bootstrap(tmp.path(), now()).unwrap();
    assert!(reopened.warning.is_none());
    assert_eq!(reopened.tasks.len(), 1);
    assert_eq!(reopened.tasks[0].status, TaskStatus::Done);
}

#[test]
fn corrupt_file_starts_empty_and_keeps_raw_bytes() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(TASKS_FILE_NAME), "[{\"title\": ").unwrap();

    let session = bootstrap(tmp.path(), now()).unwrap();
    assert!(session.tasks.is_empty());
    assert_eq!(session.warning.as_deref(), Some(CORRUPT_WARNING));

    let log = fs::read_to_string(recovery_log_path(tmp.path())).unwrap();
    assert!(log.contains("[{\"title\": "));
    // the original file is left for the user to repair
    assert_eq!(
        fs::read_to_string(tmp.path().join(TASKS_FILE_NAME)).unwrap(),
        "[{\"title\": "
    );
}
