mod form;
mod help;
mod list;

use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent};

use super::app::{App, Command, Mode};

use form::handle_form;
use help::handle_help;
use list::handle_list;

/// Handle a key event in the current mode
pub fn handle_key(app: &mut App, key: KeyEvent, now: DateTime<Local>) -> Command {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return Command::None;
    }

    match app.mode {
        Mode::List => handle_list(app, key, now),
        Mode::Form => handle_form(app, key, now),
        Mode::Help => handle_help(app, key),
    }
}

/// Switch to Help, remembering where to return
pub(super) fn open_help(app: &mut App) {
    app.prev_mode = Some(app.mode);
    app.mode = Mode::Help;
    app.help_offset = 0;
}
