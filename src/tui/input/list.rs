use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::ops::task_ops::{remove_at, toggle_done_at};
use crate::tui::app::{App, Command, Mode};
use crate::tui::form::FormState;

use super::open_help;

pub(super) fn handle_list(app: &mut App, key: KeyEvent, now: DateTime<Local>) -> Command {
    app.status = None;

    match (key.modifiers, key.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) | (_, KeyCode::Char('q')) => Command::Quit,
        (_, KeyCode::Char('h') | KeyCode::Char('?')) => {
            open_help(app);
            Command::None
        }
        (_, KeyCode::Up | KeyCode::Char('k')) => {
            app.selected = app.selected.saturating_sub(1);
            Command::None
        }
        (_, KeyCode::Down | KeyCode::Char('j')) => {
            let len = app.visible_indices().len();
            if app.selected + 1 < len {
                app.selected += 1;
            }
            Command::None
        }
        (_, KeyCode::Tab) => {
            app.quadrant = (app.quadrant + 1) % 4;
            app.selected = 0;
            Command::None
        }
        (_, KeyCode::BackTab) => {
            app.quadrant = (app.quadrant + 3) % 4;
            app.selected = 0;
            Command::None
        }
        (_, KeyCode::Char('a')) => {
            app.form = Some(FormState::for_add(now));
            app.mode = Mode::Form;
            Command::None
        }
        (_, KeyCode::Char('e')) => {
            if let Some(idx) = app.selected_index() {
                app.form = Some(FormState::for_edit(&app.tasks[idx], now));
                app.mode = Mode::Form;
            }
            Command::None
        }
        (_, KeyCode::Char('d')) => match app.selected_index() {
            Some(idx) if toggle_done_at(&mut app.tasks, idx).is_ok() => Command::Persist,
            _ => Command::None,
        },
        (_, KeyCode::Char('x')) => match app.selected_index() {
            Some(idx) if remove_at(&mut app.tasks, idx).is_ok() => {
                app.clamp_selection();
                Command::Persist
            }
            _ => Command::None,
        },
        _ => Command::None,
    }
}
