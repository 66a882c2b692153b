use chrono::{DateTime, Local};
use crossterm::event::KeyEvent;

use crate::tui::app::{App, Command, Mode};
use crate::tui::form::FormOutcome;

pub(super) fn handle_form(app: &mut App, key: KeyEvent, now: DateTime<Local>) -> Command {
    let Some(form) = app.form.as_mut() else {
        app.mode = Mode::List;
        return Command::None;
    };

    match form.handle_key(key, now) {
        FormOutcome::Stay => Command::None,
        FormOutcome::Invalid(e) => {
            app.set_error(e.to_string());
            Command::None
        }
        FormOutcome::Cancel => {
            close_form(app);
            Command::None
        }
        FormOutcome::Submit => {
            let form = form.clone();
            match form.apply(&mut app.tasks, now) {
                Ok(()) => {
                    close_form(app);
                    app.clamp_selection();
                    Command::Persist
                }
                Err(e) => {
                    app.set_error(e.to_string());
                    Command::None
                }
            }
        }
    }
}

fn close_form(app: &mut App) {
    app.form = None;
    app.mode = Mode::List;
    app.status = None;
}
