use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::{App, Command, Mode};

pub(super) fn handle_help(app: &mut App, key: KeyEvent) -> Command {
    let page = app.config.help_page_size.max(1);
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('h') | KeyCode::Char('?') => {
            app.mode = app.prev_mode.take().unwrap_or(Mode::List);
            return Command::None;
        }
        KeyCode::Up | KeyCode::Char('k') => app.help_offset = app.help_offset.saturating_sub(1),
        KeyCode::Down | KeyCode::Char('j') => app.help_offset = app.help_offset.saturating_add(1),
        KeyCode::PageUp => app.help_offset = app.help_offset.saturating_sub(page),
        KeyCode::PageDown => app.help_offset = app.help_offset.saturating_add(page),
        KeyCode::Char('g') | KeyCode::Home => app.help_offset = 0,
        KeyCode::Char('G') | KeyCode::End => app.help_offset = usize::MAX,
        _ => {}
    }
    app.clamp_help_offset();
    Command::None
}
