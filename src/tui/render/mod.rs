pub mod ansi_screen;
pub mod board;
pub mod form_view;
pub mod help_view;
pub mod overlay;
pub mod panel;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;

use super::app::{App, Mode};
use ansi_screen::AnsiScreen;
use board::render_board;
use form_view::render_form;
use help_view::render_help;
use overlay::{overlay_center, pad_to_screen};

/// The full screen for the current mode as ANSI-styled text,
/// exactly `height` lines of `width` cells.
pub fn compose_screen(app: &App) -> String {
    let (width, height) = app.screen_size();
    let screen = match (app.mode, &app.form) {
        (Mode::Help, _) => render_help(app),
        (Mode::Form, Some(form)) => overlay_center(
            &render_board(app),
            &render_form(form, &app.theme, width, height),
            width,
            height,
        ),
        _ => render_board(app),
    };
    pad_to_screen(&screen, width, height)
}

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let screen = compose_screen(app);
    frame.render_widget(AnsiScreen::new(&screen), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::form::FormState;
    use crate::util::text::{strip_ansi, visible_width};
    use chrono::{Local, TimeZone};
    use insta::assert_snapshot;
    use test_helpers::*;

    #[test]
    fn screen_is_exact_size_in_every_mode() {
        let now = Local.with_ymd_and_hms(2025, 1, 5, 13, 0, 0).unwrap();
        for (w, h) in [(80, 24), (120, 40), (30, 8), (200, 12)] {
            let mut app =
                app_with_tasks(vec![task("A rather long title for a narrow box", true, true)]);
            app.width = w;
            app.height = h;
            for mode in [Mode::List, Mode::Form, Mode::Help] {
                app.mode = mode;
                app.form = (mode == Mode::Form).then(|| FormState::for_add(now));
                let screen = compose_screen(&app);
                let rows: Vec<&str> = screen.split('\n').collect();
                assert_eq!(rows.len(), h, "{mode:?} at {w}x{h}");
                for row in rows {
                    assert_eq!(visible_width(row), w, "{mode:?} at {w}x{h}: {:?}", strip_ansi(row));
                }
            }
        }
    }

    #[test]
    fn form_overlays_board() {
        let now = Local.with_ymd_and_hms(2025, 1, 5, 13, 0, 0).unwrap();
        let mut app = app_with_tasks(vec![task("Fix outage", true, true)]);
        app.mode = Mode::Form;
        app.form = Some(FormState::for_add(now));
        let output = render_to_string(TERM_W, TERM_H, |frame, _area| render(frame, &app));
        let lines: Vec<&str> = output.lines().collect();
        // board rows above the modal are untouched
        assert!(lines[0].starts_with("╭"));
        assert!(lines[1].starts_with("│> [ ] Fix outage"));
        // 53x12 modal centered at column 13, row 6
        assert!(lines[6].contains("╭──────────────────── Add Task ─────────────────────╮"));
        assert_eq!(lines[6].chars().position(|c| c == '╭'), Some(13));
    }

    #[test]
    fn small_board_snapshot() {
        let mut app = app_with_tasks(vec![
            task("Fix outage", true, true),
            task("Write plan", true, false),
            task("Renew cert", false, true),
        ]);
        app.width = 44;
        app.height = 11;
        let output = render_to_string(44, 11, |frame, _area| render(frame, &app));
        assert_snapshot!(output, @r"
        ╭ IMPORTANT & IMME… ╮ ╭ IMPORTANT & NOT … ╮
        │> [ ] Fix outage   │ │  [ ] Write plan   │
        │                   │ │                   │
        │                   │ │                   │
        ╰───────────────────╯ ╰───────────────────╯
        ╭ NOT IMPORTANT & … ╮ ╭ NOT IMPORTANT & … ╮
        │  [ ] Renew cert   │ │(no tasks)         │
        │                   │ │                   │
        │                   │ │                   │
        ╰───────────────────╯ ╰───────────────────╯
        [↑/↓ or j/k] Move  [a] Add  [e] Edit  [d] Do
        ");
    }
}
