use crate::tui::app::App;
use crate::tui::help::{HELP_FOOTER, HELP_HEADER, clamp_offset, viewport_height, wrapped_help};
use crate::tui::theme::paint;

use super::overlay::pad_to_screen;

/// Full-screen help: header, scrolled body, footer
pub fn render_help(app: &App) -> String {
    let (width, height) = app.screen_size();
    let theme = &app.theme;
    let lines = wrapped_help(width);
    let rows = viewport_height(height);
    let offset = clamp_offset(app.help_offset, width, height);

    let mut out = Vec::with_capacity(rows + 2);
    out.push(paint(theme.header, HELP_HEADER));
    for i in 0..rows {
        out.push(
            lines
                .get(offset + i)
                .map(|l| paint(theme.body, l))
                .unwrap_or_default(),
        );
    }
    out.push(paint(theme.footer, HELP_FOOTER));
    pad_to_screen(&out.join("\n"), width, height)
}
