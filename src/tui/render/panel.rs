use crossterm::style::ContentStyle;
use ratatui::symbols::border;

use crate::tui::theme::paint;
use crate::util::text::fit_to_width;
use crate::util::unicode::{display_width, ellipsize};

/// Draw a titled box of exactly `height` rows by `width` cells.
///
/// Content lines are cut or padded to the interior width. When there are
/// more lines than interior rows, the window is centered on `focus` if given,
/// otherwise the head is shown. Sizes below 2 return `content` as is.
#[allow(clippy::too_many_arguments)]
pub fn render_panel(
    set: &border::Set,
    border_style: ContentStyle,
    text_style: ContentStyle,
    width: usize,
    height: usize,
    title: &str,
    content: &str,
    focus: Option<usize>,
) -> String {
    if width < 2 || height < 2 {
        return content.to_string();
    }
    let inner_w = width - 2;
    let inner_h = height - 2;

    let lines: Vec<&str> = content.split('\n').collect();
    let start = window_start(lines.len(), inner_h, focus);

    let mut rows = Vec::with_capacity(height);
    rows.push(top_border(set, border_style, inner_w, title));
    let left = paint(border_style, set.vertical_left);
    let right = paint(border_style, set.vertical_right);
    for i in 0..inner_h {
        let line = lines.get(start + i).copied().unwrap_or("");
        let body = fit_to_width(line, inner_w);
        rows.push(format!("{left}{}{right}", paint(text_style, &body)));
    }
    rows.push(paint(
        border_style,
        &format!(
            "{}{}{}",
            set.bottom_left,
            set.horizontal_bottom.repeat(inner_w),
            set.bottom_right
        ),
    ));
    rows.join("\n")
}

/// First visible line for a window of `rows` over `total` lines
pub fn window_start(total: usize, rows: usize, focus: Option<usize>) -> usize {
    match focus {
        Some(focus) if total > rows => focus.saturating_sub(rows / 2).min(total - rows),
        _ => 0,
    }
}

fn top_border(set: &border::Set, style: ContentStyle, inner_w: usize, title: &str) -> String {
    let title = if inner_w >= 4 && !title.is_empty() {
        format!(" {} ", ellipsize(title, inner_w - 2))
    } else {
        String::new()
    };
    let fill = inner_w - display_width(&title);
    let before = fill / 2;
    let after = fill - before;
    paint(
        style,
        &format!(
            "{}{}{}{}{}",
            set.top_left,
            set.horizontal_top.repeat(before),
            title,
            set.horizontal_top.repeat(after),
            set.top_right
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::text::{strip_ansi, visible_width};
    use pretty_assertions::assert_eq;

    fn plain(width: usize, height: usize, title: &str, content: &str) -> String {
        render_panel(
            &border::ROUNDED,
            ContentStyle::new(),
            ContentStyle::new(),
            width,
            height,
            title,
            content,
            None,
        )
    }

    #[test]
    fn small_box() {
        assert_eq!(
            plain(12, 4, "DO", "one\ntwo"),
            "╭─── DO ───╮\n│one       │\n│two       │\n╰──────────╯"
        );
    }

    #[test]
    fn long_title_is_ellipsized() {
        let out = plain(10, 3, "IMPORTANT & IMMEDIATE", "");
        let top = out.lines().next().unwrap();
        assert_eq!(top, "╭ IMPOR… ╮");
    }

    #[test]
    fn overflow_lines_are_clipped() {
        let out = plain(8, 4, "", "a\nb\nc\nd");
        assert_eq!(out, "╭──────╮\n│a     │\n│b     │\n╰──────╯");
    }

    #[test]
    fn focus_keeps_line_visible() {
        let content = (0..10).map(|i| i.to_string()).collect::<Vec<_>>().join("\n");
        let out = render_panel(
            &border::ROUNDED,
            ContentStyle::new(),
            ContentStyle::new(),
            5,
            5,
            "",
            &content,
            Some(9),
        );
        assert_eq!(out, "╭───╮\n│7  │\n│8  │\n│9  │\n╰───╯");
    }

    #[test]
    fn degenerate_sizes_return_content() {
        assert_eq!(plain(1, 10, "T", "raw"), "raw");
        assert_eq!(plain(10, 1, "T", "raw"), "raw");
    }

    #[test]
    fn every_row_has_exact_width() {
        let theme = crate::tui::theme::Theme::default();
        let content = "\x1b[1mwide 你好世界 glyphs\x1b[0m overflowing the panel\nshort";
        let out = render_panel(
            &border::ROUNDED,
            theme.selected_border,
            theme.selected_text,
            16,
            6,
            "TITLE",
            content,
            None,
        );
        let rows: Vec<&str> = out.split('\n').collect();
        assert_eq!(rows.len(), 6);
        for row in &rows {
            assert_eq!(visible_width(row), 16, "{:?}", strip_ansi(row));
        }
    }

    #[test]
    fn window_start_centers_focus() {
        assert_eq!(window_start(10, 4, Some(0)), 0);
        assert_eq!(window_start(10, 4, Some(5)), 3);
        assert_eq!(window_start(10, 4, Some(9)), 6);
        assert_eq!(window_start(3, 4, Some(2)), 0);
        assert_eq!(window_start(10, 4, None), 0);
    }
}
