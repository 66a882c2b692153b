use crate::util::text::{fit_to_width, pad_to_width, split_at_column, visible_width};

/// Lines of `s` padded to `width`, with blank rows added up to `height`.
/// Longer input keeps its extra rows.
pub fn pad_to_size(s: &str, width: usize, height: usize) -> Vec<String> {
    let mut lines: Vec<String> = s.split('\n').map(|l| pad_to_width(l, width)).collect();
    while lines.len() < height {
        lines.push(" ".repeat(width));
    }
    lines
}

/// Exactly `height` lines, each exactly `width` cells
pub fn pad_to_screen(s: &str, width: usize, height: usize) -> String {
    let mut lines = pad_to_size(s, width, height);
    lines.truncate(height);
    lines
        .iter()
        .map(|l| fit_to_width(l, width))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Center `modal` over `base` on a `width` x `height` screen.
///
/// The modal's size is taken from its own lines. Odd remainders round toward
/// the top-left. Modal rows past the bottom of the screen are dropped; outside
/// the modal's box the base is left untouched.
pub fn overlay_center(base: &str, modal: &str, width: usize, height: usize) -> String {
    let mut rows = pad_to_size(base, width, height);
    rows.truncate(height);

    let modal_lines: Vec<&str> = modal.split('\n').collect();
    let modal_w = modal_lines.iter().map(|l| visible_width(l)).max().unwrap_or(0);
    let modal_h = modal_lines.len();
    if modal_w == 0 || width == 0 || height == 0 {
        return rows.join("\n");
    }

    let start_x = width.saturating_sub(modal_w) / 2;
    let start_y = height.saturating_sub(modal_h) / 2;
    for (i, line) in modal_lines.iter().enumerate() {
        let Some(row) = rows.get_mut(start_y + i) else {
            break;
        };
        let (left, right) = split_at_column(row, start_x, modal_w);
        *row = format!("{left}{}{right}", pad_to_width(line, modal_w));
    }
    rows.join("\n")
}
