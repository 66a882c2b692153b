use ratatui::symbols::border;

use crate::model::task::Task;
use crate::ops::quadrant::{Quadrant, indices_in};
use crate::tui::app::App;
use crate::tui::theme::paint;
use crate::util::text::{join_horizontal, truncate_to_width};

use super::panel::render_panel;

pub const BOARD_HINTS: &str = "[\u{2191}/\u{2193} or j/k] Move  [a] Add  [e] Edit  [d] Done  [x] Delete  [tab] Next Quadrant  [shift+tab] Prev  [h] Help  [q] Quit";

const GAP: usize = 1;
const FOOTER_ROWS: usize = 1;
const NO_TASKS: &str = "(no tasks)";

/// Size of each of the four quadrant panels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardGeometry {
    pub box_w: usize,
    pub box_h: usize,
}

impl BoardGeometry {
    pub fn for_screen(width: usize, height: usize) -> Self {
        let half_w = width.saturating_sub(GAP) / 2;
        let mut box_w = half_w.max(10);
        if 2 * box_w + GAP > width {
            box_w = half_w.max(1);
        }
        let half_h = height.saturating_sub(FOOTER_ROWS) / 2;
        let mut box_h = half_h.max(5);
        if 2 * box_h + FOOTER_ROWS > height {
            box_h = half_h.max(3);
        }
        BoardGeometry { box_w, box_h }
    }
}

/// One board row: cursor marker, checkbox, title and optional due time
pub fn task_line(task: &Task, selected: bool) -> String {
    let cursor = if selected { ">" } else { " " };
    let title = task.title.replace(['\n', '\r', '\t'], " ");
    let due = task
        .due_at
        .map(|d| format!(" (due {})", d.format("%Y-%m-%d %H:%M")))
        .unwrap_or_default();
    format!("{cursor} {} {title}{due}", task.status.checkbox())
}

/// The 2x2 grid plus the footer line
pub fn render_board(app: &App) -> String {
    let (width, height) = app.screen_size();
    let geo = BoardGeometry::for_screen(width, height);
    let boxes: Vec<String> = Quadrant::ALL
        .iter()
        .map(|&q| render_quadrant(app, q, geo))
        .collect();
    let gap = " ".repeat(GAP);
    let top = join_horizontal(&[&boxes[0], &gap, &boxes[1]]);
    let bottom = join_horizontal(&[&boxes[2], &gap, &boxes[3]]);
    format!("{top}\n{bottom}\n{}", footer(app, width))
}

fn render_quadrant(app: &App, quadrant: Quadrant, geo: BoardGeometry) -> String {
    let is_current = quadrant.index() == app.quadrant;
    let indices = indices_in(&app.tasks, quadrant);
    let lines: Vec<String> = if indices.is_empty() {
        vec![NO_TASKS.to_string()]
    } else {
        indices
            .iter()
            .enumerate()
            .map(|(row, &idx)| task_line(&app.tasks[idx], is_current && row == app.selected))
            .collect()
    };

    let (border_style, text_style) = app.theme.quadrant(quadrant.index(), is_current);
    render_panel(
        &border::ROUNDED,
        border_style,
        text_style,
        geo.box_w,
        geo.box_h,
        &quadrant.title().to_uppercase(),
        &lines.join("\n"),
        is_current.then_some(app.selected),
    )
}

fn footer(app: &App, width: usize) -> String {
    let theme = &app.theme;
    let mut parts = Vec::new();
    match (&app.status, app.last_saved) {
        (Some(status), _) => parts.push(paint(theme.error, status)),
        (None, Some(at)) => {
            parts.push(paint(theme.footer, &format!("saved {}", at.format("%H:%M:%S"))))
        }
        (None, None) => {}
    }
    if app.config.show_key_hints {
        parts.push(paint(theme.hint, BOARD_HINTS));
    }
    truncate_to_width(&parts.join("  "), width)
}
