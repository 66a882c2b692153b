use ratatui::symbols::border;

use crate::tui::form::{
    DatePicker, FieldKind, FormField, FormKind, FormPhase, FormState, TextInput,
};
use crate::tui::theme::{Theme, paint};
use crate::util::text::wrap_to_width;
use crate::util::unicode::{display_width, grapheme_at, next_grapheme_boundary};

use super::panel::render_panel;

pub const FORM_ACTIONS: &str = "[enter] Next  [esc] Cancel";
pub const FORM_HINTS: &str = "[\u{2191}/\u{2193}, j/k]: move fields  [i]: insert  [enter]: next/save  [esc]: exit/close  [space]: toggle  date: h/l segment  +/- change  t current time  x clear";

/// Modal width and height for a screen
pub fn modal_size(width: usize, height: usize) -> (usize, usize) {
    let box_w = (width * 2 / 3).max(50).min(width.saturating_sub(4));
    let box_h = (height / 2).max(10);
    (box_w, box_h)
}

/// The Add/Edit modal as a bordered block
pub fn render_form(form: &FormState, theme: &Theme, width: usize, height: usize) -> String {
    let (box_w, box_h) = modal_size(width, height);
    let inner_w = box_w.saturating_sub(2);
    let inner_h = box_h.saturating_sub(2);

    let focused = form.current_field();
    let mut lines: Vec<String> = form
        .fields()
        .iter()
        .map(|&field| field_line(form, field, field == focused, theme, inner_w))
        .collect();
    lines.push(FORM_ACTIONS.to_string());

    // Key hints fill whatever rows the fields leave, aligned to the bottom
    let hints: Vec<String> = wrap_to_width(FORM_HINTS, inner_w).collect();
    lines.truncate(inner_h);
    let shown = hints.len().min(inner_h - lines.len());
    lines.resize(inner_h - shown, String::new());
    lines.extend(hints[..shown].iter().map(|l| paint(theme.hint, l)));

    let title = match form.kind {
        FormKind::Add => "Add Task",
        FormKind::Edit => "Edit Task",
    };
    render_panel(
        &border::ROUNDED,
        theme.modal_border,
        theme.modal_text,
        box_w,
        box_h,
        title,
        &lines.join("\n"),
        None,
    )
}

fn field_line(
    form: &FormState,
    field: FormField,
    focused: bool,
    theme: &Theme,
    inner_w: usize,
) -> String {
    let cursor = if focused { ">" } else { " " };
    let label = field.label();
    let value = match field.kind() {
        FieldKind::Status => format!("[{}]", form.status.as_str()),
        FieldKind::Toggle(flag) => checkbox(form.flag(flag)).to_string(),
        FieldKind::Date(slot) => date_value(form.picker(slot), focused, theme),
        FieldKind::Text(slot) => {
            let prefix_w = display_width(cursor) + display_width(label) + 3;
            let editing = focused && form.phase == FormPhase::Editing;
            text_value(
                form.text(slot),
                label,
                editing,
                theme,
                inner_w.saturating_sub(prefix_w),
            )
        }
    };
    format!("{cursor} {}: {value}", paint(theme.label, label))
}

fn checkbox(checked: bool) -> &'static str {
    if checked { "[x]" } else { "[ ]" }
}

/// `(empty)` or `YYYY-MM-DD HH:MM`, with the active segment marked while focused
fn date_value(picker: &DatePicker, focused: bool, theme: &Theme) -> String {
    if !picker.enabled {
        return "(empty)".to_string();
    }
    let mut parts = picker.parts();
    if focused {
        let idx = picker.segment.index();
        parts[idx] = paint(theme.date_segment, &parts[idx]);
    }
    let [y, mo, d, h, mi] = parts;
    format!("{y}-{mo}-{d} {h}:{mi}")
}

/// Text value, placeholder when empty, cursor cell while editing.
/// While editing, leading text scrolls off so the cursor stays within `avail`.
fn text_value(
    input: &TextInput,
    label: &str,
    editing: bool,
    theme: &Theme,
    avail: usize,
) -> String {
    if !editing {
        if input.value.is_empty() {
            return paint(theme.placeholder, label);
        }
        return input.value.clone();
    }

    let mut start = 0;
    let budget = avail.saturating_sub(1).max(1);
    while display_width(&input.value[start..input.cursor]) >= budget {
        match next_grapheme_boundary(&input.value, start) {
            Some(next) if next <= input.cursor => start = next,
            _ => break,
        }
    }

    let under = grapheme_at(&input.value, input.cursor);
    let after_start = input.cursor + under.len();
    let cell = if under.is_empty() { " " } else { under };
    format!(
        "{}{}{}",
        &input.value[start..input.cursor],
        paint(theme.cursor, cell),
        &input.value[after_start..]
    )
}
