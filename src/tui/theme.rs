use crossterm::style::{Color, ContentStyle, Stylize};

/// Fixed color roles for the board (256-color palette)
#[derive(Debug, Clone)]
pub struct Theme {
    /// Per-quadrant (border, text) styles in board order
    pub quadrants: [(ContentStyle, ContentStyle); 4],
    pub selected_border: ContentStyle,
    pub selected_text: ContentStyle,
    pub modal_border: ContentStyle,
    pub modal_text: ContentStyle,
    pub label: ContentStyle,
    pub placeholder: ContentStyle,
    pub cursor: ContentStyle,
    pub date_segment: ContentStyle,
    pub hint: ContentStyle,
    pub header: ContentStyle,
    pub footer: ContentStyle,
    pub body: ContentStyle,
    pub error: ContentStyle,
}

fn fg(code: u8) -> ContentStyle {
    ContentStyle::new().with(Color::AnsiValue(code))
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            quadrants: [
                (fg(196), fg(255)),
                (fg(160), fg(255)),
                (fg(220), fg(0)),
                (fg(27), fg(255)),
            ],
            selected_border: fg(214),
            selected_text: fg(229),
            modal_border: fg(214),
            modal_text: fg(255),
            label: fg(220),
            placeholder: fg(240),
            cursor: ContentStyle::new().reverse(),
            date_segment: ContentStyle::new().bold().underlined(),
            hint: fg(255),
            header: fg(214).bold(),
            footer: fg(245),
            body: fg(255),
            error: fg(196).bold(),
        }
    }
}

impl Theme {
    /// (border, text) styles for a quadrant panel
    pub fn quadrant(&self, index: usize, selected: bool) -> (ContentStyle, ContentStyle) {
        if selected {
            (self.selected_border, self.selected_text)
        } else {
            self.quadrants[index % 4]
        }
    }
}

/// Render `text` with `style` as an ANSI string
pub fn paint(style: ContentStyle, text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    style.apply(text).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::text::{strip_ansi, visible_width};

    #[test]
    fn paint_is_width_neutral() {
        let theme = Theme::default();
        let s = paint(theme.header, "HELP");
        assert!(s.contains('\x1b'));
        assert_eq!(strip_ansi(&s), "HELP");
        assert_eq!(visible_width(&s), 4);
    }

    #[test]
    fn paint_empty_is_empty() {
        assert_eq!(paint(Theme::default().body, ""), "");
    }

    #[test]
    fn selected_quadrant_uses_highlight() {
        let theme = Theme::default();
        assert_eq!(theme.quadrant(2, true).0, theme.selected_border);
        assert_eq!(theme.quadrant(2, false).0, fg(220));
    }
}
