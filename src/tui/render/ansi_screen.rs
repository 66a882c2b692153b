use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::Widget;

use crate::util::text::{Segment, segments};

/// Draws a pre-composed screen of ANSI-styled lines into the frame buffer.
///
/// SGR sequences become cell styles; other escape sequences are ignored.
/// Lines and glyphs beyond the area are clipped.
pub struct AnsiScreen<'a> {
    text: &'a str,
}

impl<'a> AnsiScreen<'a> {
    pub fn new(text: &'a str) -> Self {
        AnsiScreen { text }
    }
}

impl Widget for AnsiScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let right = area.right();
        for (row, line) in self.text.split('\n').enumerate() {
            let Ok(dy) = u16::try_from(row) else {
                break;
            };
            if dy >= area.height {
                break;
            }
            let y = area.y + dy;
            let mut x = area.x;
            let mut style = Style::default();
            for seg in segments(line) {
                match seg {
                    Segment::Escape(seq) => style = apply_sgr(style, seq),
                    Segment::Glyph(g, _) => {
                        if x >= right {
                            break;
                        }
                        let g = if g == "\t" { "    " } else { g };
                        let (next_x, _) = buf.set_stringn(x, y, g, usize::from(right - x), style);
                        x = next_x;
                    }
                }
            }
        }
    }
}

/// Fold one escape sequence into `style`. Non-SGR sequences leave it unchanged.
pub fn apply_sgr(style: Style, seq: &str) -> Style {
    let Some(params) = seq
        .strip_prefix("\x1b[")
        .and_then(|rest| rest.strip_suffix('m'))
    else {
        return style;
    };
    let codes: Vec<u16> = params
        .split(';')
        .map(|p| p.parse().unwrap_or(0))
        .collect();

    let mut style = style;
    let mut i = 0;
    while i < codes.len() {
        let code = codes[i];
        i += 1;
        style = match code {
            0 => Style::default(),
            1 => style.add_modifier(Modifier::BOLD),
            2 => style.add_modifier(Modifier::DIM),
            3 => style.add_modifier(Modifier::ITALIC),
            4 => style.add_modifier(Modifier::UNDERLINED),
            5 => style.add_modifier(Modifier::SLOW_BLINK),
            7 => style.add_modifier(Modifier::REVERSED),
            8 => style.add_modifier(Modifier::HIDDEN),
            9 => style.add_modifier(Modifier::CROSSED_OUT),
            22 => style.remove_modifier(Modifier::BOLD | Modifier::DIM),
            23 => style.remove_modifier(Modifier::ITALIC),
            24 => style.remove_modifier(Modifier::UNDERLINED),
            25 => style.remove_modifier(Modifier::SLOW_BLINK),
            27 => style.remove_modifier(Modifier::REVERSED),
            28 => style.remove_modifier(Modifier::HIDDEN),
            29 => style.remove_modifier(Modifier::CROSSED_OUT),
            30..=37 => style.fg(Color::Indexed((code - 30) as u8)),
            39 => style.fg(Color::Reset),
            40..=47 => style.bg(Color::Indexed((code - 40) as u8)),
            49 => style.bg(Color::Reset),
            90..=97 => style.fg(Color::Indexed((code - 90 + 8) as u8)),
            100..=107 => style.bg(Color::Indexed((code - 100 + 8) as u8)),
            38 | 48 => {
                let (color, used) = extended_color(&codes[i..]);
                i += used;
                match color {
                    Some(c) if code == 38 => style.fg(c),
                    Some(c) => style.bg(c),
                    None => style,
                }
            }
            _ => style,
        };
    }
    style
}

/// Parse the tail of a 38/48 sequence: `5;n` or `2;r;g;b`.
/// Returns the color and how many codes were consumed.
fn extended_color(codes: &[u16]) -> (Option<Color>, usize) {
    let byte = |i: usize| codes.get(i).and_then(|&c| u8::try_from(c).ok());
    match codes.first() {
        Some(5) => (byte(1).map(Color::Indexed), 2),
        Some(2) => match (byte(1), byte(2), byte(3)) {
            (Some(r), Some(g), Some(b)) => (Some(Color::Rgb(r, g, b)), 4),
            _ => (None, codes.len()),
        },
        _ => (None, codes.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::theme::{Theme, paint};

    fn draw(text: &str, w: u16, h: u16) -> Buffer {
        let mut buf = Buffer::empty(Rect::new(0, 0, w, h));
        AnsiScreen::new(text).render(buf.area, &mut buf);
        buf
    }

    #[test]
    fn sgr_codes_map_to_styles() {
        let s = apply_sgr(Style::default(), "\x1b[38;5;214m");
        assert_eq!(s.fg, Some(Color::Indexed(214)));
        let s = apply_sgr(s, "\x1b[1;4m");
        assert!(s.add_modifier.contains(Modifier::BOLD | Modifier::UNDERLINED));
        let s = apply_sgr(s, "\x1b[48;2;1;2;3m");
        assert_eq!(s.bg, Some(Color::Rgb(1, 2, 3)));
        assert_eq!(apply_sgr(s, "\x1b[0m"), Style::default());
        assert_eq!(apply_sgr(s, "\x1b[m"), Style::default());
        assert_eq!(apply_sgr(s, "\x1b[2J"), s);
    }

    #[test]
    fn styled_text_lands_in_cells() {
        let theme = Theme::default();
        let text = format!("{} ok\nline two", paint(theme.error, "err"));
        let buf = draw(&text, 10, 2);
        assert_eq!(buf[(0, 0)].symbol(), "e");
        assert_eq!(buf[(0, 0)].fg, Color::Indexed(196));
        assert!(buf[(0, 0)].modifier.contains(Modifier::BOLD));
        assert_eq!(buf[(4, 0)].symbol(), "o");
        assert_eq!(buf[(4, 0)].fg, Color::Reset);
        assert_eq!(buf[(0, 1)].symbol(), "l");
    }

    #[test]
    fn clips_to_area() {
        let buf = draw("abcdef\n你好世界\nthird", 4, 2);
        assert_eq!(buf[(3, 0)].symbol(), "d");
        assert_eq!(buf[(0, 1)].symbol(), "你");
        assert_eq!(buf[(2, 1)].symbol(), "好");
    }
}
