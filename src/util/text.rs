//! Width-aware layout for strings that may carry ANSI escape sequences.
//!
//! Escape sequences have zero width and are never split, duplicated or
//! dropped by the operations here. Visible text is measured per grapheme
//! cluster, so wide glyphs count 2 and combining marks count 0.

use unicode_segmentation::UnicodeSegmentation;

use super::unicode::grapheme_width;

const ESC: char = '\x1b';

/// One lexical piece of a styled string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// A complete escape sequence, including the leading ESC
    Escape(&'a str),
    /// A grapheme cluster and its width in cells
    Glyph(&'a str, usize),
}

/// Iterator over the segments of `s`
pub struct Segments<'a> {
    rest: &'a str,
}

pub fn segments(s: &str) -> Segments<'_> {
    Segments { rest: s }
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Segment<'a>> {
        if self.rest.is_empty() {
            return None;
        }
        if self.rest.starts_with(ESC) {
            let len = escape_len(self.rest);
            let (seq, rest) = self.rest.split_at(len);
            self.rest = rest;
            return Some(Segment::Escape(seq));
        }
        let g = self.rest.graphemes(true).next()?;
        self.rest = &self.rest[g.len()..];
        Some(Segment::Glyph(g, grapheme_width(g)))
    }
}

/// Byte length of the escape sequence at the start of `s` (which starts with ESC).
///
/// CSI sequences end at a byte in 0x40..=0x7E, OSC sequences at BEL or ST.
/// Any other ESC takes the following character with it.
fn escape_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    match bytes.get(1) {
        Some(b'[') => {
            let mut i = 2;
            while i < bytes.len() {
                let b = bytes[i];
                i += 1;
                if (0x40..=0x7E).contains(&b) {
                    break;
                }
            }
            i
        }
        Some(b']') => {
            let mut i = 2;
            while i < bytes.len() {
                if bytes[i] == 0x07 {
                    return i + 1;
                }
                if bytes[i] == 0x1b && bytes.get(i + 1) == Some(&b'\\') {
                    return i + 2;
                }
                i += 1;
            }
            i
        }
        Some(_) => 1 + s[1..].chars().next().map_or(0, char::len_utf8),
        None => 1,
    }
}

/// Visible width in cells, ignoring escape sequences.
pub fn visible_width(s: &str) -> usize {
    segments(s)
        .map(|seg| match seg {
            Segment::Glyph(_, w) => w,
            Segment::Escape(_) => 0,
        })
        .sum()
}

/// Remove every escape sequence, leaving only visible text.
pub fn strip_ansi(s: &str) -> String {
    segments(s)
        .filter_map(|seg| match seg {
            Segment::Glyph(g, _) => Some(g),
            Segment::Escape(_) => None,
        })
        .collect()
}

/// Cut `s` to at most `width` visible cells. Width 0 returns `s` unchanged.
///
/// Escape sequences after the cut are kept so styles opened before it are
/// still closed.
pub fn truncate_to_width(s: &str, width: usize) -> String {
    if width == 0 || visible_width(s) <= width {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len());
    let mut col = 0;
    let mut full = false;
    for seg in segments(s) {
        match seg {
            Segment::Escape(seq) => out.push_str(seq),
            Segment::Glyph(g, w) => {
                if full || col + w > width {
                    full = true;
                    continue;
                }
                col += w;
                out.push_str(g);
            }
        }
    }
    out
}

/// Append spaces until `s` is `width` cells wide. No-op when already wider.
pub fn pad_to_width(s: &str, width: usize) -> String {
    let w = visible_width(s);
    if width == 0 || w >= width {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len() + width - w);
    out.push_str(s);
    out.extend(std::iter::repeat_n(' ', width - w));
    out
}

/// Truncate then pad: exactly `width` cells (unless a single glyph is wider).
pub fn fit_to_width(s: &str, width: usize) -> String {
    pad_to_width(&truncate_to_width(s, width), width)
}

/// Split `s` around the column range `[start, start + width)`.
///
/// The left part holds everything that ends at or before `start`, the right
/// part everything from `start + width` on. A glyph that overlaps the range is
/// dropped, and the columns it covers outside the range become spaces so both
/// parts keep their width. Escape sequences go left when they occur before
/// `start` and right otherwise.
pub fn split_at_column(s: &str, start: usize, width: usize) -> (String, String) {
    let end = start + width;
    let mut left = String::new();
    let mut right = String::new();
    let mut col = 0;
    for seg in segments(s) {
        match seg {
            Segment::Escape(seq) => {
                if col < start {
                    left.push_str(seq);
                } else {
                    right.push_str(seq);
                }
            }
            Segment::Glyph(g, w) => {
                let next = col + w;
                if next <= start {
                    left.push_str(g);
                } else if col >= end {
                    right.push_str(g);
                } else {
                    if col < start {
                        left.extend(std::iter::repeat_n(' ', start - col));
                    }
                    if next > end {
                        right.extend(std::iter::repeat_n(' ', next - end));
                    }
                }
                col = next;
            }
        }
    }
    (left, right)
}

/// Lazily word-wrap `s` into lines of at most `width` cells.
///
/// Embedded newlines start a new line. A word wider than `width` is broken
/// between glyphs. An empty input yields one empty line; width 0 yields `s`.
pub fn wrap_to_width(s: &str, width: usize) -> WrapLines<'_> {
    WrapLines {
        rest: Some(s),
        width,
    }
}

/// Iterator returned by [`wrap_to_width`]
pub struct WrapLines<'a> {
    /// Unconsumed input; None once the last line has been produced
    rest: Option<&'a str>,
    width: usize,
}

fn is_space(g: &str) -> bool {
    g == " " || g == "\t"
}

impl Iterator for WrapLines<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let s = self.rest?;
        if self.width == 0 {
            self.rest = None;
            return Some(s.to_string());
        }

        let para_end = s.find('\n').unwrap_or(s.len());
        let para = &s[..para_end];

        let mut line = String::new();
        let mut col = 0;
        let mut pos = 0;
        // Whitespace seen since the last word, emitted only if another word fits
        let mut gap_start = None;
        let mut gap_width = 0;

        while pos < para.len() {
            let word_end = pos + word_len(&para[pos..]);
            if word_end == pos {
                // whitespace run
                let g = para[pos..].graphemes(true).next().unwrap_or(" ");
                gap_start.get_or_insert(pos);
                gap_width += grapheme_width(g);
                pos += g.len();
                continue;
            }

            let word = &para[pos..word_end];
            let word_width = visible_width(word);
            let lead = if col == 0 && line.is_empty() { 0 } else { gap_width };
            if col + lead + word_width <= self.width {
                if lead > 0
                    && let Some(gs) = gap_start
                {
                    line.push_str(&para[gs..pos]);
                } else if col == 0
                    && line.is_empty()
                    && let Some(gs) = gap_start
                    && gs == 0
                {
                    // leading indentation of a paragraph
                    let indent = &para[..pos];
                    if visible_width(indent) + word_width <= self.width {
                        line.push_str(indent);
                        col += visible_width(indent);
                    }
                }
                line.push_str(word);
                col += lead + word_width;
                pos = word_end;
                gap_start = None;
                gap_width = 0;
                continue;
            }

            if col == 0 && line.is_empty() {
                // word alone is too wide: hard-break it
                let cut = hard_break(word, self.width);
                line.push_str(&word[..cut]);
                pos += cut;
            }
            break;
        }

        if pos >= para.len() || para[pos..].graphemes(true).all(is_space) {
            self.rest = if para_end < s.len() {
                Some(&s[para_end + 1..])
            } else {
                None
            };
        } else {
            let rest = &s[pos..];
            let skip = rest.len() - rest.trim_start_matches([' ', '\t']).len();
            self.rest = Some(&rest[skip..]);
        }
        Some(line)
    }
}

/// Byte length of the word (non-space run, escapes included) at the start of `s`
fn word_len(s: &str) -> usize {
    let mut len = 0;
    for seg in segments(s) {
        match seg {
            Segment::Glyph(g, _) if is_space(g) => break,
            Segment::Glyph(g, _) => len += g.len(),
            Segment::Escape(seq) => len += seq.len(),
        }
    }
    len
}

/// Byte offset where `word` must be cut to fit `width`; always at least one glyph.
fn hard_break(word: &str, width: usize) -> usize {
    let mut col = 0;
    let mut cut = 0;
    for seg in segments(word) {
        match seg {
            Segment::Escape(seq) => cut += seq.len(),
            Segment::Glyph(g, w) => {
                if col + w > width && col > 0 {
                    break;
                }
                col += w;
                cut += g.len();
                if col >= width {
                    break;
                }
            }
        }
    }
    cut
}

/// Join blocks side by side, top-aligned. Each block is padded to its widest line.
pub fn join_horizontal(blocks: &[&str]) -> String {
    let split: Vec<Vec<&str>> = blocks.iter().map(|b| b.split('\n').collect()).collect();
    let widths: Vec<usize> = split
        .iter()
        .map(|lines| lines.iter().map(|l| visible_width(l)).max().unwrap_or(0))
        .collect();
    let rows = split.iter().map(Vec::len).max().unwrap_or(0);

    let mut out = Vec::with_capacity(rows);
    for row in 0..rows {
        let mut line = String::new();
        for (lines, &w) in split.iter().zip(&widths) {
            line.push_str(&pad_to_width(lines.get(row).copied().unwrap_or(""), w));
        }
        out.push(line);
    }
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: &str = "\x1b[31m";
    const RESET: &str = "\x1b[0m";

    #[test]
    fn width_ignores_escapes() {
        assert_eq!(visible_width("hello"), 5);
        assert_eq!(visible_width(&format!("{RED}hello{RESET}")), 5);
        assert_eq!(visible_width("\x1b[38;5;214m你好\x1b[39m"), 4);
        assert_eq!(visible_width("e\u{0301}"), 1);
        assert_eq!(visible_width(""), 0);
    }

    #[test]
    fn escape_forms() {
        let osc = "\x1b]8;;http://x\x07link\x1b]8;;\x1b\\";
        assert_eq!(visible_width(osc), 4);
        assert_eq!(strip_ansi(osc), "link");
        assert_eq!(visible_width("\x1b7ab"), 2);
        // unterminated CSI swallows the rest
        assert_eq!(visible_width("ab\x1b[31"), 2);
    }

    #[test]
    fn truncate_keeps_styles_balanced() {
        let s = format!("{RED}hello world{RESET}");
        let t = truncate_to_width(&s, 5);
        assert_eq!(t, format!("{RED}hello{RESET}"));
        assert_eq!(visible_width(&t), 5);
    }

    #[test]
    fn truncate_never_splits_wide_glyph() {
        let t = truncate_to_width("你好世界", 5);
        assert_eq!(t, "你好");
        assert_eq!(visible_width(&t), 4);
    }

    #[test]
    fn truncate_and_pad_zero_width_passthrough() {
        assert_eq!(truncate_to_width("hello", 0), "hello");
        assert_eq!(pad_to_width("hello", 0), "hello");
        assert_eq!(pad_to_width("hello", 3), "hello");
        assert_eq!(pad_to_width("hi", 4), "hi  ");
    }

    #[test]
    fn fit_is_exact_width() {
        let inputs = [
            "plain".to_string(),
            "a much longer line of text".to_string(),
            format!("{RED}red 🎉 party{RESET}"),
            "混合 mixed 文字".to_string(),
            String::new(),
        ];
        for s in &inputs {
            for w in [1usize, 4, 7, 12, 30] {
                let fitted = fit_to_width(s, w);
                assert_eq!(visible_width(&fitted), w, "input {s:?} width {w}");
            }
        }
    }

    #[test]
    fn split_cuts_a_hole() {
        let (l, r) = split_at_column("0123456789", 3, 4);
        assert_eq!(l, "012");
        assert_eq!(r, "789");
    }

    #[test]
    fn split_routes_escapes() {
        let s = format!("{RED}ab{RESET}cdef{RED}gh{RESET}");
        let (l, r) = split_at_column(&s, 2, 2);
        assert_eq!(l, format!("{RED}ab"));
        assert_eq!(r, format!("{RESET}ef{RED}gh{RESET}"));
        let total = s.matches('\x1b').count();
        assert_eq!(l.matches('\x1b').count() + r.matches('\x1b').count(), total);
    }

    #[test]
    fn split_blanks_straddling_wide_glyph() {
        // 你 covers columns 0-1, 好 2-3
        let (l, r) = split_at_column("你好ab", 1, 2);
        assert_eq!(l, " ");
        assert_eq!(r, " ab");
        assert_eq!(visible_width(&l), 1);

        let (l, r) = split_at_column("你你你你你你a", 5, 2);
        assert_eq!(l, "你你 ");
        assert_eq!(r, " 你你a");
    }

    #[test]
    fn split_past_end() {
        let (l, r) = split_at_column("abc", 5, 3);
        assert_eq!(l, "abc");
        assert_eq!(r, "");
    }

    fn wrap(s: &str, w: usize) -> Vec<String> {
        wrap_to_width(s, w).collect()
    }

    #[test]
    fn wrap_at_word_boundaries() {
        assert_eq!(
            wrap("the quick brown fox jumps", 10),
            vec!["the quick", "brown fox", "jumps"]
        );
    }

    #[test]
    fn wrap_empty_is_one_line() {
        assert_eq!(wrap("", 10), vec![""]);
    }

    #[test]
    fn wrap_hard_breaks_long_words() {
        assert_eq!(wrap("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert_eq!(
            wrap("go supercalifragilistic", 8),
            vec!["go", "supercal", "ifragili", "stic"]
        );
    }

    #[test]
    fn wrap_respects_newlines() {
        assert_eq!(wrap("one\n\ntwo three", 5), vec!["one", "", "two", "three"]);
        assert_eq!(wrap("end\n", 5), vec!["end", ""]);
    }

    #[test]
    fn wrap_keeps_indent_and_escapes() {
        assert_eq!(wrap("   Title: x", 20), vec!["   Title: x"]);
        let lines = wrap(&format!("{RED}warning{RESET} text here"), 8);
        assert_eq!(lines[0], format!("{RED}warning{RESET}"));
        assert_eq!(lines[1], "text");
        assert_eq!(lines[2], "here");
    }

    #[test]
    fn wrap_lines_fit() {
        let text = "Summary: Do urgent-important now, plan important early, delegate urgent distractions, remove useless tasks.";
        for w in [5usize, 9, 17, 40] {
            for line in wrap_to_width(text, w) {
                assert!(visible_width(&line) <= w, "{line:?} > {w}");
            }
        }
    }

    #[test]
    fn wrap_is_lazy() {
        let mut it = wrap_to_width("a b c d", 1);
        assert_eq!(it.next().as_deref(), Some("a"));
        assert_eq!(it.next().as_deref(), Some("b"));
        assert_eq!(it.count(), 2);
    }

    #[test]
    fn join_pads_columns() {
        let joined = join_horizontal(&["ab\nc", " ", "xy\nz\nw"]);
        assert_eq!(joined, "ab xy\nc  z \n   w ");
    }
}
