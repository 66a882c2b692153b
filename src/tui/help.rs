use crate::util::text::wrap_to_width;

pub const HELP_HEADER: &str = "HELP \u{2014} Eisenhower (ActNow)";
pub const HELP_FOOTER: &str = "[\u{2191}/\u{2193}, j/k] scroll  [pgup/pgdn] page  [g/G] top/bottom  [h/esc/q] back";

const HELP_TEXT: &[&str] = &[
    "Important\u{2013}Immediate (Urgent) Quadrant Method",
    "It helps you decide what to do now, later, delegate, or ignore.",
    "",
    "Ask two questions:",
    "1) Is it Important? Does it matter for goals, money, safety, or health?",
    "2) Is it Immediate (Urgent)? Does it need action now or very soon?",
    "",
    "The 4 Quadrants",
    "IMPORTANT + IMMEDIATE = Do Now",
    "IMPORTANT + NOT IMMEDIATE = Plan",
    "NOT IMPORTANT + IMMEDIATE = Delegate",
    "NOT IMPORTANT + NOT IMMEDIATE = Eliminate",
    "",
    "1) Do Now (Important & Immediate)",
    "- Deadline or emergency; must be done now",
    "Examples: prod outage, critical bug, bill due today, health emergency",
    "How: do it immediately and avoid handing it off unless you must",
    "",
    "2) Plan (Important & Not Immediate)",
    "- Important long-term, but not urgent yet",
    "Examples: learning, documentation, architecture, training, savings",
    "How: schedule it; if ignored, it becomes urgent later",
    "",
    "3) Delegate (Not Important & Immediate)",
    "- Feels urgent but low impact; interrupts focus",
    "Examples: random calls, non-critical emails, low-value meetings",
    "How: delegate or do quickly; protect your important work",
    "",
    "4) Eliminate (Not Important & Not Immediate)",
    "- No value and no urgency",
    "Examples: endless scrolling, random videos, gossip",
    "How: avoid or limit; don't schedule it",
    "",
    "Tasks due within 24 hours are marked urgent automatically.",
    "",
    "Board",
    "- [\u{2191}/\u{2193}] or k/j: move within a quadrant",
    "- [tab]/[shift+tab]: next/previous quadrant",
    "- [a] add, [e] edit, [d] toggle done, [x] delete",
    "- [h] or [?]: this help, [q]: quit",
    "",
    "Fields per quadrant",
    "- Do Now: status, title, due/SLA, impact, next action",
    "- Plan: status, title, planned date, effort",
    "- Delegate: status, title, due/SLA, delegate to",
    "- Eliminate: title, delete reason",
    "",
    "Form editing",
    "- [\u{2191}/\u{2193}] or j/k: move fields, [enter] next, save on the last field",
    "- [i] insert into a text field, [esc] stop inserting",
    "- [esc] outside insert closes the form without saving",
    "- [space]: toggle important/urgent, cycle status",
    "- Date fields: [h/l] pick segment, [+/-] change it, [t] now, [x] clear",
    "",
    "Examples",
    "1) Do Now incident",
    "   Title: Fix prod outage",
    "   Impact: Revenue loss",
    "   Next Action: Restart database",
    "   Due/SLA: 2025-01-05 13:00",
    "",
    "2) Plan",
    "   Title: Write migration plan",
    "   Planned Date: 2025-01-12 09:00",
    "   Effort: 4h",
    "",
    "3) Delegate",
    "   Title: Renew SSL cert",
    "   Delegate To: ops@team",
    "   Due/SLA: 2025-01-07 10:00",
    "",
    "4) Eliminate",
    "   Title: Remove old test data",
    "   Delete Reason: Not needed",
];

/// Help body wrapped to `width` cells
pub fn wrapped_help(width: usize) -> Vec<String> {
    HELP_TEXT
        .iter()
        .flat_map(|line| wrap_to_width(line, width))
        .collect()
}

/// Body rows between the header and footer lines
pub fn viewport_height(screen_height: usize) -> usize {
    screen_height.saturating_sub(2).max(1)
}

/// Largest scroll offset that still fills the viewport
pub fn max_offset(width: usize, height: usize) -> usize {
    wrapped_help(width)
        .len()
        .saturating_sub(viewport_height(height))
}

pub fn clamp_offset(offset: usize, width: usize, height: usize) -> usize {
    offset.min(max_offset(width, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::text::visible_width;

    #[test]
    fn wrapped_lines_fit_width() {
        for width in [20, 40, 80] {
            let lines = wrapped_help(width);
            assert!(lines.len() >= HELP_TEXT.len());
            assert!(lines.iter().all(|l| visible_width(l) <= width));
        }
    }

    #[test]
    fn blank_lines_survive_wrapping() {
        let lines = wrapped_help(80);
        assert_eq!(lines[2], "");
    }

    #[test]
    fn narrow_width_means_more_lines() {
        assert!(wrapped_help(30).len() > wrapped_help(120).len());
    }

    #[test]
    fn offset_clamps_to_content() {
        let total = wrapped_help(40).len();
        assert_eq!(max_offset(40, 24), total - 22);
        assert_eq!(clamp_offset(10_000, 40, 24), total - 22);
        assert_eq!(clamp_offset(3, 40, 24), 3);
        assert_eq!(max_offset(80, 10_000), 0);
    }

    #[test]
    fn viewport_never_zero() {
        assert_eq!(viewport_height(24), 22);
        assert_eq!(viewport_height(2), 1);
        assert_eq!(viewport_height(0), 1);
    }
}
