pub mod auto_select;
pub mod help;
pub mod table;

use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::App;

/// Spinner frames for animated progress indication.
const SPINNER_FRAMES: &[char] = &[
    '\u{280B}', '\u{2819}', '\u{2839}', '\u{2838}', '\u{283C}', '\u{2834}', '\u{2826}', '\u{2827}',
    '\u{2807}', '\u{280F}',
];

/// Get the current spinner character based on a tick counter.
pub fn spinner_char(tick: usize) -> char {
    SPINNER_FRAMES[tick % SPINNER_FRAMES.len()]
}

/// Truncate a string to fit in `max_width` columns, appending "\u{2026}" if truncated.
pub fn truncate(s: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }
    if s.chars().count() <= max_width {
        return s.to_string();
    }
    let mut truncated: String = s.chars().take(max_width.saturating_sub(1)).collect();
    truncated.push('\u{2026}');
    truncated
}

/// Draw the whole screen: header, table, footer, then any overlay.
pub fn render(f: &mut Frame, app: &mut App) {
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(5),
        Constraint::Length(1),
    ])
    .split(f.area());

    render_header(f, chunks[0], app);
    table::render_in(f, app, chunks[1]);
    render_footer(f, chunks[2], app);

    if app.popup.visible {
        auto_select::render(f, app);
    }
    if app.show_help {
        help::render(f, &app.theme);
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let ctl = &app.controller;

    let mut spans = vec![
        Span::styled(" artgrid ", theme.header_style()),
        Span::styled(
            " Artworks",
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {} selected", ctl.selection().len()),
            Style::default().fg(theme.selected),
        ),
    ];

    if ctl.pending_auto_select() > 0 {
        spans.push(Span::styled(
            format!("  [auto-select: {} pending]", ctl.pending_auto_select()),
            Style::default().fg(theme.active),
        ));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let ctl = &app.controller;

    let mut spans: Vec<Span> = Vec::new();

    if ctl.is_loading() {
        spans.push(Span::styled(
            format!(" {} loading page {}\u{2026} ", spinner_char(app.tick), app.target_page),
            Style::default()
                .fg(theme.spinner)
                .add_modifier(Modifier::BOLD),
        ));
    }

    spans.push(Span::styled(
        format!(" {} ", ctl.page_report()),
        Style::default().fg(theme.text),
    ));
    spans.push(Span::styled(
        format!(" page {}/{} ", ctl.current_page(), ctl.total_pages()),
        Style::default().fg(theme.dim),
    ));

    if let Some(err) = ctl.last_error() {
        spans.push(Span::styled(
            format!(" error: {} ", truncate(err, 48)),
            Style::default().fg(theme.error),
        ));
    }

    spans.push(Span::styled(
        " h/l:page  space:select  a:all  n:auto-select  ?:help  q:quit",
        theme.footer_style(),
    ));

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Create a centered rectangle of the given width (columns) and height (rows).
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .split(area);
    Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .split(vertical[0])[0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_short_string_untouched() {
        assert_eq!(truncate("abc", 5), "abc");
    }

    #[test]
    fn truncate_adds_ellipsis() {
        assert_eq!(truncate("abcdef", 4), "abc\u{2026}");
        assert_eq!(truncate("abc", 0), "");
    }

    #[test]
    fn truncate_counts_chars_not_bytes() {
        assert_eq!(truncate("\u{00e9}t\u{00e9}", 3), "\u{00e9}t\u{00e9}");
    }
}
