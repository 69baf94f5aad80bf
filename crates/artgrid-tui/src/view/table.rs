use artgrid_core::Record;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};

use crate::app::App;

const CHECKED: &str = "[x]";
const UNCHECKED: &str = "[ ]";

/// Render the artwork table into `area`, recording its geometry on `app`
/// for mouse hit-testing.
pub fn render_in(f: &mut Frame, app: &mut App, area: Rect) {
    app.last_table_area = Some(area);
    let theme = &app.theme;
    let ctl = &app.controller;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style())
        .title(format!(" Page {} ", ctl.current_page()));

    if ctl.records().is_empty() {
        let msg = if ctl.is_loading() { "" } else { "No data found" };
        let empty = Paragraph::new(msg)
            .style(Style::default().fg(theme.dim))
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let header_box = if app.all_visible_selected() {
        CHECKED
    } else {
        UNCHECKED
    };
    let header = Row::new(
        [
            header_box,
            "Title",
            "Place of Origin",
            "Artist Display",
            "Inscriptions",
            "Date Start",
            "Date End",
        ]
        .into_iter()
        .map(|h| Cell::from(h).style(Style::default().fg(theme.text).add_modifier(Modifier::BOLD))),
    )
    .height(1);

    let rows: Vec<Row> = ctl
        .records()
        .iter()
        .map(|record| {
            let selected = ctl.is_selected(&record.id);
            let check = Cell::from(if selected { CHECKED } else { UNCHECKED }).style(
                if selected {
                    Style::default().fg(theme.selected)
                } else {
                    Style::default().fg(theme.dim)
                },
            );
            row_cells(record, check)
        })
        .collect();

    let widths = [
        Constraint::Length(3),
        Constraint::Fill(3),
        Constraint::Fill(2),
        Constraint::Fill(3),
        Constraint::Fill(2),
        Constraint::Length(10),
        Constraint::Length(8),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(theme.highlight_style());

    let mut state = TableState::default().with_offset(app.table_offset);
    state.select(Some(app.cursor));
    f.render_stateful_widget(table, area, &mut state);
    app.table_offset = state.offset();
}

fn row_cells<'a>(record: &'a Record, check: Cell<'a>) -> Row<'a> {
    Row::new(vec![
        check,
        Cell::from(one_line(record.title.as_deref())),
        Cell::from(one_line(record.place_of_origin.as_deref())),
        Cell::from(one_line(record.artist_display.as_deref())),
        Cell::from(one_line(record.inscriptions.as_deref())),
        Cell::from(year(record.date_start)),
        Cell::from(year(record.date_end)),
    ])
}

/// Fields like `artist_display` carry embedded newlines; flatten them so a
/// row stays one line tall.
fn one_line(text: Option<&str>) -> String {
    text.unwrap_or("").replace(['\n', '\r'], " ")
}

fn year(value: Option<i64>) -> String {
    value.map(|y| y.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multi_line_fields_are_flattened() {
        assert_eq!(
            one_line(Some("Vincent van Gogh\nDutch, 1853-1890")),
            "Vincent van Gogh Dutch, 1853-1890"
        );
        assert_eq!(one_line(None), "");
    }

    #[test]
    fn missing_year_is_blank() {
        assert_eq!(year(Some(-500)), "-500");
        assert_eq!(year(None), "");
    }
}
