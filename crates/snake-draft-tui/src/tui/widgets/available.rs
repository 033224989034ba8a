// Available pool widget: ranked table of undrafted entities.
//
// Columns: Rank, Name, Category, Affiliation. The cursor row is highlighted,
// brighter while the human is on the clock. The title shows the active filter.

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Cell, Row, Table, TableState};
use ratatui::Frame;

use crate::tui::ViewState;

/// Render the available table into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let visible = state.visible_available();

    let header = Row::new(vec![
        Cell::from("Rank"),
        Cell::from("Name"),
        Cell::from("Cat"),
        Cell::from("Aff"),
    ])
    .style(
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = visible
        .iter()
        .map(|e| {
            Row::new(vec![
                Cell::from(e.rank.to_string()),
                Cell::from(e.name.clone()),
                Cell::from(e.category.clone()),
                Cell::from(e.affiliation.clone()),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(5),
        Constraint::Min(14),
        Constraint::Length(6),
        Constraint::Length(6),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(build_title(state, visible.len())),
        )
        .row_highlight_style(highlight_style(state.is_human_turn))
        .highlight_symbol(">> ");

    let mut table_state = TableState::default();
    if !visible.is_empty() {
        table_state.select(Some(state.cursor.min(visible.len() - 1)));
    }
    frame.render_stateful_widget(table, area, &mut table_state);
}

fn highlight_style(is_human_turn: bool) -> Style {
    if is_human_turn {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().bg(Color::DarkGray)
    }
}

/// "Available (n)", plus the filter text and a cursor while typing.
pub fn build_title(state: &ViewState, count: usize) -> Line<'static> {
    let mut title = String::from("Available");
    if state.filter_mode {
        title.push_str(&format!(" /{}_", state.filter_text));
    } else if !state.filter_text.is_empty() {
        title.push_str(&format!(" \"{}\"", state.filter_text));
    }
    title.push_str(&format!(" ({})", count));
    Line::from(title)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::tests::sample_snapshot;

    fn title_text(state: &ViewState, count: usize) -> String {
        build_title(state, count).to_string()
    }

    #[test]
    fn title_reflects_filter_state() {
        let mut state = ViewState::default();
        assert_eq!(title_text(&state, 3), "Available (3)");

        state.filter_mode = true;
        state.filter_text = "al".into();
        assert_eq!(title_text(&state, 1), "Available /al_ (1)");

        state.filter_mode = false;
        assert_eq!(title_text(&state, 1), "Available \"al\" (1)");
    }

    #[test]
    fn render_lists_entities() {
        let backend = ratatui::backend::TestBackend::new(60, 10);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let mut state = ViewState::default();
        state.apply_snapshot(sample_snapshot());
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("Alpha"));
        assert!(text.contains("Delta"));
        assert!(!text.contains("Bravo"));
    }

    #[test]
    fn render_empty_pool_does_not_panic() {
        let backend = ratatui::backend::TestBackend::new(60, 10);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let state = ViewState::default();
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
    }
}
