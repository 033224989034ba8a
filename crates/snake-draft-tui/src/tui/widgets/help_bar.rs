// Help bar widget: key hints, replaced by the latest notice when there is one.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::tui::ViewState;

const NORMAL_HINTS: &str = " Up/Down:Move | Enter:Draft | /:Filter | Esc:Clear | q:Quit";
const FILTER_HINTS: &str = " Type to filter | Enter:Keep | Esc:Cancel";

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let line = match &state.notice {
        Some(notice) => Line::from(Span::styled(
            format!(" {}", notice),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        None => Line::from(Span::styled(
            hints(state),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::DIM),
        )),
    };
    let paragraph = Paragraph::new(line).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

pub fn hints(state: &ViewState) -> &'static str {
    if state.filter_mode {
        FILTER_HINTS
    } else {
        NORMAL_HINTS
    }
}
