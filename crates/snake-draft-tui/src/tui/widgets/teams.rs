// Teams widget: every party's roster, one line per party.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem};
use ratatui::Frame;

use snake_draft_core::draft::roster::Party;

use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let rounds = rounds_per_party(state);
    let items: Vec<ListItem> = state
        .parties
        .iter()
        .map(|party| {
            let on_clock = !state.is_complete() && party.index == state.on_clock;
            ListItem::new(party_line(party, rounds, on_clock))
        })
        .collect();

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title("Teams"));
    frame.render_widget(list, area);
}

fn rounds_per_party(state: &ViewState) -> usize {
    if state.parties.is_empty() {
        0
    } else {
        state.total_picks / state.parties.len()
    }
}

/// `> You (2/10): Alpha, Delta`
pub fn party_line(party: &Party, rounds: usize, on_clock: bool) -> Line<'static> {
    let marker = if on_clock { "> " } else { "  " };
    let mut name_style = Style::default().fg(if party.is_human {
        Color::Cyan
    } else {
        Color::White
    });
    if on_clock {
        name_style = name_style.add_modifier(Modifier::BOLD);
    }

    let names: Vec<&str> = party.roster.iter().map(|e| e.name.as_str()).collect();
    Line::from(vec![
        Span::styled(marker, Style::default().fg(Color::Yellow)),
        Span::styled(party.name.clone(), name_style),
        Span::styled(
            format!(" ({}/{}): ", party.roster.len(), rounds),
            Style::default().fg(Color::Gray),
        ),
        Span::raw(names.join(", ")),
    ])
}
