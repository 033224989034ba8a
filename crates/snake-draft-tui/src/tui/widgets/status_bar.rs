// Status bar widget: round, pick counter, who is on the clock, who is next.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use snake_draft_core::draft::engine::Completion;

use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let paragraph =
        Paragraph::new(status_line(state)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

pub fn status_line(state: &ViewState) -> Line<'static> {
    let mut spans = vec![Span::styled(
        format!(" Pick {}/{}", state.picks_made, state.total_picks),
        Style::default().fg(Color::White),
    )];
    let sep = || Span::styled(" | ", Style::default().fg(Color::Gray));

    match state.completion {
        Some(completion) => {
            spans.push(sep());
            spans.push(Span::styled(
                completion_text(completion),
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ));
        }
        None if state.parties.is_empty() => {}
        None => {
            spans.push(sep());
            spans.push(Span::raw(format!("Round {}", state.round)));
            spans.push(sep());
            spans.push(Span::raw(format!(
                "On the clock: {}",
                state.party_name(state.on_clock)
            )));
            if state.is_human_turn {
                spans.push(Span::styled(
                    " YOUR PICK ",
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ));
            }
            if !state.on_deck.is_empty() {
                let next: Vec<&str> = state
                    .on_deck
                    .iter()
                    .map(|&i| state.party_name(i))
                    .collect();
                spans.push(sep());
                spans.push(Span::styled(
                    format!("Next: {}", next.join(", ")),
                    Style::default().fg(Color::Gray),
                ));
            }
        }
    }

    if let Some(last) = &state.last_pick {
        spans.push(sep());
        spans.push(Span::styled(last.clone(), Style::default().fg(Color::Cyan)));
    }

    Line::from(spans)
}

fn completion_text(completion: Completion) -> &'static str {
    match completion {
        Completion::AllPicksMade => "Draft complete",
        Completion::PoolExhausted => "Draft ended early: pool exhausted",
    }
}
