// Draft log widget: completed picks, newest first.
//
// Each line: "#{pick} R{round} {party}: {entity}", automated picks dimmed.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};
use ratatui::Frame;

use snake_draft_core::draft::events::{PickRecord, PickSource};

use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    if state.picks.is_empty() {
        let paragraph = Paragraph::new("  No picks yet.")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title("Draft Log"));
        frame.render_widget(paragraph, area);
        return;
    }

    // Borders take two rows.
    let visible_rows = (area.height as usize).saturating_sub(2).max(1);

    let items: Vec<ListItem> = state
        .picks
        .iter()
        .rev()
        .take(visible_rows)
        .map(|pick| {
            let style = match pick.source {
                PickSource::Human => Style::default().fg(Color::Cyan),
                PickSource::Automated => Style::default().add_modifier(Modifier::DIM),
            };
            ListItem::new(Line::from(Span::styled(format_pick(pick), style)))
        })
        .collect();

    let title = format!("Draft Log ({})", state.picks.len());
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(list, area);
}

pub fn format_pick(pick: &PickRecord) -> String {
    format!(
        "#{} R{} {}: {}",
        pick.pick_number, pick.round, pick.party_name, pick.entity.name
    )
}
