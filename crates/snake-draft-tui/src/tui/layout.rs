// Screen layout: panel arrangement and sizing.
//
// +--------------------------------------------------+
// | Status Bar (1 row)                                |
// +------------------------+-------------------------+
// | Available (45%)        | Teams (55%)             |
// |                        +-------------------------+
// |                        | Draft Log (45%)         |
// +------------------------+-------------------------+
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Resolved screen areas for each board zone.
#[derive(Debug, Clone)]
pub struct AppLayout {
    /// Round, pick counter, who is on the clock.
    pub status_bar: Rect,
    /// Undrafted entities with cursor and filter.
    pub available: Rect,
    /// One line per party roster.
    pub teams: Rect,
    pub draft_log: Rect,
    /// Key hints, or the latest notice.
    pub help_bar: Rect,
}

pub fn build_layout(area: Rect) -> AppLayout {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Min(8),    // board
            Constraint::Length(1), // help bar
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(vertical[1]);

    let sidebar = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(horizontal[1]);

    AppLayout {
        status_bar: vertical[0],
        available: horizontal[0],
        teams: sidebar[0],
        draft_log: sidebar[1],
        help_bar: vertical[2],
    }
}
