// Quit confirmation overlay, drawn over the board while
// `ViewState::confirm_quit` is set.

use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

const DIALOG_WIDTH: u16 = 30;
const DIALOG_HEIGHT: u16 = 3;

pub fn render(frame: &mut Frame, area: Rect) {
    let dialog = centered_rect(DIALOG_WIDTH, DIALOG_HEIGHT, area);
    frame.render_widget(Clear, dialog);

    let key = |k: &'static str, color: Color| {
        Span::styled(k, Style::default().fg(color).add_modifier(Modifier::BOLD))
    };
    let text = Line::from(vec![
        Span::raw(" Leave the draft? ("),
        key("y", Color::Green),
        Span::raw("/"),
        key("n", Color::Red),
        Span::raw(")"),
    ]);

    let paragraph = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)),
    );
    frame.render_widget(paragraph, dialog);
}

/// A `width` x `height` rect centered in `area`, shrunk to fit.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [rect] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    rect
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dialog_is_centered() {
        let rect = centered_rect(30, 3, Rect::new(0, 0, 100, 41));
        assert_eq!(rect, Rect::new(35, 19, 30, 3));
    }

    #[test]
    fn dialog_shrinks_to_small_area() {
        let rect = centered_rect(30, 3, Rect::new(0, 0, 20, 2));
        assert_eq!(rect.width, 20);
        assert_eq!(rect.height, 2);
    }
}
