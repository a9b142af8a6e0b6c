use std::borrow::Cow;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::super::constants::{INSTRUCTIONS_HEIGHT, STATUS_MESSAGE_MIN_HEIGHT};
use super::super::view::Message;

pub(in crate::tui) fn draw_status(f: &mut Frame<'_>, area: Rect, instructions: &str, message: Option<&Message>) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(status_layout_constraints())
        .split(area);

    let help = Paragraph::new(instructions)
        .block(Block::default().title("Keys").borders(Borders::ALL))
        .wrap(Wrap { trim: true });
    f.render_widget(help, rows[0]);

    let status = Paragraph::new(status_text(message))
        .block(Block::default().title("Status").borders(Borders::ALL))
        .style(message.map_or_else(Style::default, Message::style));
    f.render_widget(status, rows[1]);
}

pub(in crate::tui) const fn status_layout_constraints() -> [Constraint; 2] {
    [
        Constraint::Length(INSTRUCTIONS_HEIGHT),
        Constraint::Min(STATUS_MESSAGE_MIN_HEIGHT),
    ]
}

fn status_text(message: Option<&Message>) -> Cow<'_, str> {
    message.map_or(Cow::Borrowed("No status messages"), |msg| {
        Cow::Borrowed(msg.text.as_str())
    })
}
