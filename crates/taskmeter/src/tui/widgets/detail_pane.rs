use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
};
use taskmeter_app::TaskCard;

pub(in crate::tui) fn draw_task_details(f: &mut Frame<'_>, area: Rect, card: Option<&TaskCard>) {
    let block = Block::default().title("Details").borders(Borders::ALL);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(card) = card else {
        let paragraph = Paragraph::new("No task selected").wrap(Wrap { trim: false });
        f.render_widget(paragraph, inner);
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(inner);

    let status = if card.complete { "complete" } else { "in progress" };
    let lines = vec![
        Line::from(Span::styled(
            card.name.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("ID: {}", card.id)),
        Line::from(format!("Progress: {} of {}", card.current, card.target)),
        Line::from(format!("Status: {status}")),
    ];
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), rows[0]);

    let color = if card.complete { Color::Green } else { Color::Cyan };
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(color))
        .ratio(card.ratio())
        .label(card.progress_label());
    f.render_widget(gauge, rows[1]);
}
