use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::super::constants::{CONFIRM_POPUP_HEIGHT, CONFIRM_POPUP_MIN_WIDTH, CONFIRM_POPUP_WIDTH_PERCENT};

/// Modal yes/no question drawn over whatever is on screen.
pub(in crate::tui) fn draw_confirm_popup(f: &mut Frame<'_>, prompt: &str, help: &str) {
    let popup_area = confirm_popup_area(f.area());

    let block = Block::default()
        .title("Confirm")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .style(Style::default().bg(Color::Black));

    f.render_widget(Clear, popup_area);
    let inner = block.inner(popup_area);
    f.render_widget(block, popup_area);

    let lines = vec![
        Line::from(Span::styled(prompt, Style::default().add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from(Span::styled(help, Style::default().fg(Color::DarkGray))),
    ];
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, inner);
}

pub(in crate::tui) fn confirm_popup_area(area: Rect) -> Rect {
    let scaled = u32::from(area.width) * u32::from(CONFIRM_POPUP_WIDTH_PERCENT) / 100;
    let width = u16::try_from(scaled)
        .unwrap_or(area.width)
        .max(CONFIRM_POPUP_MIN_WIDTH)
        .min(area.width);
    let height = CONFIRM_POPUP_HEIGHT.min(area.height);
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    }
}
