use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
};
use taskmeter_app::{Board, Control, TaskCard};

use super::super::constants::{PROGRESS_BAR_WIDTH, TASK_LIST_HIGHLIGHT_SYMBOL, TASK_NAME_MAX_GRAPHEMES};
use super::util::{completion_marker, progress_bar, truncate_with_ellipsis};

pub(in crate::tui) fn draw_task_list(f: &mut Frame<'_>, area: Rect, board: &Board, selected: usize) {
    let items = match board {
        Board::Empty(empty) => vec![
            ListItem::new(Line::from(Span::styled(
                empty.title,
                Style::default().add_modifier(Modifier::BOLD),
            ))),
            ListItem::new(Line::from(Span::styled(
                empty.hint,
                Style::default().fg(Color::DarkGray),
            ))),
        ],
        Board::Cards(cards) => cards.iter().map(card_item).collect(),
    };

    let list = List::new(items)
        .block(Block::default().title("Tasks").borders(Borders::ALL))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol(TASK_LIST_HIGHLIGHT_SYMBOL);
    let mut state = ListState::default();
    if !board.cards().is_empty() {
        state.select(Some(selected));
    }
    f.render_stateful_widget(list, area, &mut state);
}

fn card_item(card: &TaskCard) -> ListItem<'_> {
    let name_style = if card.complete {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    let name = truncate_with_ellipsis(card.name.as_str(), TASK_NAME_MAX_GRAPHEMES).into_owned();
    let title = Line::from(vec![
        Span::styled(name, name_style),
        Span::styled(completion_marker(card.complete), Style::default().fg(Color::Green)),
    ]);

    let bar = progress_bar(card.current, card.target, PROGRESS_BAR_WIDTH);
    let meta = Line::from(vec![
        Span::styled(bar, Style::default().fg(Color::Cyan)),
        Span::raw(" "),
        Span::styled(card.progress_label(), Style::default().fg(Color::DarkGray)),
    ]);

    let controls = Control::ALL
        .iter()
        .map(|control| format!("[{}]", control.label()))
        .collect::<Vec<_>>()
        .join(" ");
    let controls = Line::from(Span::styled(controls, Style::default().fg(Color::DarkGray)));

    ListItem::new(vec![title, meta, controls])
}
