use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
};
use taskmeter_app::Board;

use super::constants::{MAIN_MIN_HEIGHT, STATUS_FOOTER_MIN_HEIGHT};
use super::view::Message;

pub(super) mod detail_pane;
pub(super) mod popups;
pub(super) mod status;
pub(super) mod task_list;
pub(super) mod util;

pub(super) use popups::draw_confirm_popup;
use status::draw_status;

/// Full screen: board on top, key help and status line below.
pub(super) fn draw_screen(
    f: &mut Frame<'_>,
    board: &Board,
    selected: usize,
    instructions: &str,
    message: Option<&Message>,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(MAIN_MIN_HEIGHT),
            Constraint::Length(STATUS_FOOTER_MIN_HEIGHT),
        ])
        .split(f.area());

    draw_board(f, chunks[0], board, selected);
    draw_status(f, chunks[1], instructions, message);
}

/// Task list on the left, details of the selected card on the right.
fn draw_board(f: &mut Frame<'_>, area: Rect, board: &Board, selected: usize) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    task_list::draw_task_list(f, columns[0], board, selected);
    detail_pane::draw_task_details(f, columns[1], board.cards().get(selected));
}

#[cfg(test)]
pub(super) fn truncate_with_ellipsis(input: &str, max_graphemes: usize) -> std::borrow::Cow<'_, str> {
    util::truncate_with_ellipsis(input, max_graphemes)
}

#[cfg(test)]
pub(super) fn progress_bar(current: i64, target: i64, width: usize) -> String {
    util::progress_bar(current, target, width)
}

