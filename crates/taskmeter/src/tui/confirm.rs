use anyhow::Result;
use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use taskmeter_app::{Board, Confirm};
use tracing::warn;

use super::terminal::Term;
use super::widgets;
use crate::config::{Action, KeyBindingsConfig, ViewType};

/// Modal popup answering [`Confirm`] questions inside the TUI.
///
/// Keeps its own copy of the board so the list stays visible behind the
/// popup while the controller is busy with the gesture being confirmed.
/// The footer shows the popup's own key help.
pub(super) struct PopupConfirm<'t> {
    terminal: &'t mut Term,
    board: Board,
    selected: usize,
    keybindings: KeyBindingsConfig,
}

impl<'t> PopupConfirm<'t> {
    pub(super) const fn new(terminal: &'t mut Term, board: Board, selected: usize, keybindings: KeyBindingsConfig) -> Self {
        Self {
            terminal,
            board,
            selected,
            keybindings,
        }
    }

    fn ask(&mut self, prompt: &str) -> Result<bool> {
        let help = self.keybindings.generate_help_text(ViewType::Confirm);
        loop {
            self.terminal.draw(|f| {
                widgets::draw_screen(f, &self.board, self.selected, &help, None);
                widgets::draw_confirm_popup(f, prompt, &help);
            })?;

            if let CrosstermEvent::Key(key) = event::read()?
                && let Some(answer) = answer_for(&self.keybindings, &key)
            {
                return Ok(answer);
            }
        }
    }
}

impl Confirm for PopupConfirm<'_> {
    fn confirm(&mut self, prompt: &str) -> bool {
        self.ask(prompt).unwrap_or_else(|err| {
            warn!(error = %err, "Confirmation popup failed; treating as no");
            false
        })
    }
}

/// `Some(true)` for accept, `Some(false)` for reject, `None` for any other key.
pub(super) fn answer_for(keybindings: &KeyBindingsConfig, key: &KeyEvent) -> Option<bool> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if keybindings.matches(ViewType::Confirm, Action::Accept, key) {
        Some(true)
    } else if keybindings.matches(ViewType::Confirm, Action::Reject, key) {
        Some(false)
    } else {
        None
    }
}
