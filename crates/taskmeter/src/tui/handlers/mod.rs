use anyhow::Result;
use taskmeter_app::SnapshotStorage;

use super::terminal::Term;
use super::view::{Ui, UiAction};

pub(super) mod edit;
pub(super) mod navigation;

pub(super) fn handle_ui_action<S: SnapshotStorage>(terminal: &mut Term, ui: &mut Ui<S>, action: UiAction) -> Result<()> {
    edit::handle_ui_action(terminal, ui, action)
}
