use anyhow::Result;
use taskmeter_app::{Confirm, FixedAnswer, Gesture, ImportPick, SnapshotStorage, load_pick};
use taskmeter_core::{Task, TaskId};

use super::super::confirm::PopupConfirm;
use super::super::editor::{
    edit_task_editor_template, import_path_template, new_task_editor_template, parse_task_editor_output,
};
use super::super::terminal::{Term, edit_in_editor};
use super::super::view::{Ui, UiAction};

pub(super) fn handle_ui_action<S: SnapshotStorage>(terminal: &mut Term, ui: &mut Ui<S>, action: UiAction) -> Result<()> {
    match action {
        UiAction::CreateTask => {
            let template = new_task_editor_template();
            let raw = edit_in_editor(terminal, &template)?;
            ui.apply_new_task_input(&raw);
        }
        UiAction::EditTask { task } => {
            let Some(template) = ui.controller.store().get(task).map(edit_task_editor_template) else {
                ui.error("The task to edit no longer exists");
                return Ok(());
            };
            let raw = edit_in_editor(terminal, &template)?;
            ui.apply_edit_task_input(task, &raw);
        }
        UiAction::DeleteTask { task } => {
            let mut confirm = popup(terminal, ui);
            ui.apply_delete(task, &mut confirm);
        }
        UiAction::ImportTasks => {
            let raw = edit_in_editor(terminal, &import_path_template())?;
            let mut confirm = popup(terminal, ui);
            ui.apply_import_input(&raw, &mut confirm);
        }
        UiAction::ClearAll => {
            let mut confirm = popup(terminal, ui);
            ui.apply_clear_all(&mut confirm);
        }
    }
    Ok(())
}

fn popup<'t, S: SnapshotStorage>(terminal: &'t mut Term, ui: &Ui<S>) -> PopupConfirm<'t> {
    PopupConfirm::new(
        terminal,
        ui.controller.board().clone(),
        ui.selected,
        ui.keybindings.clone(),
    )
}

impl<S: SnapshotStorage> Ui<S> {
    pub(in crate::tui) fn apply_new_task_input(&mut self, raw: &str) {
        match parse_task_editor_output(raw) {
            Ok(Some(form)) => {
                let gesture = Gesture::Create {
                    name: form.name,
                    target: form.target,
                };
                if self.apply_gesture(gesture, &mut FixedAnswer(false)).is_some()
                    && let Some(id) = self.controller.store().tasks().last().map(Task::id)
                {
                    self.select_task(id);
                }
            }
            Ok(None) => self.info("Task creation cancelled"),
            Err(msg) => self.error(msg),
        }
    }

    pub(in crate::tui) fn apply_edit_task_input(&mut self, task: TaskId, raw: &str) {
        let Some(existing) = self.controller.store().get(task) else {
            self.error("The task to edit no longer exists");
            return;
        };
        let existing_current = existing.current();
        match parse_task_editor_output(raw) {
            Ok(Some(form)) => {
                let gesture = Gesture::Edit {
                    id: task,
                    name: form.name,
                    current: form.current.unwrap_or_else(|| existing_current.to_string()),
                    target: form.target,
                };
                self.apply_gesture(gesture, &mut FixedAnswer(false));
            }
            Ok(None) => self.info("Edit cancelled"),
            Err(msg) => self.error(msg),
        }
    }

    pub(in crate::tui) fn apply_delete(&mut self, task: TaskId, confirm: &mut dyn Confirm) {
        self.apply_gesture(Gesture::Delete(task), confirm);
    }

    pub(in crate::tui) fn apply_import_input(&mut self, raw: &str, confirm: &mut dyn Confirm) {
        match load_pick(ImportPick::from_prompt(raw)) {
            Ok(Some(tasks)) => {
                if self.apply_gesture(Gesture::Import(tasks), confirm).is_some() {
                    self.selected = 0;
                }
            }
            Ok(None) => self.info("Import cancelled"),
            Err(err) => self.error(format!("Import failed: {err}")),
        }
    }

    pub(in crate::tui) fn apply_clear_all(&mut self, confirm: &mut dyn Confirm) {
        self.apply_gesture(Gesture::ClearAll, confirm);
    }
}
