use std::path::Path;

use crossterm::event::{KeyEvent, KeyEventKind};
use taskmeter_app::{Direction, FixedAnswer, Gesture, SnapshotStorage};
use taskmeter_core::TaskId;
use time::OffsetDateTime;

use super::super::view::{Ui, UiAction};
use crate::config::{Action, ViewType};

impl<S: SnapshotStorage> Ui<S> {
    pub(in crate::tui) fn handle_key(&mut self, key: KeyEvent) -> Option<UiAction> {
        if key.kind != KeyEventKind::Press {
            return None;
        }

        self.handle_task_list_key(key)
    }

    fn handle_task_list_key(&mut self, key: KeyEvent) -> Option<UiAction> {
        if self.bound(Action::Quit, &key) {
            self.should_quit = true;
            return None;
        }

        if self.bound(Action::Down, &key) {
            self.select_next();
            return None;
        }

        if self.bound(Action::Up, &key) {
            self.select_prev();
            return None;
        }

        if self.bound(Action::Increment, &key) {
            self.step_selected(1);
            return None;
        }

        if self.bound(Action::Decrement, &key) {
            self.step_selected(-1);
            return None;
        }

        if self.bound(Action::MoveUp, &key) {
            self.move_selected(Direction::Up);
            return None;
        }

        if self.bound(Action::MoveDown, &key) {
            self.move_selected(Direction::Down);
            return None;
        }

        if self.bound(Action::Create, &key) {
            return Some(UiAction::CreateTask);
        }

        if self.bound(Action::Edit, &key) {
            return self.require_selection("edit").map(|task| UiAction::EditTask { task });
        }

        if self.bound(Action::Delete, &key) {
            return self.require_selection("delete").map(|task| UiAction::DeleteTask { task });
        }

        if self.bound(Action::Import, &key) {
            return Some(UiAction::ImportTasks);
        }

        if self.bound(Action::Export, &key) {
            self.export_to(Path::new("."), OffsetDateTime::now_utc().date());
            return None;
        }

        if self.bound(Action::ClearAll, &key) {
            if self.controller.store().is_empty() {
                self.info("No tasks to delete");
                return None;
            }
            return Some(UiAction::ClearAll);
        }

        None
    }

    fn bound(&self, action: Action, key: &KeyEvent) -> bool {
        self.keybindings.matches(ViewType::TaskList, action, key)
    }

    fn require_selection(&mut self, what: &str) -> Option<TaskId> {
        let selected = self.selected_task_id();
        if selected.is_none() {
            self.error(format!("No task selected to {what}"));
        }
        selected
    }

    fn step_selected(&mut self, delta: i64) {
        let Some(id) = self.require_selection("update") else {
            return;
        };
        let gesture = if delta > 0 {
            Gesture::Increment(id)
        } else {
            Gesture::Decrement(id)
        };
        self.apply_gesture(gesture, &mut FixedAnswer(false));
    }

    fn move_selected(&mut self, direction: Direction) {
        let Some(id) = self.require_selection("move") else {
            return;
        };
        let Some(order) = self.controller.order_after_move(id, direction) else {
            return;
        };
        if self
            .apply_gesture(Gesture::Reorder(order), &mut FixedAnswer(false))
            .is_some()
        {
            self.select_task(id);
        }
    }
}
