use std::path::Path;
use std::time::{Duration, Instant};

use ratatui::{
    Frame,
    style::{Color, Style},
};
use taskmeter_app::{Confirm, Controller, Gesture, Outcome, Redraw, SnapshotStorage, TaskCard};
use taskmeter_core::TaskId;
use time::Date;

use super::constants::UI_MESSAGE_TTL_SECS;
use super::widgets;
use crate::config::{KeyBindingsConfig, ViewType};

pub(super) struct Ui<S> {
    pub(super) controller: Controller<S>,
    pub(super) selected: usize,
    pub(super) message: Option<Message>,
    pub(super) should_quit: bool,
    /// Keybindings configuration.
    pub(super) keybindings: KeyBindingsConfig,
}

impl<S: SnapshotStorage> Ui<S> {
    pub(super) const fn new(controller: Controller<S>, keybindings: KeyBindingsConfig) -> Self {
        Self {
            controller,
            selected: 0,
            message: None,
            should_quit: false,
            keybindings,
        }
    }

    pub(super) fn selected_card(&self) -> Option<&TaskCard> {
        self.controller.board().cards().get(self.selected)
    }

    pub(super) fn selected_task_id(&self) -> Option<TaskId> {
        self.selected_card().map(|card| card.id)
    }

    pub(super) fn select_next(&mut self) {
        let len = self.controller.board().cards().len();
        if self.selected + 1 < len {
            self.selected += 1;
        }
    }

    pub(super) const fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub(super) fn select_task(&mut self, id: TaskId) {
        if let Some(index) = self.controller.board().position(id) {
            self.selected = index;
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.controller.board().cards().len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    /// Run a gesture and reflect its outcome in the status line.
    pub(super) fn apply_gesture(&mut self, gesture: Gesture, confirm: &mut dyn Confirm) -> Option<Outcome> {
        match self.controller.dispatch(gesture, confirm) {
            Ok(outcome) => {
                if let Some(notice) = &outcome.notice {
                    self.info(notice.clone());
                }
                if let Some(warning) = &outcome.warning {
                    self.error(warning.clone());
                }
                if outcome.redraw == Redraw::Full {
                    self.clamp_selection();
                }
                Some(outcome)
            }
            Err(err) => {
                self.error(err.to_string());
                None
            }
        }
    }

    /// Write the export file into `dir`.
    pub(super) fn export_to(&mut self, dir: &Path, today: Date) {
        let export = match self.controller.export(today) {
            Ok(export) => export,
            Err(err) => {
                self.error(format!("Export failed: {err}"));
                return;
            }
        };
        let path = dir.join(&export.file_name);
        match std::fs::write(&path, &export.contents) {
            Ok(()) => self.info(format!(
                "Exported {} tasks to {}",
                self.controller.store().len(),
                path.display()
            )),
            Err(err) => self.error(format!("Export failed: {err}")),
        }
    }

    pub(super) fn draw(&self, f: &mut Frame<'_>) {
        widgets::draw_screen(
            f,
            self.controller.board(),
            self.selected,
            &self.instructions(),
            self.message.as_ref(),
        );
    }

    pub(super) fn instructions(&self) -> String {
        self.keybindings.generate_help_text(ViewType::TaskList)
    }

    pub(super) fn info(&mut self, message: impl Into<String>) {
        self.message = Some(Message::info(message));
    }

    pub(super) fn error(&mut self, message: impl Into<String>) {
        self.message = Some(Message::error(message));
    }

    /// Put the reason the saved tasks were not loaded on the status line.
    pub(super) fn report_load_problem(&mut self) {
        if let Some(problem) = self.controller.take_load_warning() {
            self.error(problem.to_string());
        }
    }

    pub(super) fn tick(&mut self, now: Instant) {
        if let Some(err) = self.controller.tick(now) {
            self.error(format!("Autosave failed: {err}"));
        }
        if let Some(msg) = &self.message
            && msg.is_expired(Duration::from_secs(UI_MESSAGE_TTL_SECS))
        {
            self.message = None;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum UiAction {
    CreateTask,
    EditTask { task: TaskId },
    DeleteTask { task: TaskId },
    ImportTasks,
    ClearAll,
}

pub(super) struct Message {
    pub(super) text: String,
    pub(super) level: MessageLevel,
    created_at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum MessageLevel {
    Info,
    Error,
}

impl Message {
    fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: MessageLevel::Info,
            created_at: Instant::now(),
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: MessageLevel::Error,
            created_at: Instant::now(),
        }
    }

    pub(super) fn style(&self) -> Style {
        match self.level {
            MessageLevel::Info => Style::default().fg(Color::Green),
            MessageLevel::Error => Style::default().fg(Color::Red),
        }
    }

    fn is_expired(&self, ttl: Duration) -> bool {
        self.created_at.elapsed() >= ttl
    }
}
