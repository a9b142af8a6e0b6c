//! Display model of the task list, shared by the TUI and the text output.

use std::fmt;

use taskmeter_core::{Task, TaskId};

/// Text that is safe to draw on a terminal.
///
/// Control characters (escape sequences included) and bidirectional
/// overrides are replaced by their `\u{..}` spelling, so a task name can never
/// move the cursor, recolor the screen or reorder neighbouring text. The only
/// way to build one is [`EscapedText::escape`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscapedText(String);

impl EscapedText {
    /// Escape arbitrary user text.
    #[must_use]
    pub fn escape(raw: &str) -> Self {
        let mut out = String::with_capacity(raw.len());
        for ch in raw.chars() {
            if needs_escape(ch) {
                out.extend(ch.escape_unicode());
            } else {
                out.push(ch);
            }
        }
        Self(out)
    }

    /// Escaped text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EscapedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn needs_escape(ch: char) -> bool {
    ch.is_control() || matches!(ch, '\u{202A}'..='\u{202E}' | '\u{2066}'..='\u{2069}')
}

/// Affordance offered on every card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Add one to the progress.
    Increment,
    /// Subtract one from the progress.
    Decrement,
    /// Open the editor for the task.
    Edit,
    /// Remove the task after confirmation.
    Delete,
}

impl Control {
    /// All controls in display order.
    pub const ALL: [Self; 4] = [Self::Increment, Self::Decrement, Self::Edit, Self::Delete];

    /// Short label shown next to the key hint.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Increment => "+1",
            Self::Decrement => "-1",
            Self::Edit => "edit",
            Self::Delete => "delete",
        }
    }
}

/// One rendered task.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskCard {
    /// Task the card belongs to.
    pub id: TaskId,
    /// Escaped task name.
    pub name: EscapedText,
    /// Progress made.
    pub current: i64,
    /// Goal value.
    pub target: i64,
    /// `current / target` as a percentage.
    pub percent: f64,
    /// Whether the goal was reached.
    pub complete: bool,
    /// Controls shown on the card.
    pub controls: [Control; 4],
}

impl TaskCard {
    /// Build the card for `task`.
    #[must_use]
    pub fn from_task(task: &Task) -> Self {
        Self {
            id: task.id(),
            name: EscapedText::escape(task.name()),
            current: task.current(),
            target: task.target(),
            percent: task.percent_complete(),
            complete: task.is_complete(),
            controls: Control::ALL,
        }
    }

    /// Progress ratio in `0.0..=1.0`, for gauges.
    #[must_use]
    pub fn ratio(&self) -> f64 {
        (self.percent / 100.0).clamp(0.0, 1.0)
    }

    /// `current / target (pct%)`.
    #[must_use]
    pub fn progress_label(&self) -> String {
        format!("{} / {} ({:.0}%)", self.current, self.target, self.percent)
    }
}

/// Placeholder shown when there are no tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    /// Headline.
    pub title: &'static str,
    /// Hint on how to get started.
    pub hint: &'static str,
}

impl Default for EmptyState {
    fn default() -> Self {
        Self {
            title: "No tasks yet",
            hint: "Create a task to start tracking progress.",
        }
    }
}

/// What redraw a mutation requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redraw {
    /// Nothing visible changed.
    None,
    /// Only the card of this task changed.
    Card(TaskId),
    /// The list itself changed.
    Full,
}

/// Display tree for the whole task sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum Board {
    /// No tasks.
    Empty(EmptyState),
    /// One card per task, in sequence order.
    Cards(Vec<TaskCard>),
}

impl Default for Board {
    fn default() -> Self {
        Self::Empty(EmptyState::default())
    }
}

impl Board {
    /// Build the board for `tasks`.
    #[must_use]
    pub fn render(tasks: &[Task]) -> Self {
        if tasks.is_empty() {
            Self::Empty(EmptyState::default())
        } else {
            Self::Cards(tasks.iter().map(TaskCard::from_task).collect())
        }
    }

    /// Update the card of `task` in place. Returns `false` when the board
    /// has no card for it (a full render is needed instead).
    pub fn refresh_card(&mut self, task: &Task) -> bool {
        let Self::Cards(cards) = self else {
            return false;
        };
        match cards.iter_mut().find(|card| card.id == task.id()) {
            Some(card) => {
                *card = TaskCard::from_task(task);
                true
            }
            None => false,
        }
    }

    /// Apply a redraw hint against the current `tasks`.
    pub fn sync(&mut self, redraw: Redraw, tasks: &[Task]) {
        match redraw {
            Redraw::None => {}
            Redraw::Card(id) => {
                let refreshed = tasks
                    .iter()
                    .find(|task| task.id() == id)
                    .is_some_and(|task| self.refresh_card(task));
                if !refreshed {
                    *self = Self::render(tasks);
                }
            }
            Redraw::Full => *self = Self::render(tasks),
        }
    }

    /// Cards on the board; empty when the board shows the empty state.
    #[must_use]
    pub fn cards(&self) -> &[TaskCard] {
        match self {
            Self::Empty(_) => &[],
            Self::Cards(cards) => cards,
        }
    }

    /// Position of the card for `id`.
    #[must_use]
    pub fn position(&self, id: TaskId) -> Option<usize> {
        self.cards().iter().position(|card| card.id == id)
    }
}
