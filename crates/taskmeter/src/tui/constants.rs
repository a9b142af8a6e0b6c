//! Shared constants for the TUI to keep layout and timing in sync.

/// Interval in milliseconds between UI ticks/redraws.
pub const TUI_TICK_RATE_MS: u64 = 200;
/// Time-to-live in seconds for transient status messages.
pub const UI_MESSAGE_TTL_SECS: u64 = 5;
/// Highlight symbol shown beside selected list entries.
pub const TASK_LIST_HIGHLIGHT_SYMBOL: &str = "▶ ";
/// Number of cells in the inline progress bar of a list entry.
pub const PROGRESS_BAR_WIDTH: usize = 20;
/// Longest task name shown in a list entry before truncation.
pub const TASK_NAME_MAX_GRAPHEMES: usize = 48;
/// Width percentage for the confirmation popup before clamping.
pub const CONFIRM_POPUP_WIDTH_PERCENT: u16 = 50;
/// Minimum width for the confirmation popup.
pub const CONFIRM_POPUP_MIN_WIDTH: u16 = 40;
/// Height of the confirmation popup.
pub const CONFIRM_POPUP_HEIGHT: u16 = 7;
/// Height of the key help box in the status footer.
pub const INSTRUCTIONS_HEIGHT: u16 = 3;
/// Minimum height of the status message box.
pub const STATUS_MESSAGE_MIN_HEIGHT: u16 = 3;
/// Minimum height of the task list and detail area.
pub const MAIN_MIN_HEIGHT: u16 = 5;
/// Total minimum height of the status footer.
pub const STATUS_FOOTER_MIN_HEIGHT: u16 = INSTRUCTIONS_HEIGHT + STATUS_MESSAGE_MIN_HEIGHT;
