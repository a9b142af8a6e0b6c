//! Application layer logic for taskmeter.
//!
//! This crate owns the task store, its persistence policy, the display
//! model and the gesture controller shared by the CLI and the TUI.

pub mod autosave;
pub mod board;
pub mod config;
pub mod controller;
pub mod import_file;
pub mod persistence;
pub mod storage;
pub mod store;

// Re-exports for convenience
pub use autosave::{Autosave, DEFAULT_AUTOSAVE_INTERVAL};
pub use board::{Board, Control, EmptyState, EscapedText, Redraw, TaskCard};
pub use config::{AppConfig, AutosaveConfig, StorageConfig, default_config_path};
pub use controller::{Confirm, Controller, ControllerError, Direction, Export, FixedAnswer, Gesture, Outcome};
pub use import_file::{ImportPick, load_pick, read_import};
pub use persistence::{DEFAULT_STORAGE_KEY, Persistence, PersistenceError};
pub use storage::{MemoryStorage, SnapshotStorage};
pub use store::{TaskStore, export_file_name};
