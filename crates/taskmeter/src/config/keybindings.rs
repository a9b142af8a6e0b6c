//! Keybindings configuration for the TUI.

#![allow(
    clippy::uninlined_format_args,
    clippy::map_unwrap_or,
    clippy::enum_glob_use,
    clippy::unused_self
)]

use anyhow::{Context, Result, anyhow, bail};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use taskmeter_app::AppConfig;

macro_rules! vec_of_strings {
    ($($s:expr),* $(,)?) => {
        vec![$($s.to_string()),*]
    };
}

/// TUI part of the taskmeter configuration file.
///
/// The `[storage]` and `[autosave]` tables of the same file belong to
/// [`AppConfig`] and are ignored here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// TUI configuration.
    #[serde(default)]
    pub tui: TuiConfig,
}

/// TUI-specific configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TuiConfig {
    /// Keybindings configuration.
    pub keybindings: KeyBindingsConfig,
}

/// Keybindings configuration for all TUI views.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeyBindingsConfig {
    /// Keybindings for the task list view.
    pub task_list: TaskListKeyBindings,
    /// Keybindings for the confirmation popup.
    pub confirm: ConfirmKeyBindings,
}

/// Keybindings for the task list view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskListKeyBindings {
    /// Quit the application.
    pub quit: Vec<String>,
    /// Move down in the list.
    pub down: Vec<String>,
    /// Move up in the list.
    pub up: Vec<String>,
    /// Add one to the selected task.
    pub increment: Vec<String>,
    /// Subtract one from the selected task.
    pub decrement: Vec<String>,
    /// Create a new task.
    pub create: Vec<String>,
    /// Edit the selected task.
    pub edit: Vec<String>,
    /// Delete the selected task.
    pub delete: Vec<String>,
    /// Move the selected task up.
    pub move_up: Vec<String>,
    /// Move the selected task down.
    pub move_down: Vec<String>,
    /// Import tasks from a file.
    pub import: Vec<String>,
    /// Export tasks to a file.
    pub export: Vec<String>,
    /// Delete every task.
    pub clear_all: Vec<String>,
}

/// Keybindings for the confirmation popup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmKeyBindings {
    /// Answer yes.
    pub accept: Vec<String>,
    /// Answer no.
    pub reject: Vec<String>,
}

impl Default for TaskListKeyBindings {
    fn default() -> Self {
        Self {
            quit: vec_of_strings!["q", "Esc"],
            down: vec_of_strings!["j", "Down"],
            up: vec_of_strings!["k", "Up"],
            increment: vec_of_strings!["+", "=", "l", "Right"],
            decrement: vec_of_strings!["-", "h", "Left"],
            create: vec_of_strings!["n"],
            edit: vec_of_strings!["e", "Enter"],
            delete: vec_of_strings!["d", "Delete"],
            move_up: vec_of_strings!["K"],
            move_down: vec_of_strings!["J"],
            import: vec_of_strings!["i"],
            export: vec_of_strings!["o"],
            clear_all: vec_of_strings!["D"],
        }
    }
}

impl Default for ConfirmKeyBindings {
    fn default() -> Self {
        Self {
            accept: vec_of_strings!["y", "Y", "Enter"],
            reject: vec_of_strings!["n", "N", "q", "Esc"],
        }
    }
}

/// Returns the default configuration file path.
///
/// On Linux: `~/.config/taskmeter/config.toml`
/// On macOS: `~/Library/Application Support/taskmeter/config.toml`
/// On Windows: `%APPDATA%\taskmeter\config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    taskmeter_app::default_config_path()
}

/// Generate the default configuration file, storage settings included.
pub fn generate_default_config_toml() -> Result<String> {
    let app = toml::to_string_pretty(&AppConfig::default()).context("failed to serialize default storage settings")?;
    let tui = toml::to_string_pretty(&Config::default()).context("failed to serialize default keybindings")?;

    let header = r#"# taskmeter Configuration
#
# [storage]
# dir         = directory holding the task snapshot (default: platform data dir)
# key         = snapshot name; the file is <dir>/<key>.json
# quota_bytes = largest snapshot that may be written, 0 for no limit
#
# [autosave]
# interval_secs = seconds between periodic saves while the TUI runs
#
# [tui.keybindings]
# Each action can have multiple key bindings.
#
# Supported key formats:
# - Single characters: "j", "k", "+", "1"
# - Special keys: "Enter", "Esc", "Tab", "Backspace", "Delete"
# - Arrow keys: "Up", "Down", "Left", "Right"
# - Navigation keys: "Home", "End", "PageUp", "PageDown"
# - Modified keys: "Ctrl+d", "Alt+k", "Shift+Up"
#
# Note: When [tui.keybindings] is present, ALL default keybindings are disabled.
# Make sure to define all actions you need.

"#;

    Ok(format!("{}{}\n{}", header, app, tui))
}

/// Load configuration from a TOML file.
///
/// # Arguments
/// - `path`: Optional path to the config file. If `None`, uses the default path.
///
/// # Returns
/// - `Ok(Some(config))` if the file exists and was successfully parsed
/// - `Ok(None)` if the file does not exist
/// - `Err(_)` if there was an error reading or parsing the file
pub fn load_config(path: Option<&Path>) -> Result<Option<Config>> {
    let config_path = match path {
        Some(p) => p.to_path_buf(),
        None => match default_config_path() {
            Some(p) => p,
            None => return Ok(None),
        },
    };

    if !config_path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

    Ok(Some(config))
}

/// Parse a key string into a `KeyEvent`.
///
/// # Examples
/// - "j" -> `KeyCode::Char('j')`
/// - "+" -> `KeyCode::Char('+')`
/// - "Enter" -> `KeyCode::Enter`
/// - "Ctrl+d" -> `KeyCode::Char('d')` with CONTROL modifier
pub fn parse_key(s: &str) -> Result<KeyEvent> {
    if s.is_empty() {
        bail!("Empty key string");
    }

    // A trailing "+" is the plus key itself, not a separator.
    let (modifier_part, key_part) = match s.strip_suffix("++") {
        Some(prefix) => (Some(prefix), "+"),
        None if s == "+" => (None, s),
        None => match s.rsplit_once('+') {
            Some((prefix, key)) => (Some(prefix), key),
            None => (None, s),
        },
    };

    let mut modifiers = KeyModifiers::NONE;
    if let Some(prefix) = modifier_part {
        for modifier in prefix.split('+') {
            match modifier {
                "Ctrl" | "Control" => modifiers |= KeyModifiers::CONTROL,
                "Alt" => modifiers |= KeyModifiers::ALT,
                "Shift" => modifiers |= KeyModifiers::SHIFT,
                other => bail!("Unknown modifier: {}", other),
            }
        }
    }

    let code = parse_key_code(key_part)?;

    Ok(KeyEvent::new(code, modifiers))
}

fn parse_key_code(s: &str) -> Result<KeyCode> {
    match s {
        "Enter" => Ok(KeyCode::Enter),
        "Esc" => Ok(KeyCode::Esc),
        "Backspace" => Ok(KeyCode::Backspace),
        "Left" => Ok(KeyCode::Left),
        "Right" => Ok(KeyCode::Right),
        "Up" => Ok(KeyCode::Up),
        "Down" => Ok(KeyCode::Down),
        "Home" => Ok(KeyCode::Home),
        "End" => Ok(KeyCode::End),
        "PageUp" => Ok(KeyCode::PageUp),
        "PageDown" => Ok(KeyCode::PageDown),
        "Tab" => Ok(KeyCode::Tab),
        "Delete" => Ok(KeyCode::Delete),
        "Insert" => Ok(KeyCode::Insert),
        s if s.chars().count() == 1 => {
            let ch = s.chars().next().ok_or_else(|| anyhow!("Empty char"))?;
            Ok(KeyCode::Char(ch))
        }
        other => bail!("Unknown key: {}", other),
    }
}

/// Validate the TUI configuration.
///
/// Checks for:
/// - Key conflicts within each view
/// - Invalid key expressions
/// - Empty key bindings
pub fn validate_tui_config(config: &TuiConfig) -> Result<()> {
    validate_keybindings_config(&config.keybindings)
}

/// Validate the keybindings configuration.
pub fn validate_keybindings_config(config: &KeyBindingsConfig) -> Result<()> {
    validate_non_empty_bindings(config)?;
    validate_key_expressions(config)?;
    validate_keybindings(config)?;
    Ok(())
}

/// Validate that all keybinding fields have at least one key.
fn validate_non_empty_bindings(config: &KeyBindingsConfig) -> Result<()> {
    for (view, bindings) in collect_all_bindings(config) {
        for (action, keys) in bindings {
            if keys.is_empty() {
                bail!("{}.{} must have at least one key binding", view, action);
            }
        }
    }
    Ok(())
}

/// Validate that all key expressions can be parsed.
fn validate_key_expressions(config: &KeyBindingsConfig) -> Result<()> {
    for (view, bindings) in collect_all_bindings(config) {
        for (action, keys) in bindings {
            for key in keys {
                parse_key(key).with_context(|| format!("Invalid key '{}' in {}.{}", key, view, action))?;
            }
        }
    }
    Ok(())
}

/// Validate that there are no key conflicts within each view.
fn validate_keybindings(config: &KeyBindingsConfig) -> Result<()> {
    for (view, bindings) in collect_all_bindings(config) {
        validate_view_keybindings(view, &bindings)?;
    }
    Ok(())
}

fn validate_view_keybindings(view_name: &str, bindings: &[(&'static str, &[String])]) -> Result<()> {
    let mut key_to_actions: HashMap<&str, Vec<&str>> = HashMap::new();

    for (action, keys) in bindings {
        for key in *keys {
            key_to_actions.entry(key.as_str()).or_default().push(action);
        }
    }

    for (key, actions) in key_to_actions {
        if actions.len() > 1 {
            bail!(
                "Key '{}' is bound to multiple actions in {}: {:?}",
                key,
                view_name,
                actions
            );
        }
    }

    Ok(())
}

type ViewBindings<'a> = Vec<(&'static str, &'a [String])>;

fn collect_all_bindings(config: &KeyBindingsConfig) -> [(&'static str, ViewBindings<'_>); 2] {
    [
        ("task_list", collect_task_list_bindings(config)),
        ("confirm", collect_confirm_bindings(config)),
    ]
}

fn collect_task_list_bindings(config: &KeyBindingsConfig) -> ViewBindings<'_> {
    let keys = &config.task_list;
    vec![
        ("quit", keys.quit.as_slice()),
        ("down", &keys.down),
        ("up", &keys.up),
        ("increment", &keys.increment),
        ("decrement", &keys.decrement),
        ("create", &keys.create),
        ("edit", &keys.edit),
        ("delete", &keys.delete),
        ("move_up", &keys.move_up),
        ("move_down", &keys.move_down),
        ("import", &keys.import),
        ("export", &keys.export),
        ("clear_all", &keys.clear_all),
    ]
}

fn collect_confirm_bindings(config: &KeyBindingsConfig) -> ViewBindings<'_> {
    vec![
        ("accept", config.confirm.accept.as_slice()),
        ("reject", &config.confirm.reject),
    ]
}

/// View type for keybinding context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewType {
    /// Task list view.
    TaskList,
    /// Confirmation popup.
    Confirm,
}

/// Action that can be performed in a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    // TaskList
    /// Quit.
    Quit,
    /// Move down.
    Down,
    /// Move up.
    Up,
    /// Add one to the selected task.
    Increment,
    /// Subtract one from the selected task.
    Decrement,
    /// Create new task.
    Create,
    /// Edit task.
    Edit,
    /// Delete task.
    Delete,
    /// Move task up.
    MoveUp,
    /// Move task down.
    MoveDown,
    /// Import tasks.
    Import,
    /// Export tasks.
    Export,
    /// Delete every task.
    ClearAll,

    // Confirm
    /// Answer yes.
    Accept,
    /// Answer no.
    Reject,
}

impl KeyBindingsConfig {
    /// Generate help text for a specific view.
    pub fn generate_help_text(&self, view: ViewType) -> String {
        match view {
            ViewType::TaskList => self.generate_task_list_help(),
            ViewType::Confirm => self.generate_confirm_help(),
        }
    }

    fn generate_task_list_help(&self) -> String {
        let keys = &self.task_list;
        format!(
            "{}:move {}:progress {}:new {}:edit {}:delete {}:reorder {}:import {}:export {}:clear all {}:quit",
            self.format_key_pair(&keys.down, &keys.up),
            self.format_key_pair(&keys.increment, &keys.decrement),
            self.format_first_key(&keys.create),
            self.format_first_key(&keys.edit),
            self.format_first_key(&keys.delete),
            self.format_key_pair(&keys.move_up, &keys.move_down),
            self.format_first_key(&keys.import),
            self.format_first_key(&keys.export),
            self.format_first_key(&keys.clear_all),
            self.format_first_key(&keys.quit),
        )
    }

    fn generate_confirm_help(&self) -> String {
        format!(
            "{}:yes {}:no",
            self.format_first_key(&self.confirm.accept),
            self.format_first_key(&self.confirm.reject),
        )
    }

    /// Format the first key of a key binding list for display.
    fn format_first_key(&self, keys: &[String]) -> String {
        keys.first()
            .map(|k| self.format_key_display(k))
            .unwrap_or_else(|| "?".to_string())
    }

    /// Format two keys as a pair (e.g., "j/k" for down/up).
    fn format_key_pair(&self, first: &[String], second: &[String]) -> String {
        format!("{}/{}", self.format_first_key(first), self.format_first_key(second))
    }

    /// Format a key for display, converting special keys to readable symbols.
    fn format_key_display(&self, key: &str) -> String {
        match key {
            "Enter" => "↵".to_string(),
            "Backspace" => "BS".to_string(),
            "Delete" => "Del".to_string(),
            "Up" => "↑".to_string(),
            "Down" => "↓".to_string(),
            "Left" => "←".to_string(),
            "Right" => "→".to_string(),
            "PageUp" => "PgUp".to_string(),
            "PageDown" => "PgDn".to_string(),
            other if other.starts_with("Ctrl+") || other.starts_with("Alt+") => other.replacen('+', "-", 1),
            other => other.to_string(),
        }
    }

    /// Check if a key event matches a configured action in a view.
    pub fn matches(&self, view: ViewType, action: Action, key: &KeyEvent) -> bool {
        self.get_keys(view, action)
            .iter()
            .filter_map(|key_str| parse_key(key_str).ok())
            .any(|expected| Self::key_event_matches(&expected, key))
    }

    fn key_event_matches(expected: &KeyEvent, actual: &KeyEvent) -> bool {
        if expected.code != actual.code {
            return false;
        }
        // Terminals report SHIFT for "K" or "+", the character already carries it.
        if let KeyCode::Char(_) = actual.code {
            expected.modifiers - KeyModifiers::SHIFT == actual.modifiers - KeyModifiers::SHIFT
        } else {
            expected.modifiers == actual.modifiers
        }
    }

    fn get_keys(&self, view: ViewType, action: Action) -> &[String] {
        use Action::*;
        use ViewType::*;

        match (view, action) {
            (TaskList, Quit) => &self.task_list.quit,
            (TaskList, Down) => &self.task_list.down,
            (TaskList, Up) => &self.task_list.up,
            (TaskList, Increment) => &self.task_list.increment,
            (TaskList, Decrement) => &self.task_list.decrement,
            (TaskList, Create) => &self.task_list.create,
            (TaskList, Edit) => &self.task_list.edit,
            (TaskList, Delete) => &self.task_list.delete,
            (TaskList, MoveUp) => &self.task_list.move_up,
            (TaskList, MoveDown) => &self.task_list.move_down,
            (TaskList, Import) => &self.task_list.import,
            (TaskList, Export) => &self.task_list.export,
            (TaskList, ClearAll) => &self.task_list.clear_all,

            (Confirm, Accept) => &self.confirm.accept,
            (Confirm, Reject) => &self.confirm.reject,

            // Invalid combinations
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::useless_vec)]

    use super::*;

    #[test]
    fn test_default_keybindings() {
        let config = KeyBindingsConfig::default();

        assert_eq!(config.task_list.quit, vec!["q", "Esc"]);
        assert_eq!(config.task_list.down, vec!["j", "Down"]);
        assert_eq!(config.task_list.increment, vec!["+", "=", "l", "Right"]);
        assert_eq!(config.task_list.decrement, vec!["-", "h", "Left"]);
        assert_eq!(config.task_list.move_up, vec!["K"]);
        assert_eq!(config.task_list.clear_all, vec!["D"]);
        assert_eq!(config.confirm.accept, vec!["y", "Y", "Enter"]);
        assert_eq!(config.confirm.reject, vec!["n", "N", "q", "Esc"]);
    }

    #[test]
    fn test_default_config_path() {
        if let Some(path) = default_config_path() {
            assert!(path.to_string_lossy().contains("taskmeter"));
            assert!(path.to_string_lossy().ends_with("config.toml"));
        }
    }

    #[test]
    fn test_parse_simple_and_special_keys() {
        let key = parse_key("j").unwrap();
        assert_eq!(key.code, KeyCode::Char('j'));
        assert_eq!(key.modifiers, KeyModifiers::NONE);

        assert_eq!(parse_key("Enter").unwrap().code, KeyCode::Enter);
        assert_eq!(parse_key("Esc").unwrap().code, KeyCode::Esc);
        assert_eq!(parse_key("Delete").unwrap().code, KeyCode::Delete);
    }

    #[test]
    fn test_parse_plus_key() {
        let plus = parse_key("+").unwrap();
        assert_eq!(plus.code, KeyCode::Char('+'));
        assert_eq!(plus.modifiers, KeyModifiers::NONE);

        let alt_plus = parse_key("Alt++").unwrap();
        assert_eq!(alt_plus.code, KeyCode::Char('+'));
        assert_eq!(alt_plus.modifiers, KeyModifiers::ALT);
    }

    #[test]
    fn test_parse_modified_key() {
        let key = parse_key("Ctrl+d").unwrap();
        assert_eq!(key.code, KeyCode::Char('d'));
        assert_eq!(key.modifiers, KeyModifiers::CONTROL);

        let key = parse_key("Ctrl+Alt+k").unwrap();
        assert_eq!(key.modifiers, KeyModifiers::CONTROL | KeyModifiers::ALT);
    }

    #[test]
    fn test_parse_invalid_key() {
        assert!(parse_key("InvalidKey").is_err());
        assert!(parse_key("").is_err());
        assert!(parse_key("Hyper+x").is_err());
        assert!(parse_key("a+").is_err());
    }

    #[test]
    fn test_matches_ignores_shift_on_characters() {
        let config = KeyBindingsConfig::default();
        let shifted_k = KeyEvent::new(KeyCode::Char('K'), KeyModifiers::SHIFT);
        assert!(config.matches(ViewType::TaskList, Action::MoveUp, &shifted_k));
        assert!(!config.matches(ViewType::TaskList, Action::Up, &shifted_k));

        let shifted_plus = KeyEvent::new(KeyCode::Char('+'), KeyModifiers::SHIFT);
        assert!(config.matches(ViewType::TaskList, Action::Increment, &shifted_plus));
    }

    #[test]
    fn test_matches_respects_other_modifiers() {
        let config = KeyBindingsConfig::default();
        let ctrl_d = KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL);
        assert!(!config.matches(ViewType::TaskList, Action::Delete, &ctrl_d));

        let shift_up = KeyEvent::new(KeyCode::Up, KeyModifiers::SHIFT);
        assert!(!config.matches(ViewType::TaskList, Action::Up, &shift_up));
    }

    #[test]
    fn test_matches_wrong_view() {
        let config = KeyBindingsConfig::default();
        let n = KeyEvent::new(KeyCode::Char('n'), KeyModifiers::NONE);
        assert!(config.matches(ViewType::TaskList, Action::Create, &n));
        assert!(config.matches(ViewType::Confirm, Action::Reject, &n));
        assert!(!config.matches(ViewType::Confirm, Action::Create, &n));
    }

    #[test]
    fn test_default_help_text() {
        let config = KeyBindingsConfig::default();
        let help = config.generate_help_text(ViewType::TaskList);
        assert!(help.starts_with("j/k:move +/-:progress n:new"));
        assert!(help.contains("K/J:reorder"));
        assert!(help.ends_with("q:quit"));

        assert_eq!(config.generate_help_text(ViewType::Confirm), "y:yes n:no");
    }

    #[test]
    fn test_format_special_keys() {
        let config = KeyBindingsConfig::default();
        assert_eq!(config.format_key_display("Enter"), "↵");
        assert_eq!(config.format_key_display("Ctrl+d"), "Ctrl-d");
        assert_eq!(config.format_key_display("Alt++"), "Alt-+");
        assert_eq!(config.format_key_display("Left"), "←");
        assert_eq!(config.format_first_key(&vec![]), "?");
    }

    #[test]
    fn test_validate_default_config() {
        assert!(validate_keybindings_config(&KeyBindingsConfig::default()).is_ok());
    }

    #[test]
    fn test_detect_key_conflict_in_same_view() {
        let mut config = KeyBindingsConfig::default();
        config.task_list.increment = vec!["j".to_string()];

        let err_msg = validate_keybindings(&config).unwrap_err().to_string();
        assert!(err_msg.contains("multiple actions"));
        assert!(err_msg.contains("task_list"));
    }

    #[test]
    fn test_no_conflict_across_views() {
        let mut config = KeyBindingsConfig::default();
        config.task_list.quit = vec!["y".to_string()];
        assert!(validate_keybindings(&config).is_ok());
    }

    #[test]
    fn test_empty_binding_validation() {
        let mut config = KeyBindingsConfig::default();
        config.confirm.accept = vec![];

        let err_msg = validate_non_empty_bindings(&config).unwrap_err().to_string();
        assert!(err_msg.contains("confirm.accept"));
    }

    #[test]
    fn test_invalid_key_expression() {
        let mut config = KeyBindingsConfig::default();
        config.task_list.export = vec!["InvalidKey123".to_string()];

        let err_msg = format!("{:#}", validate_key_expressions(&config).unwrap_err());
        assert!(err_msg.contains("task_list.export"));
    }

    #[test]
    fn test_deserialize_partial_config_fails() {
        let toml = r#"
            [task_list]
            quit = ["q"]
        "#;

        let result: Result<KeyBindingsConfig, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_nonexistent_config() {
        let result = load_config(Some(Path::new("/nonexistent/path/config.toml"))).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_storage_only_file_keeps_default_keybindings() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[storage]\nkey = \"other\"\n\n[autosave]\ninterval_secs = 10\n")
            .unwrap();
        temp_file.flush().unwrap();

        let config = load_config(Some(temp_file.path())).unwrap().unwrap();
        assert_eq!(config.tui.keybindings.task_list.quit, vec!["q", "Esc"]);
    }

    #[test]
    fn test_load_invalid_toml_syntax() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"[tui.keybindings\nquit = [\"q\"]\n").unwrap();
        temp_file.flush().unwrap();

        assert!(load_config(Some(temp_file.path())).is_err());
    }

    #[test]
    fn test_generate_default_toml_is_valid() {
        let toml = generate_default_config_toml().unwrap();

        assert!(toml.contains("taskmeter Configuration"), "Missing header");
        assert!(toml.contains("[storage]"), "Missing storage section");
        assert!(toml.contains("[autosave]"), "Missing autosave section");
        assert!(
            toml.contains("[tui.keybindings.task_list]"),
            "Missing task_list section"
        );
        assert!(
            toml.contains("[tui.keybindings.confirm]"),
            "Missing confirm section"
        );

        let parsed: Config = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.tui.keybindings.task_list.quit, vec!["q", "Esc"]);
        validate_tui_config(&parsed.tui).unwrap();

        let app: AppConfig = toml::from_str(&toml).unwrap();
        assert_eq!(app.storage.key, "task-progress-data");
        assert_eq!(app.autosave.interval_secs, 30);
    }
}
