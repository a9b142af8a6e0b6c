use std::env;
use std::fs;
use std::io::{self, Stdout, Write};
use std::process::Command;

use anyhow::{Context, Result, anyhow, bail};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tempfile::Builder;

pub(super) type Term = Terminal<CrosstermBackend<Stdout>>;

/// Variables consulted for the editor, first match wins.
const EDITOR_VARS: [&str; 3] = ["TASKMETER_EDITOR", "VISUAL", "EDITOR"];
const FALLBACK_EDITOR: &str = "vi";

/// Switch stdout to the raw alternate screen the board is drawn on.
pub(super) fn open() -> Result<Term> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.hide_cursor()?;
    Ok(terminal)
}

/// Give the shell its screen back. Best effort, used on the way out.
pub(super) fn close(terminal: &mut Term) {
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();
}

fn suspend(terminal: &mut Term) -> Result<()> {
    terminal.show_cursor()?;
    terminal.flush()?;
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen).context("failed to leave alternate screen")?;
    Ok(())
}

fn resume(terminal: &mut Term) -> Result<()> {
    execute!(terminal.backend_mut(), EnterAlternateScreen).context("failed to re-enter alternate screen")?;
    enable_raw_mode().context("failed to enable raw mode")?;
    terminal.clear()?;
    terminal.hide_cursor()?;
    terminal.flush()?;
    Ok(())
}

/// Program and leading arguments of the user's editor.
#[derive(Debug, PartialEq, Eq)]
pub(super) struct EditorCommand {
    program: String,
    args: Vec<String>,
}

impl EditorCommand {
    /// Resolve the editor from `lookup`, which maps a variable name to its
    /// value. Blank values are skipped.
    pub(super) fn resolve(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let line = EDITOR_VARS
            .iter()
            .filter_map(|var| lookup(var))
            .find(|value| !value.trim().is_empty())
            .unwrap_or_else(|| FALLBACK_EDITOR.to_owned());
        let mut words =
            shell_words::split(&line).map_err(|err| anyhow!("cannot parse editor command '{line}': {err}"))?;
        if words.is_empty() {
            bail!("editor command '{line}' names no program");
        }
        let program = words.remove(0);
        Ok(Self { program, args: words })
    }

    fn from_env() -> Result<Self> {
        Self::resolve(|var| env::var(var).ok())
    }
}

/// Hand `template` to the user's editor with the board suspended and
/// return what they saved. The board comes back even when the editor
/// fails.
pub(super) fn edit_in_editor(terminal: &mut Term, template: &str) -> Result<String> {
    let editor = EditorCommand::from_env()?;
    let mut scratch = Builder::new()
        .prefix("taskmeter-")
        .suffix(".txt")
        .tempfile()
        .context("failed to create scratch file")?;
    scratch
        .write_all(template.as_bytes())
        .and_then(|()| scratch.flush())
        .context("failed to write scratch file")?;

    suspend(terminal)?;
    let status = Command::new(&editor.program)
        .args(&editor.args)
        .arg(scratch.path())
        .status();
    resume(terminal)?;

    let status = status.with_context(|| format!("failed to launch editor {}", editor.program))?;
    if !status.success() {
        bail!("editor exited abnormally ({status})");
    }
    fs::read_to_string(scratch.path()).context("failed to read scratch file")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn resolve_from(vars: &[(&str, &str)]) -> Result<EditorCommand> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect();
        EditorCommand::resolve(|var| vars.get(var).cloned())
    }

    fn command(program: &str, args: &[&str]) -> EditorCommand {
        EditorCommand {
            program: program.to_owned(),
            args: args.iter().map(|arg| (*arg).to_owned()).collect(),
        }
    }

    #[test]
    fn own_variable_wins_over_visual_and_editor() -> Result<()> {
        let editor = resolve_from(&[("TASKMETER_EDITOR", "hx"), ("VISUAL", "code -w"), ("EDITOR", "nano")])?;
        assert_eq!(editor, command("hx", &[]));
        Ok(())
    }

    #[test]
    fn blank_values_fall_through() -> Result<()> {
        let editor = resolve_from(&[("TASKMETER_EDITOR", "  "), ("VISUAL", ""), ("EDITOR", "nano")])?;
        assert_eq!(editor, command("nano", &[]));
        Ok(())
    }

    #[test]
    fn vi_when_nothing_is_set() -> Result<()> {
        assert_eq!(resolve_from(&[])?, command("vi", &[]));
        Ok(())
    }

    #[test]
    fn quoted_arguments_stay_whole() -> Result<()> {
        let editor = resolve_from(&[("VISUAL", r#"'/opt/My Editor/bin/ed' --wait "-c set nu""#)])?;
        assert_eq!(editor, command("/opt/My Editor/bin/ed", &["--wait", "-c set nu"]));
        Ok(())
    }

    #[test]
    fn unbalanced_quote_is_an_error() {
        let err = resolve_from(&[("EDITOR", "vim 'oops")]).err();
        assert!(err.is_some_and(|err| err.to_string().contains("cannot parse editor command")));
    }
}
