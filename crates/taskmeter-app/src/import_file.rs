//! Reading import files chosen by the user.

use std::path::{Path, PathBuf};

use taskmeter_core::{EmptyPolicy, ImportError, Task, parse_tasks};
use tracing::{debug, info};

/// What the user answered when asked for an import file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportPick {
    /// A file was chosen.
    Chosen(PathBuf),
    /// The prompt was dismissed without a path.
    Cancelled,
}

impl ImportPick {
    /// Interpret free-form prompt output. `#` lines are ignored and the
    /// first remaining non-blank line is taken as the path.
    #[must_use]
    pub fn from_prompt(raw: &str) -> Self {
        raw.lines()
            .map(str::trim)
            .find(|line| !line.is_empty() && !line.starts_with('#'))
            .map_or(Self::Cancelled, |line| Self::Chosen(PathBuf::from(line)))
    }
}

/// Read and validate an import file in one shot.
///
/// # Errors
/// Returns [`ImportError::Read`] when the file cannot be read, or any
/// validation error from [`parse_tasks`]. Nothing is applied either way.
pub async fn read_import(path: &Path) -> Result<Vec<Task>, ImportError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ImportError::Read {
            path: path.display().to_string(),
            source,
        })?;
    let tasks = parse_tasks(&raw, EmptyPolicy::Reject)?;
    info!(path = %path.display(), count = tasks.len(), "Read import file");
    Ok(tasks)
}

/// Resolve a pick from synchronous code on a throwaway current-thread runtime.
///
/// Returns `Ok(None)` when the pick was cancelled.
///
/// # Errors
/// Same as [`read_import`].
pub fn load_pick(pick: ImportPick) -> Result<Option<Vec<Task>>, ImportError> {
    let ImportPick::Chosen(path) = pick else {
        debug!("Import cancelled");
        return Ok(None);
    };
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .map_err(|source| ImportError::Read {
            path: path.display().to_string(),
            source,
        })?;
    runtime.block_on(read_import(&path)).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn prompt_output_picks_first_path_line() {
        assert_eq!(
            ImportPick::from_prompt("# choose a file\n\n  /tmp/tasks.json \nignored"),
            ImportPick::Chosen(PathBuf::from("/tmp/tasks.json"))
        );
        assert_eq!(ImportPick::from_prompt("# nothing\n   \n"), ImportPick::Cancelled);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn reads_valid_file() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("tasks.json");
        fs::write(&path, r#"[{"id":1,"name":"A","target":5,"current":2}]"#)?;
        let tasks = read_import(&path).await?;
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].name(), "A");
        Ok(())
    }

    #[tokio::test(flavor = "current_thread")]
    async fn missing_file_is_a_read_error() {
        let result = read_import(Path::new("/definitely/not/here.json")).await;
        assert!(matches!(result, Err(ImportError::Read { .. })));
    }

    #[test]
    fn cancelled_pick_reads_nothing() {
        assert!(matches!(load_pick(ImportPick::Cancelled), Ok(None)));
    }

    #[test]
    fn blocking_load_rejects_empty_array() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("empty.json");
        fs::write(&path, "[]")?;
        assert!(matches!(
            load_pick(ImportPick::Chosen(path)),
            Err(ImportError::Empty)
        ));
        Ok(())
    }
}
