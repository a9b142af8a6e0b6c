//! Input rules shared by task creation, editing and import.

use thiserror::Error;

/// Rejected user input for create/edit. Nothing is mutated when this is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The name is empty after trimming.
    #[error("task name must not be empty")]
    EmptyName,
    /// The name contains a line break, tab or other control character.
    #[error("task name must not contain control characters (found {0:?})")]
    ControlCharacter(char),
    /// The target is below one.
    #[error("target must be a positive whole number (got {0})")]
    TargetTooSmall(i64),
    /// The current progress is negative.
    #[error("current progress must not be negative (got {0})")]
    NegativeCurrent(i64),
    /// The current progress is above the target.
    #[error("current progress {current} exceeds target {target}")]
    CurrentExceedsTarget {
        /// Offending progress value.
        current: i64,
        /// Target it was checked against.
        target: i64,
    },
    /// A numeric field could not be read as a whole number.
    #[error("{field} must be a whole number (got '{raw}')")]
    NotAnInteger {
        /// Field label shown to the user.
        field: &'static str,
        /// Raw text as typed.
        raw: String,
    },
    /// Every id above the highest one in use is taken.
    #[error("no task id is left above {0}")]
    IdsExhausted(i64),
}

/// Trim `raw` and ensure something printable on one line is left.
///
/// # Errors
/// Returns [`ValidationError::EmptyName`] for blank input and
/// [`ValidationError::ControlCharacter`] when a control character survives
/// trimming.
pub fn normalize_name(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if let Some(ch) = trimmed.chars().find(|ch| ch.is_control()) {
        return Err(ValidationError::ControlCharacter(ch));
    }
    Ok(trimmed.to_owned())
}

/// Ensure `target >= 1`.
///
/// # Errors
/// Returns [`ValidationError::TargetTooSmall`] otherwise.
pub fn check_target(target: i64) -> Result<i64, ValidationError> {
    if target < 1 {
        return Err(ValidationError::TargetTooSmall(target));
    }
    Ok(target)
}

/// Ensure `0 <= current <= target` and `target >= 1`.
///
/// # Errors
/// Returns the first violated rule.
pub fn check_progress(current: i64, target: i64) -> Result<(), ValidationError> {
    check_target(target)?;
    if current < 0 {
        return Err(ValidationError::NegativeCurrent(current));
    }
    if current > target {
        return Err(ValidationError::CurrentExceedsTarget { current, target });
    }
    Ok(())
}

/// Parse a whole number typed into a form field.
///
/// # Errors
/// Returns [`ValidationError::NotAnInteger`] when `raw` is blank, fractional
/// or not numeric at all.
pub fn parse_count(field: &'static str, raw: &str) -> Result<i64, ValidationError> {
    raw.trim().parse().map_err(|_| ValidationError::NotAnInteger {
        field,
        raw: raw.to_owned(),
    })
}
