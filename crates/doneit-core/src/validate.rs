//! Input checks applied before any store call.

use thiserror::Error;

use crate::TaskRecord;
use crate::priority::Priority;

/// Maximum title length in characters.
pub const MAX_TITLE_LEN: usize = 50;

/// A task record was rejected before reaching the store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The title is blank after trimming.
    #[error("task name is required")]
    EmptyTitle,
    /// The title is longer than [`MAX_TITLE_LEN`].
    #[error("task name must be at most {max} characters")]
    TitleTooLong {
        /// Character limit that was exceeded.
        max: usize,
    },
    /// The title contains a character outside the allowed set.
    #[error("invalid character {ch:?} in task name")]
    InvalidTitleChar {
        /// First offending character.
        ch: char,
    },
    /// The priority is not one of the known labels.
    #[error("invalid priority '{0}' (expected Low, Medium or High)")]
    InvalidPriority(String),
    /// The due date text is not a `dd-MM-yyyy` date.
    #[error("invalid due date '{0}' (expected dd-MM-yyyy)")]
    InvalidDueDate(String),
}

/// Check a title: 1-50 characters of letters, digits, space, `.`, `,` or `-`.
///
/// Surrounding whitespace is ignored.
///
/// # Errors
/// Returns the first rule the title breaks.
pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    if trimmed.chars().count() > MAX_TITLE_LEN {
        return Err(ValidationError::TitleTooLong { max: MAX_TITLE_LEN });
    }
    if let Some(ch) = trimmed.chars().find(|ch| !is_title_char(*ch)) {
        return Err(ValidationError::InvalidTitleChar { ch });
    }
    Ok(())
}

const fn is_title_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, ' ' | '.' | ',' | '-')
}

/// Only the three known priorities may be written.
///
/// # Errors
/// Returns [`ValidationError::InvalidPriority`] for anything else.
pub fn validate_priority(priority: &Priority) -> Result<(), ValidationError> {
    if priority.is_known() {
        Ok(())
    } else {
        Err(ValidationError::InvalidPriority(priority.as_str().to_owned()))
    }
}

/// Validate the user-editable fields of a record.
///
/// # Errors
/// Returns the first failing field check.
pub fn validate_record(task: &TaskRecord) -> Result<(), ValidationError> {
    validate_title(&task.title)?;
    validate_priority(&task.priority)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_allowed_characters() {
        assert_eq!(validate_title("Buy milk, eggs - 2x."), Ok(()));
        assert_eq!(validate_title("  padded  "), Ok(()));
    }

    #[test]
    fn rejects_blank_and_long_titles() {
        assert_eq!(validate_title("   "), Err(ValidationError::EmptyTitle));
        let long = "a".repeat(MAX_TITLE_LEN + 1);
        assert_eq!(
            validate_title(&long),
            Err(ValidationError::TitleTooLong { max: MAX_TITLE_LEN })
        );
        assert_eq!(validate_title(&"a".repeat(MAX_TITLE_LEN)), Ok(()));
    }

    #[test]
    fn rejects_disallowed_characters() {
        assert_eq!(
            validate_title("ship it!"),
            Err(ValidationError::InvalidTitleChar { ch: '!' })
        );
        assert!(validate_title("café").is_err());
    }

    #[test]
    fn rejects_unknown_priority() {
        let task = TaskRecord::new("Write report", Priority::parse("Urgent"));
        assert_eq!(
            validate_record(&task),
            Err(ValidationError::InvalidPriority("Urgent".into()))
        );
    }
}
