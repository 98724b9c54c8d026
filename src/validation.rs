//! Input rules checked before any store mutation.
//!
//! Lengths count characters, not bytes. Inputs are expected to be trimmed by
//! the caller already.

use thiserror::Error;

/// Inclusive bounds for list names and todo text, in characters.
pub const MIN_NAME_LEN: usize = 1;
pub const MAX_NAME_LEN: usize = 100;

/// A rejected list name or todo text.
///
/// The `Display` text is meant to be shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("List name must be between 1 and 100 characters")]
    ListNameLength,

    #[error("List name must be unique.")]
    ListNameTaken,

    #[error("Todo item must be between 1 and 100 characters")]
    TodoTextLength,
}

fn within_bounds(value: &str) -> bool {
    (MIN_NAME_LEN..=MAX_NAME_LEN).contains(&value.chars().count())
}

/// Check a list name against the length bounds, then against the names
/// already in use. The length rule wins when both fail.
///
/// Matching is exact and case-sensitive.
pub fn validate_list_name<I, S>(name: &str, existing_names: I) -> Result<(), ValidationError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    if !within_bounds(name) {
        return Err(ValidationError::ListNameLength);
    }

    if existing_names
        .into_iter()
        .any(|existing| existing.as_ref() == name)
    {
        return Err(ValidationError::ListNameTaken);
    }

    Ok(())
}

pub fn validate_todo_text(text: &str) -> Result<(), ValidationError> {
    if within_bounds(text) {
        Ok(())
    } else {
        Err(ValidationError::TodoTextLength)
    }
}
