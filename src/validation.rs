//! Creation-time rules for new todos.
//!
//! Every rule is checked; failures are collected per field rather than
//! stopping at the first one.

use chrono::{DateTime, Utc};

use crate::problem::FieldErrors;
use crate::todo::Todo;

pub const DUE_DATE_FIELD: &str = "DueDate";
pub const IS_COMPLETED_FIELD: &str = "IsCompleted";

pub const DUE_DATE_IN_PAST: &str = "cannot have due date in the past";
pub const ALREADY_COMPLETED: &str = "cannot add completed todo";

/// Checks `todo` against the creation rules as of `now`.
///
/// A due date equal to `now` is accepted; only strictly earlier dates fail.
///
/// # Errors
///
/// Returns every failed field with its messages.
pub fn validate_new_todo(todo: &Todo, now: DateTime<Utc>) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    if todo.due_date < now {
        errors.entry(DUE_DATE_FIELD.to_owned()).or_default().push(DUE_DATE_IN_PAST.to_owned());
    }
    if todo.is_completed {
        errors.entry(IS_COMPLETED_FIELD.to_owned()).or_default().push(ALREADY_COMPLETED.to_owned());
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
