//! Input validation for task payloads
//!
//! The repository stores whatever it is given; callers run these checks
//! before creating or editing a task.

use chrono::NaiveDate;
use thiserror::Error;

use super::model::{NewTask, TaskPatch};

pub const TITLE_MIN_CHARS: usize = 2;
pub const TITLE_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MAX_CHARS: usize = 500;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Task title is required")]
    TitleRequired,

    #[error("Task title must be at least 2 characters")]
    TitleTooShort,

    #[error("Task title must be at most 100 characters")]
    TitleTooLong,

    #[error("Description must be at most 500 characters")]
    DescriptionTooLong,

    #[error("Due date {0} is in the past")]
    DueDateInPast(NaiveDate),
}

pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    let len = title.trim().chars().count();
    if len == 0 {
        Err(ValidationError::TitleRequired)
    } else if len < TITLE_MIN_CHARS {
        Err(ValidationError::TitleTooShort)
    } else if len > TITLE_MAX_CHARS {
        Err(ValidationError::TitleTooLong)
    } else {
        Ok(())
    }
}

pub fn validate_description(description: &str) -> Result<(), ValidationError> {
    if description.trim().chars().count() > DESCRIPTION_MAX_CHARS {
        return Err(ValidationError::DescriptionTooLong);
    }
    Ok(())
}

pub fn validate_due_date(due_date: NaiveDate, today: NaiveDate) -> Result<(), ValidationError> {
    if due_date < today {
        return Err(ValidationError::DueDateInPast(due_date));
    }
    Ok(())
}

/// Check a create payload against `today`
pub fn validate_new_task(task: &NewTask, today: NaiveDate) -> Result<(), ValidationError> {
    validate_title(&task.title)?;
    if let Some(description) = &task.description {
        validate_description(description)?;
    }
    if let Some(due_date) = task.due_date {
        validate_due_date(due_date, today)?;
    }
    Ok(())
}

/// Check only the fields an update actually sets
pub fn validate_patch(patch: &TaskPatch, today: NaiveDate) -> Result<(), ValidationError> {
    if let Some(title) = &patch.title {
        validate_title(title)?;
    }
    if let Some(description) = &patch.description {
        validate_description(description)?;
    }
    if let Some(Some(due_date)) = patch.due_date {
        validate_due_date(due_date, today)?;
    }
    Ok(())
}
