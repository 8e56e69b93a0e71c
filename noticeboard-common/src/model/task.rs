use crate::model::{Id, strip_nul};
use thiserror::Error;
use time::UtcDateTime;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct TaskMarker;

#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct Task {
    pub id: Id<TaskMarker>,
    pub text: TaskText,
    pub created_at: UtcDateTime,
}

/// Trimmed, non-empty task description.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash)]
pub struct TaskText(String);

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Error)]
#[error("The task text is empty")]
pub struct InvalidTaskTextError;

impl TaskText {
    pub fn new(text: &str) -> Result<Self, InvalidTaskTextError> {
        let text = strip_nul(text);
        let trimmed = text.trim();
        if trimmed.is_empty() {
            Err(InvalidTaskTextError)
        } else {
            Ok(Self(trimmed.to_owned()))
        }
    }

    #[must_use]
    pub fn get(&self) -> &str {
        &self.0
    }
}
