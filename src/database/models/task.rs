use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::validation::ValidatedFields;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Insertion order, breaks `created_at` ties when listing.
    #[serde(skip)]
    pub seq: i64,
}

/// Normalized fields for a new task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub completed: bool,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            completed: false,
        }
    }

    pub fn from_fields(fields: &ValidatedFields) -> Self {
        Self {
            title: fields.str("title").unwrap_or_default().to_string(),
            description: fields.str("description").unwrap_or_default().to_string(),
            completed: fields.bool("completed").unwrap_or(false),
        }
    }
}

/// Partial update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
}

impl TaskPatch {
    pub fn from_fields(fields: &ValidatedFields) -> Self {
        Self {
            title: fields.str("title").map(str::to_string),
            description: fields.str("description").map(str::to_string),
            completed: fields.bool("completed"),
        }
    }

    /// Apply the provided fields to `task` in place.
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(description) = &self.description {
            task.description = description.clone();
        }
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
    }
}
