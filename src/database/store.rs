use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::database::models::{Task, TaskDraft, TaskPatch};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Task persistence. Every operation takes the owner it is scoped to; there
/// is no way to address a task by id alone.
///
/// `update_one` and `delete_one` must match and mutate in a single atomic
/// step. They return `Ok(None)` when no task has that id *and* owner.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Owned tasks, newest first (`created_at` desc, then `seq` desc).
    async fn find_by_owner(&self, owner_id: Uuid) -> Result<Vec<Task>, StoreError>;

    async fn find_one(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Task>, StoreError>;

    async fn insert(&self, owner_id: Uuid, draft: TaskDraft) -> Result<Task, StoreError>;

    async fn update_one(
        &self,
        owner_id: Uuid,
        id: Uuid,
        patch: &TaskPatch,
    ) -> Result<Option<Task>, StoreError>;

    async fn delete_one(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Task>, StoreError>;

    /// Liveness probe for the health endpoint.
    async fn ping(&self) -> Result<(), StoreError>;
}
