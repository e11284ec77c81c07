use std::sync::Arc;

use uuid::Uuid;

use crate::auth::Identity;
use crate::database::models::{Task, TaskDraft, TaskPatch};
use crate::database::store::{StoreError, TaskStore};
use crate::error::ApiError;

const NOT_FOUND_ACCESS: &str = "Task not found or you do not have permission to access it";
const NOT_FOUND_UPDATE: &str = "Task not found or you do not have permission to update it";
const NOT_FOUND_DELETE: &str = "Task not found or you do not have permission to delete it";

/// The only way into task storage. Every call is scoped to the verified
/// caller; a task owned by someone else is reported exactly like a missing one.
#[derive(Clone)]
pub struct TaskAccessor {
    store: Arc<dyn TaskStore>,
}

impl TaskAccessor {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self, identity: &Identity) -> Result<Vec<Task>, ApiError> {
        self.store
            .find_by_owner(identity.user_id())
            .await
            .map_err(|e| ApiError::from_store(e, "Server error while fetching tasks"))
    }

    pub async fn get_one(&self, identity: &Identity, task_id: &str) -> Result<Task, ApiError> {
        let id = parse_task_id(task_id)?;
        self.store
            .find_one(identity.user_id(), id)
            .await
            .map_err(|e| ApiError::from_store(e, "Server error while fetching task"))?
            .ok_or_else(|| ApiError::not_found(NOT_FOUND_ACCESS))
    }

    pub async fn create(&self, identity: &Identity, draft: TaskDraft) -> Result<Task, ApiError> {
        let task = self
            .store
            .insert(identity.user_id(), draft)
            .await
            .map_err(|e| ApiError::from_store(e, "Server error while creating task"))?;

        tracing::debug!("Created task {} for user {}", task.id, task.owner_id);
        Ok(task)
    }

    pub async fn update(
        &self,
        identity: &Identity,
        task_id: &str,
        patch: TaskPatch,
    ) -> Result<Task, ApiError> {
        let id = parse_task_id(task_id)?;
        self.store
            .update_one(identity.user_id(), id, &patch)
            .await
            .map_err(|e| ApiError::from_store(e, "Server error while updating task"))?
            .ok_or_else(|| ApiError::not_found(NOT_FOUND_UPDATE))
    }

    pub async fn delete(&self, identity: &Identity, task_id: &str) -> Result<Task, ApiError> {
        let id = parse_task_id(task_id)?;
        let task = self
            .store
            .delete_one(identity.user_id(), id)
            .await
            .map_err(|e| ApiError::from_store(e, "Server error while deleting task"))?
            .ok_or_else(|| ApiError::not_found(NOT_FOUND_DELETE))?;

        tracing::debug!("Deleted task {} for user {}", task.id, task.owner_id);
        Ok(task)
    }

    /// Storage liveness, for the health endpoint. Reads no task data.
    pub async fn ping(&self) -> Result<(), StoreError> {
        self.store.ping().await
    }
}

fn parse_task_id(task_id: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(task_id).map_err(|_| ApiError::invalid_identifier())
}
