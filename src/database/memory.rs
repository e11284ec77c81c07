use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::models::{Task, TaskDraft, TaskPatch};
use crate::database::store::{StoreError, TaskStore};

#[derive(Default)]
struct Inner {
    tasks: HashMap<Uuid, Task>,
    next_seq: i64,
}

/// In-process task store. Each conditional operation runs under a single
/// write-lock acquisition, so match-and-mutate cannot interleave.
#[derive(Clone, Default)]
pub struct MemoryTaskStore {
    inner: Arc<RwLock<Inner>>,
    offline: Arc<AtomicBool>,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call fail with `StoreError::Unavailable` until switched back.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store is offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn find_by_owner(&self, owner_id: Uuid) -> Result<Vec<Task>, StoreError> {
        self.check_online()?;
        let inner = self.inner.read().await;

        let mut tasks: Vec<Task> = inner
            .tasks
            .values()
            .filter(|t| t.owner_id == owner_id)
            .cloned()
            .collect();
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.seq.cmp(&a.seq)));
        Ok(tasks)
    }

    async fn find_one(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Task>, StoreError> {
        self.check_online()?;
        let inner = self.inner.read().await;

        Ok(inner
            .tasks
            .get(&id)
            .filter(|t| t.owner_id == owner_id)
            .cloned())
    }

    async fn insert(&self, owner_id: Uuid, draft: TaskDraft) -> Result<Task, StoreError> {
        self.check_online()?;
        let mut inner = self.inner.write().await;

        inner.next_seq += 1;
        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4(),
            owner_id,
            title: draft.title,
            description: draft.description,
            completed: draft.completed,
            created_at: now,
            updated_at: now,
            seq: inner.next_seq,
        };
        inner.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn update_one(
        &self,
        owner_id: Uuid,
        id: Uuid,
        patch: &TaskPatch,
    ) -> Result<Option<Task>, StoreError> {
        self.check_online()?;
        let mut inner = self.inner.write().await;

        let Some(task) = inner.tasks.get_mut(&id).filter(|t| t.owner_id == owner_id) else {
            return Ok(None);
        };
        patch.apply_to(task);
        task.updated_at = Utc::now();
        Ok(Some(task.clone()))
    }

    async fn delete_one(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Task>, StoreError> {
        self.check_online()?;
        let mut inner = self.inner.write().await;

        let owned = inner.tasks.get(&id).is_some_and(|t| t.owner_id == owner_id);
        if !owned {
            return Ok(None);
        }
        Ok(inner.tasks.remove(&id))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check_online()
    }
}
