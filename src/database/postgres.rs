use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{Task, TaskDraft, TaskPatch};
use crate::database::store::{StoreError, TaskStore};

const COLUMNS: &str = "id, owner_id, title, description, completed, created_at, updated_at, seq";

/// PostgreSQL-backed task store. Update and delete are single statements
/// filtered on `(id, owner_id)`, so the row lock taken by the statement is the
/// only synchronization needed.
#[derive(Clone)]
pub struct PgTaskStore {
    pool: PgPool,
}

impl PgTaskStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskStore for PgTaskStore {
    async fn find_by_owner(&self, owner_id: Uuid) -> Result<Vec<Task>, StoreError> {
        let sql = format!(
            "SELECT {} FROM tasks WHERE owner_id = $1 ORDER BY created_at DESC, seq DESC",
            COLUMNS
        );
        let tasks = sqlx::query_as::<_, Task>(&sql)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(tasks)
    }

    async fn find_one(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Task>, StoreError> {
        let sql = format!("SELECT {} FROM tasks WHERE id = $1 AND owner_id = $2", COLUMNS);
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(task)
    }

    async fn insert(&self, owner_id: Uuid, draft: TaskDraft) -> Result<Task, StoreError> {
        let now = Utc::now();
        let sql = format!(
            "INSERT INTO tasks (id, owner_id, title, description, completed, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $6) RETURNING {}",
            COLUMNS
        );
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(Uuid::new_v4())
            .bind(owner_id)
            .bind(&draft.title)
            .bind(&draft.description)
            .bind(draft.completed)
            .bind(now)
            .fetch_one(&self.pool)
            .await?;
        Ok(task)
    }

    async fn update_one(
        &self,
        owner_id: Uuid,
        id: Uuid,
        patch: &TaskPatch,
    ) -> Result<Option<Task>, StoreError> {
        // COALESCE keeps columns the patch leaves out; the values are read from
        // the row version the UPDATE locked, not from an earlier SELECT.
        let sql = format!(
            "UPDATE tasks SET \
                title = COALESCE($3, title), \
                description = COALESCE($4, description), \
                completed = COALESCE($5, completed), \
                updated_at = $6 \
             WHERE id = $1 AND owner_id = $2 \
             RETURNING {}",
            COLUMNS
        );
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(id)
            .bind(owner_id)
            .bind(patch.title.as_deref())
            .bind(patch.description.as_deref())
            .bind(patch.completed)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?;
        Ok(task)
    }

    async fn delete_one(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Task>, StoreError> {
        let sql = format!(
            "DELETE FROM tasks WHERE id = $1 AND owner_id = $2 RETURNING {}",
            COLUMNS
        );
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(task)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
