//! `SQLite` implementation of [`TaskRepository`].

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use verdant_app::ports::TaskRepository;
use verdant_domain::error::VerdantError;
use verdant_domain::id::{OwnerId, PlantId, TaskId};
use verdant_domain::task::{MaintenanceTask, MaintenanceType};
use verdant_domain::time::Timestamp;

use crate::error::StorageError;
use crate::timestamp;

struct Wrapper(MaintenanceTask);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: uuid::Uuid = row.try_get("id")?;
        let plant_id: uuid::Uuid = row.try_get("plant_id")?;
        let owner_id: uuid::Uuid = row.try_get("owner_id")?;
        let task_type: String = row.try_get("task_type")?;
        let scheduled_date: String = row.try_get("scheduled_date")?;
        let created_at: String = row.try_get("created_at")?;

        let task_type: MaintenanceType = task_type
            .parse()
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?;

        Ok(Self(MaintenanceTask {
            id: TaskId::from_uuid(id),
            plant_id: PlantId::from_uuid(plant_id),
            owner_id: OwnerId::from_uuid(owner_id),
            task_type,
            scheduled_date: timestamp::decode(&scheduled_date)?,
            due_date: timestamp::decode_opt(row.try_get("due_date")?)?,
            completed: row.try_get("completed")?,
            completed_at: timestamp::decode_opt(row.try_get("completed_at")?)?,
            auto_generated: row.try_get("auto_generated")?,
            notes: row.try_get("notes")?,
            created_at: timestamp::decode(&created_at)?,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO maintenance_tasks (
        id, plant_id, owner_id, task_type, scheduled_date, due_date,
        completed, completed_at, auto_generated, notes, created_at
    )
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
";

const SELECT_INCOMPLETE: &str = r"
    SELECT * FROM maintenance_tasks
    WHERE completed = 0
      AND (? IS NULL OR plant_id = ?)
      AND (? IS NULL OR owner_id = ?)
    ORDER BY scheduled_date, rowid
";

const EXISTS_ACTIVE: &str = r"
    SELECT EXISTS (
        SELECT 1 FROM maintenance_tasks
        WHERE plant_id = ? AND task_type = ? AND auto_generated = 1 AND completed = 0
    )
";

const EXISTS_SCHEDULED_BETWEEN: &str = r"
    SELECT EXISTS (
        SELECT 1 FROM maintenance_tasks
        WHERE plant_id = ? AND task_type = ?
          AND scheduled_date >= ? AND scheduled_date < ?
    )
";

const COUNT_OVERDUE: &str = r"
    SELECT COUNT(*) FROM maintenance_tasks
    WHERE owner_id = ? AND completed = 0
      AND due_date IS NOT NULL AND due_date < ?
";

/// `SQLite`-backed maintenance task repository.
#[derive(Clone)]
pub struct SqliteTaskRepository {
    pool: SqlitePool,
}

impl SqliteTaskRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Mark a task as done at `at`. Returns `false` when no such task exists.
    ///
    /// # Errors
    ///
    /// Returns a storage error.
    pub async fn complete(&self, id: TaskId, at: Timestamp) -> Result<bool, VerdantError> {
        let result = sqlx::query(
            "UPDATE maintenance_tasks SET completed = 1, completed_at = ? WHERE id = ?",
        )
        .bind(timestamp::encode(at))
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(StorageError::from)?;
        Ok(result.rows_affected() > 0)
    }
}

impl TaskRepository for SqliteTaskRepository {
    async fn list_incomplete_tasks(
        &self,
        plant_id: Option<PlantId>,
        owner_id: Option<OwnerId>,
    ) -> Result<Vec<MaintenanceTask>, VerdantError> {
        let plant_id = plant_id.map(PlantId::as_uuid);
        let owner_id = owner_id.map(OwnerId::as_uuid);
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_INCOMPLETE)
            .bind(plant_id)
            .bind(plant_id)
            .bind(owner_id)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn exists_active_task(
        &self,
        plant_id: PlantId,
        task_type: MaintenanceType,
    ) -> Result<bool, VerdantError> {
        let (exists,): (i64,) = sqlx::query_as(EXISTS_ACTIVE)
            .bind(plant_id.as_uuid())
            .bind(task_type.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(exists != 0)
    }

    async fn exists_task_scheduled_between(
        &self,
        plant_id: PlantId,
        task_type: MaintenanceType,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<bool, VerdantError> {
        let (exists,): (i64,) = sqlx::query_as(EXISTS_SCHEDULED_BETWEEN)
            .bind(plant_id.as_uuid())
            .bind(task_type.as_str())
            .bind(timestamp::encode(start))
            .bind(timestamp::encode(end))
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(exists != 0)
    }

    async fn insert_task(&self, task: MaintenanceTask) -> Result<MaintenanceTask, VerdantError> {
        sqlx::query(INSERT)
            .bind(task.id.as_uuid())
            .bind(task.plant_id.as_uuid())
            .bind(task.owner_id.as_uuid())
            .bind(task.task_type.as_str())
            .bind(timestamp::encode(task.scheduled_date))
            .bind(task.due_date.map(timestamp::encode))
            .bind(task.completed)
            .bind(task.completed_at.map(timestamp::encode))
            .bind(task.auto_generated)
            .bind(&task.notes)
            .bind(timestamp::encode(task.created_at))
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(task)
    }

    async fn count_overdue_tasks(&self, owner_id: OwnerId, now: Timestamp) -> Result<u64, VerdantError> {
        let (count,): (i64,) = sqlx::query_as(COUNT_OVERDUE)
            .bind(owner_id.as_uuid())
            .bind(timestamp::encode(now))
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::from)?;
        // COUNT(*) is never negative
        Ok(u64::try_from(count).unwrap_or_default())
    }

    async fn list_tasks_by_type(
        &self,
        task_type: MaintenanceType,
    ) -> Result<Vec<MaintenanceTask>, VerdantError> {
        let rows: Vec<Wrapper> =
            sqlx::query_as("SELECT * FROM maintenance_tasks WHERE task_type = ? ORDER BY scheduled_date, rowid")
                .bind(task_type.as_str())
                .fetch_all(&self.pool)
                .await
                .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn list_all_tasks(&self) -> Result<Vec<MaintenanceTask>, VerdantError> {
        let rows: Vec<Wrapper> = sqlx::query_as("SELECT * FROM maintenance_tasks ORDER BY scheduled_date, rowid")
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn delete_task(&self, id: TaskId) -> Result<(), VerdantError> {
        sqlx::query("DELETE FROM maintenance_tasks WHERE id = ?")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(())
    }
}
