//! `SQLite` implementation of [`GrowthRepository`].

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use verdant_app::ports::GrowthRepository;
use verdant_domain::error::{ConflictError, NotFoundError, VerdantError};
use verdant_domain::growth::{GrowthRecord, GrowthStage};
use verdant_domain::id::{GrowthRecordId, OwnerId, PlantId};

use crate::error::StorageError;
use crate::timestamp;

struct Wrapper(GrowthRecord);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: uuid::Uuid = row.try_get("id")?;
        let plant_id: uuid::Uuid = row.try_get("plant_id")?;
        let owner_id: uuid::Uuid = row.try_get("owner_id")?;
        let stage: String = row.try_get("stage")?;
        let recorded_at: String = row.try_get("recorded_at")?;
        let version: i64 = row.try_get("version")?;

        let stage: GrowthStage = stage
            .parse()
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let version = u64::try_from(version).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;

        Ok(Self(GrowthRecord {
            id: GrowthRecordId::from_uuid(id),
            plant_id: PlantId::from_uuid(plant_id),
            owner_id: OwnerId::from_uuid(owner_id),
            height: row.try_get("height")?,
            stage,
            recorded_at: timestamp::decode(&recorded_at)?,
            growth_since_last: row.try_get("growth_since_last")?,
            notes: row.try_get("notes")?,
            color_changes: row.try_get("color_changes")?,
            version,
        }))
    }
}

fn version_param(version: u64) -> Result<i64, StorageError> {
    i64::try_from(version).map_err(|_| StorageError::OutOfRange {
        field: "version",
        value: version,
    })
}

const INSERT: &str = r"
    INSERT INTO growth_records (
        id, plant_id, owner_id, height, stage, recorded_at,
        growth_since_last, notes, color_changes, version
    )
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
";

const SELECT_CURRENT: &str = r"
    SELECT * FROM growth_records
    WHERE plant_id = ?
    ORDER BY recorded_at DESC, rowid DESC
    LIMIT 1
";

const UPDATE_IF_VERSION: &str = r"
    UPDATE growth_records
    SET height = ?, stage = ?, recorded_at = ?, growth_since_last = ?,
        notes = ?, color_changes = ?, version = version + 1
    WHERE id = ? AND version = ?
";

/// `SQLite`-backed growth record repository with optimistic concurrency.
#[derive(Clone)]
pub struct SqliteGrowthRepository {
    pool: SqlitePool,
}

impl SqliteGrowthRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// All records of one plant, oldest first.
    ///
    /// # Errors
    ///
    /// Returns a storage error.
    pub async fn history(&self, plant_id: PlantId) -> Result<Vec<GrowthRecord>, VerdantError> {
        let rows: Vec<Wrapper> =
            sqlx::query_as("SELECT * FROM growth_records WHERE plant_id = ? ORDER BY recorded_at, rowid")
                .bind(plant_id.as_uuid())
                .fetch_all(&self.pool)
                .await
                .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(|w| w.0).collect())
    }
}

impl GrowthRepository for SqliteGrowthRepository {
    async fn find_current_growth(&self, plant_id: PlantId) -> Result<Option<GrowthRecord>, VerdantError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_CURRENT)
            .bind(plant_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(row.map(|w| w.0))
    }

    async fn insert_growth(&self, record: GrowthRecord) -> Result<GrowthRecord, VerdantError> {
        sqlx::query(INSERT)
            .bind(record.id.as_uuid())
            .bind(record.plant_id.as_uuid())
            .bind(record.owner_id.as_uuid())
            .bind(record.height)
            .bind(record.stage.as_str())
            .bind(timestamp::encode(record.recorded_at))
            .bind(record.growth_since_last)
            .bind(&record.notes)
            .bind(record.color_changes)
            .bind(version_param(record.version)?)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(record)
    }

    async fn update_growth(&self, mut record: GrowthRecord) -> Result<GrowthRecord, VerdantError> {
        let result = sqlx::query(UPDATE_IF_VERSION)
            .bind(record.height)
            .bind(record.stage.as_str())
            .bind(timestamp::encode(record.recorded_at))
            .bind(record.growth_since_last)
            .bind(&record.notes)
            .bind(record.color_changes)
            .bind(record.id.as_uuid())
            .bind(version_param(record.version)?)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        if result.rows_affected() == 0 {
            let (exists,): (i64,) =
                sqlx::query_as("SELECT EXISTS (SELECT 1 FROM growth_records WHERE id = ?)")
                    .bind(record.id.as_uuid())
                    .fetch_one(&self.pool)
                    .await
                    .map_err(StorageError::from)?;
            return Err(if exists == 0 {
                NotFoundError {
                    entity: "GrowthRecord",
                    id: record.id.to_string(),
                }
                .into()
            } else {
                ConflictError {
                    entity: "GrowthRecord",
                    id: record.id.to_string(),
                    expected: record.version,
                }
                .into()
            });
        }

        record.version += 1;
        Ok(record)
    }

    async fn list_all_growth(&self) -> Result<Vec<GrowthRecord>, VerdantError> {
        let rows: Vec<Wrapper> = sqlx::query_as("SELECT * FROM growth_records ORDER BY recorded_at, rowid")
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn delete_growth(&self, id: GrowthRecordId) -> Result<(), VerdantError> {
        sqlx::query("DELETE FROM growth_records WHERE id = ?")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(())
    }
}
