//! `SQLite` implementation of [`PlantRepository`].
//!
//! Plants are owned by other parts of the system; besides the read-only port
//! this repository offers [`SqlitePlantRepository::save`] and
//! [`SqlitePlantRepository::delete`] for them.

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use verdant_app::ports::{PlantFilter, PlantRepository};
use verdant_domain::error::VerdantError;
use verdant_domain::id::{OwnerId, PlantId};
use verdant_domain::plant::{CareSchedule, Plant};

use crate::error::StorageError;
use crate::timestamp;

/// Wrapper for converting database rows into domain types without polluting
/// domain structs with database concerns.
struct Wrapper(Plant);

fn care_from_row(row: &SqliteRow, prefix: &str) -> Result<CareSchedule, sqlx::Error> {
    let frequency: Option<i64> = row.try_get(format!("{prefix}_frequency_days").as_str())?;
    let last: Option<String> = row.try_get(format!("{prefix}_last_performed").as_str())?;

    let frequency_days = frequency
        .map(|days| u32::try_from(days).map_err(|err| sqlx::Error::Decode(Box::new(err))))
        .transpose()?;

    Ok(CareSchedule {
        frequency_days,
        last_performed: timestamp::decode_opt(last)?,
    })
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: uuid::Uuid = row.try_get("id")?;
        let owner_id: uuid::Uuid = row.try_get("owner_id")?;
        let planted_at: String = row.try_get("planted_at")?;

        Ok(Self(Plant {
            id: PlantId::from_uuid(id),
            owner_id: OwnerId::from_uuid(owner_id),
            name: row.try_get("name")?,
            species: row.try_get("species")?,
            watering: care_from_row(row, "watering")?,
            fertilizing: care_from_row(row, "fertilizing")?,
            pruning: care_from_row(row, "pruning")?,
            auto_scheduling: row.try_get("auto_scheduling")?,
            max_height: row.try_get("max_height")?,
            growth_rate_per_week: row.try_get("growth_rate_per_week")?,
            planted_at: timestamp::decode(&planted_at)?,
        }))
    }
}

const UPSERT: &str = r"
    INSERT INTO plants (
        id, owner_id, name, species,
        watering_frequency_days, watering_last_performed,
        fertilizing_frequency_days, fertilizing_last_performed,
        pruning_frequency_days, pruning_last_performed,
        auto_scheduling, max_height, growth_rate_per_week, planted_at
    )
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
    ON CONFLICT (id) DO UPDATE SET
        owner_id = excluded.owner_id,
        name = excluded.name,
        species = excluded.species,
        watering_frequency_days = excluded.watering_frequency_days,
        watering_last_performed = excluded.watering_last_performed,
        fertilizing_frequency_days = excluded.fertilizing_frequency_days,
        fertilizing_last_performed = excluded.fertilizing_last_performed,
        pruning_frequency_days = excluded.pruning_frequency_days,
        pruning_last_performed = excluded.pruning_last_performed,
        auto_scheduling = excluded.auto_scheduling,
        max_height = excluded.max_height,
        growth_rate_per_week = excluded.growth_rate_per_week,
        planted_at = excluded.planted_at
";

const SELECT_FILTERED: &str = r"
    SELECT * FROM plants
    WHERE (? IS NULL OR owner_id = ?)
      AND (? IS NULL OR auto_scheduling = ?)
    ORDER BY name, id
";

/// `SQLite`-backed plant repository.
#[derive(Clone)]
pub struct SqlitePlantRepository {
    pool: SqlitePool,
}

impl SqlitePlantRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert or replace a plant.
    ///
    /// # Errors
    ///
    /// Returns [`VerdantError::Validation`] for an invalid plant, or a
    /// storage error.
    pub async fn save(&self, plant: &Plant) -> Result<(), VerdantError> {
        plant.validate()?;
        let cares = [&plant.watering, &plant.fertilizing, &plant.pruning];
        let mut query = sqlx::query(UPSERT)
            .bind(plant.id.as_uuid())
            .bind(plant.owner_id.as_uuid())
            .bind(&plant.name)
            .bind(&plant.species);
        for care in cares {
            query = query
                .bind(care.frequency_days.map(i64::from))
                .bind(care.last_performed.map(timestamp::encode));
        }
        query
            .bind(plant.auto_scheduling)
            .bind(plant.max_height)
            .bind(plant.growth_rate_per_week)
            .bind(timestamp::encode(plant.planted_at))
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(())
    }

    /// Delete a plant. Its tasks and growth records are left for the cleanup
    /// pass.
    ///
    /// # Errors
    ///
    /// Returns a storage error.
    pub async fn delete(&self, id: PlantId) -> Result<(), VerdantError> {
        sqlx::query("DELETE FROM plants WHERE id = ?")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(())
    }
}

impl PlantRepository for SqlitePlantRepository {
    /// Rows that fail to decode are logged and left out, so one corrupt plant
    /// does not hide the others.
    async fn list_plants(&self, filter: PlantFilter) -> Result<Vec<Plant>, VerdantError> {
        let owner = filter.owner_id.map(OwnerId::as_uuid);
        let rows: Vec<SqliteRow> = sqlx::query(SELECT_FILTERED)
            .bind(owner)
            .bind(owner)
            .bind(filter.auto_scheduling)
            .bind(filter.auto_scheduling)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        let mut plants = Vec::with_capacity(rows.len());
        for row in &rows {
            match Wrapper::from_row(row) {
                Ok(Wrapper(plant)) => plants.push(plant),
                Err(err) => {
                    let id: Option<uuid::Uuid> = row.try_get("id").ok();
                    tracing::warn!(plant_id = ?id, error = %err, "skipping malformed plant row");
                }
            }
        }
        Ok(plants)
    }

    async fn get_plant(&self, id: PlantId) -> Result<Option<Plant>, VerdantError> {
        let row: Option<Wrapper> = sqlx::query_as("SELECT * FROM plants WHERE id = ?")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(row.map(|w| w.0))
    }

    async fn plant_exists(&self, id: PlantId) -> Result<bool, VerdantError> {
        let (exists,): (i64,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM plants WHERE id = ?)")
                .bind(id.as_uuid())
                .fetch_one(&self.pool)
                .await
                .map_err(StorageError::from)?;
        Ok(exists != 0)
    }
}
