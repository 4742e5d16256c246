//src/repository.rs
use crate::catalog::WorkoutRecord;
use crate::db::{self, CustomWorkoutDraft, CustomWorkoutRecord, Error as DbError};
use chrono::Utc;
use indexmap::IndexMap;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use uuid::Uuid;

pub const MINUTES_PER_EXERCISE: i64 = 8;
pub const CALORIES_PER_EXERCISE: i64 = 50;

#[must_use]
pub fn estimated_duration(exercise_count: usize) -> i64 {
    i64::try_from(exercise_count)
        .unwrap_or(i64::MAX)
        .saturating_mul(MINUTES_PER_EXERCISE)
}

#[must_use]
pub fn estimated_calories(exercise_count: usize) -> i64 {
    i64::try_from(exercise_count)
        .unwrap_or(i64::MAX)
        .saturating_mul(CALORIES_PER_EXERCISE)
}

/// Projects a stored record into the shape shared with built-in workouts.
#[must_use]
pub fn to_catalog_view(record: &CustomWorkoutRecord) -> WorkoutRecord {
    WorkoutRecord {
        id: record.id.clone(),
        name: record.name.clone(),
        description: record.description.clone(),
        muscle_group: record.muscle_group,
        difficulty: record.difficulty,
        duration: format!("{} min", record.estimated_duration),
        calories: record.estimated_calories,
        exercise_ids: record.exercise_ids.clone(),
        is_custom: true,
    }
}

/// Durable store of user-authored workouts with an in-memory cache.
///
/// The cache is only refreshed by `initialize`, `reload` and this instance's
/// own mutations. Writes made through another instance on the same file stay
/// invisible until `reload` is called.
pub struct CustomWorkoutRepository {
    db_path: PathBuf,
    conn: Option<Connection>,
    cache: IndexMap<String, CustomWorkoutRecord>,
}

impl CustomWorkoutRepository {
    /// Creates a repository for the store at `db_path`. Nothing is opened until
    /// [`Self::initialize`] is called. `":memory:"` selects a private in-memory store.
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            conn: None,
            cache: IndexMap::new(),
        }
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    /// Opens the store if needed, ensures the schema and loads every record.
    /// Calling it again replaces the cache with the store's current contents.
    ///
    /// # Errors
    /// Returns `DbError::StorageUnavailable` if the store cannot be opened or read.
    /// The cache is empty afterwards and the call may be retried.
    pub fn initialize(&mut self) -> Result<(), DbError> {
        if self.conn.is_none() {
            match db::open_db(&self.db_path) {
                Ok(conn) => self.conn = Some(conn),
                Err(e) => {
                    self.cache.clear();
                    warn!(path = %self.db_path.display(), error = %e, "could not open workout store");
                    return Err(e);
                }
            }
        }
        if let Err(e) = db::init_db(self.connection()?) {
            self.cache.clear();
            warn!(path = %self.db_path.display(), error = %e, "could not prepare workout store");
            return Err(e);
        }
        self.reload()
    }

    /// Discards the cache and re-reads the store.
    ///
    /// # Errors
    /// Returns `DbError::StorageUnavailable` if the store cannot be read; the
    /// cache is left empty.
    pub fn reload(&mut self) -> Result<(), DbError> {
        self.cache.clear();
        let records = match db::list_custom_workouts(self.connection()?) {
            Ok(records) => records,
            Err(DbError::QueryFailed(e)) => {
                warn!(error = %e, "failed to read custom workouts");
                return Err(DbError::StorageUnavailable(e));
            }
            Err(e) => return Err(e),
        };
        self.cache = records
            .into_iter()
            .map(|record| (record.id.clone(), record))
            .collect();
        debug!(count = self.cache.len(), "loaded custom workouts");
        Ok(())
    }

    /// Cached records: store order (oldest first) followed by records created
    /// through this instance.
    pub fn list(&self) -> Vec<&CustomWorkoutRecord> {
        self.cache.values().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&CustomWorkoutRecord> {
        self.cache.get(id)
    }

    /// Like [`Self::get`] but reports a missing record as a typed error.
    ///
    /// # Errors
    /// Returns `DbError::WorkoutNotFound` for an unknown identifier.
    pub fn get_required(&self, id: &str) -> Result<&CustomWorkoutRecord, DbError> {
        self.cache
            .get(id)
            .ok_or_else(|| DbError::WorkoutNotFound(id.to_string()))
    }

    /// Persists a new workout under a fresh identifier and returns the stored record.
    ///
    /// # Errors
    /// - `DbError::StoreClosed` if the store is not open.
    /// - `DbError::DuplicateWorkoutId` if the generated identifier already exists.
    /// - `DbError::InsertFailed` for any other write failure.
    pub fn create(&mut self, draft: CustomWorkoutDraft) -> Result<CustomWorkoutRecord, DbError> {
        let id = Uuid::new_v4().to_string();
        let record = draft.into_record(id, Utc::now());

        db::insert_custom_workout(self.connection_mut()?, &record)?;
        info!(id = %record.id, name = %record.name, "created custom workout");

        self.cache.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    /// Replaces the stored fields of an existing workout. The stored `created_at`
    /// is kept whatever `record` carries; `updated_at` is stamped now.
    ///
    /// # Errors
    /// - `DbError::WorkoutNotFound` if no stored workout has `record.id`.
    /// - `DbError::StoreClosed` if the store is not open.
    /// - `DbError::UpdateFailed` / `DbError::QueryFailed` for write or read failures.
    pub fn update(&mut self, record: CustomWorkoutRecord) -> Result<CustomWorkoutRecord, DbError> {
        let stored = db::get_custom_workout(self.connection()?, &record.id)?
            .ok_or_else(|| DbError::WorkoutNotFound(record.id.clone()))?;

        // Clock may have moved backwards since the last write
        let updated_at = Utc::now().max(stored.updated_at).max(stored.created_at);
        let record = CustomWorkoutRecord {
            created_at: stored.created_at,
            updated_at,
            ..record
        };

        db::update_custom_workout(self.connection_mut()?, &record)?;
        info!(id = %record.id, name = %record.name, "updated custom workout");

        self.cache.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    /// Removes a workout permanently. Unknown identifiers are a no-op.
    /// Returns whether the store held the workout.
    ///
    /// # Errors
    /// - `DbError::StoreClosed` if the store is not open.
    /// - `DbError::DeleteFailed` if the delete statement fails.
    pub fn delete(&mut self, id: &str) -> Result<bool, DbError> {
        let removed = db::delete_custom_workout(self.connection_mut()?, id)?;
        self.cache.shift_remove(id);
        if removed {
            info!(id, "deleted custom workout");
        } else {
            debug!(id, "delete of unknown custom workout ignored");
        }
        Ok(removed)
    }

    /// Fresh catalog-shaped projection of every cached record.
    #[must_use]
    pub fn as_catalog_view(&self) -> Vec<WorkoutRecord> {
        self.cache.values().map(to_catalog_view).collect()
    }

    fn connection(&self) -> Result<&Connection, DbError> {
        self.conn.as_ref().ok_or(DbError::StoreClosed)
    }

    fn connection_mut(&mut self) -> Result<&mut Connection, DbError> {
        self.conn.as_mut().ok_or(DbError::StoreClosed)
    }
}
