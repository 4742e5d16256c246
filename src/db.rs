//src/db.rs
use chrono::{DateTime, Utc};
use rusqlite::{named_params, params, Connection, OptionalExtension, Row};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use strum_macros::EnumIter;
use thiserror::Error;

/// Muscle-group tag shared by catalog filtering and record classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Serialize)]
pub enum MuscleGroup {
    Chest,
    Back,
    Shoulders,
    Arms,
    Legs,
    Core,
    Push,
    Pull,
    #[serde(rename = "Full Body")]
    FullBody,
}

impl MuscleGroup {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Chest => "Chest",
            Self::Back => "Back",
            Self::Shoulders => "Shoulders",
            Self::Arms => "Arms",
            Self::Legs => "Legs",
            Self::Core => "Core",
            Self::Push => "Push",
            Self::Pull => "Pull",
            Self::FullBody => "Full Body",
        }
    }
}

impl fmt::Display for MuscleGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for MuscleGroup {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "chest" => Ok(Self::Chest),
            "back" => Ok(Self::Back),
            "shoulders" => Ok(Self::Shoulders),
            "arms" => Ok(Self::Arms),
            "legs" => Ok(Self::Legs),
            "core" => Ok(Self::Core),
            "push" => Ok(Self::Push),
            "pull" => Ok(Self::Pull),
            "full body" | "full-body" | "fullbody" => Ok(Self::FullBody), // Allow variation
            _ => Err(Error::InvalidTag {
                kind: "muscle group",
                value: value.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIter, Serialize)]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Beginner => write!(f, "Beginner"),
            Self::Intermediate => write!(f, "Intermediate"),
            Self::Advanced => write!(f, "Advanced"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            _ => Err(Error::InvalidTag {
                kind: "difficulty",
                value: value.to_string(),
            }),
        }
    }
}

/// A user-authored workout as persisted in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomWorkoutRecord {
    pub id: String,
    pub name: String,
    pub description: String,
    pub muscle_group: MuscleGroup,
    pub difficulty: Difficulty,
    pub estimated_duration: i64, // Minutes
    pub estimated_calories: i64,
    pub exercise_ids: Vec<String>, // Ordered, duplicates allowed
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Field values of a workout that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomWorkoutDraft {
    pub name: String,
    pub description: String,
    pub muscle_group: MuscleGroup,
    pub difficulty: Difficulty,
    pub estimated_duration: i64,
    pub estimated_calories: i64,
    pub exercise_ids: Vec<String>,
}

impl CustomWorkoutDraft {
    /// Finalizes the draft into a record with the given identity and timestamps.
    #[must_use]
    pub fn into_record(self, id: String, now: DateTime<Utc>) -> CustomWorkoutRecord {
        CustomWorkoutRecord {
            id,
            name: self.name,
            description: self.description,
            muscle_group: self.muscle_group,
            difficulty: self.difficulty,
            estimated_duration: self.estimated_duration,
            estimated_calories: self.estimated_calories,
            exercise_ids: self.exercise_ids,
            created_at: now,
            updated_at: now,
        }
    }
}

// Custom Error type for DB operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Workout storage is unavailable: {0}")]
    StorageUnavailable(#[source] rusqlite::Error),
    #[error("Workout storage has not been opened")]
    StoreClosed,
    #[error("Failed to get application data directory")]
    DataDir,
    #[error("I/O error accessing database file")]
    Io(#[from] std::io::Error),
    #[error("Custom workout not found: {0}")]
    WorkoutNotFound(String),
    #[error("Custom workout identifier collision: {0}")]
    DuplicateWorkoutId(String),
    #[error("Database query failed: {0}")]
    QueryFailed(#[source] rusqlite::Error),
    #[error("Database update failed: {0}")]
    UpdateFailed(#[source] rusqlite::Error),
    #[error("Database insert failed: {0}")]
    InsertFailed(#[source] rusqlite::Error),
    #[error("Database delete failed: {0}")]
    DeleteFailed(#[source] rusqlite::Error),
    #[error("Invalid {kind}: '{value}'")]
    InvalidTag { kind: &'static str, value: String },
}

impl Error {
    /// True for the conditions callers should treat as "no store right now":
    /// retry later or carry on with an empty set.
    #[must_use]
    pub const fn is_storage_unavailable(&self) -> bool {
        matches!(self, Self::StorageUnavailable(_) | Self::StoreClosed)
    }
}

const DB_FILE_NAME: &str = "custom_workouts.sqlite";
const APP_DATA_DIR: &str = "workout-studio";

/// Gets the path to the SQLite database file within the app's data directory.
/// Exposed at crate root as `get_db_path_util`
pub fn get_db_path() -> Result<PathBuf, Error> {
    let data_dir = dirs::data_dir().ok_or(Error::DataDir)?;
    let app_dir = data_dir.join(APP_DATA_DIR); // Same dir name as config
    if !app_dir.exists() {
        std::fs::create_dir_all(&app_dir)?;
    }
    Ok(app_dir.join(DB_FILE_NAME))
}

/// Opens a connection to the SQLite database.
pub fn open_db<P: AsRef<Path>>(path: P) -> Result<Connection, Error> {
    Connection::open(path).map_err(Error::StorageUnavailable)
}

/// Initializes the database tables if they don't exist.
pub fn init_db(conn: &Connection) -> Result<(), Error> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS custom_workouts (
            id TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            muscle_group TEXT NOT NULL,
            difficulty TEXT NOT NULL,
            estimated_duration INTEGER NOT NULL,
            estimated_calories INTEGER NOT NULL,
            created_at TEXT NOT NULL, -- Store as RFC3339 string
            updated_at TEXT NOT NULL
        )",
        [],
    )
    .map_err(Error::StorageUnavailable)?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS custom_workout_exercises (
            workout_id TEXT NOT NULL,
            position INTEGER NOT NULL,
            exercise_id TEXT NOT NULL,
            PRIMARY KEY (workout_id, position)
        )",
        [],
    )
    .map_err(Error::StorageUnavailable)?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_custom_workouts_created_at ON custom_workouts(created_at)",
        [],
    )
    .map_err(Error::StorageUnavailable)?;

    Ok(())
}

fn parse_timestamp(idx: usize, value: &str) -> Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

fn parse_tag<T>(idx: usize, value: &str) -> Result<T, rusqlite::Error>
where
    T: FromStr<Err = Error>,
{
    value.parse::<T>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

// Maps a custom_workouts row; exercise ids are attached by the caller.
fn map_row_to_custom_workout(row: &Row) -> Result<CustomWorkoutRecord, rusqlite::Error> {
    let muscle_group_str: String = row.get(3)?;
    let difficulty_str: String = row.get(4)?;
    let created_at_str: String = row.get(7)?;
    let updated_at_str: String = row.get(8)?;

    Ok(CustomWorkoutRecord {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        muscle_group: parse_tag(3, &muscle_group_str)?,
        difficulty: parse_tag(4, &difficulty_str)?,
        estimated_duration: row.get(5)?,
        estimated_calories: row.get(6)?,
        exercise_ids: Vec::new(),
        created_at: parse_timestamp(7, &created_at_str)?,
        updated_at: parse_timestamp(8, &updated_at_str)?,
    })
}

const SELECT_CUSTOM_WORKOUT: &str = "SELECT id, name, description, muscle_group, difficulty,
            estimated_duration, estimated_calories, created_at, updated_at
     FROM custom_workouts";

/// Lists every stored custom workout, oldest first, with its ordered exercise ids.
pub fn list_custom_workouts(conn: &Connection) -> Result<Vec<CustomWorkoutRecord>, Error> {
    let sql = format!("{SELECT_CUSTOM_WORKOUT} ORDER BY created_at ASC, id ASC");
    let mut stmt = conn.prepare(&sql).map_err(Error::QueryFailed)?;
    let mut workouts = stmt
        .query_map([], map_row_to_custom_workout)
        .map_err(Error::QueryFailed)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(Error::QueryFailed)?;

    let mut stmt = conn
        .prepare(
            "SELECT workout_id, exercise_id FROM custom_workout_exercises
             ORDER BY workout_id ASC, position ASC",
        )
        .map_err(Error::QueryFailed)?;
    let rows = stmt
        .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))
        .map_err(Error::QueryFailed)?;

    let mut exercises_by_workout: HashMap<String, Vec<String>> = HashMap::new();
    for row in rows {
        let (workout_id, exercise_id) = row.map_err(Error::QueryFailed)?;
        exercises_by_workout
            .entry(workout_id)
            .or_default()
            .push(exercise_id);
    }

    for workout in &mut workouts {
        if let Some(ids) = exercises_by_workout.remove(&workout.id) {
            workout.exercise_ids = ids;
        }
    }

    Ok(workouts)
}

fn list_exercise_ids(conn: &Connection, workout_id: &str) -> Result<Vec<String>, Error> {
    let mut stmt = conn
        .prepare(
            "SELECT exercise_id FROM custom_workout_exercises
             WHERE workout_id = ?1 ORDER BY position ASC",
        )
        .map_err(Error::QueryFailed)?;
    let ids = stmt
        .query_map(params![workout_id], |row| row.get(0))
        .map_err(Error::QueryFailed)?;
    ids.collect::<Result<Vec<String>, _>>()
        .map_err(Error::QueryFailed)
}

/// Retrieves a single custom workout by its identifier.
pub fn get_custom_workout(
    conn: &Connection,
    id: &str,
) -> Result<Option<CustomWorkoutRecord>, Error> {
    let sql = format!("{SELECT_CUSTOM_WORKOUT} WHERE id = ?1");
    let workout = conn
        .query_row(&sql, params![id], map_row_to_custom_workout)
        .optional()
        .map_err(Error::QueryFailed)?;

    match workout {
        Some(mut workout) => {
            workout.exercise_ids = list_exercise_ids(conn, id)?;
            Ok(Some(workout))
        }
        None => Ok(None),
    }
}

fn insert_exercise_ids(
    tx: &rusqlite::Transaction<'_>,
    workout_id: &str,
    exercise_ids: &[String],
) -> Result<(), Error> {
    let mut stmt = tx
        .prepare(
            "INSERT INTO custom_workout_exercises (workout_id, position, exercise_id)
             VALUES (?1, ?2, ?3)",
        )
        .map_err(Error::InsertFailed)?;
    for (position, exercise_id) in exercise_ids.iter().enumerate() {
        let position = i64::try_from(position).unwrap_or(i64::MAX);
        stmt.execute(params![workout_id, position, exercise_id])
            .map_err(Error::InsertFailed)?;
    }
    Ok(())
}

/// Inserts a finalized custom workout together with its exercise sequence.
pub fn insert_custom_workout(
    conn: &mut Connection,
    workout: &CustomWorkoutRecord,
) -> Result<(), Error> {
    let tx = conn.transaction().map_err(Error::InsertFailed)?;

    let inserted = tx.execute(
        "INSERT INTO custom_workouts (id, name, description, muscle_group, difficulty,
                                      estimated_duration, estimated_calories, created_at, updated_at)
         VALUES (:id, :name, :description, :muscle_group, :difficulty,
                 :duration, :calories, :created_at, :updated_at)",
        named_params! {
            ":id": workout.id,
            ":name": workout.name,
            ":description": workout.description,
            ":muscle_group": workout.muscle_group.to_string(),
            ":difficulty": workout.difficulty.to_string(),
            ":duration": workout.estimated_duration,
            ":calories": workout.estimated_calories,
            ":created_at": workout.created_at.to_rfc3339(),
            ":updated_at": workout.updated_at.to_rfc3339(),
        },
    );
    if let Err(e) = inserted {
        if let rusqlite::Error::SqliteFailure(ref err, _) = e {
            // Only constraint on custom_workouts that an insert can trip is the primary key
            if err.code == rusqlite::ErrorCode::ConstraintViolation {
                return Err(Error::DuplicateWorkoutId(workout.id.clone()));
            }
        }
        return Err(Error::InsertFailed(e));
    }

    insert_exercise_ids(&tx, &workout.id, &workout.exercise_ids)?;
    tx.commit().map_err(Error::InsertFailed)?;
    Ok(())
}

/// Rewrites every mutable field of an existing custom workout.
/// `created_at` is never touched.
pub fn update_custom_workout(
    conn: &mut Connection,
    workout: &CustomWorkoutRecord,
) -> Result<(), Error> {
    let tx = conn.transaction().map_err(Error::UpdateFailed)?;

    let rows_affected = tx
        .execute(
            "UPDATE custom_workouts
             SET name = :name, description = :description, muscle_group = :muscle_group,
                 difficulty = :difficulty, estimated_duration = :duration,
                 estimated_calories = :calories, updated_at = :updated_at
             WHERE id = :id",
            named_params! {
                ":id": workout.id,
                ":name": workout.name,
                ":description": workout.description,
                ":muscle_group": workout.muscle_group.to_string(),
                ":difficulty": workout.difficulty.to_string(),
                ":duration": workout.estimated_duration,
                ":calories": workout.estimated_calories,
                ":updated_at": workout.updated_at.to_rfc3339(),
            },
        )
        .map_err(Error::UpdateFailed)?;

    if rows_affected == 0 {
        // Dropping the transaction rolls it back
        return Err(Error::WorkoutNotFound(workout.id.clone()));
    }

    tx.execute(
        "DELETE FROM custom_workout_exercises WHERE workout_id = ?1",
        params![workout.id],
    )
    .map_err(Error::UpdateFailed)?;
    insert_exercise_ids(&tx, &workout.id, &workout.exercise_ids)?;

    tx.commit().map_err(Error::UpdateFailed)?;
    Ok(())
}

/// Deletes a custom workout and its exercise sequence.
/// Returns `false` if no workout had that identifier.
pub fn delete_custom_workout(conn: &mut Connection, id: &str) -> Result<bool, Error> {
    let tx = conn.transaction().map_err(Error::DeleteFailed)?;

    tx.execute(
        "DELETE FROM custom_workout_exercises WHERE workout_id = ?1",
        params![id],
    )
    .map_err(Error::DeleteFailed)?;
    let rows_affected = tx
        .execute("DELETE FROM custom_workouts WHERE id = ?1", params![id])
        .map_err(Error::DeleteFailed)?;

    tx.commit().map_err(Error::DeleteFailed)?;
    Ok(rows_affected > 0)
}
