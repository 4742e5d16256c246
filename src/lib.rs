use anyhow::{Context, Result};
// Use anyhow::Result as standard Result for service layer
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

// --- Declare modules ---
pub mod aggregator;
pub mod catalog;
pub mod composer;
mod config;
pub mod db;
pub mod repository;

// --- Expose public types ---
pub use aggregator::{aggregate, Category};
pub use catalog::{ExerciseRecord, WorkoutRecord};
pub use composer::{ComposerMode, SubmitError, ValidationError, WorkoutComposer};
pub use config::{
    get_config_path as get_config_path_util, load as load_config_util, parse_color,
    save as save_config_util, Config, ConfigError, StandardColor, Theme,
};
pub use db::{
    get_db_path as get_db_path_util, CustomWorkoutDraft, CustomWorkoutRecord, Difficulty,
    Error as DbError, MuscleGroup,
};
pub use repository::{CustomWorkoutRepository, CALORIES_PER_EXERCISE, MINUTES_PER_EXERCISE};

/// Process-wide owner of configuration, the built-in catalog and the one
/// custom workout repository every caller shares.
pub struct AppService {
    pub config: Config,
    pub repository: CustomWorkoutRepository,
    pub config_path: PathBuf,
}

impl AppService {
    /// Initializes the application service.
    ///
    /// An unavailable workout store is not fatal: the service starts with an
    /// empty set of custom workouts and [`Self::retry_storage`] may be called later.
    /// # Errors
    /// Returns `anyhow::Error` if config/db path determination or config loading fails.
    pub fn initialize() -> Result<Self> {
        let config_path =
            config::get_config_path().context("Failed to determine configuration file path")?;
        let config = config::load(&config_path)
            .with_context(|| format!("Failed to load config from {config_path:?}"))?;

        let db_path = match &config.database_path {
            Some(path) => path.clone(),
            None => db::get_db_path().context("Failed to determine database path")?,
        };

        Ok(Self::with_repository(
            config,
            config_path,
            CustomWorkoutRepository::new(db_path),
        ))
    }

    /// Builds a service around an explicit repository and initializes it.
    #[must_use]
    pub fn with_repository(
        config: Config,
        config_path: PathBuf,
        mut repository: CustomWorkoutRepository,
    ) -> Self {
        if let Err(e) = repository.initialize() {
            warn!(error = %e, "continuing without custom workouts");
        }
        Self {
            config,
            repository,
            config_path,
        }
    }

    pub fn get_config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn get_db_path(&self) -> &Path {
        self.repository.db_path()
    }

    #[must_use]
    pub const fn storage_available(&self) -> bool {
        self.repository.is_open()
    }

    /// Re-runs repository initialization after an earlier storage failure.
    /// # Errors
    /// Returns `DbError::StorageUnavailable` if the store still cannot be opened.
    pub fn retry_storage(&mut self) -> Result<(), DbError> {
        self.repository.initialize()
    }

    /// Saves the current configuration state.
    /// # Errors
    /// Returns `ConfigError` if saving fails.
    pub fn save_config(&self) -> Result<(), ConfigError> {
        config::save(&self.config_path, &self.config)
    }

    /// Sets the category `list` uses when none is given.
    /// # Errors
    /// - `ConfigError::InvalidCategory` if the label is not a known category.
    /// - `ConfigError` variants if saving fails.
    pub fn set_default_category(&mut self, category: &str) -> Result<Category, ConfigError> {
        let parsed: Category = category
            .parse()
            .map_err(|_| ConfigError::InvalidCategory(category.to_string()))?;
        self.config.default_category = parsed.to_string();
        self.save_config()?;
        Ok(parsed)
    }

    /// Sets the table header color.
    /// # Errors
    /// - `ConfigError::InvalidColor` for an unknown color name.
    /// - `ConfigError` variants if saving fails.
    pub fn set_header_color(&mut self, color: &str) -> Result<StandardColor, ConfigError> {
        let parsed = parse_color(color)?;
        self.config.theme.header_color = format!("{parsed:?}");
        self.save_config()?;
        Ok(parsed)
    }

    /// Enables or disables checking exercise ids against the catalog on save.
    /// # Errors
    /// Returns `ConfigError` variants if saving fails.
    pub fn set_validate_exercise_ids(&mut self, enabled: bool) -> Result<(), ConfigError> {
        self.config.validate_exercise_ids = enabled;
        self.save_config()
    }

    // --- Catalog ---

    #[must_use]
    pub fn list_exercises(&self, muscle_group: Option<MuscleGroup>) -> Vec<ExerciseRecord> {
        match muscle_group {
            Some(group) => catalog::exercises_for(group),
            None => catalog::list_exercises(),
        }
    }

    /// Merged built-in and custom workouts for `category`.
    #[must_use]
    pub fn list_workouts(&self, category: Category) -> Vec<WorkoutRecord> {
        aggregate(
            &catalog::list_workouts(),
            self.repository.as_catalog_view(),
            category,
        )
    }

    /// Looks a workout up among built-ins first, then custom workouts.
    #[must_use]
    pub fn find_workout(&self, id: &str) -> Option<WorkoutRecord> {
        catalog::find_workout(id)
            .or_else(|| self.repository.get(id).map(repository::to_catalog_view))
    }

    // --- Custom workouts ---

    pub fn list_custom_workouts(&self) -> Vec<&CustomWorkoutRecord> {
        self.repository.list()
    }

    /// # Errors
    /// Returns `DbError::WorkoutNotFound` for an unknown identifier.
    pub fn get_custom_workout(&self, id: &str) -> Result<&CustomWorkoutRecord, DbError> {
        self.repository.get_required(id)
    }

    /// Starts an edit session seeded from a stored custom workout.
    /// # Errors
    /// Returns `DbError::WorkoutNotFound` for an unknown identifier.
    pub fn edit_custom_workout(&self, id: &str) -> Result<WorkoutComposer, DbError> {
        self.repository.get_required(id).map(WorkoutComposer::edit)
    }

    /// Validates and saves a composed workout (create or update, by the composer's mode).
    /// # Errors
    /// - `SubmitError::Validation` if the draft is incomplete or, with
    ///   `validate_exercise_ids` enabled, references unknown exercises.
    /// - `SubmitError::Storage` if the repository rejects the write.
    pub fn save_composed(
        &mut self,
        composer: &WorkoutComposer,
    ) -> Result<CustomWorkoutRecord, SubmitError> {
        if self.config.validate_exercise_ids {
            composer.validate_against_catalog()?;
        }
        composer.submit(&mut self.repository)
    }

    /// Deletes a custom workout. Unknown, empty and built-in ids are a no-op
    /// returning `false`; built-in workouts never live in the custom store.
    /// # Errors
    /// Returns `anyhow::Error` wrapping `DbError` if the store rejects the delete.
    pub fn delete_custom_workout(&mut self, id: &str) -> Result<bool> {
        let trimmed = id.trim();
        if trimmed.is_empty() {
            debug!("delete with empty workout id ignored");
            return Ok(false);
        }
        if catalog::find_workout(trimmed).is_some() {
            debug!(id = trimmed, "built-in workout is not deletable; ignored");
            return Ok(false);
        }
        let removed = self
            .repository
            .delete(trimmed)
            .with_context(|| format!("Failed to delete custom workout '{trimmed}'"))?;
        if removed {
            info!(id = trimmed, "custom workout removed");
        }
        Ok(removed)
    }

    /// Re-reads the store, picking up writes made by other processes.
    /// # Errors
    /// Returns `anyhow::Error` wrapping `DbError::StorageUnavailable` on read failure.
    pub fn reload(&mut self) -> Result<()> {
        self.repository
            .reload()
            .context("Failed to reload custom workouts")
    }
}
