//src/composer.rs
use crate::catalog;
use crate::db::{
    CustomWorkoutDraft, CustomWorkoutRecord, Difficulty, Error as DbError, MuscleGroup,
};
use crate::repository::{self, CustomWorkoutRepository};
use chrono::{DateTime, Utc};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Workout name cannot be empty.")]
    EmptyName,
    #[error("Select at least one exercise.")]
    NoExercisesSelected,
    #[error("Unknown exercise(s): {}", .0.join(", "))]
    UnknownExercises(Vec<String>),
}

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("Workout is not ready to save: {0}")]
    Validation(#[from] ValidationError),
    #[error("Failed to save workout: {0}")]
    Storage(#[from] DbError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComposerMode {
    Create,
    Edit {
        id: String,
        created_at: DateTime<Utc>,
    },
}

type SavedCallback = Box<dyn Fn(&CustomWorkoutRecord)>;

/// Draft form for creating or editing a custom workout.
/// A refused or failed submission leaves the draft untouched.
pub struct WorkoutComposer {
    mode: ComposerMode,
    name: String,
    description: String,
    muscle_group: MuscleGroup,
    difficulty: Difficulty,
    selected: Vec<String>, // Pick order; an edited record may carry repeats
    on_saved: Option<SavedCallback>,
}

impl fmt::Debug for WorkoutComposer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkoutComposer")
            .field("mode", &self.mode)
            .field("name", &self.name)
            .field("description", &self.description)
            .field("muscle_group", &self.muscle_group)
            .field("difficulty", &self.difficulty)
            .field("selected", &self.selected)
            .field("on_saved", &self.on_saved.is_some())
            .finish()
    }
}

impl Default for WorkoutComposer {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkoutComposer {
    /// Empty draft in create mode.
    #[must_use]
    pub fn new() -> Self {
        Self {
            mode: ComposerMode::Create,
            name: String::new(),
            description: String::new(),
            muscle_group: MuscleGroup::FullBody,
            difficulty: Difficulty::default(),
            selected: Vec::new(),
            on_saved: None,
        }
    }

    /// Draft seeded from an existing record; submitting updates it in place.
    #[must_use]
    pub fn edit(record: &CustomWorkoutRecord) -> Self {
        Self {
            mode: ComposerMode::Edit {
                id: record.id.clone(),
                created_at: record.created_at,
            },
            name: record.name.clone(),
            description: record.description.clone(),
            muscle_group: record.muscle_group,
            difficulty: record.difficulty,
            selected: record.exercise_ids.clone(),
            on_saved: None,
        }
    }

    /// Registers the refresh hook invoked after a successful save.
    #[must_use]
    pub fn on_saved(mut self, callback: impl Fn(&CustomWorkoutRecord) + 'static) -> Self {
        self.on_saved = Some(Box::new(callback));
        self
    }

    pub const fn mode(&self) -> &ComposerMode {
        &self.mode
    }

    pub const fn is_editing(&self) -> bool {
        matches!(self.mode, ComposerMode::Edit { .. })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub const fn muscle_group(&self) -> MuscleGroup {
        self.muscle_group
    }

    pub const fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn set_muscle_group(&mut self, muscle_group: MuscleGroup) {
        self.muscle_group = muscle_group;
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
    }

    /// Adds the exercise if absent, removes every occurrence of it if present.
    /// Returns whether the exercise is selected afterwards.
    pub fn toggle_exercise(&mut self, exercise_id: &str) -> bool {
        if self.is_selected(exercise_id) {
            self.selected.retain(|id| id != exercise_id);
            false
        } else {
            self.selected.push(exercise_id.to_string());
            true
        }
    }

    pub fn is_selected(&self, exercise_id: &str) -> bool {
        self.selected.iter().any(|id| id == exercise_id)
    }

    /// Selected exercise ids in the order they were picked.
    pub fn selected_exercises(&self) -> impl Iterator<Item = &str> {
        self.selected.iter().map(String::as_str)
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    pub fn estimated_duration(&self) -> i64 {
        repository::estimated_duration(self.selected.len())
    }

    pub fn estimated_calories(&self) -> i64 {
        repository::estimated_calories(self.selected.len())
    }

    /// Selected ids the built-in exercise catalog does not know.
    pub fn unknown_exercises(&self) -> Vec<String> {
        self.selected
            .iter()
            .filter(|id| catalog::find_exercise(id).is_none())
            .fold(Vec::new(), |mut unknown: Vec<String>, id| {
                if !unknown.contains(id) {
                    unknown.push(id.clone());
                }
                unknown
            })
    }

    /// # Errors
    /// Returns the first unmet submission precondition.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if self.selected.is_empty() {
            return Err(ValidationError::NoExercisesSelected);
        }
        Ok(())
    }

    /// Like [`Self::validate`], additionally rejecting ids missing from the catalog.
    ///
    /// # Errors
    /// Returns `ValidationError::UnknownExercises` listing every unknown id.
    pub fn validate_against_catalog(&self) -> Result<(), ValidationError> {
        self.validate()?;
        let unknown = self.unknown_exercises();
        if unknown.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::UnknownExercises(unknown))
        }
    }

    /// Gate for the save action.
    pub fn can_submit(&self) -> bool {
        self.validate().is_ok()
    }

    /// Snapshot of the current field values and estimates.
    #[must_use]
    pub fn draft(&self) -> CustomWorkoutDraft {
        CustomWorkoutDraft {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            muscle_group: self.muscle_group,
            difficulty: self.difficulty,
            estimated_duration: self.estimated_duration(),
            estimated_calories: self.estimated_calories(),
            exercise_ids: self.selected.clone(),
        }
    }

    /// Saves the draft through `repo`: create in create mode, update in edit mode.
    ///
    /// # Errors
    /// - `SubmitError::Validation` if the draft does not meet the submission
    ///   precondition; the repository is not touched.
    /// - `SubmitError::Storage` if the repository rejects the write.
    pub fn submit(
        &self,
        repo: &mut CustomWorkoutRepository,
    ) -> Result<CustomWorkoutRecord, SubmitError> {
        self.validate()?;
        let draft = self.draft();

        let saved = match &self.mode {
            ComposerMode::Create => repo.create(draft)?,
            ComposerMode::Edit { id, created_at } => {
                let now = Utc::now();
                let mut record = draft.into_record(id.clone(), now);
                record.created_at = *created_at;
                repo.update(record)?
            }
        };

        if let Some(callback) = &self.on_saved {
            callback(&saved);
        }
        Ok(saved)
    }
}
