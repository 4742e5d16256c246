use anyhow::Result;
use std::thread;
use std::time::Duration as StdDuration; // For timestamp ordering checks
use tempfile::TempDir;
use workout_studio_lib::{
    catalog, AppService, Category, Config, CustomWorkoutDraft, CustomWorkoutRepository, DbError,
    Difficulty, MuscleGroup, SubmitError, ValidationError, WorkoutComposer,
    CALORIES_PER_EXERCISE, MINUTES_PER_EXERCISE,
};

// Helper function to create a test service with an in-memory store
fn create_test_service() -> AppService {
    AppService::with_repository(
        Config::default(),
        "test_config.toml".into(),
        CustomWorkoutRepository::new(":memory:"),
    )
}

fn draft(name: &str, muscle_group: MuscleGroup, exercise_ids: &[&str]) -> CustomWorkoutDraft {
    let n = i64::try_from(exercise_ids.len()).unwrap();
    CustomWorkoutDraft {
        name: name.to_string(),
        description: format!("{name} description"),
        muscle_group,
        difficulty: Difficulty::Intermediate,
        estimated_duration: n * MINUTES_PER_EXERCISE,
        estimated_calories: n * CALORIES_PER_EXERCISE,
        exercise_ids: exercise_ids.iter().map(ToString::to_string).collect(),
    }
}

fn open_repo(path: &std::path::Path) -> Result<CustomWorkoutRepository> {
    let mut repo = CustomWorkoutRepository::new(path);
    repo.initialize()?;
    Ok(repo)
}

#[test]
fn test_create_then_get_returns_draft_fields() -> Result<()> {
    let mut service = create_test_service();
    let input = draft("Upper", MuscleGroup::Chest, &["bench-press", "push-up"]);

    let created = service.repository.create(input.clone())?;
    let fetched = service.get_custom_workout(&created.id)?;

    assert_eq!(fetched.name, input.name);
    assert_eq!(fetched.description, input.description);
    assert_eq!(fetched.muscle_group, input.muscle_group);
    assert_eq!(fetched.difficulty, input.difficulty);
    assert_eq!(fetched.estimated_duration, input.estimated_duration);
    assert_eq!(fetched.estimated_calories, input.estimated_calories);
    assert_eq!(fetched.exercise_ids, input.exercise_ids);
    assert_eq!(fetched.created_at, fetched.updated_at);
    assert!(!fetched.id.is_empty());
    Ok(())
}

#[test]
fn test_created_ids_are_unique() -> Result<()> {
    let mut service = create_test_service();
    let a = service.repository.create(draft("A", MuscleGroup::Core, &["plank"]))?;
    let b = service.repository.create(draft("A", MuscleGroup::Core, &["plank"]))?;
    assert_ne!(a.id, b.id);
    assert_eq!(service.list_custom_workouts().len(), 2);
    Ok(())
}

#[test]
fn test_update_preserves_created_at() -> Result<()> {
    let mut service = create_test_service();
    let created = service
        .repository
        .create(draft("Legs", MuscleGroup::Legs, &["back-squat"]))?;

    thread::sleep(StdDuration::from_millis(5));

    let mut changed = created.clone();
    changed.name = "Legs v2".to_string();
    changed.exercise_ids.push("leg-press".to_string());
    changed.created_at = chrono::Utc::now(); // Ignored by update
    let updated = service.repository.update(changed)?;

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at >= created.updated_at);
    assert!(updated.updated_at >= updated.created_at);

    service.reload()?;
    let stored = service.get_custom_workout(&created.id)?;
    assert_eq!(stored.name, "Legs v2");
    assert_eq!(stored.exercise_ids, ["back-squat", "leg-press"]);
    assert_eq!(stored.created_at, created.created_at);
    Ok(())
}

#[test]
fn test_update_unknown_id_is_not_found() -> Result<()> {
    let mut service = create_test_service();
    let created = service
        .repository
        .create(draft("Temp", MuscleGroup::Arms, &["dips"]))?;
    service.repository.delete(&created.id)?;

    let result = service.repository.update(created);
    assert!(matches!(result, Err(DbError::WorkoutNotFound(_))));
    assert!(service.get_custom_workout("nope").is_err());
    assert!(service.repository.get("nope").is_none());
    Ok(())
}

#[test]
fn test_delete_is_idempotent() -> Result<()> {
    let mut service = create_test_service();
    let created = service
        .repository
        .create(draft("Gone", MuscleGroup::Back, &["pull-up"]))?;

    assert!(service.delete_custom_workout(&created.id)?);
    assert!(!service.delete_custom_workout(&created.id)?);
    assert!(service.repository.get(&created.id).is_none());

    service.reload()?;
    assert!(service.list_custom_workouts().is_empty());
    Ok(())
}

#[test]
fn test_deleting_builtin_or_empty_id_is_a_noop() -> Result<()> {
    let mut service = create_test_service();
    service
        .repository
        .create(draft("Kept", MuscleGroup::Legs, &["back-squat"]))?;

    assert!(!service.delete_custom_workout("leg-day")?);
    assert!(!service.delete_custom_workout("   ")?);

    assert!(service.find_workout("leg-day").is_some());
    assert!(service
        .list_workouts(Category::All)
        .iter()
        .any(|w| w.id == "leg-day" && !w.is_custom));
    assert_eq!(service.list_custom_workouts().len(), 1);
    Ok(())
}

#[test]
fn test_initialize_is_idempotent() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("workouts.sqlite");
    let mut repo = open_repo(&path)?;
    repo.create(draft("One", MuscleGroup::Push, &["push-up"]))?;
    repo.create(draft("Two", MuscleGroup::Pull, &["pull-up"]))?;

    repo.initialize()?;
    repo.initialize()?;
    assert_eq!(repo.len(), 2);

    let names: Vec<_> = repo.list().iter().map(|w| w.name.clone()).collect();
    assert_eq!(names, ["One", "Two"]);
    Ok(())
}

#[test]
fn test_sibling_instance_needs_reload() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("workouts.sqlite");
    let mut writer = open_repo(&path)?;
    let mut reader = open_repo(&path)?;

    let created = writer.create(draft("Shared", MuscleGroup::Core, &["plank"]))?;
    assert!(reader.get(&created.id).is_none());

    reader.reload()?;
    assert_eq!(reader.get(&created.id).map(|w| w.name.as_str()), Some("Shared"));

    writer.delete(&created.id)?;
    assert!(reader.get(&created.id).is_some());
    reader.reload()?;
    assert!(reader.is_empty());
    Ok(())
}

#[test]
fn test_last_writer_wins_between_instances() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("workouts.sqlite");
    let mut first = open_repo(&path)?;
    let created = first.create(draft("Base", MuscleGroup::Arms, &["dips"]))?;
    let mut second = open_repo(&path)?;

    let mut from_first = created.clone();
    from_first.name = "First edit".to_string();
    first.update(from_first)?;

    let mut from_second = created;
    from_second.name = "Second edit".to_string();
    second.update(from_second)?;

    first.reload()?;
    assert_eq!(first.list()[0].name, "Second edit");
    Ok(())
}

#[test]
fn test_unavailable_storage_degrades_to_empty_set() -> Result<()> {
    let dir = TempDir::new()?;
    let missing_dir = dir.path().join("not-yet-created");
    let mut service = AppService::with_repository(
        Config::default(),
        dir.path().join("config.toml"),
        CustomWorkoutRepository::new(missing_dir.join("workouts.sqlite")),
    );

    assert!(!service.storage_available());
    assert!(service.list_custom_workouts().is_empty());
    assert_eq!(
        service.list_workouts(Category::All).len(),
        catalog::list_workouts().len()
    );
    let err = service.retry_storage().unwrap_err();
    assert!(err.is_storage_unavailable());

    std::fs::create_dir_all(&missing_dir)?;
    service.retry_storage()?;
    assert!(service.storage_available());
    Ok(())
}

#[test]
fn test_reload_failure_leaves_empty_cache() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("workouts.sqlite");
    let mut repo = open_repo(&path)?;
    repo.create(draft("Doomed", MuscleGroup::Core, &["plank"]))?;
    assert_eq!(repo.len(), 1);

    let other = rusqlite::Connection::open(&path)?;
    other.execute("DROP TABLE custom_workouts", [])?;
    drop(other);

    let err = repo.reload().unwrap_err();
    assert!(matches!(err, DbError::StorageUnavailable(_)));
    assert!(err.is_storage_unavailable());
    assert!(repo.is_empty());
    assert!(repo.list().is_empty());
    Ok(())
}

#[test]
fn test_my_workouts_excludes_builtins() -> Result<()> {
    let mut service = create_test_service();
    assert!(service.list_workouts(Category::MyWorkouts).is_empty());

    service
        .repository
        .create(draft("Mine", MuscleGroup::Legs, &["back-squat"]))?;
    let mine = service.list_workouts(Category::MyWorkouts);
    assert_eq!(mine.len(), 1);
    assert!(mine.iter().all(|w| w.is_custom));
    Ok(())
}

#[test]
fn test_all_is_builtin_then_custom() -> Result<()> {
    let mut service = create_test_service();
    let a = service
        .repository
        .create(draft("A", MuscleGroup::Chest, &["push-up"]))?;
    let b = service
        .repository
        .create(draft("B", MuscleGroup::Back, &["pull-up"]))?;

    let builtin = catalog::list_workouts();
    let all = service.list_workouts(Category::All);
    assert_eq!(all.len(), builtin.len() + 2);
    assert_eq!(&all[..builtin.len()], builtin.as_slice());
    assert_eq!(all[builtin.len()].id, a.id);
    assert_eq!(all[builtin.len() + 1].id, b.id);
    Ok(())
}

#[test]
fn test_push_day_scenario() -> Result<()> {
    let mut service = create_test_service();
    service.config.validate_exercise_ids = false; // e1..e3 are placeholder ids

    let mut composer = WorkoutComposer::new();
    composer.set_name("Push Day");
    composer.set_muscle_group(MuscleGroup::Push);
    composer.set_difficulty(Difficulty::Intermediate);
    for id in ["e1", "e2", "e3"] {
        composer.toggle_exercise(id);
    }
    let saved = service.save_composed(&composer)?;

    assert_eq!(saved.estimated_duration, 24);
    assert_eq!(saved.estimated_calories, 150);
    assert_eq!(saved.exercise_ids, ["e1", "e2", "e3"]);

    let push = service.list_workouts(Category::MuscleGroup(MuscleGroup::Push));
    assert!(push.iter().any(|w| w.id == saved.id));
    assert!(push.iter().all(|w| w.muscle_group == MuscleGroup::Push));
    assert_eq!(push.last().map(|w| w.id.as_str()), Some(saved.id.as_str()));

    let pull = service.list_workouts(Category::MuscleGroup(MuscleGroup::Pull));
    assert!(pull.iter().all(|w| w.id != saved.id));
    Ok(())
}

#[test]
fn test_catalog_validation_blocks_unknown_exercises() {
    let mut service = create_test_service();
    let mut composer = WorkoutComposer::new();
    composer.set_name("Typo");
    composer.toggle_exercise("bench-pres");

    let result = service.save_composed(&composer);
    assert!(matches!(
        result,
        Err(SubmitError::Validation(ValidationError::UnknownExercises(_)))
    ));
    assert!(service.list_custom_workouts().is_empty());
}

#[test]
fn test_empty_selection_never_reaches_store() {
    let mut service = create_test_service();
    let mut composer = WorkoutComposer::new();
    composer.set_name("Nothing");
    assert!(!composer.can_submit());

    let result = service.save_composed(&composer);
    assert!(matches!(
        result,
        Err(SubmitError::Validation(ValidationError::NoExercisesSelected))
    ));
    assert!(service.list_custom_workouts().is_empty());
}

#[test]
fn test_edit_session_updates_in_place() -> Result<()> {
    let mut service = create_test_service();
    let created = service
        .repository
        .create(draft("Arms", MuscleGroup::Arms, &["barbell-curl"]))?;

    let mut composer = service.edit_custom_workout(&created.id)?;
    composer.toggle_exercise("tricep-pushdown");
    composer.set_difficulty(Difficulty::Advanced);
    let updated = service.save_composed(&composer)?;

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.estimated_duration, 2 * MINUTES_PER_EXERCISE);
    assert_eq!(updated.estimated_calories, 2 * CALORIES_PER_EXERCISE);
    assert_eq!(service.list_custom_workouts().len(), 1);

    let view = service.find_workout(&created.id).expect("custom workout visible");
    assert!(view.is_custom);
    assert_eq!(view.duration, "16 min");
    assert_eq!(view.difficulty, Difficulty::Advanced);
    Ok(())
}
