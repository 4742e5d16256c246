//src/main.rs
mod cli; // Keep cli module for parsing args

use anyhow::{bail, Context, Result};
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, ContentArrangement, Table};
use std::io::{self, stdout};
use tracing_subscriber::EnvFilter;

use workout_studio_lib::{
    catalog, AppService, Category, ExerciseRecord, SubmitError, WorkoutComposer, WorkoutRecord,
};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    // --- Check for completion generation request FIRST ---
    let cli_args = cli::parse_args(); // Parse arguments once

    if let cli::Commands::GenerateCompletion { shell } = cli_args.command {
        let mut cmd = cli::build_cli_command(); // Get the command structure
        let bin_name = cmd.get_name().to_string(); // Get the binary name

        eprintln!("Generating completion script for {shell}...");
        clap_complete::generate(shell, &mut cmd, bin_name, &mut stdout());
        return Ok(());
    }

    // Initialize the application service (loads config, opens the workout store)
    let mut service =
        AppService::initialize().context("Failed to initialize application service")?;
    if !service.storage_available() {
        eprintln!(
            "Warning: custom workout store at {:?} is unavailable; showing built-in workouts only.",
            service.get_db_path()
        );
    }
    let header_color = service.config.theme.header_color();

    match cli_args.command {
        cli::Commands::GenerateCompletion { .. } => {
            unreachable!("Completion generation should have exited already");
        }
        cli::Commands::List {
            category,
            export_csv,
        } => {
            let category = match category {
                Some(label) => label
                    .parse::<Category>()
                    .with_context(|| format!("Unknown category '{label}'"))?,
                None => service.config.default_category(),
            };
            let workouts = service.list_workouts(category);
            if export_csv {
                write_workouts_csv(&workouts)?;
            } else if workouts.is_empty() {
                println!("No workouts found for category '{category}'.");
            } else {
                print_workout_table(&workouts, header_color);
            }
        }
        cli::Commands::Show { id } => {
            let Some(workout) = service.find_workout(id.trim()) else {
                bail!("Workout '{}' not found.", id.trim());
            };
            print_workout_detail(&workout, header_color);
        }
        cli::Commands::Exercises { muscle_group } => {
            let exercises = service.list_exercises(muscle_group.map(Into::into));
            print_exercise_table(&exercises, header_color);
        }
        cli::Commands::Categories => {
            for category in Category::all() {
                println!("{category}");
            }
        }
        cli::Commands::Create {
            name,
            description,
            muscle_group,
            difficulty,
            exercises,
        } => {
            let mut composer = WorkoutComposer::new();
            composer.set_name(name);
            composer.set_description(description);
            composer.set_muscle_group(muscle_group.into());
            composer.set_difficulty(difficulty.into());
            for exercise_id in &exercises {
                composer.toggle_exercise(exercise_id.trim());
            }

            match service.save_composed(&composer) {
                Ok(record) => println!(
                    "Created custom workout '{}' (ID: {}): {} exercise(s), ~{} min, ~{} kcal.",
                    record.name,
                    record.id,
                    record.exercise_ids.len(),
                    record.estimated_duration,
                    record.estimated_calories
                ),
                Err(e) => bail!(describe_submit_error(&e)),
            }
        }
        cli::Commands::Edit {
            id,
            name,
            description,
            muscle_group,
            difficulty,
            toggle_exercises,
        } => {
            let mut composer = service
                .edit_custom_workout(id.trim())
                .with_context(|| format!("Cannot edit workout '{}'", id.trim()))?;
            if let Some(name) = name {
                composer.set_name(name);
            }
            if let Some(description) = description {
                composer.set_description(description);
            }
            if let Some(group) = muscle_group {
                composer.set_muscle_group(group.into());
            }
            if let Some(difficulty) = difficulty {
                composer.set_difficulty(difficulty.into());
            }
            for exercise_id in &toggle_exercises {
                composer.toggle_exercise(exercise_id.trim());
            }

            match service.save_composed(&composer) {
                Ok(record) => println!(
                    "Updated custom workout '{}' (ID: {}): {} exercise(s), ~{} min, ~{} kcal.",
                    record.name,
                    record.id,
                    record.exercise_ids.len(),
                    record.estimated_duration,
                    record.estimated_calories
                ),
                Err(e) => bail!(describe_submit_error(&e)),
            }
        }
        cli::Commands::Delete { id } => {
            if service.delete_custom_workout(&id)? {
                println!("Deleted custom workout '{}'.", id.trim());
            } else {
                println!("No custom workout with ID '{}'; nothing to delete.", id.trim());
            }
        }
        cli::Commands::SetDefaultCategory { category } => {
            let category = service.set_default_category(&category)?;
            println!("Default category set to '{category}'.");
        }
        cli::Commands::SetHeaderColor { color } => {
            let color = service.set_header_color(&color)?;
            println!("Header color set to {color:?}.");
        }
        cli::Commands::SetValidateExercises { enabled } => {
            service.set_validate_exercise_ids(enabled)?;
            println!(
                "Exercise id validation {}.",
                if enabled { "enabled" } else { "disabled" }
            );
        }
        cli::Commands::DbPath => {
            println!("Database file is located at: {:?}", service.get_db_path());
        }
        cli::Commands::ConfigPath => {
            println!("Config file is located at: {:?}", service.get_config_path());
        }
    }

    Ok(())
}

fn describe_submit_error(error: &SubmitError) -> String {
    match error {
        SubmitError::Validation(reason) => format!("Workout not saved: {reason}"),
        SubmitError::Storage(e) if e.is_storage_unavailable() => {
            format!("Workout not saved, storage is unavailable: {e}. Please retry.")
        }
        SubmitError::Storage(e) => format!("Workout not saved: {e}"),
    }
}

fn header_cells(headers: &[&str], color: Color) -> Vec<Cell> {
    headers
        .iter()
        .map(|h| Cell::new(h).fg(color).add_attribute(Attribute::Bold))
        .collect()
}

fn print_workout_table(workouts: &[WorkoutRecord], header_color: Color) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header_cells(
            &[
                "ID", "Name", "Muscle Group", "Difficulty", "Duration", "Calories", "Exercises", "Source",
            ],
            header_color,
        ));

    for w in workouts {
        table.add_row(vec![
            Cell::new(&w.id),
            Cell::new(&w.name),
            Cell::new(w.muscle_group),
            Cell::new(w.difficulty),
            Cell::new(&w.duration),
            Cell::new(w.calories),
            Cell::new(w.exercise_ids.len()),
            Cell::new(if w.is_custom { "custom" } else { "built-in" }),
        ]);
    }
    println!("{table}");
}

fn print_workout_detail(workout: &WorkoutRecord, header_color: Color) {
    println!("{} [{}]", workout.name, workout.id);
    if !workout.description.is_empty() {
        println!("{}", workout.description);
    }
    println!(
        "{} | {} | {} | ~{} kcal",
        workout.muscle_group, workout.difficulty, workout.duration, workout.calories
    );

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header_cells(&["#", "Exercise", "Sets", "Reps"], header_color));
    for (position, exercise_id) in workout.exercise_ids.iter().enumerate() {
        let row = match catalog::find_exercise(exercise_id) {
            Some(e) => vec![
                Cell::new(position + 1),
                Cell::new(e.name),
                Cell::new(e.sets),
                Cell::new(e.reps),
            ],
            None => vec![
                Cell::new(position + 1),
                Cell::new(format!("{exercise_id} (unknown)")).fg(Color::DarkGrey),
                Cell::new("-"),
                Cell::new("-"),
            ],
        };
        table.add_row(row);
    }
    println!("{table}");
}

fn print_exercise_table(exercises: &[ExerciseRecord], header_color: Color) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header_cells(
            &["ID", "Name", "Muscle Group", "Sets", "Reps"],
            header_color,
        ));
    for e in exercises {
        table.add_row(vec![
            Cell::new(e.id),
            Cell::new(e.name),
            Cell::new(e.muscle_group),
            Cell::new(e.sets),
            Cell::new(e.reps),
        ]);
    }
    println!("{table}");
}

#[derive(serde::Serialize)]
struct WorkoutCsvRow<'a> {
    id: &'a str,
    name: &'a str,
    muscle_group: String,
    difficulty: String,
    duration: &'a str,
    calories: i64,
    exercise_ids: String,
    source: &'static str,
}

fn write_workouts_csv(workouts: &[WorkoutRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(io::stdout());
    for w in workouts {
        writer.serialize(WorkoutCsvRow {
            id: &w.id,
            name: &w.name,
            muscle_group: w.muscle_group.to_string(),
            difficulty: w.difficulty.to_string(),
            duration: &w.duration,
            calories: w.calories,
            exercise_ids: w.exercise_ids.join(";"),
            source: if w.is_custom { "custom" } else { "built-in" },
        })?;
    }
    writer.flush()?;
    Ok(())
}
