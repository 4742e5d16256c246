// src/cli.rs
use clap::{Command, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use workout_studio_lib::{Difficulty, MuscleGroup};

#[derive(Parser, Debug)]
#[command(author, version, about = "Browse built-in workouts and manage your own", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum MuscleGroupCli {
    Chest,
    Back,
    Shoulders,
    Arms,
    Legs,
    Core,
    Push,
    Pull,
    FullBody,
}

impl From<MuscleGroupCli> for MuscleGroup {
    fn from(value: MuscleGroupCli) -> Self {
        match value {
            MuscleGroupCli::Chest => Self::Chest,
            MuscleGroupCli::Back => Self::Back,
            MuscleGroupCli::Shoulders => Self::Shoulders,
            MuscleGroupCli::Arms => Self::Arms,
            MuscleGroupCli::Legs => Self::Legs,
            MuscleGroupCli::Core => Self::Core,
            MuscleGroupCli::Push => Self::Push,
            MuscleGroupCli::Pull => Self::Pull,
            MuscleGroupCli::FullBody => Self::FullBody,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DifficultyCli {
    Beginner,
    Intermediate,
    Advanced,
}

impl From<DifficultyCli> for Difficulty {
    fn from(value: DifficultyCli) -> Self {
        match value {
            DifficultyCli::Beginner => Self::Beginner,
            DifficultyCli::Intermediate => Self::Intermediate,
            DifficultyCli::Advanced => Self::Advanced,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List built-in and custom workouts
    List {
        /// "All", "My Workouts" or a muscle group (defaults to the configured category)
        #[arg(short, long)]
        category: Option<String>,
        /// Write the list as CSV to stdout instead of a table
        #[arg(long)]
        export_csv: bool,
    },
    /// Show one workout and its exercises
    Show {
        /// Built-in or custom workout identifier
        id: String,
    },
    /// List the built-in exercises that can be added to a custom workout
    Exercises {
        #[arg(short, long, value_enum)]
        muscle_group: Option<MuscleGroupCli>,
    },
    /// List the available category filters
    Categories,
    /// Create a custom workout
    Create {
        #[arg(short, long)]
        name: String,
        #[arg(short, long, default_value = "")]
        description: String,
        #[arg(short, long, value_enum)]
        muscle_group: MuscleGroupCli,
        #[arg(long, value_enum, default_value = "beginner")]
        difficulty: DifficultyCli,
        /// Exercise id to include; repeat in the order you want them (toggling semantics: repeating an id removes it)
        #[arg(short, long = "exercise", value_name = "EXERCISE_ID", required = true)]
        exercises: Vec<String>,
    },
    /// Edit a custom workout
    Edit {
        id: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short, long, value_enum)]
        muscle_group: Option<MuscleGroupCli>,
        #[arg(long, value_enum)]
        difficulty: Option<DifficultyCli>,
        /// Add the exercise if absent, remove it if present (repeatable)
        #[arg(short, long = "toggle-exercise", value_name = "EXERCISE_ID")]
        toggle_exercises: Vec<String>,
    },
    /// Delete a custom workout (no error if it does not exist)
    Delete { id: String },
    /// Set the category `list` uses by default
    SetDefaultCategory { category: String },
    /// Set the table header color (e.g. Green, DarkCyan)
    SetHeaderColor { color: String },
    /// Enable or disable checking exercise ids against the catalog
    SetValidateExercises {
        #[arg(action = clap::ArgAction::Set)]
        enabled: bool,
    },
    /// Show the path to the database file
    DbPath,
    /// Show the path to the config file
    ConfigPath,
    /// Generate shell completion script
    GenerateCompletion {
        #[arg(value_enum)]
        shell: Shell,
    },
}

// Function to parse CLI arguments
pub fn parse_args() -> Cli {
    Cli::parse()
}

pub fn build_cli_command() -> Command {
    Cli::command()
}
