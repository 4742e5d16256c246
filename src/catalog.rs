//src/catalog.rs
use crate::db::{Difficulty, MuscleGroup};
use serde::Serialize;

/// A workout as displayed and filtered. Built-in workouts and the catalog view
/// of custom workouts share this shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkoutRecord {
    pub id: String,
    pub name: String,
    pub description: String,
    pub muscle_group: MuscleGroup,
    pub difficulty: Difficulty,
    pub duration: String, // Display label, e.g. "45 min"
    pub calories: i64,
    pub exercise_ids: Vec<String>,
    pub is_custom: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExerciseRecord {
    pub id: &'static str,
    pub name: &'static str,
    pub muscle_group: MuscleGroup,
    pub sets: u32,
    pub reps: &'static str, // Ranges and holds, e.g. "8-12" or "60s"
}

struct BuiltinWorkout {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    muscle_group: MuscleGroup,
    difficulty: Difficulty,
    duration: &'static str,
    calories: i64,
    exercise_ids: &'static [&'static str],
}

impl BuiltinWorkout {
    fn to_record(&self) -> WorkoutRecord {
        WorkoutRecord {
            id: self.id.to_string(),
            name: self.name.to_string(),
            description: self.description.to_string(),
            muscle_group: self.muscle_group,
            difficulty: self.difficulty,
            duration: self.duration.to_string(),
            calories: self.calories,
            exercise_ids: self.exercise_ids.iter().map(ToString::to_string).collect(),
            is_custom: false,
        }
    }
}

const fn exercise(
    id: &'static str,
    name: &'static str,
    muscle_group: MuscleGroup,
    sets: u32,
    reps: &'static str,
) -> ExerciseRecord {
    ExerciseRecord {
        id,
        name,
        muscle_group,
        sets,
        reps,
    }
}

const EXERCISES: &[ExerciseRecord] = &[
    exercise("bench-press", "Barbell Bench Press", MuscleGroup::Chest, 4, "6-10"),
    exercise("incline-db-press", "Incline Dumbbell Press", MuscleGroup::Chest, 3, "8-12"),
    exercise("push-up", "Push-Up", MuscleGroup::Chest, 3, "12-20"),
    exercise("cable-fly", "Cable Fly", MuscleGroup::Chest, 3, "12-15"),
    exercise("pull-up", "Pull-Up", MuscleGroup::Back, 4, "6-10"),
    exercise("barbell-row", "Barbell Row", MuscleGroup::Back, 4, "8-10"),
    exercise("lat-pulldown", "Lat Pulldown", MuscleGroup::Back, 3, "10-12"),
    exercise("deadlift", "Deadlift", MuscleGroup::Back, 3, "5"),
    exercise("overhead-press", "Overhead Press", MuscleGroup::Shoulders, 4, "6-10"),
    exercise("lateral-raise", "Lateral Raise", MuscleGroup::Shoulders, 3, "12-15"),
    exercise("face-pull", "Face Pull", MuscleGroup::Shoulders, 3, "15"),
    exercise("barbell-curl", "Barbell Curl", MuscleGroup::Arms, 3, "8-12"),
    exercise("hammer-curl", "Hammer Curl", MuscleGroup::Arms, 3, "10-12"),
    exercise("tricep-pushdown", "Tricep Pushdown", MuscleGroup::Arms, 3, "10-15"),
    exercise("dips", "Dips", MuscleGroup::Arms, 3, "8-12"),
    exercise("back-squat", "Back Squat", MuscleGroup::Legs, 4, "5-8"),
    exercise("romanian-deadlift", "Romanian Deadlift", MuscleGroup::Legs, 3, "8-10"),
    exercise("walking-lunge", "Walking Lunge", MuscleGroup::Legs, 3, "12"),
    exercise("leg-press", "Leg Press", MuscleGroup::Legs, 3, "10-12"),
    exercise("calf-raise", "Standing Calf Raise", MuscleGroup::Legs, 4, "12-15"),
    exercise("plank", "Plank", MuscleGroup::Core, 3, "60s"),
    exercise("hanging-leg-raise", "Hanging Leg Raise", MuscleGroup::Core, 3, "10-15"),
    exercise("russian-twist", "Russian Twist", MuscleGroup::Core, 3, "20"),
    exercise("burpee", "Burpee", MuscleGroup::FullBody, 3, "15"),
    exercise("kettlebell-swing", "Kettlebell Swing", MuscleGroup::FullBody, 4, "20"),
];

const WORKOUTS: &[BuiltinWorkout] = &[
    BuiltinWorkout {
        id: "chest-builder",
        name: "Chest Builder",
        description: "Pressing volume with a fly finisher.",
        muscle_group: MuscleGroup::Chest,
        difficulty: Difficulty::Intermediate,
        duration: "45 min",
        calories: 320,
        exercise_ids: &["bench-press", "incline-db-press", "cable-fly", "push-up"],
    },
    BuiltinWorkout {
        id: "back-attack",
        name: "Back Attack",
        description: "Vertical and horizontal pulls for a wider back.",
        muscle_group: MuscleGroup::Back,
        difficulty: Difficulty::Intermediate,
        duration: "50 min",
        calories: 380,
        exercise_ids: &["pull-up", "barbell-row", "lat-pulldown", "face-pull"],
    },
    BuiltinWorkout {
        id: "boulder-shoulders",
        name: "Boulder Shoulders",
        description: "Overhead strength plus delt isolation.",
        muscle_group: MuscleGroup::Shoulders,
        difficulty: Difficulty::Beginner,
        duration: "35 min",
        calories: 240,
        exercise_ids: &["overhead-press", "lateral-raise", "face-pull"],
    },
    BuiltinWorkout {
        id: "arm-pump",
        name: "Arm Pump",
        description: "Biceps and triceps supersets.",
        muscle_group: MuscleGroup::Arms,
        difficulty: Difficulty::Beginner,
        duration: "30 min",
        calories: 200,
        exercise_ids: &["barbell-curl", "tricep-pushdown", "hammer-curl", "dips"],
    },
    BuiltinWorkout {
        id: "leg-day",
        name: "Leg Day",
        description: "Squat-centred lower body session.",
        muscle_group: MuscleGroup::Legs,
        difficulty: Difficulty::Advanced,
        duration: "60 min",
        calories: 520,
        exercise_ids: &[
            "back-squat",
            "romanian-deadlift",
            "walking-lunge",
            "leg-press",
            "calf-raise",
        ],
    },
    BuiltinWorkout {
        id: "core-crusher",
        name: "Core Crusher",
        description: "Anti-extension and rotation work.",
        muscle_group: MuscleGroup::Core,
        difficulty: Difficulty::Beginner,
        duration: "20 min",
        calories: 150,
        exercise_ids: &["plank", "hanging-leg-raise", "russian-twist"],
    },
    BuiltinWorkout {
        id: "push-power",
        name: "Push Power",
        description: "Chest, shoulders and triceps in one session.",
        muscle_group: MuscleGroup::Push,
        difficulty: Difficulty::Intermediate,
        duration: "55 min",
        calories: 400,
        exercise_ids: &[
            "bench-press",
            "overhead-press",
            "incline-db-press",
            "lateral-raise",
            "tricep-pushdown",
        ],
    },
    BuiltinWorkout {
        id: "pull-strength",
        name: "Pull Strength",
        description: "Heavy pulls followed by biceps.",
        muscle_group: MuscleGroup::Pull,
        difficulty: Difficulty::Advanced,
        duration: "55 min",
        calories: 420,
        exercise_ids: &["deadlift", "pull-up", "barbell-row", "barbell-curl"],
    },
    BuiltinWorkout {
        id: "full-body-blast",
        name: "Full Body Blast",
        description: "Conditioning circuit that hits everything.",
        muscle_group: MuscleGroup::FullBody,
        difficulty: Difficulty::Intermediate,
        duration: "40 min",
        calories: 450,
        exercise_ids: &["kettlebell-swing", "burpee", "back-squat", "push-up", "plank"],
    },
];

/// Built-in workouts in catalog order.
#[must_use]
pub fn list_workouts() -> Vec<WorkoutRecord> {
    WORKOUTS.iter().map(BuiltinWorkout::to_record).collect()
}

/// Built-in exercises in catalog order.
#[must_use]
pub fn list_exercises() -> Vec<ExerciseRecord> {
    EXERCISES.to_vec()
}

#[must_use]
pub fn find_exercise(id: &str) -> Option<&'static ExerciseRecord> {
    EXERCISES.iter().find(|e| e.id == id)
}

#[must_use]
pub fn find_workout(id: &str) -> Option<WorkoutRecord> {
    WORKOUTS
        .iter()
        .find(|w| w.id == id)
        .map(BuiltinWorkout::to_record)
}

/// Exercises tagged with the given muscle group, in catalog order.
#[must_use]
pub fn exercises_for(muscle_group: MuscleGroup) -> Vec<ExerciseRecord> {
    EXERCISES
        .iter()
        .filter(|e| e.muscle_group == muscle_group)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn builtin_workouts_reference_known_exercises() {
        for workout in list_workouts() {
            assert!(!workout.is_custom);
            for id in &workout.exercise_ids {
                assert!(
                    find_exercise(id).is_some(),
                    "workout '{}' references unknown exercise '{id}'",
                    workout.id
                );
            }
        }
    }

    #[test]
    fn identifiers_are_unique() {
        let workout_ids: HashSet<_> = list_workouts().into_iter().map(|w| w.id).collect();
        assert_eq!(workout_ids.len(), list_workouts().len());

        let exercise_ids: HashSet<_> = list_exercises().iter().map(|e| e.id).collect();
        assert_eq!(exercise_ids.len(), list_exercises().len());
    }

    #[test]
    fn exercises_for_filters_by_tag() {
        let legs = exercises_for(MuscleGroup::Legs);
        assert!(!legs.is_empty());
        assert!(legs.iter().all(|e| e.muscle_group == MuscleGroup::Legs));
        assert_eq!(find_workout("leg-day").map(|w| w.calories), Some(520));
    }
}
