//src/aggregator.rs
use crate::catalog::WorkoutRecord;
use crate::db::{Error as DbError, MuscleGroup};
use std::fmt;
use std::str::FromStr;
use strum::IntoEnumIterator;

pub const ALL_LABEL: &str = "All";
pub const MY_WORKOUTS_LABEL: &str = "My Workouts";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Category {
    #[default]
    All,
    MyWorkouts,
    MuscleGroup(MuscleGroup),
}

impl Category {
    /// Every filter in display order: All, My Workouts, then each muscle group.
    #[must_use]
    pub fn all() -> Vec<Self> {
        [Self::All, Self::MyWorkouts]
            .into_iter()
            .chain(MuscleGroup::iter().map(Self::MuscleGroup))
            .collect()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(ALL_LABEL),
            Self::MyWorkouts => f.write_str(MY_WORKOUTS_LABEL),
            Self::MuscleGroup(group) => write!(f, "{group}"),
        }
    }
}

impl FromStr for Category {
    type Err = DbError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "my workouts" | "my-workouts" | "mine" => Ok(Self::MyWorkouts),
            _ => value
                .parse::<MuscleGroup>()
                .map(Self::MuscleGroup)
                .map_err(|_| DbError::InvalidTag {
                    kind: "category",
                    value: value.to_string(),
                }),
        }
    }
}

/// Produces the displayable list for `category`.
///
/// Order is stable: built-in catalog order first, then `custom_view` order.
/// `MyWorkouts` never includes a built-in workout.
#[must_use]
pub fn aggregate(
    builtin: &[WorkoutRecord],
    custom_view: Vec<WorkoutRecord>,
    category: Category,
) -> Vec<WorkoutRecord> {
    match category {
        Category::MyWorkouts => custom_view,
        Category::All => builtin.iter().cloned().chain(custom_view).collect(),
        Category::MuscleGroup(group) => builtin
            .iter()
            .cloned()
            .chain(custom_view)
            .filter(|w| w.muscle_group == group)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Difficulty;

    fn workout(id: &str, muscle_group: MuscleGroup, is_custom: bool) -> WorkoutRecord {
        WorkoutRecord {
            id: id.to_string(),
            name: id.to_uppercase(),
            description: String::new(),
            muscle_group,
            difficulty: Difficulty::Beginner,
            duration: "30 min".to_string(),
            calories: 100,
            exercise_ids: vec!["plank".to_string()],
            is_custom,
        }
    }

    fn fixtures() -> (Vec<WorkoutRecord>, Vec<WorkoutRecord>) {
        let builtin = vec![
            workout("b1", MuscleGroup::Push, false),
            workout("b2", MuscleGroup::Legs, false),
            workout("b3", MuscleGroup::Push, false),
        ];
        let custom = vec![
            workout("c1", MuscleGroup::Legs, true),
            workout("c2", MuscleGroup::Push, true),
        ];
        (builtin, custom)
    }

    fn ids(workouts: &[WorkoutRecord]) -> Vec<&str> {
        workouts.iter().map(|w| w.id.as_str()).collect()
    }

    #[test]
    fn my_workouts_only_returns_custom_view() {
        let (builtin, custom) = fixtures();
        let result = aggregate(&builtin, custom, Category::MyWorkouts);
        assert_eq!(ids(&result), ["c1", "c2"]);
        assert!(result.iter().all(|w| w.is_custom));
    }

    #[test]
    fn all_concatenates_builtin_then_custom() {
        let (builtin, custom) = fixtures();
        let result = aggregate(&builtin, custom, Category::All);
        assert_eq!(ids(&result), ["b1", "b2", "b3", "c1", "c2"]);
    }

    #[test]
    fn muscle_group_filter_keeps_relative_order() {
        let (builtin, custom) = fixtures();
        let result = aggregate(&builtin, custom, Category::MuscleGroup(MuscleGroup::Push));
        assert_eq!(ids(&result), ["b1", "b3", "c2"]);

        let (builtin, custom) = fixtures();
        let result = aggregate(&builtin, custom, Category::MuscleGroup(MuscleGroup::Core));
        assert!(result.is_empty());
    }

    #[test]
    fn category_parses_labels() {
        assert_eq!("All".parse::<Category>().unwrap(), Category::All);
        assert_eq!("My Workouts".parse::<Category>().unwrap(), Category::MyWorkouts);
        assert_eq!(
            "full body".parse::<Category>().unwrap(),
            Category::MuscleGroup(MuscleGroup::FullBody)
        );
        assert!("Cardio".parse::<Category>().is_err());
        assert_eq!(Category::MyWorkouts.to_string(), "My Workouts");
    }

    #[test]
    fn category_list_starts_with_all_and_mine() {
        let categories = Category::all();
        assert_eq!(categories[0], Category::All);
        assert_eq!(categories[1], Category::MyWorkouts);
        assert_eq!(categories.len(), 2 + MuscleGroup::iter().count());
    }
}
