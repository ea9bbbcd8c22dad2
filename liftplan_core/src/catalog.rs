//! Built-in exercise catalog.
//!
//! Trainers assign exercises by id; the CLI uses the catalog to label
//! output and to decide whether an exercise carries absolute weight
//! targets or progresses by relative percentage only.

use crate::types::*;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Cached default catalog - built once and reused across all operations
static DEFAULT_CATALOG: Lazy<Catalog> = Lazy::new(build_default_catalog_internal);

/// Get a reference to the cached default catalog
pub fn get_default_catalog() -> &'static Catalog {
    &DEFAULT_CATALOG
}

/// Builds the default catalog of built-in exercises
///
/// **Note**: For production use, prefer `get_default_catalog()` which
/// returns a cached reference. This function is retained for testing and
/// custom catalog creation.
pub fn build_default_catalog() -> Catalog {
    build_default_catalog_internal()
}

fn build_default_catalog_internal() -> Catalog {
    let mut exercises = HashMap::new();

    let mut add = |id: &str, name: &str, muscle_group: MuscleGroup, uses_weight: bool| {
        exercises.insert(
            id.to_string(),
            Exercise {
                id: id.to_string(),
                name: name.to_string(),
                muscle_group,
                uses_weight,
            },
        );
    };

    add("back_squat", "Back Squat", MuscleGroup::Legs, true);
    add("front_squat", "Front Squat", MuscleGroup::Legs, true);
    add("deadlift", "Deadlift", MuscleGroup::Back, true);
    add(
        "romanian_deadlift",
        "Romanian Deadlift",
        MuscleGroup::Legs,
        true,
    );
    add("bench_press", "Bench Press", MuscleGroup::Chest, true);
    add("overhead_press", "Overhead Press", MuscleGroup::Shoulders, true);
    add("barbell_row", "Barbell Row", MuscleGroup::Back, true);
    add("bicep_curl", "Bicep Curl", MuscleGroup::Arms, true);
    add("pull_up", "Pull-up", MuscleGroup::Back, false);
    add("push_up", "Push-up", MuscleGroup::Chest, false);
    add("plank", "Plank", MuscleGroup::Core, false);
    add("burpee", "Burpee", MuscleGroup::FullBody, false);

    Catalog { exercises }
}

impl Catalog {
    /// Look up an exercise by id
    pub fn get(&self, id: &str) -> Option<&Exercise> {
        self.exercises.get(id)
    }

    /// Validate the catalog for consistency and completeness
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for (id, exercise) in &self.exercises {
            if id.is_empty() || exercise.id.is_empty() {
                errors.push("Exercise has empty ID".to_string());
            }
            if id != &exercise.id {
                errors.push(format!(
                    "Exercise key '{}' doesn't match exercise.id '{}'",
                    id, exercise.id
                ));
            }
            if exercise.name.is_empty() {
                errors.push(format!("Exercise '{}' has empty name", id));
            }
        }

        // Both progression paths need at least one representative
        let has_weighted = self.exercises.values().any(|e| e.uses_weight);
        let has_bodyweight = self.exercises.values().any(|e| !e.uses_weight);

        if !has_weighted {
            errors.push("Catalog has no weighted exercises".to_string());
        }
        if !has_bodyweight {
            errors.push("Catalog has no bodyweight exercises".to_string());
        }

        errors
    }
}
