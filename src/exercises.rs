//! Exercise definitions - barbell lift catalog

use serde::{Deserialize, Serialize};

use crate::units::Unit;

/// Body half a lift loads, which sets how fast it can progress
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Category {
    Upper,
    Lower,
}

impl Category {
    /// Standard session-to-session jump
    pub fn increment(&self, unit: Unit) -> f64 {
        match (self, unit) {
            (Category::Upper, Unit::Lb) => 5.0,
            (Category::Lower, Unit::Lb) => 10.0,
            (Category::Upper, Unit::Kg) => 2.5,
            (Category::Lower, Unit::Kg) => 5.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Category::Upper => "upper",
            Category::Lower => "lower",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Exercise {
    pub id: &'static str,
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub category: Category,
    pub is_main: bool, // true = competition/primary barbell lift
}

pub const EXERCISES: &[Exercise] = &[
    Exercise {
        id: "squat",
        name: "squat",
        aliases: &["back squat", "sq"],
        category: Category::Lower,
        is_main: true,
    },
    Exercise {
        id: "bench",
        name: "bench press",
        aliases: &["bench", "bp"],
        category: Category::Upper,
        is_main: true,
    },
    Exercise {
        id: "deadlift",
        name: "deadlift",
        aliases: &["dl", "conventional deadlift"],
        category: Category::Lower,
        is_main: true,
    },
    Exercise {
        id: "ohp",
        name: "overhead press",
        aliases: &["ohp", "press", "military press"],
        category: Category::Upper,
        is_main: true,
    },
    Exercise {
        id: "row",
        name: "barbell row",
        aliases: &["row", "bent over row", "pendlay row"],
        category: Category::Upper,
        is_main: false,
    },
    Exercise {
        id: "clean",
        name: "power clean",
        aliases: &["clean"],
        category: Category::Lower,
        is_main: false,
    },
    Exercise {
        id: "front_squat",
        name: "front squat",
        aliases: &["fsq"],
        category: Category::Lower,
        is_main: false,
    },
    Exercise {
        id: "incline",
        name: "incline bench press",
        aliases: &["incline bench", "incline"],
        category: Category::Upper,
        is_main: false,
    },
    Exercise {
        id: "rdl",
        name: "romanian deadlift",
        aliases: &["rdl"],
        category: Category::Lower,
        is_main: false,
    },
    Exercise {
        id: "pulldown",
        name: "lat pulldown",
        aliases: &["pulldown"],
        category: Category::Upper,
        is_main: false,
    },
    Exercise {
        id: "db_row",
        name: "dumbbell row",
        aliases: &["db row"],
        category: Category::Upper,
        is_main: false,
    },
];

pub fn main_lifts() -> Vec<&'static Exercise> {
    EXERCISES.iter().filter(|e| e.is_main).collect()
}

pub fn find_exercise(id: &str) -> Option<&'static Exercise> {
    EXERCISES.iter().find(|e| e.id == id)
}

/// Find exercise by name or alias
pub fn find_exercise_by_name(name: &str) -> Option<&'static Exercise> {
    let needle = name.trim().to_lowercase();
    EXERCISES
        .iter()
        .find(|e| e.name == needle || e.aliases.iter().any(|a| *a == needle))
}

/// Name a lift is stored and looked up under: the catalog name for known
/// lifts and aliases, otherwise the trimmed lowercase input
pub fn canonical_name(name: &str) -> String {
    find_exercise_by_name(name)
        .map(|e| e.name.to_string())
        .unwrap_or_else(|| name.trim().to_lowercase())
}

/// Category for any lift name; unknown lifts progress like upper body lifts
pub fn category_of(name: &str) -> Category {
    find_exercise_by_name(name)
        .map(|e| e.category)
        .unwrap_or(Category::Upper)
}
