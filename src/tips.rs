//! Tips module - short barbell coaching cues

use rand::seq::SliceRandom;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TipCategory {
    Technique,   // Bar path, bracing, positions
    Programming, // Loading, progression, deloads
    Recovery,    // Sleep, food, rest
    Mindset,     // Consistency and patience
}

impl TipCategory {
    pub fn emoji(&self) -> &'static str {
        match self {
            TipCategory::Technique => "📐",
            TipCategory::Programming => "📈",
            TipCategory::Recovery => "😴",
            TipCategory::Mindset => "💪",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TipCategory::Technique => "Technique",
            TipCategory::Programming => "Programming",
            TipCategory::Recovery => "Recovery",
            TipCategory::Mindset => "Mindset",
        }
    }

    pub fn all() -> &'static [TipCategory] {
        &[
            TipCategory::Technique,
            TipCategory::Programming,
            TipCategory::Recovery,
            TipCategory::Mindset,
        ]
    }
}

pub struct Tip {
    pub category: TipCategory,
    pub text: &'static str,
}

pub const TIPS: &[Tip] = &[
    // === TECHNIQUE ===
    Tip {
        category: TipCategory::Technique,
        text: "Brace before you unrack: big breath into the belly, then hold it through the hard part of the rep.",
    },
    Tip {
        category: TipCategory::Technique,
        text: "On the squat, push the knees out over the toes and keep the bar over mid-foot.",
    },
    Tip {
        category: TipCategory::Technique,
        text: "Pull the slack out of the bar before the deadlift leaves the floor.",
    },
    Tip {
        category: TipCategory::Technique,
        text: "Bench with your shoulder blades pinned and your feet driving into the floor.",
    },
    Tip {
        category: TipCategory::Technique,
        text: "On the press, get your head out of the way and finish with the bar over your ears.",
    },
    // === PROGRAMMING ===
    Tip {
        category: TipCategory::Programming,
        text: "Small jumps last longer than big ones. Microplates turn a stall into another month of progress.",
    },
    Tip {
        category: TipCategory::Programming,
        text: "An AMRAP set is a test, not a max attempt. Stop when the bar speed dies or form breaks.",
    },
    Tip {
        category: TipCategory::Programming,
        text: "Set the training max a little light. Starting too heavy is the most common reason a cycle stalls.",
    },
    Tip {
        category: TipCategory::Programming,
        text: "A planned deload costs one week. An injury from grinding through fatigue costs far more.",
    },
    Tip {
        category: TipCategory::Programming,
        text: "Log every set, including the misses. The history is what the next target is built on.",
    },
    // === RECOVERY ===
    Tip {
        category: TipCategory::Recovery,
        text: "Seven or more hours of sleep does more for your next session than any supplement.",
    },
    Tip {
        category: TipCategory::Recovery,
        text: "Eat enough protein across the day; progress on a linear program needs a surplus.",
    },
    Tip {
        category: TipCategory::Recovery,
        text: "Rest three to five minutes between heavy sets. Short rests make the last set a cardio test.",
    },
    Tip {
        category: TipCategory::Recovery,
        text: "If warm-ups feel unusually heavy, keep the plan's weight but stop at the minimum reps.",
    },
    // === MINDSET ===
    Tip {
        category: TipCategory::Mindset,
        text: "Consistency beats intensity. The lifter who shows up three times a week for a year wins.",
    },
    Tip {
        category: TipCategory::Mindset,
        text: "A missed rep is information, not failure. The plan already knows what to do next.",
    },
    Tip {
        category: TipCategory::Mindset,
        text: "Compare yourself to last month's log, not to someone else's highlight reel.",
    },
];

pub fn get_random_tip() -> &'static Tip {
    TIPS.choose(&mut rand::thread_rng()).unwrap_or(&TIPS[0])
}

pub fn get_random_tip_by_category(category: TipCategory) -> Option<&'static Tip> {
    let filtered: Vec<_> = TIPS.iter().filter(|t| t.category == category).collect();
    filtered.choose(&mut rand::thread_rng()).copied()
}

pub fn format_tip(tip: &Tip) -> String {
    format!("{} {}\n\n{}", tip.category.emoji(), tip.category.name(), tip.text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tip_category_name_all_categories() {
        assert_eq!(TipCategory::Technique.name(), "Technique");
        assert_eq!(TipCategory::Programming.name(), "Programming");
        assert_eq!(TipCategory::Recovery.name(), "Recovery");
        assert_eq!(TipCategory::Mindset.name(), "Mindset");
    }

    #[test]
    fn test_get_random_tip_never_panics() {
        for _ in 0..100 {
            let tip = get_random_tip();
            assert!(!tip.text.is_empty());
        }
    }

    #[test]
    fn test_get_random_tip_by_category_returns_correct_category() {
        for category in TipCategory::all() {
            let tip = get_random_tip_by_category(*category);
            assert!(tip.is_some(), "Category {:?} should have tips", category);
            assert_eq!(tip.unwrap().category, *category);
        }
    }

    #[test]
    fn test_format_tip_contains_parts() {
        let tip = &TIPS[0];
        let formatted = format_tip(tip);
        assert!(formatted.contains(tip.category.emoji()));
        assert!(formatted.contains(tip.category.name()));
        assert!(formatted.contains(tip.text));
    }

    #[test]
    fn test_tips_distribution_by_category() {
        let mut counts = std::collections::HashMap::new();
        for tip in TIPS.iter() {
            *counts.entry(tip.category).or_insert(0) += 1;
        }
        for category in TipCategory::all() {
            assert!(
                counts.get(category).copied().unwrap_or(0) >= 3,
                "{:?} should have at least 3 tips",
                category
            );
        }
    }
}
