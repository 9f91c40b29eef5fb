//! Analysis module - estimates and history aggregation
//!
//! Features:
//! - Estimated one-rep max formulas
//! - Personal record detection
//! - Success/failure streaks
//! - e1RM trend using linear regression (linfa)

pub mod estimate;
pub mod records;
pub mod streak;
pub mod trend;

pub use estimate::{Formula, one_rep_max, one_rep_max_with_rpe, weight_for_reps};
pub use records::{PersonalRecord, RecordKind, detect_records};
pub use streak::Streak;
pub use trend::TrendEstimate;

use crate::exercises::canonical_name;
use crate::session::Session;

/// Training analytics over logged sessions
pub struct Analytics {
    sessions: Vec<Session>,
}

impl Analytics {
    pub fn new(sessions: Vec<Session>) -> Self {
        Self { sessions }
    }

    fn matching<'a>(&'a self, exercise: &'a str) -> impl Iterator<Item = &'a Session> + 'a {
        let needle = canonical_name(exercise);
        self.sessions
            .iter()
            .filter(move |s| s.exercise.to_lowercase().contains(&needle))
    }

    /// Total volume (weight * reps) for an exercise
    pub fn total_volume(&self, exercise: &str) -> f64 {
        self.matching(exercise).map(Session::volume).sum()
    }

    /// Get training frequency (sessions per week)
    pub fn weekly_frequency(&self) -> f64 {
        if self.sessions.len() < 2 {
            return 0.0;
        }

        let first = self.sessions.iter().map(|s| s.local_day()).min();
        let last = self.sessions.iter().map(|s| s.local_day()).max();
        let (Some(first), Some(last)) = (first, last) else {
            return 0.0;
        };
        let days = (last - first).num_days() as f64;

        if days == 0.0 {
            return self.sessions.len() as f64;
        }

        (self.sessions.len() as f64 / days) * 7.0
    }

    pub fn best_e1rm(&self, exercise: &str, formula: Formula) -> Option<f64> {
        self.matching(exercise)
            .filter_map(|s| s.best_e1rm(formula))
            .max_by(f64::total_cmp)
    }
}
