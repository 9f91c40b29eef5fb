//! Personal record detection

use serde::{Deserialize, Serialize};

use crate::analysis::estimate::Formula;
use crate::session::Session;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RecordKind {
    HeaviestWeight,
    BestE1rm,
}

impl RecordKind {
    pub fn label(&self) -> &'static str {
        match self {
            RecordKind::HeaviestWeight => "Heaviest set",
            RecordKind::BestE1rm => "Best estimated 1RM",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalRecord {
    pub kind: RecordKind,
    pub exercise: String,
    pub value: f64,
    /// Best prior value, `None` on the first recorded session
    pub previous: Option<f64>,
}

/// Records set by `session` against earlier sessions of the same exercise
pub fn detect_records(session: &Session, history: &[Session], formula: Formula) -> Vec<PersonalRecord> {
    let prior: Vec<&Session> = history
        .iter()
        .filter(|s| s.exercise.eq_ignore_ascii_case(&session.exercise) && s.date < session.date)
        .collect();

    let mut records = Vec::new();

    if let Some(top) = session.top_set() {
        let previous = prior
            .iter()
            .filter_map(|s| s.top_set().map(|t| t.weight))
            .max_by(f64::total_cmp);
        if previous.is_none_or(|p| top.weight > p) {
            records.push(PersonalRecord {
                kind: RecordKind::HeaviestWeight,
                exercise: session.exercise.clone(),
                value: top.weight,
                previous,
            });
        }
    }

    if let Some(best) = session.best_e1rm(formula) {
        let previous = prior
            .iter()
            .filter_map(|s| s.best_e1rm(formula))
            .max_by(f64::total_cmp);
        if previous.is_none_or(|p| best > p) {
            records.push(PersonalRecord {
                kind: RecordKind::BestE1rm,
                exercise: session.exercise.clone(),
                value: best,
                previous,
            });
        }
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SetResult;
    use chrono::Utc;

    fn session(weight: f64, reps: u32, days_ago: i64) -> Session {
        Session::new(
            Utc::now() - chrono::Duration::days(days_ago),
            "squat",
            vec![SetResult::new(weight, reps)],
        )
    }

    #[test]
    fn test_first_session_sets_records() {
        let today = session(225.0, 5, 0);
        let records = detect_records(&today, &[], Formula::Epley);
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.previous.is_none()));
    }

    #[test]
    fn test_heavier_weight_is_record() {
        let history = vec![session(225.0, 5, 7), session(230.0, 3, 3)];
        let today = session(235.0, 1, 0);
        let records = detect_records(&today, &history, Formula::Epley);

        let heaviest = records.iter().find(|r| r.kind == RecordKind::HeaviestWeight).unwrap();
        assert_eq!(heaviest.value, 235.0);
        assert_eq!(heaviest.previous, Some(230.0));
        // 235 x 1 does not beat 225 x 5 (262.5) on e1RM
        assert!(records.iter().all(|r| r.kind != RecordKind::BestE1rm));
    }

    #[test]
    fn test_rep_record_is_e1rm_only() {
        let history = vec![session(225.0, 5, 7)];
        let today = session(225.0, 8, 0);
        let records = detect_records(&today, &history, Formula::Epley);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind, RecordKind::BestE1rm);
    }

    #[test]
    fn test_equal_is_not_record() {
        let history = vec![session(225.0, 5, 7)];
        let today = session(225.0, 5, 0);
        assert!(detect_records(&today, &history, Formula::Epley).is_empty());
    }

    #[test]
    fn test_ignores_other_exercises_and_later_sessions() {
        let mut bench = session(400.0, 5, 7);
        bench.exercise = "bench press".to_string();
        let later = session(500.0, 5, 0);
        let today = session(225.0, 5, 2);
        let records = detect_records(&today, &[bench, later], Formula::Epley);
        assert_eq!(records.len(), 2);
    }
}
