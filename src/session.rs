//! Performed sets grouped into training sessions

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::estimate::{Formula, one_rep_max};
use crate::db::LoggedSet;

/// Weights closer than this are treated as equal
const WEIGHT_EPSILON: f64 = 1e-6;

/// A single performed set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetResult {
    pub weight: f64,
    pub reps: u32,
    pub target_reps: Option<u32>,
    pub rpe: Option<f64>,
}

impl SetResult {
    pub fn new(weight: f64, reps: u32) -> Self {
        Self { weight, reps, target_reps: None, rpe: None }
    }

    pub fn with_target(mut self, target_reps: u32) -> Self {
        self.target_reps = Some(target_reps);
        self
    }

    pub fn with_rpe(mut self, rpe: f64) -> Self {
        self.rpe = Some(rpe);
        self
    }

    /// No target counts as hit
    pub fn hit_target(&self) -> bool {
        self.target_reps.is_none_or(|target| self.reps >= target)
    }

    pub fn volume(&self) -> f64 {
        self.weight * self.reps as f64
    }
}

impl From<&LoggedSet> for SetResult {
    fn from(set: &LoggedSet) -> Self {
        Self {
            weight: set.weight,
            reps: set.reps,
            target_reps: set.target_reps,
            rpe: set.rpe,
        }
    }
}

/// All sets of one exercise on one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub date: DateTime<Utc>,
    pub exercise: String,
    pub sets: Vec<SetResult>,
}

impl Session {
    pub fn new(date: DateTime<Utc>, exercise: &str, sets: Vec<SetResult>) -> Self {
        Self { date, exercise: exercise.to_string(), sets }
    }

    /// Heaviest set; more reps wins a tie
    pub fn top_set(&self) -> Option<&SetResult> {
        self.sets.iter().max_by(|a, b| {
            a.weight
                .total_cmp(&b.weight)
                .then_with(|| a.reps.cmp(&b.reps))
        })
    }

    pub fn best_e1rm(&self, formula: Formula) -> Option<f64> {
        self.sets
            .iter()
            .filter_map(|s| one_rep_max(s.weight, s.reps, formula))
            .max_by(f64::total_cmp)
    }

    /// Every set reached its target
    pub fn completed(&self) -> bool {
        !self.sets.is_empty() && self.sets.iter().all(SetResult::hit_target)
    }

    pub fn missed_reps(&self) -> u32 {
        self.sets
            .iter()
            .filter_map(|s| s.target_reps.map(|t| t.saturating_sub(s.reps)))
            .sum()
    }

    /// At least `sets` sets of `reps` or more at `weight` or heavier
    pub fn met(&self, weight: f64, sets: u32, reps: u32) -> bool {
        let qualifying = self
            .sets
            .iter()
            .filter(|s| s.weight + WEIGHT_EPSILON >= weight && s.reps >= reps)
            .count();
        qualifying >= sets as usize
    }

    pub fn average_rpe(&self) -> Option<f64> {
        let rated: Vec<f64> = self.sets.iter().filter_map(|s| s.rpe).collect();
        if rated.is_empty() {
            None
        } else {
            Some(rated.iter().sum::<f64>() / rated.len() as f64)
        }
    }

    pub fn volume(&self) -> f64 {
        self.sets.iter().map(SetResult::volume).sum()
    }

    pub fn local_day(&self) -> NaiveDate {
        self.date.with_timezone(&Local).date_naive()
    }
}

/// Group logged sets by exercise and local day, oldest session first
pub fn group_sessions(logged: &[LoggedSet]) -> Vec<Session> {
    let mut ordered: Vec<&LoggedSet> = logged.iter().collect();
    // Stable sort keeps logged order inside a day
    ordered.sort_by_key(|s| s.date);

    let mut sessions: Vec<Session> = Vec::new();
    for set in ordered {
        let day = set.date.with_timezone(&Local).date_naive();
        let exercise = set.exercise.trim().to_lowercase();

        let existing = sessions
            .iter_mut()
            .find(|s| s.exercise == exercise && s.local_day() == day);

        match existing {
            Some(session) => session.sets.push(SetResult::from(set)),
            None => sessions.push(Session {
                date: set.date,
                exercise,
                sets: vec![SetResult::from(set)],
            }),
        }
    }

    sessions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logged(exercise: &str, weight: f64, reps: u32, days_ago: i64) -> LoggedSet {
        LoggedSet {
            id: None,
            date: Utc::now() - chrono::Duration::days(days_ago),
            exercise: exercise.to_string(),
            weight,
            reps,
            target_reps: Some(5),
            rpe: None,
            notes: None,
        }
    }

    fn session(sets: Vec<SetResult>) -> Session {
        Session::new(Utc::now(), "squat", sets)
    }

    #[test]
    fn test_top_set_prefers_weight_then_reps() {
        let s = session(vec![
            SetResult::new(225.0, 5),
            SetResult::new(245.0, 3),
            SetResult::new(245.0, 4),
            SetResult::new(185.0, 10),
        ]);
        let top = s.top_set().unwrap();
        assert_eq!(top.weight, 245.0);
        assert_eq!(top.reps, 4);
    }

    #[test]
    fn test_completed_and_missed_reps() {
        let done = session(vec![
            SetResult::new(225.0, 5).with_target(5),
            SetResult::new(225.0, 6).with_target(5),
        ]);
        assert!(done.completed());
        assert_eq!(done.missed_reps(), 0);

        let short = session(vec![
            SetResult::new(225.0, 5).with_target(5),
            SetResult::new(225.0, 3).with_target(5),
            SetResult::new(225.0, 4).with_target(5),
        ]);
        assert!(!short.completed());
        assert_eq!(short.missed_reps(), 3);
    }

    #[test]
    fn test_empty_session_is_not_completed() {
        assert!(!session(vec![]).completed());
        assert!(session(vec![]).top_set().is_none());
        assert!(session(vec![]).best_e1rm(Formula::Epley).is_none());
    }

    #[test]
    fn test_met_counts_qualifying_sets() {
        let s = session(vec![
            SetResult::new(225.0, 5),
            SetResult::new(225.0, 5),
            SetResult::new(225.0, 4),
        ]);
        assert!(s.met(225.0, 2, 5));
        assert!(!s.met(225.0, 3, 5));
        assert!(!s.met(230.0, 1, 5));
        assert!(s.met(224.9999999, 2, 5));
    }

    #[test]
    fn test_average_rpe_ignores_unrated() {
        let s = session(vec![
            SetResult::new(225.0, 5).with_rpe(8.0),
            SetResult::new(225.0, 5),
            SetResult::new(225.0, 5).with_rpe(9.0),
        ]);
        assert_eq!(s.average_rpe(), Some(8.5));
        assert_eq!(session(vec![SetResult::new(1.0, 1)]).average_rpe(), None);
    }

    #[test]
    fn test_volume() {
        let s = session(vec![SetResult::new(100.0, 5), SetResult::new(100.0, 3)]);
        assert_eq!(s.volume(), 800.0);
    }

    #[test]
    fn test_group_sessions() {
        let logged = vec![
            logged("Squat", 235.0, 5, 0),
            logged("squat", 225.0, 5, 3),
            logged("bench press", 155.0, 5, 3),
            logged("squat", 225.0, 5, 3),
        ];
        let sessions = group_sessions(&logged);
        assert_eq!(sessions.len(), 3);

        let squats: Vec<_> = sessions.iter().filter(|s| s.exercise == "squat").collect();
        assert_eq!(squats.len(), 2);
        assert_eq!(squats[0].sets.len(), 2);
        assert_eq!(squats[1].sets[0].weight, 235.0);
        // Oldest first
        assert!(sessions[0].date <= sessions[2].date);
    }
}
