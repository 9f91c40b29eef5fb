//! Linear progression - add weight every successful session

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{Lift, Methodology, Prescription, TargetSet, TargetStrategy};
use crate::error::{Result, ensure_positive};
use crate::session::Session;

const DEFAULT_SETS: u32 = 3;
const DEFAULT_REPS: u32 = 5;
const DEFAULT_DELOAD_AFTER: u32 = 3;
const DEFAULT_DELOAD_FACTOR: f64 = 0.9;

/// Average RPE at or below this doubles the next jump
const EASY_RPE: f64 = 7.0;
/// Average RPE at or above this halves the next jump
const GRINDING_RPE: f64 = 9.5;

const WORK_RPE: f64 = 8.0;
const DELOAD_RPE: f64 = 6.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearState {
    pub weight: f64,
    pub sets: u32,
    pub reps: u32,
    /// Consecutive sessions short of the target
    pub failures: u32,
    /// The current weight came from a deload
    pub deloaded: bool,
}

impl LinearState {
    pub fn new(weight: f64) -> Self {
        Self {
            weight,
            sets: DEFAULT_SETS,
            reps: DEFAULT_REPS,
            failures: 0,
            deloaded: false,
        }
    }

    pub fn with_scheme(mut self, sets: u32, reps: u32) -> Self {
        self.sets = sets;
        self.reps = reps;
        self
    }
}

pub struct LinearProgression {
    lift: Lift,
    deload_after: u32,
    deload_factor: f64,
}

impl LinearProgression {
    pub fn new(lift: Lift) -> Self {
        Self {
            lift,
            deload_after: DEFAULT_DELOAD_AFTER,
            deload_factor: DEFAULT_DELOAD_FACTOR,
        }
    }

    pub fn with_deload(mut self, after: u32, factor: f64) -> Self {
        self.deload_after = after.max(1);
        self.deload_factor = factor;
        self
    }

    /// Weight jump after a successful session, scaled by how hard it felt
    fn jump(&self, performed: &Session) -> f64 {
        let base = self.lift.increment();
        let step = self.lift.rounding.0;
        match performed.average_rpe() {
            Some(rpe) if rpe <= EASY_RPE => base * 2.0,
            Some(rpe) if rpe >= GRINDING_RPE => self.lift.round(base / 2.0).max(step),
            _ => base,
        }
    }
}

impl TargetStrategy for LinearProgression {
    type State = LinearState;

    fn prescribe(&self, state: &LinearState) -> Result<Prescription> {
        let weight = ensure_positive(state.weight)?;
        let rpe = if state.deloaded { DELOAD_RPE } else { WORK_RPE };
        let sets = (0..state.sets.max(1))
            .map(|_| TargetSet::work(weight, state.reps.max(1)).at_rpe(rpe))
            .collect();

        let note = if state.deloaded {
            format!(
                "Deload to {:.0}% after {} missed sessions",
                self.deload_factor * 100.0,
                self.deload_after
            )
        } else if state.failures > 0 {
            format!("Repeat the weight ({} of {} misses)", state.failures, self.deload_after)
        } else {
            "Add weight after every successful session".to_string()
        };

        Ok(Prescription {
            method: Methodology::Linear,
            exercise: self.lift.exercise.clone(),
            sets,
            deload: state.deloaded,
            note,
        })
    }

    fn advance(&self, state: &LinearState, performed: &Session) -> Result<LinearState> {
        ensure_positive(state.weight)?;

        if performed.met(state.weight, state.sets, state.reps) {
            return Ok(LinearState {
                weight: self.lift.round(state.weight + self.jump(performed)),
                failures: 0,
                deloaded: false,
                ..state.clone()
            });
        }

        let failures = state.failures + 1;
        if failures >= self.deload_after {
            let weight = self.lift.round(state.weight * self.deload_factor);
            info!(
                "{}: {} missed sessions at {}, deload to {}",
                self.lift.exercise, failures, state.weight, weight
            );
            return Ok(LinearState { weight, failures: 0, deloaded: true, ..state.clone() });
        }

        Ok(LinearState { failures, deloaded: false, ..state.clone() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SetResult;
    use crate::units::Unit;
    use chrono::Utc;

    fn squat() -> LinearProgression {
        LinearProgression::new(Lift::new("squat", Unit::Lb))
    }

    fn performed(weight: f64, reps: &[u32], rpe: Option<f64>) -> Session {
        let sets = reps
            .iter()
            .map(|r| {
                let set = SetResult::new(weight, *r);
                match rpe {
                    Some(value) => set.with_rpe(value),
                    None => set,
                }
            })
            .collect();
        Session::new(Utc::now(), "squat", sets)
    }

    #[test]
    fn test_prescribe_default_scheme() {
        let p = squat().prescribe(&LinearState::new(225.0)).unwrap();
        assert_eq!(p.sets.len(), 3);
        assert!(p.sets.iter().all(|s| s.weight == 225.0 && s.reps == 5 && s.rpe == Some(8.0)));
        assert!(!p.deload);
    }

    #[test]
    fn test_success_adds_increment() {
        let next = squat()
            .advance(&LinearState::new(225.0), &performed(225.0, &[5, 5, 5], Some(8.0)))
            .unwrap();
        assert_eq!(next.weight, 235.0);
        assert_eq!(next.failures, 0);

        let bench = LinearProgression::new(Lift::new("bench press", Unit::Lb));
        let next = bench
            .advance(&LinearState::new(155.0), &performed(155.0, &[5, 5, 5], None))
            .unwrap();
        assert_eq!(next.weight, 160.0);
    }

    #[test]
    fn test_easy_session_doubles_jump() {
        let next = squat()
            .advance(&LinearState::new(225.0), &performed(225.0, &[5, 5, 5], Some(6.5)))
            .unwrap();
        assert_eq!(next.weight, 245.0);
    }

    #[test]
    fn test_grinding_session_halves_jump() {
        let next = squat()
            .advance(&LinearState::new(225.0), &performed(225.0, &[5, 5, 5], Some(10.0)))
            .unwrap();
        assert_eq!(next.weight, 230.0);

        // Never below one loading step
        let bench = LinearProgression::new(Lift::new("bench press", Unit::Lb));
        let next = bench
            .advance(&LinearState::new(155.0), &performed(155.0, &[5, 5, 5], Some(9.5)))
            .unwrap();
        assert_eq!(next.weight, 160.0);
    }

    #[test]
    fn test_failure_repeats_weight() {
        let next = squat()
            .advance(&LinearState::new(225.0), &performed(225.0, &[5, 5, 3], None))
            .unwrap();
        assert_eq!(next.weight, 225.0);
        assert_eq!(next.failures, 1);

        let p = squat().prescribe(&next).unwrap();
        assert!(p.note.contains("1 of 3"));
    }

    #[test]
    fn test_third_failure_deloads() {
        let strategy = squat();
        let mut state = LinearState::new(300.0);
        let missed = performed(300.0, &[5, 4, 3], None);

        state = strategy.advance(&state, &missed).unwrap();
        state = strategy.advance(&state, &missed).unwrap();
        assert_eq!(state.failures, 2);
        state = strategy.advance(&state, &missed).unwrap();

        assert_eq!(state.weight, 270.0);
        assert_eq!(state.failures, 0);
        assert!(state.deloaded);

        let p = strategy.prescribe(&state).unwrap();
        assert!(p.deload);
        assert_eq!(p.sets[0].rpe, Some(6.0));
    }

    #[test]
    fn test_custom_scheme_and_deload() {
        let strategy = squat().with_deload(2, 0.8);
        let state = LinearState::new(200.0).with_scheme(5, 3);
        let missed = performed(200.0, &[3, 3, 3, 3, 2], None);

        let state = strategy.advance(&state, &missed).unwrap();
        let state = strategy.advance(&state, &missed).unwrap();
        assert_eq!(state.weight, 160.0);
        assert_eq!(state.sets, 5);
    }

    #[test]
    fn test_lighter_weight_is_not_success() {
        let next = squat()
            .advance(&LinearState::new(225.0), &performed(215.0, &[5, 5, 5], None))
            .unwrap();
        assert_eq!(next.failures, 1);
    }
}
