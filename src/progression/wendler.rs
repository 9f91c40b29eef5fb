//! 5/3/1 - percentage waves off a training max

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{Lift, Methodology, Prescription, TargetSet, TargetStrategy};
use crate::error::{PlanError, Result, ensure_positive};
use crate::session::Session;

/// (percent of training max, reps) per work set, weeks 1-4
pub const WEEKS: [[(f64, u32); 3]; 4] = [
    [(0.65, 5), (0.75, 5), (0.85, 5)],
    [(0.70, 3), (0.80, 3), (0.90, 3)],
    [(0.75, 5), (0.85, 3), (0.95, 1)],
    [(0.40, 5), (0.50, 5), (0.60, 5)],
];

pub const WARMUPS: [(f64, u32); 3] = [(0.40, 5), (0.50, 5), (0.60, 3)];

const TRAINING_MAX_FACTOR: f64 = 0.9;
const STALL_FACTOR: f64 = 0.9;
const DELOAD_WEEK: u8 = 4;
const WORK_RPE: [f64; 3] = [7.0, 8.0, 9.0];
const DELOAD_RPE: f64 = 6.0;

/// Training max from a true or estimated one-rep max
pub fn training_max_from(one_rep_max: f64) -> f64 {
    one_rep_max * TRAINING_MAX_FACTOR
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WendlerState {
    pub training_max: f64,
    /// 1-4, week 4 is the deload
    pub week: u8,
    pub cycle: u32,
}

impl WendlerState {
    pub fn new(training_max: f64) -> Self {
        Self { training_max, week: 1, cycle: 1 }
    }

    pub fn at_week(mut self, week: u8) -> Self {
        self.week = week;
        self
    }
}

pub struct Wendler531 {
    lift: Lift,
    warmups: bool,
}

impl Wendler531 {
    pub fn new(lift: Lift) -> Self {
        Self { lift, warmups: false }
    }

    pub fn with_warmups(mut self, warmups: bool) -> Self {
        self.warmups = warmups;
        self
    }

    fn week_table(state: &WendlerState) -> Result<&'static [(f64, u32); 3]> {
        ensure_positive(state.training_max)?;
        if !(1..=DELOAD_WEEK).contains(&state.week) {
            return Err(PlanError::InvalidWeek(state.week));
        }
        Ok(&WEEKS[(state.week - 1) as usize])
    }

    fn week_label(week: u8) -> &'static str {
        match week {
            1 => "5s week",
            2 => "3s week",
            3 => "5/3/1 week",
            _ => "deload week",
        }
    }
}

impl TargetStrategy for Wendler531 {
    type State = WendlerState;

    fn prescribe(&self, state: &WendlerState) -> Result<Prescription> {
        let table = Self::week_table(state)?;
        let deload = state.week == DELOAD_WEEK;
        let tm = state.training_max;

        let mut sets = Vec::new();
        if self.warmups && !deload {
            for (pct, reps) in WARMUPS {
                sets.push(TargetSet::warmup(self.lift.round(tm * pct), reps));
            }
        }

        for (i, (pct, reps)) in table.iter().enumerate() {
            let set = TargetSet::work(self.lift.round(tm * pct), *reps);
            let set = if deload {
                set.at_rpe(DELOAD_RPE)
            } else if i == table.len() - 1 {
                set.amrap().at_rpe(WORK_RPE[i])
            } else {
                set.at_rpe(WORK_RPE[i])
            };
            sets.push(set);
        }

        Ok(Prescription {
            method: Methodology::Wendler531,
            exercise: self.lift.exercise.clone(),
            sets,
            deload,
            note: format!(
                "Cycle {}, {} (TM {} {})",
                state.cycle,
                Self::week_label(state.week),
                crate::units::format_weight(tm),
                self.lift.unit
            ),
        })
    }

    fn advance(&self, state: &WendlerState, performed: &Session) -> Result<WendlerState> {
        let table = Self::week_table(state)?;

        if state.week == DELOAD_WEEK {
            let training_max = self.lift.round(state.training_max + self.lift.increment());
            debug!(
                "{}: cycle {} done, TM {} -> {}",
                self.lift.exercise, state.cycle, state.training_max, training_max
            );
            return Ok(WendlerState { training_max, week: 1, cycle: state.cycle + 1 });
        }

        // The AMRAP set is the heaviest of the week
        let (_, min_reps) = table[table.len() - 1];
        let hit_minimum = performed.top_set().is_some_and(|top| top.reps >= min_reps);

        if hit_minimum {
            Ok(WendlerState { week: state.week + 1, ..state.clone() })
        } else {
            let training_max = self.lift.round(state.training_max * STALL_FACTOR);
            info!(
                "{}: missed {}+ on week {}, TM reset {} -> {}",
                self.lift.exercise, min_reps, state.week, state.training_max, training_max
            );
            Ok(WendlerState { training_max, week: 1, cycle: state.cycle + 1 })
        }
    }
}
