//! GZCLP - tiered linear progression with rep-scheme fallbacks
//!
//! T1 and T2 lifts add weight while the current scheme is completed and drop
//! to a lower-rep scheme when it is not. Running out of schemes restarts the
//! tier: T1 from 85% of a fresh 5RM estimate, T2 from the weight of the last
//! full-rep run plus two increments. T3 only moves once its AMRAP set
//! reaches 25 reps.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{Lift, Methodology, Prescription, TargetSet, TargetStrategy};
use crate::analysis::estimate::{Formula, weight_for_reps};
use crate::error::{PlanError, Result, ensure_positive};
use crate::session::Session;

/// (sets, reps) per stage
const T1_STAGES: &[(u32, u32)] = &[(5, 3), (6, 2), (10, 1)];
const T2_STAGES: &[(u32, u32)] = &[(3, 10), (3, 8), (3, 6)];
const T3_STAGES: &[(u32, u32)] = &[(3, 15)];

const T1_RESET_FACTOR: f64 = 0.85;
const T1_RETEST_REPS: u32 = 5;
const T2_RESET_INCREMENTS: f64 = 2.0;
const T3_PROGRESS_REPS: u32 = 25;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Tier {
    T1,
    T2,
    T3,
}

impl Tier {
    pub fn stages(&self) -> &'static [(u32, u32)] {
        match self {
            Tier::T1 => T1_STAGES,
            Tier::T2 => T2_STAGES,
            Tier::T3 => T3_STAGES,
        }
    }

    /// Last set is taken to as many reps as possible
    pub fn has_amrap(&self) -> bool {
        matches!(self, Tier::T1 | Tier::T3)
    }

    pub fn target_rpe(&self) -> f64 {
        match self {
            Tier::T1 => 8.5,
            Tier::T2 => 8.0,
            Tier::T3 => 9.0,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tier::T1 => "T1",
            Tier::T2 => "T2",
            Tier::T3 => "T3",
        };
        f.write_str(name)
    }
}

impl FromStr for Tier {
    type Err = PlanError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "t1" | "1" => Ok(Tier::T1),
            "t2" | "2" => Ok(Tier::T2),
            "t3" | "3" => Ok(Tier::T3),
            other => Err(PlanError::UnknownTier(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GzclpState {
    pub tier: Tier,
    /// Index into the tier's stages
    pub stage: usize,
    pub weight: f64,
    /// Last weight attempted on the first stage
    pub first_stage_weight: f64,
    /// The tier just ran out of stages and restarted
    pub restarted: bool,
}

impl GzclpState {
    pub fn new(tier: Tier, weight: f64) -> Self {
        Self {
            tier,
            stage: 0,
            weight,
            first_stage_weight: weight,
            restarted: false,
        }
    }

    pub fn at_stage(mut self, stage: usize) -> Self {
        self.stage = stage;
        self
    }

    fn scheme(&self) -> Result<(u32, u32)> {
        self.tier
            .stages()
            .get(self.stage)
            .copied()
            .ok_or_else(|| PlanError::InvalidStage {
                tier: self.tier.to_string(),
                stage: self.stage,
            })
    }
}

pub struct Gzclp {
    lift: Lift,
    formula: Formula,
}

impl Gzclp {
    pub fn new(lift: Lift) -> Self {
        Self { lift, formula: Formula::default() }
    }

    pub fn with_formula(mut self, formula: Formula) -> Self {
        self.formula = formula;
        self
    }

    /// T3 accessories move in the smallest loadable step
    fn t3_increment(&self) -> f64 {
        self.lift.unit.smallest_step()
    }

    fn restart(&self, state: &GzclpState, performed: &Session) -> GzclpState {
        let weight = match state.tier {
            Tier::T1 => {
                let five_rm = performed
                    .best_e1rm(self.formula)
                    .and_then(|e1rm| weight_for_reps(e1rm, T1_RETEST_REPS, self.formula))
                    .unwrap_or(state.weight);
                self.lift.round(five_rm * T1_RESET_FACTOR)
            }
            _ => self
                .lift
                .round(state.first_stage_weight + T2_RESET_INCREMENTS * self.lift.increment()),
        };
        info!(
            "{}: {} out of stages at {}, restarting at {}",
            self.lift.exercise, state.tier, state.weight, weight
        );
        GzclpState {
            tier: state.tier,
            stage: 0,
            weight,
            first_stage_weight: weight,
            restarted: true,
        }
    }
}

impl TargetStrategy for Gzclp {
    type State = GzclpState;

    fn prescribe(&self, state: &GzclpState) -> Result<Prescription> {
        let weight = ensure_positive(state.weight)?;
        let (set_count, reps) = state.scheme()?;

        let sets = (0..set_count)
            .map(|i| {
                let set = TargetSet::work(weight, reps).at_rpe(state.tier.target_rpe());
                if state.tier.has_amrap() && i == set_count - 1 {
                    set.amrap()
                } else {
                    set
                }
            })
            .collect();

        let stages = state.tier.stages().len();
        let mut note = format!(
            "{} stage {} of {} ({}x{}{})",
            state.tier,
            state.stage + 1,
            stages,
            set_count,
            reps,
            if state.tier.has_amrap() { "+" } else { "" }
        );
        if state.restarted {
            note.push_str(", restarted");
        }

        Ok(Prescription {
            method: Methodology::Gzclp,
            exercise: self.lift.exercise.clone(),
            sets,
            deload: state.restarted && state.tier == Tier::T1,
            note,
        })
    }

    fn advance(&self, state: &GzclpState, performed: &Session) -> Result<GzclpState> {
        ensure_positive(state.weight)?;
        let (set_count, reps) = state.scheme()?;

        let first_stage_weight = if state.stage == 0 {
            state.weight
        } else {
            state.first_stage_weight
        };

        if state.tier == Tier::T3 {
            let progressed = performed.met(state.weight, 1, T3_PROGRESS_REPS);
            let weight = if progressed {
                self.lift.round(state.weight + self.t3_increment())
            } else {
                state.weight
            };
            return Ok(GzclpState {
                weight,
                first_stage_weight: weight,
                restarted: false,
                ..state.clone()
            });
        }

        if performed.met(state.weight, set_count, reps) {
            let weight = self.lift.round(state.weight + self.lift.increment());
            return Ok(GzclpState {
                weight,
                first_stage_weight: if state.stage == 0 { weight } else { first_stage_weight },
                restarted: false,
                ..state.clone()
            });
        }

        if state.stage + 1 < state.tier.stages().len() {
            return Ok(GzclpState {
                stage: state.stage + 1,
                first_stage_weight,
                restarted: false,
                ..state.clone()
            });
        }

        Ok(self.restart(&GzclpState { first_stage_weight, ..state.clone() }, performed))
    }
}
