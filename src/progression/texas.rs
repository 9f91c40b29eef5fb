//! Texas Method - weekly volume, recovery and intensity days

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{Lift, Methodology, Prescription, TargetSet, TargetStrategy};
use crate::error::{PlanError, Result, ensure_positive};
use crate::session::Session;
use crate::units::format_weight;

const VOLUME_FACTOR: f64 = 0.9;
const RECOVERY_FACTOR: f64 = 0.8;
const RESET_FACTOR: f64 = 0.95;
const FAILURES_BEFORE_RESET: u32 = 2;

const VOLUME_SCHEME: (u32, u32) = (5, 5);
const RECOVERY_SCHEME: (u32, u32) = (2, 5);
const INTENSITY_SCHEME: (u32, u32) = (1, 5);

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TexasDay {
    Volume,
    Recovery,
    Intensity,
}

impl TexasDay {
    pub fn next(&self) -> Self {
        match self {
            TexasDay::Volume => TexasDay::Recovery,
            TexasDay::Recovery => TexasDay::Intensity,
            TexasDay::Intensity => TexasDay::Volume,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TexasDay::Volume => "volume day",
            TexasDay::Recovery => "recovery day",
            TexasDay::Intensity => "intensity day",
        }
    }
}

impl fmt::Display for TexasDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TexasDay {
    type Err = PlanError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "volume" | "mon" | "monday" => Ok(TexasDay::Volume),
            "recovery" | "light" | "wed" | "wednesday" => Ok(TexasDay::Recovery),
            "intensity" | "fri" | "friday" => Ok(TexasDay::Intensity),
            other => Err(PlanError::UnknownDay(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TexasState {
    /// Intensity day 5-rep target; the other days derive from it
    pub intensity_weight: f64,
    pub day: TexasDay,
    /// Consecutive missed intensity days
    pub failures: u32,
    /// Intensity weight was just reset
    pub reset: bool,
}

impl TexasState {
    pub fn new(intensity_weight: f64, day: TexasDay) -> Self {
        Self { intensity_weight, day, failures: 0, reset: false }
    }
}

pub struct TexasMethod {
    lift: Lift,
}

impl TexasMethod {
    pub fn new(lift: Lift) -> Self {
        Self { lift }
    }

    /// Weekly intensity jump: half the usual increment, at least one loading step
    fn weekly_increment(&self) -> f64 {
        (self.lift.increment() / 2.0).max(self.lift.rounding.0)
    }

    pub fn volume_weight(&self, state: &TexasState) -> f64 {
        self.lift.round(state.intensity_weight * VOLUME_FACTOR)
    }

    pub fn recovery_weight(&self, state: &TexasState) -> f64 {
        self.lift.round(self.volume_weight(state) * RECOVERY_FACTOR)
    }
}

impl TargetStrategy for TexasMethod {
    type State = TexasState;

    fn prescribe(&self, state: &TexasState) -> Result<Prescription> {
        ensure_positive(state.intensity_weight)?;

        let (weight, (set_count, reps), rpe) = match state.day {
            TexasDay::Volume => (self.volume_weight(state), VOLUME_SCHEME, 8.0),
            TexasDay::Recovery => (self.recovery_weight(state), RECOVERY_SCHEME, 6.0),
            TexasDay::Intensity => (state.intensity_weight, INTENSITY_SCHEME, 9.5),
        };

        let sets = (0..set_count)
            .map(|_| TargetSet::work(weight, reps).at_rpe(rpe))
            .collect();

        let deload = state.reset && state.day == TexasDay::Volume;
        let mut note = format!(
            "{} (intensity target {} {})",
            state.day,
            format_weight(state.intensity_weight),
            self.lift.unit
        );
        if deload {
            note.push_str(", reset after missed intensity days");
        }

        Ok(Prescription {
            method: Methodology::Texas,
            exercise: self.lift.exercise.clone(),
            sets,
            deload,
            note,
        })
    }

    fn advance(&self, state: &TexasState, performed: &Session) -> Result<TexasState> {
        ensure_positive(state.intensity_weight)?;
        let day = state.day.next();

        match state.day {
            TexasDay::Volume => Ok(TexasState { day, reset: false, ..state.clone() }),
            TexasDay::Recovery => Ok(TexasState { day, ..state.clone() }),
            TexasDay::Intensity => {
                let (_, reps) = INTENSITY_SCHEME;
                if performed.met(state.intensity_weight, 1, reps) {
                    return Ok(TexasState {
                        intensity_weight: self
                            .lift
                            .round(state.intensity_weight + self.weekly_increment()),
                        day,
                        failures: 0,
                        reset: false,
                    });
                }

                let failures = state.failures + 1;
                if failures >= FAILURES_BEFORE_RESET {
                    let intensity_weight = self.lift.round(state.intensity_weight * RESET_FACTOR);
                    info!(
                        "{}: {} missed intensity days at {}, reset to {}",
                        self.lift.exercise, failures, state.intensity_weight, intensity_weight
                    );
                    return Ok(TexasState { intensity_weight, day, failures: 0, reset: true });
                }

                Ok(TexasState { day, failures, reset: false, ..state.clone() })
            }
        }
    }
}
