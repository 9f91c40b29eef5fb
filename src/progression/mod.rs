//! Progression module - next-session targets per training methodology
//!
//! Every methodology is a [`TargetStrategy`]: it turns its own state into a
//! [`Prescription`] for the coming session, and folds a performed
//! [`Session`] into the next state.

pub mod gzclp;
pub mod linear;
pub mod texas;
pub mod wendler;

pub use gzclp::{Gzclp, GzclpState, Tier};
pub use linear::{LinearProgression, LinearState};
pub use texas::{TexasDay, TexasMethod, TexasState};
pub use wendler::{Wendler531, WendlerState, training_max_from};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PlanError, Result};
use crate::exercises::{Category, canonical_name, category_of};
use crate::session::Session;
use crate::units::{Unit, format_weight};

/// Anything that snaps a computed weight to something loadable
pub trait Rounder {
    fn round_weight(&self, weight: f64) -> f64;
}

/// Round to the nearest multiple of a fixed step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Increment(pub f64);

impl Rounder for Increment {
    fn round_weight(&self, weight: f64) -> f64 {
        let step = self.0;
        if !step.is_finite() || step <= 0.0 || !weight.is_finite() {
            return weight;
        }
        (weight / step).round() * step
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Methodology {
    Wendler531,
    Linear,
    Gzclp,
    Texas,
}

impl Methodology {
    pub fn name(&self) -> &'static str {
        match self {
            Methodology::Wendler531 => "5/3/1",
            Methodology::Linear => "Linear progression",
            Methodology::Gzclp => "GZCLP",
            Methodology::Texas => "Texas Method",
        }
    }
}

impl fmt::Display for Methodology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Methodology {
    type Err = PlanError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "531" | "5/3/1" | "wendler" => Ok(Methodology::Wendler531),
            "linear" | "lp" => Ok(Methodology::Linear),
            "gzclp" => Ok(Methodology::Gzclp),
            "texas" | "tm" => Ok(Methodology::Texas),
            other => Err(PlanError::UnknownMethod(other.to_string())),
        }
    }
}

/// The lift a strategy is planning and how it is loaded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lift {
    pub exercise: String,
    pub unit: Unit,
    pub category: Category,
    pub rounding: Increment,
}

impl Lift {
    pub fn new(exercise: &str, unit: Unit) -> Self {
        Self {
            exercise: canonical_name(exercise),
            unit,
            category: category_of(exercise),
            rounding: Increment(unit.smallest_step()),
        }
    }

    pub fn with_rounding(mut self, step: f64) -> Self {
        self.rounding = Increment(step);
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Session-to-session jump for this lift
    pub fn increment(&self) -> f64 {
        self.category.increment(self.unit)
    }

    pub fn round(&self, weight: f64) -> f64 {
        self.rounding.round_weight(weight)
    }
}

/// One prescribed set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetSet {
    pub weight: f64,
    pub reps: u32,
    /// As many reps as possible, `reps` is the minimum
    pub amrap: bool,
    pub rpe: Option<f64>,
    pub warmup: bool,
}

impl TargetSet {
    pub fn work(weight: f64, reps: u32) -> Self {
        Self { weight, reps, amrap: false, rpe: None, warmup: false }
    }

    pub fn warmup(weight: f64, reps: u32) -> Self {
        Self { weight, reps, amrap: false, rpe: None, warmup: true }
    }

    pub fn amrap(mut self) -> Self {
        self.amrap = true;
        self
    }

    pub fn at_rpe(mut self, rpe: f64) -> Self {
        self.rpe = Some(rpe);
        self
    }

    pub fn format(&self, unit: Unit) -> String {
        let mut line = format!(
            "{} {} x {}{}",
            format_weight(self.weight),
            unit,
            self.reps,
            if self.amrap { "+" } else { "" }
        );
        if let Some(rpe) = self.rpe {
            line.push_str(&format!(" @RPE {}", format_weight(rpe)));
        }
        if self.warmup {
            line.push_str(" (warm-up)");
        }
        line
    }
}

/// Everything planned for one exercise in the coming session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prescription {
    pub method: Methodology,
    pub exercise: String,
    pub sets: Vec<TargetSet>,
    pub deload: bool,
    pub note: String,
}

impl Prescription {
    pub fn work_sets(&self) -> impl Iterator<Item = &TargetSet> {
        self.sets.iter().filter(|s| !s.warmup)
    }

    /// Heaviest work set
    pub fn top_set(&self) -> Option<&TargetSet> {
        self.work_sets().max_by(|a, b| a.weight.total_cmp(&b.weight))
    }

    pub fn total_reps(&self) -> u32 {
        self.work_sets().map(|s| s.reps).sum()
    }

    /// Copy with every weight passed through `rounder`
    pub fn rounded(&self, rounder: &impl Rounder) -> Self {
        let mut rounded = self.clone();
        for set in &mut rounded.sets {
            set.weight = rounder.round_weight(set.weight);
        }
        rounded
    }

    pub fn format(&self, unit: Unit) -> String {
        let mut lines = vec![format!(
            "{} - {}{}",
            self.exercise,
            self.method,
            if self.deload { " (deload)" } else { "" }
        )];
        if !self.note.is_empty() {
            lines.push(self.note.clone());
        }
        for (i, set) in self.sets.iter().enumerate() {
            lines.push(format!("  {}. {}", i + 1, set.format(unit)));
        }
        lines.join("\n")
    }
}

/// A training methodology
pub trait TargetStrategy {
    type State;

    /// Targets for the session `state` describes
    fn prescribe(&self, state: &Self::State) -> Result<Prescription>;

    /// State after `performed` was done against `state`
    fn advance(&self, state: &Self::State, performed: &Session) -> Result<Self::State>;

    /// Advance and prescribe in one step
    fn next(&self, state: &Self::State, performed: &Session) -> Result<(Self::State, Prescription)> {
        let advanced = self.advance(state, performed)?;
        let prescription = self.prescribe(&advanced)?;
        Ok((advanced, prescription))
    }
}
