//! Estimated one-rep max formulas

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PlanError;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Formula {
    #[default]
    Epley,
    Brzycki,
    Lombardi,
}

impl Formula {
    pub fn name(&self) -> &'static str {
        match self {
            Formula::Epley => "epley",
            Formula::Brzycki => "brzycki",
            Formula::Lombardi => "lombardi",
        }
    }

    /// Multiplier from a `reps`-rep load to the one-rep max
    fn factor(&self, reps: u32) -> Option<f64> {
        let r = reps as f64;
        match self {
            Formula::Epley => Some(1.0 + r / 30.0),
            Formula::Brzycki if reps < 37 => Some(36.0 / (37.0 - r)),
            Formula::Brzycki => None,
            Formula::Lombardi => Some(r.powf(0.10)),
        }
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Formula {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "epley" => Ok(Formula::Epley),
            "brzycki" => Ok(Formula::Brzycki),
            "lombardi" => Ok(Formula::Lombardi),
            other => Err(PlanError::UnknownFormula(other.to_string())),
        }
    }
}

/// e1RM from a submaximal set
pub fn one_rep_max(weight: f64, reps: u32, formula: Formula) -> Option<f64> {
    if reps == 0 || !weight.is_finite() || weight <= 0.0 {
        return None;
    }
    if reps == 1 {
        return Some(weight);
    }
    formula.factor(reps).map(|f| weight * f)
}

/// e1RM counting reps left in reserve (10 - RPE) as if performed
pub fn one_rep_max_with_rpe(weight: f64, reps: u32, rpe: f64, formula: Formula) -> Option<f64> {
    let rpe = if rpe.is_finite() { rpe.clamp(1.0, 10.0) } else { 10.0 };
    let in_reserve = (10.0 - rpe).round() as u32;
    one_rep_max(weight, reps + in_reserve, formula)
}

/// Load expected to be liftable for `reps` reps given a one-rep max
pub fn weight_for_reps(one_rep_max: f64, reps: u32, formula: Formula) -> Option<f64> {
    if reps == 0 || !one_rep_max.is_finite() || one_rep_max <= 0.0 {
        return None;
    }
    if reps == 1 {
        return Some(one_rep_max);
    }
    formula.factor(reps).map(|f| one_rep_max / f)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 0.01
    }

    #[test]
    fn test_epley() {
        // 225 x 5 = 225 * (1 + 5/30) = 262.5
        let e = one_rep_max(225.0, 5, Formula::Epley).unwrap();
        assert!(approx(e, 262.5), "got {}", e);
    }

    #[test]
    fn test_brzycki() {
        // 225 x 5 = 225 * 36 / 32 = 253.125
        let e = one_rep_max(225.0, 5, Formula::Brzycki).unwrap();
        assert!(approx(e, 253.125), "got {}", e);
        assert!(one_rep_max(100.0, 37, Formula::Brzycki).is_none());
    }

    #[test]
    fn test_lombardi() {
        let e = one_rep_max(100.0, 10, Formula::Lombardi).unwrap();
        assert!(approx(e, 125.89), "got {}", e);
    }

    #[test]
    fn test_single_rep_is_weight() {
        for formula in [Formula::Epley, Formula::Brzycki, Formula::Lombardi] {
            assert_eq!(one_rep_max(315.0, 1, formula), Some(315.0));
        }
    }

    #[test]
    fn test_invalid_input() {
        assert!(one_rep_max(225.0, 0, Formula::Epley).is_none());
        assert!(one_rep_max(0.0, 5, Formula::Epley).is_none());
        assert!(one_rep_max(f64::NAN, 5, Formula::Epley).is_none());
    }

    #[test]
    fn test_rpe_adds_reps_in_reserve() {
        // 200 x 3 @ RPE 8 estimates like 200 x 5
        let with_rpe = one_rep_max_with_rpe(200.0, 3, 8.0, Formula::Epley).unwrap();
        let plain = one_rep_max(200.0, 5, Formula::Epley).unwrap();
        assert!(approx(with_rpe, plain));

        // RPE 10 leaves nothing in reserve
        assert_eq!(one_rep_max_with_rpe(200.0, 1, 10.0, Formula::Epley), Some(200.0));
        // Out of range RPE is clamped
        assert_eq!(
            one_rep_max_with_rpe(200.0, 1, 12.0, Formula::Epley),
            one_rep_max(200.0, 1, Formula::Epley)
        );
    }

    #[test]
    fn test_weight_for_reps_inverts_estimate() {
        let e1rm = one_rep_max(225.0, 5, Formula::Epley).unwrap();
        let back = weight_for_reps(e1rm, 5, Formula::Epley).unwrap();
        assert!(approx(back, 225.0));
        assert_eq!(weight_for_reps(300.0, 1, Formula::Epley), Some(300.0));
        assert!(weight_for_reps(300.0, 0, Formula::Epley).is_none());
    }

    #[test]
    fn test_parse_formula() {
        assert_eq!("Brzycki".parse::<Formula>(), Ok(Formula::Brzycki));
        assert!("wathan".parse::<Formula>().is_err());
    }
}
