//! Weight units

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PlanError;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    Lb,
    Kg,
}

impl Unit {
    pub fn label(&self) -> &'static str {
        match self {
            Unit::Lb => "lb",
            Unit::Kg => "kg",
        }
    }

    /// Standard olympic bar
    pub fn default_bar(&self) -> f64 {
        match self {
            Unit::Lb => 45.0,
            Unit::Kg => 20.0,
        }
    }

    /// One pair of the smallest common plates
    pub fn smallest_step(&self) -> f64 {
        match self {
            Unit::Lb => 5.0,
            Unit::Kg => 2.5,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Unit {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lb" | "lbs" | "pound" | "pounds" => Ok(Unit::Lb),
            "kg" | "kgs" | "kilo" | "kilos" => Ok(Unit::Kg),
            other => Err(PlanError::UnknownUnit(other.to_string())),
        }
    }
}

/// Format a weight without trailing zeros: 225, 102.5, 1.25
pub fn format_weight(weight: f64) -> String {
    let rounded = (weight * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 {
        format!("{:.0}", rounded)
    } else {
        let s = format!("{:.2}", rounded);
        s.trim_end_matches('0').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_units() {
        assert_eq!("lb".parse::<Unit>(), Ok(Unit::Lb));
        assert_eq!("LBS".parse::<Unit>(), Ok(Unit::Lb));
        assert_eq!(" kg ".parse::<Unit>(), Ok(Unit::Kg));
        assert_eq!("kilos".parse::<Unit>(), Ok(Unit::Kg));
        assert!(matches!("stone".parse::<Unit>(), Err(PlanError::UnknownUnit(_))));
    }

    #[test]
    fn test_defaults() {
        assert_eq!(Unit::default(), Unit::Lb);
        assert_eq!(Unit::Lb.default_bar(), 45.0);
        assert_eq!(Unit::Kg.default_bar(), 20.0);
        assert_eq!(Unit::Kg.smallest_step(), 2.5);
    }

    #[test]
    fn test_format_weight() {
        assert_eq!(format_weight(225.0), "225");
        assert_eq!(format_weight(102.5), "102.5");
        assert_eq!(format_weight(1.25), "1.25");
        assert_eq!(format_weight(187.4999999), "187.5");
    }
}
