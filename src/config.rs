//! Runtime settings from the environment (`.env` is loaded by main)

use std::env;
use std::str::FromStr;

use tracing::warn;

use crate::analysis::estimate::Formula;
use crate::plates::PlateInventory;
use crate::units::Unit;

pub const DEFAULT_DB_PATH: &str = "overload.db";

pub const ENV_DB: &str = "OVERLOAD_DB";
pub const ENV_UNIT: &str = "OVERLOAD_UNIT";
pub const ENV_BAR: &str = "OVERLOAD_BAR";
pub const ENV_FORMULA: &str = "OVERLOAD_FORMULA";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub db_path: String,
    pub unit: Unit,
    pub bar: f64,
    pub formula: Formula,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            db_path: DEFAULT_DB_PATH.to_string(),
            unit: Unit::default(),
            bar: Unit::default().default_bar(),
            formula: Formula::default(),
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; invalid values fall back to defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let unit: Unit = parse_or(ENV_UNIT, lookup(ENV_UNIT), Unit::default());
        let bar: f64 = parse_or(ENV_BAR, lookup(ENV_BAR), unit.default_bar());
        let bar = if bar.is_finite() && bar > 0.0 {
            bar
        } else {
            warn!("{} must be positive, using {}", ENV_BAR, unit.default_bar());
            unit.default_bar()
        };

        Self {
            db_path: lookup(ENV_DB)
                .filter(|p| !p.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_DB_PATH.to_string()),
            unit,
            bar,
            formula: parse_or(ENV_FORMULA, lookup(ENV_FORMULA), Formula::default()),
        }
    }

    /// Standard plates for the configured unit on the configured bar
    pub fn inventory(&self) -> PlateInventory {
        PlateInventory::standard(self.unit).with_bar(self.bar)
    }
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => default,
        Some(value) => match value.parse::<T>() {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("Ignoring {}={}: {}", key, value, e);
                default
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(pairs: &[(&str, &str)]) -> Settings {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        assert_eq!(settings(&[]), Settings::default());
    }

    #[test]
    fn test_kg_uses_kg_bar() {
        let s = settings(&[(ENV_UNIT, "kg")]);
        assert_eq!(s.unit, Unit::Kg);
        assert_eq!(s.bar, 20.0);
        assert_eq!(s.inventory().bar, 20.0);
    }

    #[test]
    fn test_overrides() {
        let s = settings(&[
            (ENV_DB, "/tmp/lifts.db"),
            (ENV_BAR, "35"),
            (ENV_FORMULA, "brzycki"),
        ]);
        assert_eq!(s.db_path, "/tmp/lifts.db");
        assert_eq!(s.bar, 35.0);
        assert_eq!(s.formula, Formula::Brzycki);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let s = settings(&[(ENV_UNIT, "stone"), (ENV_BAR, "-10"), (ENV_FORMULA, "guess")]);
        assert_eq!(s.unit, Unit::Lb);
        assert_eq!(s.bar, 45.0);
        assert_eq!(s.formula, Formula::Epley);

        let s = settings(&[(ENV_BAR, "heavy")]);
        assert_eq!(s.bar, 45.0);
    }
}
