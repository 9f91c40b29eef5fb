//! Plate math - per-side breakdowns and rounding to loadable weights
//!
//! Weights are handled internally in hundredths of a unit so the search
//! compares integers. A barbell is loaded symmetrically: every plate counted
//! here goes on both sleeves, so stock is tracked in pairs.

use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PlanError, Result};
use crate::progression::Rounder;
use crate::units::{Unit, format_weight};

/// Pairs of each plate in a standard home/commercial rack
const DEFAULT_PAIRS: u32 = 8;

const LB_PLATES: &[f64] = &[45.0, 35.0, 25.0, 10.0, 5.0, 2.5];
const KG_PLATES: &[f64] = &[25.0, 20.0, 15.0, 10.0, 5.0, 2.5, 1.25];

fn to_hundredths(weight: f64) -> i64 {
    (weight * 100.0).round() as i64
}

fn from_hundredths(value: i64) -> f64 {
    value as f64 / 100.0
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlateStock {
    pub weight: f64,
    pub pairs: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RoundMode {
    #[default]
    Nearest,
    Down,
    Up,
}

impl FromStr for RoundMode {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "nearest" => Ok(RoundMode::Nearest),
            "down" => Ok(RoundMode::Down),
            "up" => Ok(RoundMode::Up),
            other => Err(PlanError::UnknownMode(other.to_string())),
        }
    }
}

/// A concrete bar setup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loading {
    pub total: f64,
    pub bar: f64,
    /// Plates on one sleeve, heaviest first
    pub per_side: Vec<f64>,
}

impl Loading {
    pub fn per_side_weight(&self) -> f64 {
        self.per_side.iter().sum()
    }

    pub fn describe(&self, unit: Unit) -> String {
        let plates = if self.per_side.is_empty() {
            "empty bar".to_string()
        } else {
            let list: Vec<String> = self.per_side.iter().map(|p| format_weight(*p)).collect();
            format!("per side: {}", list.join(", "))
        };
        format!(
            "{} {} ({} {} bar, {})",
            format_weight(self.total),
            unit,
            format_weight(self.bar),
            unit,
            plates
        )
    }
}

/// Bar plus available plates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlateInventory {
    pub unit: Unit,
    pub bar: f64,
    pub plates: Vec<PlateStock>,
}

impl PlateInventory {
    pub fn standard(unit: Unit) -> Self {
        let denominations = match unit {
            Unit::Lb => LB_PLATES,
            Unit::Kg => KG_PLATES,
        };
        Self {
            unit,
            bar: unit.default_bar(),
            plates: denominations
                .iter()
                .map(|w| PlateStock { weight: *w, pairs: DEFAULT_PAIRS })
                .collect(),
        }
    }

    pub fn with_bar(mut self, bar: f64) -> Self {
        self.bar = bar;
        self
    }

    /// Replace the plate set with `(weight, pairs)` entries
    pub fn with_plates(mut self, plates: &[(f64, u32)]) -> Self {
        self.plates = plates
            .iter()
            .map(|(weight, pairs)| PlateStock { weight: *weight, pairs: *pairs })
            .collect();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.bar.is_finite() || self.bar <= 0.0 {
            return Err(PlanError::InvalidBar(self.bar));
        }
        if self.plates.is_empty()
            || self
                .plates
                .iter()
                .any(|p| !p.weight.is_finite() || p.weight <= 0.0)
        {
            return Err(PlanError::InvalidPlates);
        }
        Ok(())
    }

    /// Allowed gap between requested and loaded total
    pub fn tolerance(&self) -> f64 {
        match self.unit {
            Unit::Lb => 0.5,
            Unit::Kg => 0.25,
        }
    }

    /// Heaviest load the inventory can build
    pub fn max_load(&self) -> f64 {
        let per_side: f64 = self.plates.iter().map(|p| p.weight * p.pairs as f64).sum();
        self.bar + 2.0 * per_side
    }

    /// (plate, pairs) in hundredths, heaviest first, empty stock dropped
    fn denominations(&self) -> Vec<(i64, u32)> {
        let mut plates: Vec<(i64, u32)> = self
            .plates
            .iter()
            .filter(|p| p.pairs > 0)
            .map(|p| (to_hundredths(p.weight), p.pairs))
            .collect();
        plates.sort_by(|a, b| b.0.cmp(&a.0));
        plates
    }

    /// Fewest-plate setup within tolerance of `weight`, if one exists
    pub fn breakdown(&self, weight: f64) -> Option<Loading> {
        self.breakdown_within(weight, to_hundredths(self.tolerance()))
    }

    fn breakdown_within(&self, weight: f64, tolerance: i64) -> Option<Loading> {
        if let Err(e) = self.validate() {
            debug!("Breakdown skipped: {}", e);
            return None;
        }
        // Out-of-range targets never reach the integer search
        let slack = from_hundredths(tolerance) + 0.005;
        if !weight.is_finite() || weight < self.bar - slack || weight > self.max_load() + slack {
            return None;
        }

        let bar = to_hundredths(self.bar);
        let plates_total = to_hundredths(weight) - bar;
        if plates_total < -tolerance {
            return None;
        }

        let denominations = self.denominations();
        let mut search = Search::new(&denominations, plates_total, tolerance);
        search.run(0, 0, 0);

        let counts = search.best?;
        let per_side = expand(&denominations, &counts.0);
        let total = bar + 2 * per_side.iter().sum::<i64>();

        Some(Loading {
            total: from_hundredths(total),
            bar: self.bar,
            per_side: per_side.into_iter().map(from_hundredths).collect(),
        })
    }

    /// Every loadable total, lightest first
    pub fn loadable_totals(&self) -> Vec<f64> {
        if self.validate().is_err() {
            return Vec::new();
        }
        let bar = to_hundredths(self.bar);
        self.per_side_sums()
            .into_iter()
            .map(|s| from_hundredths(bar + 2 * s))
            .collect()
    }

    /// Bounded subset-sum over one sleeve
    fn per_side_sums(&self) -> BTreeSet<i64> {
        let mut sums = BTreeSet::from([0_i64]);
        for (plate, pairs) in self.denominations() {
            let mut next = BTreeSet::new();
            for sum in &sums {
                for count in 0..=pairs as i64 {
                    next.insert(sum + plate * count);
                }
            }
            sums = next;
        }
        sums
    }

    /// Closest loadable setup to `weight` in the given direction
    pub fn round(&self, weight: f64, mode: RoundMode) -> Result<Loading> {
        self.validate()?;

        let bar = to_hundredths(self.bar);
        let totals: Vec<i64> = self
            .per_side_sums()
            .into_iter()
            .map(|s| bar + 2 * s)
            .collect();

        let lightest = totals.first().copied().unwrap_or(bar);
        let heaviest = totals.last().copied().unwrap_or(bar);
        let target = if weight.is_finite() {
            to_hundredths(weight.clamp(from_hundredths(lightest), from_hundredths(heaviest)))
        } else {
            bar
        };

        let chosen = match mode {
            RoundMode::Nearest => totals
                .iter()
                .copied()
                // min_by_key keeps the first of equal keys, so ties go lighter
                .min_by_key(|t| (t - target).abs())
                .unwrap_or(bar),
            RoundMode::Down => totals
                .iter()
                .copied()
                .filter(|t| *t <= target)
                .max()
                .unwrap_or(lightest),
            RoundMode::Up => totals
                .iter()
                .copied()
                .find(|t| *t >= target)
                .unwrap_or(heaviest),
        };

        match self.breakdown_within(from_hundredths(chosen), 0) {
            Some(loading) => Ok(loading),
            None => {
                debug!("No exact breakdown for reachable total {}", chosen);
                Ok(Loading {
                    total: from_hundredths(chosen),
                    bar: self.bar,
                    per_side: Vec::new(),
                })
            }
        }
    }
}

impl Rounder for PlateInventory {
    fn round_weight(&self, weight: f64) -> f64 {
        match self.round(weight, RoundMode::Nearest) {
            Ok(loading) => loading.total,
            Err(e) => {
                debug!("Plate rounding unavailable ({}), keeping {}", e, weight);
                weight
            }
        }
    }
}

/// Depth-first search over denominations, heaviest first
struct Search<'a> {
    plates: &'a [(i64, u32)],
    /// Capacity of denominations from index i onward
    remaining_capacity: Vec<i64>,
    target_total: i64,
    tolerance: i64,
    counts: Vec<u32>,
    /// Plate counts, plates used, gap to target
    best: Option<(Vec<u32>, u32, i64)>,
}

impl<'a> Search<'a> {
    fn new(plates: &'a [(i64, u32)], target_total: i64, tolerance: i64) -> Self {
        let mut remaining_capacity = vec![0_i64; plates.len() + 1];
        for i in (0..plates.len()).rev() {
            remaining_capacity[i] = remaining_capacity[i + 1] + plates[i].0 * plates[i].1 as i64;
        }
        Self {
            plates,
            remaining_capacity,
            target_total,
            tolerance,
            counts: vec![0; plates.len()],
            best: None,
        }
    }

    fn run(&mut self, index: usize, side_sum: i64, used: u32) {
        let gap = (2 * side_sum - self.target_total).abs();

        if gap <= self.tolerance {
            let better = match &self.best {
                None => true,
                Some((_, best_used, best_gap)) => {
                    used < *best_used || (used == *best_used && gap < *best_gap)
                }
            };
            if better {
                self.best = Some((self.counts.clone(), used, gap));
            }
        }

        if index == self.plates.len() {
            return;
        }
        // Already over, or cannot reach the target with what is left
        if 2 * side_sum > self.target_total + self.tolerance {
            return;
        }
        if 2 * (side_sum + self.remaining_capacity[index]) < self.target_total - self.tolerance {
            return;
        }
        if let Some((_, best_used, _)) = &self.best
            && used >= *best_used
        {
            return;
        }

        let (plate, pairs) = self.plates[index];
        for count in (0..=pairs).rev() {
            let added = side_sum + plate * count as i64;
            if 2 * added > self.target_total + self.tolerance {
                continue;
            }
            self.counts[index] = count;
            self.run(index + 1, added, used + count);
        }
        self.counts[index] = 0;
    }
}

fn expand(plates: &[(i64, u32)], counts: &[u32]) -> Vec<i64> {
    plates
        .iter()
        .zip(counts)
        .flat_map(|((plate, _), count)| std::iter::repeat_n(*plate, *count as usize))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn lb() -> PlateInventory {
        PlateInventory::standard(Unit::Lb)
    }

    #[test]
    fn test_standard_inventories() {
        assert_eq!(lb().bar, 45.0);
        assert_eq!(lb().plates.len(), 6);
        let kg = PlateInventory::standard(Unit::Kg);
        assert_eq!(kg.bar, 20.0);
        assert_eq!(kg.plates[0].weight, 25.0);
        assert!(lb().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_setup() {
        assert_eq!(lb().with_bar(0.0).validate(), Err(PlanError::InvalidBar(0.0)));
        assert_eq!(lb().with_plates(&[]).validate(), Err(PlanError::InvalidPlates));
        assert_eq!(
            lb().with_plates(&[(45.0, 2), (-5.0, 2)]).validate(),
            Err(PlanError::InvalidPlates)
        );
    }

    #[test]
    fn test_breakdown_225() {
        let loading = lb().breakdown(225.0).unwrap();
        assert_eq!(loading.total, 225.0);
        assert_eq!(loading.per_side, vec![45.0, 45.0]);
    }

    #[test]
    fn test_breakdown_uses_fewest_plates() {
        let loading = lb().breakdown(315.0).unwrap();
        assert_eq!(loading.per_side, vec![45.0, 45.0, 45.0]);

        let loading = lb().breakdown(135.0).unwrap();
        assert_eq!(loading.per_side, vec![45.0]);

        let loading = lb().breakdown(160.0).unwrap();
        assert_eq!(loading.per_side, vec![45.0, 10.0, 2.5]);
    }

    #[test]
    fn test_breakdown_empty_bar() {
        let loading = lb().breakdown(45.0).unwrap();
        assert!(loading.per_side.is_empty());
        assert_eq!(loading.total, 45.0);
    }

    #[test]
    fn test_breakdown_unreachable() {
        // Needs 1.25 per side
        assert!(lb().breakdown(227.5).is_none());
        assert!(lb().breakdown(40.0).is_none());
        assert!(lb().breakdown(f64::NAN).is_none());
        // More than the rack holds
        assert!(lb().breakdown(5000.0).is_none());
    }

    #[test]
    fn test_breakdown_within_tolerance() {
        // 225.4 is within 0.5 lb of 225
        let loading = lb().breakdown(225.4).unwrap();
        assert_eq!(loading.total, 225.0);
    }

    #[test]
    fn test_breakdown_respects_stock() {
        // Only one pair of 45s: 225 must use other plates
        let inventory = lb().with_plates(&[(45.0, 1), (25.0, 4), (10.0, 4), (5.0, 2)]);
        let loading = inventory.breakdown(225.0).unwrap();
        assert_eq!(loading.per_side, vec![45.0, 25.0, 10.0, 10.0]);
        assert_eq!(loading.per_side_weight(), 90.0);
    }

    #[test]
    fn test_breakdown_kg() {
        let kg = PlateInventory::standard(Unit::Kg);
        let loading = kg.breakdown(102.5).unwrap();
        assert_eq!(loading.per_side, vec![25.0, 15.0, 1.25]);
    }

    #[test]
    fn test_round_nearest() {
        let loading = lb().round(227.0, RoundMode::Nearest).unwrap();
        assert_eq!(loading.total, 225.0);
        let loading = lb().round(228.0, RoundMode::Nearest).unwrap();
        assert_eq!(loading.total, 230.0);
    }

    #[test]
    fn test_round_nearest_tie_goes_lighter() {
        let loading = lb().round(227.5, RoundMode::Nearest).unwrap();
        assert_eq!(loading.total, 225.0);
    }

    #[test]
    fn test_round_directions() {
        assert_eq!(lb().round(229.0, RoundMode::Down).unwrap().total, 225.0);
        assert_eq!(lb().round(221.0, RoundMode::Up).unwrap().total, 225.0);
        assert_eq!(lb().round(225.0, RoundMode::Up).unwrap().total, 225.0);
    }

    #[test]
    fn test_round_clamps_to_bar_and_max() {
        assert_eq!(lb().round(20.0, RoundMode::Nearest).unwrap().total, 45.0);
        assert_eq!(lb().round(20.0, RoundMode::Down).unwrap().total, 45.0);
        let max = lb().max_load();
        assert_eq!(lb().round(max + 100.0, RoundMode::Up).unwrap().total, max);
    }

    #[test]
    fn test_extreme_targets_clamp_without_overflow() {
        let max = lb().max_load();
        assert_eq!(lb().round(-1e20, RoundMode::Nearest).unwrap().total, 45.0);
        assert_eq!(lb().round(-1e20, RoundMode::Up).unwrap().total, 45.0);
        assert_eq!(lb().round(1e20, RoundMode::Nearest).unwrap().total, max);
        assert_eq!(lb().round(1e20, RoundMode::Down).unwrap().total, max);
        assert_eq!(lb().round(f64::NEG_INFINITY, RoundMode::Nearest).unwrap().total, 45.0);
        assert!(lb().breakdown(-1e20).is_none());
        assert!(lb().breakdown(1e20).is_none());
    }

    #[test]
    fn test_parse_round_mode() {
        assert_eq!("Down".parse::<RoundMode>(), Ok(RoundMode::Down));
        assert!("sideways".parse::<RoundMode>().is_err());
    }

    #[test]
    fn test_round_invalid_inventory() {
        assert!(lb().with_bar(-1.0).round(100.0, RoundMode::Nearest).is_err());
    }

    #[test]
    fn test_rounder_impl() {
        assert_eq!(lb().round_weight(187.0), 185.0);
        assert_eq!(lb().with_plates(&[]).round_weight(187.0), 187.0);
    }

    #[test]
    fn test_loadable_totals_sorted() {
        let inventory = PlateInventory::standard(Unit::Lb).with_plates(&[(45.0, 1), (10.0, 1)]);
        assert_eq!(inventory.loadable_totals(), vec![45.0, 65.0, 135.0, 155.0]);
    }

    #[test]
    fn test_describe() {
        let loading = lb().breakdown(185.0).unwrap();
        assert_eq!(loading.describe(Unit::Lb), "185 lb (45 lb bar, per side: 45, 25)");
        let empty = lb().breakdown(45.0).unwrap();
        assert!(empty.describe(Unit::Lb).contains("empty bar"));
    }

    proptest! {
        #[test]
        fn prop_breakdown_sums_to_weight(weight in (4500u32..80_000).prop_map(|h| h as f64 / 100.0)) {
            if let Some(loading) = lb().breakdown(weight) {
                let built = loading.bar + 2.0 * loading.per_side_weight();
                prop_assert!((built - loading.total).abs() < 1e-9);
                prop_assert!((loading.total - weight).abs() <= 0.5 + 1e-9);
            }
        }

        #[test]
        fn prop_round_directions_hold(weight in 45.0f64..900.0) {
            let inventory = lb();
            let down = inventory.round(weight, RoundMode::Down).unwrap().total;
            let up = inventory.round(weight, RoundMode::Up).unwrap().total;
            let nearest = inventory.round(weight, RoundMode::Nearest).unwrap().total;
            prop_assert!(down <= weight + 0.005);
            prop_assert!(up + 0.005 >= weight);
            prop_assert!(nearest == down || nearest == up);
        }
    }
}
