//! e1RM trend estimation using linear regression (linfa)

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use linfa::prelude::*;
use linfa_linear::LinearRegression;
use ndarray::{Array1, Array2};
use serde::Serialize;

use crate::analysis::estimate::Formula;
use crate::session::Session;

/// Minimum data points required for fitting
const MIN_DATA_POINTS: usize = 3;

/// Points needed before a flat trend counts as a stall
const STALL_MIN_POINTS: usize = 4;

/// Linear fit of best e1RM against days since the first session
#[derive(Debug, Clone, Serialize)]
pub struct TrendEstimate {
    slope: f64,
    intercept: f64,
    r2_score: f64,
    data_points: usize,
    first_date: DateTime<Utc>,
    last_day: f64,
}

impl TrendEstimate {
    /// Fit from sessions; `None` without enough distinct days
    pub fn fit(sessions: &[Session], formula: Formula) -> Option<Self> {
        let measured: Vec<(&Session, f64)> = sessions
            .iter()
            .filter_map(|s| s.best_e1rm(formula).map(|e| (s, e)))
            .collect();

        if measured.len() < MIN_DATA_POINTS {
            return None;
        }

        // All on one training day, slope is meaningless
        let days: BTreeSet<_> = measured.iter().map(|(s, _)| s.local_day()).collect();
        if days.len() < 2 {
            return None;
        }

        let points: Vec<(DateTime<Utc>, f64)> = measured.iter().map(|(s, e)| (s.date, *e)).collect();

        let first_date = points.iter().map(|(d, _)| *d).min()?;

        // X = days since first session, Y = e1RM
        let mut x_data: Vec<f64> = Vec::new();
        let mut y_data: Vec<f64> = Vec::new();

        for (date, e1rm) in &points {
            x_data.push((*date - first_date).num_seconds() as f64 / 86_400.0);
            y_data.push(*e1rm);
        }

        let last_day = x_data.iter().copied().fold(0.0, f64::max);

        let n_samples = x_data.len();
        let records = Array2::from_shape_vec((n_samples, 1), x_data).ok()?;
        let targets = Array1::from_vec(y_data);
        let dataset = Dataset::new(records, targets);

        let model = LinearRegression::default().fit(&dataset).ok()?;

        let slope = model.params()[0];
        let intercept = model.intercept();

        let predictions = model.predict(&dataset);
        let r2_score = predictions.r2(&dataset).unwrap_or(0.0);

        Some(Self {
            slope,
            intercept,
            r2_score,
            data_points: n_samples,
            first_date,
            last_day,
        })
    }

    pub fn per_day(&self) -> f64 {
        self.slope
    }

    pub fn per_week(&self) -> f64 {
        self.slope * 7.0
    }

    /// R2 score (fit quality, 0-1)
    pub fn r2_score(&self) -> f64 {
        self.r2_score
    }

    pub fn data_points(&self) -> usize {
        self.data_points
    }

    pub fn first_date(&self) -> DateTime<Utc> {
        self.first_date
    }

    /// e1RM expected `days` after the latest session
    pub fn predict(&self, days: f64) -> f64 {
        self.slope * (self.last_day + days) + self.intercept
    }

    /// Flat or falling over enough sessions
    pub fn is_stalled(&self) -> bool {
        self.data_points >= STALL_MIN_POINTS && self.per_week() <= 0.0
    }
}
