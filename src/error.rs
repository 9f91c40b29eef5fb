//! Library error type

use thiserror::Error;

/// Errors raised by the planning calculators
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    #[error("invalid weight: {0}")]
    InvalidWeight(f64),

    #[error("invalid cycle week {0}, expected 1-4")]
    InvalidWeek(u8),

    #[error("invalid stage {stage} for tier {tier}")]
    InvalidStage { tier: String, stage: usize },

    #[error("bar weight must be positive, got {0}")]
    InvalidBar(f64),

    #[error("plate set is empty or contains a non-positive plate")]
    InvalidPlates,

    #[error("unknown unit '{0}'")]
    UnknownUnit(String),

    #[error("unknown methodology '{0}'")]
    UnknownMethod(String),

    #[error("unknown formula '{0}'")]
    UnknownFormula(String),

    #[error("unknown GZCLP tier '{0}'")]
    UnknownTier(String),

    #[error("unknown Texas Method day '{0}'")]
    UnknownDay(String),

    #[error("unknown rounding mode '{0}'")]
    UnknownMode(String),

    #[error("no history for {0}")]
    NoHistory(String),
}

pub type Result<T> = std::result::Result<T, PlanError>;

/// Reject NaN, infinite and non-positive weights
pub(crate) fn ensure_positive(weight: f64) -> Result<f64> {
    if weight.is_finite() && weight > 0.0 {
        Ok(weight)
    } else {
        Err(PlanError::InvalidWeight(weight))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_positive_accepts_weight() {
        assert_eq!(ensure_positive(135.0), Ok(135.0));
    }

    #[test]
    fn test_ensure_positive_rejects_zero_and_nan() {
        assert_eq!(ensure_positive(0.0), Err(PlanError::InvalidWeight(0.0)));
        assert!(ensure_positive(f64::NAN).is_err());
        assert!(ensure_positive(f64::INFINITY).is_err());
        assert!(ensure_positive(-45.0).is_err());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            PlanError::InvalidWeek(5).to_string(),
            "invalid cycle week 5, expected 1-4"
        );
        assert_eq!(PlanError::UnknownUnit("st".into()).to_string(), "unknown unit 'st'");
    }
}
