//! Sorted-set scores.
//!
//! Scores are finite doubles with a total order, so they can key ordered
//! structures directly. JSON numbers and numeric strings both convert;
//! everything else is rejected before it reaches a batch.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::errors::{EngineError, EngineResult};

/// A finite sorted-set score.
///
/// Ordering uses `f64::total_cmp`. NaN and infinities are rejected at
/// construction and negative zero collapses to zero, so the total order,
/// equality, and the arithmetic value never disagree.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Score(f64);

impl Score {
    /// Creates a score from a raw double.
    pub fn from_f64(value: f64) -> EngineResult<Self> {
        if !value.is_finite() {
            return Err(EngineError::invalid_score(value.to_string()));
        }
        // collapse -0.0 so total_cmp agrees with ==
        Ok(Score(if value == 0.0 { 0.0 } else { value }))
    }

    /// Creates a score from a JSON property value.
    ///
    /// Accepts finite JSON numbers and strings containing a finite number
    /// (the numeric-string timestamp convention). Everything else is an
    /// [`EngineError::InvalidScore`].
    pub fn from_json(value: &serde_json::Value) -> EngineResult<Self> {
        match value {
            serde_json::Value::Number(n) => match n.as_f64() {
                Some(v) => Self::from_f64(v),
                None => Err(EngineError::invalid_score(value.to_string())),
            },
            serde_json::Value::String(s) => match s.trim().parse::<f64>() {
                Ok(v) if v.is_finite() => Self::from_f64(v),
                _ => Err(EngineError::invalid_score(value.to_string())),
            },
            _ => Err(EngineError::invalid_score(value.to_string())),
        }
    }

    /// The raw double value.
    pub fn get(self) -> f64 {
        self.0
    }
}

impl Eq for Score {}

impl PartialOrd for Score {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Score {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // integral scores print without a fractional part
        if self.0.fract() == 0.0 && self.0.abs() < 1e15 {
            write!(f, "{}", self.0 as i64)
        } else {
            write!(f, "{}", self.0)
        }
    }
}
