use std::fmt;
use std::str::FromStr;

use crate::RunStats;

/// A pass/fail condition over aggregate run statistics, evaluated once at run completion.
///
/// Thresholds are written in the same shape as the rest of the tooling around the ledger uses:
/// `rate<0.01` bounds the request failure rate and `p(95)<200` bounds a duration percentile in
/// milliseconds.
#[derive(Debug, Clone, PartialEq)]
pub enum Threshold {
    /// The fraction of failed operations must stay below the bound.
    FailureRateBelow(f64),
    /// The given duration percentile, in milliseconds, must stay below the bound.
    DurationPercentileBelowMs { percentile: u8, bound_ms: f64 },
}

impl Threshold {
    /// Evaluate this threshold against the run statistics, returning a violation if it was
    /// breached. A percentile threshold over a run with no completed operations passes, since
    /// there is no latency to bound.
    pub fn evaluate(&self, stats: &RunStats) -> Option<ThresholdViolation> {
        match self {
            Threshold::FailureRateBelow(bound) => {
                let actual = stats.failure_rate();
                (actual >= *bound).then(|| ThresholdViolation {
                    threshold: self.clone(),
                    actual,
                })
            }
            Threshold::DurationPercentileBelowMs {
                percentile,
                bound_ms,
            } => {
                let actual = stats.duration_percentile_ms(*percentile)?;
                (actual >= *bound_ms).then(|| ThresholdViolation {
                    threshold: self.clone(),
                    actual,
                })
            }
        }
    }
}

impl FromStr for Threshold {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lhs, bound) = s
            .split_once('<')
            .ok_or_else(|| anyhow::anyhow!("Threshold expression must contain '<': {}", s))?;

        let bound: f64 = bound
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("Threshold bound is not a number: {}", bound))?;

        match lhs.trim() {
            "rate" => {
                if !(0.0..=1.0).contains(&bound) {
                    anyhow::bail!("Failure rate bound must be within [0, 1]: {}", bound);
                }
                Ok(Threshold::FailureRateBelow(bound))
            }
            lhs if lhs.starts_with("p(") && lhs.ends_with(')') => {
                let percentile: u8 = lhs[2..lhs.len() - 1]
                    .parse()
                    .map_err(|_| anyhow::anyhow!("Invalid percentile in threshold: {}", lhs))?;
                if percentile == 0 || percentile > 100 {
                    anyhow::bail!("Percentile must be within [1, 100]: {}", percentile);
                }
                Ok(Threshold::DurationPercentileBelowMs {
                    percentile,
                    bound_ms: bound,
                })
            }
            other => anyhow::bail!("Unknown threshold metric: {}", other),
        }
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Threshold::FailureRateBelow(bound) => write!(f, "rate<{}", bound),
            Threshold::DurationPercentileBelowMs {
                percentile,
                bound_ms,
            } => write!(f, "p({})<{}", percentile, bound_ms),
        }
    }
}

/// A threshold that was breached, with the value actually observed.
#[derive(Debug, Clone)]
pub struct ThresholdViolation {
    pub threshold: Threshold,
    pub actual: f64,
}

impl fmt::Display for ThresholdViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.threshold {
            Threshold::FailureRateBelow(_) => {
                write!(
                    f,
                    "threshold '{}' breached: failure rate was {:.4}",
                    self.threshold, self.actual
                )
            }
            Threshold::DurationPercentileBelowMs { percentile, .. } => {
                write!(
                    f,
                    "threshold '{}' breached: p({}) was {:.2}ms",
                    self.threshold, percentile, self.actual
                )
            }
        }
    }
}
