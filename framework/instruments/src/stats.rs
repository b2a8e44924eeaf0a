use crate::checks::CheckRecord;
use crate::OperationRecord;

/// Pass/fail tallies for one named check.
#[derive(Debug, Clone)]
pub struct CheckStats {
    pub name: String,
    pub passes: usize,
    pub fails: usize,
}

/// Aggregate statistics for a completed run, computed once when the reporter is finalized.
///
/// This is what thresholds are evaluated against.
#[derive(Debug, Clone)]
pub struct RunStats {
    total_operations: usize,
    failed_operations: usize,
    sorted_durations_ms: Vec<f64>,
    checks: Vec<CheckStats>,
}

impl RunStats {
    pub(crate) fn from_records(operations: &[OperationRecord], checks: &[CheckRecord]) -> Self {
        let mut sorted_durations_ms = operations
            .iter()
            .filter_map(|record| record.duration())
            .map(|duration| duration.as_micros() as f64 / 1000.0)
            .collect::<Vec<_>>();
        sorted_durations_ms.sort_by(|a, b| a.total_cmp(b));

        let mut check_stats: Vec<CheckStats> = Vec::new();
        for record in checks {
            match check_stats.iter_mut().find(|c| c.name == record.name) {
                Some(stats) => {
                    if record.passed {
                        stats.passes += 1;
                    } else {
                        stats.fails += 1;
                    }
                }
                None => check_stats.push(CheckStats {
                    name: record.name.clone(),
                    passes: record.passed as usize,
                    fails: !record.passed as usize,
                }),
            }
        }

        Self {
            total_operations: operations.len(),
            failed_operations: operations.iter().filter(|r| r.is_error()).count(),
            sorted_durations_ms,
            checks: check_stats,
        }
    }

    pub fn total_operations(&self) -> usize {
        self.total_operations
    }

    pub fn failed_operations(&self) -> usize {
        self.failed_operations
    }

    /// The fraction of operations that failed, in [0, 1]. A run with no operations has a failure
    /// rate of 0.
    pub fn failure_rate(&self) -> f64 {
        if self.total_operations == 0 {
            return 0.0;
        }
        self.failed_operations as f64 / self.total_operations as f64
    }

    /// Nearest-rank percentile of operation duration in milliseconds. `None` when no operation
    /// completed.
    pub fn duration_percentile_ms(&self, percentile: u8) -> Option<f64> {
        if self.sorted_durations_ms.is_empty() {
            return None;
        }
        let n = self.sorted_durations_ms.len();
        let rank = ((percentile as f64 / 100.0) * n as f64).ceil() as usize;
        let index = rank.clamp(1, n) - 1;
        Some(self.sorted_durations_ms[index])
    }

    pub fn checks(&self) -> &[CheckStats] {
        &self.checks
    }
}
