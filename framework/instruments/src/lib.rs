mod checks;
mod report;
mod stats;
mod thresholds;

pub use checks::{check, CheckRecord};
pub use report::{ReportCollector, Reporter, ReporterOpt};
pub use stats::{CheckStats, RunStats};
pub use thresholds::{Threshold, ThresholdViolation};

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// A single timed operation performed against the target, for example one HTTP request.
///
/// Create the record just before starting the operation and call [OperationRecord::finish] once
/// the outcome is known. Unfinished records are rejected by the reporter.
#[derive(Debug, Clone)]
pub struct OperationRecord {
    operation_id: String,
    started: Instant,
    elapsed: Option<Duration>,
    is_error: bool,
    attr: HashMap<String, String>,
}

impl OperationRecord {
    pub fn new(operation_id: impl Into<String>) -> Self {
        Self {
            operation_id: operation_id.into(),
            started: Instant::now(),
            elapsed: None,
            is_error: false,
            attr: HashMap::new(),
        }
    }

    /// Stop the clock and mark whether the operation failed.
    pub fn finish(mut self, is_error: bool) -> Self {
        self.elapsed = Some(self.started.elapsed());
        self.is_error = is_error;
        self
    }

    /// Attach an attribute to the record, such as the status code of a response.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attr.insert(key.into(), value.into());
        self
    }

    pub fn operation_id(&self) -> &str {
        &self.operation_id
    }

    pub fn duration(&self) -> Option<Duration> {
        self.elapsed
    }

    pub fn is_error(&self) -> bool {
        self.is_error
    }

    pub fn attr(&self) -> &HashMap<String, String> {
        &self.attr
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finish_captures_elapsed_time() {
        let record = OperationRecord::new("op").finish(false);

        assert!(record.duration().is_some());
        assert!(!record.is_error());
    }

    #[test]
    fn attributes_are_kept() {
        let record = OperationRecord::new("op")
            .with_attr("status", "503")
            .finish(true);

        assert_eq!(record.attr().get("status").map(String::as_str), Some("503"));
        assert!(record.is_error());
    }
}
