mod in_memory_reporter;

use parking_lot::Mutex;

use crate::checks::CheckRecord;
use crate::stats::RunStats;
use crate::OperationRecord;

use in_memory_reporter::InMemoryReporter;

/// Which report to produce at the end of a run.
#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq)]
pub enum ReporterOpt {
    /// Keep all records in memory and print summary tables when the run completes.
    #[default]
    InMemory,
    /// Discard the report. The statistics for threshold evaluation are still collected.
    Noop,
}

/// A sink for the end-of-run report.
pub trait ReportCollector: Send + Sync {
    fn report(&self, operations: &[OperationRecord], stats: &RunStats);
}

struct NoopReporter;

impl ReportCollector for NoopReporter {
    fn report(&self, _operations: &[OperationRecord], _stats: &RunStats) {}
}

/// Collects operation and check records from every virtual user.
///
/// The reporter sits on the hot path of each VU loop, so recording is a single lock acquisition
/// and a push. Everything else is deferred to [Reporter::finalize].
pub struct Reporter {
    operations: Mutex<Vec<OperationRecord>>,
    checks: Mutex<Vec<CheckRecord>>,
    collector: Box<dyn ReportCollector>,
}

impl std::fmt::Debug for Reporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reporter")
            .field("operations", &self.operations.lock().len())
            .field("checks", &self.checks.lock().len())
            .finish_non_exhaustive()
    }
}

impl Reporter {
    pub fn new(opt: ReporterOpt) -> Self {
        let collector: Box<dyn ReportCollector> = match opt {
            ReporterOpt::InMemory => Box::new(InMemoryReporter),
            ReporterOpt::Noop => Box::new(NoopReporter),
        };

        Self {
            operations: Mutex::new(Vec::new()),
            checks: Mutex::new(Vec::new()),
            collector,
        }
    }

    pub fn add_operation(&self, record: OperationRecord) {
        if record.duration().is_none() {
            log::warn!(
                "Dropping unfinished operation record: {}",
                record.operation_id()
            );
            return;
        }
        self.operations.lock().push(record);
    }

    pub fn add_check(&self, record: CheckRecord) {
        self.checks.lock().push(record);
    }

    /// Produce the configured report and return the aggregate statistics for threshold
    /// evaluation. Call once, after all virtual users have stopped.
    pub fn finalize(&self) -> RunStats {
        let operations = self.operations.lock();
        let checks = self.checks.lock();
        let stats = RunStats::from_records(&operations, &checks);

        self.collector.report(&operations, &stats);

        stats
    }
}
