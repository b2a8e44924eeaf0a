mod checks_table;
mod operations_table;

use std::collections::HashMap;

use tabled::settings::Style;
use tabled::Table;

use crate::report::ReportCollector;
use crate::stats::RunStats;
use crate::OperationRecord;

use checks_table::CheckRow;
use operations_table::OperationRow;

/// Prints summary tables of operations and checks at the end of the run.
pub(crate) struct InMemoryReporter;

impl ReportCollector for InMemoryReporter {
    fn report(&self, operations: &[OperationRecord], stats: &RunStats) {
        print_summary_of_operations(operations);
        print_summary_of_checks(stats);
    }
}

fn print_summary_of_operations(operations: &[OperationRecord]) {
    if operations.is_empty() {
        println!("\nNo operations were recorded");
        return;
    }

    println!("\nSummary of operations");
    let rows = operations
        .iter()
        .fold(HashMap::new(), |mut acc, record| {
            acc.entry(record.operation_id().to_string())
                .or_insert_with(Vec::new)
                .push(record);
            acc
        })
        .into_iter()
        .map(|(operation_id, records)| {
            let durations_ms = records
                .iter()
                .filter_map(|record| record.duration())
                .map(|duration| duration.as_micros() as f64 / 1000.0)
                .collect::<Vec<_>>();

            let total_operations = records.len();
            let failed_operations = records.iter().filter(|record| record.is_error()).count();
            let total_duration_ms = durations_ms.iter().sum::<f64>();

            OperationRow {
                operation_id,
                avg_time_ms: total_duration_ms / total_operations as f64,
                min_time_ms: durations_ms.iter().copied().fold(f64::INFINITY, f64::min),
                max_time_ms: durations_ms.iter().copied().fold(0.0, f64::max),
                total_operations,
                failed_operations,
            }
        })
        .collect::<Vec<_>>();

    let mut table = Table::new(rows);
    table.with(Style::modern());

    println!("{table}");
}

fn print_summary_of_checks(stats: &RunStats) {
    if stats.checks().is_empty() {
        return;
    }

    println!("\nSummary of checks");
    let rows = stats
        .checks()
        .iter()
        .map(|check| CheckRow {
            check: check.name.clone(),
            passes: check.passes,
            fails: check.fails,
            pass_rate: check.passes as f64 / (check.passes + check.fails) as f64,
        })
        .collect::<Vec<_>>();

    let mut table = Table::new(rows);
    table.with(Style::modern());

    println!("{table}");
}
