use stress_core::prelude::DelegatedShutdownListener;
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};

/// Monitor the resource usage of the load-generator process itself and report high usage.
///
/// A load generator that is CPU-bound produces latency numbers that say more about the generator
/// than the target, so the user should know about it. This won't stop the run, it only logs a
/// warning.
pub(crate) fn start_monitor(mut shutdown_listener: DelegatedShutdownListener) {
    std::thread::Builder::new()
        .name("monitor".to_string())
        .spawn(move || {
            let this_process_pid = Pid::from_u32(std::process::id());
            let mut sys = System::new();

            sys.refresh_cpu_usage();
            let cpu_count = sys.cpus().len().max(1);

            loop {
                if shutdown_listener.should_shutdown() {
                    break;
                }

                sys.refresh_processes_specifics(
                    ProcessesToUpdate::Some(&[this_process_pid]),
                    true,
                    ProcessRefreshKind::nothing().with_cpu(),
                );

                if let Some(process) = sys.process(this_process_pid) {
                    // cpu_usage is summed over cores, normalise it to the whole machine.
                    let usage = process.cpu_usage() / cpu_count as f32;
                    if usage > 10.0 {
                        log::warn!(
                            "High CPU usage detected. The load generator is using {:.2}% of the CPU, with {} available cores. Latency results may be skewed",
                            usage,
                            cpu_count
                        );
                    }
                }

                std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
            }
        })
        .expect("Failed to start monitor thread");
}
