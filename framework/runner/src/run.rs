use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use stress_core::prelude::{ShutdownSignalError, VuBailError};
use stress_instruments::Reporter;

use crate::context::{RunnerContext, UserValuesConstraint, VuContext};
use crate::definition::ScenarioDefinitionBuilder;
use crate::executor::Executor;
use crate::monitor::start_monitor;
use crate::progress::start_progress;
use crate::shutdown::start_shutdown_listener;

/// Run a scenario to completion.
///
/// Blocks until the configured duration has elapsed (or Ctrl-C for soak tests), all virtual
/// users have stopped and the report has been produced. Returns an error if startup fails or if
/// any configured threshold was breached by the completed run.
pub fn run<RV: UserValuesConstraint, V: UserValuesConstraint>(
    definition: ScenarioDefinitionBuilder<RV, V>,
) -> anyhow::Result<()> {
    let definition = definition.build()?;

    log::info!(
        "Running scenario {} [run id {}] with {} VUs",
        definition.name,
        definition.run_id,
        definition.vus
    );

    let runtime = tokio::runtime::Runtime::new().context("Failed to create Tokio runtime")?;
    let shutdown_handle = start_shutdown_listener(&runtime)?;
    let executor = Arc::new(Executor::new(runtime, shutdown_handle.clone()));
    let reporter = Arc::new(Reporter::new(definition.reporter));

    let mut runner_context = RunnerContext::new(
        executor,
        reporter.clone(),
        shutdown_handle.clone(),
        definition.target.clone(),
        definition.run_id.clone(),
    );

    // A failure here is fatal: the run must abort before any VU starts.
    if let Some(setup_fn) = &definition.setup_fn {
        setup_fn(&mut runner_context)?;
    }

    // Once setup has run, a time-bounded scenario needs its duration timer and progress display.
    if let Some(duration) = definition.duration_s {
        if !definition.no_progress {
            start_progress(
                Duration::from_secs(duration),
                shutdown_handle.new_listener(),
            );
        }

        let shutdown_handle = shutdown_handle.clone();
        runner_context.executor().spawn(async move {
            tokio::time::sleep(Duration::from_secs(duration)).await;
            shutdown_handle.shutdown();
        });
    }

    let runner_context = Arc::new(runner_context);
    let runner_context_for_teardown = runner_context.clone();

    // Ready to start spinning up VUs, so start the resource monitor to warn if the load
    // generator itself runs hot enough to skew the results.
    start_monitor(shutdown_handle.new_listener());

    let assigned_behaviours = definition.assigned_behaviours_flat();

    let mut handles = Vec::new();
    for (vu_index, assigned_behaviour) in assigned_behaviours.iter().enumerate() {
        // Read access to the runner context for each VU
        let runner_context = runner_context.clone();

        let setup_vu_fn = definition.setup_vu_fn;
        let vu_behaviour_fn = definition.vu_behaviour.get(assigned_behaviour).copied();
        let teardown_vu_fn = definition.teardown_vu_fn;

        // For checking whether the VU should stop between behaviour cycles
        let mut cycle_shutdown_listener = shutdown_handle.new_listener();
        // For the behaviour implementation to respond to shutdown while mid-cycle
        let delegated_shutdown_listener = shutdown_handle.new_listener();

        let vu_id = format!("vu-{}", vu_index);

        handles.push(
            std::thread::Builder::new()
                .name(vu_id.clone())
                .spawn(move || {
                    let mut context = VuContext::new(
                        vu_id.clone(),
                        runner_context,
                        delegated_shutdown_listener,
                    );

                    if let Some(setup_vu_fn) = setup_vu_fn {
                        if let Err(e) = setup_vu_fn(&mut context) {
                            log::error!("VU setup failed for {}: {:?}", vu_id, e);
                            return;
                        }
                    }

                    if let Some(behaviour) = vu_behaviour_fn {
                        loop {
                            if cycle_shutdown_listener.should_shutdown() {
                                log::debug!("Stopping {}", vu_id);
                                break;
                            }

                            match behaviour(&mut context) {
                                Ok(()) => {}
                                Err(e) if e.is::<ShutdownSignalError>() => {
                                    // Expected when the run shuts down mid-cycle. The check at
                                    // the top of the loop will break out.
                                }
                                Err(e) if e.is::<VuBailError>() => {
                                    log::info!("{} is bailing out of the scenario", vu_id);
                                    break;
                                }
                                Err(e) => {
                                    log::error!("VU behaviour failed: {:?}", e);
                                }
                            }
                        }
                    }

                    if let Some(teardown_vu_fn) = teardown_vu_fn {
                        if let Err(e) = teardown_vu_fn(&mut context) {
                            log::error!("VU teardown failed for {}: {:?}", vu_id, e);
                        }
                    }
                })
                .expect("Failed to spawn thread for VU"),
        );
    }

    for handle in handles {
        handle
            .join()
            .map_err(|e| anyhow::anyhow!("Error joining thread for VU: {:?}", e))?;
    }

    if let Some(teardown_fn) = definition.teardown_fn {
        // Don't fail the run if the teardown fails. The report and the threshold evaluation
        // should still happen. The hook is documented as best effort.
        if let Err(e) = teardown_fn(runner_context_for_teardown) {
            log::error!("Teardown failed: {:?}", e);
        }
    }

    let stats = reporter.finalize();
    log::info!(
        "Run {} complete: {} operations, {} failed",
        definition.run_id,
        stats.total_operations(),
        stats.failed_operations()
    );

    let violations = definition
        .thresholds
        .iter()
        .filter_map(|threshold| threshold.evaluate(&stats))
        .collect::<Vec<_>>();

    if !violations.is_empty() {
        for violation in &violations {
            log::error!("{}", violation);
        }
        anyhow::bail!(
            "Run failed: {}",
            violations
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ")
        );
    }

    Ok(())
}
