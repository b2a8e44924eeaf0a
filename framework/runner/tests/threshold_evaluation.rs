use stress_instruments::OperationRecord;
use stress_runner::prelude::{
    run, HookResult, ReporterOpt, ScenarioDefinitionBuilder, StressScenarioCli, Threshold,
    UserValuesConstraint, VuContext,
};

#[derive(Default, Debug)]
struct NoRunnerValues {}

impl UserValuesConstraint for NoRunnerValues {}

#[derive(Default, Debug)]
struct CycleCount {
    cycles: u32,
}

impl UserValuesConstraint for CycleCount {}

fn sample_cli_cfg() -> StressScenarioCli {
    StressScenarioCli {
        target: None,
        vus: None,
        behaviour: vec![],
        duration: None,
        soak: false,
        no_progress: true,
        reporter: ReporterOpt::Noop,
        run_id: None,
    }
}

/// Records one operation per cycle and stops the run after ten cycles.
fn recording_behaviour(failing: bool) -> fn(&mut VuContext<NoRunnerValues, CycleCount>) -> HookResult
{
    fn record(ctx: &mut VuContext<NoRunnerValues, CycleCount>, failing: bool) -> HookResult {
        ctx.runner_context()
            .reporter()
            .add_operation(OperationRecord::new("op").finish(failing));

        ctx.get_mut().cycles += 1;
        if ctx.get().cycles >= 10 {
            ctx.runner_context().force_stop_scenario();
        }
        Ok(())
    }

    if failing {
        |ctx| record(ctx, true)
    } else {
        |ctx| record(ctx, false)
    }
}

#[test]
fn breached_failure_rate_threshold_fails_the_run() {
    let scenario = ScenarioDefinitionBuilder::<NoRunnerValues, CycleCount>::new(
        "breached_failure_rate_threshold_fails_the_run",
        sample_cli_cfg(),
    )
    .with_default_duration_s(30)
    .use_threshold("rate<0.01".parse::<Threshold>().unwrap())
    .use_vu_behaviour(recording_behaviour(true));

    let result = run(scenario);

    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("rate<0.01"));
}

#[test]
fn satisfied_thresholds_pass_the_run() {
    let scenario = ScenarioDefinitionBuilder::<NoRunnerValues, CycleCount>::new(
        "satisfied_thresholds_pass_the_run",
        sample_cli_cfg(),
    )
    .with_default_duration_s(30)
    .use_threshold("rate<0.01".parse::<Threshold>().unwrap())
    .use_threshold("p(95)<200".parse::<Threshold>().unwrap())
    .use_vu_behaviour(recording_behaviour(false));

    let result = run(scenario);

    assert!(result.is_ok());
}
