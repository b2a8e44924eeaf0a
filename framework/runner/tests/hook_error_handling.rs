use std::sync::Arc;
use stress_runner::prelude::{
    run, HookResult, ReporterOpt, RunnerContext, ScenarioDefinitionBuilder, StressScenarioCli,
    UserValuesConstraint, VuBailError, VuContext,
};

#[derive(Default, Debug)]
struct RunnerContextValue {}

impl UserValuesConstraint for RunnerContextValue {}

#[derive(Default, Debug)]
struct VuContextValue {
    value: i32,
}

impl UserValuesConstraint for VuContextValue {}

fn sample_cli_cfg() -> StressScenarioCli {
    StressScenarioCli {
        target: Some("http://localhost:8080".to_string()),
        vus: None,
        behaviour: vec![],
        duration: None,
        soak: false,
        no_progress: true,
        reporter: ReporterOpt::Noop,
        run_id: None,
    }
}

#[test]
fn propagate_error_in_setup_hook() {
    fn setup(_ctx: &mut RunnerContext<RunnerContextValue>) -> HookResult {
        Err(anyhow::anyhow!("Error in setup hook"))
    }

    let scenario = ScenarioDefinitionBuilder::<RunnerContextValue, VuContextValue>::new(
        "propagate_error_in_setup_hook",
        sample_cli_cfg(),
    )
    .with_default_duration_s(5)
    .use_setup(setup)
    .use_vu_behaviour(|_| Ok(()));

    let result = run(scenario);

    assert!(result.is_err());
    assert_eq!(result.unwrap_err().to_string(), "Error in setup hook");
}

#[test]
fn capture_error_in_vu_setup() {
    fn vu_setup(_ctx: &mut VuContext<RunnerContextValue, VuContextValue>) -> HookResult {
        Err(anyhow::anyhow!("Error in VU setup hook"))
    }

    let scenario = ScenarioDefinitionBuilder::<RunnerContextValue, VuContextValue>::new(
        "capture_error_in_vu_setup",
        sample_cli_cfg(),
    )
    .with_default_duration_s(5)
    .use_vu_setup(vu_setup)
    .use_vu_behaviour(|_| Ok(()));

    let result = run(scenario);

    assert!(result.is_ok());
}

#[test]
fn capture_error_in_vu_behaviour_and_continue() {
    fn vu_behaviour(ctx: &mut VuContext<RunnerContextValue, VuContextValue>) -> HookResult {
        if ctx.get().value < 5 {
            ctx.get_mut().value += 1;
        } else {
            // Save time running this test by stopping once this has run a few times.
            ctx.runner_context().force_stop_scenario();
        }

        Err(anyhow::anyhow!("Error in VU behaviour hook"))
    }

    let scenario = ScenarioDefinitionBuilder::<RunnerContextValue, VuContextValue>::new(
        "capture_error_in_vu_behaviour_and_continue",
        sample_cli_cfg(),
    )
    .with_default_duration_s(5)
    .use_vu_behaviour(vu_behaviour);

    let result = run(scenario);

    assert!(result.is_ok());
}

#[test]
fn bail_error_stops_vu_behaviour() {
    fn vu_behaviour_bail(_ctx: &mut VuContext<RunnerContextValue, VuContextValue>) -> HookResult {
        Err(VuBailError::default().into())
    }

    fn vu_behaviour_continue(
        _ctx: &mut VuContext<RunnerContextValue, VuContextValue>,
    ) -> HookResult {
        Ok(())
    }

    let mut cfg = sample_cli_cfg();
    cfg.vus = Some(2);
    cfg.behaviour = vec![("bail".to_string(), 1), ("continue".to_string(), 1)];
    let scenario = ScenarioDefinitionBuilder::<RunnerContextValue, VuContextValue>::new(
        "bail_error_stops_vu_behaviour",
        cfg,
    )
    .with_default_duration_s(1)
    .use_named_vu_behaviour("bail", vu_behaviour_bail)
    .use_named_vu_behaviour("continue", vu_behaviour_continue);

    let result = run(scenario);

    assert!(result.is_ok());
}

#[test]
fn capture_error_in_vu_teardown() {
    fn vu_behaviour(ctx: &mut VuContext<RunnerContextValue, VuContextValue>) -> HookResult {
        ctx.runner_context().force_stop_scenario();
        Ok(())
    }

    fn vu_teardown(_ctx: &mut VuContext<RunnerContextValue, VuContextValue>) -> HookResult {
        Err(anyhow::anyhow!("Error in VU teardown hook"))
    }

    let scenario = ScenarioDefinitionBuilder::<RunnerContextValue, VuContextValue>::new(
        "capture_error_in_vu_teardown",
        sample_cli_cfg(),
    )
    .with_default_duration_s(5)
    .use_vu_behaviour(vu_behaviour)
    .use_vu_teardown(vu_teardown);

    let result = run(scenario);

    assert!(result.is_ok());
}

#[test]
fn capture_error_in_teardown() {
    fn vu_behaviour(ctx: &mut VuContext<RunnerContextValue, VuContextValue>) -> HookResult {
        ctx.runner_context().force_stop_scenario();
        Ok(())
    }

    fn teardown(_ctx: Arc<RunnerContext<RunnerContextValue>>) -> HookResult {
        Err(anyhow::anyhow!("Error in teardown hook"))
    }

    let scenario = ScenarioDefinitionBuilder::<RunnerContextValue, VuContextValue>::new(
        "capture_error_in_teardown",
        sample_cli_cfg(),
    )
    .with_default_duration_s(5)
    .use_vu_behaviour(vu_behaviour)
    .use_teardown(teardown);

    let result = run(scenario);

    assert!(result.is_ok());
}

#[test]
fn unknown_behaviour_assignment_fails_to_start() {
    let mut cfg = sample_cli_cfg();
    cfg.behaviour = vec![("missing".to_string(), 1)];
    let scenario = ScenarioDefinitionBuilder::<RunnerContextValue, VuContextValue>::new(
        "unknown_behaviour_assignment_fails_to_start",
        cfg,
    )
    .with_default_duration_s(1)
    .use_vu_behaviour(|_| Ok(()));

    let result = run(scenario);

    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("Behaviour [missing] is not defined"));
}
