use std::collections::HashMap;
use std::sync::Arc;

use stress_instruments::Threshold;

use crate::cli::StressScenarioCli;
use crate::context::{RunnerContext, UserValuesConstraint, VuContext};

pub type HookResult = anyhow::Result<()>;

pub type GlobalHookMut<RV> = fn(&mut RunnerContext<RV>) -> HookResult;
pub type GlobalHook<RV> = fn(Arc<RunnerContext<RV>>) -> HookResult;
pub type VuHookMut<RV, V> = fn(&mut VuContext<RV, V>) -> HookResult;

/// The builder for a scenario definition.
///
/// This must be used at the start of a scenario binary to define what you want to run.
pub struct ScenarioDefinitionBuilder<RV: UserValuesConstraint, V: UserValuesConstraint> {
    /// The name of the scenario, which should be unique within the test suite.
    ///
    /// Recommended value is `env!("CARGO_PKG_NAME")`.
    name: String,
    cli: StressScenarioCli,
    /// The number of VUs to run when `--vus` is not given on the command line.
    default_vus: usize,
    /// The run duration to use when `--duration` is not given on the command line.
    default_duration_s: Option<u64>,
    /// Thresholds evaluated over the aggregate run statistics once the run completes.
    thresholds: Vec<Threshold>,
    /// Global setup hook, run once before any VU is started. An error here aborts the run.
    setup_fn: Option<GlobalHookMut<RV>>,
    /// Per-VU setup hook, run once as each VU starts. An error stops that VU only.
    setup_vu_fn: Option<VuHookMut<RV, V>>,
    /// The behaviours for this scenario. Most scenarios set a single default behaviour with
    /// [ScenarioDefinitionBuilder::use_vu_behaviour]; named behaviours can be assigned to a
    /// number of VUs with the `--behaviour` flag.
    vu_behaviour: HashMap<String, VuHookMut<RV, V>>,
    /// Per-VU teardown hook, run as each VU stops. Best effort.
    teardown_vu_fn: Option<VuHookMut<RV, V>>,
    /// Global teardown hook, run after all VUs have stopped. Best effort.
    teardown_fn: Option<GlobalHook<RV>>,
}

pub(crate) struct ScenarioDefinition<RV: UserValuesConstraint, V: UserValuesConstraint> {
    pub name: String,
    pub target: Option<String>,
    pub vus: usize,
    pub duration_s: Option<u64>,
    pub no_progress: bool,
    pub reporter: stress_instruments::ReporterOpt,
    pub run_id: String,
    pub thresholds: Vec<Threshold>,
    pub assigned_behaviours: Vec<(String, usize)>,
    pub setup_fn: Option<GlobalHookMut<RV>>,
    pub setup_vu_fn: Option<VuHookMut<RV, V>>,
    pub vu_behaviour: HashMap<String, VuHookMut<RV, V>>,
    pub teardown_vu_fn: Option<VuHookMut<RV, V>>,
    pub teardown_fn: Option<GlobalHook<RV>>,
}

impl<RV: UserValuesConstraint, V: UserValuesConstraint> ScenarioDefinitionBuilder<RV, V> {
    /// Initialise a new scenario definition from the scenario name and command line arguments.
    /// See [ScenarioDefinitionBuilder::name] for more information about the name.
    pub fn new(name: &str, cli: StressScenarioCli) -> Self {
        Self {
            name: name.to_string(),
            cli,
            default_vus: 1,
            default_duration_s: None,
            thresholds: Vec::new(),
            setup_fn: None,
            setup_vu_fn: None,
            vu_behaviour: HashMap::new(),
            teardown_vu_fn: None,
            teardown_fn: None,
        }
    }

    /// Initialise a new scenario definition, parsing the command line arguments and setting up
    /// logging. This is what scenario `main` functions should normally call.
    pub fn new_with_init(name: &str) -> Self {
        Self::new(name, crate::init::init())
    }

    /// Set the number of VUs to use when the command line does not specify one.
    pub fn with_default_vus(mut self, vus: usize) -> Self {
        self.default_vus = vus;
        self
    }

    /// Set the run duration, in seconds, to use when the command line does not specify one.
    pub fn with_default_duration_s(mut self, duration_s: u64) -> Self {
        self.default_duration_s = Some(duration_s);
        self
    }

    /// Add a threshold to evaluate over the aggregate run statistics at run completion. A
    /// breached threshold fails the run as a whole but never aborts it mid-run.
    pub fn use_threshold(mut self, threshold: Threshold) -> Self {
        self.thresholds.push(threshold);
        self
    }

    /// Set the global setup hook [ScenarioDefinitionBuilder::setup_fn] for this scenario.
    pub fn use_setup(mut self, setup_fn: GlobalHookMut<RV>) -> Self {
        self.setup_fn = Some(setup_fn);
        self
    }

    /// Set the VU setup hook [ScenarioDefinitionBuilder::setup_vu_fn] for this scenario.
    pub fn use_vu_setup(mut self, setup_vu_fn: VuHookMut<RV, V>) -> Self {
        self.setup_vu_fn = Some(setup_vu_fn);
        self
    }

    /// Set the default VU behaviour hook for this scenario.
    pub fn use_vu_behaviour(self, behaviour: VuHookMut<RV, V>) -> Self {
        self.use_named_vu_behaviour("default", behaviour)
    }

    /// Set a named VU behaviour hook for this scenario.
    pub fn use_named_vu_behaviour(mut self, name: &str, behaviour: VuHookMut<RV, V>) -> Self {
        let previous = self.vu_behaviour.insert(name.to_string(), behaviour);

        if previous.is_some() {
            panic!("Behaviour [{}] is already defined", name);
        }

        self
    }

    /// Set the VU teardown hook [ScenarioDefinitionBuilder::teardown_vu_fn] for this scenario.
    pub fn use_vu_teardown(mut self, teardown_vu_fn: VuHookMut<RV, V>) -> Self {
        self.teardown_vu_fn = Some(teardown_vu_fn);
        self
    }

    /// Set the global teardown hook [ScenarioDefinitionBuilder::teardown_fn] for this scenario.
    pub fn use_teardown(mut self, teardown_fn: GlobalHook<RV>) -> Self {
        self.teardown_fn = Some(teardown_fn);
        self
    }

    pub(crate) fn build(self) -> anyhow::Result<ScenarioDefinition<RV, V>> {
        let vus = self.cli.vus.unwrap_or(self.default_vus);
        if vus == 0 {
            anyhow::bail!("Cannot run a scenario with zero VUs");
        }

        let duration_s = if self.cli.soak {
            None
        } else {
            self.cli.duration.or(self.default_duration_s)
        };

        let assigned: usize = self.cli.behaviour.iter().map(|(_, count)| count).sum();
        if assigned > vus {
            anyhow::bail!(
                "{} VUs assigned to behaviours but the scenario only runs {} VUs",
                assigned,
                vus
            );
        }
        for (name, _) in &self.cli.behaviour {
            if !self.vu_behaviour.contains_key(name) {
                anyhow::bail!("Behaviour [{}] is not defined by this scenario", name);
            }
        }

        let mut assigned_behaviours = self.cli.behaviour.clone();
        if assigned < vus {
            if !self.vu_behaviour.contains_key("default") {
                anyhow::bail!(
                    "{} VUs are unassigned and this scenario has no default behaviour",
                    vus - assigned
                );
            }
            assigned_behaviours.push(("default".to_string(), vus - assigned));
        }

        Ok(ScenarioDefinition {
            name: self.name,
            target: self.cli.target,
            vus,
            duration_s,
            no_progress: self.cli.no_progress,
            reporter: self.cli.reporter,
            run_id: self
                .cli
                .run_id
                .unwrap_or_else(|| nanoid::nanoid!(8)),
            thresholds: self.thresholds,
            assigned_behaviours,
            setup_fn: self.setup_fn,
            setup_vu_fn: self.setup_vu_fn,
            vu_behaviour: self.vu_behaviour,
            teardown_vu_fn: self.teardown_vu_fn,
            teardown_fn: self.teardown_fn,
        })
    }
}

impl<RV: UserValuesConstraint, V: UserValuesConstraint> ScenarioDefinition<RV, V> {
    /// One behaviour name per VU, in the order the VUs will be started.
    pub(crate) fn assigned_behaviours_flat(&self) -> Vec<String> {
        self.assigned_behaviours
            .iter()
            .flat_map(|(name, count)| std::iter::repeat(name.clone()).take(*count))
            .collect()
    }
}
