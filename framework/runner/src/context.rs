use std::{fmt::Debug, sync::Arc};

use stress_core::prelude::{DelegatedShutdownListener, ShutdownHandle};
use stress_instruments::Reporter;

use crate::executor::Executor;

/// User-defined values attached to a context must satisfy this constraint so that they can be
/// created up front and shared across threads.
pub trait UserValuesConstraint: Default + Debug + Send + Sync + 'static {}

impl UserValuesConstraint for () {}

/// Shared state for the whole run. Each virtual user holds a read-only reference.
#[derive(Debug)]
pub struct RunnerContext<RV: UserValuesConstraint> {
    executor: Arc<Executor>,
    reporter: Arc<Reporter>,
    shutdown_handle: ShutdownHandle,
    target: Option<String>,
    run_id: String,
    value: RV,
}

impl<RV: UserValuesConstraint> RunnerContext<RV> {
    pub(crate) fn new(
        executor: Arc<Executor>,
        reporter: Arc<Reporter>,
        shutdown_handle: ShutdownHandle,
        target: Option<String>,
        run_id: String,
    ) -> Self {
        Self {
            executor,
            reporter,
            shutdown_handle,
            target,
            run_id,
            value: Default::default(),
        }
    }

    pub fn executor(&self) -> &Arc<Executor> {
        &self.executor
    }

    pub fn reporter(&self) -> Arc<Reporter> {
        self.reporter.clone()
    }

    /// The base URL of the service under test, as passed on the command line.
    pub fn target(&self) -> anyhow::Result<&str> {
        self.target
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("This scenario requires a --target to be set"))
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Stop the scenario early. The current behaviour cycle of each VU is allowed to finish.
    pub fn force_stop_scenario(&self) {
        self.shutdown_handle.shutdown();
    }

    pub fn get_mut(&mut self) -> &mut RV {
        &mut self.value
    }

    pub fn get(&self) -> &RV {
        &self.value
    }
}

/// Per-virtual-user state, owned by the thread that runs that VU.
pub struct VuContext<RV: UserValuesConstraint, V: UserValuesConstraint> {
    vu_id: String,
    runner_context: Arc<RunnerContext<RV>>,
    shutdown_listener: DelegatedShutdownListener,
    value: V,
}

impl<RV: UserValuesConstraint, V: UserValuesConstraint> VuContext<RV, V> {
    pub(crate) fn new(
        vu_id: String,
        runner_context: Arc<RunnerContext<RV>>,
        shutdown_listener: DelegatedShutdownListener,
    ) -> Self {
        Self {
            vu_id,
            runner_context,
            shutdown_listener,
            value: Default::default(),
        }
    }

    pub fn vu_id(&self) -> &str {
        &self.vu_id
    }

    pub fn runner_context(&self) -> &Arc<RunnerContext<RV>> {
        &self.runner_context
    }

    pub fn shutdown_listener(&mut self) -> &mut DelegatedShutdownListener {
        &mut self.shutdown_listener
    }

    pub fn get_mut(&mut self) -> &mut V {
        &mut self.value
    }

    pub fn get(&self) -> &V {
        &self.value
    }
}
