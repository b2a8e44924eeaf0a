mod cli;
mod context;
mod definition;
mod executor;
mod init;
mod monitor;
mod progress;
mod run;
mod shutdown;
mod types;

pub use cli::parse_vu_behaviour;

pub mod prelude {
    pub use crate::cli::StressScenarioCli;
    pub use crate::context::{RunnerContext, UserValuesConstraint, VuContext};
    pub use crate::definition::{HookResult, ScenarioDefinitionBuilder};
    pub use crate::run::run;
    pub use crate::types::StressResult;

    pub use stress_core::prelude::VuBailError;
    pub use stress_instruments::{check, Reporter, ReporterOpt, Threshold};
}
