use crate::cli::StressScenarioCli;
use clap::Parser;

/// Initialise logging and parse the CLI for a scenario binary.
pub(crate) fn init() -> StressScenarioCli {
    env_logger::init();

    StressScenarioCli::parse()
}
