use clap::Parser;
use stress_instruments::ReporterOpt;

#[derive(Parser, Debug)]
#[command(about, long_about = None)]
pub struct StressScenarioCli {
    /// The base URL of the service to put under load, e.g. `http://localhost:8080`
    #[clap(short, long)]
    pub target: Option<String>,

    /// The number of virtual users to run
    #[clap(long)]
    pub vus: Option<usize>,

    /// Assign a behaviour to a number of virtual users. Specify the behaviour and the number of
    /// VUs to assign it to in the format `behaviour:count`. For example `--behaviour=read_heavy:5`.
    ///
    /// Specifying the count is optional and defaults to 1. You can use the flag multiple times to
    /// assign several behaviours.
    ///
    /// The total number of assigned VUs must be less than or equal to the number of VUs for the
    /// scenario. Any remaining VUs are given the default behaviour. If the configuration is
    /// invalid then the scenario will fail to start.
    #[clap(long, short, value_parser = parse_vu_behaviour)]
    pub behaviour: Vec<(String, usize)>,

    /// The number of seconds to run the scenario for
    #[clap(long)]
    pub duration: Option<u64>,

    /// Run this as a soak test, ignoring any configured duration and continuing until stopped
    #[clap(long, default_value = "false")]
    pub soak: bool,

    /// Do not show a progress bar on the CLI.
    ///
    /// Recommended for CI environments where the progress bar is just noise in the captured logs.
    #[clap(long, default_value = "false")]
    pub no_progress: bool,

    /// The reporter to use
    #[arg(long, value_enum, default_value_t = ReporterOpt::InMemory)]
    pub reporter: ReporterOpt,

    /// Set the ID of this run.
    ///
    /// If not set, a random ID is used.
    #[arg(long, short)]
    pub run_id: Option<String>,
}

pub fn parse_vu_behaviour(s: &str) -> anyhow::Result<(String, usize)> {
    let mut parts = s.split(':');
    let name = parts
        .next()
        .map(|s| s.to_string())
        .ok_or(anyhow::anyhow!("No name specified for behaviour"))?;

    let count = parts.next().and_then(|s| s.parse::<usize>().ok()).unwrap_or(1);

    Ok((name, count))
}
