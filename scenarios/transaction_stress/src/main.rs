mod dataset;
mod synth;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use stress_http_client::prelude::{HttpClientInstrumented, ResponseDescriptor};
use stress_runner::prelude::*;
use url::Url;

use dataset::Dataset;
use synth::synthesize;

#[derive(Debug, Default)]
struct RunnerValues {
    dataset: Option<Arc<Dataset>>,
    transactions_url: Option<Url>,
}

impl UserValuesConstraint for RunnerValues {}

#[derive(Debug, Default)]
struct VuValues {
    client: Option<HttpClientInstrumented>,
}

impl UserValuesConstraint for VuValues {}

fn setup(ctx: &mut RunnerContext<RunnerValues>) -> HookResult {
    let target = ctx.target()?.to_string();
    let transactions_url = Url::parse(&target)
        .with_context(|| format!("Invalid target URL: {}", target))?
        .join("transactions")
        .context("Failed to build the transactions endpoint URL")?;

    let data_path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/account_ids.csv");
    let dataset = Arc::new(Dataset::load(&data_path)?);
    log::info!(
        "Loaded {} account identifiers from {}",
        dataset.len(),
        data_path.display()
    );

    ctx.get_mut().dataset = Some(dataset);
    ctx.get_mut().transactions_url = Some(transactions_url);

    Ok(())
}

fn vu_setup(ctx: &mut VuContext<RunnerValues, VuValues>) -> HookResult {
    let client = HttpClientInstrumented::new(ctx.runner_context().reporter())?;
    ctx.get_mut().client = Some(client);

    Ok(())
}

fn vu_behaviour(ctx: &mut VuContext<RunnerValues, VuValues>) -> HookResult {
    let runner_context = ctx.runner_context().clone();
    let dataset = runner_context
        .get()
        .dataset
        .clone()
        .context("Dataset was not loaded during setup")?;
    let url = runner_context
        .get()
        .transactions_url
        .clone()
        .context("Transactions URL was not configured during setup")?;

    let request = synthesize(&dataset, &mut rand::thread_rng());

    let client = ctx
        .get()
        .client
        .as_ref()
        .context("HTTP client was not created during VU setup")?;

    let response = runner_context
        .executor()
        .execute_in_place(async { Ok(client.post_json("http_req", url, &request).await) })?;

    check(
        &runner_context.reporter(),
        &response,
        &[("is status 201", |r: &ResponseDescriptor| r.is_status(201))],
    );

    Ok(())
}

fn main() -> StressResult<()> {
    let builder = ScenarioDefinitionBuilder::<RunnerValues, VuValues>::new_with_init(env!(
        "CARGO_PKG_NAME"
    ))
    .with_default_vus(200)
    .with_default_duration_s(20)
    .use_threshold("rate<0.01".parse()?)
    .use_threshold("p(95)<200".parse()?)
    .use_setup(setup)
    .use_vu_setup(vu_setup)
    .use_vu_behaviour(vu_behaviour);

    run(builder)?;

    Ok(())
}
