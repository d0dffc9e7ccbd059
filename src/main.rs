mod config;
mod error;
mod scenario;

use config::ScenarioConfig;
use error::Result;
use scenario::{counter_replicas, dag_branches};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;
use vrds_attest::{ServiceConfigBuilder, SigningAttester};

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = ScenarioConfig::from_env()?;
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.workers)
        .enable_all()
        .build()?;
    rt.block_on(async_main(config))
}

async fn async_main(config: ScenarioConfig) -> Result<()> {
    info!(?config, "starting scenarios");
    let attester = Arc::new(SigningAttester::new(
        ServiceConfigBuilder::new().label("demo").build(),
    ));

    let stats = dag_branches(Arc::clone(&attester), config.replicas).await?;
    stats.report();

    let stats = counter_replicas(Arc::clone(&attester), config.replicas, config.rounds).await?;
    stats.report();

    info!(
        programs = attester.config().key_cache.len(),
        "all scenarios completed"
    );
    Ok(())
}
