use batch_retriever::{
    api::Server,
    config::Config,
    logging,
    orchestration::ManagedOrchestrator,
};
use std::sync::Arc;
use tracing::info;

/// The main entry point for the batch retriever.
///
/// Loads the configuration, initializes logging, builds the orchestrator
/// client and serves the retrieve endpoint until the process stops.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Config first: the log level comes from it.
    let config = Config::load_from_env()?;
    logging::init(&config.logging);
    info!("Batch retriever starting with config: {:?}", config);

    let orchestrator = ManagedOrchestrator::new(&config.orchestrator)?;
    info!("Orchestrator endpoint: {}", orchestrator.run_url());

    let server = Server::new(config, Arc::new(orchestrator));
    server.start().await?;

    Ok(())
}
