use std::sync::Arc;
use tokio::fs;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};
use visit_counter::{
    CounterConfig, FileStore, HttpCounterClient, MemoryStore, VisitCounterController,
    display::TextTarget, page::StaticPage,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = CounterConfig::from_env()?;
    if let Some(parent) = config.state_path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let durable = Arc::new(FileStore::open(&config.state_path));
    // One process is one session.
    let session = Arc::new(MemoryStore::new());
    let service = Arc::new(HttpCounterClient::new(&config)?);
    let target = Arc::new(TextTarget::new());
    let page = StaticPage::new(config.user_agent.clone())
        .automated(config.automated)
        .with_target(target.clone());

    info!("counting visit against {}", config.base_url);
    let controller = VisitCounterController::new(&config, service, durable, session);
    let outcome = controller.initialize(&page).await;
    info!(?outcome, "visit counter finished");

    println!("{}", target.text().unwrap_or_default());
    Ok(())
}
