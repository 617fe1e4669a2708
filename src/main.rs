use tracing_subscriber::EnvFilter;

use planner::{bind, serve, Config, FlatFileStorage, Planner, Result};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cfg = Config::load()?;
    init_tracing(&cfg.log_level);

    let storage = FlatFileStorage::new(&cfg.data_file);
    let mut planner = Planner::open(storage)?;
    tracing::info!(
        tasks = planner.store().len(),
        data_file = %cfg.data_file,
        "loaded tasks"
    );

    let listener = bind(&cfg.listen_addr()).await?;
    tracing::info!("Planner running on {}", cfg.url());
    tracing::info!("Open {} in a browser; press Ctrl+C to stop", cfg.url());

    serve(listener, &mut planner, cfg.buffer_size, shutdown_signal()).await
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Resolve on Ctrl+C
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
