use std::sync::Arc;

use microblog::{cache::PageCache, config::Config, init_db, run_app, AppState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;
    let pool = init_db(&config.database_url).await?;
    let state = AppState {
        pool,
        cache: Arc::new(PageCache::new(config.cache_ttl)),
        media_root: config.media_root.clone(),
    };
    tracing::info!(address = %config.bind_addr, "server started");
    run_app(state, config.bind_addr).await
}
