use quiz_backend::{
    config::{get_config, init_config},
    database::pool::{create_pool, run_migrations},
    routes,
    utils::logging::init_tracing,
    AppState,
};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;

const EVICTION_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_config()?;
    let config = get_config();
    init_tracing(config.log_format);

    let pool = create_pool(&config.database_url).await?;
    run_migrations(&pool).await?;

    let app_state = AppState::new(pool, config)?;

    {
        let sessions = app_state.sessions.clone();
        let ttl = Duration::from_secs(config.session_ttl_minutes * 60);
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(EVICTION_INTERVAL).await;
                let evicted = sessions.evict_idle(ttl);
                if evicted > 0 {
                    info!(evicted, remaining = sessions.len(), "Evicted idle quiz sessions");
                }
            }
        });
    }

    let app = routes::router(app_state);

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
