use tower_http::trace::TraceLayer;
use tracing_subscriber::{EnvFilter, fmt};

use timesheet::config::AppConfig;
use timesheet::shell::http::router;
use timesheet::shell::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = AppConfig::from_env();
    let listen_address = config.listen_address.clone();
    let state = AppState::in_memory(config);

    let app = router(state).layer(TraceLayer::new_for_http());

    tracing::info!("listening on http://{listen_address}");
    let listener = tokio::net::TcpListener::bind(&listen_address).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
