use auth_service::{app, config::AppConfig, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "auth_service=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = AppConfig::from_env()?;
    tracing::info!(
        host = %config.server.host,
        port = config.server.port,
        access_ttl_secs = config.jwt.access_ttl.as_secs(),
        refresh_ttl_secs = config.jwt.refresh_ttl.as_secs(),
        "configuration loaded"
    );

    let state = AppState::init(config).await?;
    let server = state.config.server.clone();
    app::serve(app::build_app(state), &server).await
}
