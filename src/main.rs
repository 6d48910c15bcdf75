mod config;
mod rate_limit;
mod routes;
mod services;
mod state;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = config::AppConfig::from_env();
    match config.mode {
        config::Mode::Demo => tracing::warn!(
            "demo mode active: identity provider not configured; auth state is local and fabricated"
        ),
        config::Mode::Live => tracing::info!(provider = %config.provider_url, "live mode: identity provider configured"),
    }

    let port = config.port;
    let state = state::AppState::new(config);
    let app = routes::app(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "vibestack listening");
    axum::serve(listener, app).await.expect("server failed");
}
