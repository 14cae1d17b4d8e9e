use inventory_api::config;
use inventory_api::handlers::AppState;
use inventory_api::routes;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_HOST, API_PORT, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();
    let state = AppState::new(config);

    // The service does not serve traffic without persistence: probe once at
    // startup and exit if the database is unreachable. No retry loop.
    if let Err(e) = state.provider.ping().await {
        tracing::error!("database unreachable at startup: {}", e);
        std::process::exit(1);
    }

    let app = routes::app(state);

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("inventory API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}
