use provecho_core::Config;
use provecho_web::{AppState, VERSION, app};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!("Starting Provecho v{}", VERSION);

    // Fail fast on missing or malformed configuration
    let config = Config::from_env().map_err(|e| format!("Configuration error: {}", e))?;

    tracing::info!(
        "Advice model: {} ({} prompt style)",
        config.model,
        config.prompt_style
    );

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());

    let state = AppState::new(config);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| format!("Failed to bind to {}: {}", bind_addr, e))?;

    tracing::info!("Server running at http://{}", bind_addr);

    axum::serve(listener, app(state))
        .await
        .map_err(|e| format!("Server error: {}", e))?;

    Ok(())
}
