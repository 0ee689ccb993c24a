/**
 * Interphone Server Entry Point
 *
 * Loads configuration (an optional TOML file named by `INTERPHONE_CONFIG`, then
 * environment variables), initializes tracing and serves the Axum app.
 */

#[cfg(feature = "ssr")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use interphone::shared::AppConfig;

    // Load environment variables from .env file if present
    dotenv::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&env_filter))
        .init();

    let config = match std::env::var("INTERPHONE_CONFIG") {
        Ok(path) => {
            tracing::info!("Loading configuration from {}", path);
            AppConfig::load(&path)?
        }
        Err(_) => AppConfig::from_env()?,
    };

    let port = config.server_port;
    let app = interphone::backend::create_app(config).await;

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(not(feature = "ssr"))]
fn main() {
    eprintln!("Server requires the 'ssr' feature to be enabled.");
    eprintln!("Run with: cargo run --bin interphone-server --features ssr");
    std::process::exit(1);
}
