use dotenvy::dotenv;
use tracing::info;

mod app;
mod common;
mod config;
mod docs;
mod infrastructure;
mod modules;
mod routes;
mod state;
mod transcode;

#[tokio::main]
async fn main() {
    dotenv().ok();

    let config = config::settings::AppConfig::from_env();

    init_tracing(&config.log_file).expect("Failed to open log file");

    info!("Starting server...");

    let storage = infrastructure::storage::local::LocalStorage::new(&config.upload_dir)
        .expect("Failed to prepare upload directory");

    let addr = format!("0.0.0.0:{}", config.server_port);
    let state = state::AppState::new(config, storage);

    let app = app::create_app(state).await;

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    info!("Server running on http://{}", addr);

    axum::serve(listener, app).await.unwrap();
}

/// Logs to stdout and appends to the configured log file, `debug` and above
/// unless `RUST_LOG` says otherwise.
fn init_tracing(log_file: &std::path::Path) -> std::io::Result<()> {
    use std::fs::OpenOptions;
    use std::sync::Arc;
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let file = OpenOptions::new().create(true).append(true).open(log_file)?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .with(fmt::layer())
        .with(fmt::layer().with_ansi(false).with_writer(Arc::new(file)))
        .init();

    Ok(())
}
