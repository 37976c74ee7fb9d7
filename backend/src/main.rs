//! Recreation resource search server.

use std::sync::Arc;

use clap::Parser;
use recreation_backend::{
    api::search::search_repository::PostgresSearchRepository,
    config::ServerConfig,
    db_utils::postgres_utils::create_postgres_pool,
    server::{AppState, create_app, init_logging},
};
use tracing::info;

async fn serve(app: axum::Router, config: &ServerConfig) -> anyhow::Result<()> {
    let addr = config.socket_addr();
    info!(address = %addr, "Server listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();
    init_logging(&config.log_level);

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    info!(
        host = %config.host,
        port = config.port,
        postgres_host = %config.postgres_host,
        postgres_schema = %config.postgres_schema,
        "Starting recreation search server"
    );

    let pool = create_postgres_pool(&config)?;
    let state = AppState {
        repository: Arc::new(PostgresSearchRepository::new(pool)),
        cloudfront_url: config.rst_storage_cloudfront_url.clone(),
    };
    serve(create_app(state), &config).await
}
