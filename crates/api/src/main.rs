use std::env;

use anyhow::Result;
use desk_api::build_app;
use desk_observability::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("desk_api");

    let bind = env::var("DESK_BIND").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

    let app = build_app()?;

    let listener = tokio::net::TcpListener::bind(&bind).await?;
    tracing::info!(bind = %bind, "desk relay api started");

    axum::serve(listener, app).await?;
    Ok(())
}
