use std::env;

use anyhow::Result;
use waratah_api::build_app;
use waratah_observability::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("waratah_api");

    let places = env::var("WARATAH_PLACES").unwrap_or_else(|_| "data/places.json".to_string());
    let bind = env::var("WARATAH_BIND").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

    let app = build_app(&places)?;

    let listener = tokio::net::TcpListener::bind(&bind).await?;
    tracing::info!(bind = %bind, places = %places, "waratah concierge api started");

    axum::serve(listener, app).await?;
    Ok(())
}
