use axum::{
    Extension, Router,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use std::{net::SocketAddr, str::FromStr, sync::Arc};

use crate::{Res, api, config, discogs::MusicSource, info, management::Collection};

/// What the HTTP handlers share with the rest of the process.
pub struct AppState {
    pub collection: Collection,
    pub source: Arc<dyn MusicSource>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(collection: Collection, source: Arc<dyn MusicSource>) -> Self {
        Self {
            collection,
            source,
            started_at: Utc::now(),
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", post(api::barcode).fallback(api::invalid_method))
        .route("/health", get(api::health))
        .layer(Extension(state))
}

/// Serves the barcode listener on `SERVER_ADDRESS` until the process ends.
///
/// # Errors
///
/// Fails when the address cannot be parsed or bound.
pub async fn start_api_server(state: Arc<AppState>) -> Res<()> {
    let addr = SocketAddr::from_str(&config::server_addr())
        .map_err(|e| format!("Failed to parse server address: {}", e))?;

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening for barcodes on http://{}/", addr);
    axum::serve(listener, router(state)).await?;
    Ok(())
}
