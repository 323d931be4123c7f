use std::sync::Arc;

use axum::{Extension, http::StatusCode};

use crate::{
    cli::fatal_write,
    discogs::SearchQuery,
    info,
    lookup::{self, LookupResult},
    management::StoreError,
    server::AppState,
    success, warning,
};

/// Takes a raw barcode as request body, looks it up and stores the match.
///
/// There is nobody to confirm over HTTP, so like a scan from a hardware
/// scanner a new match is saved right away.
pub async fn barcode(
    Extension(state): Extension<Arc<AppState>>,
    body: String,
) -> (StatusCode, String) {
    let barcode = body.trim();
    if barcode.is_empty() {
        return (StatusCode::BAD_REQUEST, "Error: Empty barcode".to_string());
    }

    info!("Received barcode {} over HTTP.", barcode);
    let query = SearchQuery::Barcode(barcode.to_string());

    let record = match lookup::lookup_query(state.source.as_ref(), &query).await {
        Ok(LookupResult::Found(record)) => record,
        Ok(LookupResult::NotFound { key }) => {
            warning!("No record found with barcode {}.", key);
            return (
                StatusCode::OK,
                format!("Success: no record found with barcode {}", key),
            );
        }
        Err(e) => {
            warning!("{}", e);
            return (StatusCode::BAD_GATEWAY, format!("Error: {}", e));
        }
    };

    let title = record.title().unwrap_or_default().to_string();
    let key = record.key.clone();

    match state.collection.insert(record).await {
        Ok(()) => {
            success!("Record {} ({}) saved.", key, title);
            (StatusCode::OK, format!("Success: saved {}", title))
        }
        Err(StoreError::DuplicateKey(key)) => {
            info!("Record {} is already in the collection.", key);
            (
                StatusCode::OK,
                format!("Success: {} is already in the collection", key),
            )
        }
        Err(e) if e.is_write() => fatal_write(&state.collection, e),
        Err(e) => {
            warning!("Failed to load collection. Err: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, format!("Error: {}", e))
        }
    }
}

pub async fn invalid_method() -> (StatusCode, &'static str) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        "Error: Invalid request method",
    )
}
