//! Release lookup.
//!
//! A lookup runs up to three requests against the music source: the search,
//! then release detail and price suggestions for the first match. Only the
//! first match is considered, there is no ranking between candidates.

use thiserror::Error;

use crate::{
    discogs::{MusicSource, SearchQuery, SourceError},
    types::Record,
};

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Lookup for '{query}' failed: {source}")]
    LookupFailed {
        query: String,
        #[source]
        source: SourceError,
    },
}

/// Outcome of a lookup. Finding nothing is a regular outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupResult {
    Found(Record),
    NotFound { key: String },
}

impl LookupResult {
    pub fn key(&self) -> &str {
        match self {
            LookupResult::Found(record) => &record.key,
            LookupResult::NotFound { key } => key,
        }
    }
}

/// Looks up `input`, detecting whether it is a barcode or a title.
pub async fn lookup<S>(source: &S, input: &str) -> Result<LookupResult, LookupError>
where
    S: MusicSource + ?Sized,
{
    lookup_query(source, &SearchQuery::detect(input)).await
}

/// Looks up an explicit query and builds the record that would be stored.
///
/// # Errors
///
/// Any failing request aborts the lookup with `LookupFailed`; nothing is
/// retried at this level.
pub async fn lookup_query<S>(source: &S, query: &SearchQuery) -> Result<LookupResult, LookupError>
where
    S: MusicSource + ?Sized,
{
    let key = query.as_str().to_string();
    let failed = |source: SourceError| LookupError::LookupFailed {
        query: key.clone(),
        source,
    };

    let mut results = source.search(query).await.map_err(failed)?;
    if results.is_empty() {
        return Ok(LookupResult::NotFound { key: key.clone() });
    }

    let release = results.swap_remove(0);
    let Some(release_id) = release.id else {
        return Err(failed(SourceError::Unavailable(
            "first search match carries no release id".to_string(),
        )));
    };

    let detail = source.release_detail(release_id).await.map_err(failed)?;
    let price_table = source.price_suggestions(release_id).await.map_err(failed)?;

    Ok(LookupResult::Found(Record {
        key,
        release: Some(release),
        tracklist: Some(detail.tracklist),
        price_table: Some(price_table),
    }))
}
