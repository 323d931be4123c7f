//! # Discogs Integration Module
//!
//! This module is the boundary to the Discogs database. Everything above it
//! talks to the [`MusicSource`] trait only, so lookups, enrichment and the
//! session can run against an in-memory source in tests.
//!
//! ## Overview
//!
//! ```text
//! Session / Enrichment / HTTP listener
//!          ↓
//! Release Lookup
//!          ↓
//! MusicSource (trait)
//!          ↓
//! DiscogsClient ── FetchGate (one permit per request)
//!          ↓
//! Discogs REST API
//! ```
//!
//! ## API Coverage
//!
//! - `GET /database/search` - search by barcode or free text, releases only
//! - `GET /releases/{id}` - release detail, used for the tracklist
//! - `GET /marketplace/price_suggestions/{id}` - suggested price per condition
//! - cover image URLs returned in search results
//!
//! ## Authentication
//!
//! Discogs accepts either a personal access token or a consumer key and
//! secret. Both are sent in the `Authorization` header, see
//! [`crate::config::Credentials`].
//!
//! ## Rate Limiting
//!
//! Each attempt first takes a permit from the shared [`crate::gate::FetchGate`].
//! A `429 Too Many Requests` answer is retried once after the announced delay.

mod client;

use async_trait::async_trait;
use thiserror::Error;

use crate::{
    config::ConfigError,
    types::{PriceTable, Release, ReleaseDetail},
};

pub use client::DiscogsClient;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },

    #[error("Rate limited by Discogs, retry after {0} seconds")]
    RateLimited(u64),

    #[error("Cannot decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Unavailable(String),
}

/// What a search is looking for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchQuery {
    Barcode(String),
    Text(String),
}

impl SearchQuery {
    /// Treats 8 to 14 digits (EAN-8, UPC-A, EAN-13, ITF-14) as a barcode.
    pub fn detect(input: &str) -> Self {
        let trimmed = input.trim();
        let is_barcode = (8..=14).contains(&trimmed.len())
            && trimmed.chars().all(|c| c.is_ascii_digit());

        if is_barcode {
            SearchQuery::Barcode(trimmed.to_string())
        } else {
            SearchQuery::Text(trimmed.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            SearchQuery::Barcode(s) | SearchQuery::Text(s) => s,
        }
    }

    /// Name of the search parameter this query is sent as.
    pub fn param(&self) -> &'static str {
        match self {
            SearchQuery::Barcode(_) => "barcode",
            SearchQuery::Text(_) => "q",
        }
    }
}

/// The capabilities the catalog needs from a music database.
#[async_trait]
pub trait MusicSource: Send + Sync {
    /// Releases matching the query, best match first.
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Release>, SourceError>;

    async fn release_detail(&self, release_id: u64) -> Result<ReleaseDetail, SourceError>;

    async fn price_suggestions(&self, release_id: u64) -> Result<PriceTable, SourceError>;

    /// Raw bytes behind an image URL.
    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, SourceError>;
}
