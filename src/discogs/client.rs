use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::{
    Client, RequestBuilder, Response, StatusCode,
    header::{AUTHORIZATION, RETRY_AFTER},
};
use serde::de::DeserializeOwned;
use tokio::time::sleep;

use crate::{
    config::{self, Credentials},
    discogs::{MusicSource, SearchQuery, SourceError},
    gate::FetchGate,
    types::{PriceTable, Release, ReleaseDetail, SearchResponse, price_table_from_value},
    warning,
};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Discogs counts its limit over a moving 60 second window.
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

const MAX_RETRY_AFTER_SECS: u64 = 120;

pub struct DiscogsClient {
    http: Client,
    base_url: String,
    credentials: Credentials,
    gate: Arc<FetchGate>,
}

impl DiscogsClient {
    pub fn new(
        base_url: impl Into<String>,
        credentials: Credentials,
        gate: Arc<FetchGate>,
    ) -> Result<Self, SourceError> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
            gate,
        })
    }

    /// Builds a client from the loaded configuration.
    ///
    /// # Errors
    ///
    /// Fails when no Discogs credentials are configured.
    pub fn from_env(gate: Arc<FetchGate>) -> Result<Self, SourceError> {
        Self::new(config::discogs_api_url(), config::credentials()?, gate)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, SourceError> {
        let response = self
            .execute(url, || {
                self.http
                    .get(url)
                    .query(query)
                    .header(AUTHORIZATION, self.credentials.header_value())
            })
            .await?;

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Sends the request built by `build`, retrying once on 429.
    async fn execute<F>(&self, url: &str, build: F) -> Result<Response, SourceError>
    where
        F: Fn() -> RequestBuilder,
    {
        let mut retried = false;

        loop {
            self.gate.acquire().await;
            let response = build().send().await?;
            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS && !retried {
                let retry_after = response
                    .headers()
                    .get(RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.trim().parse::<u64>().ok())
                    .unwrap_or(DEFAULT_RETRY_AFTER_SECS);

                if retry_after > MAX_RETRY_AFTER_SECS {
                    warning!(
                        "Retry after has reached an abnormal high of {} seconds. Try again later.",
                        retry_after
                    );
                    return Err(SourceError::RateLimited(retry_after));
                }

                sleep(Duration::from_secs(retry_after)).await;
                retried = true;
                continue;
            }

            if !status.is_success() {
                return Err(SourceError::Status {
                    url: url.to_string(),
                    status: status.as_u16(),
                });
            }

            return Ok(response);
        }
    }
}

#[async_trait]
impl MusicSource for DiscogsClient {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Release>, SourceError> {
        let url = format!("{}/database/search", self.base_url);
        let response: SearchResponse = self
            .get_json(&url, &[("type", "release"), (query.param(), query.as_str())])
            .await?;
        Ok(response.results)
    }

    async fn release_detail(&self, release_id: u64) -> Result<ReleaseDetail, SourceError> {
        let url = format!("{}/releases/{}", self.base_url, release_id);
        self.get_json(&url, &[]).await
    }

    async fn price_suggestions(&self, release_id: u64) -> Result<PriceTable, SourceError> {
        let url = format!(
            "{}/marketplace/price_suggestions/{}",
            self.base_url, release_id
        );
        let value: serde_json::Value = self.get_json(&url, &[]).await?;
        Ok(price_table_from_value(value))
    }

    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, SourceError> {
        // image hosts only check the user agent
        let response = self.execute(url, || self.http.get(url)).await?;
        Ok(response.bytes().await?.to_vec())
    }
}
