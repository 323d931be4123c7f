#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet, VecDeque},
    sync::Mutex,
};

use async_trait::async_trait;
use serde_json::Number;
use vinylcli::{
    discogs::{MusicSource, SearchQuery, SourceError},
    session::LineSource,
    types::{LooseNumber, Price, PriceTable, Record, Release, ReleaseDetail, Track},
};

/// Music source answering from canned data.
#[derive(Default)]
pub struct FakeSource {
    searches: HashMap<String, Vec<Release>>,
    details: HashMap<u64, Vec<Track>>,
    prices: HashMap<u64, PriceTable>,
    images: HashMap<String, Vec<u8>>,
    failing_searches: HashSet<String>,
    failing_details: HashSet<u64>,
    failing_images: HashSet<String>,
    calls: Mutex<Vec<String>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `query` find `release` with a two track tracklist and a price
    /// of `price` for Mint and Near Mint.
    pub fn with_release(mut self, query: &str, release: Release, price: f64) -> Self {
        let id = release.id.unwrap_or_default();
        self.details.insert(
            id,
            vec![
                track("A1", &format!("{} Side A", release.title.as_deref().unwrap_or("?"))),
                track("B1", &format!("{} Side B", release.title.as_deref().unwrap_or("?"))),
            ],
        );
        self.prices.insert(
            id,
            price_table(&[("Mint (M)", price), ("Near Mint (NM or M-)", price)]),
        );
        self.searches
            .entry(query.to_string())
            .or_default()
            .push(release);
        self
    }

    pub fn with_detail(mut self, release_id: u64, tracks: Vec<Track>) -> Self {
        self.details.insert(release_id, tracks);
        self
    }

    pub fn with_image(mut self, url: &str, bytes: &[u8]) -> Self {
        self.images.insert(url.to_string(), bytes.to_vec());
        self
    }

    pub fn failing_search(mut self, query: &str) -> Self {
        self.failing_searches.insert(query.to_string());
        self
    }

    pub fn failing_detail(mut self, release_id: u64) -> Self {
        self.failing_details.insert(release_id);
        self
    }

    pub fn failing_image(mut self, url: &str) -> Self {
        self.failing_images.insert(url.to_string());
        self
    }

    /// Every request made so far, e.g. `search:Thriller` or `detail:7`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record_call(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

fn unavailable(what: String) -> SourceError {
    SourceError::Unavailable(what)
}

#[async_trait]
impl MusicSource for FakeSource {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Release>, SourceError> {
        self.record_call(format!("search:{}", query.as_str()));
        if self.failing_searches.contains(query.as_str()) {
            return Err(unavailable(format!("search for {} failed", query.as_str())));
        }
        Ok(self
            .searches
            .get(query.as_str())
            .cloned()
            .unwrap_or_default())
    }

    async fn release_detail(&self, release_id: u64) -> Result<ReleaseDetail, SourceError> {
        self.record_call(format!("detail:{}", release_id));
        if self.failing_details.contains(&release_id) {
            return Err(SourceError::Status {
                url: format!("/releases/{}", release_id),
                status: 500,
            });
        }
        Ok(ReleaseDetail {
            tracklist: self.details.get(&release_id).cloned().unwrap_or_default(),
        })
    }

    async fn price_suggestions(&self, release_id: u64) -> Result<PriceTable, SourceError> {
        self.record_call(format!("prices:{}", release_id));
        Ok(self.prices.get(&release_id).cloned().unwrap_or_default())
    }

    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, SourceError> {
        self.record_call(format!("image:{}", url));
        if self.failing_images.contains(url) {
            return Err(unavailable(format!("image {} is gone", url)));
        }
        self.images
            .get(url)
            .cloned()
            .ok_or_else(|| unavailable(format!("no image at {}", url)))
    }
}

/// Input producer replaying a fixed script.
pub struct ScriptedLines {
    lines: VecDeque<String>,
}

impl ScriptedLines {
    pub fn new(lines: &[&str]) -> Self {
        Self {
            lines: lines.iter().map(|l| l.to_string()).collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

#[async_trait]
impl LineSource for ScriptedLines {
    async fn next_line(&mut self) -> Option<String> {
        self.lines.pop_front()
    }
}

pub fn release(id: u64, title: &str, genres: &[&str]) -> Release {
    Release {
        id: Some(id),
        title: Some(title.to_string()),
        genre: genres.iter().map(|g| g.to_string()).collect(),
        ..Default::default()
    }
}

pub fn track(position: &str, title: &str) -> Track {
    Track {
        position: position.to_string(),
        title: title.to_string(),
        duration: None,
    }
}

pub fn price_table(prices: &[(&str, f64)]) -> PriceTable {
    prices
        .iter()
        .map(|(grade, value)| {
            (
                grade.to_string(),
                Price {
                    currency: "USD".to_string(),
                    value: LooseNumber::Number(Number::from_f64(*value).unwrap()),
                },
            )
        })
        .collect()
}

pub fn record(key: &str, release: Release, prices: &[(&str, f64)]) -> Record {
    Record {
        key: key.to_string(),
        release: Some(release),
        tracklist: None,
        price_table: Some(price_table(prices)),
    }
}
