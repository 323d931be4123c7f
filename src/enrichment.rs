//! Bulk enrichment of the stored collection.
//!
//! Both jobs walk a snapshot of the collection taken when they start and send
//! every request through the music source, which takes care of rate limiting.
//! A failing record is reported and skipped; the job always runs to the end.
//!
//! - Tracklist mode re-fetches release detail and merges all tracklists into
//!   the collection with a single write at the end.
//! - Image mode downloads cover images into the assets directory, one file
//!   per record, skipping images that are already there.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    time::Duration,
};

use indicatif::{ProgressBar, ProgressStyle};
use thiserror::Error;

use crate::{
    discogs::MusicSource,
    management::{Collection, StoreError},
    types::{Record, Track},
    utils, warning,
};

#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Cannot create assets directory {}: {source}", .path.display())]
    Assets {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A record the job could not enrich.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichmentFailure {
    pub key: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct EnrichmentReport {
    /// Records changed, or images written.
    pub updated: usize,
    /// Keys of records there was nothing to do for.
    pub skipped: Vec<String>,
    pub failures: Vec<EnrichmentFailure>,
}

/// Fetches the tracklist of every record with a release id and stores them.
///
/// Records without a release id (hand-made ones) are skipped. Failed fetches
/// are collected; tracklists fetched successfully are written even if other
/// records failed.
///
/// # Errors
///
/// Only reading or writing the collection itself fails the job.
pub async fn update_tracklists<S>(
    collection: &Collection,
    source: &S,
) -> Result<EnrichmentReport, EnrichmentError>
where
    S: MusicSource + ?Sized,
{
    let snapshot = collection.records().await?;
    let pb = progress_bar(snapshot.len(), "Fetching tracklists...");

    let mut report = EnrichmentReport::default();
    let mut tracklists: HashMap<String, Vec<Track>> = HashMap::new();

    for record in &snapshot {
        pb.inc(1);

        let Some(release_id) = record.release_id() else {
            pb.set_message(format!("{} has no release id, skipped.", record.key));
            report.skipped.push(record.key.clone());
            continue;
        };

        match source.release_detail(release_id).await {
            Ok(detail) => {
                pb.set_message(format!(
                    "Fetched {} tracks for {}.",
                    detail.tracklist.len(),
                    display_name(record)
                ));
                tracklists.insert(record.key.clone(), detail.tracklist);
            }
            Err(e) => {
                pb.suspend(|| {
                    warning!(
                        "Failed to fetch tracklist for {}: {}",
                        display_name(record),
                        e
                    )
                });
                report.failures.push(EnrichmentFailure {
                    key: record.key.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    pb.set_message("Saving tracklists...");
    report.updated = collection.merge_tracklists(tracklists).await?;
    pb.finish_and_clear();

    Ok(report)
}

/// Downloads the cover image of every record into `assets_dir`.
///
/// The file name is the sanitized last segment of the image URL. Existing
/// files are not downloaded again.
///
/// # Errors
///
/// Fails when the collection cannot be read or the assets directory cannot be
/// created. Individual downloads never fail the job.
pub async fn cache_images<S>(
    collection: &Collection,
    source: &S,
    assets_dir: &Path,
) -> Result<EnrichmentReport, EnrichmentError>
where
    S: MusicSource + ?Sized,
{
    let snapshot = collection.records().await?;

    async_fs::create_dir_all(assets_dir)
        .await
        .map_err(|e| EnrichmentError::Assets {
            path: assets_dir.to_path_buf(),
            source: e,
        })?;

    let pb = progress_bar(snapshot.len(), "Downloading cover images...");
    let mut report = EnrichmentReport::default();

    for record in &snapshot {
        pb.inc(1);

        let Some(url) = record.cover_image() else {
            report.skipped.push(record.key.clone());
            continue;
        };

        let Some(file_name) = utils::sanitize_image_filename(url) else {
            report.failures.push(EnrichmentFailure {
                key: record.key.clone(),
                reason: format!("no usable file name in {}", url),
            });
            continue;
        };

        let target = assets_dir.join(&file_name);
        if async_fs::metadata(&target).await.is_ok() {
            pb.set_message(format!("{} already cached.", file_name));
            report.skipped.push(record.key.clone());
            continue;
        }

        let result = match source.fetch_image(url).await {
            Ok(bytes) => async_fs::write(&target, bytes)
                .await
                .map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };

        match result {
            Ok(()) => {
                pb.set_message(format!("Saved {}.", file_name));
                report.updated += 1;
            }
            Err(reason) => {
                pb.suspend(|| {
                    warning!(
                        "Failed to download cover for {}: {}",
                        display_name(record),
                        reason
                    )
                });
                report.failures.push(EnrichmentFailure {
                    key: record.key.clone(),
                    reason,
                });
            }
        }
    }

    pb.finish_and_clear();
    Ok(report)
}

fn display_name(record: &Record) -> &str {
    record.title().unwrap_or(record.key.as_str())
}

fn progress_bar(len: usize, message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} [{pos}/{len}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb
}
