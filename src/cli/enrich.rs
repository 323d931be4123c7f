use std::path::Path;

use crate::{
    cli::{Outcome, collection::store_failed, render},
    discogs::MusicSource,
    enrichment::{self, EnrichmentError, EnrichmentReport},
    info,
    management::Collection,
    success, warning,
};

pub async fn update(collection: &Collection, source: &dyn MusicSource) -> Outcome {
    info!("Fetching tracklists for the whole collection...");
    match enrichment::update_tracklists(collection, source).await {
        Ok(report) => {
            summarize("Tracklists updated", &report);
            outcome(&report)
        }
        Err(EnrichmentError::Store(e)) => store_failed(collection, e),
        Err(e) => {
            warning!("{}", e);
            Outcome::Failed(e.to_string())
        }
    }
}

pub async fn cache(collection: &Collection, source: &dyn MusicSource, assets_dir: &Path) -> Outcome {
    info!("Downloading cover images to {}...", assets_dir.display());
    match enrichment::cache_images(collection, source, assets_dir).await {
        Ok(report) => {
            summarize("Cover images downloaded", &report);
            outcome(&report)
        }
        Err(e) => {
            warning!("Cannot cache cover images. Err: {}", e);
            Outcome::Failed(e.to_string())
        }
    }
}

fn summarize(what: &str, report: &EnrichmentReport) {
    success!(
        "{}: {} done, {} skipped, {} failed.",
        what,
        report.updated,
        report.skipped.len(),
        report.failures.len()
    );
    render::print_failures(report);
}

fn outcome(report: &EnrichmentReport) -> Outcome {
    Outcome::Enriched {
        updated: report.updated,
        skipped: report.skipped.len(),
        failed: report.failures.len(),
    }
}
