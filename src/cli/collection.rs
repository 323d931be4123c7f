use crate::{
    cli::{Outcome, render},
    error, info,
    management::{Collection, StoreError},
    success, warning,
};

pub async fn list(collection: &Collection) -> Outcome {
    match collection.list_all().await {
        Ok(listing) => {
            if listing.records.is_empty() {
                info!("The collection at {} is empty.", collection.location());
                return Outcome::Listed(0);
            }

            render::print_records(&listing.records);
            render::print_totals(&listing.totals);
            info!("{} records in collection.", listing.records.len());
            Outcome::Listed(listing.records.len())
        }
        Err(e) => {
            warning!("Failed to load collection. Err: {}", e);
            Outcome::Failed(e.to_string())
        }
    }
}

pub async fn find(collection: &Collection, query: &str) -> Outcome {
    match collection.search(query).await {
        Ok(records) => {
            if records.is_empty() {
                info!("Nothing in the collection matches '{}'.", query);
            } else {
                render::print_records(&records);
                info!("{} records match '{}'.", records.len(), query);
            }
            Outcome::Matched(records.len())
        }
        Err(e) => {
            warning!("Failed to search collection. Err: {}", e);
            Outcome::Failed(e.to_string())
        }
    }
}

pub async fn sort(collection: &Collection) -> Outcome {
    match collection.sort_by_genre().await {
        Ok(report) => {
            render::print_records(&report.records);
            success!(
                "Sorted {} records by genre, {} distinct genres.",
                report.records.len(),
                report.distinct_genres
            );
            Outcome::Sorted {
                records: report.records.len(),
                distinct_genres: report.distinct_genres,
            }
        }
        Err(e) => store_failed(collection, e),
    }
}

/// Deletes `key` without asking; callers confirm first.
pub async fn delete(collection: &Collection, key: &str) -> Outcome {
    match collection.delete(key).await {
        Ok(true) => {
            success!("Record {} deleted.", key);
            Outcome::Deleted(key.to_string())
        }
        Ok(false) => {
            warning!("No record with key {} in collection.", key);
            Outcome::Missing(key.to_string())
        }
        Err(e) => store_failed(collection, e),
    }
}

/// Reports a failed store operation. Read failures end the command with a
/// warning; write failures end the program through [`fatal_write`].
pub(crate) fn store_failed(collection: &Collection, e: StoreError) -> Outcome {
    if e.is_write() {
        fatal_write(collection, e);
    }

    warning!("Failed to load collection. Err: {}", e);
    Outcome::Failed(e.to_string())
}

/// Writing the collection failed: the file may be half written, so there is
/// no sensible way to carry on.
pub(crate) fn fatal_write(collection: &Collection, e: StoreError) -> ! {
    error!(
        "Cannot update collection at {}. Err: {}",
        collection.location(),
        e
    )
}
