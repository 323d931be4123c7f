use std::{
    collections::{BTreeMap, HashMap, HashSet},
    path::PathBuf,
    sync::Arc,
};

use tokio::sync::Mutex;

use crate::{
    management::store::{JsonFileStore, RecordStore, StoreError},
    types::{Record, Track},
    warning,
};

/// Full collection in stored order together with its price totals.
#[derive(Debug, Clone)]
pub struct Listing {
    pub records: Vec<Record>,
    pub totals: BTreeMap<String, f64>,
}

#[derive(Debug, Clone)]
pub struct SortReport {
    pub records: Vec<Record>,
    pub distinct_genres: usize,
}

/// The stored collection.
///
/// There is no in-memory copy: every operation reads the whole collection
/// from the backend and mutating operations write it back in full. Clones
/// share one lock, so read-modify-write cycles of different callers in this
/// process never interleave.
#[derive(Clone)]
pub struct Collection {
    store: Arc<dyn RecordStore>,
    lock: Arc<Mutex<()>>,
}

impl Collection {
    /// Collection backed by the JSON file at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::with_store(JsonFileStore::new(path))
    }

    pub fn with_store(store: impl RecordStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn location(&self) -> String {
        self.store.location()
    }

    /// Current records in stored order.
    pub async fn records(&self) -> Result<Vec<Record>, StoreError> {
        let _guard = self.lock.lock().await;
        self.read().await
    }

    pub async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        let _guard = self.lock.lock().await;
        Ok(self.read().await?.iter().any(|r| r.key == key))
    }

    /// Appends `record` unless its key is already taken.
    ///
    /// # Errors
    ///
    /// `StoreError::DuplicateKey` leaves the collection untouched.
    pub async fn insert(&self, record: Record) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut records = self.read().await?;

        if records.iter().any(|r| r.key == record.key) {
            return Err(StoreError::DuplicateKey(record.key));
        }

        records.push(record);
        self.store.save(&records).await
    }

    /// Removes the record with `key`. Returns whether one was found; when
    /// none is, the file is not rewritten.
    pub async fn delete(&self, key: &str) -> Result<bool, StoreError> {
        let _guard = self.lock.lock().await;
        let mut records = self.read().await?;

        let before = records.len();
        records.retain(|r| r.key != key);
        if records.len() == before {
            return Ok(false);
        }

        self.store.save(&records).await?;
        Ok(true)
    }

    /// Records where any searchable field contains `query`, ignoring case.
    pub async fn search(&self, query: &str) -> Result<Vec<Record>, StoreError> {
        let needle = query.to_lowercase();
        Ok(self
            .records()
            .await?
            .into_iter()
            .filter(|r| matches(r, &needle))
            .collect())
    }

    pub async fn list_all(&self) -> Result<Listing, StoreError> {
        let records = self.records().await?;
        let totals = aggregate_prices(&records);
        Ok(Listing { records, totals })
    }

    /// Reorders the stored collection by first genre and writes it back.
    /// Nothing is written for an empty collection.
    pub async fn sort_by_genre(&self) -> Result<SortReport, StoreError> {
        let _guard = self.lock.lock().await;
        let mut records = self.read().await?;

        let distinct_genres = sort_records_by_genre(&mut records);
        // an unreadable file also reads as empty and must stay as it is
        if !records.is_empty() {
            self.store.save(&records).await?;
        }

        Ok(SortReport {
            records,
            distinct_genres,
        })
    }

    /// Replaces the tracklist of every record whose key is in `tracklists`.
    ///
    /// Works on a fresh read so records added since `tracklists` was
    /// gathered are kept. Returns the number of records changed.
    pub async fn merge_tracklists(
        &self,
        mut tracklists: HashMap<String, Vec<Track>>,
    ) -> Result<usize, StoreError> {
        if tracklists.is_empty() {
            return Ok(0);
        }

        let _guard = self.lock.lock().await;
        let mut records = self.read().await?;

        let mut merged = 0;
        for record in records.iter_mut() {
            if let Some(tracklist) = tracklists.remove(&record.key) {
                record.tracklist = Some(tracklist);
                merged += 1;
            }
        }

        if merged > 0 {
            self.store.save(&records).await?;
        }
        Ok(merged)
    }

    async fn read(&self) -> Result<Vec<Record>, StoreError> {
        match self.store.load().await {
            Ok(records) => Ok(records),
            Err(StoreError::Malformed {
                path,
                reason,
                backup,
            }) => {
                warning!(
                    "Collection file {} is unreadable ({}). Treating it as empty.",
                    path.display(),
                    reason
                );
                match backup {
                    Some(backup) => {
                        warning!("A copy of the unreadable file is kept at {}", backup.display())
                    }
                    None => warning!(
                        "No copy of the unreadable file could be made, the next save will replace it"
                    ),
                }
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }
}

/// Sums every record's price per condition grade.
///
/// Grades a record has no price for, or a price that is not a number,
/// contribute nothing for that record.
pub fn aggregate_prices(records: &[Record]) -> BTreeMap<String, f64> {
    let mut totals: BTreeMap<String, f64> = BTreeMap::new();

    for record in records {
        let Some(table) = &record.price_table else {
            continue;
        };

        for condition in table.keys() {
            *totals.entry(condition.clone()).or_insert(0.0) += record.price_for(condition);
        }
    }

    totals
}

/// Stable sort by first genre tag; records without a genre go last.
/// Returns the number of distinct first genres.
pub fn sort_records_by_genre(records: &mut [Record]) -> usize {
    records.sort_by(|a, b| {
        let a_genre = a.first_genre();
        let b_genre = b.first_genre();
        (a_genre.is_none(), a_genre).cmp(&(b_genre.is_none(), b_genre))
    });

    records
        .iter()
        .filter_map(Record::first_genre)
        .collect::<HashSet<_>>()
        .len()
}

/// Whether `record` matches an already lowercased search term.
pub fn matches(record: &Record, needle: &str) -> bool {
    let contains = |value: &str| value.to_lowercase().contains(needle);

    if contains(record.key.as_str()) {
        return true;
    }

    let Some(release) = &record.release else {
        return false;
    };

    release.title.as_deref().is_some_and(contains)
        || release.country.as_deref().is_some_and(contains)
        || release
            .year
            .as_ref()
            .is_some_and(|year| contains(year.to_string().as_str()))
        || release
            .label
            .iter()
            .chain(&release.genre)
            .chain(&release.style)
            .any(|value| contains(value.as_str()))
}
