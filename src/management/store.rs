use std::{io::ErrorKind, path::PathBuf};

use async_trait::async_trait;
use thiserror::Error;

use crate::types::Record;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("A record with key '{0}' already exists")]
    DuplicateKey(String),

    #[error("Cannot read collection file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot write collection file: {0}")]
    Write(#[source] std::io::Error),

    #[error("Cannot serialize collection: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Collection file {} is not valid JSON: {reason}", .path.display())]
    Malformed {
        path: PathBuf,
        reason: String,
        backup: Option<PathBuf>,
    },
}

impl StoreError {
    /// Whether the error happened while writing, leaving the file in an
    /// unknown state.
    pub fn is_write(&self) -> bool {
        matches!(self, StoreError::Write(_) | StoreError::Serialize(_))
    }
}

/// Persistence backend of the collection: whole collection in, whole
/// collection out.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn load(&self) -> Result<Vec<Record>, StoreError>;

    async fn save(&self, records: &[Record]) -> Result<(), StoreError>;

    /// Human readable location, used in messages.
    fn location(&self) -> String;
}

const MAX_BACKUPS: usize = 100;

/// The collection as a single JSON array in one file.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Keeps the bytes of an unreadable file next to it before a later
    /// write replaces them.
    ///
    /// Backups are named `<file>.corrupt`, `<file>.corrupt.1` and so on.
    /// An existing backup is never overwritten; one holding the same bytes is
    /// reused.
    async fn preserve_unreadable(&self, content: &[u8]) -> Option<PathBuf> {
        for n in 0..MAX_BACKUPS {
            let mut name = self.path.clone().into_os_string();
            name.push(".corrupt");
            if n > 0 {
                name.push(format!(".{}", n));
            }
            let backup = PathBuf::from(name);

            match async_fs::read(&backup).await {
                Ok(existing) if existing == content => return Some(backup),
                Ok(_) => continue,
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    return async_fs::write(&backup, content)
                        .await
                        .ok()
                        .map(|_| backup);
                }
                Err(_) => continue,
            }
        }

        None
    }
}

#[async_trait]
impl RecordStore for JsonFileStore {
    async fn load(&self) -> Result<Vec<Record>, StoreError> {
        let content = match async_fs::read(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::Io(e)),
        };

        if content.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        // invalid UTF-8 is a parse error here, not an I/O error
        match serde_json::from_slice::<Vec<Record>>(&content) {
            Ok(records) => Ok(records),
            Err(e) => Err(StoreError::Malformed {
                path: self.path.clone(),
                reason: e.to_string(),
                backup: self.preserve_unreadable(&content).await,
            }),
        }
    }

    async fn save(&self, records: &[Record]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                async_fs::create_dir_all(parent)
                    .await
                    .map_err(StoreError::Write)?;
            }
        }

        let json = serde_json::to_string_pretty(records)?;
        async_fs::write(&self.path, json)
            .await
            .map_err(StoreError::Write)?;
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
