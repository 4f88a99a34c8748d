//! In-memory user directory seeded from a JSON file.
//!
//! The storefront owns user records; this adapter holds the subset the
//! broadcast engine needs (id and role) for lookups during authentication.
//! The file is a JSON array of `{ "id": 1, "name": "...", "role": "admin" }`.

use std::io::ErrorKind;
use std::path::Path;

use async_trait::async_trait;
use dashmap::DashMap;

use ordercast_domain::PrincipalId;

use crate::infrastructure::ports::{DirectoryError, DirectoryRecord, UserDirectoryPort};

/// Concurrent in-memory user directory.
#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    records: DashMap<PrincipalId, DirectoryRecord>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: impl IntoIterator<Item = DirectoryRecord>) -> Self {
        let directory = Self::new();
        for record in records {
            directory.upsert(record);
        }
        directory
    }

    /// Load records from a JSON file.
    ///
    /// A missing file yields an empty directory; every authentication will
    /// then fail with `PrincipalNotFound` until records are added.
    pub async fn load(path: &Path) -> Result<Self, DirectoryError> {
        let raw = match tokio::fs::read_to_string(path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "User directory file not found, starting empty");
                return Ok(Self::new());
            }
            Err(e) => return Err(DirectoryError::unavailable(e)),
        };

        let records: Vec<DirectoryRecord> =
            serde_json::from_str(&raw).map_err(DirectoryError::invalid)?;
        let directory = Self::from_records(records);
        tracing::info!(
            path = %path.display(),
            users = directory.len(),
            "User directory loaded"
        );
        Ok(directory)
    }

    /// Insert or replace a record.
    pub fn upsert(&self, record: DirectoryRecord) {
        self.records.insert(record.id, record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl UserDirectoryPort for InMemoryUserDirectory {
    async fn find(&self, id: PrincipalId) -> Result<Option<DirectoryRecord>, DirectoryError> {
        Ok(self.records.get(&id).map(|entry| entry.value().clone()))
    }
}
