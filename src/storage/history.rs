// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Disclosure history.
//!
//! The whole collection is one sealed file, newest first, capped at
//! [`DEFAULT_HISTORY_LIMIT`] entries unless configured otherwise. Every
//! mutation is load, modify, re-seal, replace.
//!
//! History is best-effort. [`HistoryStore::load`] never fails: a missing
//! key, a corrupt file or a tag failure all read as "no history" and are
//! logged. Callers that want to tell the user about corruption use
//! [`HistoryStore::load_checked`].

use chrono::Utc;
use uuid::Uuid;

use super::{BlobStorage, SealedFile, StorageError, StorageResult};
use crate::config::{WalletConfig, DEFAULT_HISTORY_LIMIT};
use crate::keystore::SecureKeyStore;
use crate::models::{HistoryRecord, NewHistoryRecord};

/// Result of reading the history file.
#[derive(Debug)]
pub enum HistoryLoad {
    /// No history file yet.
    Empty,
    /// Records, newest first.
    Loaded(Vec<HistoryRecord>),
    /// The file exists but could not be opened or parsed.
    CorruptOrUnreadable(StorageError),
}

/// Repository for the sealed disclosure history.
pub struct HistoryStore<'a, K> {
    file: SealedFile<'a, K>,
    limit: usize,
}

impl<'a, K: SecureKeyStore> HistoryStore<'a, K> {
    pub fn new(blobs: &'a BlobStorage, keystore: &'a K) -> Self {
        Self {
            file: SealedFile::new(blobs, keystore, blobs.paths().history_file()),
            limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    pub fn from_config(blobs: &'a BlobStorage, keystore: &'a K, config: &WalletConfig) -> Self {
        Self::new(blobs, keystore).with_limit(config.history_limit)
    }

    /// Keep at most `limit` records (at least one).
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.max(1);
        self
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Read the history, keeping "no file" and "unusable file" apart.
    pub async fn load_checked(&self) -> HistoryLoad {
        match self.file.read::<Vec<HistoryRecord>>().await {
            Ok(None) => HistoryLoad::Empty,
            Ok(Some(mut records)) => {
                records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
                HistoryLoad::Loaded(records)
            }
            Err(e) => HistoryLoad::CorruptOrUnreadable(e),
        }
    }

    /// Read the history, newest first. Any failure reads as empty.
    pub async fn load(&self) -> Vec<HistoryRecord> {
        match self.load_checked().await {
            HistoryLoad::Empty => Vec::new(),
            HistoryLoad::Loaded(records) => records,
            HistoryLoad::CorruptOrUnreadable(e) => {
                tracing::warn!(
                    path = %self.file.path().display(),
                    error = %e,
                    "History unreadable, treating as empty"
                );
                Vec::new()
            }
        }
    }

    /// Record a completed disclosure flow.
    ///
    /// Assigns a fresh id and the current time, prepends, and evicts the
    /// oldest entries beyond the limit. An unreadable history file is
    /// replaced.
    pub async fn append(&self, entry: NewHistoryRecord) -> StorageResult<HistoryRecord> {
        let mut records = self.load().await;
        let record = entry.into_record(Uuid::new_v4(), Utc::now());

        records.insert(0, record.clone());
        records.truncate(self.limit);

        self.persist(&records)
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "Failed to append history record"))?;

        tracing::debug!(record_id = %record.id, count = records.len(), "History record appended");
        Ok(record)
    }

    /// Delete one record. Returns whether it was present.
    pub async fn delete_one(&self, id: Uuid) -> StorageResult<bool> {
        let mut records = self.load().await;
        let before = records.len();
        records.retain(|r| r.id != id);

        if records.len() == before {
            return Ok(false);
        }

        self.persist(&records)
            .await
            .inspect_err(|e| tracing::warn!(record_id = %id, error = %e, "Failed to delete history record"))?;
        Ok(true)
    }

    /// Remove the history file.
    pub async fn clear_all(&self) -> StorageResult<()> {
        let removed = self
            .file
            .remove()
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "Failed to clear history"))?;
        tracing::debug!(removed, "History cleared");
        Ok(())
    }

    async fn persist(&self, records: &[HistoryRecord]) -> StorageResult<()> {
        self.file.write(&records).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keystore::{InMemoryKeyStore, STORAGE_MASTER_KEY};
    use crate::models::{DisclosureResult, RequesterType};
    use crate::storage::blob_fs::tests::test_storage;
    use crate::storage::BlobError;

    fn disclosure(requester_id: impl Into<String>) -> NewHistoryRecord {
        NewHistoryRecord {
            requester_id: requester_id.into(),
            requester_type: RequesterType::Application,
            requester_display_name: Some("Example Bank".to_string()),
            result: DisclosureResult::Accepted,
            attributes_requested: vec!["first_name".to_string(), "date_of_birth".to_string()],
        }
    }

    #[tokio::test]
    async fn empty_store_loads_empty() {
        let (_dir, blobs) = test_storage().await;
        let keystore = InMemoryKeyStore::new();
        let history = HistoryStore::new(&blobs, &keystore);

        assert!(matches!(history.load_checked().await, HistoryLoad::Empty));
        assert!(history.load().await.is_empty());
    }

    #[tokio::test]
    async fn append_assigns_id_and_persists() {
        let (_dir, blobs) = test_storage().await;
        let keystore = InMemoryKeyStore::new();
        let history = HistoryStore::new(&blobs, &keystore);

        let stored = history.append(disclosure("app-1")).await.unwrap();
        assert_eq!(stored.requester_id, "app-1");
        assert_eq!(stored.id.get_version_num(), 4);

        // a fresh store over the same files sees the record
        let reopened = HistoryStore::new(&blobs, &keystore);
        assert_eq!(reopened.load().await, vec![stored]);
    }

    #[tokio::test]
    async fn cap_keeps_most_recent_newest_first() {
        let (_dir, blobs) = test_storage().await;
        let keystore = InMemoryKeyStore::new();
        let history = HistoryStore::new(&blobs, &keystore);

        for i in 0..150 {
            history.append(disclosure(format!("app-{i}"))).await.unwrap();
        }

        let records = history.load().await;
        assert_eq!(records.len(), 100);
        assert_eq!(records[0].requester_id, "app-149");
        assert_eq!(records[99].requester_id, "app-50");
        assert!(records.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
    }

    #[tokio::test]
    async fn configured_limit_applies() {
        let (_dir, blobs) = test_storage().await;
        let keystore = InMemoryKeyStore::new();
        let config = WalletConfig {
            history_limit: 3,
            ..WalletConfig::default()
        };
        let history = HistoryStore::from_config(&blobs, &keystore, &config);

        for i in 0..5 {
            history.append(disclosure(format!("app-{i}"))).await.unwrap();
        }
        let ids: Vec<_> = history
            .load()
            .await
            .into_iter()
            .map(|r| r.requester_id)
            .collect();
        assert_eq!(ids, ["app-4", "app-3", "app-2"]);
        assert_eq!(HistoryStore::new(&blobs, &keystore).with_limit(0).limit(), 1);
    }

    #[tokio::test]
    async fn delete_one_removes_only_that_record() {
        let (_dir, blobs) = test_storage().await;
        let keystore = InMemoryKeyStore::new();
        let history = HistoryStore::new(&blobs, &keystore);

        let first = history.append(disclosure("app-1")).await.unwrap();
        let second = history.append(disclosure("app-2")).await.unwrap();

        assert!(history.delete_one(first.id).await.unwrap());
        assert!(!history.delete_one(first.id).await.unwrap());
        assert_eq!(history.load().await, vec![second]);
    }

    #[tokio::test]
    async fn clear_all_removes_file() {
        let (_dir, blobs) = test_storage().await;
        let keystore = InMemoryKeyStore::new();
        let history = HistoryStore::new(&blobs, &keystore);

        history.append(disclosure("app-1")).await.unwrap();
        history.clear_all().await.unwrap();

        assert!(!blobs.paths().history_file().exists());
        assert!(matches!(history.load_checked().await, HistoryLoad::Empty));
        history.clear_all().await.unwrap();
    }

    #[tokio::test]
    async fn corrupt_file_degrades_to_empty() {
        let (_dir, blobs) = test_storage().await;
        let keystore = InMemoryKeyStore::new();
        let history = HistoryStore::new(&blobs, &keystore);
        history.append(disclosure("app-1")).await.unwrap();

        std::fs::write(blobs.paths().history_file(), "bm90IGEgc2VhbGVkIGJsb2I=").unwrap();

        assert!(matches!(
            history.load_checked().await,
            HistoryLoad::CorruptOrUnreadable(StorageError::CorruptBlob(BlobError::Truncated { .. }))
        ));
        assert!(history.load().await.is_empty());

        // the next append replaces the unreadable file
        history.append(disclosure("app-2")).await.unwrap();
        assert_eq!(history.load().await.len(), 1);
    }

    #[tokio::test]
    async fn lost_master_key_degrades_to_empty() {
        let (_dir, blobs) = test_storage().await;
        let keystore = InMemoryKeyStore::new();
        let history = HistoryStore::new(&blobs, &keystore);
        history.append(disclosure("app-1")).await.unwrap();

        keystore.delete(STORAGE_MASTER_KEY).await.unwrap();

        assert!(matches!(
            history.load_checked().await,
            HistoryLoad::CorruptOrUnreadable(StorageError::KeyUnavailable(_))
        ));
        assert!(history.load().await.is_empty());
    }

    #[tokio::test]
    async fn history_sealed_by_the_app_stays_readable() {
        use base64ct::{Base64, Encoding};

        use crate::storage::{envelope, MasterKey};

        let (_dir, blobs) = test_storage().await;
        let keystore = InMemoryKeyStore::new();
        let raw = [0x42; 32];
        keystore
            .set(STORAGE_MASTER_KEY, Base64::encode_string(&raw).as_bytes())
            .await
            .unwrap();

        let existing = vec![disclosure("app-old").into_record(Uuid::new_v4(), Utc::now())];
        let blob = envelope::encrypt(
            &serde_json::to_vec(&existing).unwrap(),
            &MasterKey::from_bytes(raw),
        )
        .unwrap();
        blobs.write_blob(blobs.paths().history_file(), &blob).await.unwrap();

        let history = HistoryStore::new(&blobs, &keystore);
        assert_eq!(history.load().await, existing);

        history.append(disclosure("app-new")).await.unwrap();
        let ids: Vec<_> = history
            .load()
            .await
            .into_iter()
            .map(|r| r.requester_id)
            .collect();
        assert_eq!(ids, ["app-new", "app-old"]);
    }

    #[tokio::test]
    async fn tampered_file_is_integrity_failure() {
        let (_dir, blobs) = test_storage().await;
        let keystore = InMemoryKeyStore::new();
        let history = HistoryStore::new(&blobs, &keystore);
        history.append(disclosure("app-1")).await.unwrap();

        let path = blobs.paths().history_file();
        let blob = std::fs::read_to_string(&path).unwrap();
        let mut chars: Vec<char> = blob.chars().collect();
        // last full base64 group sits inside the tag
        let i = chars.len() - 6;
        chars[i] = if chars[i] == 'A' { 'B' } else { 'A' };
        std::fs::write(&path, chars.into_iter().collect::<String>()).unwrap();

        assert!(matches!(
            history.load_checked().await,
            HistoryLoad::CorruptOrUnreadable(StorageError::IntegrityFailure(_))
        ));
    }
}
