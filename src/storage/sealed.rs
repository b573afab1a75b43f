// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Typed JSON documents sealed under the master key.

use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use zeroize::Zeroizing;

use super::{envelope, master_key, BlobError, BlobRead, BlobStorage, StorageResult};
use crate::keystore::SecureKeyStore;

/// One sealed file holding one JSON value.
pub struct SealedFile<'a, K> {
    blobs: &'a BlobStorage,
    keystore: &'a K,
    path: PathBuf,
}

impl<'a, K: SecureKeyStore> SealedFile<'a, K> {
    pub fn new(blobs: &'a BlobStorage, keystore: &'a K, path: impl Into<PathBuf>) -> Self {
        Self {
            blobs,
            keystore,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and open the document. `None` when the file does not exist.
    ///
    /// An absent file never touches secure storage.
    pub async fn read<T: DeserializeOwned>(&self) -> StorageResult<Option<T>> {
        let blob = match self.blobs.read_blob(&self.path).await? {
            BlobRead::Present(blob) => blob,
            BlobRead::Absent => return Ok(None),
        };

        let key = master_key::load(self.keystore).await?;
        let plaintext = envelope::decrypt(&blob, &key)?;
        let value = serde_json::from_slice(&plaintext).map_err(BlobError::Json)?;
        Ok(Some(value))
    }

    /// Seal and atomically replace the document, creating the master key on
    /// first use.
    pub async fn write<T: Serialize>(&self, value: &T) -> StorageResult<()> {
        let key = master_key::load_or_create(self.keystore).await?;
        let plaintext = Zeroizing::new(serde_json::to_vec(value)?);
        let blob = envelope::encrypt(&plaintext, &key)?;
        self.blobs.write_blob(&self.path, &blob).await
    }

    /// Delete the file. Returns whether one existed.
    pub async fn remove(&self) -> StorageResult<bool> {
        self.blobs.delete(&self.path).await
    }
}
