// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Filesystem operations for sealed blob files.
//!
//! This module does no crypto. It stores one opaque base64 string per file
//! and guarantees that a reader sees either the previous contents or the new
//! contents of a file, never a partial write.

use std::io::{self, ErrorKind};
use std::path::Path;

use tokio::fs;
use tokio::io::AsyncWriteExt;

use super::{BlobError, StorageError, StorageResult, StoragePaths};

/// Outcome of reading a blob file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlobRead {
    Present(String),
    Absent,
}

/// Blob storage rooted at [`StoragePaths::root`].
#[derive(Debug, Clone)]
pub struct BlobStorage {
    paths: StoragePaths,
    initialized: bool,
}

impl BlobStorage {
    /// Create a new BlobStorage instance.
    ///
    /// Does NOT create the directory. Call `initialize()` first.
    pub fn new(paths: StoragePaths) -> Self {
        Self {
            paths,
            initialized: false,
        }
    }

    /// Get the storage paths.
    pub fn paths(&self) -> &StoragePaths {
        &self.paths
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Create the data directory. Safe to call multiple times.
    pub async fn initialize(&mut self) -> StorageResult<()> {
        fs::create_dir_all(self.paths.root()).await?;
        self.initialized = true;
        tracing::debug!(root = %self.paths.root().display(), "Blob storage initialized");
        Ok(())
    }

    /// Write-read-delete round trip under the data directory.
    pub async fn health_check(&self) -> StorageResult<()> {
        self.ensure_initialized()?;

        let test_file = self.paths.health_check_file();
        let test_data = "health_check_data";

        self.write_blob(&test_file, test_data).await?;
        let read = self.read_blob(&test_file).await?;
        self.delete(&test_file).await?;

        if read != BlobRead::Present(test_data.to_string()) {
            return Err(StorageError::Io(io::Error::other(
                "health check data mismatch",
            )));
        }

        Ok(())
    }

    /// Read a whole blob file in one operation.
    ///
    /// A missing file is [`BlobRead::Absent`], not an error.
    pub async fn read_blob(&self, path: impl AsRef<Path>) -> StorageResult<BlobRead> {
        self.ensure_initialized()?;

        match fs::read(path.as_ref()).await {
            Ok(bytes) => {
                let contents = String::from_utf8(bytes).map_err(BlobError::from)?;
                Ok(BlobRead::Present(contents))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BlobRead::Absent),
            Err(e) => Err(e.into()),
        }
    }

    /// Replace a blob file (atomic write via rename).
    pub async fn write_blob(&self, path: impl AsRef<Path>, contents: &str) -> StorageResult<()> {
        self.ensure_initialized()?;

        let path = path.as_ref();

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let temp_path = path.with_extension("tmp");
        {
            let mut file = fs::File::create(&temp_path).await?;
            file.write_all(contents.as_bytes()).await?;
            file.sync_all().await?;
        }

        if let Err(e) = fs::rename(&temp_path, path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }
        Ok(())
    }

    /// Delete a blob file. Returns whether a file was removed.
    pub async fn delete(&self, path: impl AsRef<Path>) -> StorageResult<bool> {
        self.ensure_initialized()?;

        match fs::remove_file(path.as_ref()).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn ensure_initialized(&self) -> StorageResult<()> {
        if self.initialized {
            Ok(())
        } else {
            Err(StorageError::NotInitialized)
        }
    }
}
