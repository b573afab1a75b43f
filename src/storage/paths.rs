// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Path utilities for the sealed storage layout.

use std::path::{Path, PathBuf};

use crate::config::{WalletConfig, DEFAULT_DATA_DIR};

/// Sealed wallet document.
pub const WALLET_FILE: &str = "wallet_data.enc";

/// Sealed disclosure history.
pub const HISTORY_FILE: &str = "history_data.enc";

/// Storage path utilities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePaths {
    root: PathBuf,
}

impl Default for StoragePaths {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_DIR)
    }
}

impl StoragePaths {
    /// Create a new StoragePaths with a custom root (useful for testing).
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn from_config(config: &WalletConfig) -> Self {
        Self::new(&config.data_dir)
    }

    /// Root directory for all sealed data.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn wallet_file(&self) -> PathBuf {
        self.root.join(WALLET_FILE)
    }

    pub fn history_file(&self) -> PathBuf {
        self.root.join(HISTORY_FILE)
    }

    /// Scratch file used by [`super::BlobStorage::health_check`].
    pub fn health_check_file(&self) -> PathBuf {
        self.root.join(".health_check")
    }
}
