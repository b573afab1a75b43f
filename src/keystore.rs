// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Secure key storage seam.
//!
//! The wallet private key and the storage master key never touch the data
//! directory. They live in OS-backed secure storage (keychain / keystore),
//! which the host application exposes through [`SecureKeyStore`].
//!
//! Secrets are returned as [`Zeroizing`] buffers so callers that drop them at
//! the end of an operation also wipe them.

use std::collections::HashMap;
use std::future::Future;

use tokio::sync::RwLock;
use zeroize::Zeroizing;

/// Entry holding the wallet's PKCS#8 DER private key.
pub const WALLET_PRIVATE_KEY: &str = "powm_wallet_private_key";

/// Entry holding the 256-bit storage master key.
pub const STORAGE_MASTER_KEY: &str = "powm_wallet_encryption_key";

/// Boxed cause for backend failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error type for secure storage access.
#[derive(Debug, thiserror::Error)]
pub enum KeyStoreError {
    /// The entry does not exist.
    #[error("secure storage entry {0} is not present")]
    Missing(String),

    /// The entry exists but does not have the expected shape.
    #[error("secure storage entry {name} is malformed: {reason}")]
    Malformed { name: String, reason: String },

    /// The platform backend failed.
    #[error("secure storage backend failed")]
    Backend(#[source] BoxError),
}

/// Asynchronous key/value access to OS-backed secure storage.
pub trait SecureKeyStore: Send + Sync {
    /// Fetch an entry, `None` when it was never set.
    fn get(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<Zeroizing<Vec<u8>>>, KeyStoreError>> + Send;

    /// Create or replace an entry.
    fn set(&self, name: &str, value: &[u8]) -> impl Future<Output = Result<(), KeyStoreError>> + Send;

    /// Remove an entry. Removing an absent entry is not an error.
    fn delete(&self, name: &str) -> impl Future<Output = Result<(), KeyStoreError>> + Send;
}

/// Process-local key store for tests and development builds.
#[derive(Debug, Default)]
pub struct InMemoryKeyStore {
    entries: RwLock<HashMap<String, Zeroizing<Vec<u8>>>>,
}

impl InMemoryKeyStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SecureKeyStore for InMemoryKeyStore {
    async fn get(&self, name: &str) -> Result<Option<Zeroizing<Vec<u8>>>, KeyStoreError> {
        Ok(self.entries.read().await.get(name).cloned())
    }

    async fn set(&self, name: &str, value: &[u8]) -> Result<(), KeyStoreError> {
        self.entries
            .write()
            .await
            .insert(name.to_string(), Zeroizing::new(value.to_vec()));
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<(), KeyStoreError> {
        self.entries.write().await.remove(name);
        Ok(())
    }
}
