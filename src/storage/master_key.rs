// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Storage master key.
//!
//! One 256-bit AES key per device, generated from the OS RNG on first write
//! and kept in secure storage under [`STORAGE_MASTER_KEY`]. It is fetched per
//! operation and never cached.
//!
//! The entry holds the key as padded base64 text (44 characters), the form
//! the mobile app already writes there. Entries holding the 32 raw bytes are
//! read as well.

use base64ct::{Base64, Encoding};
use rand::{rngs::OsRng, RngCore};
use zeroize::Zeroizing;

use super::{StorageError, StorageResult};
use crate::keystore::{KeyStoreError, SecureKeyStore, STORAGE_MASTER_KEY};

pub const MASTER_KEY_LEN: usize = 32;

/// AES-256-GCM key, wiped on drop.
pub struct MasterKey(Zeroizing<[u8; MASTER_KEY_LEN]>);

impl MasterKey {
    pub fn from_bytes(bytes: [u8; MASTER_KEY_LEN]) -> Self {
        Self(Zeroizing::new(bytes))
    }

    /// Fresh key from the OS RNG.
    pub fn generate() -> Self {
        let mut key = Self::from_bytes([0u8; MASTER_KEY_LEN]);
        OsRng.fill_bytes(&mut key.0[..]);
        key
    }

    pub(crate) fn as_bytes(&self) -> &[u8; MASTER_KEY_LEN] {
        &self.0
    }

    /// Base64 text as written to secure storage.
    fn to_stored(&self) -> Zeroizing<String> {
        Zeroizing::new(Base64::encode_string(self.as_bytes()))
    }

    fn from_stored(stored: &[u8]) -> StorageResult<Self> {
        if let Ok(bytes) = <[u8; MASTER_KEY_LEN]>::try_from(stored) {
            return Ok(Self::from_bytes(bytes));
        }

        let decoded = std::str::from_utf8(stored)
            .ok()
            .and_then(|text| Base64::decode_vec(text.trim()).ok())
            .map(Zeroizing::new);
        match decoded.as_deref().map(|d| <[u8; MASTER_KEY_LEN]>::try_from(d.as_slice())) {
            Some(Ok(bytes)) => Ok(Self::from_bytes(bytes)),
            _ => Err(StorageError::KeyUnavailable(KeyStoreError::Malformed {
                name: STORAGE_MASTER_KEY.to_string(),
                reason: format!(
                    "expected base64 of {MASTER_KEY_LEN} bytes, found {} bytes",
                    stored.len()
                ),
            })),
        }
    }
}

impl std::fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("MasterKey([REDACTED])")
    }
}

/// Fetch the master key. Never creates one.
///
/// # Errors
/// `KeyUnavailable(Missing)` when no key was ever stored.
pub async fn load<K: SecureKeyStore>(keystore: &K) -> StorageResult<MasterKey> {
    let stored = keystore
        .get(STORAGE_MASTER_KEY)
        .await
        .map_err(StorageError::KeyUnavailable)?
        .ok_or_else(|| {
            StorageError::KeyUnavailable(KeyStoreError::Missing(STORAGE_MASTER_KEY.to_string()))
        })?;
    MasterKey::from_stored(&stored)
}

/// Fetch the master key, generating and storing one when absent.
pub async fn load_or_create<K: SecureKeyStore>(keystore: &K) -> StorageResult<MasterKey> {
    if let Some(stored) = keystore
        .get(STORAGE_MASTER_KEY)
        .await
        .map_err(StorageError::KeyUnavailable)?
    {
        return MasterKey::from_stored(&stored);
    }

    let key = MasterKey::generate();
    keystore
        .set(STORAGE_MASTER_KEY, key.to_stored().as_bytes())
        .await
        .map_err(StorageError::KeyUnavailable)?;
    tracing::info!("Generated storage master key");
    Ok(key)
}
