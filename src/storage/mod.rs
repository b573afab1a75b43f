// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Sealed Local Storage
//!
//! Durable, confidential persistence for the wallet and its disclosure
//! history on a single device.
//!
//! ## Security Model
//!
//! - Every file holds one AES-256-GCM blob: `base64(nonce[12] || ciphertext || tag[16])`
//! - A fresh random nonce is drawn for every write
//! - The 256-bit master key lives in secure OS storage, never in the data directory
//! - The key is fetched per operation and wiped when the operation returns
//! - A blob that fails authentication yields no plaintext at all
//!
//! ## Storage Layout
//!
//! ```text
//! {data_dir}/
//!   wallet_data.enc     # Sealed Wallet (public key, scheme, attributes)
//!   history_data.enc    # Sealed Vec<HistoryRecord>, newest first
//! ```
//!
//! ## Important Notes
//!
//! - Single writer, single reader. There is no internal locking: two callers
//!   racing load-modify-store on the same file lose one update.
//! - Writes go to a temp file, are fsynced, then renamed over the target.

pub mod blob_fs;
pub mod envelope;
pub mod history;
pub mod master_key;
pub mod paths;
pub mod sealed;
pub mod wallet;

use std::io;
use std::string::FromUtf8Error;

use crate::crypto::KeyError;
use crate::keystore::KeyStoreError;

pub use blob_fs::{BlobRead, BlobStorage};
pub use history::{HistoryLoad, HistoryStore};
pub use master_key::MasterKey;
pub use paths::StoragePaths;
pub use sealed::SealedFile;
pub use wallet::WalletStore;

/// Error type for sealed storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The master key could not be read from, or written to, secure storage.
    #[error("storage master key unavailable")]
    KeyUnavailable(#[source] KeyStoreError),

    /// The blob did not authenticate under the master key.
    #[error("sealed blob failed authentication")]
    IntegrityFailure(#[source] aes_gcm::Error),

    /// The cipher refused to seal the plaintext.
    #[error("failed to seal blob")]
    EncryptionFailure(#[source] aes_gcm::Error),

    /// The file is present but is not a well-formed sealed document.
    #[error("sealed blob is corrupt")]
    CorruptBlob(#[from] BlobError),

    /// Wallet key generation failed.
    #[error("failed to generate wallet key pair")]
    KeyGeneration(#[source] KeyError),

    /// A wallet is already provisioned on this device.
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// No wallet is provisioned on this device.
    #[error("not found: {0}")]
    NotFound(String),

    /// `BlobStorage::initialize` has not run.
    #[error("storage not initialized")]
    NotInitialized,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Ways a present file can fail to be a sealed document.
#[derive(Debug, thiserror::Error)]
pub enum BlobError {
    #[error("blob is not valid base64")]
    Base64(#[from] base64ct::Error),

    #[error("blob is {len} bytes, shorter than nonce and tag")]
    Truncated { len: usize },

    #[error("blob file is not UTF-8")]
    Utf8(#[from] FromUtf8Error),

    #[error("plaintext is not the expected JSON document")]
    Json(#[source] serde_json::Error),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
