// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! AES-256-GCM sealing of blob contents.
//!
//! ```text
//! base64( nonce[12] || ciphertext || tag[16] )
//! ```
//!
//! No header or version byte, so existing files stay readable.

use aes_gcm::{aead::Aead, Aes256Gcm, Key, KeyInit, Nonce};
use base64ct::{Base64, Encoding};
use rand::{rngs::OsRng, RngCore};
use zeroize::Zeroizing;

use super::{BlobError, MasterKey, StorageError, StorageResult};

pub const NONCE_LEN: usize = 12;
pub const TAG_LEN: usize = 16;

/// Seal `plaintext` under a fresh random nonce.
pub fn encrypt(plaintext: &[u8], key: &MasterKey) -> StorageResult<String> {
    let mut nonce = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce);
    encrypt_with_nonce(plaintext, key, &nonce)
}

/// Seal `plaintext` under a caller-chosen nonce.
///
/// The nonce must never repeat under the same key. Outside of fixed test
/// vectors use [`encrypt`].
pub fn encrypt_with_nonce(
    plaintext: &[u8],
    key: &MasterKey,
    nonce: &[u8; NONCE_LEN],
) -> StorageResult<String> {
    let sealed = cipher(key)
        .encrypt(Nonce::from_slice(nonce), plaintext)
        .map_err(StorageError::EncryptionFailure)?;

    let mut blob = Vec::with_capacity(NONCE_LEN + sealed.len());
    blob.extend_from_slice(nonce);
    blob.extend_from_slice(&sealed);
    Ok(Base64::encode_string(&blob))
}

/// Open a blob produced by [`encrypt`].
///
/// # Errors
/// - `CorruptBlob` if the blob is not base64 or is shorter than nonce + tag
/// - `IntegrityFailure` if the tag does not verify (wrong key or tampering)
pub fn decrypt(blob: &str, key: &MasterKey) -> StorageResult<Zeroizing<Vec<u8>>> {
    let raw = Base64::decode_vec(blob.trim()).map_err(BlobError::from)?;
    if raw.len() < NONCE_LEN + TAG_LEN {
        return Err(BlobError::Truncated { len: raw.len() }.into());
    }

    let (nonce, sealed) = raw.split_at(NONCE_LEN);
    cipher(key)
        .decrypt(Nonce::from_slice(nonce), sealed)
        .map(Zeroizing::new)
        .map_err(StorageError::IntegrityFailure)
}

fn cipher(key: &MasterKey) -> Aes256Gcm {
    Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()))
}
