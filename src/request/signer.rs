// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request signer.
//!
//! Produces `{time, nonce, wallet_signature}` for one operation. The wallet
//! private key is read from secure storage inside [`RequestSigner::sign_at`],
//! used for exactly one signature, and wiped when the call returns. The
//! signer itself only borrows the key store.

use base64ct::{Base64, Encoding};
use chrono::{DateTime, Utc};

use super::canonical::{format_request_time, generate_nonce};
use super::operations::{canonical_string, SignedOperation, SignedRequest};
use crate::crypto::{self, SignatureScheme, SigningError};
use crate::keystore::{KeyStoreError, SecureKeyStore, WALLET_PRIVATE_KEY};
use crate::models::Wallet;

/// Signs wallet API requests with the key held in secure storage.
pub struct RequestSigner<'a, K> {
    keystore: &'a K,
}

impl<'a, K: SecureKeyStore> RequestSigner<'a, K> {
    pub fn new(keystore: &'a K) -> Self {
        Self { keystore }
    }

    /// Sign `operation` for `wallet` at the current time with a fresh nonce.
    pub async fn sign<O: SignedOperation>(
        &self,
        wallet: &Wallet,
        operation: O,
    ) -> Result<SignedRequest<O>, SigningError> {
        self.sign_at(wallet, operation, Utc::now(), generate_nonce())
            .await
    }

    /// Sign `operation` with an explicit time and nonce.
    ///
    /// # Errors
    /// - `SigningKeyUnavailable` if secure storage has no usable key
    /// - `SignatureFailure` if the primitive fails
    pub async fn sign_at<O: SignedOperation>(
        &self,
        wallet: &Wallet,
        operation: O,
        time: DateTime<Utc>,
        nonce: String,
    ) -> Result<SignedRequest<O>, SigningError> {
        let time = format_request_time(time);
        let signing_string = canonical_string(&operation, &time, &nonce, &wallet.id);

        let signature = self
            .sign_with_scheme(wallet.signing_algorithm, signing_string.as_bytes())
            .await
            .inspect_err(|e| {
                tracing::warn!(
                    endpoint = O::ENDPOINT_PATH,
                    wallet_id = %wallet.id,
                    error = %e,
                    "Failed to sign wallet request"
                );
            })?;

        tracing::debug!(
            endpoint = O::ENDPOINT_PATH,
            wallet_id = %wallet.id,
            "Signed wallet request"
        );

        Ok(SignedRequest {
            time,
            nonce,
            wallet_id: wallet.id.clone(),
            operation,
            wallet_signature: Base64::encode_string(&signature),
        })
    }

    /// Sign arbitrary bytes under a scheme given by name.
    ///
    /// The name is resolved before secure storage is touched, so an unknown
    /// scheme never causes a key read.
    pub async fn sign_message(
        &self,
        scheme_name: &str,
        message: &[u8],
    ) -> Result<Vec<u8>, SigningError> {
        let scheme = SignatureScheme::parse(scheme_name)?;
        self.sign_with_scheme(scheme, message).await
    }

    async fn sign_with_scheme(
        &self,
        scheme: SignatureScheme,
        message: &[u8],
    ) -> Result<Vec<u8>, SigningError> {
        let private_key = self
            .keystore
            .get(WALLET_PRIVATE_KEY)
            .await
            .map_err(SigningError::key_unavailable)?
            .ok_or_else(|| {
                SigningError::key_unavailable(KeyStoreError::Missing(WALLET_PRIVATE_KEY.to_string()))
            })?;

        crypto::sign(scheme, &private_key, message)
    }
}
