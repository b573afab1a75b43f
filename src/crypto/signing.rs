// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signing and verification over the supported wallet schemes.
//!
//! - Ed25519 signs the message bytes directly (64-byte signature).
//! - ECDSA variants hash with the paired digest and sign the prehash over
//!   the named curve. A digest wider than the curve order is truncated to
//!   its leftmost bytes, as OpenSSL does for P-384/SHA-512.
//! - ECDSA signatures are ASN.1 DER encoded, which is what the wallet API
//!   verifies.

use ed25519_dalek::{Signer as _, Verifier as _};
use p256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use sha2::{Digest, Sha256, Sha384, Sha512};

use super::keys::{KeyError, PrivateKey, PublicKey};
use super::scheme::{DigestAlgorithm, SignatureScheme};
use crate::keystore::BoxError;

/// Error type for signing operations.
#[derive(Debug, thiserror::Error)]
pub enum SigningError {
    /// The scheme name did not resolve; raised before any key is read.
    #[error("unsupported signature scheme: {0}")]
    UnsupportedScheme(String),

    /// The private key could not be fetched or decoded.
    #[error("signing key unavailable: {0}")]
    SigningKeyUnavailable(#[source] BoxError),

    /// The public key handed to `verify` could not be decoded.
    #[error("invalid public key: {0}")]
    InvalidPublicKey(#[source] KeyError),

    /// The cryptographic library refused to produce a signature.
    #[error("signature failure: {0}")]
    SignatureFailure(#[source] BoxError),
}

impl SigningError {
    pub(crate) fn key_unavailable(err: impl Into<BoxError>) -> Self {
        SigningError::SigningKeyUnavailable(err.into())
    }

    fn failure(err: impl Into<BoxError>) -> Self {
        SigningError::SignatureFailure(err.into())
    }
}

fn prehash(digest: DigestAlgorithm, data: &[u8]) -> Vec<u8> {
    match digest {
        DigestAlgorithm::Sha256 => Sha256::digest(data).to_vec(),
        DigestAlgorithm::Sha384 => Sha384::digest(data).to_vec(),
        DigestAlgorithm::Sha512 => Sha512::digest(data).to_vec(),
    }
}

/// Sign `data` with a private key in PEM, base64 DER or DER form.
///
/// # Errors
/// - `SigningKeyUnavailable` if the key does not decode for the scheme's curve
/// - `SignatureFailure` if the primitive fails
pub fn sign(
    scheme: SignatureScheme,
    private_key: &[u8],
    data: &[u8],
) -> Result<Vec<u8>, SigningError> {
    let key = PrivateKey::decode(scheme.curve(), private_key).map_err(SigningError::key_unavailable)?;

    match (key, scheme.digest()) {
        (PrivateKey::Ed25519(key), _) => {
            let signature = key.try_sign(data).map_err(SigningError::failure)?;
            Ok(signature.to_bytes().to_vec())
        }
        (PrivateKey::P256(key), Some(digest)) => {
            let signature: p256::ecdsa::Signature = key
                .sign_prehash(&prehash(digest, data))
                .map_err(SigningError::failure)?;
            Ok(signature.to_der().as_bytes().to_vec())
        }
        (PrivateKey::P384(key), Some(digest)) => {
            let signature: p384::ecdsa::Signature = key
                .sign_prehash(&prehash(digest, data))
                .map_err(SigningError::failure)?;
            Ok(signature.to_der().as_bytes().to_vec())
        }
        (_, None) => Err(SigningError::UnsupportedScheme(scheme.to_string())),
    }
}

/// Verify `signature` over `data`.
///
/// Returns `Ok(false)` for malformed or non-matching signatures.
///
/// # Errors
/// `InvalidPublicKey` if the key does not decode for the scheme's curve.
pub fn verify(
    scheme: SignatureScheme,
    public_key: &[u8],
    data: &[u8],
    signature: &[u8],
) -> Result<bool, SigningError> {
    let key = PublicKey::decode(scheme.curve(), public_key).map_err(SigningError::InvalidPublicKey)?;

    let valid = match (key, scheme.digest()) {
        (PublicKey::Ed25519(key), _) => match ed25519_dalek::Signature::from_slice(signature) {
            Ok(signature) => key.verify(data, &signature).is_ok(),
            Err(_) => false,
        },
        (PublicKey::P256(key), Some(digest)) => match p256::ecdsa::Signature::from_der(signature) {
            Ok(signature) => key.verify_prehash(&prehash(digest, data), &signature).is_ok(),
            Err(_) => false,
        },
        (PublicKey::P384(key), Some(digest)) => match p384::ecdsa::Signature::from_der(signature) {
            Ok(signature) => key.verify_prehash(&prehash(digest, data), &signature).is_ok(),
            Err(_) => false,
        },
        (_, None) => false,
    };

    Ok(valid)
}
