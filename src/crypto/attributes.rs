// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Salted hashing of identity attributes for selective disclosure.
//!
//! Each attribute stored in the wallet carries its own random salt. The
//! digest of an attribute is `HMAC(salt, NFC(value))` encoded as base64, so
//! a verifier holding the value and salt can recompute it while the digest
//! alone reveals nothing about low-entropy values such as birth dates.

use std::fmt;
use std::str::FromStr;

use base64ct::{Base64, Encoding};
use hmac::{Hmac, Mac};
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};
use sha2::Sha512;
use unicode_normalization::UnicodeNormalization;

use super::scheme::normalize_scheme;

type HmacSha512 = Hmac<Sha512>;

const SALT_LEN: usize = 16;

/// Error type for attribute hashing.
#[derive(Debug, thiserror::Error)]
pub enum AttributeError {
    #[error("unsupported attribute hashing scheme: {0}")]
    UnsupportedScheme(String),

    #[error("attribute salt is not valid base64: {0}")]
    InvalidSalt(#[from] base64ct::Error),

    #[error("attribute salt is empty")]
    EmptySalt,
}

/// Hashing schemes for disclosed attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AttributeHashingScheme {
    HmacSha512,
}

impl AttributeHashingScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeHashingScheme::HmacSha512 => "hmacsha512",
        }
    }
}

impl Default for AttributeHashingScheme {
    fn default() -> Self {
        Self::HmacSha512
    }
}

impl fmt::Display for AttributeHashingScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttributeHashingScheme {
    type Err = AttributeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_scheme(s).as_str() {
            "hmacsha512" => Ok(AttributeHashingScheme::HmacSha512),
            _ => Err(AttributeError::UnsupportedScheme(s.to_string())),
        }
    }
}

impl TryFrom<String> for AttributeHashingScheme {
    type Error = AttributeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AttributeHashingScheme> for String {
    fn from(value: AttributeHashingScheme) -> Self {
        value.as_str().to_string()
    }
}

/// Fresh per-attribute salt, base64 encoded.
pub fn generate_salt() -> String {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    Base64::encode_string(&salt)
}

/// Digest of one attribute value under its salt.
pub fn hash_attribute(
    scheme: AttributeHashingScheme,
    value: &str,
    salt_b64: &str,
) -> Result<String, AttributeError> {
    let salt = Base64::decode_vec(salt_b64.trim())?;
    if salt.is_empty() {
        return Err(AttributeError::EmptySalt);
    }

    let normalized: String = value.nfc().collect();

    match scheme {
        AttributeHashingScheme::HmacSha512 => {
            let mut mac = <HmacSha512 as Mac>::new_from_slice(&salt)
                .map_err(|_| AttributeError::EmptySalt)?;
            mac.update(normalized.as_bytes());
            Ok(Base64::encode_string(&mac.finalize().into_bytes()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // "salt1234567890" in base64, from the reference test wallet
    const SALT: &str = "c2FsdDEyMzQ1Njc4OTA=";

    #[test]
    fn hash_is_deterministic_and_salted() {
        let scheme = AttributeHashingScheme::HmacSha512;
        let a = hash_attribute(scheme, "John", SALT).unwrap();
        let b = hash_attribute(scheme, "John", SALT).unwrap();
        let other_salt = hash_attribute(scheme, "John", "c2FsdGFiY2RlZmdoaWo=").unwrap();

        assert_eq!(a, b);
        assert_ne!(a, other_salt);
        // 64-byte MAC
        assert_eq!(Base64::decode_vec(&a).unwrap().len(), 64);
    }

    #[test]
    fn composed_and_decomposed_forms_hash_equal() {
        let scheme = AttributeHashingScheme::HmacSha512;
        let composed = hash_attribute(scheme, "Ren\u{e9}e", SALT).unwrap();
        let decomposed = hash_attribute(scheme, "Rene\u{301}e", SALT).unwrap();
        assert_eq!(composed, decomposed);
    }

    #[test]
    fn bad_salts_are_rejected() {
        let scheme = AttributeHashingScheme::HmacSha512;
        assert!(matches!(hash_attribute(scheme, "x", "%%%"), Err(AttributeError::InvalidSalt(_))));
        assert!(matches!(hash_attribute(scheme, "x", ""), Err(AttributeError::EmptySalt)));
    }

    #[test]
    fn generated_salts_are_distinct() {
        let a = generate_salt();
        let b = generate_salt();
        assert_ne!(a, b);
        assert_eq!(Base64::decode_vec(&a).unwrap().len(), SALT_LEN);
    }

    #[test]
    fn scheme_names_normalise() {
        assert_eq!("HMAC-SHA512".parse::<AttributeHashingScheme>().unwrap(), AttributeHashingScheme::HmacSha512);
        assert!("sha1".parse::<AttributeHashingScheme>().is_err());
    }
}
