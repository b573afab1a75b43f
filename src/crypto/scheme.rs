// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signature scheme names and dispatch data.
//!
//! The wallet API names schemes loosely (`EcdsaP256_Sha256`,
//! `ecdsa-p256-sha256`, `EddsaEd25519`, ...). Names are compared after
//! [`normalize_scheme`], which lowercases and drops punctuation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::signing::SigningError;

/// Curve a scheme signs over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Curve {
    Ed25519,
    P256,
    P384,
}

/// Digest applied before ECDSA signing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestAlgorithm {
    Sha256,
    Sha384,
    Sha512,
}

/// Signature schemes a wallet can be created with.
///
/// Fixed at wallet creation; persisted by its canonical name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SignatureScheme {
    Ed25519,
    EcdsaP256Sha256,
    EcdsaP256Sha384,
    EcdsaP384Sha384,
    EcdsaP384Sha512,
}

/// Lowercase and strip every non-alphanumeric character.
pub fn normalize_scheme(name: &str) -> String {
    name.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Whether `name` resolves to a supported scheme.
pub fn is_scheme_supported(name: &str) -> bool {
    SignatureScheme::parse(name).is_ok()
}

impl SignatureScheme {
    pub const ALL: [SignatureScheme; 5] = [
        SignatureScheme::Ed25519,
        SignatureScheme::EcdsaP256Sha256,
        SignatureScheme::EcdsaP256Sha384,
        SignatureScheme::EcdsaP384Sha384,
        SignatureScheme::EcdsaP384Sha512,
    ];

    /// Resolve a scheme name.
    ///
    /// # Errors
    /// `SigningError::UnsupportedScheme` carrying the name as given.
    pub fn parse(name: &str) -> Result<Self, SigningError> {
        match normalize_scheme(name).as_str() {
            "ed25519" | "eddsaed25519" => Ok(SignatureScheme::Ed25519),
            "ecdsap256sha256" => Ok(SignatureScheme::EcdsaP256Sha256),
            "ecdsap256sha384" => Ok(SignatureScheme::EcdsaP256Sha384),
            "ecdsap384sha384" => Ok(SignatureScheme::EcdsaP384Sha384),
            "ecdsap384sha512" => Ok(SignatureScheme::EcdsaP384Sha512),
            _ => Err(SigningError::UnsupportedScheme(name.to_string())),
        }
    }

    /// Name used by the wallet API.
    pub fn as_str(&self) -> &'static str {
        match self {
            SignatureScheme::Ed25519 => "EddsaEd25519",
            SignatureScheme::EcdsaP256Sha256 => "EcdsaP256_Sha256",
            SignatureScheme::EcdsaP256Sha384 => "EcdsaP256_Sha384",
            SignatureScheme::EcdsaP384Sha384 => "EcdsaP384_Sha384",
            SignatureScheme::EcdsaP384Sha512 => "EcdsaP384_Sha512",
        }
    }

    pub fn curve(&self) -> Curve {
        match self {
            SignatureScheme::Ed25519 => Curve::Ed25519,
            SignatureScheme::EcdsaP256Sha256 | SignatureScheme::EcdsaP256Sha384 => Curve::P256,
            SignatureScheme::EcdsaP384Sha384 | SignatureScheme::EcdsaP384Sha512 => Curve::P384,
        }
    }

    /// Prehash digest, `None` for Ed25519 which signs the message itself.
    pub fn digest(&self) -> Option<DigestAlgorithm> {
        match self {
            SignatureScheme::Ed25519 => None,
            SignatureScheme::EcdsaP256Sha256 => Some(DigestAlgorithm::Sha256),
            SignatureScheme::EcdsaP256Sha384 | SignatureScheme::EcdsaP384Sha384 => {
                Some(DigestAlgorithm::Sha384)
            }
            SignatureScheme::EcdsaP384Sha512 => Some(DigestAlgorithm::Sha512),
        }
    }
}

impl fmt::Display for SignatureScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignatureScheme {
    type Err = SigningError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for SignatureScheme {
    type Error = SigningError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<SignatureScheme> for String {
    fn from(value: SignatureScheme) -> Self {
        value.as_str().to_string()
    }
}
