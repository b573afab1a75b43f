// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Wallet Data Models
//!
//! Types shared by the signer and the sealed stores. All types derive
//! `Serialize` and `Deserialize`; they are persisted as JSON inside the
//! encrypted blobs.
//!
//! ## Model Categories
//!
//! - **Wallet**: identity, public key, scheme and disclosed attributes
//! - **History**: one record per completed disclosure flow

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::crypto::{
    generate_salt, hash_attribute, verify, AttributeError, AttributeHashingScheme,
    SignatureScheme, SigningError,
};

// =============================================================================
// Wallet
// =============================================================================

/// One identity attribute and its disclosure salt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttributeValue {
    /// Opaque attribute value (e.g. `"John"`, `"1990-04-12"`).
    pub value: String,
    /// Base64 random salt used for hashing on disclosure.
    pub salt: String,
}

impl AttributeValue {
    /// Wrap a value with a freshly generated salt.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            salt: generate_salt(),
        }
    }
}

/// Wallet identity and public key material.
///
/// The private key is deliberately absent: it stays in secure storage and
/// is only read for the duration of a signing call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Wallet {
    /// Opaque wallet identifier assigned at creation.
    pub id: String,
    /// When the wallet was created.
    pub created_at: DateTime<Utc>,
    /// Last attribute change.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// SPKI DER public key.
    #[serde(with = "base64_bytes")]
    pub public_key: Vec<u8>,
    /// Fixed at creation.
    pub signing_algorithm: SignatureScheme,
    #[serde(default)]
    pub identity_attribute_hashing_scheme: AttributeHashingScheme,
    /// Attribute name (`first_name`, `date_of_birth`, ...) to value and salt.
    #[serde(default)]
    pub attributes: BTreeMap<String, AttributeValue>,
}

impl Wallet {
    /// Create a wallet record with no attributes.
    pub fn new(id: impl Into<String>, public_key: Vec<u8>, signing_algorithm: SignatureScheme) -> Self {
        Self {
            id: id.into(),
            created_at: Utc::now(),
            updated_at: None,
            public_key,
            signing_algorithm,
            identity_attribute_hashing_scheme: AttributeHashingScheme::default(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }

    /// Salted digest of one attribute, `None` if the wallet does not hold it.
    pub fn attribute_digest(&self, name: &str) -> Result<Option<String>, AttributeError> {
        self.attributes
            .get(name)
            .map(|attr| hash_attribute(self.identity_attribute_hashing_scheme, &attr.value, &attr.salt))
            .transpose()
    }

    /// Merge attributes obtained from identity verification.
    ///
    /// The set only grows; an incoming attribute replaces the stored one of
    /// the same name. Returns the number of attributes added or changed.
    pub fn merge_attributes(&mut self, incoming: BTreeMap<String, AttributeValue>) -> usize {
        let mut changed = 0;
        for (name, value) in incoming {
            if self.attributes.get(&name) != Some(&value) {
                self.attributes.insert(name, value);
                changed += 1;
            }
        }
        if changed > 0 {
            self.updated_at = Some(Utc::now());
        }
        changed
    }

    /// Check a signature against this wallet's public key.
    pub fn verify_signature(&self, data: &[u8], signature: &[u8]) -> Result<bool, SigningError> {
        verify(self.signing_algorithm, &self.public_key, data, signature)
    }
}

mod base64_bytes {
    use base64ct::{Base64, Encoding};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&Base64::encode_string(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        Base64::decode_vec(&encoded).map_err(de::Error::custom)
    }
}

// =============================================================================
// History
// =============================================================================

/// Who asked for the disclosure.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RequesterType {
    Application,
    Wallet,
}

/// Outcome of a disclosure flow.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DisclosureResult {
    Accepted,
    Rejected,
}

/// A completed disclosure flow. Immutable once stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryRecord {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub requester_id: String,
    pub requester_type: RequesterType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requester_display_name: Option<String>,
    pub result: DisclosureResult,
    /// Attribute names disclosed, in request order.
    pub attributes_requested: Vec<String>,
}

/// A history entry before the store assigns its id and timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHistoryRecord {
    pub requester_id: String,
    pub requester_type: RequesterType,
    pub requester_display_name: Option<String>,
    pub result: DisclosureResult,
    pub attributes_requested: Vec<String>,
}

impl NewHistoryRecord {
    pub(crate) fn into_record(self, id: Uuid, timestamp: DateTime<Utc>) -> HistoryRecord {
        HistoryRecord {
            id,
            timestamp,
            requester_id: self.requester_id,
            requester_type: self.requester_type,
            requester_display_name: self.requester_display_name,
            result: self.result,
            attributes_requested: self.attributes_requested,
        }
    }
}
