// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signed wallet API operations.
//!
//! Each operation declares its endpoint path and its fields in the exact
//! order the server signs them. The same list drives both the canonical
//! string and the JSON body, so the two cannot drift apart.
//!
//! | Operation | Endpoint path | Path signed | Signed fields |
//! |-----------|---------------|-------------|---------------|
//! | [`WalletStatus`] | `v1/wallets/status` | yes | - |
//! | [`StartIdentityVerification`] | `v1/wallets/start-identity-verification` | yes | first_name, last_name, date_of_birth, success_url, cancel_url |
//! | [`ConsumeIdentityVerification`] | `v1/wallets/consume-identity-verification` | yes | - |
//! | [`DeleteWallet`] | `v1/wallets/delete` | no | - |

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{ser::SerializeMap, Deserialize, Serialize, Serializer};
use url::Url;

use super::canonical::{is_signable_field, SigningString};
use crate::models::AttributeValue;

/// Error type for building an operation from caller input.
#[derive(Debug, thiserror::Error)]
pub enum OperationError {
    #[error("{field} is not an absolute URL: {source}")]
    InvalidUrl {
        field: &'static str,
        #[source]
        source: url::ParseError,
    },

    /// The value contains the signing string delimiter `|`.
    #[error("{field} must not contain '|'")]
    Delimiter { field: &'static str },
}

/// A wallet API call authenticated by a wallet signature.
pub trait SignedOperation {
    /// Path the request is posted to.
    const ENDPOINT_PATH: &'static str;

    /// Whether the verifier signs [`Self::ENDPOINT_PATH`] as the first field.
    const SIGNS_ENDPOINT_PATH: bool = true;

    /// Operation fields as `(json_name, value)`, in signing order.
    fn fields(&self) -> Vec<(&'static str, &str)>;
}

/// Canonical string for `operation` under the given envelope values.
pub fn canonical_string<O: SignedOperation>(
    operation: &O,
    time: &str,
    nonce: &str,
    wallet_id: &str,
) -> String {
    let envelope = if O::SIGNS_ENDPOINT_PATH {
        SigningString::new(O::ENDPOINT_PATH, time, nonce, wallet_id)
    } else {
        SigningString::without_endpoint(time, nonce, wallet_id)
    };
    envelope
        .fields(operation.fields().into_iter().map(|(_, value)| value))
        .finish()
}

// =============================================================================
// Operations
// =============================================================================

/// Query verification state of the wallet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalletStatus;

impl SignedOperation for WalletStatus {
    const ENDPOINT_PATH: &'static str = "v1/wallets/status";

    fn fields(&self) -> Vec<(&'static str, &str)> {
        Vec::new()
    }
}

/// Start a hosted identity verification session.
///
/// Redirect URLs are signed and sent exactly as the caller wrote them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartIdentityVerification {
    first_name: String,
    last_name: String,
    date_of_birth: String,
    success_url: String,
    cancel_url: String,
}

impl StartIdentityVerification {
    /// Build the request.
    ///
    /// # Errors
    /// - `InvalidUrl` if either redirect URL is not absolute
    /// - `Delimiter` if any field contains `|`
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        date_of_birth: NaiveDate,
        success_url: impl Into<String>,
        cancel_url: impl Into<String>,
    ) -> Result<Self, OperationError> {
        let operation = Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            date_of_birth: date_of_birth.format("%Y-%m-%d").to_string(),
            success_url: success_url.into(),
            cancel_url: cancel_url.into(),
        };

        for (field, value) in [
            ("success_url", &operation.success_url),
            ("cancel_url", &operation.cancel_url),
        ] {
            Url::parse(value).map_err(|source| OperationError::InvalidUrl { field, source })?;
        }
        if let Some((field, _)) = operation
            .fields()
            .into_iter()
            .find(|(_, value)| !is_signable_field(value))
        {
            return Err(OperationError::Delimiter { field });
        }

        Ok(operation)
    }
}

impl SignedOperation for StartIdentityVerification {
    const ENDPOINT_PATH: &'static str = "v1/wallets/start-identity-verification";

    fn fields(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("first_name", self.first_name.as_str()),
            ("last_name", self.last_name.as_str()),
            ("date_of_birth", self.date_of_birth.as_str()),
            ("success_url", self.success_url.as_str()),
            ("cancel_url", self.cancel_url.as_str()),
        ]
    }
}

/// Collect attributes from an accepted verification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsumeIdentityVerification;

impl SignedOperation for ConsumeIdentityVerification {
    const ENDPOINT_PATH: &'static str = "v1/wallets/consume-identity-verification";

    fn fields(&self) -> Vec<(&'static str, &str)> {
        Vec::new()
    }
}

/// Remove the wallet from the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteWallet;

impl SignedOperation for DeleteWallet {
    const ENDPOINT_PATH: &'static str = "v1/wallets/delete";
    const SIGNS_ENDPOINT_PATH: bool = false;

    fn fields(&self) -> Vec<(&'static str, &str)> {
        Vec::new()
    }
}

// =============================================================================
// Envelope
// =============================================================================

/// A signed request ready to be posted as JSON.
///
/// Serialises as `time`, `nonce`, `wallet_id`, the operation fields, then
/// `wallet_signature`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest<O> {
    pub time: String,
    pub nonce: String,
    pub wallet_id: String,
    pub operation: O,
    /// Base64 of the raw signature bytes.
    pub wallet_signature: String,
}

impl<O: SignedOperation> SignedRequest<O> {
    /// Endpoint path of the wrapped operation.
    pub fn endpoint_path(&self) -> &'static str {
        O::ENDPOINT_PATH
    }

    /// Recompute the string the signature covers.
    pub fn signing_string(&self) -> String {
        canonical_string(&self.operation, &self.time, &self.nonce, &self.wallet_id)
    }
}

impl<O: SignedOperation> Serialize for SignedRequest<O> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let fields = self.operation.fields();
        let mut map = serializer.serialize_map(Some(fields.len() + 4))?;
        map.serialize_entry("time", &self.time)?;
        map.serialize_entry("nonce", &self.nonce)?;
        map.serialize_entry("wallet_id", &self.wallet_id)?;
        for (name, value) in fields {
            map.serialize_entry(name, value)?;
        }
        map.serialize_entry("wallet_signature", &self.wallet_signature)?;
        map.end()
    }
}

// =============================================================================
// Responses
// =============================================================================

/// Response of `start-identity-verification`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StartIdentityVerificationResponse {
    /// Hosted verification page to open.
    pub redirect_url: Url,
}

/// Response of `consume-identity-verification`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConsumeIdentityVerificationResponse {
    /// Verified attributes to merge into the wallet.
    #[serde(default)]
    pub attributes: BTreeMap<String, AttributeValue>,
}
