// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Canonical signing strings.
//!
//! The wallet API recomputes the same string on its side before verifying:
//!
//! ```text
//! endpoint_path|time|nonce|wallet_id|field_1|...|field_n|
//! ```
//!
//! Field order is a protocol constant per operation, and the trailing `|`
//! is part of the string. The delete endpoint's verifier does not sign the
//! path, so its string starts at `time`.

use chrono::{DateTime, SecondsFormat, Utc};
use rand::{rngs::OsRng, RngCore};

pub const DELIMITER: char = '|';

/// Random bytes per request nonce.
pub const NONCE_LEN: usize = 16;

/// Render a request time as `yyyy-MM-ddTHH:mm:ssZ` (no fractional seconds).
pub fn format_request_time(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Fresh request nonce: 16 bytes from the OS RNG, lowercase hex.
pub fn generate_nonce() -> String {
    let mut bytes = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Whether `value` can be signed as one field without shifting the fields
/// after it.
pub fn is_signable_field(value: &str) -> bool {
    !value.contains(DELIMITER)
}

/// Builder for one canonical signing string.
///
/// Values are joined as given, without escaping. A value containing `|`
/// would make two different field lists sign identically, so operations
/// reject such values when they are built (see [`is_signable_field`]).
#[derive(Debug, Clone)]
pub struct SigningString {
    buf: String,
}

impl SigningString {
    /// Start with the endpoint path and the envelope fields.
    pub fn new(endpoint_path: &str, time: &str, nonce: &str, wallet_id: &str) -> Self {
        let mut s = Self::with_capacity(endpoint_path.len() + time.len() + nonce.len() + wallet_id.len());
        s.push(endpoint_path);
        s.push_envelope(time, nonce, wallet_id);
        s
    }

    /// Start with `time|nonce|wallet_id|` only, for endpoints whose verifier
    /// does not sign the path.
    pub fn without_endpoint(time: &str, nonce: &str, wallet_id: &str) -> Self {
        let mut s = Self::with_capacity(time.len() + nonce.len() + wallet_id.len());
        s.push_envelope(time, nonce, wallet_id);
        s
    }

    fn with_capacity(len: usize) -> Self {
        Self {
            buf: String::with_capacity(len + 8),
        }
    }

    fn push_envelope(&mut self, time: &str, nonce: &str, wallet_id: &str) {
        self.push(time);
        self.push(nonce);
        self.push(wallet_id);
    }

    /// Append one operation field.
    pub fn field(mut self, value: &str) -> Self {
        self.push(value);
        self
    }

    /// Append operation fields in order.
    pub fn fields<'a>(mut self, values: impl IntoIterator<Item = &'a str>) -> Self {
        for value in values {
            self.push(value);
        }
        self
    }

    pub fn finish(self) -> String {
        self.buf
    }

    fn push(&mut self, value: &str) {
        self.buf.push_str(value);
        self.buf.push(DELIMITER);
    }
}
