// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Wallet Cryptography
//!
//! Thin layer over the RustCrypto and dalek primitives used by the wallet:
//!
//! - `scheme` - signature scheme names and curve/digest dispatch
//! - `keys` - PKCS#8 / SPKI decoding and key pair generation
//! - `signing` - sign and verify for the five wallet schemes
//! - `attributes` - salted attribute digests for selective disclosure
//!
//! Nothing here touches storage; callers pass key bytes in and drop them
//! when the call returns.

pub mod attributes;
pub mod keys;
pub mod scheme;
pub mod signing;

pub use attributes::{generate_salt, hash_attribute, AttributeError, AttributeHashingScheme};
pub use keys::{decode_key_material, generate_key_pair, KeyError, KeyPair};
pub use scheme::{is_scheme_supported, normalize_scheme, Curve, DigestAlgorithm, SignatureScheme};
pub use signing::{sign, verify, SigningError};
