// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Powm Wallet Core - request signing and sealed local storage
//!
//! Device-side core of the Powm identity wallet. The host application owns
//! the UI, the HTTP client and the platform secure storage; this crate
//! authenticates wallet API calls and keeps wallet data confidential at rest.
//!
//! ## Modules
//!
//! - `crypto` - Signature schemes, key decoding, attribute hashing
//! - `request` - Canonical signing strings and signed wallet operations
//! - `storage` - AES-256-GCM sealed files (wallet, disclosure history)
//! - `keystore` - Secure key storage seam
//! - `config` / `logging` - Environment configuration and tracing setup

pub mod config;
pub mod crypto;
pub mod keystore;
pub mod logging;
pub mod models;
pub mod request;
pub mod storage;
