// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Signed Wallet Requests
//!
//! Every call to the wallet API carries `time`, `nonce`, `wallet_id` and a
//! `wallet_signature` over a canonical string of those values plus the
//! operation fields. This module builds that string, signs it with the key
//! in secure storage and shapes the JSON body.
//!
//! Sending the request and retrying are the caller's concern.

pub mod canonical;
pub mod operations;
pub mod signer;
pub mod status;

pub use canonical::{format_request_time, generate_nonce, is_signable_field, SigningString};
pub use operations::{
    canonical_string, ConsumeIdentityVerification, ConsumeIdentityVerificationResponse,
    DeleteWallet, OperationError, SignedOperation, SignedRequest, StartIdentityVerification,
    StartIdentityVerificationResponse, WalletStatus,
};
pub use signer::RequestSigner;
pub use status::{IdentityVerificationStatus, NextAction, WalletStatusResponse};
