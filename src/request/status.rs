// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet status and the identity verification state machine.
//!
//! The status response tells the host application which signed operation
//! to invoke next.

use serde::{Deserialize, Serialize};

/// Server-side identity verification state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityVerificationStatus {
    NotStarted,
    Processing,
    Rejected,
    AcceptedAwaitingConsumption,
    Completed,
}

impl Default for IdentityVerificationStatus {
    fn default() -> Self {
        Self::NotStarted
    }
}

/// What the application should do after a status check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextAction {
    /// Call `start-identity-verification`.
    StartVerification,
    /// Verification is running; poll status again later.
    AwaitVerification,
    /// Call `consume-identity-verification` and merge the attributes.
    ConsumeVerification,
    /// Nothing left to do.
    Nothing,
}

impl IdentityVerificationStatus {
    pub fn next_action(self) -> NextAction {
        match self {
            IdentityVerificationStatus::NotStarted | IdentityVerificationStatus::Rejected => {
                NextAction::StartVerification
            }
            IdentityVerificationStatus::Processing => NextAction::AwaitVerification,
            IdentityVerificationStatus::AcceptedAwaitingConsumption => {
                NextAction::ConsumeVerification
            }
            IdentityVerificationStatus::Completed => NextAction::Nothing,
        }
    }
}

/// Response of `v1/wallets/status`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WalletStatusResponse {
    pub verified: bool,
    #[serde(default)]
    pub identity_verification: IdentityVerificationStatus,
}

impl WalletStatusResponse {
    pub fn next_action(&self) -> NextAction {
        self.identity_verification.next_action()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_status_maps_to_an_action() {
        use IdentityVerificationStatus::*;
        let cases = [
            (NotStarted, NextAction::StartVerification),
            (Processing, NextAction::AwaitVerification),
            (Rejected, NextAction::StartVerification),
            (AcceptedAwaitingConsumption, NextAction::ConsumeVerification),
            (Completed, NextAction::Nothing),
        ];
        for (status, action) in cases {
            assert_eq!(status.next_action(), action, "{status:?}");
        }
    }

    #[test]
    fn parses_server_response() {
        let response: WalletStatusResponse = serde_json::from_str(
            r#"{"verified":false,"identity_verification":"accepted_awaiting_consumption"}"#,
        )
        .unwrap();
        assert!(!response.verified);
        assert_eq!(response.next_action(), NextAction::ConsumeVerification);

        let bare: WalletStatusResponse = serde_json::from_str(r#"{"verified":true}"#).unwrap();
        assert_eq!(bare.identity_verification, IdentityVerificationStatus::NotStarted);

        assert!(serde_json::from_str::<WalletStatusResponse>(
            r#"{"verified":true,"identity_verification":"pending"}"#
        )
        .is_err());
    }
}
