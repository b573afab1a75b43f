// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet repository.
//!
//! The public half of the wallet (id, public key, scheme, attributes) is a
//! sealed document in the data directory. The private key goes to secure
//! storage at creation and is only read back by the request signer.

use std::collections::BTreeMap;

use super::{BlobRead, BlobStorage, SealedFile, StorageError, StorageResult};
use crate::crypto::{generate_key_pair, SignatureScheme};
use crate::keystore::{SecureKeyStore, STORAGE_MASTER_KEY, WALLET_PRIVATE_KEY};
use crate::models::{AttributeValue, Wallet};

/// Repository for the single wallet on this device.
pub struct WalletStore<'a, K> {
    blobs: &'a BlobStorage,
    keystore: &'a K,
    file: SealedFile<'a, K>,
}

impl<'a, K: SecureKeyStore> WalletStore<'a, K> {
    pub fn new(blobs: &'a BlobStorage, keystore: &'a K) -> Self {
        Self {
            blobs,
            keystore,
            file: SealedFile::new(blobs, keystore, blobs.paths().wallet_file()),
        }
    }

    /// Provision a new wallet.
    ///
    /// # Arguments
    /// * `id` - Identifier assigned by the wallet API
    /// * `scheme` - Signing scheme, fixed for the wallet's lifetime
    ///
    /// # Returns
    /// The persisted wallet. Its private key is in secure storage only.
    ///
    /// # Errors
    /// `AlreadyExists` if a wallet file is present.
    pub async fn create(&self, id: &str, scheme: SignatureScheme) -> StorageResult<Wallet> {
        if let BlobRead::Present(_) = self.blobs.read_blob(self.file.path()).await? {
            return Err(StorageError::AlreadyExists(format!("wallet {id}")));
        }

        let pair = generate_key_pair(scheme).map_err(StorageError::KeyGeneration)?;
        self.keystore
            .set(WALLET_PRIVATE_KEY, &pair.private_key_pkcs8_der)
            .await
            .map_err(StorageError::KeyUnavailable)?;

        let wallet = Wallet::new(id, pair.public_key_spki_der, scheme);
        self.save(&wallet).await?;

        tracing::info!(wallet_id = %wallet.id, scheme = %scheme, "Wallet created");
        Ok(wallet)
    }

    /// Load the wallet, `None` before onboarding.
    pub async fn load(&self) -> StorageResult<Option<Wallet>> {
        self.file.read().await
    }

    pub async fn save(&self, wallet: &Wallet) -> StorageResult<()> {
        self.file.write(wallet).await
    }

    /// Merge attributes consumed from identity verification and persist.
    ///
    /// Attributes are only added or replaced, never removed.
    pub async fn merge_attributes(
        &self,
        incoming: BTreeMap<String, AttributeValue>,
    ) -> StorageResult<Wallet> {
        let mut wallet = self
            .load()
            .await?
            .ok_or_else(|| StorageError::NotFound("wallet".to_string()))?;

        let changed = wallet.merge_attributes(incoming);
        if changed > 0 {
            self.save(&wallet).await?;
        }

        tracing::debug!(wallet_id = %wallet.id, changed, "Attributes merged");
        Ok(wallet)
    }

    /// Remove every trace of the wallet from this device: wallet file,
    /// history file, private key and master key.
    pub async fn wipe(&self) -> StorageResult<()> {
        self.file.remove().await?;
        self.blobs.delete(self.blobs.paths().history_file()).await?;

        for name in [WALLET_PRIVATE_KEY, STORAGE_MASTER_KEY] {
            self.keystore
                .delete(name)
                .await
                .map_err(StorageError::KeyUnavailable)?;
        }

        tracing::info!("Wallet wiped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::sign;
    use crate::keystore::InMemoryKeyStore;
    use crate::models::{DisclosureResult, NewHistoryRecord, RequesterType};
    use crate::storage::blob_fs::tests::test_storage;
    use crate::storage::HistoryStore;

    #[tokio::test]
    async fn create_stores_private_key_separately() {
        let (_dir, blobs) = test_storage().await;
        let keystore = InMemoryKeyStore::new();
        let store = WalletStore::new(&blobs, &keystore);

        let wallet = store
            .create("wlt_new", SignatureScheme::EcdsaP256Sha256)
            .await
            .unwrap();
        assert_eq!(store.load().await.unwrap(), Some(wallet.clone()));

        let private_key = keystore.get(WALLET_PRIVATE_KEY).await.unwrap().unwrap();
        let signature = sign(wallet.signing_algorithm, &private_key, b"probe").unwrap();
        assert!(wallet.verify_signature(b"probe", &signature).unwrap());
    }

    #[tokio::test]
    async fn create_refuses_to_overwrite() {
        let (_dir, blobs) = test_storage().await;
        let keystore = InMemoryKeyStore::new();
        let store = WalletStore::new(&blobs, &keystore);

        let first = store.create("wlt_a", SignatureScheme::Ed25519).await.unwrap();
        let key_before = keystore.get(WALLET_PRIVATE_KEY).await.unwrap();

        let err = store
            .create("wlt_b", SignatureScheme::Ed25519)
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::AlreadyExists(_)));
        assert_eq!(keystore.get(WALLET_PRIVATE_KEY).await.unwrap(), key_before);
        assert_eq!(store.load().await.unwrap(), Some(first));
    }

    #[tokio::test]
    async fn load_before_onboarding_is_none() {
        let (_dir, blobs) = test_storage().await;
        let keystore = InMemoryKeyStore::new();
        assert_eq!(WalletStore::new(&blobs, &keystore).load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn merge_attributes_persists() {
        let (_dir, blobs) = test_storage().await;
        let keystore = InMemoryKeyStore::new();
        let store = WalletStore::new(&blobs, &keystore);
        store.create("wlt_attr", SignatureScheme::Ed25519).await.unwrap();

        let mut incoming = BTreeMap::new();
        incoming.insert("first_name".to_string(), AttributeValue::new("Jane"));
        let merged = store.merge_attributes(incoming).await.unwrap();

        assert_eq!(merged.attribute("first_name").map(|a| a.value.as_str()), Some("Jane"));
        assert!(merged.updated_at.is_some());
        assert_eq!(store.load().await.unwrap(), Some(merged));
    }

    #[tokio::test]
    async fn merge_without_wallet_is_not_found() {
        let (_dir, blobs) = test_storage().await;
        let keystore = InMemoryKeyStore::new();
        let err = WalletStore::new(&blobs, &keystore)
            .merge_attributes(BTreeMap::new())
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[tokio::test]
    async fn wipe_removes_files_and_keys() {
        let (_dir, blobs) = test_storage().await;
        let keystore = InMemoryKeyStore::new();
        let store = WalletStore::new(&blobs, &keystore);
        store.create("wlt_wipe", SignatureScheme::Ed25519).await.unwrap();
        HistoryStore::new(&blobs, &keystore)
            .append(NewHistoryRecord {
                requester_id: "app-1".to_string(),
                requester_type: RequesterType::Application,
                requester_display_name: None,
                result: DisclosureResult::Rejected,
                attributes_requested: Vec::new(),
            })
            .await
            .unwrap();

        store.wipe().await.unwrap();

        assert!(!blobs.paths().wallet_file().exists());
        assert!(!blobs.paths().history_file().exists());
        assert!(keystore.get(WALLET_PRIVATE_KEY).await.unwrap().is_none());
        assert!(keystore.get(STORAGE_MASTER_KEY).await.unwrap().is_none());

        // a wiped device can onboard again
        store.create("wlt_again", SignatureScheme::Ed25519).await.unwrap();
    }
}
