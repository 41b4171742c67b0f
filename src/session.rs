//! Account and session lifecycle service.
//!
//! One `AccountService` is built at process start and owns all mutable
//! state: the account catalog, the client pool and the single session
//! slot. Every public operation serializes on one async mutex, so a login
//! racing a logout (or two concurrent logins) can never both touch the
//! current session.

use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::account::types::{DecryptedKeySet, Identity};
use crate::account::AccountStore;
use crate::cipher::{self, EncryptionParams};
use crate::client::ClientPool;
use crate::config::SextantConfig;
use crate::crypto::{KeyPair, TxSigner};
use crate::error::SextantError;
use crate::identity;
use crate::keeper::Keeper;
use crate::node::SextantNode;

struct ServiceInner {
    store: AccountStore,
    session: Option<SextantNode>,
}

pub struct AccountService {
    config: SextantConfig,
    params: EncryptionParams,
    pool: ClientPool,
    inner: Mutex<ServiceInner>,
}

impl AccountService {
    pub fn new(config: SextantConfig) -> Self {
        let store = AccountStore::new(config.node.accounts_dir.clone());
        let pool = ClientPool::new(config.networks.clone());
        Self {
            config,
            params: EncryptionParams::default(),
            pool,
            inner: Mutex::new(ServiceInner {
                store,
                session: None,
            }),
        }
    }

    /// Build the in-memory catalog from disk. Call once at startup.
    pub async fn load_catalog(&self) -> Result<usize, SextantError> {
        let mut inner = self.inner.lock().await;
        inner.store.load_catalog()
    }

    pub async fn handles(&self) -> Vec<String> {
        self.inner.lock().await.store.handles()
    }

    /// Handle of the active session, if any.
    pub async fn current_handle(&self) -> Option<String> {
        self.inner
            .lock()
            .await
            .session
            .as_ref()
            .map(|node| node.handle.clone())
    }

    /// Public key the active session signs with, if any.
    pub async fn current_signer_pubkey(&self) -> Option<String> {
        self.inner
            .lock()
            .await
            .session
            .as_ref()
            .map(|node| node.signer().public_key_hex())
    }

    /// Create a new account: generate an identity and raw key set, encrypt
    /// the key set under the password, and persist both artifacts.
    pub async fn create_account(
        &self,
        handle: &str,
        password: &str,
    ) -> Result<Identity, SextantError> {
        let mut inner = self.inner.lock().await;
        if inner.store.contains(handle) {
            return Err(SextantError::AlreadyExists(handle.to_lowercase()));
        }

        let network = &self.config.node.network;
        let (identity, key_set) = identity::generate(&handle.to_lowercase(), network)?;

        let plaintext = serde_json::to_vec(&key_set)?;
        let blob = cipher::encrypt(&plaintext, password, &self.params)?;
        inner.store.create(handle, &identity, &blob)?;

        info!("Account '{}' created", identity.handle);
        Ok(identity)
    }

    /// Unlock an account into the active session. An existing session is
    /// fully torn down first - login never runs concurrently with a
    /// previous session's cleanup.
    pub async fn login(&self, handle: &str, password: &str) -> Result<(), SextantError> {
        let mut inner = self.inner.lock().await;

        let identity = inner
            .store
            .identity(handle)
            .cloned()
            .ok_or_else(|| SextantError::NotFound(handle.to_lowercase()))?;

        if let Some(previous) = inner.session.take() {
            info!("Replacing active session '{}'", previous.handle);
            if let Err(e) = previous.destroy().await {
                // Forward progress over a zombie session: the slot is
                // already clear, the new login proceeds.
                warn!("Teardown of previous session failed: {}", e);
            }
        }

        let key_set = Self::decrypt_key_set(&inner.store, handle, password, &self.params)?;
        let network = self.config.node.network.clone();
        let record = key_set
            .select_signing_key(&network)
            .ok_or_else(|| SextantError::NoMatchingKey {
                handle: identity.handle.clone(),
                network: network.clone(),
            })?;
        let keypair = KeyPair::from_secret_hex(&record.secret)?;

        let client = self.pool.get(&network);
        let signer = TxSigner::new(keypair, client.clone());
        let keeper_path = inner.store.account_dir(handle).join("keeper");
        let keeper = Keeper::open(&keeper_path, true)?;

        let node = SextantNode::start(
            identity.handle.clone(),
            network,
            client,
            signer,
            key_set,
            keeper,
            identity,
            Duration::from_secs(self.config.node.sync_interval_secs),
            self.config.node.confirmation_depth,
        );

        info!("Logged in as '{}'", node.handle);
        inner.session = Some(node);
        Ok(())
    }

    /// Destroy the active session. The slot is cleared even when teardown
    /// fails; the error is still reported to the caller.
    pub async fn logout(&self) -> Result<(), SextantError> {
        let mut inner = self.inner.lock().await;
        let node = inner.session.take().ok_or(SextantError::NotLoggedIn)?;
        let handle = node.handle.clone();
        let result = node.destroy().await;
        match &result {
            Ok(()) => info!("Logged out from '{}'", handle),
            Err(e) => warn!("Logged out from '{}' with teardown error: {}", handle, e),
        }
        result
    }

    /// Sign and submit a transfer through the active session's signer.
    /// Wallet semantics live on the other side of the client; this is a
    /// passthrough.
    pub async fn submit_transfer(&self, to: &str, amount: u64) -> Result<String, SextantError> {
        let inner = self.inner.lock().await;
        let node = inner.session.as_ref().ok_or(SextantError::NotLoggedIn)?;
        node.signer().submit_transfer(to, amount).await
    }

    /// Password gate for destructive operations: decrypts the key blob and
    /// discards it without constructing any session state.
    pub async fn check_password(&self, handle: &str, password: &str) -> Result<(), SextantError> {
        let inner = self.inner.lock().await;
        Self::decrypt_key_set(&inner.store, handle, password, &self.params).map(|_| ())
    }

    /// Delete an account after verifying the password.
    pub async fn delete_account(&self, handle: &str, password: &str) -> Result<(), SextantError> {
        let mut inner = self.inner.lock().await;
        Self::decrypt_key_set(&inner.store, handle, password, &self.params)?;
        inner.store.delete(handle)
    }

    fn decrypt_key_set(
        store: &AccountStore,
        handle: &str,
        password: &str,
        params: &EncryptionParams,
    ) -> Result<DecryptedKeySet, SextantError> {
        let blob = store.load_encrypted_keys(handle)?;
        let plaintext = cipher::decrypt(&blob, password, params)?;
        serde_json::from_slice(&plaintext).map_err(|e| e.into())
    }
}
