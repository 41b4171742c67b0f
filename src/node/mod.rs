//! Session runtime node: the stateful object bound to one logged-in
//! account. Owns the network client reference, the transaction signer,
//! the decrypted key set and the keeper, and runs background sync until
//! destroyed.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::account::types::{DecryptedKeySet, Identity};
use crate::client::RpcClient;
use crate::crypto::TxSigner;
use crate::error::SextantError;
use crate::keeper::Keeper;

pub struct SextantNode {
    pub handle: String,
    pub network: String,
    pub identity: Identity,
    signer: TxSigner,
    keys: DecryptedKeySet,
    keeper: Keeper,
    shutdown: watch::Sender<bool>,
    sync_task: JoinHandle<()>,
}

impl SextantNode {
    /// Construct the node and start its background sync loop. The loop
    /// polls chain height through the pooled client every `sync_interval`
    /// and records the confirmed height in the keeper; poll errors are
    /// logged and retried on the next tick.
    #[allow(clippy::too_many_arguments)]
    pub fn start(
        handle: String,
        network: String,
        client: Arc<RpcClient>,
        signer: TxSigner,
        keys: DecryptedKeySet,
        keeper: Keeper,
        identity: Identity,
        sync_interval: Duration,
        confirmation_depth: u64,
    ) -> Self {
        let (shutdown, mut shutdown_rx) = watch::channel(false);

        let sync_client = client.clone();
        let sync_keeper = keeper.clone();
        let sync_handle = handle.clone();
        let sync_task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = tokio::time::sleep(sync_interval) => {
                        match sync_client.chain_height().await {
                            Ok(height) => {
                                let confirmed = height.saturating_sub(confirmation_depth);
                                debug!(
                                    "Sync '{}': height {} (confirmed {})",
                                    sync_handle, height, confirmed
                                );
                                if let Err(e) = sync_keeper.put("sync/confirmed_height", &confirmed) {
                                    warn!("Sync '{}': keeper write failed: {}", sync_handle, e);
                                }
                            }
                            Err(e) => warn!("Sync '{}': poll failed: {}", sync_handle, e),
                        }
                    }
                    _ = shutdown_rx.changed() => break,
                }
            }
        });

        info!(
            "Session node started for '{}' on '{}' (endpoint {})",
            handle,
            network,
            client.url()
        );

        Self {
            handle,
            network,
            identity,
            signer,
            keys,
            keeper,
            shutdown,
            sync_task,
        }
    }

    pub fn signer(&self) -> &TxSigner {
        &self.signer
    }

    pub fn keys(&self) -> &DecryptedKeySet {
        &self.keys
    }

    /// Tear the node down: stop background sync, wait for it, then close
    /// the keeper. Consumes the node so a destroyed session cannot be
    /// reused; the decrypted key set drops with it.
    pub async fn destroy(self) -> Result<(), SextantError> {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.sync_task.await {
            if !e.is_cancelled() {
                warn!("Sync task for '{}' ended abnormally: {}", self.handle, e);
            }
        }

        let result = self
            .keeper
            .close()
            .map_err(|e| SextantError::Teardown(e.to_string()));
        info!("Session node for '{}' destroyed", self.handle);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::KeyPair;
    use tempfile::TempDir;

    fn test_node(tmp: &TempDir) -> SextantNode {
        let (identity, keys) = crate::identity::generate("alice", "testnet").unwrap();
        let client = Arc::new(RpcClient::new(
            "testnet".to_string(),
            "http://127.0.0.1:9000".to_string(),
        ));
        let record = keys.select_signing_key("testnet").unwrap();
        let keypair = KeyPair::from_secret_hex(&record.secret).unwrap();
        let signer = TxSigner::new(keypair, client.clone());
        let keeper = Keeper::open(&tmp.path().join("keeper"), true).unwrap();

        SextantNode::start(
            "alice".to_string(),
            "testnet".to_string(),
            client,
            signer,
            keys,
            keeper,
            identity,
            Duration::from_secs(3600),
            6,
        )
    }

    #[tokio::test]
    async fn test_start_and_destroy() {
        let tmp = TempDir::new().unwrap();
        let node = test_node(&tmp);

        assert_eq!(node.handle, "alice");
        assert!(node.keys().select_signing_key("testnet").is_some());
        node.destroy().await.unwrap();
    }

    #[tokio::test]
    async fn test_signer_bound_to_identity_key() {
        let tmp = TempDir::new().unwrap();
        let node = test_node(&tmp);

        let expected = node.identity.signing_descriptor("testnet").unwrap();
        assert_eq!(node.signer().public_key_hex(), expected.public_key);
        node.destroy().await.unwrap();
    }
}
