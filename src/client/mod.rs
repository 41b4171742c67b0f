//! Network clients: one lazily constructed, pooled client per network name.

pub mod rpc_client;

pub use rpc_client::RpcClient;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::info;

/// Cache of one client per network name, created on first use and kept for
/// the process lifetime. Get-or-create runs under the lock so two racing
/// first accesses cannot produce two clients for one network.
pub struct ClientPool {
    endpoints: HashMap<String, String>,
    clients: Mutex<HashMap<String, Arc<RpcClient>>>,
}

impl ClientPool {
    pub fn new(endpoints: HashMap<String, String>) -> Self {
        Self {
            endpoints,
            clients: Mutex::new(HashMap::new()),
        }
    }

    pub fn get(&self, network: &str) -> Arc<RpcClient> {
        let mut clients = self.clients.lock().expect("client pool lock poisoned");
        if let Some(client) = clients.get(network) {
            return client.clone();
        }

        let url = self
            .endpoints
            .get(network)
            .cloned()
            .unwrap_or_else(|| "http://127.0.0.1:9000".to_string());
        info!("Creating client for network '{}' at {}", network, url);
        let client = Arc::new(RpcClient::new(network.to_string(), url));
        clients.insert(network.to_string(), client.clone());
        client
    }

    pub fn client_count(&self) -> usize {
        self.clients.lock().expect("client pool lock poisoned").len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool() -> ClientPool {
        let mut endpoints = HashMap::new();
        endpoints.insert("testnet".to_string(), "http://127.0.0.1:9000".to_string());
        ClientPool::new(endpoints)
    }

    #[test]
    fn test_get_is_idempotent_per_network() {
        let pool = pool();
        let a = pool.get("testnet");
        let b = pool.get("testnet");
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(pool.client_count(), 1);
    }

    #[test]
    fn test_distinct_networks_get_distinct_clients() {
        let pool = pool();
        let a = pool.get("testnet");
        let b = pool.get("mainnet");
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(pool.client_count(), 2);
    }

    #[test]
    fn test_concurrent_first_access_creates_one_client() {
        let pool = Arc::new(pool());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let pool = pool.clone();
                std::thread::spawn(move || pool.get("testnet"))
            })
            .collect();

        let clients: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(pool.client_count(), 1);
        for client in &clients[1..] {
            assert!(Arc::ptr_eq(&clients[0], client));
        }
    }
}
