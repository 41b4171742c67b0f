//! Account and identity type definitions

use serde::{Deserialize, Serialize};

/// Account identifier - human-readable, case-insensitive handle
pub type Handle = String;

/// Key kind for network signing keys
pub const SIGNING_KEY_KIND: &str = "ed25519-signing";
/// Key kind for encryption keys
pub const ENCRYPTION_KEY_KIND: &str = "x25519-encryption";

/// Public identity document for an account. Written once at account
/// creation, never mutated afterwards.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Identity {
    pub handle: Handle,
    pub created_at: u64,
    pub keys: Vec<KeyDescriptor>,
}

/// Public descriptor for one of an identity's keys
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct KeyDescriptor {
    pub kind: String,
    pub network: String,
    pub public_key: String, // Hex encoded
}

/// One private key record. Exists in plaintext only inside a
/// [`DecryptedKeySet`] during login or password checks.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct KeyRecord {
    pub kind: String,
    pub network: String,
    pub secret: String, // Hex encoded
}

/// Ephemeral, in-memory decrypted key material. Never persisted; the
/// session node absorbs what it needs and the rest is dropped.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct DecryptedKeySet {
    pub keys: Vec<KeyRecord>,
}

impl DecryptedKeySet {
    /// Select the signing key for a network. When more than one record
    /// matches, the first in catalog order wins (deterministic tie-break;
    /// multiple matches carry no documented meaning).
    pub fn select_signing_key(&self, network: &str) -> Option<&KeyRecord> {
        self.keys
            .iter()
            .find(|k| k.kind == SIGNING_KEY_KIND && k.network == network)
    }
}

impl Identity {
    pub fn signing_descriptor(&self, network: &str) -> Option<&KeyDescriptor> {
        self.keys
            .iter()
            .find(|k| k.kind == SIGNING_KEY_KIND && k.network == network)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(kind: &str, network: &str, secret: &str) -> KeyRecord {
        KeyRecord {
            kind: kind.to_string(),
            network: network.to_string(),
            secret: secret.to_string(),
        }
    }

    #[test]
    fn test_select_signing_key_first_match() {
        let set = DecryptedKeySet {
            keys: vec![
                record(ENCRYPTION_KEY_KIND, "testnet", "aa"),
                record(SIGNING_KEY_KIND, "testnet", "bb"),
                record(SIGNING_KEY_KIND, "testnet", "cc"),
            ],
        };

        let selected = set.select_signing_key("testnet").unwrap();
        assert_eq!(selected.secret, "bb");
    }

    #[test]
    fn test_select_signing_key_no_match() {
        let set = DecryptedKeySet {
            keys: vec![record(SIGNING_KEY_KIND, "mainnet", "aa")],
        };
        assert!(set.select_signing_key("testnet").is_none());
    }
}
