//! Identity generation for new accounts.
//!
//! This is the boundary to the identity format: the rest of the crate
//! treats the generated document and key records as opaque.

use rand::rngs::OsRng;
use rand::RngCore;

use crate::account::types::{
    DecryptedKeySet, Identity, KeyDescriptor, KeyRecord, ENCRYPTION_KEY_KIND, SIGNING_KEY_KIND,
};
use crate::crypto::KeyPair;
use crate::error::SextantError;

/// Generate a fresh identity document and its raw private key set for
/// `network`: a mnemonic-seeded Ed25519 signing key plus an encryption key.
pub fn generate(handle: &str, network: &str) -> Result<(Identity, DecryptedKeySet), SextantError> {
    let mnemonic = KeyPair::generate_mnemonic();
    let signing = KeyPair::from_mnemonic(&mnemonic)?;

    let mut encryption_secret = [0u8; 32];
    OsRng.fill_bytes(&mut encryption_secret);
    // Clamp per X25519 convention
    encryption_secret[0] &= 248;
    encryption_secret[31] &= 127;
    encryption_secret[31] |= 64;

    let identity = Identity {
        handle: handle.to_string(),
        created_at: current_timestamp(),
        keys: vec![
            KeyDescriptor {
                kind: SIGNING_KEY_KIND.to_string(),
                network: network.to_string(),
                public_key: signing.public_key_hex(),
            },
            KeyDescriptor {
                kind: ENCRYPTION_KEY_KIND.to_string(),
                network: network.to_string(),
                public_key: String::new(), // Derived on demand; not published yet
            },
        ],
    };

    let key_set = DecryptedKeySet {
        keys: vec![
            KeyRecord {
                kind: SIGNING_KEY_KIND.to_string(),
                network: network.to_string(),
                secret: signing.secret_hex(),
            },
            KeyRecord {
                kind: ENCRYPTION_KEY_KIND.to_string(),
                network: network.to_string(),
                secret: hex::encode(encryption_secret),
            },
        ],
    };

    Ok((identity, key_set))
}

fn current_timestamp() -> u64 {
    chrono::Utc::now().timestamp_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_produces_matching_keys() {
        let (identity, key_set) = generate("alice", "testnet").unwrap();

        assert_eq!(identity.handle, "alice");
        assert_eq!(identity.keys.len(), 2);
        assert_eq!(key_set.keys.len(), 2);

        let signing_record = key_set.select_signing_key("testnet").unwrap();
        let restored = KeyPair::from_secret_hex(&signing_record.secret).unwrap();
        let descriptor = identity.signing_descriptor("testnet").unwrap();
        assert_eq!(restored.public_key_hex(), descriptor.public_key);
    }

    #[test]
    fn test_generate_fresh_keys_each_call() {
        let (a, _) = generate("alice", "testnet").unwrap();
        let (b, _) = generate("alice", "testnet").unwrap();
        assert_ne!(
            a.signing_descriptor("testnet").unwrap().public_key,
            b.signing_descriptor("testnet").unwrap().public_key
        );
    }
}
