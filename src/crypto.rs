use bip39::{Language, Mnemonic};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;
use rand::RngCore;
use std::sync::Arc;

use crate::client::RpcClient;
use crate::error::SextantError;

pub struct KeyPair {
    pub signing_key: SigningKey,
}

impl KeyPair {
    /// Generate a new Ed25519 keypair
    pub fn generate() -> Self {
        let mut csprng = OsRng;
        KeyPair {
            signing_key: SigningKey::generate(&mut csprng),
        }
    }

    /// Generate a new 12-word mnemonic
    pub fn generate_mnemonic() -> String {
        let mut entropy = [0u8; 16]; // 128 bits = 12 words
        let mut csprng = OsRng;
        csprng.fill_bytes(&mut entropy);
        let mnemonic = Mnemonic::from_entropy(&entropy).expect("valid entropy length");
        mnemonic.to_string()
    }

    /// Restore keypair from mnemonic
    pub fn from_mnemonic(phrase: &str) -> Result<Self, SextantError> {
        let mnemonic = Mnemonic::parse_in_normalized(Language::English, phrase)
            .map_err(|e| SextantError::IdentityGeneration(format!("invalid mnemonic: {}", e)))?;
        let seed = mnemonic.to_seed("");

        // Use first 32 bytes of the seed for the Ed25519 secret
        let mut secret = [0u8; 32];
        secret.copy_from_slice(&seed[0..32]);
        Ok(KeyPair {
            signing_key: SigningKey::from_bytes(&secret),
        })
    }

    /// Restore keypair from a hex-encoded 32-byte secret
    pub fn from_secret_hex(secret_hex: &str) -> Result<Self, SextantError> {
        let bytes = hex::decode(secret_hex)
            .map_err(|e| SextantError::Serialization(format!("invalid secret hex: {}", e)))?;
        let secret: [u8; 32] = bytes
            .try_into()
            .map_err(|_| SextantError::Serialization("signing key must be 32 bytes".to_string()))?;
        Ok(KeyPair {
            signing_key: SigningKey::from_bytes(&secret),
        })
    }

    /// Hex-encoded 32-byte secret, the inverse of [`KeyPair::from_secret_hex`]
    pub fn secret_hex(&self) -> String {
        hex::encode(self.signing_key.to_bytes())
    }

    /// Sign a message with the private key
    pub fn sign(&self, message: &[u8]) -> Signature {
        self.signing_key.sign(message)
    }

    /// Verify a signature against a message using this keypair's public key
    pub fn verify(&self, message: &[u8], signature: &Signature) -> bool {
        self.signing_key
            .verifying_key()
            .verify(message, signature)
            .is_ok()
    }

    pub fn public_key(&self) -> VerifyingKey {
        self.signing_key.verifying_key()
    }

    /// Sign a message and return hex string
    pub fn sign_hex(&self, message: &[u8]) -> String {
        hex::encode(self.sign(message).to_bytes())
    }

    /// Get public key as hex string
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.public_key().to_bytes())
    }
}

/// Transaction-signing object bound to one unlocked account key and the
/// pooled client for its network. Built at login, dropped at logout.
pub struct TxSigner {
    keypair: KeyPair,
    client: Arc<RpcClient>,
}

impl TxSigner {
    pub fn new(keypair: KeyPair, client: Arc<RpcClient>) -> Self {
        Self { keypair, client }
    }

    pub fn public_key_hex(&self) -> String {
        self.keypair.public_key_hex()
    }

    pub fn sign_hex(&self, message: &[u8]) -> String {
        self.keypair.sign_hex(message)
    }

    /// Sign and submit a transfer through the network client.
    pub async fn submit_transfer(&self, to: &str, amount: u64) -> Result<String, SextantError> {
        let from = self.public_key_hex();
        let message = format!("transfer:{}:{}:{}", from, to, amount);
        let signature = self.sign_hex(message.as_bytes());
        self.client.submit_transfer(&from, to, amount, &signature).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_and_verify() {
        let keypair = KeyPair::generate();
        let message = b"hello sextant";

        let signature = keypair.sign(message);
        assert!(keypair.verify(message, &signature));
        assert!(!keypair.verify(b"tampered", &signature));
    }

    #[test]
    fn test_sign_hex_verifies_against_public_key() {
        let keypair = KeyPair::generate();
        let message = b"payload";
        let sig_hex = keypair.sign_hex(message);

        let sig_bytes = hex::decode(sig_hex).unwrap();
        let signature = Signature::from_slice(&sig_bytes).unwrap();
        assert!(keypair.verify(message, &signature));
    }

    #[test]
    fn test_mnemonic_is_deterministic() {
        let phrase = KeyPair::generate_mnemonic();
        let a = KeyPair::from_mnemonic(&phrase).unwrap();
        let b = KeyPair::from_mnemonic(&phrase).unwrap();
        assert_eq!(a.public_key_hex(), b.public_key_hex());
    }

    #[test]
    fn test_secret_hex_round_trip() {
        let keypair = KeyPair::generate();
        let restored = KeyPair::from_secret_hex(&keypair.secret_hex()).unwrap();
        assert_eq!(keypair.public_key_hex(), restored.public_key_hex());
    }
}
