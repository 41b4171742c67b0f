//! Password-based encryption for account key material.
//!
//! Blob layout: `salt || nonce || ciphertext`. The blob is self-describing:
//! only the password is needed to decrypt it.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use hmac::Hmac;
use pbkdf2::pbkdf2;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;

use crate::error::SextantError;

/// Fixed process-wide encryption parameter set. Encryption and decryption
/// must use identical parameters or decryption fails.
#[derive(Debug, Clone)]
pub struct EncryptionParams {
    pub salt_len: usize,
    pub iterations: u32,
    pub key_len: usize,
    pub nonce_len: usize,
}

impl Default for EncryptionParams {
    fn default() -> Self {
        Self {
            salt_len: 16,
            iterations: 100_000,
            key_len: 32,
            nonce_len: 12,
        }
    }
}

/// Derive a symmetric key from a password and salt. Deliberately expensive:
/// the iteration count is the built-in brute-force deterrent.
fn derive_key(password: &str, salt: &[u8], params: &EncryptionParams) -> Vec<u8> {
    let mut key = vec![0u8; params.key_len];
    pbkdf2::<Hmac<Sha256>>(password.as_bytes(), salt, params.iterations, &mut key);
    key
}

/// Encrypt a plaintext blob under a password with a fresh salt and nonce.
pub fn encrypt(
    plaintext: &[u8],
    password: &str,
    params: &EncryptionParams,
) -> Result<Vec<u8>, SextantError> {
    let mut salt = vec![0u8; params.salt_len];
    OsRng.fill_bytes(&mut salt);

    let key = derive_key(password, &salt, params);
    let cipher = Aes256Gcm::new_from_slice(&key)
        .map_err(|e| SextantError::Cipher(format!("invalid key length: {}", e)))?;

    let mut nonce_bytes = vec![0u8; params.nonce_len];
    OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .map_err(|e| SextantError::Cipher(format!("encryption failed: {:?}", e)))?;

    let mut blob = Vec::with_capacity(params.salt_len + params.nonce_len + ciphertext.len());
    blob.extend_from_slice(&salt);
    blob.extend_from_slice(&nonce_bytes);
    blob.extend_from_slice(&ciphertext);
    Ok(blob)
}

/// Decrypt a blob produced by [`encrypt`]. A wrong password or a malformed
/// blob both surface as `Authentication`.
pub fn decrypt(
    blob: &[u8],
    password: &str,
    params: &EncryptionParams,
) -> Result<Vec<u8>, SextantError> {
    if blob.len() < params.salt_len + params.nonce_len {
        return Err(SextantError::Authentication);
    }

    let salt = &blob[..params.salt_len];
    let nonce_bytes = &blob[params.salt_len..params.salt_len + params.nonce_len];
    let ciphertext = &blob[params.salt_len + params.nonce_len..];

    let key = derive_key(password, salt, params);
    let cipher = Aes256Gcm::new_from_slice(&key)
        .map_err(|_| SextantError::Authentication)?;
    let nonce = Nonce::from_slice(nonce_bytes);

    cipher
        .decrypt(nonce, ciphertext)
        .map_err(|_| SextantError::Authentication)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let params = EncryptionParams::default();
        let plaintext = b"sensitive key material";

        let blob = encrypt(plaintext, "correct horse battery", &params).unwrap();
        let decrypted = decrypt(&blob, "correct horse battery", &params).unwrap();

        assert_eq!(plaintext, decrypted.as_slice());
    }

    #[test]
    fn test_wrong_password_fails() {
        let params = EncryptionParams::default();
        let blob = encrypt(b"secret", "password1", &params).unwrap();

        let err = decrypt(&blob, "password2", &params).unwrap_err();
        assert!(matches!(err, SextantError::Authentication));
    }

    #[test]
    fn test_truncated_blob_fails() {
        let params = EncryptionParams::default();
        let blob = encrypt(b"secret", "password1", &params).unwrap();

        let err = decrypt(&blob[..10], "password1", &params).unwrap_err();
        assert!(matches!(err, SextantError::Authentication));
    }

    #[test]
    fn test_fresh_salt_per_call() {
        let params = EncryptionParams::default();
        let a = encrypt(b"same input", "pw", &params).unwrap();
        let b = encrypt(b"same input", "pw", &params).unwrap();
        assert_ne!(a, b);
    }
}
