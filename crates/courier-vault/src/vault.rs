// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! String-level credential encryption keyed by a single AES-256 key.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use courier_core::CourierError;
use zeroize::Zeroizing;

use crate::crypto;

/// Prefix marking base64-encoded key material in configuration.
const BASE64_KEY_PREFIX: &str = "base64:";

/// Encoded ciphertexts shorter than this are assumed to be plaintext.
const ENCRYPTED_MIN_LEN: usize = 50;

/// Encrypts and decrypts credential strings.
///
/// Output of [`Vault::encrypt`] is `base64(nonce ‖ ciphertext ‖ tag)`, so two
/// encryptions of the same value never produce the same string.
#[derive(Clone)]
pub struct Vault {
    key: Zeroizing<[u8; 32]>,
}

impl std::fmt::Debug for Vault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vault").field("key", &"[REDACTED]").finish()
    }
}

impl Vault {
    /// Build a vault from raw key bytes. The key must be exactly 32 bytes.
    pub fn new(key: &[u8]) -> Result<Self, CourierError> {
        let key: [u8; 32] = key
            .try_into()
            .map_err(|_| CourierError::InvalidKeyLength { actual: key.len() })?;
        Ok(Self {
            key: Zeroizing::new(key),
        })
    }

    /// Build a vault from configured key material.
    ///
    /// Accepts either a literal 32-byte string or `base64:<encoded 32 bytes>`.
    pub fn from_key_material(material: &str) -> Result<Self, CourierError> {
        match material.strip_prefix(BASE64_KEY_PREFIX) {
            Some(encoded) => {
                let decoded = Zeroizing::new(STANDARD.decode(encoded.trim()).map_err(|e| {
                    CourierError::Config(format!("vault key is not valid base64: {e}"))
                })?);
                Self::new(&decoded)
            }
            None => Self::new(material.as_bytes()),
        }
    }

    /// Vault with a freshly generated key. Useful for tests and ephemeral stores.
    pub fn generate() -> Result<Self, CourierError> {
        let key = Zeroizing::new(crypto::generate_key()?);
        Self::new(key.as_ref())
    }

    pub fn encrypt(&self, plaintext: &str) -> Result<String, CourierError> {
        let sealed = crypto::seal(&self.key, plaintext.as_bytes())?;
        Ok(STANDARD.encode(sealed))
    }

    pub fn decrypt(&self, encoded: &str) -> Result<String, CourierError> {
        let sealed = STANDARD
            .decode(encoded)
            .map_err(|e| CourierError::Decryption(format!("ciphertext is not valid base64: {e}")))?;
        let plaintext = crypto::open(&self.key, &sealed)?;
        String::from_utf8(plaintext)
            .map_err(|_| CourierError::Decryption("plaintext is not valid UTF-8".to_string()))
    }

    /// Heuristic check: valid base64 and long enough to hold a nonce and tag.
    ///
    /// Can misclassify long base64-looking plaintexts; never use it as a
    /// security decision.
    pub fn is_encrypted(value: &str) -> bool {
        value.len() > ENCRYPTED_MIN_LEN && STANDARD.decode(value).is_ok()
    }
}

/// Mask a secret for display: first four and last four characters.
///
/// Secrets shorter than 10 characters are fully masked.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() < 10 {
        return "****".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}
