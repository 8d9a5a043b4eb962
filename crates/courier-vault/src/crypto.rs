// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! AES-256-GCM sealing into a single `nonce ‖ ciphertext ‖ tag` buffer.
//!
//! Every call to [`seal`] draws a fresh 96-bit nonce from the system CSPRNG.
//! Nonce reuse under one key breaks GCM, so nonces are never derived.

use courier_core::CourierError;
use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM, NONCE_LEN};
use ring::rand::{SecureRandom, SystemRandom};

/// GCM authentication tag length in bytes.
pub const TAG_LEN: usize = 16;

/// Smallest buffer [`open`] can accept: a nonce and a tag around empty plaintext.
pub const MIN_SEALED_LEN: usize = NONCE_LEN + TAG_LEN;

fn aead_key(key: &[u8; 32]) -> Result<LessSafeKey, CourierError> {
    UnboundKey::new(&AES_256_GCM, key)
        .map(LessSafeKey::new)
        .map_err(|_| CourierError::Internal("failed to create AES-256-GCM key".to_string()))
}

/// Encrypt `plaintext`, returning `nonce ‖ ciphertext ‖ tag`.
pub fn seal(key: &[u8; 32], plaintext: &[u8]) -> Result<Vec<u8>, CourierError> {
    let key = aead_key(key)?;

    let mut nonce_bytes = [0u8; NONCE_LEN];
    SystemRandom::new()
        .fill(&mut nonce_bytes)
        .map_err(|_| CourierError::Internal("failed to generate random nonce".to_string()))?;

    let mut in_out = plaintext.to_vec();
    key.seal_in_place_append_tag(
        Nonce::assume_unique_for_key(nonce_bytes),
        Aad::empty(),
        &mut in_out,
    )
    .map_err(|_| CourierError::Internal("AES-256-GCM encryption failed".to_string()))?;

    let mut sealed = Vec::with_capacity(NONCE_LEN + in_out.len());
    sealed.extend_from_slice(&nonce_bytes);
    sealed.extend_from_slice(&in_out);
    Ok(sealed)
}

/// Decrypt a buffer produced by [`seal`].
///
/// Fails with `Decryption` on truncated input, a wrong key, or any tampering.
pub fn open(key: &[u8; 32], sealed: &[u8]) -> Result<Vec<u8>, CourierError> {
    if sealed.len() < MIN_SEALED_LEN {
        return Err(CourierError::Decryption(format!(
            "ciphertext too short: {} bytes, need at least {MIN_SEALED_LEN}",
            sealed.len()
        )));
    }

    let (nonce_bytes, ciphertext) = sealed.split_at(NONCE_LEN);
    let nonce = Nonce::try_assume_unique_for_key(nonce_bytes)
        .map_err(|_| CourierError::Decryption("malformed nonce".to_string()))?;

    let key = aead_key(key)?;
    let mut in_out = ciphertext.to_vec();
    let plaintext = key
        .open_in_place(nonce, Aad::empty(), &mut in_out)
        .map_err(|_| {
            CourierError::Decryption("authentication failed: wrong key or corrupted data".to_string())
        })?;

    Ok(plaintext.to_vec())
}

/// Generate a random 32-byte key suitable for AES-256-GCM.
pub fn generate_key() -> Result<[u8; 32], CourierError> {
    let mut key = [0u8; 32];
    SystemRandom::new()
        .fill(&mut key)
        .map_err(|_| CourierError::Internal("failed to generate random key".to_string()))?;
    Ok(key)
}
