// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HMAC-SHA256 webhook signature verification.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::debug;

type HmacSha256 = Hmac<Sha256>;

const PREFIX: &str = "sha256=";

/// Verify `signature` (hex, optionally prefixed with `sha256=`) over the raw body.
///
/// Both the prefix and the hex digits are matched case-insensitively.
pub fn verify_hmac_sha256(body: &[u8], signature: &str, secret: &str) -> bool {
    let provided = signature.trim();
    let provided = match provided.get(..PREFIX.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(PREFIX) => &provided[PREFIX.len()..],
        _ => provided,
    };

    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        debug!("failed to key HMAC");
        return false;
    };
    mac.update(body);
    let computed = hex::encode(mac.finalize().into_bytes());

    constant_time_eq(computed.as_bytes(), provided.to_ascii_lowercase().as_bytes())
}

/// Compare without short-circuiting on the first differing byte.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
