// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! AES-256-GCM credential vault for the Courier gateway.
//!
//! Access tokens and other long-lived credentials pass through [`Vault`] at
//! every persistence boundary. Ciphertexts are self-contained base64 strings
//! (`nonce ‖ ciphertext ‖ tag`), so no key-wrapping metadata is stored.

pub mod crypto;
pub mod vault;

pub use vault::{mask_secret, Vault};
