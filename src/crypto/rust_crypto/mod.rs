//! Crypto provider backed by the pure Rust RustCrypto crates.
//!
//! Supports ECDSA on P-256 and P-384, RSA-PSS (rsaEncryption keys) and
//! RSA PKCS#1 v1.5, with SHA-256, SHA-384 and SHA-512. SHA-1 is not
//! available.

mod hash;
mod sign;

use super::CryptoProvider;

/// Get the default RustCrypto-based crypto provider.
pub fn default_provider() -> CryptoProvider {
    CryptoProvider {
        signature_verification: &sign::SIGNATURE_VERIFIER,
        key_provider: &sign::KEY_PROVIDER,
        hash_provider: &hash::HASH_PROVIDER,
    }
}
