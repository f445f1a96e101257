//! Cryptographic provider traits for pluggable crypto backends.
//!
//! The CertificateVerify exchange needs three primitives: hashing the
//! handshake transcript, signing with a local private key and verifying a
//! peer's signature against its public key. Each is a trait; a
//! [`CryptoProvider`] bundles `&'static` instances of them.
//!
//! # Using a Custom Provider
//!
//! ```
//! use std::sync::Arc;
//! use certverify::Config;
//! use certverify::crypto::rust_crypto;
//!
//! let config = Arc::new(
//!     Config::builder()
//!         .with_crypto_provider(rust_crypto::default_provider())
//!         .build()
//!         .unwrap()
//! );
//! ```
//!
//! # Thread Safety
//!
//! All provider traits require `Send + Sync + UnwindSafe + RefUnwindSafe` to ensure
//! safe usage across threads and panic boundaries.

use std::fmt::Debug;
use std::panic::{RefUnwindSafe, UnwindSafe};
use std::sync::OnceLock;

use crate::buffer::Buf;
use crate::types::{HashAlgorithm, KeyAlgorithm, SignatureScheme, VerifyFlags};
use crate::Error;

/// Marker trait for types that are safe to use in crypto provider components.
pub trait CryptoSafe: Send + Sync + Debug + UnwindSafe + RefUnwindSafe {}

/// Blanket implementation: any type satisfying the bounds implements [`CryptoSafe`].
impl<T: Send + Sync + Debug + UnwindSafe + RefUnwindSafe> CryptoSafe for T {}

/// Stateful hash context for incremental hashing.
pub trait HashContext: CryptoSafe {
    /// Update the hash with new data.
    fn update(&mut self, data: &[u8]);

    /// Clone the context and finalize it, writing the hash to `out`.
    /// The original context can continue to be updated.
    fn clone_and_finalize(&self, out: &mut Buf);
}

/// Private key able to sign with one or more signature schemes.
pub trait SigningKey: CryptoSafe {
    /// Sign `data` with `scheme`, replacing the contents of `out`.
    ///
    /// `data` is the full message; hashing and padding are the key's job.
    fn sign(&mut self, scheme: SignatureScheme, data: &[u8], out: &mut Buf) -> Result<(), String>;

    /// The public key type of this key.
    fn key_algorithm(&self) -> KeyAlgorithm;
}

/// Private key parser (factory for SigningKey).
pub trait KeyProvider: CryptoSafe {
    /// Parse and load a private key from DER/PEM bytes.
    fn load_private_key(&self, key_der: &[u8]) -> Result<Box<dyn SigningKey>, String>;
}

/// Signature verification against a peer's public key.
pub trait SignatureVerifier: CryptoSafe {
    /// Verify `signature` over `data`.
    ///
    /// `spki_der` is the DER SubjectPublicKeyInfo of the signer. `flags` is
    /// the verification policy, which only the verifier interprets.
    fn verify_signature(
        &self,
        spki_der: &[u8],
        data: &[u8],
        signature: &[u8],
        scheme: SignatureScheme,
        flags: VerifyFlags,
    ) -> Result<(), String>;
}

/// Hash provider (factory for HashContext).
pub trait HashProvider: CryptoSafe {
    /// Create a new hash context for the specified algorithm.
    fn create_hash(&self, algorithm: HashAlgorithm) -> Result<Box<dyn HashContext>, String>;
}

/// Cryptographic provider for the CertificateVerify exchange.
#[derive(Debug, Clone)]
pub struct CryptoProvider {
    /// Signature verification for peer credentials.
    pub signature_verification: &'static dyn SignatureVerifier,

    /// Key provider for parsing private keys.
    pub key_provider: &'static dyn KeyProvider,

    /// Hash provider for the handshake transcript.
    pub hash_provider: &'static dyn HashProvider,
}

/// Static storage for the default crypto provider.
///
/// This is set by `install_default()` and retrieved by `get_default()`.
static DEFAULT: OnceLock<CryptoProvider> = OnceLock::new();

impl CryptoProvider {
    /// Install a default crypto provider for the process.
    ///
    /// Used by [`Config::builder()`](crate::Config::builder) when no explicit
    /// provider is set. Can only be set once; later calls return the
    /// rejected provider.
    pub fn install_default(provider: CryptoProvider) -> Result<(), CryptoProvider> {
        DEFAULT.set(provider)
    }

    /// Get the default crypto provider, if one has been installed.
    pub fn get_default() -> Option<&'static CryptoProvider> {
        DEFAULT.get()
    }

    /// Validates the provider for use with TLS 1.3 CertificateVerify.
    ///
    /// The transcript hash of every TLS 1.3 cipher suite is SHA-256 or
    /// SHA-384, so both must be available.
    pub fn validate(&self) -> Result<(), Error> {
        for hash in [HashAlgorithm::SHA256, HashAlgorithm::SHA384] {
            let mut ctx = self
                .hash_provider
                .create_hash(hash)
                .map_err(|e| Error::ConfigError(format!("Hash provider lacks {:?}: {}", hash, e)))?;

            let expected = hash.output_len().unwrap_or(0);
            ctx.update(b"certverify");
            let mut out = Buf::new();
            ctx.clone_and_finalize(&mut out);
            if out.len() != expected {
                return Err(Error::ConfigError(format!(
                    "Hash provider returned {} bytes for {:?}, expected {}",
                    out.len(),
                    hash,
                    expected
                )));
            }
        }
        Ok(())
    }
}
