//! Cryptographic primitives used by the CertificateVerify exchange.

pub mod provider;
pub mod rust_crypto;

pub use provider::{CryptoProvider, CryptoSafe, HashContext, HashProvider};
pub use provider::{KeyProvider, SignatureVerifier, SigningKey};

pub use crate::buffer::Buf;
pub use crate::types::{HashAlgorithm, KeyAlgorithm, NamedGroup, SignatureScheme, VerifyFlags};
