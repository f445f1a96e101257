//! Wire formats of the handshake structures this crate reads and writes.

mod certificate_verify;
mod signature_algorithms;

pub use certificate_verify::CertificateVerify;
pub use signature_algorithms::SignatureAlgorithmsExtension;
