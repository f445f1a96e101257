//! TLS 1.3 handshake steps.

pub mod certificate_verify;

pub use certificate_verify::{CertificateVerifyFlow, Progress, State};
