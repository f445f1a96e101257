use thiserror::Error;

use crate::types::AlertDescription;

/// Errors surfaced by the CertificateVerify exchange.
///
/// Every variant is terminal to the handshake. The driver is expected to
/// send the alert given by [`Error::alert`] and abort.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("Unsupported signature algorithm {0:#06x}")]
    UnsupportedSignatureAlgorithm(u16),

    #[error("Received illegal parameter: {0}")]
    ReceivedIllegalParameter(String),

    #[error("Unexpected packet length")]
    UnexpectedPacketLength,

    #[error("No signature scheme is compatible with the local key")]
    IncompatibleSignatureWithKey,

    #[error("Insufficient credentials")]
    InsufficientCredentials,

    #[error("Signature verification failed: {0}")]
    SignatureVerificationFailed(String),

    #[error("Signing failed: {0}")]
    SigningFailed(String),

    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("Memory allocation failed")]
    MemoryError,

    #[error("Too short")]
    Truncated,

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Certificate error: {0}")]
    CertificateError(String),
}

impl Error {
    /// The fatal alert a handshake driver sends for this error.
    pub fn alert(&self) -> AlertDescription {
        match self {
            Error::UnsupportedSignatureAlgorithm(_) => AlertDescription::HandshakeFailure,
            Error::ReceivedIllegalParameter(_) => AlertDescription::IllegalParameter,
            Error::UnexpectedPacketLength | Error::Truncated => AlertDescription::DecodeError,
            Error::IncompatibleSignatureWithKey => AlertDescription::HandshakeFailure,
            Error::InsufficientCredentials => AlertDescription::HandshakeFailure,
            Error::SignatureVerificationFailed(_) => AlertDescription::DecryptError,
            Error::CertificateError(_) => AlertDescription::BadCertificate,
            Error::SigningFailed(_)
            | Error::InternalError(_)
            | Error::MemoryError
            | Error::Transport(_)
            | Error::ConfigError(_) => AlertDescription::InternalError,
        }
    }
}
