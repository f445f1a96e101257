//! certverify: the TLS 1.3 CertificateVerify exchange.
//!
//! Proves possession of the private key behind a certificate by signing the
//! handshake transcript, and checks the peer's proof (RFC 8446 4.4.3).
//!
//! # Layout
//!
//! - [`registry`]: the signature schemes known per protocol version, and
//!   how to pick one for a local key.
//! - [`signed`]: building, signing and verifying the role-bound content.
//! - [`tls13::CertificateVerifyFlow`]: the send/receive state machine.
//! - [`Session`]: the handshake state the flow reads and updates.
//! - [`certificate`]: local credentials and the peer's public key.
//! - [`crypto`]: pluggable primitives with a RustCrypto default.
//!
//! The flow talks to the record layer through [`HandshakeIo`] and to the
//! certificate subsystem through [`CertificateAuth`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use certverify::certificate::{generate_self_signed_certificate, CertificateStore};
//! use certverify::tls13::{CertificateVerifyFlow, Progress};
//! use certverify::{Buf, CipherSuite, Config, Error, HandshakeIo, KeyAlgorithm, MessageType};
//! use certverify::{NamedGroup, ProtocolVersion, Role, Session};
//!
//! struct Outbox(Vec<u8>);
//!
//! impl HandshakeIo for Outbox {
//!     fn recv_handshake(&mut self, _: MessageType) -> Result<Buf, Error> {
//!         Err(Error::Transport("send only".into()))
//!     }
//!
//!     fn send_handshake(&mut self, _: MessageType, body: &[u8]) -> Result<usize, Error> {
//!         self.0.extend_from_slice(body);
//!         Ok(body.len())
//!     }
//! }
//!
//! let config = Arc::new(Config::default());
//! let cert = generate_self_signed_certificate(KeyAlgorithm::Ecdsa(NamedGroup::Secp256r1))?;
//! let credential = cert.into_credential(config.crypto_provider().key_provider)?;
//! let mut auth = CertificateStore::with_credential(credential);
//!
//! let mut session = Session::new(
//!     config,
//!     Role::Server,
//!     ProtocolVersion::TLS1_3,
//!     CipherSuite::AES_128_GCM_SHA256,
//! )?;
//! // ... feed ClientHello through Certificate into session.transcript_mut() ...
//!
//! let mut outbox = Outbox(Vec::new());
//! let progress = CertificateVerifyFlow::new().send(&mut session, &mut auth, &mut outbox, false)?;
//! assert_eq!(progress, Progress::Done);
//! assert_eq!(&outbox.0[..2], &[0x04, 0x03]);
//! # Ok::<(), Error>(())
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all)]

#[macro_use]
extern crate log;

mod buffer;
pub mod certificate;
pub mod codec;
mod config;
pub mod crypto;
mod error;
mod io;
pub mod message;
pub mod registry;
mod session;
pub mod signed;
pub mod tls13;
mod transcript;
mod types;

pub use buffer::Buf;
pub use certificate::{CertificateAuth, CertificateType, Credential, PeerCredential};
pub use config::{Config, ConfigBuilder};
pub use error::Error;
pub use io::HandshakeIo;
pub use session::{HandshakeFlag, HandshakeFlags, Session};
pub use transcript::Transcript;
pub use types::{
    AlertDescription, CipherSuite, HashAlgorithm, KeyAlgorithm, MessageType, NamedGroup,
    ProtocolVersion, Role, SecurityLevel, SignatureAlgorithm, SignatureScheme, VerifyFlags,
};
