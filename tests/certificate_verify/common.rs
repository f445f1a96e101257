//! Shared helpers for CertificateVerify integration tests.

#![allow(unused)]

use std::collections::VecDeque;
use std::sync::{Arc, OnceLock};

use certverify::certificate::{generate_self_signed_certificate, CertificateStore};
use certverify::crypto::rust_crypto;
use certverify::{
    Buf, CertificateType, CipherSuite, Config, Credential, Error, HandshakeFlag, HandshakeIo,
    KeyAlgorithm, MessageType, NamedGroup, ProtocolVersion, Role, Session, VerifyFlags,
};
use rsa::pkcs8::{EncodePrivateKey, EncodePublicKey};
use rsa::RsaPrivateKey;

/// In-memory stand-in for the record layer.
#[derive(Default, Debug)]
pub struct MemoryTransport {
    /// Bodies handed out by `recv_handshake`, oldest first.
    pub inbound: VecDeque<Buf>,
    /// Everything accepted by `send_handshake`.
    pub outbound: Vec<u8>,
    /// Accept at most this many bytes per send.
    pub max_write: Option<usize>,
    pub writes: usize,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_inbound(body: &[u8]) -> Self {
        let mut t = Self::default();
        t.inbound.push_back(Buf::from_slice(body));
        t
    }

    pub fn throttled(max_write: usize) -> Self {
        MemoryTransport {
            max_write: Some(max_write),
            ..Default::default()
        }
    }
}

impl HandshakeIo for MemoryTransport {
    fn recv_handshake(&mut self, expected: MessageType) -> Result<Buf, Error> {
        assert_eq!(expected, MessageType::CertificateVerify);
        self.inbound
            .pop_front()
            .ok_or_else(|| Error::Transport("No handshake message queued".to_string()))
    }

    fn send_handshake(&mut self, msg_type: MessageType, body: &[u8]) -> Result<usize, Error> {
        assert_eq!(msg_type, MessageType::CertificateVerify);
        self.writes += 1;
        let n = self.max_write.unwrap_or(body.len()).min(body.len());
        self.outbound.extend_from_slice(&body[..n]);
        Ok(n)
    }
}

/// A session whose transcript already holds the messages before
/// CertificateVerify. Both sides of a test get identical transcripts.
pub fn session(config: Arc<Config>, role: Role) -> Session {
    let mut session = Session::new(
        config,
        role,
        ProtocolVersion::TLS1_3,
        CipherSuite::AES_128_GCM_SHA256,
    )
    .unwrap();

    let transcript = session.transcript_mut();
    transcript
        .add_handshake(MessageType::ClientHello, b"client hello")
        .unwrap();
    transcript
        .add_handshake(MessageType::ServerHello, b"server hello")
        .unwrap();
    transcript
        .add_handshake(MessageType::EncryptedExtensions, &[0x00, 0x00])
        .unwrap();
    transcript
        .add_handshake(MessageType::Certificate, b"certificate")
        .unwrap();

    session
}

/// Receiving session that has seen the peer's Certificate.
pub fn expecting_session(config: Arc<Config>, role: Role) -> Session {
    let mut s = session(config, role);
    s.set_flag(HandshakeFlag::CertificateVerifyExpected);
    s
}

/// Signer holding a fresh P-256 certificate, and a verifier that received
/// that certificate from its peer.
pub fn ecdsa_pair() -> (CertificateStore, CertificateStore) {
    let provider = rust_crypto::default_provider();
    let cert =
        generate_self_signed_certificate(KeyAlgorithm::Ecdsa(NamedGroup::Secp256r1)).unwrap();

    let mut verifier = CertificateStore::new();
    verifier.set_peer_certificates(vec![cert.certificate.clone()]);

    let signer =
        CertificateStore::with_credential(cert.into_credential(provider.key_provider).unwrap());

    (signer, verifier)
}

/// A 1024-bit RSA key as (PKCS#8 DER, SubjectPublicKeyInfo DER).
///
/// Small keys keep the tests fast. Verifying needs `ALLOW_WEAK_RSA_KEYS`.
pub fn rsa_key() -> &'static (Vec<u8>, Vec<u8>) {
    static KEY: OnceLock<(Vec<u8>, Vec<u8>)> = OnceLock::new();
    KEY.get_or_init(|| {
        let private = RsaPrivateKey::new(&mut rand::thread_rng(), 1024).unwrap();
        let pkcs8 = private.to_pkcs8_der().unwrap().as_bytes().to_vec();
        let spki = private
            .to_public_key()
            .to_public_key_der()
            .unwrap()
            .as_bytes()
            .to_vec();
        (pkcs8, spki)
    })
}

/// Configuration for RSA tests: raw public keys, weak RSA keys accepted.
pub fn rsa_config() -> Arc<Config> {
    Arc::new(
        Config::builder()
            .certificate_type(CertificateType::RawPublicKey)
            .verify_flags(VerifyFlags::ALLOW_WEAK_RSA_KEYS)
            .build()
            .unwrap(),
    )
}

/// Signer with the RSA key, and a verifier that knows its public key.
pub fn rsa_pair() -> (CertificateStore, CertificateStore) {
    let provider = rust_crypto::default_provider();
    let (pkcs8, spki) = rsa_key();

    let credential = Credential::from_der(vec![spki.clone()], pkcs8, provider.key_provider).unwrap();
    let signer = CertificateStore::with_credential(credential);

    let mut verifier = CertificateStore::new();
    verifier.set_peer_raw_public_key(spki.clone());

    (signer, verifier)
}
