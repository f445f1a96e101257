#![no_main]

//! Fuzz target for the CertificateVerify receive path.
//!
//! The input is handed to the flow as the body of the peer's
//! CertificateVerify message. The body layout is:
//! - SignatureScheme: 2 bytes
//! - Signature length: 2 bytes
//! - Signature: variable
//!
//! Every input must end in `Ok` or a typed error, never a panic.

use std::sync::{Arc, OnceLock};

use libfuzzer_sys::fuzz_target;

use certverify::certificate::{generate_self_signed_certificate, CertificateStore};
use certverify::tls13::CertificateVerifyFlow;
use certverify::{
    Buf, CipherSuite, Config, Error, HandshakeFlag, HandshakeIo, KeyAlgorithm, MessageType,
    NamedGroup, ProtocolVersion, Role, Session,
};

struct Inbound<'a>(Option<&'a [u8]>);

impl HandshakeIo for Inbound<'_> {
    fn recv_handshake(&mut self, _: MessageType) -> Result<Buf, Error> {
        self.0
            .take()
            .map(Buf::from_slice)
            .ok_or_else(|| Error::Transport("drained".to_string()))
    }

    fn send_handshake(&mut self, _: MessageType, _: &[u8]) -> Result<usize, Error> {
        Err(Error::Transport("receive only".to_string()))
    }
}

fn peer_certificate() -> Option<&'static Vec<u8>> {
    static CERT: OnceLock<Option<Vec<u8>>> = OnceLock::new();
    CERT.get_or_init(|| {
        generate_self_signed_certificate(KeyAlgorithm::Ecdsa(NamedGroup::Secp256r1))
            .ok()
            .map(|c| c.certificate)
    })
    .as_ref()
}

fuzz_target!(|data: &[u8]| {
    let Some(cert) = peer_certificate() else {
        return;
    };

    let config = Arc::new(Config::default());
    let Ok(mut session) = Session::new(
        config,
        Role::Client,
        ProtocolVersion::TLS1_3,
        CipherSuite::AES_128_GCM_SHA256,
    ) else {
        return;
    };
    session.set_flag(HandshakeFlag::CertificateVerifyExpected);

    let mut auth = CertificateStore::new();
    auth.set_peer_certificates(vec![cert.clone()]);

    let mut flow = CertificateVerifyFlow::new();
    let _ = flow.recv(&mut session, &mut auth, &mut Inbound(Some(data)));
});
