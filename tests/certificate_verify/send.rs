//! Send path outcomes.

use std::sync::Arc;

use certverify::certificate::CertificateStore;
use certverify::message::CertificateVerify;
use certverify::tls13::{CertificateVerifyFlow, Progress, State};
use certverify::{AlertDescription, Config, Error, HandshakeFlag, Role, SignatureScheme};

use crate::common::*;

#[test]
fn client_without_certificate_sends_nothing() {
    let _ = env_logger::try_init();

    let mut client = session(Arc::new(Config::default()), Role::Client);
    let mut wire = MemoryTransport::new();
    let mut flow = CertificateVerifyFlow::new();

    let progress = flow
        .send(&mut client, &mut CertificateStore::new(), &mut wire, false)
        .unwrap();

    assert_eq!(progress, Progress::Skipped);
    assert_eq!(flow.state(), State::Done);
    assert_eq!(wire.writes, 0);
    assert!(wire.outbound.is_empty());
    assert!(!client.has_flag(HandshakeFlag::CertificateVerifySent));
    assert_eq!(client.signature_scheme(Role::Client), None);
}

#[test]
fn server_without_certificate_fails() {
    let _ = env_logger::try_init();

    let mut server = session(Arc::new(Config::default()), Role::Server);
    let mut wire = MemoryTransport::new();
    let mut flow = CertificateVerifyFlow::new();

    let err = flow
        .send(&mut server, &mut CertificateStore::new(), &mut wire, false)
        .unwrap_err();

    assert_eq!(err, Error::InsufficientCredentials);
    assert_eq!(err.alert(), AlertDescription::HandshakeFailure);
    assert_eq!(flow.state(), State::Aborted);
    assert!(wire.outbound.is_empty());
}

#[test]
fn partial_writes_resume_without_resigning() {
    let _ = env_logger::try_init();

    let config = Arc::new(Config::default());
    let (mut server_auth, mut client_auth) = ecdsa_pair();

    let mut server = session(config.clone(), Role::Server);
    let mut wire = MemoryTransport::throttled(7);
    let mut flow = CertificateVerifyFlow::new();

    let mut progress = flow
        .send(&mut server, &mut server_auth, &mut wire, false)
        .unwrap();
    assert_eq!(progress, Progress::Pending);
    assert_eq!(wire.outbound.len(), 7);

    let mut rounds = 0;
    while progress == Progress::Pending {
        progress = flow
            .send(&mut server, &mut server_auth, &mut wire, true)
            .unwrap();
        rounds += 1;
        assert!(rounds < 100);
    }
    assert_eq!(progress, Progress::Done);
    assert!(server.has_flag(HandshakeFlag::CertificateVerifySent));

    // The reassembled bytes are one well-formed message.
    let (rest, cv) = CertificateVerify::parse(&wire.outbound).unwrap();
    assert!(rest.is_empty());
    assert_eq!(cv.algorithm, SignatureScheme::ECDSA_SECP256R1_SHA256);

    // And the peer accepts it against its own transcript.
    let mut client = expecting_session(config, Role::Client);
    CertificateVerifyFlow::new()
        .recv(
            &mut client,
            &mut client_auth,
            &mut MemoryTransport::with_inbound(&wire.outbound),
        )
        .unwrap();
}

#[test]
fn peer_preference_order_is_followed() {
    let _ = env_logger::try_init();

    let (mut server_auth, _) = rsa_pair();
    let mut server = session(rsa_config(), Role::Server);
    server.set_peer_signature_schemes(&[
        SignatureScheme::ECDSA_SECP256R1_SHA256,
        SignatureScheme::RSA_PKCS1_SHA256,
        SignatureScheme::RSA_PSS_RSAE_SHA384,
        SignatureScheme::RSA_PSS_RSAE_SHA256,
    ]);

    let mut wire = MemoryTransport::new();
    CertificateVerifyFlow::new()
        .send(&mut server, &mut server_auth, &mut wire, false)
        .unwrap();

    // ECDSA does not fit the key and PKCS#1 is not allowed in TLS 1.3.
    assert_eq!(&wire.outbound[..2], &[0x08, 0x05]);
    assert_eq!(
        server.signature_scheme(Role::Server),
        Some(SignatureScheme::RSA_PSS_RSAE_SHA384)
    );
}

#[test]
fn no_usable_scheme_for_key() {
    let _ = env_logger::try_init();

    let (mut server_auth, _) = ecdsa_pair();
    let mut server = session(Arc::new(Config::default()), Role::Server);
    server.set_peer_signature_schemes(&[
        SignatureScheme::RSA_PSS_RSAE_SHA256,
        SignatureScheme::ED25519,
    ]);

    let mut wire = MemoryTransport::new();
    let err = CertificateVerifyFlow::new()
        .send(&mut server, &mut server_auth, &mut wire, false)
        .unwrap_err();

    assert_eq!(err, Error::IncompatibleSignatureWithKey);
    assert!(wire.outbound.is_empty());
}

#[test]
fn transport_error_aborts() {
    struct Broken;

    impl certverify::HandshakeIo for Broken {
        fn recv_handshake(&mut self, _: certverify::MessageType) -> Result<certverify::Buf, Error> {
            Err(Error::Transport("closed".to_string()))
        }

        fn send_handshake(&mut self, _: certverify::MessageType, _: &[u8]) -> Result<usize, Error> {
            Err(Error::Transport("closed".to_string()))
        }
    }

    let (mut server_auth, _) = ecdsa_pair();
    let mut server = session(Arc::new(Config::default()), Role::Server);
    let mut flow = CertificateVerifyFlow::new();

    let err = flow
        .send(&mut server, &mut server_auth, &mut Broken, false)
        .unwrap_err();
    assert_eq!(err, Error::Transport("closed".to_string()));
    assert_eq!(flow.state(), State::Aborted);

    // An aborted flow cannot be resumed.
    let err = flow
        .send(&mut server, &mut server_auth, &mut MemoryTransport::new(), true)
        .unwrap_err();
    assert!(matches!(err, Error::InternalError(_)));
}
