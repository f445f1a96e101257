//! Signing on one side and verifying on the other.

use std::sync::Arc;

use certverify::tls13::{CertificateVerifyFlow, Progress, State};
use certverify::{
    AlertDescription, Buf, Config, Error, HandshakeFlag, Role, SignatureScheme,
};

use crate::common::*;

#[test]
fn server_signs_client_verifies() {
    let _ = env_logger::try_init();

    let config = Arc::new(Config::default());
    let (mut server_auth, mut client_auth) = ecdsa_pair();

    let mut server = session(config.clone(), Role::Server);
    let mut wire = MemoryTransport::new();
    let progress = CertificateVerifyFlow::new()
        .send(&mut server, &mut server_auth, &mut wire, false)
        .unwrap();
    assert_eq!(progress, Progress::Done);

    let mut client = expecting_session(config, Role::Client);
    let mut inbound = MemoryTransport::with_inbound(&wire.outbound);
    let mut flow = CertificateVerifyFlow::new();
    let progress = flow.recv(&mut client, &mut client_auth, &mut inbound).unwrap();

    assert_eq!(progress, Progress::Done);
    assert_eq!(flow.state(), State::Done);
    assert!(client.has_flag(HandshakeFlag::CertificateVerifyReceived));
    assert_eq!(
        client.signature_scheme(Role::Server),
        Some(SignatureScheme::ECDSA_SECP256R1_SHA256)
    );
    assert_eq!(client.signature_scheme(Role::Client), None);

    let mut server_digest = Buf::new();
    let mut client_digest = Buf::new();
    server.transcript().digest(&mut server_digest);
    client.transcript().digest(&mut client_digest);
    assert_eq!(server_digest, client_digest);
}

#[test]
fn client_signs_server_verifies() {
    let _ = env_logger::try_init();

    let config = Arc::new(Config::default());
    let (mut client_auth, mut server_auth) = ecdsa_pair();

    let mut client = session(config.clone(), Role::Client);
    client.set_flag(HandshakeFlag::CertificateSent);
    let mut wire = MemoryTransport::new();
    CertificateVerifyFlow::new()
        .send(&mut client, &mut client_auth, &mut wire, false)
        .unwrap();
    assert!(client.has_flag(HandshakeFlag::CertificateVerifySent));
    assert_eq!(
        client.signature_scheme(Role::Client),
        Some(SignatureScheme::ECDSA_SECP256R1_SHA256)
    );

    let mut server = expecting_session(config, Role::Server);
    let mut inbound = MemoryTransport::with_inbound(&wire.outbound);
    let progress = CertificateVerifyFlow::new()
        .recv(&mut server, &mut server_auth, &mut inbound)
        .unwrap();
    assert_eq!(progress, Progress::Done);
    assert_eq!(
        server.signature_scheme(Role::Client),
        Some(SignatureScheme::ECDSA_SECP256R1_SHA256)
    );
}

#[test]
fn server_signature_rejected_as_client_signature() {
    let _ = env_logger::try_init();

    let config = Arc::new(Config::default());
    let (mut signer_auth, mut verifier_auth) = ecdsa_pair();

    let mut server = session(config.clone(), Role::Server);
    let mut wire = MemoryTransport::new();
    CertificateVerifyFlow::new()
        .send(&mut server, &mut signer_auth, &mut wire, false)
        .unwrap();

    // Another server treats the bytes as a client's CertificateVerify. The
    // context strings differ, so the same signature must not verify.
    let mut other_server = expecting_session(config, Role::Server);
    let mut inbound = MemoryTransport::with_inbound(&wire.outbound);
    let mut flow = CertificateVerifyFlow::new();
    let err = flow
        .recv(&mut other_server, &mut verifier_auth, &mut inbound)
        .unwrap_err();

    assert!(matches!(err, Error::SignatureVerificationFailed(_)));
    assert_eq!(err.alert(), AlertDescription::DecryptError);
    assert_eq!(flow.state(), State::Aborted);
    assert!(!other_server.has_flag(HandshakeFlag::CertificateVerifyReceived));
}

#[test]
fn rsa_pss_round_trip() {
    let _ = env_logger::try_init();

    let config = rsa_config();
    let (mut server_auth, mut client_auth) = rsa_pair();

    let mut server = session(config.clone(), Role::Server);
    server.set_peer_signature_schemes(&[SignatureScheme::RSA_PSS_RSAE_SHA256]);
    let mut wire = MemoryTransport::new();
    CertificateVerifyFlow::new()
        .send(&mut server, &mut server_auth, &mut wire, false)
        .unwrap();

    assert_eq!(&wire.outbound[..4], &[0x08, 0x04, 0x00, 0x80]);
    assert_eq!(wire.outbound.len(), 4 + 128);

    let mut client = expecting_session(config, Role::Client);
    let mut inbound = MemoryTransport::with_inbound(&wire.outbound);
    let progress = CertificateVerifyFlow::new()
        .recv(&mut client, &mut client_auth, &mut inbound)
        .unwrap();
    assert_eq!(progress, Progress::Done);
}

#[test]
fn weak_rsa_key_needs_session_flag() {
    let _ = env_logger::try_init();

    // Same setup as the RSA round trip, but the weak-key relaxation only
    // comes from the session.
    let strict = Arc::new(
        Config::builder()
            .certificate_type(certverify::CertificateType::RawPublicKey)
            .build()
            .unwrap(),
    );
    let (mut server_auth, mut client_auth) = rsa_pair();

    let mut server = session(strict.clone(), Role::Server);
    server.set_peer_signature_schemes(&[SignatureScheme::RSA_PSS_RSAE_SHA256]);
    let mut wire = MemoryTransport::new();
    CertificateVerifyFlow::new()
        .send(&mut server, &mut server_auth, &mut wire, false)
        .unwrap();

    let mut client = expecting_session(strict.clone(), Role::Client);
    let err = CertificateVerifyFlow::new()
        .recv(
            &mut client,
            &mut client_auth,
            &mut MemoryTransport::with_inbound(&wire.outbound),
        )
        .unwrap_err();
    assert!(matches!(err, Error::SignatureVerificationFailed(_)));

    let mut client = expecting_session(strict, Role::Client);
    client.set_additional_verify_flags(certverify::VerifyFlags::ALLOW_WEAK_RSA_KEYS);
    let progress = CertificateVerifyFlow::new()
        .recv(
            &mut client,
            &mut client_auth,
            &mut MemoryTransport::with_inbound(&wire.outbound),
        )
        .unwrap();
    assert_eq!(progress, Progress::Done);
}
