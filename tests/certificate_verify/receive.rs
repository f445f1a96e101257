//! Receive path outcomes for malformed and forged messages.

use std::sync::Arc;

use certverify::certificate::{CertificateStore, PeerCredential};
use certverify::crypto::rust_crypto;
use certverify::message::CertificateVerify;
use certverify::tls13::{CertificateVerifyFlow, Progress, State};
use certverify::{
    registry, signed, AlertDescription, Buf, Config, Error, HandshakeFlag, ProtocolVersion, Role,
    SignatureScheme, VerifyFlags,
};

use crate::common::*;

/// A valid CertificateVerify body from a P-256 server, plus a client-side
/// store that can verify it.
fn signed_body() -> (Vec<u8>, CertificateStore) {
    let (mut server_auth, client_auth) = ecdsa_pair();
    let mut server = session(Arc::new(Config::default()), Role::Server);
    let mut wire = MemoryTransport::new();
    CertificateVerifyFlow::new()
        .send(&mut server, &mut server_auth, &mut wire, false)
        .unwrap();
    (wire.outbound, client_auth)
}

fn receive(body: &[u8], auth: &mut CertificateStore) -> (Result<Progress, Error>, State) {
    let mut client = expecting_session(Arc::new(Config::default()), Role::Client);
    let mut flow = CertificateVerifyFlow::new();
    let result = flow.recv(&mut client, auth, &mut MemoryTransport::with_inbound(body));
    (result, flow.state())
}

#[test]
fn rsa_pss_sha256_over_zero_digest() {
    let _ = env_logger::try_init();

    let provider = rust_crypto::default_provider();
    let (pkcs8, spki) = rsa_key();
    let digest = [0u8; 32];
    let scheme = registry::resolve(0x0804, ProtocolVersion::TLS1_3).unwrap();

    let mut key = provider.key_provider.load_private_key(pkcs8).unwrap();
    let mut signature = Buf::new();
    signed::sign(Role::Server, &digest, key.as_mut(), scheme, &mut signature).unwrap();

    let mut body = Buf::new();
    CertificateVerify::new(scheme.scheme, &signature)
        .serialize(&mut body)
        .unwrap();
    assert_eq!(&body[..2], &[0x08, 0x04]);
    assert_eq!(&body[2..4], &(signature.len() as u16).to_be_bytes());
    assert_eq!(body.len(), 4 + signature.len());

    let (rest, parsed) = CertificateVerify::parse(&body).unwrap();
    assert!(rest.is_empty());

    let peer = PeerCredential::from_spki_der(spki).unwrap();
    let received = registry::resolve(parsed.algorithm.as_u16(), ProtocolVersion::TLS1_3).unwrap();
    signed::verify(
        provider.signature_verification,
        Role::Client,
        &digest,
        &peer,
        parsed.signature,
        received,
        VerifyFlags::ALLOW_WEAK_RSA_KEYS,
    )
    .unwrap();

    // One flipped bit in the signature.
    let mut forged = parsed.signature.to_vec();
    forged[10] ^= 0x01;
    let err = signed::verify(
        provider.signature_verification,
        Role::Client,
        &digest,
        &peer,
        &forged,
        received,
        VerifyFlags::ALLOW_WEAK_RSA_KEYS,
    )
    .unwrap_err();
    assert!(matches!(err, Error::SignatureVerificationFailed(_)));
}

#[test]
fn flipped_signature_byte() {
    let _ = env_logger::try_init();

    let (mut body, mut auth) = signed_body();
    let last = body.len() - 1;
    body[last] ^= 0xFF;

    let (result, state) = receive(&body, &mut auth);
    let err = result.unwrap_err();
    assert!(matches!(err, Error::SignatureVerificationFailed(_)));
    assert_eq!(state, State::Aborted);
}

#[test]
fn peer_scheme_recorded_before_verification() {
    let _ = env_logger::try_init();

    let (mut body, mut auth) = signed_body();
    let last = body.len() - 1;
    body[last] ^= 0x01;

    let mut client = expecting_session(Arc::new(Config::default()), Role::Client);
    let mut flow = CertificateVerifyFlow::new();
    let err = flow
        .recv(
            &mut client,
            &mut auth,
            &mut MemoryTransport::with_inbound(&body),
        )
        .unwrap_err();

    assert!(matches!(err, Error::SignatureVerificationFailed(_)));
    assert_eq!(
        client.signature_scheme(Role::Server),
        Some(SignatureScheme::ECDSA_SECP256R1_SHA256)
    );
    assert_eq!(client.signature_scheme(Role::Client), None);
    assert!(!client.has_flag(HandshakeFlag::CertificateVerifyReceived));
}

#[test]
fn shorter_than_two_bytes() {
    let _ = env_logger::try_init();

    for body in [&[][..], &[0x04][..]] {
        let (result, _) = receive(body, &mut CertificateStore::new());
        let err = result.unwrap_err();
        assert_eq!(err, Error::UnexpectedPacketLength);
        assert_eq!(err.alert(), AlertDescription::DecodeError);
    }
}

#[test]
fn zero_length_signature() {
    let _ = env_logger::try_init();

    let (_, mut auth) = signed_body();
    let (result, _) = receive(&[0x04, 0x03, 0x00, 0x00], &mut auth);
    let err = result.unwrap_err();
    assert!(matches!(err, Error::ReceivedIllegalParameter(_)));
    assert_eq!(err.alert(), AlertDescription::IllegalParameter);
}

#[test]
fn missing_signature_length() {
    let _ = env_logger::try_init();

    let (result, _) = receive(&[0x04, 0x03, 0x00], &mut CertificateStore::new());
    assert!(matches!(
        result.unwrap_err(),
        Error::ReceivedIllegalParameter(_)
    ));
}

#[test]
fn trailing_bytes_after_valid_signature() {
    let _ = env_logger::try_init();

    let (mut body, mut auth) = signed_body();
    body.push(0x00);

    let mut client = expecting_session(Arc::new(Config::default()), Role::Client);
    let mut flow = CertificateVerifyFlow::new();
    let err = flow
        .recv(
            &mut client,
            &mut auth,
            &mut MemoryTransport::with_inbound(&body),
        )
        .unwrap_err();

    assert_eq!(err, Error::UnexpectedPacketLength);
    assert_eq!(flow.state(), State::Aborted);
    assert!(!client.has_flag(HandshakeFlag::CertificateVerifyReceived));
}

#[test]
fn unknown_scheme() {
    let _ = env_logger::try_init();

    let (result, _) = receive(&[0xFE, 0xFE, 0x00, 0x01, 0xAA], &mut CertificateStore::new());
    assert_eq!(
        result.unwrap_err(),
        Error::UnsupportedSignatureAlgorithm(0xFEFE)
    );
}

#[test]
fn scheme_for_wrong_key_type() {
    let _ = env_logger::try_init();

    // An RSA-PSS scheme against the peer's ECDSA certificate.
    let (body, mut auth) = signed_body();
    let mut forged = vec![0x08, 0x04];
    forged.extend_from_slice(&body[2..]);

    let (result, _) = receive(&forged, &mut auth);
    assert!(matches!(
        result.unwrap_err(),
        Error::SignatureVerificationFailed(_)
    ));
}

#[test]
fn not_expected_is_skipped() {
    let _ = env_logger::try_init();

    let (body, mut auth) = signed_body();
    let mut client = session(Arc::new(Config::default()), Role::Client);
    let mut wire = MemoryTransport::with_inbound(&body);
    let mut flow = CertificateVerifyFlow::new();

    let progress = flow.recv(&mut client, &mut auth, &mut wire).unwrap();
    assert_eq!(progress, Progress::Skipped);
    // The queued message was not consumed.
    assert_eq!(wire.inbound.len(), 1);
    assert!(!client.has_flag(HandshakeFlag::CertificateVerifyReceived));

    // One-shot.
    let err = flow.recv(&mut client, &mut auth, &mut wire).unwrap_err();
    assert!(matches!(err, Error::InternalError(_)));
}
