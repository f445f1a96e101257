//! Per-handshake state consulted and updated by the CertificateVerify flow.

use std::sync::Arc;

use tinyvec::ArrayVec;

use crate::registry::MAX_SCHEMES;
use crate::transcript::Transcript;
use crate::types::{CipherSuite, ProtocolVersion, Role, SignatureScheme, VerifyFlags};
use crate::{Config, Error};

/// Handshake progress markers kept on the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeFlag {
    /// The local side sent a Certificate message carrying a certificate.
    CertificateSent,
    /// The peer sent a non-empty Certificate message, so its
    /// CertificateVerify must follow.
    CertificateVerifyExpected,
    CertificateVerifySent,
    CertificateVerifyReceived,
}

impl HandshakeFlag {
    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// Set of [`HandshakeFlag`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HandshakeFlags(u8);

impl HandshakeFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, flag: HandshakeFlag) {
        self.0 |= flag.bit();
    }

    pub fn remove(&mut self, flag: HandshakeFlag) {
        self.0 &= !flag.bit();
    }

    pub fn contains(&self, flag: HandshakeFlag) -> bool {
        self.0 & flag.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl FromIterator<HandshakeFlag> for HandshakeFlags {
    fn from_iter<I: IntoIterator<Item = HandshakeFlag>>(iter: I) -> Self {
        let mut flags = HandshakeFlags::new();
        for flag in iter {
            flags.insert(flag);
        }
        flags
    }
}

/// State of one TLS 1.3 handshake, as far as CertificateVerify cares.
#[derive(Debug)]
pub struct Session {
    config: Arc<Config>,
    role: Role,
    version: ProtocolVersion,
    cipher_suite: CipherSuite,
    transcript: Transcript,
    flags: HandshakeFlags,
    additional_verify_flags: VerifyFlags,
    peer_signature_schemes: ArrayVec<[SignatureScheme; MAX_SCHEMES]>,
    sign_algorithm_server: Option<SignatureScheme>,
    sign_algorithm_client: Option<SignatureScheme>,
}

impl Session {
    /// Start a session once version and cipher suite are negotiated.
    ///
    /// The transcript hash comes from the cipher suite.
    pub fn new(
        config: Arc<Config>,
        role: Role,
        version: ProtocolVersion,
        cipher_suite: CipherSuite,
    ) -> Result<Self, Error> {
        if !version.uses_tls13_semantics() {
            return Err(Error::ConfigError(format!(
                "CertificateVerify signing requires TLS 1.3 semantics, got {}",
                version
            )));
        }

        let transcript = Transcript::new(
            config.crypto_provider().hash_provider,
            cipher_suite.hash_algorithm(),
        )?;

        debug!(
            "New {:?} session: {} {:?} ({:?} transcript)",
            role,
            version,
            cipher_suite,
            transcript.hash_algorithm()
        );

        Ok(Session {
            config,
            role,
            version,
            cipher_suite,
            transcript,
            flags: HandshakeFlags::new(),
            additional_verify_flags: VerifyFlags::NONE,
            peer_signature_schemes: ArrayVec::new(),
            sign_algorithm_server: None,
            sign_algorithm_client: None,
        })
    }

    #[inline(always)]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[inline(always)]
    pub fn role(&self) -> Role {
        self.role
    }

    #[inline(always)]
    pub fn version(&self) -> ProtocolVersion {
        self.version
    }

    #[inline(always)]
    pub fn cipher_suite(&self) -> CipherSuite {
        self.cipher_suite
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Handshake messages preceding CertificateVerify go in here.
    pub fn transcript_mut(&mut self) -> &mut Transcript {
        &mut self.transcript
    }

    pub fn flags(&self) -> HandshakeFlags {
        self.flags
    }

    pub fn set_flag(&mut self, flag: HandshakeFlag) {
        trace!("Session flag {:?}", flag);
        self.flags.insert(flag);
    }

    pub fn has_flag(&self, flag: HandshakeFlag) -> bool {
        self.flags.contains(flag)
    }

    /// Per-session verification flags, on top of the configured ones.
    pub fn set_additional_verify_flags(&mut self, flags: VerifyFlags) {
        self.additional_verify_flags = flags;
    }

    pub fn additional_verify_flags(&self) -> VerifyFlags {
        self.additional_verify_flags
    }

    /// Configured flags merged with the per-session ones.
    pub fn verify_flags(&self) -> VerifyFlags {
        self.config.verify_flags() | self.additional_verify_flags
    }

    /// Schemes from the peer's `signature_algorithms` extension, in the
    /// peer's preference order.
    pub fn set_peer_signature_schemes(&mut self, schemes: &[SignatureScheme]) {
        self.peer_signature_schemes.clear();
        for scheme in schemes.iter().take(MAX_SCHEMES) {
            self.peer_signature_schemes.push(*scheme);
        }
    }

    pub fn peer_signature_schemes(&self) -> &[SignatureScheme] {
        &self.peer_signature_schemes
    }

    /// Remember the scheme `signer` used for its CertificateVerify.
    pub fn record_signature_scheme(&mut self, signer: Role, scheme: SignatureScheme) {
        match signer {
            Role::Server => self.sign_algorithm_server = Some(scheme),
            Role::Client => self.sign_algorithm_client = Some(scheme),
        }
    }

    /// The scheme `signer` used, if it signed yet.
    pub fn signature_scheme(&self, signer: Role) -> Option<SignatureScheme> {
        match signer {
            Role::Server => self.sign_algorithm_server,
            Role::Client => self.sign_algorithm_client,
        }
    }
}
