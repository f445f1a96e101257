//! Signature scheme registry.
//!
//! Maps a 2-byte `SignatureScheme` code point plus the negotiated protocol
//! version to an immutable [`SignatureSchemeDescriptor`], and picks the best
//! scheme for a local key. The table is static and never mutated.
//!
//! A code point can mean different things per version. `0x0403` is
//! "ECDSA with SHA-256 on any curve" in TLS 1.2 but "ECDSA on P-256 with
//! SHA-256" in TLS 1.3, so it has one descriptor per semantics.

use tinyvec::ArrayVec;

use crate::types::{
    HashAlgorithm, KeyAlgorithm, NamedGroup, ProtocolVersion, SecurityLevel, SignatureAlgorithm,
    SignatureScheme,
};
use crate::Error;

/// Protocol versions a descriptor applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionSet {
    /// TLS 1.2 and earlier.
    Pre13,
    /// TLS 1.3 only.
    Tls13,
    /// Both.
    All,
}

impl VersionSet {
    pub fn contains(&self, version: ProtocolVersion) -> bool {
        match self {
            VersionSet::All => true,
            VersionSet::Tls13 => version.uses_tls13_semantics(),
            VersionSet::Pre13 => !version.uses_tls13_semantics(),
        }
    }
}

/// Immutable description of one signature scheme.
#[derive(Debug, PartialEq, Eq)]
pub struct SignatureSchemeDescriptor {
    /// Wire identifier.
    pub scheme: SignatureScheme,
    /// Human readable id.
    pub name: &'static str,
    pub signature: SignatureAlgorithm,
    pub hash: HashAlgorithm,
    /// For ECDSA, the curve the key must be on. `None` means any curve.
    pub curve: Option<NamedGroup>,
    pub versions: VersionSet,
    pub security: SecurityLevel,
}

impl SignatureSchemeDescriptor {
    /// Whether a key of type `key` can produce (or have produced) this scheme.
    pub fn usable_with(&self, key: KeyAlgorithm) -> bool {
        match (self.signature, key) {
            (SignatureAlgorithm::RSA_PKCS1, KeyAlgorithm::Rsa) => true,
            (SignatureAlgorithm::RSA_PSS_RSAE, KeyAlgorithm::Rsa) => true,
            (SignatureAlgorithm::RSA_PSS_PSS, KeyAlgorithm::RsaPss) => true,
            (SignatureAlgorithm::ECDSA, KeyAlgorithm::Ecdsa(group)) => {
                self.curve.map(|c| c == group).unwrap_or(true)
            }
            (SignatureAlgorithm::ED25519, KeyAlgorithm::Ed25519) => true,
            (SignatureAlgorithm::ED448, KeyAlgorithm::Ed448) => true,
            _ => false,
        }
    }
}

const fn entry(
    scheme: SignatureScheme,
    name: &'static str,
    signature: SignatureAlgorithm,
    hash: HashAlgorithm,
    curve: Option<NamedGroup>,
    versions: VersionSet,
    security: SecurityLevel,
) -> SignatureSchemeDescriptor {
    SignatureSchemeDescriptor {
        scheme,
        name,
        signature,
        hash,
        curve,
        versions,
        security,
    }
}

use HashAlgorithm as H;
use SecurityLevel as L;
use SignatureAlgorithm as A;
use SignatureScheme as S;

#[rustfmt::skip]
static SCHEMES: &[SignatureSchemeDescriptor] = &[
    entry(S::RSA_PSS_RSAE_SHA256, "RSA-PSS-RSAE-SHA256", A::RSA_PSS_RSAE, H::SHA256, None, VersionSet::All, L::Medium),
    entry(S::RSA_PSS_RSAE_SHA384, "RSA-PSS-RSAE-SHA384", A::RSA_PSS_RSAE, H::SHA384, None, VersionSet::All, L::High),
    entry(S::RSA_PSS_RSAE_SHA512, "RSA-PSS-RSAE-SHA512", A::RSA_PSS_RSAE, H::SHA512, None, VersionSet::All, L::High),
    entry(S::RSA_PSS_PSS_SHA256, "RSA-PSS-SHA256", A::RSA_PSS_PSS, H::SHA256, None, VersionSet::All, L::Medium),
    entry(S::RSA_PSS_PSS_SHA384, "RSA-PSS-SHA384", A::RSA_PSS_PSS, H::SHA384, None, VersionSet::All, L::High),
    entry(S::RSA_PSS_PSS_SHA512, "RSA-PSS-SHA512", A::RSA_PSS_PSS, H::SHA512, None, VersionSet::All, L::High),
    entry(S::ECDSA_SECP256R1_SHA256, "ECDSA-SECP256R1-SHA256", A::ECDSA, H::SHA256, Some(NamedGroup::Secp256r1), VersionSet::Tls13, L::Medium),
    entry(S::ECDSA_SECP384R1_SHA384, "ECDSA-SECP384R1-SHA384", A::ECDSA, H::SHA384, Some(NamedGroup::Secp384r1), VersionSet::Tls13, L::High),
    entry(S::ECDSA_SECP521R1_SHA512, "ECDSA-SECP521R1-SHA512", A::ECDSA, H::SHA512, Some(NamedGroup::Secp521r1), VersionSet::Tls13, L::High),
    entry(S::ECDSA_SECP256R1_SHA256, "ECDSA-SHA256", A::ECDSA, H::SHA256, None, VersionSet::Pre13, L::Medium),
    entry(S::ECDSA_SECP384R1_SHA384, "ECDSA-SHA384", A::ECDSA, H::SHA384, None, VersionSet::Pre13, L::High),
    entry(S::ECDSA_SECP521R1_SHA512, "ECDSA-SHA512", A::ECDSA, H::SHA512, None, VersionSet::Pre13, L::High),
    entry(S::ED25519, "EdDSA-Ed25519", A::ED25519, H::None, None, VersionSet::All, L::High),
    entry(S::ED448, "EdDSA-Ed448", A::ED448, H::None, None, VersionSet::All, L::High),
    entry(S::RSA_PKCS1_SHA256, "RSA-SHA256", A::RSA_PKCS1, H::SHA256, None, VersionSet::Pre13, L::Medium),
    entry(S::RSA_PKCS1_SHA384, "RSA-SHA384", A::RSA_PKCS1, H::SHA384, None, VersionSet::Pre13, L::High),
    entry(S::RSA_PKCS1_SHA512, "RSA-SHA512", A::RSA_PKCS1, H::SHA512, None, VersionSet::Pre13, L::High),
    entry(S::RSA_PKCS1_SHA1, "RSA-SHA1", A::RSA_PKCS1, H::SHA1, None, VersionSet::Pre13, L::Legacy),
    entry(S::ECDSA_SHA1, "ECDSA-SHA1", A::ECDSA, H::SHA1, None, VersionSet::Pre13, L::Legacy),
];

/// All known descriptors.
pub fn all() -> &'static [SignatureSchemeDescriptor] {
    SCHEMES
}

/// Look up a wire identifier for the negotiated protocol version.
///
/// Fails with [`Error::UnsupportedSignatureAlgorithm`] if the identifier is
/// unknown, or only known for another protocol version.
pub fn resolve(
    wire_id: u16,
    version: ProtocolVersion,
) -> Result<&'static SignatureSchemeDescriptor, Error> {
    let scheme = SignatureScheme::from_u16(wire_id);
    SCHEMES
        .iter()
        .find(|d| d.scheme == scheme && d.versions.contains(version))
        .ok_or(Error::UnsupportedSignatureAlgorithm(wire_id))
}

/// Maximum number of schemes in a policy.
pub const MAX_SCHEMES: usize = 32;

/// Local signature policy: enabled schemes in preference order, and the
/// weakest scheme strength that may be selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignaturePolicy {
    schemes: ArrayVec<[SignatureScheme; MAX_SCHEMES]>,
    min_security: SecurityLevel,
}

impl SignaturePolicy {
    /// Create a policy. Schemes beyond [`MAX_SCHEMES`] are ignored.
    pub fn new(
        schemes: impl IntoIterator<Item = SignatureScheme>,
        min_security: SecurityLevel,
    ) -> Self {
        let mut list = ArrayVec::new();
        for scheme in schemes {
            if list.len() == MAX_SCHEMES {
                warn!("Signature policy truncated to {} schemes", MAX_SCHEMES);
                break;
            }
            if !list.contains(&scheme) {
                list.push(scheme);
            }
        }
        SignaturePolicy {
            schemes: list,
            min_security,
        }
    }

    /// Default preference order.
    pub fn default_schemes() -> &'static [SignatureScheme] {
        &[
            S::RSA_PSS_RSAE_SHA256,
            S::RSA_PSS_RSAE_SHA384,
            S::RSA_PSS_RSAE_SHA512,
            S::ECDSA_SECP256R1_SHA256,
            S::ECDSA_SECP384R1_SHA384,
            S::ECDSA_SECP521R1_SHA512,
            S::ED25519,
            S::ED448,
            S::RSA_PSS_PSS_SHA256,
            S::RSA_PSS_PSS_SHA384,
            S::RSA_PSS_PSS_SHA512,
            S::RSA_PKCS1_SHA256,
            S::RSA_PKCS1_SHA384,
            S::RSA_PKCS1_SHA512,
        ]
    }

    pub fn schemes(&self) -> &[SignatureScheme] {
        &self.schemes
    }

    pub fn min_security(&self) -> SecurityLevel {
        self.min_security
    }

    pub fn is_enabled(&self, scheme: SignatureScheme) -> bool {
        self.schemes.contains(&scheme)
    }
}

impl Default for SignaturePolicy {
    fn default() -> Self {
        SignaturePolicy::new(
            SignaturePolicy::default_schemes().iter().copied(),
            SecurityLevel::Medium,
        )
    }
}

/// Pick the scheme to sign with for a local key.
///
/// Candidates come from `peer_schemes` (the peer's `signature_algorithms`,
/// in the peer's order) or, when the peer advertised nothing, from the
/// local policy order. The first candidate that is enabled locally, valid
/// for `version`, strong enough and usable with `key` wins.
pub fn best_for(
    key: KeyAlgorithm,
    version: ProtocolVersion,
    policy: &SignaturePolicy,
    peer_schemes: &[SignatureScheme],
) -> Result<&'static SignatureSchemeDescriptor, Error> {
    let candidates = if peer_schemes.is_empty() {
        policy.schemes()
    } else {
        peer_schemes
    };

    for scheme in candidates {
        if !policy.is_enabled(*scheme) {
            continue;
        }
        let Ok(descriptor) = resolve(scheme.as_u16(), version) else {
            continue;
        };
        if descriptor.security < policy.min_security() {
            trace!("Skip {}: below minimum security", descriptor.name);
            continue;
        }
        if descriptor.usable_with(key) {
            return Ok(descriptor);
        }
    }

    debug!("No signature scheme for {} key in {}", key, version);
    Err(Error::IncompatibleSignatureWithKey)
}
