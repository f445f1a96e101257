//! Local and peer credentials.
//!
//! The handshake reaches credentials through the [`CertificateAuth`] trait.
//! [`CertificateStore`] is an in-memory implementation holding one local
//! certificate chain with its key and whatever the peer presented.
//!
//! The module also has a helper to generate self-signed certificates.

use std::fmt;

use der::{Decode, Encode};
use rcgen::{
    Certificate as RcgenCertificate, CertificateParams, DistinguishedName, DnType, IsCa, KeyPair,
    SignatureAlgorithm as RcgenAlgorithm, PKCS_ECDSA_P256_SHA256, PKCS_ECDSA_P384_SHA384,
    PKCS_ED25519,
};
use spki::{AlgorithmIdentifierRef, ObjectIdentifier, SubjectPublicKeyInfoRef};
use x509_cert::Certificate as X509Certificate;
use zeroize::Zeroizing;

use crate::crypto::{KeyProvider, SigningKey};
use crate::types::{KeyAlgorithm, NamedGroup};
use crate::Error;

const OID_RSA_ENCRYPTION: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");
const OID_RSASSA_PSS: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.10");
const OID_EC_PUBLIC_KEY: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.2.1");
const OID_ED25519: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.101.112");
const OID_ED448: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.101.113");

const OID_P256: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.3.1.7");
const OID_P384: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.132.0.34");
const OID_P521: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.132.0.35");

/// Kind of credential exchanged in the Certificate message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CertificateType {
    #[default]
    X509,
    /// RFC 7250 raw public key (a bare SubjectPublicKeyInfo).
    RawPublicKey,
}

/// A local certificate chain plus the private key for its leaf.
pub struct Credential {
    certs: Vec<Vec<u8>>,
    key: Option<Box<dyn SigningKey>>,
}

impl Credential {
    pub fn new(certs: Vec<Vec<u8>>, key: Option<Box<dyn SigningKey>>) -> Self {
        Credential { certs, key }
    }

    /// Build a credential from DER certificates and a DER/PEM private key.
    pub fn from_der(
        certs: Vec<Vec<u8>>,
        key_der: &[u8],
        key_provider: &dyn KeyProvider,
    ) -> Result<Self, Error> {
        let key = key_provider
            .load_private_key(key_der)
            .map_err(Error::CertificateError)?;
        Ok(Credential::new(certs, Some(key)))
    }

    pub fn certificates(&self) -> &[Vec<u8>] {
        &self.certs
    }

    pub fn has_key(&self) -> bool {
        self.key.is_some()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("certs", &self.certs.len())
            .field("key", &self.key)
            .finish()
    }
}

/// What the local side would send in its Certificate message.
pub struct SelectedCertificate<'a> {
    /// Certificate chain, leaf first. Empty when nothing is configured.
    pub certs: &'a [Vec<u8>],
    /// Signing key for the leaf.
    pub key: Option<&'a mut dyn SigningKey>,
}

/// Access to the certificate-authentication state of a handshake.
pub trait CertificateAuth {
    /// The local certificate chain and key selected for this handshake.
    fn selected_certificate(&mut self) -> SelectedCertificate<'_>;

    /// The public key the peer authenticated with.
    fn peer_credential(&self, cert_type: CertificateType) -> Result<PeerCredential, Error>;
}

/// Public key of the peer, as DER SubjectPublicKeyInfo.
#[derive(Clone, PartialEq, Eq)]
pub struct PeerCredential {
    spki_der: Vec<u8>,
    key_algorithm: KeyAlgorithm,
}

impl PeerCredential {
    /// Extract the public key from a DER X.509 certificate.
    pub fn from_certificate_der(cert_der: &[u8]) -> Result<Self, Error> {
        let cert = X509Certificate::from_der(cert_der)
            .map_err(|e| Error::CertificateError(format!("Failed to parse certificate: {}", e)))?;

        let spki_der = cert
            .tbs_certificate
            .subject_public_key_info
            .to_der()
            .map_err(|e| Error::CertificateError(format!("Failed to encode public key: {}", e)))?;

        Self::from_spki_der(&spki_der)
    }

    /// Use a bare SubjectPublicKeyInfo (raw public key).
    pub fn from_spki_der(spki_der: &[u8]) -> Result<Self, Error> {
        let spki = SubjectPublicKeyInfoRef::try_from(spki_der)
            .map_err(|e| Error::CertificateError(format!("Invalid public key: {}", e)))?;

        let key_algorithm = detect_key_algorithm(&spki.algorithm)?;

        Ok(PeerCredential {
            spki_der: spki_der.to_vec(),
            key_algorithm,
        })
    }

    pub fn spki_der(&self) -> &[u8] {
        &self.spki_der
    }

    pub fn key_algorithm(&self) -> KeyAlgorithm {
        self.key_algorithm
    }
}

impl fmt::Debug for PeerCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PeerCredential")
            .field("key_algorithm", &self.key_algorithm)
            .field("spki_der", &self.spki_der.len())
            .finish()
    }
}

fn detect_key_algorithm(algorithm: &AlgorithmIdentifierRef<'_>) -> Result<KeyAlgorithm, Error> {
    match algorithm.oid {
        OID_RSA_ENCRYPTION => Ok(KeyAlgorithm::Rsa),
        OID_RSASSA_PSS => Ok(KeyAlgorithm::RsaPss),
        OID_ED25519 => Ok(KeyAlgorithm::Ed25519),
        OID_ED448 => Ok(KeyAlgorithm::Ed448),
        OID_EC_PUBLIC_KEY => {
            let curve: ObjectIdentifier = algorithm
                .parameters
                .as_ref()
                .ok_or_else(|| Error::CertificateError("Missing EC curve parameter".to_string()))?
                .decode_as()
                .map_err(|_| Error::CertificateError("Invalid EC curve parameter".to_string()))?;

            let group = match curve {
                OID_P256 => NamedGroup::Secp256r1,
                OID_P384 => NamedGroup::Secp384r1,
                OID_P521 => NamedGroup::Secp521r1,
                _ => {
                    return Err(Error::CertificateError(format!(
                        "Unsupported EC curve: {}",
                        curve
                    )))
                }
            };
            Ok(KeyAlgorithm::Ecdsa(group))
        }
        oid => Err(Error::CertificateError(format!(
            "Unsupported public key algorithm: {}",
            oid
        ))),
    }
}

/// In-memory [`CertificateAuth`].
#[derive(Debug, Default)]
pub struct CertificateStore {
    local: Option<Credential>,
    peer_certs: Vec<Vec<u8>>,
    peer_raw_key: Option<Vec<u8>>,
}

impl CertificateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credential(credential: Credential) -> Self {
        CertificateStore {
            local: Some(credential),
            ..Default::default()
        }
    }

    pub fn set_credential(&mut self, credential: Credential) {
        self.local = Some(credential);
    }

    /// Chain the peer sent in its Certificate message, leaf first.
    pub fn set_peer_certificates(&mut self, certs: Vec<Vec<u8>>) {
        self.peer_certs = certs;
    }

    pub fn set_peer_raw_public_key(&mut self, spki_der: Vec<u8>) {
        self.peer_raw_key = Some(spki_der);
    }
}

impl CertificateAuth for CertificateStore {
    fn selected_certificate(&mut self) -> SelectedCertificate<'_> {
        match &mut self.local {
            Some(credential) => SelectedCertificate {
                certs: &credential.certs,
                key: credential
                    .key
                    .as_deref_mut()
                    .map(|k| k as &mut dyn SigningKey),
            },
            None => SelectedCertificate {
                certs: &[],
                key: None,
            },
        }
    }

    fn peer_credential(&self, cert_type: CertificateType) -> Result<PeerCredential, Error> {
        match cert_type {
            CertificateType::X509 => {
                let leaf = self.peer_certs.first().ok_or(Error::InsufficientCredentials)?;
                PeerCredential::from_certificate_der(leaf)
            }
            CertificateType::RawPublicKey => {
                let spki = self
                    .peer_raw_key
                    .as_ref()
                    .ok_or(Error::InsufficientCredentials)?;
                PeerCredential::from_spki_der(spki)
            }
        }
    }
}

/// Certificate and private key pair.
#[derive(Clone)]
pub struct GeneratedCertificate {
    /// Certificate in DER format
    pub certificate: Vec<u8>,
    /// Private key in PKCS#8 DER format
    pub private_key: Zeroizing<Vec<u8>>,
}

/// Generate a self-signed certificate with a fresh key of type `key`.
///
/// ECDSA P-256, ECDSA P-384 and Ed25519 keys can be generated.
pub fn generate_self_signed_certificate(key: KeyAlgorithm) -> Result<GeneratedCertificate, Error> {
    let alg: &'static RcgenAlgorithm = match key {
        KeyAlgorithm::Ecdsa(NamedGroup::Secp256r1) => &PKCS_ECDSA_P256_SHA256,
        KeyAlgorithm::Ecdsa(NamedGroup::Secp384r1) => &PKCS_ECDSA_P384_SHA384,
        KeyAlgorithm::Ed25519 => &PKCS_ED25519,
        _ => {
            return Err(Error::CertificateError(format!(
                "Cannot generate {} keys",
                key
            )))
        }
    };

    let key_pair = KeyPair::generate(alg)
        .map_err(|e| Error::CertificateError(format!("Key generation failed: {}", e)))?;

    let mut params = CertificateParams::new(vec!["certverify.local".to_string()]);

    let mut distinguished_name = DistinguishedName::new();
    distinguished_name.push(DnType::OrganizationName, "certverify".to_string());
    distinguished_name.push(DnType::CommonName, "certverify.local".to_string());
    params.distinguished_name = distinguished_name;

    params.is_ca = IsCa::NoCa;
    params.alg = alg;
    params.key_pair = Some(key_pair);

    let not_before = time::OffsetDateTime::now_utc();
    params.not_before = not_before;
    params.not_after = not_before + time::Duration::days(365);

    let cert = RcgenCertificate::from_params(params)
        .map_err(|e| Error::CertificateError(format!("Certificate generation failed: {}", e)))?;

    let certificate = cert
        .serialize_der()
        .map_err(|e| Error::CertificateError(format!("Certificate encoding failed: {}", e)))?;

    let private_key = Zeroizing::new(cert.serialize_private_key_der());

    debug!("Generated self-signed {} certificate", key);

    Ok(GeneratedCertificate {
        certificate,
        private_key,
    })
}

impl GeneratedCertificate {
    /// Turn into a [`Credential`] with a single-certificate chain.
    pub fn into_credential(self, key_provider: &dyn KeyProvider) -> Result<Credential, Error> {
        Credential::from_der(vec![self.certificate], &self.private_key, key_provider)
    }
}

impl fmt::Debug for GeneratedCertificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratedCertificate")
            .field("certificate", &self.certificate.len())
            .field("private_key", &self.private_key.len())
            .finish()
    }
}
