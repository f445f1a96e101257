//! Signing and key loading implementations using RustCrypto.

use std::str;

use pkcs8::{DecodePrivateKey, DecodePublicKey};
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha2::{Sha256, Sha384, Sha512};
use signature::hazmat::{PrehashSigner, PrehashVerifier};
use signature::{RandomizedSigner, SignatureEncoding, Signer, Verifier};
use spki::ObjectIdentifier;

use super::hash::digest;
use crate::buffer::Buf;
use crate::crypto::provider::{KeyProvider, SignatureVerifier, SigningKey};
use crate::types::{KeyAlgorithm, NamedGroup, SignatureScheme, VerifyFlags};

const OID_P256: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.3.1.7");
const OID_P384: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.132.0.34");

/// Smallest RSA modulus accepted without `ALLOW_WEAK_RSA_KEYS`.
const MIN_RSA_BITS: usize = 2048;

/// Private key implementation.
enum RustCryptoSigningKey {
    EcdsaP256(p256::ecdsa::SigningKey),
    EcdsaP384(p384::ecdsa::SigningKey),
    Rsa(Box<RsaPrivateKey>),
}

impl std::fmt::Debug for RustCryptoSigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RustCryptoSigningKey::EcdsaP256(_) => f.debug_tuple("EcdsaSigningKey::P256").finish(),
            RustCryptoSigningKey::EcdsaP384(_) => f.debug_tuple("EcdsaSigningKey::P384").finish(),
            RustCryptoSigningKey::Rsa(key) => f
                .debug_tuple("RsaSigningKey")
                .field(&(key.size() * 8))
                .finish(),
        }
    }
}

fn is_ecdsa(scheme: SignatureScheme) -> bool {
    matches!(
        scheme,
        SignatureScheme::ECDSA_SECP256R1_SHA256
            | SignatureScheme::ECDSA_SECP384R1_SHA384
            | SignatureScheme::ECDSA_SECP521R1_SHA512
            | SignatureScheme::ECDSA_SHA1
    )
}

impl SigningKey for RustCryptoSigningKey {
    fn sign(&mut self, scheme: SignatureScheme, data: &[u8], out: &mut Buf) -> Result<(), String> {
        out.clear();
        match self {
            RustCryptoSigningKey::EcdsaP256(key) if is_ecdsa(scheme) => {
                let hash = digest(scheme.hash_algorithm(), data)?;
                let signature: p256::ecdsa::Signature = key
                    .sign_prehash(&hash)
                    .map_err(|_| "Signing failed".to_string())?;
                out.extend_from_slice(signature.to_der().as_bytes());
            }
            RustCryptoSigningKey::EcdsaP384(key) if is_ecdsa(scheme) => {
                let hash = digest(scheme.hash_algorithm(), data)?;
                let signature: p384::ecdsa::Signature = key
                    .sign_prehash(&hash)
                    .map_err(|_| "Signing failed".to_string())?;
                out.extend_from_slice(signature.to_der().as_bytes());
            }
            RustCryptoSigningKey::Rsa(key) => {
                let signature = sign_rsa(key, scheme, data)?;
                out.extend_from_slice(&signature);
            }
            _ => {
                return Err(format!(
                    "Key {} cannot sign with {:?}",
                    self.key_algorithm(),
                    scheme
                ))
            }
        }
        Ok(())
    }

    fn key_algorithm(&self) -> KeyAlgorithm {
        match self {
            RustCryptoSigningKey::EcdsaP256(_) => KeyAlgorithm::Ecdsa(NamedGroup::Secp256r1),
            RustCryptoSigningKey::EcdsaP384(_) => KeyAlgorithm::Ecdsa(NamedGroup::Secp384r1),
            RustCryptoSigningKey::Rsa(_) => KeyAlgorithm::Rsa,
        }
    }
}

fn sign_rsa(key: &RsaPrivateKey, scheme: SignatureScheme, data: &[u8]) -> Result<Vec<u8>, String> {
    use rsa::{pkcs1v15, pss};

    let mut rng = rand::thread_rng();
    let key = key.clone();

    // PSS salt length equals the digest length (RFC 8446 4.2.3).
    let signature = match scheme {
        SignatureScheme::RSA_PSS_RSAE_SHA256 => pss::BlindedSigningKey::<Sha256>::new(key)
            .try_sign_with_rng(&mut rng, data)
            .map_err(|e| format!("RSA-PSS signing failed: {}", e))?
            .to_vec(),
        SignatureScheme::RSA_PSS_RSAE_SHA384 => pss::BlindedSigningKey::<Sha384>::new(key)
            .try_sign_with_rng(&mut rng, data)
            .map_err(|e| format!("RSA-PSS signing failed: {}", e))?
            .to_vec(),
        SignatureScheme::RSA_PSS_RSAE_SHA512 => pss::BlindedSigningKey::<Sha512>::new(key)
            .try_sign_with_rng(&mut rng, data)
            .map_err(|e| format!("RSA-PSS signing failed: {}", e))?
            .to_vec(),
        SignatureScheme::RSA_PKCS1_SHA256 => pkcs1v15::SigningKey::<Sha256>::new(key)
            .try_sign(data)
            .map_err(|e| format!("RSA signing failed: {}", e))?
            .to_vec(),
        SignatureScheme::RSA_PKCS1_SHA384 => pkcs1v15::SigningKey::<Sha384>::new(key)
            .try_sign(data)
            .map_err(|e| format!("RSA signing failed: {}", e))?
            .to_vec(),
        SignatureScheme::RSA_PKCS1_SHA512 => pkcs1v15::SigningKey::<Sha512>::new(key)
            .try_sign(data)
            .map_err(|e| format!("RSA signing failed: {}", e))?
            .to_vec(),
        _ => return Err(format!("RSA key cannot sign with {:?}", scheme)),
    };

    Ok(signature)
}

/// Key provider implementation.
#[derive(Debug)]
pub(super) struct RustCryptoKeyProvider;

impl RustCryptoKeyProvider {
    /// Parse an OpenSSL "EC PRIVATE KEY" (SEC1) structure.
    fn load_sec1(&self, key_der: &[u8]) -> Option<RustCryptoSigningKey> {
        let ec_key = sec1::EcPrivateKey::try_from(key_der).ok()?;

        let curve_oid = match ec_key.parameters {
            Some(sec1::EcParameters::NamedCurve(oid)) => oid,
            None if ec_key.private_key.len() == 32 => OID_P256,
            None if ec_key.private_key.len() == 48 => OID_P384,
            None => return None,
        };

        if curve_oid == OID_P256 {
            let secret = p256::SecretKey::from_sec1_der(key_der).ok()?;
            return Some(RustCryptoSigningKey::EcdsaP256(secret.into()));
        }
        if curve_oid == OID_P384 {
            let secret = p384::SecretKey::from_sec1_der(key_der).ok()?;
            return Some(RustCryptoSigningKey::EcdsaP384(secret.into()));
        }
        None
    }
}

impl KeyProvider for RustCryptoKeyProvider {
    fn load_private_key(&self, key_der: &[u8]) -> Result<Box<dyn SigningKey>, String> {
        // Try PKCS#8 DER format first (most common)
        if let Ok(key) = p256::ecdsa::SigningKey::from_pkcs8_der(key_der) {
            return Ok(Box::new(RustCryptoSigningKey::EcdsaP256(key)));
        }
        if let Ok(key) = p384::ecdsa::SigningKey::from_pkcs8_der(key_der) {
            return Ok(Box::new(RustCryptoSigningKey::EcdsaP384(key)));
        }
        if let Ok(key) = RsaPrivateKey::from_pkcs8_der(key_der) {
            return Ok(Box::new(RustCryptoSigningKey::Rsa(Box::new(key))));
        }

        // OpenSSL's traditional formats
        if let Some(key) = self.load_sec1(key_der) {
            return Ok(Box::new(key));
        }
        if let Ok(key) = RsaPrivateKey::from_pkcs1_der(key_der) {
            return Ok(Box::new(RustCryptoSigningKey::Rsa(Box::new(key))));
        }

        // Check if it's a PEM encoded key
        if let Ok(pem_str) = str::from_utf8(key_der) {
            if pem_str.contains("-----BEGIN") {
                if let Ok((_label, doc)) = pkcs8::Document::from_pem(pem_str) {
                    return self.load_private_key(doc.as_bytes());
                }
            }
        }

        Err("Failed to parse private key in any supported format".to_string())
    }
}

/// Signature verifier implementation.
#[derive(Debug)]
pub(super) struct RustCryptoSignatureVerifier;

impl RustCryptoSignatureVerifier {
    fn verify_ecdsa(
        &self,
        spki_der: &[u8],
        data: &[u8],
        signature: &[u8],
        scheme: SignatureScheme,
    ) -> Result<(), String> {
        let hash = digest(scheme.hash_algorithm(), data)?;

        if let Ok(key) = p256::ecdsa::VerifyingKey::from_public_key_der(spki_der) {
            let sig = p256::ecdsa::Signature::from_der(signature)
                .map_err(|_| "Invalid signature format".to_string())?;
            return key
                .verify_prehash(&hash, &sig)
                .map_err(|_| format!("ECDSA signature verification failed for {:?}", scheme));
        }

        if let Ok(key) = p384::ecdsa::VerifyingKey::from_public_key_der(spki_der) {
            let sig = p384::ecdsa::Signature::from_der(signature)
                .map_err(|_| "Invalid signature format".to_string())?;
            return key
                .verify_prehash(&hash, &sig)
                .map_err(|_| format!("ECDSA signature verification failed for {:?}", scheme));
        }

        Err("Unsupported or invalid EC public key".to_string())
    }

    fn verify_rsa(
        &self,
        spki_der: &[u8],
        data: &[u8],
        signature: &[u8],
        scheme: SignatureScheme,
        flags: VerifyFlags,
    ) -> Result<(), String> {
        use rsa::{pkcs1v15, pss};

        let key = RsaPublicKey::from_public_key_der(spki_der)
            .map_err(|e| format!("Invalid RSA public key: {}", e))?;

        let bits = key.size() * 8;
        if bits < MIN_RSA_BITS && !flags.contains(VerifyFlags::ALLOW_WEAK_RSA_KEYS) {
            return Err(format!("RSA key of {} bits is too weak", bits));
        }

        let failed =
            |_: signature::Error| format!("RSA signature verification failed for {:?}", scheme);

        match scheme {
            SignatureScheme::RSA_PSS_RSAE_SHA256
            | SignatureScheme::RSA_PSS_RSAE_SHA384
            | SignatureScheme::RSA_PSS_RSAE_SHA512 => {
                let sig = pss::Signature::try_from(signature)
                    .map_err(|_| "Invalid signature format".to_string())?;
                let result = match scheme {
                    SignatureScheme::RSA_PSS_RSAE_SHA256 => {
                        pss::VerifyingKey::<Sha256>::new(key).verify(data, &sig)
                    }
                    SignatureScheme::RSA_PSS_RSAE_SHA384 => {
                        pss::VerifyingKey::<Sha384>::new(key).verify(data, &sig)
                    }
                    _ => pss::VerifyingKey::<Sha512>::new(key).verify(data, &sig),
                };
                result.map_err(failed)
            }
            SignatureScheme::RSA_PKCS1_SHA256
            | SignatureScheme::RSA_PKCS1_SHA384
            | SignatureScheme::RSA_PKCS1_SHA512 => {
                let sig = pkcs1v15::Signature::try_from(signature)
                    .map_err(|_| "Invalid signature format".to_string())?;
                let result = match scheme {
                    SignatureScheme::RSA_PKCS1_SHA256 => {
                        pkcs1v15::VerifyingKey::<Sha256>::new(key).verify(data, &sig)
                    }
                    SignatureScheme::RSA_PKCS1_SHA384 => {
                        pkcs1v15::VerifyingKey::<Sha384>::new(key).verify(data, &sig)
                    }
                    _ => pkcs1v15::VerifyingKey::<Sha512>::new(key).verify(data, &sig),
                };
                result.map_err(failed)
            }
            _ => Err(format!("Unsupported RSA signature scheme: {:?}", scheme)),
        }
    }
}

impl SignatureVerifier for RustCryptoSignatureVerifier {
    fn verify_signature(
        &self,
        spki_der: &[u8],
        data: &[u8],
        signature: &[u8],
        scheme: SignatureScheme,
        flags: VerifyFlags,
    ) -> Result<(), String> {
        if matches!(
            scheme,
            SignatureScheme::RSA_PKCS1_SHA1 | SignatureScheme::ECDSA_SHA1
        ) && !flags.contains(VerifyFlags::ALLOW_SIGN_WITH_SHA1)
        {
            return Err(format!("{:?} is not allowed by the verification policy", scheme));
        }

        if is_ecdsa(scheme) {
            self.verify_ecdsa(spki_der, data, signature, scheme)
        } else {
            self.verify_rsa(spki_der, data, signature, scheme, flags)
        }
    }
}

/// Static instance of the key provider.
pub(super) static KEY_PROVIDER: RustCryptoKeyProvider = RustCryptoKeyProvider;

/// Static instance of the signature verifier.
pub(super) static SIGNATURE_VERIFIER: RustCryptoSignatureVerifier = RustCryptoSignatureVerifier;
