//! Signing and verifying the handshake transcript (RFC 8446 4.4.3).
//!
//! The content covered by a CertificateVerify signature is
//!
//! ```text
//! 0x20 * 64 || context string || 0x00 || transcript hash
//! ```
//!
//! where the context string names the role of the signer. Binding the role
//! keeps a server signature from being replayed as a client signature and
//! vice versa.

use crate::buffer::Buf;
use crate::certificate::PeerCredential;
use crate::crypto::{SignatureVerifier, SigningKey};
use crate::registry::SignatureSchemeDescriptor;
use crate::types::{Role, VerifyFlags};
use crate::Error;

/// Context string bound into the signed content, one per role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextString(&'static [u8]);

impl ContextString {
    pub const SERVER: ContextString = ContextString(b"TLS 1.3, server CertificateVerify");
    pub const CLIENT: ContextString = ContextString(b"TLS 1.3, client CertificateVerify");

    /// Context of the entity producing the signature.
    pub fn for_signer(role: Role) -> ContextString {
        match role {
            Role::Server => ContextString::SERVER,
            Role::Client => ContextString::CLIENT,
        }
    }

    pub fn as_bytes(&self) -> &'static [u8] {
        self.0
    }
}

/// Build the content signed by `signer`.
pub fn signed_structure(signer: Role, digest: &[u8], out: &mut Buf) -> Result<(), Error> {
    out.clear();
    out.try_extend_from_slice(&[0x20u8; 64])?;
    out.try_extend_from_slice(ContextString::for_signer(signer).as_bytes())?;
    out.try_extend_from_slice(&[0x00])?;
    out.try_extend_from_slice(digest)?;
    Ok(())
}

/// Sign the transcript digest as `role` with `scheme`.
///
/// Writes the raw signature to `out`.
pub fn sign(
    role: Role,
    digest: &[u8],
    key: &mut dyn SigningKey,
    scheme: &SignatureSchemeDescriptor,
    out: &mut Buf,
) -> Result<(), Error> {
    let key_algorithm = key.key_algorithm();
    if !scheme.usable_with(key_algorithm) {
        return Err(Error::SigningFailed(format!(
            "{} key cannot sign {}",
            key_algorithm, scheme.name
        )));
    }

    let mut content = Buf::new();
    signed_structure(role, digest, &mut content)?;

    key.sign(scheme.scheme, &content, out)
        .map_err(Error::SigningFailed)?;

    trace!(
        "Signed {} bytes of transcript content with {} ({} byte signature)",
        content.len(),
        scheme.name,
        out.len()
    );
    Ok(())
}

/// Verify a signature made by the peer of `verifier_role`.
///
/// `flags` are handed to the verification primitive as-is.
pub fn verify(
    verifier: &dyn SignatureVerifier,
    verifier_role: Role,
    digest: &[u8],
    peer: &PeerCredential,
    signature: &[u8],
    scheme: &SignatureSchemeDescriptor,
    flags: VerifyFlags,
) -> Result<(), Error> {
    if signature.is_empty() {
        return Err(Error::SignatureVerificationFailed(
            "Empty signature".to_string(),
        ));
    }

    if !scheme.usable_with(peer.key_algorithm()) {
        return Err(Error::SignatureVerificationFailed(format!(
            "{} cannot come from a {} key",
            scheme.name,
            peer.key_algorithm()
        )));
    }

    let mut content = Buf::new();
    signed_structure(verifier_role.peer(), digest, &mut content)?;

    verifier
        .verify_signature(peer.spki_der(), &content, signature, scheme.scheme, flags)
        .map_err(Error::SignatureVerificationFailed)
}
