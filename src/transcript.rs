//! Running hash over the handshake messages.

use std::fmt;

use crate::buffer::Buf;
use crate::crypto::{HashContext, HashProvider};
use crate::types::{HashAlgorithm, MessageType};
use crate::Error;

/// Handshake transcript hash.
///
/// Messages are fed in wire order as `type(1) ‖ u24 length ‖ body`.
/// [`Transcript::digest`] snapshots the current value without consuming
/// the running state.
pub struct Transcript {
    hash: HashAlgorithm,
    ctx: Box<dyn HashContext>,
}

impl Transcript {
    pub fn new(hash_provider: &dyn HashProvider, hash: HashAlgorithm) -> Result<Self, Error> {
        let ctx = hash_provider
            .create_hash(hash)
            .map_err(|e| Error::ConfigError(format!("Transcript hash: {}", e)))?;
        Ok(Transcript { hash, ctx })
    }

    /// Feed raw bytes.
    pub fn update(&mut self, data: &[u8]) {
        self.ctx.update(data);
    }

    /// Feed a complete handshake message built from its type and body.
    pub fn add_handshake(&mut self, msg_type: MessageType, body: &[u8]) -> Result<(), Error> {
        let len = body.len();
        if len > 0xFF_FFFF {
            return Err(Error::InternalError(format!(
                "Handshake body of {} bytes does not fit a u24 length",
                len
            )));
        }
        let header = [
            msg_type.as_u8(),
            (len >> 16) as u8,
            (len >> 8) as u8,
            len as u8,
        ];
        self.ctx.update(&header);
        self.ctx.update(body);
        trace!("Transcript += {:?} ({} bytes)", msg_type, len);
        Ok(())
    }

    /// Write the current digest to `out`.
    pub fn digest(&self, out: &mut Buf) {
        self.ctx.clone_and_finalize(out);
    }

    pub fn hash_algorithm(&self) -> HashAlgorithm {
        self.hash
    }
}

impl fmt::Debug for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transcript")
            .field("hash", &self.hash)
            .finish()
    }
}
