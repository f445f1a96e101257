//! Handshake message transport seam.

use crate::buffer::Buf;
use crate::types::MessageType;
use crate::Error;

/// Moves handshake message bodies to and from the record layer.
///
/// Framing (handshake header, records, encryption) belongs to the
/// implementation. Only bodies cross this boundary.
pub trait HandshakeIo {
    /// Receive the body of the next handshake message, which must be of
    /// type `expected`.
    fn recv_handshake(&mut self, expected: MessageType) -> Result<Buf, Error>;

    /// Offer `body` for sending as a message of type `msg_type`.
    ///
    /// Returns how many bytes were accepted. Fewer than `body.len()` is a
    /// partial write; the caller offers the rest later.
    fn send_handshake(&mut self, msg_type: MessageType, body: &[u8]) -> Result<usize, Error>;
}
