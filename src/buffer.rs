//! Growable byte buffer used for handshake bodies, signatures and digests.
//!
//! [`Buf`] wraps `Vec<u8>` with the handful of operations the handshake code
//! needs. Growth that can fail (building an outgoing message) goes through
//! [`Buf::try_extend_from_slice`] so allocation failure surfaces as
//! [`Error::MemoryError`] instead of aborting the process.

use std::fmt;
use std::ops::{Deref, DerefMut};

use crate::Error;

/// Growable buffer wrapper.
#[derive(Default, Clone, PartialEq, Eq)]
pub struct Buf(Vec<u8>);

impl Buf {
    /// Create a new empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new buffer from a slice.
    pub fn from_slice(data: &[u8]) -> Self {
        Buf(data.to_vec())
    }

    /// Clear the buffer, removing all data.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Extend the buffer with a slice of bytes.
    pub fn extend_from_slice(&mut self, other: &[u8]) {
        self.0.extend_from_slice(other);
    }

    /// Extend the buffer, reporting allocation failure instead of aborting.
    pub fn try_extend_from_slice(&mut self, other: &[u8]) -> Result<(), Error> {
        self.0
            .try_reserve(other.len())
            .map_err(|_| Error::MemoryError)?;
        self.0.extend_from_slice(other);
        Ok(())
    }
}

impl Deref for Buf {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Buf {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl AsRef<[u8]> for Buf {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Buf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Buf").field("len", &self.0.len()).finish()
    }
}
