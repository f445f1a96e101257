//! Length-prefixed field reader/writer for handshake message bodies.
//!
//! All lengths are big-endian. Reading is built on `nom` complete parsers,
//! so a short input is always [`Error::Truncated`], never "incomplete".

use nom::multi::length_data;
use nom::number::complete::be_u16;
use nom::IResult;

use crate::buffer::Buf;
use crate::Error;

const MAX_U16: usize = u16::MAX as usize;

/// Append `bytes` preceded by its 16-bit big-endian length.
pub fn write_u16_prefixed(out: &mut Buf, bytes: &[u8]) -> Result<(), Error> {
    if bytes.len() > MAX_U16 {
        return Err(Error::InternalError(format!(
            "Field of {} bytes does not fit a 16-bit length",
            bytes.len()
        )));
    }
    out.try_extend_from_slice(&(bytes.len() as u16).to_be_bytes())?;
    out.try_extend_from_slice(bytes)
}

/// nom parser for an opaque field with a 16-bit length prefix.
pub fn parse_u16_prefixed(input: &[u8]) -> IResult<&[u8], &[u8]> {
    length_data(be_u16)(input)
}

/// Read an opaque field with a 16-bit length prefix.
///
/// Returns `(rest, field)`.
pub fn read_u16_prefixed(input: &[u8]) -> Result<(&[u8], &[u8]), Error> {
    parse_u16_prefixed(input).map_err(|_| Error::Truncated)
}
