use nom::number::complete::be_u16;
use nom::IResult;

use crate::buffer::Buf;
use crate::codec::{parse_u16_prefixed, write_u16_prefixed};
use crate::types::SignatureScheme;
use crate::Error;

/// Body of a TLS 1.3 CertificateVerify handshake message.
///
/// ```text
/// struct {
///     SignatureScheme algorithm;
///     opaque signature<0..2^16-1>;
/// } CertificateVerify;
/// ```
#[derive(Debug, PartialEq, Eq)]
pub struct CertificateVerify<'a> {
    pub algorithm: SignatureScheme,
    pub signature: &'a [u8],
}

impl<'a> CertificateVerify<'a> {
    pub fn new(algorithm: SignatureScheme, signature: &'a [u8]) -> Self {
        CertificateVerify {
            algorithm,
            signature,
        }
    }

    pub fn parse(input: &'a [u8]) -> IResult<&'a [u8], CertificateVerify<'a>> {
        let (input, algorithm) = be_u16(input)?;
        let (input, signature) = parse_u16_prefixed(input)?;
        Ok((
            input,
            CertificateVerify {
                algorithm: SignatureScheme::from_u16(algorithm),
                signature,
            },
        ))
    }

    pub fn serialize(&self, out: &mut Buf) -> Result<(), Error> {
        out.try_extend_from_slice(&self.algorithm.to_bytes())?;
        write_u16_prefixed(out, self.signature)
    }
}
