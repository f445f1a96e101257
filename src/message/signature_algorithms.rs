use nom::error::{Error as NomError, ErrorKind};
use nom::IResult;
use tinyvec::ArrayVec;

use crate::buffer::Buf;
use crate::codec::{parse_u16_prefixed, write_u16_prefixed};
use crate::registry::MAX_SCHEMES;
use crate::types::SignatureScheme;
use crate::Error;

/// SignatureAlgorithms extension as defined in RFC 8446 4.2.3
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureAlgorithmsExtension {
    pub schemes: ArrayVec<[SignatureScheme; MAX_SCHEMES]>,
}

impl SignatureAlgorithmsExtension {
    pub fn new(schemes: ArrayVec<[SignatureScheme; MAX_SCHEMES]>) -> Self {
        SignatureAlgorithmsExtension { schemes }
    }

    pub fn parse(input: &[u8]) -> IResult<&[u8], SignatureAlgorithmsExtension> {
        let (rest, list) = parse_u16_prefixed(input)?;

        if list.is_empty() || list.len() % 2 != 0 {
            return Err(nom::Err::Failure(NomError::new(input, ErrorKind::LengthValue)));
        }

        let mut schemes = ArrayVec::new();
        for pair in list.chunks_exact(2) {
            let scheme = SignatureScheme::from_u16(u16::from_be_bytes([pair[0], pair[1]]));
            if schemes.contains(&scheme) {
                continue;
            }
            if schemes.try_push(scheme).is_some() {
                trace!("Ignoring signature schemes beyond {}", MAX_SCHEMES);
                break;
            }
        }

        Ok((rest, SignatureAlgorithmsExtension { schemes }))
    }

    pub fn serialize(&self, output: &mut Buf) -> Result<(), Error> {
        let mut list = Buf::new();
        for scheme in &self.schemes {
            list.try_extend_from_slice(&scheme.to_bytes())?;
        }
        write_u16_prefixed(output, &list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_algorithms_extension() {
        let mut schemes = ArrayVec::new();
        schemes.push(SignatureScheme::ECDSA_SECP256R1_SHA256);
        schemes.push(SignatureScheme::RSA_PSS_RSAE_SHA256);

        let ext = SignatureAlgorithmsExtension::new(schemes);

        let mut serialized = Buf::new();
        ext.serialize(&mut serialized).unwrap();

        let expected = [
            0x00, 0x04, // Length (4 bytes)
            0x04, 0x03, // ecdsa_secp256r1_sha256
            0x08, 0x04, // rsa_pss_rsae_sha256
        ];
        assert_eq!(&*serialized, expected);

        let (rest, parsed) = SignatureAlgorithmsExtension::parse(&serialized).unwrap();
        assert!(rest.is_empty());
        assert_eq!(parsed, ext);
    }

    #[test]
    fn odd_length_rejected() {
        assert!(SignatureAlgorithmsExtension::parse(&[0x00, 0x03, 0x04, 0x03, 0x08]).is_err());
        assert!(SignatureAlgorithmsExtension::parse(&[0x00, 0x00]).is_err());
    }

    #[test]
    fn unknown_and_duplicate_entries() {
        let input = [0x00, 0x06, 0x04, 0x03, 0xAA, 0xBB, 0x04, 0x03];
        let (_, parsed) = SignatureAlgorithmsExtension::parse(&input).unwrap();
        assert_eq!(
            &parsed.schemes[..],
            &[
                SignatureScheme::ECDSA_SECP256R1_SHA256,
                SignatureScheme::Unknown(0xAABB)
            ]
        );
    }
}
