#![no_main]

//! Fuzz target for the signature_algorithms extension parser and the
//! scheme selection fed by it.

use libfuzzer_sys::fuzz_target;

use certverify::message::SignatureAlgorithmsExtension;
use certverify::registry::{self, SignaturePolicy};
use certverify::{KeyAlgorithm, NamedGroup, ProtocolVersion};

fuzz_target!(|data: &[u8]| {
    let Ok((_, ext)) = SignatureAlgorithmsExtension::parse(data) else {
        return;
    };

    let policy = SignaturePolicy::default();
    for key in [
        KeyAlgorithm::Rsa,
        KeyAlgorithm::Ecdsa(NamedGroup::Secp256r1),
        KeyAlgorithm::Ed25519,
    ] {
        let _ = registry::best_for(key, ProtocolVersion::TLS1_3, &policy, &ext.schemes);
    }

    for scheme in ext.schemes.iter() {
        let _ = registry::resolve(scheme.as_u16(), ProtocolVersion::TLS1_2);
    }
});
