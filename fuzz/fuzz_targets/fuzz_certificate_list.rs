#![no_main]

//! Fuzz target for peer certificate handling.
//!
//! Arbitrary bytes are fed to the `certificate_list` decoder, and whatever
//! decodes is handed to verification as a peer chain. Neither step may
//! panic; verification of garbage must come back `false`.
//!
//! Input layout:
//! - byte 0: picks one of a fixed set of signature schemes
//! - bytes 1..: certificate_list body (24-bit total length, 24-bit length + DER each)

use std::sync::OnceLock;

use libfuzzer_sys::fuzz_target;

use certbridge::wire::decode_certificate_list;
use certbridge::{CertificateStore, ChainValidationPolicy, Config, SignatureScheme};

const DATA: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../tests/data/");

fn store() -> &'static CertificateStore {
    static STORE: OnceLock<CertificateStore> = OnceLock::new();
    STORE.get_or_init(|| {
        let config = Config::builder()
            .add_entry(
                format!("{DATA}p256_cert.der"),
                format!("{DATA}p256_key.pem"),
                true,
            )
            .root_ca(format!("{DATA}ca_cert.pem"))
            .chain_validation(ChainValidationPolicy::Enforce)
            .build()
            .expect("fuzz config");
        CertificateStore::new(config).expect("fuzz store")
    })
}

const SCHEMES: [SignatureScheme; 4] = [
    SignatureScheme::ECDSA_SECP256R1_SHA256,
    SignatureScheme::ECDSA_SECP384R1_SHA384,
    SignatureScheme::RSA_PKCS1_SHA256,
    SignatureScheme::RSA_PSS_RSAE_SHA256,
];

fuzz_target!(|data: &[u8]| {
    let Some((&selector, rest)) = data.split_first() else {
        return;
    };

    let Ok(certs) = decode_certificate_list(rest) else {
        return;
    };

    let scheme = SCHEMES[selector as usize % SCHEMES.len()];
    let verified = store()
        .verify(&certs, scheme, b"fuzz transcript", &[0x30, 0x06, 0x02, 0x01, 0x01, 0x02, 0x01, 0x01])
        .expect("supported scheme");
    assert!(!verified);
});
