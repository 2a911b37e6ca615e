//! Validation for crypto providers.
//!
//! A provider is exercised once, when a [`Config`](crate::Config) is built,
//! with a known P-256 key: it must load the key, sign with it, verify the
//! signature against the matching public key and reject a tampered message.

use crate::buffer::Buf;
use crate::crypto::provider::{CryptoProvider, KeyKind};
use crate::registry::BackendScheme;
use crate::types::NamedGroup;
use crate::Error;

/// SEC1 DER encoded P-256 private key used for the self-test.
const SELF_TEST_KEY: &[u8] = &[
    0x30, 0x77, 0x02, 0x01, 0x01, 0x04, 0x20, 0xc2, 0x8b, 0xc5, 0x90, 0x5e, //
    0x9b, 0xc1, 0xed, 0x22, 0xe0, 0x69, 0x41, 0xf4, 0x8f, 0xa3, 0xea, 0xcf, //
    0xa4, 0x87, 0x42, 0x82, 0xc5, 0xdc, 0x0f, 0xff, 0x04, 0x1f, 0x95, 0xa3, //
    0xa8, 0xbc, 0xb9, 0xa0, 0x0a, 0x06, 0x08, 0x2a, 0x86, 0x48, 0xce, 0x3d, //
    0x03, 0x01, 0x07, 0xa1, 0x44, 0x03, 0x42, 0x00, 0x04, 0x1e, 0x87, 0x2e, //
    0xa9, 0x41, 0xf5, 0x75, 0x23, 0x42, 0xb5, 0xf0, 0xf2, 0xad, 0x66, 0xdf, //
    0x0b, 0x4d, 0x30, 0xfa, 0x9b, 0x02, 0x0c, 0xb1, 0xd0, 0xb7, 0x81, 0xe4, //
    0x3c, 0x77, 0x14, 0x25, 0x38, 0xb3, 0x61, 0x5a, 0xe1, 0x50, 0xfa, 0xb8, //
    0x47, 0xc5, 0xaf, 0x09, 0x4c, 0x83, 0xe4, 0x1e, 0x42, 0xca, 0x76, 0x89, //
    0x1e, 0x67, 0xec, 0xe4, 0xaf, 0x23, 0x60, 0x97, 0x06, 0x02, 0xe1, 0x4d, //
    0x71,
];

/// DER encoded `SubjectPublicKeyInfo` of [`SELF_TEST_KEY`].
const SELF_TEST_SPKI: &[u8] = &[
    0x30, 0x59, 0x30, 0x13, 0x06, 0x07, 0x2a, 0x86, 0x48, 0xce, 0x3d, 0x02, //
    0x01, 0x06, 0x08, 0x2a, 0x86, 0x48, 0xce, 0x3d, 0x03, 0x01, 0x07, 0x03, //
    0x42, 0x00, 0x04, 0x1e, 0x87, 0x2e, 0xa9, 0x41, 0xf5, 0x75, 0x23, 0x42, //
    0xb5, 0xf0, 0xf2, 0xad, 0x66, 0xdf, 0x0b, 0x4d, 0x30, 0xfa, 0x9b, 0x02, //
    0x0c, 0xb1, 0xd0, 0xb7, 0x81, 0xe4, 0x3c, 0x77, 0x14, 0x25, 0x38, 0xb3, //
    0x61, 0x5a, 0xe1, 0x50, 0xfa, 0xb8, 0x47, 0xc5, 0xaf, 0x09, 0x4c, 0x83, //
    0xe4, 0x1e, 0x42, 0xca, 0x76, 0x89, 0x1e, 0x67, 0xec, 0xe4, 0xaf, 0x23, //
    0x60, 0x97, 0x06, 0x02, 0xe1, 0x4d, 0x71,
];

const SELF_TEST_MESSAGE: &[u8] = b"certbridge provider self-test";

impl CryptoProvider {
    /// Validates the provider with a sign/verify self-test.
    ///
    /// Returns `Error::Config` if any step misbehaves.
    pub fn validate(&self) -> Result<(), Error> {
        let scheme = BackendScheme::EcdsaSecp256r1Sha256;

        let key = self
            .key_provider
            .load_private_key(SELF_TEST_KEY)
            .map_err(|e| Error::Config(format!("Key provider failed self-test load: {e}")))?;

        if key.kind() != KeyKind::Ec(NamedGroup::Secp256r1) || !key.supports(scheme) {
            return Err(Error::Config(
                "Key provider misclassified the P-256 self-test key".to_string(),
            ));
        }

        if !key.matches_public_key(SELF_TEST_SPKI) {
            return Err(Error::Config(
                "Key provider does not match its own public key".to_string(),
            ));
        }

        let mut sig = Buf::new();
        key.sign(scheme, SELF_TEST_MESSAGE, &mut sig)
            .map_err(|e| Error::Config(format!("Signing self-test failed: {e}")))?;

        let verifier = self.signature_verification;

        if verifier.public_key_kind(SELF_TEST_SPKI) != Ok(KeyKind::Ec(NamedGroup::Secp256r1)) {
            return Err(Error::Config(
                "Signature verifier misclassified the P-256 self-test key".to_string(),
            ));
        }

        verifier
            .verify_signature(
                SELF_TEST_SPKI,
                SELF_TEST_MESSAGE,
                &sig,
                scheme.hash_algorithm(),
                scheme.signature_algorithm(),
            )
            .map_err(|e| Error::Config(format!("Verification self-test failed: {e}")))?;

        let tampered = verifier.verify_signature(
            SELF_TEST_SPKI,
            b"certbridge provider self-test!",
            &sig,
            scheme.hash_algorithm(),
            scheme.signature_algorithm(),
        );
        if tampered.is_ok() {
            return Err(Error::Config(
                "Signature verifier accepted a tampered message".to_string(),
            ));
        }

        Ok(())
    }
}
