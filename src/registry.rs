//! Translation between handshake-engine signature schemes and backend
//! signature-algorithm codes.
//!
//! The two maps are hand-maintained and total over exactly the supported set.
//! Anything outside that set (EdDSA, RSA-PSS with PSS keys, unknown codes) is
//! reported as [`Error::UnsupportedScheme`] rather than guessed at.

use crate::types::{HashAlgorithm, NamedGroup, SignatureAlgorithm, SignatureScheme};
use crate::Error;

/// Signature algorithm identifier understood by the crypto backend.
///
/// The numeric value of each variant is the backend code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum BackendScheme {
    RsaPkcs1Sha1 = 0x0201,
    RsaPkcs1Sha256 = 0x0401,
    RsaPkcs1Sha384 = 0x0501,
    RsaPkcs1Sha512 = 0x0601,
    RsaPssSha256 = 0x0804,
    RsaPssSha384 = 0x0805,
    RsaPssSha512 = 0x0806,
    EcdsaSha1 = 0x0203,
    EcdsaSecp256r1Sha256 = 0x0403,
    EcdsaSecp384r1Sha384 = 0x0503,
    EcdsaSecp521r1Sha512 = 0x0603,
}

impl BackendScheme {
    /// Every backend scheme, in registry order.
    pub const ALL: [BackendScheme; 11] = [
        BackendScheme::RsaPkcs1Sha1,
        BackendScheme::RsaPkcs1Sha256,
        BackendScheme::RsaPkcs1Sha384,
        BackendScheme::RsaPkcs1Sha512,
        BackendScheme::RsaPssSha256,
        BackendScheme::RsaPssSha384,
        BackendScheme::RsaPssSha512,
        BackendScheme::EcdsaSha1,
        BackendScheme::EcdsaSecp256r1Sha256,
        BackendScheme::EcdsaSecp384r1Sha384,
        BackendScheme::EcdsaSecp521r1Sha512,
    ];

    /// Look up a backend code.
    pub fn from_code(code: u16) -> Result<Self, Error> {
        Self::ALL
            .iter()
            .copied()
            .find(|s| s.code() == code)
            .ok_or(Error::UnsupportedScheme(code))
    }

    /// The backend code.
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Hash algorithm applied to the signed data.
    pub fn hash_algorithm(&self) -> HashAlgorithm {
        match self {
            BackendScheme::RsaPkcs1Sha1 | BackendScheme::EcdsaSha1 => HashAlgorithm::SHA1,
            BackendScheme::RsaPkcs1Sha256
            | BackendScheme::RsaPssSha256
            | BackendScheme::EcdsaSecp256r1Sha256 => HashAlgorithm::SHA256,
            BackendScheme::RsaPkcs1Sha384
            | BackendScheme::RsaPssSha384
            | BackendScheme::EcdsaSecp384r1Sha384 => HashAlgorithm::SHA384,
            BackendScheme::RsaPkcs1Sha512
            | BackendScheme::RsaPssSha512
            | BackendScheme::EcdsaSecp521r1Sha512 => HashAlgorithm::SHA512,
        }
    }

    /// Signature primitive and padding.
    pub fn signature_algorithm(&self) -> SignatureAlgorithm {
        match self {
            BackendScheme::RsaPkcs1Sha1
            | BackendScheme::RsaPkcs1Sha256
            | BackendScheme::RsaPkcs1Sha384
            | BackendScheme::RsaPkcs1Sha512 => SignatureAlgorithm::RSA_PKCS1,
            BackendScheme::RsaPssSha256
            | BackendScheme::RsaPssSha384
            | BackendScheme::RsaPssSha512 => SignatureAlgorithm::RSA_PSS,
            BackendScheme::EcdsaSha1
            | BackendScheme::EcdsaSecp256r1Sha256
            | BackendScheme::EcdsaSecp384r1Sha384
            | BackendScheme::EcdsaSecp521r1Sha512 => SignatureAlgorithm::ECDSA,
        }
    }

    /// The curve a key must be on, for curve-bound ECDSA schemes.
    ///
    /// `EcdsaSha1` predates curve binding and accepts any curve.
    pub fn required_group(&self) -> Option<NamedGroup> {
        match self {
            BackendScheme::EcdsaSecp256r1Sha256 => Some(NamedGroup::Secp256r1),
            BackendScheme::EcdsaSecp384r1Sha384 => Some(NamedGroup::Secp384r1),
            BackendScheme::EcdsaSecp521r1Sha512 => Some(NamedGroup::Secp521r1),
            _ => None,
        }
    }

    /// The handshake-engine tag for this backend scheme.
    pub fn scheme(&self) -> SignatureScheme {
        match self {
            BackendScheme::RsaPkcs1Sha1 => SignatureScheme::RSA_PKCS1_SHA1,
            BackendScheme::RsaPkcs1Sha256 => SignatureScheme::RSA_PKCS1_SHA256,
            BackendScheme::RsaPkcs1Sha384 => SignatureScheme::RSA_PKCS1_SHA384,
            BackendScheme::RsaPkcs1Sha512 => SignatureScheme::RSA_PKCS1_SHA512,
            BackendScheme::RsaPssSha256 => SignatureScheme::RSA_PSS_RSAE_SHA256,
            BackendScheme::RsaPssSha384 => SignatureScheme::RSA_PSS_RSAE_SHA384,
            BackendScheme::RsaPssSha512 => SignatureScheme::RSA_PSS_RSAE_SHA512,
            BackendScheme::EcdsaSha1 => SignatureScheme::ECDSA_SHA1,
            BackendScheme::EcdsaSecp256r1Sha256 => SignatureScheme::ECDSA_SECP256R1_SHA256,
            BackendScheme::EcdsaSecp384r1Sha384 => SignatureScheme::ECDSA_SECP384R1_SHA384,
            BackendScheme::EcdsaSecp521r1Sha512 => SignatureScheme::ECDSA_SECP521R1_SHA512,
        }
    }
}

/// Translate a handshake-engine scheme into the backend code.
pub fn backend_of(scheme: SignatureScheme) -> Result<BackendScheme, Error> {
    let backend = match scheme {
        SignatureScheme::RSA_PKCS1_SHA1 => BackendScheme::RsaPkcs1Sha1,
        SignatureScheme::RSA_PKCS1_SHA256 => BackendScheme::RsaPkcs1Sha256,
        SignatureScheme::RSA_PKCS1_SHA384 => BackendScheme::RsaPkcs1Sha384,
        SignatureScheme::RSA_PKCS1_SHA512 => BackendScheme::RsaPkcs1Sha512,
        SignatureScheme::RSA_PSS_RSAE_SHA256 => BackendScheme::RsaPssSha256,
        SignatureScheme::RSA_PSS_RSAE_SHA384 => BackendScheme::RsaPssSha384,
        SignatureScheme::RSA_PSS_RSAE_SHA512 => BackendScheme::RsaPssSha512,
        SignatureScheme::ECDSA_SHA1 => BackendScheme::EcdsaSha1,
        SignatureScheme::ECDSA_SECP256R1_SHA256 => BackendScheme::EcdsaSecp256r1Sha256,
        SignatureScheme::ECDSA_SECP384R1_SHA384 => BackendScheme::EcdsaSecp384r1Sha384,
        SignatureScheme::ECDSA_SECP521R1_SHA512 => BackendScheme::EcdsaSecp521r1Sha512,
        SignatureScheme::RSA_PSS_PSS_SHA256
        | SignatureScheme::RSA_PSS_PSS_SHA384
        | SignatureScheme::RSA_PSS_PSS_SHA512
        | SignatureScheme::ED25519
        | SignatureScheme::ED448
        | SignatureScheme::Unknown(_) => return Err(Error::UnsupportedScheme(scheme.as_u16())),
    };
    Ok(backend)
}

/// Translate a backend code into the handshake-engine scheme.
pub fn scheme_of(code: u16) -> Result<SignatureScheme, Error> {
    BackendScheme::from_code(code).map(|b| b.scheme())
}

/// True if the scheme has a backend counterpart.
pub fn is_supported(scheme: SignatureScheme) -> bool {
    backend_of(scheme).is_ok()
}

/// All supported handshake-engine schemes, in registry order.
pub fn supported() -> impl Iterator<Item = SignatureScheme> {
    BackendScheme::ALL.into_iter().map(|b| b.scheme())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_every_supported_scheme() {
        for scheme in supported() {
            let backend = backend_of(scheme).unwrap();
            assert_eq!(scheme_of(backend.code()).unwrap(), scheme);
            // Backend codes share the TLS wire numbering.
            assert_eq!(backend.code(), scheme.as_u16());
        }
        assert_eq!(supported().count(), 11);
    }

    #[test]
    fn eddsa_is_unsupported() {
        for scheme in [SignatureScheme::ED25519, SignatureScheme::ED448] {
            match backend_of(scheme) {
                Err(Error::UnsupportedScheme(code)) => assert_eq!(code, scheme.as_u16()),
                other => panic!("expected unsupported, got {:?}", other),
            }
        }
        assert!(matches!(scheme_of(0x0807), Err(Error::UnsupportedScheme(0x0807))));
        assert!(matches!(scheme_of(0x0808), Err(Error::UnsupportedScheme(0x0808))));
    }

    #[test]
    fn pss_keys_and_unknown_are_unsupported() {
        assert!(!is_supported(SignatureScheme::RSA_PSS_PSS_SHA256));
        assert!(!is_supported(SignatureScheme::Unknown(0xfefe)));
        assert!(matches!(scheme_of(0x0000), Err(Error::UnsupportedScheme(0))));
    }

    #[test]
    fn curve_binding() {
        assert_eq!(
            BackendScheme::EcdsaSecp384r1Sha384.required_group(),
            Some(NamedGroup::Secp384r1)
        );
        assert_eq!(BackendScheme::EcdsaSha1.required_group(), None);
        assert_eq!(BackendScheme::RsaPssSha256.required_group(), None);
    }

    #[test]
    fn hash_and_algorithm() {
        let b = BackendScheme::RsaPssSha384;
        assert_eq!(b.hash_algorithm(), HashAlgorithm::SHA384);
        assert_eq!(b.signature_algorithm(), SignatureAlgorithm::RSA_PSS);
        let b = BackendScheme::EcdsaSha1;
        assert_eq!(b.hash_algorithm(), HashAlgorithm::SHA1);
        assert_eq!(b.signature_algorithm(), SignatureAlgorithm::ECDSA);
    }
}
