//! Hash implementations using RustCrypto.

use sha1::Sha1;
use sha2::{Digest, Sha256, Sha384, Sha512};

use crate::types::HashAlgorithm;

/// One-shot digest of `data`, used as the prehash for ECDSA.
pub(super) fn digest(algorithm: HashAlgorithm, data: &[u8]) -> Box<[u8]> {
    match algorithm {
        HashAlgorithm::SHA1 => Box::from(Sha1::digest(data).as_slice()),
        HashAlgorithm::SHA256 => Box::from(Sha256::digest(data).as_slice()),
        HashAlgorithm::SHA384 => Box::from(Sha384::digest(data).as_slice()),
        HashAlgorithm::SHA512 => Box::from(Sha512::digest(data).as_slice()),
    }
}
