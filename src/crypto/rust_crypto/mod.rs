//! RustCrypto cryptographic provider implementation for certbridge.
//!
//! This module provides a pure Rust backend using crates from the
//! [RustCrypto](https://github.com/RustCrypto) organization.
//!
//! # Usage
//!
//! The rust-crypto provider is used automatically when no provider is set on
//! the [`ConfigBuilder`](crate::ConfigBuilder) and none has been installed as
//! the process default:
//!
//! ```no_run
//! use certbridge::Config;
//! use certbridge::crypto::rust_crypto;
//!
//! let config = Config::builder()
//!     .add_entry("server.pem", "server.key", true)
//!     .with_crypto_provider(rust_crypto::default_provider())
//!     .build()
//!     .unwrap();
//! # let _ = config;
//! ```

mod hash;
mod sign;

use crate::crypto::provider::CryptoProvider;

/// Get the default RustCrypto-based crypto provider.
///
/// # Supported Signature Algorithms
///
/// - RSA PKCS#1 v1.5 with SHA-1, SHA-256, SHA-384, SHA-512
/// - RSA-PSS (rsaEncryption keys) with SHA-256, SHA-384, SHA-512
/// - ECDSA with P-256 and SHA-256 (and legacy SHA-1)
/// - ECDSA with P-384 and SHA-384
///
/// # Key Formats
///
/// The key provider supports loading private keys in:
/// - PKCS#8 DER format (most common)
/// - SEC1 DER format (OpenSSL EC private key format)
/// - PKCS#1 DER format (OpenSSL traditional RSA format)
/// - PEM encoded versions of the above
///
/// P-521 keys are not supported for signing.
pub fn default_provider() -> CryptoProvider {
    CryptoProvider {
        key_provider: &sign::KEY_PROVIDER,
        signature_verification: &sign::SIGNATURE_VERIFIER,
    }
}
