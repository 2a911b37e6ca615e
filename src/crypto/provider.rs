//! Cryptographic provider traits for the certificate backend.
//!
//! The store never touches a cryptographic primitive directly. Loading a
//! private key, signing a transcript and checking a signature against a
//! public key all go through the traits in this module, bundled in a
//! [`CryptoProvider`].
//!
//! # Overview
//!
//! - **Key Provider** ([`KeyProvider`]): parse a private key file into a [`SigningKey`]
//! - **Signing Key** ([`SigningKey`]): sign data for a backend scheme, report capabilities
//! - **Signature Verification** ([`SignatureVerifier`]): verify a signature against a
//!   DER encoded `SubjectPublicKeyInfo`
//!
//! # Using a Custom Provider
//!
//! ```
//! use certbridge::crypto::{rust_crypto, CryptoProvider};
//!
//! let provider = rust_crypto::default_provider();
//!
//! // Swap one component, keep the rest.
//! let custom = CryptoProvider {
//!     key_provider: provider.key_provider,
//!     signature_verification: provider.signature_verification,
//! };
//! # let _ = custom;
//! ```
//!
//! # Thread Safety
//!
//! The store is shared between connections, so all provider traits require
//! `Send + Sync + UnwindSafe + RefUnwindSafe`. Signing takes `&self`.

use std::fmt::Debug;
use std::panic::{RefUnwindSafe, UnwindSafe};
use std::sync::OnceLock;

use crate::buffer::Buf;
use crate::registry::BackendScheme;
use crate::types::{HashAlgorithm, NamedGroup, SignatureAlgorithm};

// ============================================================================
// Marker Trait
// ============================================================================

/// Marker trait for types that are safe to use in crypto provider components.
///
/// This trait is automatically implemented for all types that satisfy the bounds.
pub trait CryptoSafe: Send + Sync + Debug + UnwindSafe + RefUnwindSafe {}

impl<T: Send + Sync + Debug + UnwindSafe + RefUnwindSafe> CryptoSafe for T {}

// ============================================================================
// Instance Traits
// ============================================================================

/// The kind of key held by a [`SigningKey`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    /// RSA key (rsaEncryption).
    Rsa,
    /// EC key on the given curve.
    Ec(NamedGroup),
}

/// Private key loaded from a store entry.
pub trait SigningKey: CryptoSafe {
    /// Sign `data` with `scheme`, replacing the contents of `out`.
    fn sign(&self, scheme: BackendScheme, data: &[u8], out: &mut Buf) -> Result<(), String>;

    /// Whether this key can produce signatures for `scheme`.
    fn supports(&self, scheme: BackendScheme) -> bool;

    /// Key type.
    fn kind(&self) -> KeyKind;

    /// Whether the DER encoded `SubjectPublicKeyInfo` is this key's public half.
    fn matches_public_key(&self, spki_der: &[u8]) -> bool;
}

// ============================================================================
// Factory Traits (used by CryptoProvider)
// ============================================================================

/// Signature verification against a public key.
pub trait SignatureVerifier: CryptoSafe {
    /// Verify `signature` over `data` with the DER encoded `SubjectPublicKeyInfo`.
    ///
    /// ECDSA is not curve-bound here; callers that need curve binding check
    /// [`SignatureVerifier::public_key_kind`] first.
    fn verify_signature(
        &self,
        spki_der: &[u8],
        data: &[u8],
        signature: &[u8],
        hash_alg: HashAlgorithm,
        sig_alg: SignatureAlgorithm,
    ) -> Result<(), String>;

    /// Classify a DER encoded `SubjectPublicKeyInfo`.
    fn public_key_kind(&self, spki_der: &[u8]) -> Result<KeyKind, String>;
}

/// Private key parser (factory for SigningKey).
pub trait KeyProvider: CryptoSafe {
    /// Parse and load a private key from DER/PEM bytes.
    fn load_private_key(&self, key_der: &[u8]) -> Result<Box<dyn SigningKey>, String>;
}

// ============================================================================
// Core Provider Struct
// ============================================================================

/// Cryptographic provider for the certificate store.
///
/// Uses static trait object references, so a provider is cheap to copy into
/// every [`Config`](crate::Config).
#[derive(Debug, Clone)]
pub struct CryptoProvider {
    /// Key provider for parsing private keys.
    pub key_provider: &'static dyn KeyProvider,

    /// Signature verification for peer chains and certificate signatures.
    pub signature_verification: &'static dyn SignatureVerifier,
}

/// Static storage for the default crypto provider.
static DEFAULT: OnceLock<CryptoProvider> = OnceLock::new();

impl CryptoProvider {
    /// Install a default crypto provider for the process.
    ///
    /// Used by [`Config::builder()`](crate::Config::builder) when no explicit
    /// provider is set. Returns the rejected provider if a default is
    /// already installed.
    pub fn install_default(provider: CryptoProvider) -> Result<(), CryptoProvider> {
        DEFAULT.set(provider)
    }

    /// Get the default crypto provider, if one has been installed.
    pub fn get_default() -> Option<&'static CryptoProvider> {
        DEFAULT.get()
    }
}
