//! Cryptographic provider seam used by the certificate store.

pub mod provider;
pub mod rust_crypto;
mod validation;

// Re-export all provider traits and types
// This allows users to do: use certbridge::crypto::{CryptoProvider, SigningKey, ...};
pub use provider::{CryptoProvider, CryptoSafe, KeyKind};
pub use provider::{KeyProvider, SignatureVerifier, SigningKey};

// Re-export shared types for provider trait implementations
pub use crate::buffer::Buf;
pub use crate::registry::BackendScheme;
pub use crate::types::{HashAlgorithm, NamedGroup, SignatureAlgorithm, SignatureScheme};
