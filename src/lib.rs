//! certbridge
//!
//! Certificate provider for a TLS handshake engine. The engine owns the
//! protocol; this crate owns the certificates and keys, and answers the four
//! questions the engine asks during a handshake:
//!
//! - **select**: which chain and signature scheme fit this client hello?
//! - **format**: what are the chain's certificates, in wire order?
//! - **sign**: sign this transcript with the chain's private key.
//! - **verify**: does this peer chain's leaf key verify this signature?
//!
//! # Loading a store
//!
//! A [`CertificateStore`] is built once from a [`Config`] and shared between
//! connections. Entries are scanned in the order they are added. A universal
//! entry is used when no entry is issued for the requested server name.
//!
//! ```no_run
//! use certbridge::{CertificateStore, Config, SignatureScheme};
//!
//! let config = Config::builder()
//!     .add_entry("ecdsa.pem", "ecdsa.key", true)
//!     .add_entry("rsa.pem", "rsa.key", false)
//!     .root_ca("/etc/ssl/certs")
//!     .build()
//!     .unwrap();
//!
//! let store = CertificateStore::new(config).unwrap();
//!
//! let acceptable = [
//!     SignatureScheme::ECDSA_SECP256R1_SHA256,
//!     SignatureScheme::RSA_PSS_RSAE_SHA256,
//! ];
//!
//! if let Some((chain, scheme)) = store.select(b"www.example.com", b"h2", &acceptable).unwrap() {
//!     let certs = store.format(&chain);
//!     let signature = store.sign(&chain, scheme, b"transcript hash").unwrap();
//!     assert_eq!(certs.len(), chain.len());
//!     assert!(signature.is_some());
//! }
//! ```
//!
//! # Results
//!
//! Handshake operations separate outcomes the engine is expected to handle
//! from faults:
//!
//! - `Ok(None)` / `Ok(false)`: no chain matched, the peer chain did not
//!   parse, the key could not sign, the signature did not verify.
//! - `Err(`[`Error::UnsupportedScheme`]`)`: a scheme without a backend code
//!   reached signing or verification.
//!
//! Peer chains that fail trust validation are logged and, under the default
//! [`ChainValidationPolicy::WarnOnly`], still checked for the signature. Use
//! [`ChainValidationPolicy::Enforce`] to reject them.
//!
//! # Crypto providers
//!
//! Key loading, signing and verification go through a [`CryptoProvider`].
//! The default is [`crypto::rust_crypto::default_provider()`], built on the
//! RustCrypto crates. See [`crypto::provider`] for plugging in another.
//!
//! [`CryptoProvider`]: crypto::CryptoProvider

#![forbid(unsafe_code)]
#![warn(clippy::all)]
// #![deny(missing_docs)]

#[macro_use]
extern crate log;

mod buffer;

mod callbacks;
pub use callbacks::CertificateCallbacks;

mod chain;
pub use chain::{CertificateBlob, ParsedChain};

mod config;
pub use config::{
    ChainValidationPolicy, Config, ConfigBuilder, StoreEntryConfig, UnsupportedSchemePolicy,
};

pub mod crypto;

mod error;
pub use error::Error;

pub mod registry;

mod store;
pub use store::{CertificateStore, ChainHandle};

mod types;
pub use types::{HashAlgorithm, NamedGroup, SignatureAlgorithm, SignatureScheme};

pub mod wire;
