//! The certificate store and the handshake operations on it.
//!
//! A [`CertificateStore`] is built once from a [`Config`], shared between
//! connections and dropped once. Selection hands out [`ChainHandle`]s that
//! borrow the store, so a handle can never outlive the material it points at.

use std::fmt;
use std::fs;
use std::path::PathBuf;

use zeroize::Zeroizing;

use crate::chain::{load_certificates, CertificateBlob, ParsedCertificate, TrustAnchors};
use crate::config::StoreEntryConfig;
use crate::crypto::{CryptoProvider, SigningKey};
use crate::{Config, Error};

mod format;
mod select;
mod sign;
mod verify;

/// A loaded certificate chain and its private key.
pub(crate) struct StoreEntry {
    chain: Vec<CertificateBlob>,
    key: Box<dyn SigningKey>,
    names: Vec<String>,
    universal: bool,
    cert_path: PathBuf,
}

impl StoreEntry {
    fn load(config: &StoreEntryConfig, provider: &CryptoProvider) -> Result<Self, Error> {
        let chain = load_certificates(&config.cert_file)?;

        let leaf = ParsedCertificate::parse(chain[0].clone()).map_err(|e| {
            Error::Certificate(format!("{}: {e}", config.cert_file.display()))
        })?;

        let key_bytes = Zeroizing::new(
            fs::read(&config.key_file).map_err(|e| Error::io(&config.key_file, e))?,
        );

        let key = provider
            .key_provider
            .load_private_key(&key_bytes)
            .map_err(|e| Error::Key(format!("{}: {e}", config.key_file.display())))?;

        if !key.matches_public_key(leaf.spki()) {
            return Err(Error::KeyMismatch(config.cert_file.clone()));
        }

        let names = leaf
            .dns_names()
            .into_iter()
            .map(|n| n.to_ascii_lowercase())
            .collect();

        Ok(StoreEntry {
            chain,
            key,
            names,
            universal: config.universal,
            cert_path: config.cert_file.clone(),
        })
    }
}

impl fmt::Debug for StoreEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreEntry")
            .field("cert_path", &self.cert_path)
            .field("chain_len", &self.chain.len())
            .field("key", &self.key.kind())
            .field("names", &self.names)
            .field("universal", &self.universal)
            .finish()
    }
}

/// Handle to a chain held by a [`CertificateStore`].
///
/// Returned by selection. Valid for as long as the store is borrowed.
#[derive(Clone, Copy)]
pub struct ChainHandle<'s> {
    index: usize,
    entry: &'s StoreEntry,
}

impl<'s> ChainHandle<'s> {
    /// Position of the entry in the configuration.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of certificates in the chain.
    pub fn len(&self) -> usize {
        self.entry.chain.len()
    }

    /// A loaded chain always holds at least the leaf.
    pub fn is_empty(&self) -> bool {
        self.entry.chain.is_empty()
    }

    /// Whether the entry is usable regardless of server name.
    pub fn is_universal(&self) -> bool {
        self.entry.universal
    }

    /// The end-entity certificate.
    pub fn leaf(&self) -> &'s CertificateBlob {
        &self.entry.chain[0]
    }

    /// DNS names the leaf is issued for, lowercased.
    pub fn names(&self) -> &'s [String] {
        &self.entry.names
    }
}

impl fmt::Debug for ChainHandle<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainHandle")
            .field("index", &self.index)
            .field("cert_path", &self.entry.cert_path)
            .finish()
    }
}

/// Certificate chains, private keys and trust anchors.
///
/// Immutable once built and safe to share between threads. Dropping the
/// store releases everything it loaded.
pub struct CertificateStore {
    entries: Vec<StoreEntry>,
    anchors: TrustAnchors,
    config: Config,
}

impl CertificateStore {
    /// Load every configured entry and the trust anchors.
    ///
    /// The first failure aborts the load; nothing is retried.
    pub fn new(config: Config) -> Result<Self, Error> {
        let provider = config.crypto_provider();

        let mut entries = Vec::with_capacity(config.entries().len());
        for entry_config in config.entries() {
            let entry = StoreEntry::load(entry_config, provider)?;
            debug!(
                "Loaded entry {}: {} ({} certificates, {:?}, names {:?}, universal: {})",
                entries.len(),
                entry.cert_path.display(),
                entry.chain.len(),
                entry.key.kind(),
                entry.names,
                entry.universal
            );
            entries.push(entry);
        }

        let anchors = match config.root_ca() {
            Some(path) => TrustAnchors::load(path)?,
            None => TrustAnchors::default(),
        };

        Ok(CertificateStore {
            entries,
            anchors,
            config,
        })
    }

    /// Release the store.
    ///
    /// Equivalent to dropping it.
    pub fn teardown(self) {
        drop(self)
    }

    /// The configuration the store was built from.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Number of loaded entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Never true for a successfully built store.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Handle to the entry at `index`, in configuration order.
    pub fn chain(&self, index: usize) -> Option<ChainHandle<'_>> {
        self.entries
            .get(index)
            .map(|entry| ChainHandle { index, entry })
    }

    /// Number of trust anchors.
    pub fn trust_anchor_count(&self) -> usize {
        self.anchors.len()
    }
}

impl fmt::Debug for CertificateStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CertificateStore")
            .field("entries", &self.entries)
            .field("trust_anchors", &self.anchors.len())
            .finish()
    }
}

impl Drop for CertificateStore {
    fn drop(&mut self) {
        debug!(
            "Release certificate store: {} entries, {} trust anchors",
            self.entries.len(),
            self.anchors.len()
        );
    }
}
