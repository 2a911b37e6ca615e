use std::path::{Path, PathBuf};

use crate::crypto::{rust_crypto, CryptoProvider};
use crate::Error;

/// What to do when a peer chain fails trust validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChainValidationPolicy {
    /// Log a warning and go on to check the signature.
    #[default]
    WarnOnly,
    /// Treat the chain as not verified.
    Enforce,
}

/// What selection does with a requested scheme the backend has no code for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnsupportedSchemePolicy {
    /// Skip the scheme and try the next one.
    #[default]
    Skip,
    /// Fail selection with [`Error::UnsupportedScheme`].
    Reject,
}

/// One certificate/key pair to load into the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreEntryConfig {
    /// Certificate file, DER or PEM. A PEM file may hold the full chain,
    /// leaf first.
    pub cert_file: PathBuf,
    /// Private key file, DER or PEM (PKCS#8, SEC1 or PKCS#1).
    pub key_file: PathBuf,
    /// Usable regardless of the requested server name.
    pub universal: bool,
}

/// Certificate store configuration
#[derive(Clone)]
pub struct Config {
    entries: Vec<StoreEntryConfig>,
    root_ca: Option<PathBuf>,
    max_signature_len: usize,
    max_chain_depth: usize,
    chain_validation: ChainValidationPolicy,
    unsupported_scheme: UnsupportedSchemePolicy,
    crypto_provider: CryptoProvider,
}

impl Config {
    /// Create a new configuration builder.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder {
            entries: Vec::new(),
            root_ca: None,
            max_signature_len: 8192,
            max_chain_depth: 16,
            chain_validation: ChainValidationPolicy::default(),
            unsupported_scheme: UnsupportedSchemePolicy::default(),
            crypto_provider: None,
        }
    }

    /// Configured entries, in selection scan order.
    #[inline(always)]
    pub fn entries(&self) -> &[StoreEntryConfig] {
        &self.entries
    }

    /// File or directory holding the trust anchors, if any.
    #[inline(always)]
    pub fn root_ca(&self) -> Option<&Path> {
        self.root_ca.as_deref()
    }

    /// Largest signature the signer hands back.
    #[inline(always)]
    pub fn max_signature_len(&self) -> usize {
        self.max_signature_len
    }

    /// Most certificates accepted in a peer chain.
    #[inline(always)]
    pub fn max_chain_depth(&self) -> usize {
        self.max_chain_depth
    }

    /// Policy for peer chains that fail trust validation.
    #[inline(always)]
    pub fn chain_validation(&self) -> ChainValidationPolicy {
        self.chain_validation
    }

    /// Policy for unsupported schemes in a selection list.
    #[inline(always)]
    pub fn unsupported_scheme(&self) -> UnsupportedSchemePolicy {
        self.unsupported_scheme
    }

    /// Cryptographic provider.
    ///
    /// Loads keys, signs and verifies.
    #[inline(always)]
    pub fn crypto_provider(&self) -> &CryptoProvider {
        &self.crypto_provider
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("entries", &self.entries)
            .field("root_ca", &self.root_ca)
            .field("max_signature_len", &self.max_signature_len)
            .field("max_chain_depth", &self.max_chain_depth)
            .field("chain_validation", &self.chain_validation)
            .field("unsupported_scheme", &self.unsupported_scheme)
            .finish_non_exhaustive()
    }
}

/// Builder for certificate store configuration.
pub struct ConfigBuilder {
    entries: Vec<StoreEntryConfig>,
    root_ca: Option<PathBuf>,
    max_signature_len: usize,
    max_chain_depth: usize,
    chain_validation: ChainValidationPolicy,
    unsupported_scheme: UnsupportedSchemePolicy,
    crypto_provider: Option<CryptoProvider>,
}

impl ConfigBuilder {
    /// Add a certificate/key pair.
    ///
    /// Entries are scanned in the order they are added. A universal entry
    /// is used when no entry matches the requested server name.
    pub fn add_entry(
        mut self,
        cert_file: impl Into<PathBuf>,
        key_file: impl Into<PathBuf>,
        universal: bool,
    ) -> Self {
        self.entries.push(StoreEntryConfig {
            cert_file: cert_file.into(),
            key_file: key_file.into(),
            universal,
        });
        self
    }

    /// Set the trust anchors used to validate peer chains.
    ///
    /// Either a certificate file (PEM bundle or DER) or a directory of
    /// `.pem`, `.crt`, `.cer` and `.der` files.
    pub fn root_ca(mut self, path: impl Into<PathBuf>) -> Self {
        self.root_ca = Some(path.into());
        self
    }

    /// Set the largest signature the signer hands back.
    ///
    /// Defaults to 8192 bytes.
    pub fn max_signature_len(mut self, len: usize) -> Self {
        self.max_signature_len = len;
        self
    }

    /// Set the most certificates accepted in a peer chain.
    ///
    /// Defaults to 16.
    pub fn max_chain_depth(mut self, depth: usize) -> Self {
        self.max_chain_depth = depth;
        self
    }

    /// Set the policy for peer chains that fail trust validation.
    ///
    /// Defaults to [`ChainValidationPolicy::WarnOnly`].
    pub fn chain_validation(mut self, policy: ChainValidationPolicy) -> Self {
        self.chain_validation = policy;
        self
    }

    /// Set the policy for unsupported schemes in a selection list.
    ///
    /// Defaults to [`UnsupportedSchemePolicy::Skip`].
    pub fn unsupported_scheme(mut self, policy: UnsupportedSchemePolicy) -> Self {
        self.unsupported_scheme = policy;
        self
    }

    /// Set a custom crypto provider.
    ///
    /// If not set, the installed default is used, then the RustCrypto provider.
    pub fn with_crypto_provider(mut self, provider: CryptoProvider) -> Self {
        self.crypto_provider = Some(provider);
        self
    }

    /// Build the configuration.
    ///
    /// This validates the crypto provider before returning the configuration.
    /// Returns `Error::Config` if no entries were added, a limit is zero,
    /// or the provider is invalid.
    ///
    /// The crypto provider is selected in the following priority order:
    /// 1. Explicit provider set via `with_crypto_provider()`
    /// 2. Default provider installed via `CryptoProvider::install_default()`
    /// 3. RustCrypto provider
    pub fn build(self) -> Result<Config, Error> {
        if self.entries.is_empty() {
            return Err(Error::Config("No certificate entries configured".into()));
        }
        if self.max_signature_len == 0 {
            return Err(Error::Config("max_signature_len must be non-zero".into()));
        }
        if self.max_chain_depth == 0 {
            return Err(Error::Config("max_chain_depth must be non-zero".into()));
        }

        let crypto_provider = self
            .crypto_provider
            .or_else(|| CryptoProvider::get_default().cloned())
            .unwrap_or_else(rust_crypto::default_provider);

        // Always validate the crypto provider
        crypto_provider.validate()?;

        Ok(Config {
            entries: self.entries,
            root_ca: self.root_ca,
            max_signature_len: self.max_signature_len,
            max_chain_depth: self.max_chain_depth,
            chain_validation: self.chain_validation,
            unsupported_scheme: self.unsupported_scheme,
            crypto_provider,
        })
    }
}
