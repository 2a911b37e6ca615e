use super::CertificateStore;
use crate::chain::{CertificateBlob, ParsedChain};
use crate::config::ChainValidationPolicy;
use crate::crypto::KeyKind;
use crate::registry;
use crate::types::SignatureScheme;
use crate::Error;

impl CertificateStore {
    /// Parse a peer chain, leaf first.
    ///
    /// Fails with [`Error::Parse`] for an empty sequence, malformed DER, or
    /// more certificates than the configured maximum depth.
    pub fn parse_chain(&self, certs: &[CertificateBlob]) -> Result<ParsedChain, Error> {
        ParsedChain::parse(certs, self.config.max_chain_depth())
    }

    /// Validate a parsed chain against the trust anchors.
    ///
    /// Checks validity periods, issuer linkage, issuer CA constraints and
    /// certificate signatures up to an anchor. The server name is not checked.
    pub fn validate_chain(&self, chain: &ParsedChain) -> Result<(), Error> {
        self.anchors
            .validate(chain, self.config.crypto_provider().signature_verification)
    }

    /// Verify a peer's signature over `transcript` with the leaf of `certs`.
    ///
    /// A chain that fails to parse, or a signature that does not verify,
    /// gives `Ok(false)`. A chain that fails trust validation is logged and
    /// otherwise ignored, unless the policy is
    /// [`ChainValidationPolicy::Enforce`].
    pub fn verify(
        &self,
        certs: &[CertificateBlob],
        scheme: SignatureScheme,
        transcript: &[u8],
        signature: &[u8],
    ) -> Result<bool, Error> {
        let chain = match self.parse_chain(certs) {
            Ok(v) => v,
            Err(e) => {
                debug!("Failed to parse peer chain: {}", e);
                return Ok(false);
            }
        };

        if let Err(e) = self.validate_chain(&chain) {
            warn!("Peer chain failed validation: {}", e);
            if self.config.chain_validation() == ChainValidationPolicy::Enforce {
                return Ok(false);
            }
        }

        let backend = registry::backend_of(scheme)?;
        let verifier = self.config.crypto_provider().signature_verification;
        let public_key = chain.leaf_public_key();

        if let Some(group) = backend.required_group() {
            match verifier.public_key_kind(public_key) {
                Ok(KeyKind::Ec(g)) if g == group => {}
                kind => {
                    debug!("Peer key {:?} does not fit {}", kind, scheme);
                    return Ok(false);
                }
            }
        }

        match verifier.verify_signature(
            public_key,
            transcript,
            signature,
            backend.hash_algorithm(),
            backend.signature_algorithm(),
        ) {
            Ok(()) => Ok(true),
            Err(e) => {
                debug!("Peer signature with {} did not verify: {}", scheme, e);
                Ok(false)
            }
        }
    }
}
