use super::{CertificateStore, ChainHandle};
use crate::chain::CertificateBlob;

impl CertificateStore {
    /// The chain's certificates as DER, leaf first.
    ///
    /// Each blob is an independent copy of the stored certificate.
    pub fn format(&self, chain: &ChainHandle<'_>) -> Vec<CertificateBlob> {
        let certs = chain.entry.chain.clone();
        trace!(
            "Format entry {}: {:?} bytes",
            chain.index,
            certs.iter().map(|c| c.len()).collect::<Vec<_>>()
        );
        certs
    }
}
