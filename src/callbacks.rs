use crate::chain::CertificateBlob;
use crate::store::{CertificateStore, ChainHandle};
use crate::types::SignatureScheme;
use crate::Error;

/// The certificate hooks a handshake engine calls into.
///
/// An engine keeps one of these per configuration, typically as
/// `Arc<dyn CertificateCallbacks>`, and calls it from any connection.
pub trait CertificateCallbacks: Send + Sync {
    /// Pick a chain and signature scheme for a client hello.
    fn select(
        &self,
        server_name: &[u8],
        alpn: &[u8],
        acceptable: &[SignatureScheme],
    ) -> Result<Option<(ChainHandle<'_>, SignatureScheme)>, Error>;

    /// Serialize a selected chain, leaf first.
    fn format(&self, chain: &ChainHandle<'_>) -> Vec<CertificateBlob>;

    /// Sign a transcript with a selected chain's key.
    fn sign(
        &self,
        chain: &ChainHandle<'_>,
        scheme: SignatureScheme,
        transcript: &[u8],
    ) -> Result<Option<Vec<u8>>, Error>;

    /// Verify a peer chain and its signature over a transcript.
    fn verify(
        &self,
        certs: &[CertificateBlob],
        scheme: SignatureScheme,
        transcript: &[u8],
        signature: &[u8],
    ) -> Result<bool, Error>;
}

impl CertificateCallbacks for CertificateStore {
    fn select(
        &self,
        server_name: &[u8],
        alpn: &[u8],
        acceptable: &[SignatureScheme],
    ) -> Result<Option<(ChainHandle<'_>, SignatureScheme)>, Error> {
        CertificateStore::select(self, server_name, alpn, acceptable)
    }

    fn format(&self, chain: &ChainHandle<'_>) -> Vec<CertificateBlob> {
        CertificateStore::format(self, chain)
    }

    fn sign(
        &self,
        chain: &ChainHandle<'_>,
        scheme: SignatureScheme,
        transcript: &[u8],
    ) -> Result<Option<Vec<u8>>, Error> {
        CertificateStore::sign(self, chain, scheme, transcript)
    }

    fn verify(
        &self,
        certs: &[CertificateBlob],
        scheme: SignatureScheme,
        transcript: &[u8],
        signature: &[u8],
    ) -> Result<bool, Error> {
        CertificateStore::verify(self, certs, scheme, transcript, signature)
    }
}
