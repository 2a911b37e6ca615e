use super::{CertificateStore, ChainHandle};
use crate::buffer::Buf;
use crate::registry;
use crate::types::SignatureScheme;
use crate::Error;

impl CertificateStore {
    /// Sign `transcript` with the chain's private key.
    ///
    /// Returns `Ok(None)` if the key cannot produce `scheme`, the backend
    /// fails, or the signature exceeds the configured maximum length.
    /// A scheme with no backend code is an [`Error::UnsupportedScheme`].
    pub fn sign(
        &self,
        chain: &ChainHandle<'_>,
        scheme: SignatureScheme,
        transcript: &[u8],
    ) -> Result<Option<Vec<u8>>, Error> {
        let backend = registry::backend_of(scheme)?;
        let key = &chain.entry.key;

        if !key.supports(backend) {
            debug!("Entry {} ({:?}) cannot sign {}", chain.index, key.kind(), scheme);
            return Ok(None);
        }

        let max_len = self.config.max_signature_len();
        let mut signature = Buf::with_capacity(max_len.min(1024));

        if let Err(e) = key.sign(backend, transcript, &mut signature) {
            debug!("Signing with entry {} failed: {}", chain.index, e);
            return Ok(None);
        }

        if signature.len() > max_len {
            warn!(
                "Signature of {} bytes exceeds maximum of {}",
                signature.len(),
                max_len
            );
            return Ok(None);
        }

        trace!(
            "Signed {} bytes with entry {} using {}: {} byte signature",
            transcript.len(),
            chain.index,
            scheme,
            signature.len()
        );

        Ok(Some(signature.into_vec()))
    }
}
