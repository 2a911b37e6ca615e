use super::{CertificateStore, ChainHandle, StoreEntry};
use crate::config::UnsupportedSchemePolicy;
use crate::registry::{self, BackendScheme};
use crate::types::SignatureScheme;
use crate::Error;

impl StoreEntry {
    fn can_sign(&self, scheme: BackendScheme) -> bool {
        self.key.supports(scheme)
    }

    fn matches_name(&self, host: &str) -> bool {
        self.names.iter().any(|name| name_matches(name, host))
    }
}

/// Match a lowercased certificate name against a lowercased host.
///
/// `*.example.com` matches `a.example.com` but not `example.com` or
/// `a.b.example.com`.
fn name_matches(name: &str, host: &str) -> bool {
    match name.strip_prefix("*.") {
        Some(suffix) => match host.split_once('.') {
            Some((label, rest)) => !label.is_empty() && rest == suffix,
            None => false,
        },
        None => name == host,
    }
}

impl CertificateStore {
    /// Pick a chain and signature scheme for a client hello.
    ///
    /// `acceptable` is scanned in order and the first scheme any entry can
    /// sign with wins. For each scheme, entries issued for `server_name` are
    /// preferred over universal ones; within each group, configuration order
    /// decides. `alpn` does not affect the choice.
    ///
    /// Returns `Ok(None)` when nothing qualifies. Unsupported schemes are
    /// skipped, or fail selection under [`UnsupportedSchemePolicy::Reject`].
    pub fn select(
        &self,
        server_name: &[u8],
        alpn: &[u8],
        acceptable: &[SignatureScheme],
    ) -> Result<Option<(ChainHandle<'_>, SignatureScheme)>, Error> {
        trace!(
            "Select chain, server name: {:?}, alpn: {:?}, schemes: {:?}",
            String::from_utf8_lossy(server_name),
            String::from_utf8_lossy(alpn),
            acceptable
        );

        // Non-UTF-8 names only reach universal entries
        let host = std::str::from_utf8(server_name)
            .ok()
            .map(|h| h.trim_end_matches('.').to_ascii_lowercase())
            .filter(|h| !h.is_empty());

        for &scheme in acceptable {
            let backend = match registry::backend_of(scheme) {
                Ok(v) => v,
                Err(e) => match self.config.unsupported_scheme() {
                    UnsupportedSchemePolicy::Skip => {
                        debug!("Skip unsupported scheme {}", scheme);
                        continue;
                    }
                    UnsupportedSchemePolicy::Reject => return Err(e),
                },
            };

            let capable = || {
                self.entries
                    .iter()
                    .enumerate()
                    .filter(move |(_, e)| e.can_sign(backend))
            };

            let named = host
                .as_deref()
                .and_then(|host| capable().find(|(_, e)| e.matches_name(host)));

            if let Some((index, entry)) = named.or_else(|| capable().find(|(_, e)| e.universal)) {
                trace!("Selected entry {} with {}", index, scheme);
                return Ok(Some((ChainHandle { index, entry }, scheme)));
            }
        }

        debug!(
            "No chain for server name {:?} and schemes {:?}",
            String::from_utf8_lossy(server_name),
            acceptable
        );
        Ok(None)
    }
}
