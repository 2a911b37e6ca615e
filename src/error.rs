use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the certificate bridge.
///
/// Expected negative outcomes of the handshake callbacks (no chain matches,
/// a peer chain fails to parse, a signature does not verify) are not errors;
/// they are reported as `None`/`false`. This enum covers configuration and
/// programming faults the caller must treat as fatal.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Bad certificate: {0}")]
    Certificate(String),

    #[error("Bad private key: {0}")]
    Key(String),

    #[error("Private key does not match certificate {}", .0.display())]
    KeyMismatch(PathBuf),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unsupported signature scheme {0:#06x}")]
    UnsupportedScheme(u16),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Untrusted certificate chain: {0}")]
    Untrusted(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
