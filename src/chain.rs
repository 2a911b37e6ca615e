//! Certificates, parsed peer chains and trust anchors.
//!
//! Two kinds of chain exist. A store chain is loaded from disk at init and
//! only ever lent out as a [`ChainHandle`](crate::ChainHandle). A
//! [`ParsedChain`] is built from peer-supplied bytes during verification,
//! is owned by the caller and is released when dropped.

use std::fmt;
use std::fs;
use std::ops::Deref;
use std::path::Path;

use der::oid::AssociatedOid;
use der::{Decode, Encode};
use spki::ObjectIdentifier;
use time::OffsetDateTime;
use x509_cert::ext::pkix::name::GeneralName;
use x509_cert::ext::pkix::{BasicConstraints, KeyUsage, SubjectAltName};
use x509_cert::Certificate;

use crate::crypto::SignatureVerifier;
use crate::types::{HashAlgorithm, SignatureAlgorithm};
use crate::Error;

const OID_COMMON_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.3");

const OID_SHA1_WITH_RSA: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.5");
const OID_SHA256_WITH_RSA: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.11");
const OID_SHA384_WITH_RSA: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.12");
const OID_SHA512_WITH_RSA: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.13");
const OID_ECDSA_WITH_SHA1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.4.1");
const OID_ECDSA_WITH_SHA256: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.10045.4.3.2");
const OID_ECDSA_WITH_SHA384: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.10045.4.3.3");
const OID_ECDSA_WITH_SHA512: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.10045.4.3.4");

/// File extensions picked up when the trust anchors are a directory.
const ANCHOR_EXTENSIONS: &[&str] = &["pem", "crt", "cer", "der"];

/// A single DER encoded certificate.
#[derive(Clone, PartialEq, Eq)]
pub struct CertificateBlob(Vec<u8>);

impl CertificateBlob {
    /// The DER bytes.
    pub fn as_der(&self) -> &[u8] {
        &self.0
    }

    /// Take the DER bytes.
    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for CertificateBlob {
    fn from(der: Vec<u8>) -> Self {
        CertificateBlob(der)
    }
}

impl From<&[u8]> for CertificateBlob {
    fn from(der: &[u8]) -> Self {
        CertificateBlob(der.to_vec())
    }
}

impl Deref for CertificateBlob {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<[u8]> for CertificateBlob {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for CertificateBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CertificateBlob")
            .field("len", &self.0.len())
            .finish()
    }
}

/// A decoded certificate together with the bytes it was decoded from.
pub(crate) struct ParsedCertificate {
    der: CertificateBlob,
    cert: Certificate,
    spki: Vec<u8>,
}

impl ParsedCertificate {
    pub(crate) fn parse(der: CertificateBlob) -> Result<Self, Error> {
        let cert = Certificate::from_der(&der)
            .map_err(|e| Error::Parse(format!("Malformed certificate: {e}")))?;
        let spki = cert
            .tbs_certificate
            .subject_public_key_info
            .to_der()
            .map_err(|e| Error::Parse(format!("Malformed public key: {e}")))?;
        Ok(ParsedCertificate { der, cert, spki })
    }

    /// DER encoded `SubjectPublicKeyInfo`.
    pub(crate) fn spki(&self) -> &[u8] {
        &self.spki
    }

    pub(crate) fn der(&self) -> &CertificateBlob {
        &self.der
    }

    /// DNS names from subjectAltName, or the subject CN if there is no SAN.
    pub(crate) fn dns_names(&self) -> Vec<String> {
        let tbs = &self.cert.tbs_certificate;

        if let Ok(Some(san)) = self.extension::<SubjectAltName>() {
            return san
                .0
                .iter()
                .filter_map(|name| match name {
                    GeneralName::DnsName(dns) => Some(dns.to_string()),
                    _ => None,
                })
                .collect();
        }

        tbs.subject
            .0
            .iter()
            .flat_map(|rdn| rdn.0.iter())
            .filter(|atv| atv.oid == OID_COMMON_NAME)
            .filter_map(|atv| std::str::from_utf8(atv.value.value()).ok())
            .map(str::to_string)
            .collect()
    }

    /// Decode the extension of type `T`, if present.
    fn extension<T>(&self) -> Result<Option<T>, der::Error>
    where
        T: AssociatedOid + for<'a> Decode<'a>,
    {
        self.cert
            .tbs_certificate
            .extensions
            .iter()
            .flatten()
            .find(|ext| ext.extn_id == T::OID)
            .map(|ext| T::from_der(ext.extn_value.as_bytes()))
            .transpose()
    }

    /// Check this certificate may issue a certificate with `below`
    /// intermediates between it and the leaf.
    fn check_can_issue(&self, below: usize) -> Result<(), Error> {
        let constraints = self
            .extension::<BasicConstraints>()
            .map_err(|e| Error::Untrusted(format!("Malformed basicConstraints: {e}")))?;

        let Some(constraints) = constraints.filter(|bc| bc.ca) else {
            return Err(Error::Untrusted("Issuer is not a CA".into()));
        };

        if let Some(max) = constraints.path_len_constraint {
            if below > max as usize {
                return Err(Error::Untrusted(format!(
                    "Issuer allows {max} intermediates, chain has {below}"
                )));
            }
        }

        let usage = self
            .extension::<KeyUsage>()
            .map_err(|e| Error::Untrusted(format!("Malformed keyUsage: {e}")))?;

        if usage.is_some_and(|ku| !ku.key_cert_sign()) {
            return Err(Error::Untrusted("Issuer key usage lacks keyCertSign".into()));
        }

        Ok(())
    }

    fn check_validity(&self, now: OffsetDateTime) -> Result<(), Error> {
        let validity = &self.cert.tbs_certificate.validity;
        let now = now.unix_timestamp();
        let not_before = validity.not_before.to_unix_duration().as_secs() as i64;
        let not_after = validity.not_after.to_unix_duration().as_secs() as i64;

        if now < not_before {
            return Err(Error::Untrusted(format!(
                "Certificate not valid before unix time {not_before}"
            )));
        }
        if now > not_after {
            return Err(Error::Untrusted(format!(
                "Certificate expired at unix time {not_after}"
            )));
        }
        Ok(())
    }

    fn is_issued_by(&self, issuer: &ParsedCertificate) -> bool {
        self.cert.tbs_certificate.issuer == issuer.cert.tbs_certificate.subject
    }

    /// Check this certificate's signature with the issuer's public key.
    fn check_signed_by(
        &self,
        issuer: &ParsedCertificate,
        verifier: &dyn SignatureVerifier,
    ) -> Result<(), Error> {
        let oid = self.cert.signature_algorithm.oid;
        let (hash_alg, sig_alg) = certificate_signature_algorithm(oid).ok_or_else(|| {
            Error::Untrusted(format!("Unsupported certificate signature algorithm {oid}"))
        })?;

        let tbs = self
            .cert
            .tbs_certificate
            .to_der()
            .map_err(|e| Error::Untrusted(format!("Cannot encode TBSCertificate: {e}")))?;

        verifier
            .verify_signature(
                issuer.spki(),
                &tbs,
                self.cert.signature.raw_bytes(),
                hash_alg,
                sig_alg,
            )
            .map_err(|e| Error::Untrusted(format!("Bad certificate signature: {e}")))
    }
}

fn certificate_signature_algorithm(
    oid: ObjectIdentifier,
) -> Option<(HashAlgorithm, SignatureAlgorithm)> {
    use HashAlgorithm::*;
    use SignatureAlgorithm::*;

    let v = match oid {
        OID_SHA1_WITH_RSA => (SHA1, RSA_PKCS1),
        OID_SHA256_WITH_RSA => (SHA256, RSA_PKCS1),
        OID_SHA384_WITH_RSA => (SHA384, RSA_PKCS1),
        OID_SHA512_WITH_RSA => (SHA512, RSA_PKCS1),
        OID_ECDSA_WITH_SHA1 => (SHA1, ECDSA),
        OID_ECDSA_WITH_SHA256 => (SHA256, ECDSA),
        OID_ECDSA_WITH_SHA384 => (SHA384, ECDSA),
        OID_ECDSA_WITH_SHA512 => (SHA512, ECDSA),
        _ => return None,
    };
    Some(v)
}

/// A certificate chain received from a peer, leaf first.
///
/// Not tied to any local key material. Dropping it releases the chain.
pub struct ParsedChain {
    certs: Vec<ParsedCertificate>,
}

impl ParsedChain {
    /// Parse a peer chain of at most `max_depth` certificates.
    pub(crate) fn parse(certs: &[CertificateBlob], max_depth: usize) -> Result<Self, Error> {
        if certs.is_empty() {
            return Err(Error::Parse("Empty certificate chain".into()));
        }
        if certs.len() > max_depth {
            return Err(Error::Parse(format!(
                "Certificate chain too long: {} > {}",
                certs.len(),
                max_depth
            )));
        }

        let certs = certs
            .iter()
            .cloned()
            .map(ParsedCertificate::parse)
            .collect::<Result<Vec<_>, _>>()?;

        debug!("Parsed peer chain of {} certificates", certs.len());

        Ok(ParsedChain { certs })
    }

    /// Number of certificates.
    pub fn len(&self) -> usize {
        self.certs.len()
    }

    /// Never true for a chain returned by parsing.
    pub fn is_empty(&self) -> bool {
        self.certs.is_empty()
    }

    /// The end-entity certificate.
    pub fn leaf(&self) -> &CertificateBlob {
        self.certs[0].der()
    }

    /// DER encoded `SubjectPublicKeyInfo` of the leaf.
    pub fn leaf_public_key(&self) -> &[u8] {
        self.certs[0].spki()
    }
}

impl fmt::Debug for ParsedChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParsedChain")
            .field("len", &self.certs.len())
            .finish()
    }
}

impl Drop for ParsedChain {
    fn drop(&mut self) {
        trace!("Release peer chain of {} certificates", self.certs.len());
    }
}

/// Root certificates that terminate a trusted chain.
#[derive(Default)]
pub(crate) struct TrustAnchors {
    certs: Vec<ParsedCertificate>,
}

impl TrustAnchors {
    /// Load anchors from a certificate file or a directory of them.
    pub(crate) fn load(path: &Path) -> Result<Self, Error> {
        let meta = fs::metadata(path).map_err(|e| Error::io(path, e))?;

        let mut certs = Vec::new();

        if meta.is_dir() {
            let mut files = Vec::new();
            for entry in fs::read_dir(path).map_err(|e| Error::io(path, e))? {
                let entry = entry.map_err(|e| Error::io(path, e))?;
                let file = entry.path();
                let wanted = file
                    .extension()
                    .and_then(|e| e.to_str())
                    .map(|e| ANCHOR_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
                    .unwrap_or(false);
                if wanted && file.is_file() {
                    files.push(file);
                }
            }
            // read_dir order is platform dependent
            files.sort();

            for file in files {
                match load_certificates(&file) {
                    Ok(blobs) => {
                        for blob in blobs {
                            certs.push(ParsedCertificate::parse(blob)?);
                        }
                    }
                    Err(e) => warn!("Skipping trust anchor {}: {}", file.display(), e),
                }
            }
        } else {
            for blob in load_certificates(path)? {
                certs.push(ParsedCertificate::parse(blob)?);
            }
        }

        if certs.is_empty() {
            return Err(Error::Certificate(format!(
                "No trust anchors found in {}",
                path.display()
            )));
        }

        debug!("Loaded {} trust anchors from {}", certs.len(), path.display());

        Ok(TrustAnchors { certs })
    }

    pub(crate) fn len(&self) -> usize {
        self.certs.len()
    }

    /// Validate `chain` at the current time.
    pub(crate) fn validate(
        &self,
        chain: &ParsedChain,
        verifier: &dyn SignatureVerifier,
    ) -> Result<(), Error> {
        self.validate_at(chain, verifier, OffsetDateTime::now_utc())
    }

    pub(crate) fn validate_at(
        &self,
        chain: &ParsedChain,
        verifier: &dyn SignatureVerifier,
        now: OffsetDateTime,
    ) -> Result<(), Error> {
        if self.certs.is_empty() {
            return Err(Error::Untrusted("No trust anchors configured".into()));
        }

        for cert in &chain.certs {
            cert.check_validity(now)?;
        }

        for (below, pair) in chain.certs.windows(2).enumerate() {
            let (child, parent) = (&pair[0], &pair[1]);
            if !child.is_issued_by(parent) {
                return Err(Error::Untrusted(
                    "Issuer does not match the next certificate's subject".into(),
                ));
            }
            parent.check_can_issue(below)?;
            child.check_signed_by(parent, verifier)?;
        }

        let Some(last) = chain.certs.last() else {
            return Err(Error::Untrusted("Empty certificate chain".into()));
        };

        if self.certs.iter().any(|a| a.der() == last.der()) {
            return Ok(());
        }

        let below = chain.certs.len() - 1;
        let mut last_err = None;
        for anchor in self.certs.iter().filter(|a| last.is_issued_by(a)) {
            match anchor
                .check_can_issue(below)
                .and_then(|()| last.check_signed_by(anchor, verifier))
            {
                Ok(()) => return Ok(()),
                Err(e) => last_err = Some(e),
            }
        }

        Err(last_err.unwrap_or_else(|| Error::Untrusted("No trust anchor issued the chain".into())))
    }
}

/// Read a certificate file: a single DER certificate or a PEM bundle.
pub(crate) fn load_certificates(path: &Path) -> Result<Vec<CertificateBlob>, Error> {
    let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;

    if bytes.is_empty() {
        return Err(Error::Certificate(format!("{} is empty", path.display())));
    }

    let is_pem = bytes
        .iter()
        .find(|b| !b.is_ascii_whitespace())
        .map(|b| *b == b'-')
        .unwrap_or(false);

    let certs = if is_pem {
        Certificate::load_pem_chain(&bytes)
            .map_err(|e| Error::Certificate(format!("{}: {e}", path.display())))?
    } else {
        vec![Certificate::from_der(&bytes)
            .map_err(|e| Error::Certificate(format!("{}: {e}", path.display())))?]
    };

    if certs.is_empty() {
        return Err(Error::Certificate(format!(
            "No certificates in {}",
            path.display()
        )));
    }

    certs
        .iter()
        .map(|c| {
            c.to_der()
                .map(CertificateBlob::from)
                .map_err(|e| Error::Certificate(format!("{}: {e}", path.display())))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::rust_crypto;

    fn data(name: &str) -> std::path::PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests/data")
            .join(name)
    }

    fn chain(names: &[&str]) -> ParsedChain {
        let blobs: Vec<_> = names
            .iter()
            .flat_map(|n| load_certificates(&data(n)).unwrap())
            .collect();
        ParsedChain::parse(&blobs, 16).unwrap()
    }

    #[test]
    fn load_der_and_pem() {
        let der = load_certificates(&data("p256_cert.der")).unwrap();
        assert_eq!(der.len(), 1);
        assert_eq!(der[0].as_der(), fs::read(data("p256_cert.der")).unwrap());

        let pem = load_certificates(&data("leaf_chain.pem")).unwrap();
        assert_eq!(pem.len(), 2);
    }

    #[test]
    fn dns_names_from_san_then_cn() {
        let c = chain(&["p256_cert.der"]);
        let names = c.certs[0].dns_names();
        assert_eq!(names, ["ec.example.com", "*.ec.example.com"]);

        let c = chain(&["p384_cert.pem"]);
        assert_eq!(c.certs[0].dns_names(), ["p384.example.com"]);
    }

    #[test]
    fn parse_limits() {
        assert!(ParsedChain::parse(&[], 16).is_err());
        let blobs = load_certificates(&data("leaf_chain.pem")).unwrap();
        assert!(ParsedChain::parse(&blobs, 1).is_err());
        assert!(ParsedChain::parse(&[CertificateBlob::from(vec![0x30, 0x03, 0x02])], 4).is_err());
    }

    #[test]
    fn chain_to_root_is_trusted() {
        let anchors = TrustAnchors::load(&data("ca_cert.pem")).unwrap();
        let verifier = rust_crypto::default_provider().signature_verification;
        anchors
            .validate(&chain(&["leaf_chain.pem"]), verifier)
            .unwrap();
        // Root included at the tail.
        anchors
            .validate(&chain(&["leaf_chain.pem", "ca_cert.pem"]), verifier)
            .unwrap();
    }

    #[test]
    fn broken_chains_are_untrusted() {
        let anchors = TrustAnchors::load(&data("ca_cert.pem")).unwrap();
        let verifier = rust_crypto::default_provider().signature_verification;

        // Missing intermediate.
        let res = anchors.validate(&chain(&["leaf_cert.pem"]), verifier);
        assert!(matches!(res, Err(Error::Untrusted(_))));

        // Self-signed, not an anchor.
        let res = anchors.validate(&chain(&["rsa_cert.pem"]), verifier);
        assert!(matches!(res, Err(Error::Untrusted(_))));

        // Out of order.
        let res = anchors.validate(&chain(&["inter_cert.pem", "leaf_cert.pem"]), verifier);
        assert!(matches!(res, Err(Error::Untrusted(_))));
    }

    #[test]
    fn validity_window() {
        let anchors = TrustAnchors::load(&data("ca_cert.pem")).unwrap();
        let verifier = rust_crypto::default_provider().signature_verification;
        let c = chain(&["leaf_chain.pem"]);

        let past = OffsetDateTime::from_unix_timestamp(0).unwrap();
        let res = anchors.validate_at(&c, verifier, past);
        assert!(matches!(res, Err(Error::Untrusted(_))));
    }

    #[test]
    fn no_anchors_is_untrusted() {
        let verifier = rust_crypto::default_provider().signature_verification;
        let res = TrustAnchors::default().validate(&chain(&["ca_cert.pem"]), verifier);
        assert!(matches!(res, Err(Error::Untrusted(_))));
    }

    #[test]
    fn anchor_directory_skips_junk() {
        let anchors = TrustAnchors::load(&data("roots")).unwrap();
        assert_eq!(anchors.len(), 1);
        assert!(TrustAnchors::load(&data("does_not_exist")).is_err());
    }
}
