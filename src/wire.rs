//! Wire encodings the handshake engine exchanges with the store.
//!
//! The TLS `Certificate` message body is a 24-bit length prefixed list of
//! 24-bit length prefixed DER certificates. The `signature_algorithms`
//! extension body is a 16-bit length prefixed list of 16-bit scheme codes.

use nom::bytes::complete::take;
use nom::number::complete::{be_u16, be_u24};
use nom::IResult;

use crate::chain::CertificateBlob;
use crate::types::SignatureScheme;
use crate::Error;

/// Largest value a 24-bit length field holds.
const MAX_U24: usize = 0xff_ffff;

/// Encode a `certificate_list`, in the given order.
///
/// Fails with [`Error::Parse`] if a certificate or the whole list does not
/// fit a 24-bit length field.
pub fn encode_certificate_list(certs: &[CertificateBlob]) -> Result<Vec<u8>, Error> {
    if let Some(cert) = certs.iter().find(|cert| cert.len() > MAX_U24) {
        return Err(Error::Parse(format!(
            "Certificate of {} bytes exceeds 24-bit length",
            cert.len()
        )));
    }

    let total_len: usize = certs.iter().map(|cert| 3 + cert.len()).sum();
    if total_len > MAX_U24 {
        return Err(Error::Parse(format!(
            "Certificate list of {} bytes exceeds 24-bit length",
            total_len
        )));
    }

    let mut output = Vec::with_capacity(3 + total_len);
    output.extend_from_slice(&(total_len as u32).to_be_bytes()[1..]);

    for cert in certs {
        output.extend_from_slice(&(cert.len() as u32).to_be_bytes()[1..]);
        output.extend_from_slice(cert);
    }

    Ok(output)
}

fn certificate_list(input: &[u8]) -> IResult<&[u8], Vec<CertificateBlob>> {
    let (rest, total_len) = be_u24(input)?;
    let (rest, mut body) = take(total_len as usize)(rest)?;

    let mut certs = Vec::new();
    while !body.is_empty() {
        let (remaining, cert_len) = be_u24(body)?;
        let (remaining, cert_data) = take(cert_len as usize)(remaining)?;
        certs.push(CertificateBlob::from(cert_data));
        body = remaining;
    }

    Ok((rest, certs))
}

/// Decode a `certificate_list` into independent certificate blobs.
///
/// The input must be exactly one list. Truncated input, trailing bytes and
/// empty certificates are rejected with [`Error::Parse`].
pub fn decode_certificate_list(input: &[u8]) -> Result<Vec<CertificateBlob>, Error> {
    let (rest, certs) = certificate_list(input)
        .map_err(|e| Error::Parse(format!("Malformed certificate list: {e:?}")))?;

    if !rest.is_empty() {
        return Err(Error::Parse(format!(
            "{} trailing bytes after certificate list",
            rest.len()
        )));
    }
    if certs.iter().any(|c| c.is_empty()) {
        return Err(Error::Parse("Empty certificate in list".into()));
    }

    Ok(certs)
}

fn signature_scheme_list(input: &[u8]) -> IResult<&[u8], Vec<SignatureScheme>> {
    let (rest, list_len) = be_u16(input)?;
    let (rest, mut body) = take(list_len as usize)(rest)?;

    let mut schemes = Vec::with_capacity(body.len() / 2);
    while !body.is_empty() {
        let (remaining, scheme) = SignatureScheme::parse(body)?;
        schemes.push(scheme);
        body = remaining;
    }

    Ok((rest, schemes))
}

/// Decode a `signature_algorithms` extension body, in preference order.
///
/// Codes the bridge does not know are kept as [`SignatureScheme::Unknown`]
/// so selection can apply its policy to them.
pub fn parse_signature_schemes(input: &[u8]) -> Result<Vec<SignatureScheme>, Error> {
    let (rest, schemes) = signature_scheme_list(input)
        .map_err(|e| Error::Parse(format!("Malformed signature_algorithms: {e:?}")))?;

    if !rest.is_empty() {
        return Err(Error::Parse(format!(
            "{} trailing bytes after signature_algorithms",
            rest.len()
        )));
    }

    Ok(schemes)
}
