//! Chain selection and formatting.


use certbridge::{CertificateBlob, Config, Error, SignatureScheme, UnsupportedSchemePolicy};
use store_common::*;

use SignatureScheme::*;

#[test]
fn universal_ecdsa_entry_without_root() {
    let _ = env_logger::try_init();

    let store = store(with_p256(Config::builder(), true));

    let (chain, scheme) = store
        .select(b"", b"", &[ECDSA_SECP256R1_SHA256])
        .unwrap()
        .expect("selection");
    assert_eq!(chain.index(), 0);
    assert_eq!(scheme, ECDSA_SECP256R1_SHA256);
}

#[test]
fn eddsa_only_selects_nothing() {
    let _ = env_logger::try_init();

    let store = store(with_rsa(with_p256(Config::builder(), true), true));
    assert!(store.select(b"", b"", &[ED25519]).unwrap().is_none());
    assert!(store.select(b"", b"", &[ED25519, ED448]).unwrap().is_none());
    assert!(store.select(b"", b"", &[]).unwrap().is_none());
}

#[test]
fn unsupported_scheme_can_be_rejected() {
    let _ = env_logger::try_init();

    let store = store(
        with_p256(Config::builder(), true).unsupported_scheme(UnsupportedSchemePolicy::Reject),
    );
    match store.select(b"", b"", &[ED25519, ECDSA_SECP256R1_SHA256]) {
        Err(Error::UnsupportedScheme(code)) => assert_eq!(code, 0x0807),
        other => panic!("expected UnsupportedScheme, got {:?}", other),
    }
}

#[test]
fn unsupported_schemes_are_skipped() {
    let _ = env_logger::try_init();

    let store = store(with_p256(Config::builder(), true));
    let (_, scheme) = store
        .select(b"", b"", &[ED25519, Unknown(0xfefe), ECDSA_SECP256R1_SHA256])
        .unwrap()
        .unwrap();
    assert_eq!(scheme, ECDSA_SECP256R1_SHA256);
}

#[test]
fn first_acceptable_scheme_wins() {
    let _ = env_logger::try_init();

    // RSA is first in the store, ECDSA first in the preference list.
    let store = store(with_p256(with_rsa(Config::builder(), true), true));

    let (chain, scheme) = store
        .select(b"", b"", &[ECDSA_SECP256R1_SHA256, RSA_PSS_RSAE_SHA256])
        .unwrap()
        .unwrap();
    assert_eq!(chain.index(), 1);
    assert_eq!(scheme, ECDSA_SECP256R1_SHA256);

    let (chain, scheme) = store
        .select(b"", b"", &[RSA_PSS_RSAE_SHA256, ECDSA_SECP256R1_SHA256])
        .unwrap()
        .unwrap();
    assert_eq!(chain.index(), 0);
    assert_eq!(scheme, RSA_PSS_RSAE_SHA256);
}

#[test]
fn scheme_must_fit_the_key_curve() {
    let _ = env_logger::try_init();

    let store = store(with_p384(with_p256(Config::builder(), true), true));

    let (chain, _) = store
        .select(b"", b"", &[ECDSA_SECP384R1_SHA384])
        .unwrap()
        .unwrap();
    assert_eq!(chain.index(), 1);

    // No P-521 key can be loaded.
    assert!(store
        .select(b"", b"", &[ECDSA_SECP521R1_SHA512])
        .unwrap()
        .is_none());

    // Legacy ECDSA_SHA1 is served by the P-256 key.
    let (chain, _) = store.select(b"", b"", &[ECDSA_SHA1]).unwrap().unwrap();
    assert_eq!(chain.index(), 0);
}

#[test]
fn named_entry_beats_universal() {
    let _ = env_logger::try_init();

    // Universal P-256 first, named chain leaf (also P-256) second.
    let store = store(with_chain(with_p256(Config::builder(), true), false));

    let (chain, _) = store
        .select(b"www.chain.example", b"", &[ECDSA_SECP256R1_SHA256])
        .unwrap()
        .unwrap();
    assert_eq!(chain.index(), 1);

    // Case-insensitive, trailing dot ignored.
    let (chain, _) = store
        .select(b"WWW.Chain.Example.", b"", &[ECDSA_SECP256R1_SHA256])
        .unwrap()
        .unwrap();
    assert_eq!(chain.index(), 1);

    // Unknown names fall back to the universal entry.
    let (chain, _) = store
        .select(b"other.example", b"", &[ECDSA_SECP256R1_SHA256])
        .unwrap()
        .unwrap();
    assert_eq!(chain.index(), 0);
    assert!(chain.is_universal());
}

#[test]
fn named_entries_need_a_name() {
    let _ = env_logger::try_init();

    let store = store(with_p256(with_chain(Config::builder(), false), false));

    assert!(store
        .select(b"", b"", &[ECDSA_SECP256R1_SHA256])
        .unwrap()
        .is_none());

    let (chain, _) = store
        .select(b"api.ec.example.com", b"", &[ECDSA_SECP256R1_SHA256])
        .unwrap()
        .unwrap();
    assert_eq!(chain.index(), 1);

    assert!(store
        .select(b"a.b.ec.example.com", b"", &[ECDSA_SECP256R1_SHA256])
        .unwrap()
        .is_none());

    // Not UTF-8.
    assert!(store
        .select(&[0xff, 0xfe, 0x2e], b"", &[ECDSA_SECP256R1_SHA256])
        .unwrap()
        .is_none());
}

#[test]
fn named_match_needs_a_capable_key() {
    let _ = env_logger::try_init();

    let store = store(with_p256(with_rsa(Config::builder(), false), true));

    // rsa.example.com only has an RSA key; ECDSA falls back to universal.
    let (chain, _) = store
        .select(b"rsa.example.com", b"", &[ECDSA_SECP256R1_SHA256])
        .unwrap()
        .unwrap();
    assert_eq!(chain.index(), 1);

    let (chain, _) = store
        .select(b"rsa.example.com", b"", &[RSA_PKCS1_SHA256])
        .unwrap()
        .unwrap();
    assert_eq!(chain.index(), 0);
}

#[test]
fn selected_scheme_is_always_acceptable() {
    let _ = env_logger::try_init();

    let store = store(with_p384(with_p256(with_rsa(Config::builder(), true), true), true));

    let all: Vec<SignatureScheme> = (0..=0x0900u16)
        .map(SignatureScheme::from_u16)
        .filter(|s| !matches!(s, Unknown(_)))
        .collect();

    for window in all.windows(3) {
        if let Some((_, scheme)) = store.select(b"", b"h2", window).unwrap() {
            assert!(window.contains(&scheme), "{:?} not in {:?}", scheme, window);
        }
    }
}

#[test]
fn alpn_does_not_discriminate() {
    let _ = env_logger::try_init();

    let store = store(with_p256(Config::builder(), true));
    let alpns: [&[u8]; 4] = [b"", b"h2", b"http/1.1", &[0xff, 0x00]];
    for alpn in alpns {
        let (chain, _) = store
            .select(b"", alpn, &[ECDSA_SECP256R1_SHA256])
            .unwrap()
            .unwrap();
        assert_eq!(chain.index(), 0);
    }
}

#[test]
fn format_returns_chain_in_order() {
    let _ = env_logger::try_init();

    let store = store(with_chain(with_p256(Config::builder(), true), false));

    let (chain, _) = store
        .select(b"www.chain.example", b"", &[ECDSA_SECP256R1_SHA256])
        .unwrap()
        .unwrap();
    let certs = store.format(&chain);
    assert_eq!(certs.len(), chain.len());
    assert_eq!(certs, pem_certs("leaf_chain.pem"));

    let (chain, _) = store
        .select(b"", b"", &[ECDSA_SECP256R1_SHA256])
        .unwrap()
        .unwrap();
    let certs = store.format(&chain);
    let der = std::fs::read(data("p256_cert.der")).unwrap();
    assert_eq!(certs, vec![CertificateBlob::from(der)]);
}

#[test]
fn formatted_blobs_outlive_the_store() {
    let _ = env_logger::try_init();

    let store = store(with_rsa(Config::builder(), true));
    let certs = {
        let chain = store.chain(0).unwrap();
        store.format(&chain)
    };
    drop(store);

    let wire = certbridge::wire::encode_certificate_list(&certs).unwrap();
    assert_eq!(certbridge::wire::decode_certificate_list(&wire).unwrap(), certs);
}

#[test]
fn store_is_shared_between_threads() {
    let _ = env_logger::try_init();

    let store = std::sync::Arc::new(store(with_p256(Config::builder(), true)));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let store = store.clone();
            std::thread::spawn(move || {
                let (chain, scheme) = store
                    .select(b"", b"", &[ECDSA_SECP256R1_SHA256])
                    .unwrap()
                    .unwrap();
                store.sign(&chain, scheme, &[7; 32]).unwrap().unwrap()
            })
        })
        .collect();

    for h in handles {
        assert!(!h.join().unwrap().is_empty());
    }
}
