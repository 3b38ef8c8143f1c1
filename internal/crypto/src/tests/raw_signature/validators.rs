// Copyright 2025 Adobe. All rights reserved.
// This file is licensed to you under the Apache License,
// Version 2.0 (http://www.apache.org/licenses/LICENSE-2.0)
// or the MIT license (http://opensource.org/licenses/MIT),
// at your option.

// Unless required by applicable law or agreed to in writing,
// this software is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR REPRESENTATIONS OF ANY KIND, either express or
// implied. See the LICENSE-MIT and LICENSE-APACHE files for the
// specific language governing permissions and limitations under
// each license.

use std::sync::OnceLock;

use ed25519_dalek::{pkcs8::EncodePublicKey as _, Signer};
use p256::{ecdsa::signature::hazmat::PrehashSigner, pkcs8::EncodePublicKey};
use rsa::{pkcs1v15::Pkcs1v15Sign, pss::Pss, RsaPrivateKey, RsaPublicKey};

use crate::{
    hash::DigestAlgorithm,
    raw_signature::{
        validator_for_signature_alg, EncryptionAlgorithm, RawSignatureValidationError,
        SignatureAlgorithm,
    },
};

const SAMPLE_DATA: &[u8] = b"some sample content to sign";

fn alg(encryption: EncryptionAlgorithm, digest: DigestAlgorithm) -> SignatureAlgorithm {
    SignatureAlgorithm::for_algorithms(encryption, digest).unwrap()
}

// Returns (public key SPKI DER, DER signature, plain signature).
fn sign_p256(digest: DigestAlgorithm, data: &[u8]) -> (Vec<u8>, Vec<u8>, Vec<u8>) {
    let key = p256::ecdsa::SigningKey::from_slice(&[0x11; 32]).unwrap();
    let prehash = digest.digest(data).unwrap();
    let sig: p256::ecdsa::Signature = key.sign_prehash(&prehash).unwrap();

    (
        key.verifying_key().to_public_key_der().unwrap().as_bytes().to_vec(),
        sig.to_der().as_bytes().to_vec(),
        sig.to_bytes().to_vec(),
    )
}

fn sign_p384(digest: DigestAlgorithm, data: &[u8]) -> (Vec<u8>, Vec<u8>, Vec<u8>) {
    let key = p384::ecdsa::SigningKey::from_slice(&[0x22; 48]).unwrap();
    let prehash = digest.digest(data).unwrap();
    let sig: p384::ecdsa::Signature = key.sign_prehash(&prehash).unwrap();

    (
        key.verifying_key().to_public_key_der().unwrap().as_bytes().to_vec(),
        sig.to_der().as_bytes().to_vec(),
        sig.to_bytes().to_vec(),
    )
}

#[test]
fn es256() {
    let (pub_key, der_sig, _) = sign_p256(DigestAlgorithm::Sha256, SAMPLE_DATA);

    let validator =
        validator_for_signature_alg(alg(EncryptionAlgorithm::Ecdsa, DigestAlgorithm::Sha256))
            .unwrap();

    validator.validate(&der_sig, SAMPLE_DATA, &pub_key).unwrap();
}

#[test]
fn es384() {
    let (pub_key, der_sig, _) = sign_p384(DigestAlgorithm::Sha384, SAMPLE_DATA);

    let validator =
        validator_for_signature_alg(alg(EncryptionAlgorithm::Ecdsa, DigestAlgorithm::Sha384))
            .unwrap();

    validator.validate(&der_sig, SAMPLE_DATA, &pub_key).unwrap();
}

#[test]
fn es256_bad_data() {
    let (pub_key, der_sig, _) = sign_p256(DigestAlgorithm::Sha256, SAMPLE_DATA);

    let mut data = SAMPLE_DATA.to_vec();
    data[10] = 0;

    let validator =
        validator_for_signature_alg(alg(EncryptionAlgorithm::Ecdsa, DigestAlgorithm::Sha256))
            .unwrap();

    assert_eq!(
        validator.validate(&der_sig, &data, &pub_key).unwrap_err(),
        RawSignatureValidationError::SignatureMismatch
    );
}

#[test]
fn es256_wrong_digest() {
    let (pub_key, der_sig, _) = sign_p256(DigestAlgorithm::Sha256, SAMPLE_DATA);

    let validator =
        validator_for_signature_alg(alg(EncryptionAlgorithm::Ecdsa, DigestAlgorithm::Sha512))
            .unwrap();

    assert_eq!(
        validator
            .validate(&der_sig, SAMPLE_DATA, &pub_key)
            .unwrap_err(),
        RawSignatureValidationError::SignatureMismatch
    );
}

#[test]
fn bad_public_key() {
    let (_, der_sig, _) = sign_p256(DigestAlgorithm::Sha256, SAMPLE_DATA);

    let validator =
        validator_for_signature_alg(alg(EncryptionAlgorithm::Ecdsa, DigestAlgorithm::Sha256))
            .unwrap();

    assert_eq!(
        validator
            .validate(&der_sig, SAMPLE_DATA, b"not a key")
            .unwrap_err(),
        RawSignatureValidationError::InvalidPublicKey
    );
}

#[test]
fn plain_ecdsa_all_digests() {
    let digests = SignatureAlgorithm::all()
        .iter()
        .filter(|alg| alg.encryption() == EncryptionAlgorithm::PlainEcdsa)
        .map(|alg| alg.digest())
        .filter(|digest| {
            digest.is_supported()
                && SignatureAlgorithm::for_algorithms(EncryptionAlgorithm::Ecdsa, *digest).is_some()
        });

    for digest in digests {
        let (pub_key, der_sig, plain_sig) = sign_p256(digest, SAMPLE_DATA);

        let plain = alg(EncryptionAlgorithm::PlainEcdsa, digest);
        let validator = validator_for_signature_alg(plain).unwrap();
        validator
            .validate(&plain_sig, SAMPLE_DATA, &pub_key)
            .unwrap();

        // Either encoding is accepted for either declaration.
        let validator =
            validator_for_signature_alg(alg(EncryptionAlgorithm::Ecdsa, digest)).unwrap();
        validator.validate(&der_sig, SAMPLE_DATA, &pub_key).unwrap();
        validator
            .validate(&plain_sig, SAMPLE_DATA, &pub_key)
            .unwrap();
    }
}

#[test]
fn plain_ecdsa_p384() {
    let (pub_key, _, plain_sig) = sign_p384(DigestAlgorithm::Sha384, SAMPLE_DATA);

    let validator = validator_for_signature_alg(alg(
        EncryptionAlgorithm::PlainEcdsa,
        DigestAlgorithm::Sha384,
    ))
    .unwrap();

    validator
        .validate(&plain_sig, SAMPLE_DATA, &pub_key)
        .unwrap();
}

#[test]
fn ed25519() {
    let key = ed25519_dalek::SigningKey::from_bytes(&[7u8; 32]);
    let sig = key.sign(SAMPLE_DATA).to_bytes();

    let validator =
        validator_for_signature_alg(alg(EncryptionAlgorithm::EdDsa, DigestAlgorithm::Sha512))
            .unwrap();

    let raw_key = key.verifying_key().to_bytes();
    validator.validate(&sig, SAMPLE_DATA, &raw_key).unwrap();

    let der_key = key.verifying_key().to_public_key_der().unwrap();
    validator
        .validate(&sig, SAMPLE_DATA, der_key.as_bytes())
        .unwrap();
}

#[test]
fn ed25519_bad_data() {
    let key = ed25519_dalek::SigningKey::from_bytes(&[7u8; 32]);
    let sig = key.sign(SAMPLE_DATA).to_bytes();

    let validator =
        validator_for_signature_alg(alg(EncryptionAlgorithm::EdDsa, DigestAlgorithm::Sha512))
            .unwrap();

    assert_eq!(
        validator
            .validate(&sig, b"other content", &key.verifying_key().to_bytes())
            .unwrap_err(),
        RawSignatureValidationError::SignatureMismatch
    );
}

#[test]
fn no_native_validator() {
    assert!(validator_for_signature_alg(alg(
        EncryptionAlgorithm::Dsa,
        DigestAlgorithm::Sha256
    ))
    .is_none());
    assert!(validator_for_signature_alg(alg(
        EncryptionAlgorithm::Rsa,
        DigestAlgorithm::Md5
    ))
    .is_none());
    assert!(validator_for_signature_alg(alg(
        EncryptionAlgorithm::PlainEcdsa,
        DigestAlgorithm::Ripemd160
    ))
    .is_none());
}

// Key generation is slow in debug builds, so one key serves every RSA test.
fn rsa_key() -> &'static RsaPrivateKey {
    static KEY: OnceLock<RsaPrivateKey> = OnceLock::new();
    KEY.get_or_init(|| RsaPrivateKey::new(&mut rand::thread_rng(), 2048).unwrap())
}

fn rsa_public_key() -> Vec<u8> {
    RsaPublicKey::from(rsa_key())
        .to_public_key_der()
        .unwrap()
        .as_bytes()
        .to_vec()
}

fn sign_pkcs1v15(digest: DigestAlgorithm, data: &[u8]) -> Vec<u8> {
    let hashed = digest.digest(data).unwrap();
    let scheme = match digest {
        DigestAlgorithm::Sha1 => Some(Pkcs1v15Sign::new::<sha1::Sha1>()),
        DigestAlgorithm::Sha256 => Some(Pkcs1v15Sign::new::<sha2::Sha256>()),
        DigestAlgorithm::Sha384 => Some(Pkcs1v15Sign::new::<sha2::Sha384>()),
        DigestAlgorithm::Sha512 => Some(Pkcs1v15Sign::new::<sha2::Sha512>()),
        DigestAlgorithm::Sha3_256 => Some(Pkcs1v15Sign::new::<sha3::Sha3_256>()),
        _ => None,
    };
    rsa_key().sign(scheme.unwrap(), &hashed).unwrap()
}

#[test]
fn rsa_pkcs1v15() {
    let pub_key = rsa_public_key();

    for digest in [
        DigestAlgorithm::Sha1,
        DigestAlgorithm::Sha256,
        DigestAlgorithm::Sha384,
        DigestAlgorithm::Sha512,
        DigestAlgorithm::Sha3_256,
    ] {
        let sig = sign_pkcs1v15(digest, SAMPLE_DATA);
        let validator =
            validator_for_signature_alg(alg(EncryptionAlgorithm::Rsa, digest)).unwrap();

        validator.validate(&sig, SAMPLE_DATA, &pub_key).unwrap();
    }
}

#[test]
fn rsa_pkcs1v15_bad_data() {
    let sig = sign_pkcs1v15(DigestAlgorithm::Sha256, SAMPLE_DATA);

    let validator =
        validator_for_signature_alg(alg(EncryptionAlgorithm::Rsa, DigestAlgorithm::Sha256))
            .unwrap();

    assert_eq!(
        validator
            .validate(&sig, b"other content", &rsa_public_key())
            .unwrap_err(),
        RawSignatureValidationError::SignatureMismatch
    );

    // the digest is part of the PKCS#1 v1.5 encoding
    let validator =
        validator_for_signature_alg(alg(EncryptionAlgorithm::Rsa, DigestAlgorithm::Sha384))
            .unwrap();
    assert_eq!(
        validator
            .validate(&sig, SAMPLE_DATA, &rsa_public_key())
            .unwrap_err(),
        RawSignatureValidationError::SignatureMismatch
    );
}

#[test]
fn rsa_pss() {
    let hashed = DigestAlgorithm::Sha256.digest(SAMPLE_DATA).unwrap();
    let sig = rsa_key()
        .sign_with_rng(&mut rand::thread_rng(), Pss::new::<sha2::Sha256>(), &hashed)
        .unwrap();

    let validator = validator_for_signature_alg(alg(
        EncryptionAlgorithm::RsaSsaPss,
        DigestAlgorithm::Sha256,
    ))
    .unwrap();

    validator
        .validate(&sig, SAMPLE_DATA, &rsa_public_key())
        .unwrap();

    assert_eq!(
        validator
            .validate(&sig, b"other content", &rsa_public_key())
            .unwrap_err(),
        RawSignatureValidationError::SignatureMismatch
    );

    // a PKCS#1 v1.5 signature does not verify as PSS
    let pkcs1 = sign_pkcs1v15(DigestAlgorithm::Sha256, SAMPLE_DATA);
    assert_eq!(
        validator
            .validate(&pkcs1, SAMPLE_DATA, &rsa_public_key())
            .unwrap_err(),
        RawSignatureValidationError::SignatureMismatch
    );
}

#[test]
fn rsa_rejects_ec_key() {
    let (ec_key, _, _) = sign_p256(DigestAlgorithm::Sha256, SAMPLE_DATA);
    let sig = sign_pkcs1v15(DigestAlgorithm::Sha256, SAMPLE_DATA);

    let validator =
        validator_for_signature_alg(alg(EncryptionAlgorithm::Rsa, DigestAlgorithm::Sha256))
            .unwrap();

    assert_eq!(
        validator.validate(&sig, SAMPLE_DATA, &ec_key).unwrap_err(),
        RawSignatureValidationError::InvalidPublicKey
    );
}
