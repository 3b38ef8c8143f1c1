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

#![allow(dead_code)]

use chrono::{DateTime, Utc};
use esig_validation::{
    evidence::{InMemoryContent, MissingContent},
    CertificateRef, CertificateVerdict, DeclaredReference, DigestAlgorithm, DigestMatcherKind,
    BuiltInCryptoProvider, DocumentValidator, EncryptionAlgorithm, ReferenceBinding,
    SignatureAlgorithm, SignatureSource, StaticVerdictSource, TimestampKind, TimestampSource,
    ValidationPolicy,
};
use p256::{
    ecdsa::{signature::hazmat::PrehashSigner, Signature, SigningKey},
    pkcs8::EncodePublicKey,
};

pub const SIGNING_CERT: &str = "CN=Test Signer";
pub const TSA_CERT: &str = "CN=Test TSA";

pub const CONTENT: &[u8] = b"The quick brown fox jumps over the lazy dog.";
pub const SIGNED_PROPERTIES: &[u8] = b"<xades:SignedProperties Id=\"xades-id-1\"/>";
pub const VALIDATION_DATA: &[u8] = b"certificate values and revocation values";

pub fn t(rfc3339: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339).unwrap().with_timezone(&Utc)
}

pub fn claimed_signing_time() -> DateTime<Utc> {
    t("2025-01-01T10:00:00Z")
}

pub fn validation_time() -> DateTime<Utc> {
    t("2025-06-01T00:00:00Z")
}

pub fn signer_key() -> SigningKey {
    SigningKey::from_slice(&[0x11; 32]).unwrap()
}

pub fn tsa_key() -> SigningKey {
    SigningKey::from_slice(&[0x22; 32]).unwrap()
}

/// DER-encoded SubjectPublicKeyInfo of `key`.
pub fn public_key(key: &SigningKey) -> Vec<u8> {
    key.verifying_key().to_public_key_der().unwrap().into_vec()
}

pub fn digest(alg: DigestAlgorithm, data: &[u8]) -> Vec<u8> {
    alg.digest(data).unwrap()
}

pub fn sign_raw(key: &SigningKey, alg: DigestAlgorithm, data: &[u8]) -> Signature {
    key.sign_prehash(&digest(alg, data)).unwrap()
}

/// DER-encoded ECDSA signature over `data`.
pub fn sign_der(key: &SigningKey, alg: DigestAlgorithm, data: &[u8]) -> Vec<u8> {
    sign_raw(key, alg, data).to_der().as_bytes().to_vec()
}

/// A signature over `content` with one content reference and one mandated
/// signed-properties binding, signed with [`signer_key`].
pub fn signed_over(id: &str, content: &[u8]) -> SignatureSource {
    let alg = DigestAlgorithm::Sha256;
    let content_digest = digest(alg, content);
    let properties_digest = digest(alg, SIGNED_PROPERTIES);

    let mut source = SignatureSource::new(id);
    source.digest_algorithm = Some(alg);
    source.encryption_algorithm = Some(EncryptionAlgorithm::Ecdsa);
    source.signed_properties_mandated = true;
    source.claimed_signing_time = Some(claimed_signing_time());
    source.signing_certificate = Some(CertificateRef::new(SIGNING_CERT, public_key(&signer_key())));
    source.references = vec![
        DeclaredReference::new(
            DigestMatcherKind::Reference,
            Some(alg),
            content_digest.clone(),
            InMemoryContent::new(content),
        )
        .with_name("document.txt"),
        DeclaredReference::new(
            DigestMatcherKind::SignedProperties,
            Some(alg),
            properties_digest.clone(),
            InMemoryContent::new(SIGNED_PROPERTIES),
        )
        .with_name("#xades-id-1"),
    ];

    source.signed_data = [content_digest, properties_digest].concat();
    source.signature_value = sign_der(&signer_key(), alg, &source.signed_data);
    source
}

pub fn signed(id: &str) -> SignatureSource {
    signed_over(id, CONTENT)
}

// The bytes a derived message imprint covers, for a signature built by
// `signed_over(_, content)`.
fn imprinted_bytes(
    source: &SignatureSource,
    content: &[u8],
    kind: TimestampKind,
    covered: &[&str],
) -> Vec<u8> {
    let covered_tokens = covered.iter().flat_map(|id| {
        source
            .timestamps
            .iter()
            .find(|ts| ts.id == *id)
            .map(|ts| ts.encoded_token.clone())
            .unwrap_or_default()
    });

    let mut bytes = Vec::new();
    match kind {
        TimestampKind::Content
        | TimestampKind::AllDataObjects
        | TimestampKind::IndividualDataObjects
        | TimestampKind::Document => bytes.extend_from_slice(content),
        TimestampKind::Signature => bytes.extend_from_slice(&source.signature_value),
        TimestampKind::ValidationData => {
            bytes.extend_from_slice(&source.signature_value);
            bytes.extend(covered_tokens);
            bytes.extend_from_slice(&source.validation_data);
        }
        TimestampKind::Archive => {
            bytes.extend_from_slice(content);
            bytes.extend_from_slice(SIGNED_PROPERTIES);
            bytes.extend_from_slice(&source.signature_value);
            bytes.extend(covered_tokens);
            bytes.extend_from_slice(&source.validation_data);
        }
    }
    bytes
}

/// Attach a timestamp token issued by [`tsa_key`] whose imprint matches the
/// current state of `source`, which must cover `content`.
pub fn add_timestamp_over(
    source: &mut SignatureSource,
    content: &[u8],
    id: &str,
    kind: TimestampKind,
    production_time: &str,
    covered: &[&str],
) {
    let alg = DigestAlgorithm::Sha256;
    let production_time = t(production_time);
    let imprint = digest(alg, &imprinted_bytes(source, content, kind, covered));

    let mut ts = TimestampSource::new(id, kind, production_time);
    ts.imprint_algorithm = Some(alg);
    ts.imprint_digest = imprint.clone();
    ts.covered_timestamp_ids = covered.iter().map(|id| id.to_string()).collect();
    ts.tsa_certificate = Some(CertificateRef::new(TSA_CERT, public_key(&tsa_key())));
    ts.token_signature_algorithm =
        SignatureAlgorithm::for_algorithms(EncryptionAlgorithm::Ecdsa, alg);
    ts.token_signed_data = [imprint, production_time.to_rfc3339().into_bytes()].concat();
    ts.token_signature_value = sign_der(&tsa_key(), alg, &ts.token_signed_data);
    ts.encoded_token = [ts.token_signed_data.clone(), ts.token_signature_value.clone()].concat();

    source.timestamps.push(ts);
}

pub fn add_timestamp(
    source: &mut SignatureSource,
    id: &str,
    kind: TimestampKind,
    production_time: &str,
    covered: &[&str],
) {
    add_timestamp_over(source, CONTENT, id, kind, production_time, covered)
}

/// A signature with a content timestamp `T-C`, a signature timestamp `T-S`
/// and an archive timestamp `T-A` covering `T-S`.
pub fn timestamped(id: &str) -> SignatureSource {
    let mut source = signed(id);
    source.validation_data = VALIDATION_DATA.to_vec();
    let (content_ts, signature_ts, archive_ts) =
        (format!("{id}/T-C"), format!("{id}/T-S"), format!("{id}/T-A"));

    add_timestamp(&mut source, &content_ts, TimestampKind::Content, "2025-01-01T09:59:00Z", &[]);
    add_timestamp(
        &mut source,
        &signature_ts,
        TimestampKind::Signature,
        "2025-01-01T10:05:00Z",
        &[],
    );
    add_timestamp(
        &mut source,
        &archive_ts,
        TimestampKind::Archive,
        "2025-03-01T00:00:00Z",
        &[&signature_ts],
    );
    source
}

/// Replace the signed content of `source` after signing.
pub fn tamper_content(source: &mut SignatureSource, content: &[u8]) {
    source.references[0].binding =
        ReferenceBinding::Content(Box::new(InMemoryContent::new(content)));
}

/// Remove the signed content of `source` after signing.
pub fn remove_content(source: &mut SignatureSource) {
    source.references[0].binding =
        ReferenceBinding::Content(Box::new(MissingContent::new("document.txt")));
}

/// Both the signer and the TSA chain to a trust anchor.
pub fn trusted() -> StaticVerdictSource {
    StaticVerdictSource::new()
        .with_verdict(SIGNING_CERT, CertificateVerdict::trusted())
        .with_verdict(TSA_CERT, CertificateVerdict::trusted())
}

pub fn validator_with(
    policy: ValidationPolicy,
    certificates: StaticVerdictSource,
) -> DocumentValidator {
    let _ = env_logger::builder().is_test(true).try_init();

    DocumentValidator::new(policy, BuiltInCryptoProvider::default(), certificates)
        .unwrap()
        .with_validation_time(validation_time())
}

pub fn validator(certificates: StaticVerdictSource) -> DocumentValidator {
    validator_with(ValidationPolicy::baseline_b(), certificates)
}

#[allow(unused_macros)]
macro_rules! assert_err {
    ($expression:expr, $($pattern:tt)+) => {
        match $expression {
            $($pattern)+ => (),
            ref e => panic!("expected `{}` but got `{:?}`", stringify!($($pattern)+), e),
        }
    }
}
#[allow(unused_imports)]
pub(super) use assert_err;
