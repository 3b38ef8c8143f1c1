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

//! Raw evidence supplied by format parsers.
//!
//! A parser produces one [`SignatureSource`] per signature found in a
//! document. Nothing in this module is validated yet: the sources are
//! consumed by [`DocumentValidator`](crate::DocumentValidator), which turns
//! them into immutable [`SignatureEvidence`](crate::SignatureEvidence) and
//! [`TimestampEvidence`](crate::TimestampEvidence) records.

use chrono::{DateTime, Utc};
use esig_crypto::{
    hash::DigestAlgorithm,
    raw_signature::{EncryptionAlgorithm, SignatureAlgorithm},
};
use serde::{Deserialize, Serialize};

use crate::{digest_matcher::DigestMatcherKind, timestamp::TimestampKind, Error, Result};

mod jws;
pub use jws::{jws_payload_digest, jws_payload_reference, jws_signing_input};

mod resolver;
pub use resolver::{ContentFn, ContentResolver, InMemoryContent, MissingContent, ResolveError};

/// A capability that parses one document format into signature evidence.
pub trait EvidenceExtractor {
    /// Extract one [`SignatureSource`] per signature, in document order.
    ///
    /// A signature that cannot be parsed is still returned, with its
    /// `structural_failure` set.
    fn extract(&self, document: &[u8]) -> Vec<SignatureSource>;
}

/// Identifies a certificate and carries the public key needed to verify the
/// signatures it produced.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CertificateRef {
    /// Identifier used to query the certificate verdict source.
    pub id: String,

    /// DER-encoded SubjectPublicKeyInfo, or a raw Ed25519 key.
    pub public_key: Vec<u8>,
}

impl CertificateRef {
    /// Describe a certificate by id and public key.
    pub fn new<S: Into<String>>(id: S, public_key: Vec<u8>) -> Self {
        Self {
            id: id.into(),
            public_key,
        }
    }
}

/// How the content covered by a [`DeclaredReference`] can be checked.
#[derive(Debug)]
pub enum ReferenceBinding {
    /// The content is resolved and digested during validation.
    Content(Box<dyn ContentResolver>),

    /// The parser already established the binding's state.
    ///
    /// `intact` without `found` is rejected as a contract violation.
    Verified {
        /// The covered content was located.
        found: bool,

        /// The covered content matched the declared digest.
        intact: bool,
    },
}

/// One content binding declared by a signature.
#[derive(Debug)]
pub struct DeclaredReference {
    /// What the binding covers.
    pub kind: DigestMatcherKind,

    /// URI or entry name, for diagnostics.
    pub name: Option<String>,

    /// Declared digest algorithm, or `None` if the parser could not map the
    /// algorithm identifier.
    pub digest_algorithm: Option<DigestAlgorithm>,

    /// Declared digest value.
    pub expected_digest: Vec<u8>,

    /// Access to the covered content.
    pub binding: ReferenceBinding,
}

impl DeclaredReference {
    /// Declare a binding whose content is resolved during validation.
    pub fn new<R: ContentResolver + 'static>(
        kind: DigestMatcherKind,
        digest_algorithm: Option<DigestAlgorithm>,
        expected_digest: Vec<u8>,
        resolver: R,
    ) -> Self {
        Self {
            kind,
            name: None,
            digest_algorithm,
            expected_digest,
            binding: ReferenceBinding::Content(Box::new(resolver)),
        }
    }

    /// Declare a binding already checked by the parser.
    pub fn verified(
        kind: DigestMatcherKind,
        digest_algorithm: Option<DigestAlgorithm>,
        expected_digest: Vec<u8>,
        found: bool,
        intact: bool,
    ) -> Self {
        Self {
            kind,
            name: None,
            digest_algorithm,
            expected_digest,
            binding: ReferenceBinding::Verified { found, intact },
        }
    }

    /// Set the binding's URI or entry name.
    #[must_use]
    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Where the bytes covered by a timestamp's message imprint come from.
#[derive(Debug, Default)]
pub enum ImprintSource {
    /// Derived from the timestamp kind and the signature it is attached to.
    #[default]
    Derived,

    /// Supplied explicitly by the parser, e.g. a PDF byte range.
    Detached(Box<dyn ContentResolver>),
}

/// One timestamp token embedded in a signature.
#[derive(Debug)]
pub struct TimestampSource {
    /// Identifier, unique across the validation run.
    pub id: String,

    /// Timestamp type.
    pub kind: TimestampKind,

    /// Time asserted by the time-stamping authority.
    pub production_time: DateTime<Utc>,

    /// Digest algorithm of the message imprint.
    pub imprint_algorithm: Option<DigestAlgorithm>,

    /// Message imprint stored in the token.
    pub imprint_digest: Vec<u8>,

    /// Bytes covered by the message imprint.
    pub imprint_source: ImprintSource,

    /// Algorithm of the token's signature.
    pub token_signature_algorithm: Option<SignatureAlgorithm>,

    /// The token's signature value.
    pub token_signature_value: Vec<u8>,

    /// The bytes signed by the time-stamping authority.
    pub token_signed_data: Vec<u8>,

    /// Certificate of the time-stamping authority.
    pub tsa_certificate: Option<CertificateRef>,

    /// Id of the signature whose value this timestamp covers, if any.
    pub covered_signature_id: Option<String>,

    /// Ids of earlier timestamps this timestamp covers, in coverage order.
    pub covered_timestamp_ids: Vec<String>,

    /// The token as embedded, covered by later archive timestamps.
    pub encoded_token: Vec<u8>,

    /// Parse failure reported by the parser.
    pub structural_failure: Option<String>,
}

impl TimestampSource {
    /// Create a timestamp source with no imprint, token or coverage yet.
    pub fn new<S: Into<String>>(
        id: S,
        kind: TimestampKind,
        production_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            production_time,
            imprint_algorithm: None,
            imprint_digest: Vec::new(),
            imprint_source: ImprintSource::Derived,
            token_signature_algorithm: None,
            token_signature_value: Vec::new(),
            token_signed_data: Vec::new(),
            tsa_certificate: None,
            covered_signature_id: None,
            covered_timestamp_ids: Vec::new(),
            encoded_token: Vec::new(),
            structural_failure: None,
        }
    }
}

/// JWS payload encoding, as selected by the `b64` header parameter.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PayloadEncoding {
    /// `b64` absent or `true`: the payload is base64url-encoded.
    Base64Url,

    /// `b64` is `false` (RFC 7797): the payload is used as is.
    Unencoded,
}

/// Raw evidence for one signature.
#[derive(Debug)]
pub struct SignatureSource {
    /// Identifier, unique across the validation run.
    pub id: String,

    /// Declared digest algorithm of the signature.
    pub digest_algorithm: Option<DigestAlgorithm>,

    /// Declared encryption algorithm of the signature.
    pub encryption_algorithm: Option<EncryptionAlgorithm>,

    /// The signature value.
    pub signature_value: Vec<u8>,

    /// The bytes covered by the signature value.
    pub signed_data: Vec<u8>,

    /// The signing certificate, if one could be identified.
    pub signing_certificate: Option<CertificateRef>,

    /// Declared content bindings, in declaration order.
    pub references: Vec<DeclaredReference>,

    /// Embedded timestamps, in declaration order.
    pub timestamps: Vec<TimestampSource>,

    /// Bundled long-term validation data, covered by archive timestamps.
    pub validation_data: Vec<u8>,

    /// Signing time claimed by the signer.
    pub claimed_signing_time: Option<DateTime<Utc>>,

    /// Whether the signer-claimed attributes passed the parser's checks.
    pub b_level_attributes_valid: bool,

    /// Whether the format requires exactly one signed-properties binding.
    pub signed_properties_mandated: bool,

    /// JWS payload encoding, for JWS signatures.
    pub payload_encoding: Option<PayloadEncoding>,

    /// Parse failure reported by the parser.
    pub structural_failure: Option<String>,
}

impl SignatureSource {
    /// Create a signature source with no evidence yet.
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self {
            id: id.into(),
            digest_algorithm: None,
            encryption_algorithm: None,
            signature_value: Vec::new(),
            signed_data: Vec::new(),
            signing_certificate: None,
            references: Vec::new(),
            timestamps: Vec::new(),
            validation_data: Vec::new(),
            claimed_signing_time: None,
            b_level_attributes_valid: true,
            signed_properties_mandated: false,
            payload_encoding: None,
            structural_failure: None,
        }
    }

    /// Return the signature algorithm named by the declared encryption and
    /// digest algorithms, if it exists.
    pub fn signature_algorithm(&self) -> Option<SignatureAlgorithm> {
        SignatureAlgorithm::for_algorithms(self.encryption_algorithm?, self.digest_algorithm?)
    }
}

/// Check that a new signature with `encoding` may be added next to the
/// `existing` signatures of a JWS document.
///
/// All signatures of a JWS document sign the same payload, so they must agree
/// on the `b64` header parameter.
pub fn ensure_compatible_payload_encoding(
    existing: &[SignatureSource],
    encoding: PayloadEncoding,
) -> Result<()> {
    if existing
        .iter()
        .filter_map(|signature| signature.payload_encoding)
        .any(|other| other != encoding)
    {
        return Err(Error::PayloadEncodingMismatch);
    }
    Ok(())
}

// Reject documents whose signatures mix payload encodings.
pub(crate) fn check_payload_encodings(signatures: &[SignatureSource]) -> Result<()> {
    let mut encodings = signatures.iter().filter_map(|s| s.payload_encoding);
    if let Some(first) = encodings.next() {
        if encodings.any(|other| other != first) {
            return Err(Error::PayloadEncodingMismatch);
        }
    }
    Ok(())
}
