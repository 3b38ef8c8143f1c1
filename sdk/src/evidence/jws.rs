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

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use esig_crypto::hash::DigestAlgorithm;

use crate::{
    digest_matcher::DigestMatcherKind,
    evidence::{DeclaredReference, InMemoryContent, PayloadEncoding},
};

impl PayloadEncoding {
    /// Return the payload as it appears in the JWS signing input.
    pub fn encode(&self, payload: &[u8]) -> Vec<u8> {
        match self {
            Self::Base64Url => URL_SAFE_NO_PAD.encode(payload).into_bytes(),
            Self::Unencoded => payload.to_vec(),
        }
    }
}

/// Build the JWS signing input `ASCII(protected) || '.' || payload` for the
/// given payload encoding.
pub fn jws_signing_input(
    protected_header_b64: &str,
    payload: &[u8],
    encoding: PayloadEncoding,
) -> Vec<u8> {
    let mut input = protected_header_b64.as_bytes().to_vec();
    input.push(b'.');
    input.extend_from_slice(&encoding.encode(payload));
    input
}

/// Return the digest declared for `payload` when it is signed.
///
/// The digest covers the payload in the form it takes in the signing input,
/// so signatures over the same payload with different encodings declare
/// different digests. Returns `None` if `digest_algorithm` cannot be computed.
pub fn jws_payload_digest(
    payload: &[u8],
    encoding: PayloadEncoding,
    digest_algorithm: DigestAlgorithm,
) -> Option<Vec<u8>> {
    digest_algorithm.digest(&encoding.encode(payload))
}

/// Build the content binding of a JWS signature: `expected_digest`, as
/// declared with the signature, checked against `payload` as it was found in
/// the document.
pub fn jws_payload_reference(
    payload: &[u8],
    encoding: PayloadEncoding,
    digest_algorithm: DigestAlgorithm,
    expected_digest: Vec<u8>,
) -> DeclaredReference {
    let encoded = encoding.encode(payload);

    DeclaredReference::new(
        DigestMatcherKind::JwsPayload,
        Some(digest_algorithm),
        expected_digest,
        InMemoryContent::new(encoded),
    )
}
