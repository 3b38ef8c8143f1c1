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

use std::io::Read;

use esig_status_tracker::{validation_codes::*, StatusTracker};

use crate::{
    digest_matcher::{check_binding, evaluate_reference, BindingState, DigestMatcherKind},
    evidence::{ContentResolver, DeclaredReference, InMemoryContent, MissingContent, ResolveError},
    tests::utils::{sha256, FailingReader, StubCrypto},
    DigestAlgorithm, Error,
};

const CONTENT: &[u8] = b"<doc>hello</doc>";

struct TruncatedEntry;

impl ContentResolver for TruncatedEntry {
    fn open(&self) -> Result<Box<dyn Read + '_>, ResolveError> {
        Ok(Box::new(FailingReader))
    }
}

fn reference<R: ContentResolver + 'static>(
    alg: Option<DigestAlgorithm>,
    expected: Vec<u8>,
    resolver: R,
) -> DeclaredReference {
    DeclaredReference::new(DigestMatcherKind::Reference, alg, expected, resolver)
}

#[test]
fn intact_content() {
    let mut tracker = StatusTracker::default();
    let r = reference(
        Some(DigestAlgorithm::Sha256),
        sha256(CONTENT),
        InMemoryContent::new(CONTENT),
    );

    let matcher = evaluate_reference(&StubCrypto {}, "S-1", 0, &r, &mut tracker).unwrap();

    assert!(matcher.data_found());
    assert!(matcher.data_intact());
    assert_eq!(matcher.kind(), DigestMatcherKind::Reference);
    assert!(tracker.has_status_for("S-1/reference-0", DIGEST_MATCHER_INTACT));
}

#[test]
fn modified_content() {
    let mut tracker = StatusTracker::default();
    let r = reference(
        Some(DigestAlgorithm::Sha256),
        sha256(CONTENT),
        InMemoryContent::new(b"<doc>HELLO</doc>".to_vec()),
    )
    .with_name("doc.xml");

    let matcher = evaluate_reference(&StubCrypto {}, "S-1", 3, &r, &mut tracker).unwrap();

    assert!(matcher.data_found());
    assert!(!matcher.data_intact());
    assert_eq!(matcher.name(), Some("doc.xml"));
    assert!(tracker.has_status_for("S-1/doc.xml", DIGEST_MATCHER_MISMATCH));
}

#[test]
fn missing_content() {
    let mut tracker = StatusTracker::default();
    let r = reference(
        Some(DigestAlgorithm::Sha256),
        sha256(CONTENT),
        MissingContent::new("doc.xml"),
    );

    let matcher = evaluate_reference(&StubCrypto {}, "S-1", 0, &r, &mut tracker).unwrap();

    assert!(!matcher.data_found());
    assert!(!matcher.data_intact());
    assert!(tracker.has_status(DIGEST_MATCHER_NOT_FOUND));
}

#[test]
fn read_error_is_not_found() {
    let entry = TruncatedEntry;
    let state = check_binding(
        &StubCrypto {},
        Some(DigestAlgorithm::Sha256),
        &sha256(CONTENT),
        || entry.open(),
    );

    assert!(matches!(state, BindingState::NotFound(_)));
}

#[test]
fn uncomputable_algorithm() {
    let mut tracker = StatusTracker::default();
    let r = reference(
        Some(DigestAlgorithm::Md5),
        vec![0u8; 16],
        InMemoryContent::new(CONTENT),
    );

    let matcher = evaluate_reference(&StubCrypto {}, "S-1", 0, &r, &mut tracker).unwrap();

    assert!(matcher.data_found());
    assert!(!matcher.data_intact());
    assert!(tracker.has_status(ALGORITHM_UNSUPPORTED));
}

#[test]
fn unmapped_algorithm() {
    let content = InMemoryContent::new(CONTENT);
    let state = check_binding(&StubCrypto {}, None, &sha256(CONTENT), || content.open());

    assert_eq!(state, BindingState::Unsupported);
    assert!(state.found());
    assert!(!state.intact());
}

#[test]
fn verified_binding_is_taken_as_is() {
    let mut tracker = StatusTracker::default();

    let intact = DeclaredReference::verified(
        DigestMatcherKind::ContainerEntry,
        Some(DigestAlgorithm::Sha256),
        sha256(CONTENT),
        true,
        true,
    );
    let m = evaluate_reference(&StubCrypto {}, "S-1", 0, &intact, &mut tracker).unwrap();
    assert!(m.data_found() && m.data_intact());

    let missing = DeclaredReference::verified(
        DigestMatcherKind::ContainerEntry,
        Some(DigestAlgorithm::Sha256),
        sha256(CONTENT),
        false,
        false,
    );
    let m = evaluate_reference(&StubCrypto {}, "S-1", 1, &missing, &mut tracker).unwrap();
    assert!(!m.data_found() && !m.data_intact());
}

#[test]
fn intact_without_found_is_rejected() {
    let mut tracker = StatusTracker::default();
    let r = DeclaredReference::verified(
        DigestMatcherKind::Reference,
        Some(DigestAlgorithm::Sha256),
        sha256(CONTENT),
        false,
        true,
    )
    .with_name("doc.xml");

    let err = evaluate_reference(&StubCrypto {}, "S-1", 0, &r, &mut tracker).unwrap_err();

    assert!(matches!(
        err,
        Error::InconsistentDigestMatcher { ref signature_id, ref matcher }
            if signature_id == "S-1" && matcher == "S-1/doc.xml"
    ));
}

#[test]
fn intact_implies_found() {
    let sha = Some(DigestAlgorithm::Sha256);
    let references = vec![
        reference(sha, sha256(CONTENT), InMemoryContent::new(CONTENT)),
        reference(sha, vec![1, 2, 3], InMemoryContent::new(CONTENT)),
        reference(sha, sha256(CONTENT), MissingContent::new("x")),
        reference(Some(DigestAlgorithm::Ripemd160), vec![], InMemoryContent::new(CONTENT)),
        reference(None, vec![], TruncatedEntry),
    ];

    let mut tracker = StatusTracker::default();
    for (i, r) in references.iter().enumerate() {
        let m = evaluate_reference(&StubCrypto {}, "S-1", i, r, &mut tracker).unwrap();
        assert!(!m.data_intact() || m.data_found());
    }
}

#[test]
fn kinds() {
    assert!(DigestMatcherKind::Reference.is_content_binding());
    assert!(DigestMatcherKind::JwsPayload.is_content_binding());
    assert!(DigestMatcherKind::ManifestEntry.is_content_binding());
    assert!(!DigestMatcherKind::SignedProperties.is_content_binding());
    assert!(!DigestMatcherKind::MessageImprint.is_content_binding());

    assert_eq!(DigestMatcherKind::SignedProperties.to_string(), "signedProperties");
    assert_eq!(
        serde_json::to_string(&DigestMatcherKind::JwsPayload).unwrap(),
        "\"JWS_PAYLOAD\""
    );
}
