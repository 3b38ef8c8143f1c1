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

//! Digest matcher evaluation.
//!
//! A digest matcher records whether the content covered by one declared
//! binding was found and whether its recomputed digest equals the declared
//! one. `data_intact` always implies `data_found`.

use std::{fmt, io::Read};

use esig_crypto::hash::DigestAlgorithm;
use esig_status_tracker::{log_item, validation_codes::*, StatusTracker};
use log::debug;
use serde::{Deserialize, Serialize, Serializer};

use crate::{
    crypto::CryptoProvider,
    evidence::{DeclaredReference, ReferenceBinding, ResolveError},
    Error, Result,
};

/// What a digest matcher covers.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DigestMatcherKind {
    /// The signed properties (signed attributes) of the signature.
    SignedProperties,

    /// A referenced data object.
    Reference,

    /// The message imprint of a timestamp token.
    MessageImprint,

    /// A manifest listing other data objects.
    Manifest,

    /// One entry of a manifest.
    ManifestEntry,

    /// One entry of a container.
    ContainerEntry,

    /// The message-digest attribute of a CMS signature.
    MessageDigest,

    /// The payload of a JWS signature.
    JwsPayload,
}

impl DigestMatcherKind {
    /// Return `true` if this kind binds the signed content itself, rather
    /// than the signed properties or a timestamp imprint.
    pub fn is_content_binding(&self) -> bool {
        !matches!(self, Self::SignedProperties | Self::MessageImprint)
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::SignedProperties => "signedProperties",
            Self::Reference => "reference",
            Self::MessageImprint => "messageImprint",
            Self::Manifest => "manifest",
            Self::ManifestEntry => "manifestEntry",
            Self::ContainerEntry => "containerEntry",
            Self::MessageDigest => "messageDigest",
            Self::JwsPayload => "jwsPayload",
        }
    }
}

impl fmt::Display for DigestMatcherKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The evaluated state of one declared content binding.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DigestMatcher {
    kind: DigestMatcherKind,

    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,

    digest_algorithm: Option<DigestAlgorithm>,

    #[serde(serialize_with = "serialize_hex")]
    expected_digest: Vec<u8>,

    data_found: bool,

    data_intact: bool,
}

impl DigestMatcher {
    /// Returns what this matcher covers.
    pub fn kind(&self) -> DigestMatcherKind {
        self.kind
    }

    /// Returns the URI or entry name of the covered content, if known.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the declared digest algorithm, if it could be mapped.
    pub fn digest_algorithm(&self) -> Option<DigestAlgorithm> {
        self.digest_algorithm
    }

    /// Returns the declared digest value.
    pub fn expected_digest(&self) -> &[u8] {
        &self.expected_digest
    }

    /// Returns `true` if the covered content was found.
    pub fn data_found(&self) -> bool {
        self.data_found
    }

    /// Returns `true` if the covered content matched the declared digest.
    pub fn data_intact(&self) -> bool {
        self.data_intact
    }

    pub(crate) fn from_state(
        kind: DigestMatcherKind,
        name: Option<String>,
        digest_algorithm: Option<DigestAlgorithm>,
        expected_digest: Vec<u8>,
        state: &BindingState,
    ) -> Self {
        Self {
            kind,
            name,
            digest_algorithm,
            expected_digest,
            data_found: state.found(),
            data_intact: state.intact(),
        }
    }
}

fn serialize_hex<T: AsRef<[u8]>, S: Serializer>(
    bytes: &T,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&hex::encode(bytes.as_ref()))
}

/// Result of checking one binding.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum BindingState {
    /// The covered content could not be resolved.
    NotFound(String),

    /// The declared algorithm is unknown or cannot be computed.
    Unsupported,

    /// The recomputed digest differs from the declared digest.
    Mismatch,

    /// The recomputed digest equals the declared digest.
    Intact,
}

impl BindingState {
    pub(crate) fn found(&self) -> bool {
        !matches!(self, Self::NotFound(_))
    }

    pub(crate) fn intact(&self) -> bool {
        matches!(self, Self::Intact)
    }
}

/// Resolve the covered content with `open` and compare its digest to
/// `expected`.
///
/// Never fails: resolution and read errors make the content not found.
pub(crate) fn check_binding<'a, F>(
    crypto: &dyn CryptoProvider,
    alg: Option<DigestAlgorithm>,
    expected: &[u8],
    open: F,
) -> BindingState
where
    F: FnOnce() -> std::result::Result<Box<dyn Read + 'a>, ResolveError>,
{
    let mut reader = match open() {
        Ok(reader) => reader,
        Err(err) => return BindingState::NotFound(err.to_string()),
    };

    let Some(alg) = alg else {
        return BindingState::Unsupported;
    };

    match crypto.recompute_digest(alg, &mut reader) {
        Ok(Some(digest)) if digest == expected => BindingState::Intact,
        Ok(Some(_)) => BindingState::Mismatch,
        Ok(None) => BindingState::Unsupported,
        Err(err) => BindingState::NotFound(err.to_string()),
    }
}

/// Evaluate one declared binding of signature `signature_id`.
///
/// Only a pre-verified binding claiming `intact` without `found` is an
/// error.
pub(crate) fn evaluate_reference(
    crypto: &dyn CryptoProvider,
    signature_id: &str,
    index: usize,
    reference: &DeclaredReference,
    tracker: &mut StatusTracker,
) -> Result<DigestMatcher> {
    let label = match &reference.name {
        Some(name) => format!("{signature_id}/{name}"),
        None => format!("{signature_id}/{}-{index}", reference.kind),
    };

    let state = match &reference.binding {
        ReferenceBinding::Content(resolver) => check_binding(
            crypto,
            reference.digest_algorithm,
            &reference.expected_digest,
            || resolver.open(),
        ),
        ReferenceBinding::Verified { found, intact } => match (*found, *intact) {
            (false, true) => {
                return Err(Error::InconsistentDigestMatcher {
                    signature_id: signature_id.to_owned(),
                    matcher: label,
                });
            }
            (false, false) => BindingState::NotFound("reported missing by parser".into()),
            (true, true) => BindingState::Intact,
            (true, false) if reference.digest_algorithm.is_none() => BindingState::Unsupported,
            (true, false) => BindingState::Mismatch,
        },
    };

    debug!("{label}: {} binding is {state:?}", reference.kind);

    match &state {
        BindingState::Intact => log_item!(label.clone(), "digest matches", "evaluate_reference")
            .validation_status(DIGEST_MATCHER_INTACT)
            .success(tracker),
        BindingState::Mismatch => log_item!(label.clone(), "digest mismatch", "evaluate_reference")
            .validation_status(DIGEST_MATCHER_MISMATCH)
            .failure(tracker, &state),
        BindingState::Unsupported => log_item!(
            label.clone(),
            "digest algorithm unknown or unsupported",
            "evaluate_reference"
        )
        .validation_status(ALGORITHM_UNSUPPORTED)
        .failure(tracker, &state),
        BindingState::NotFound(_) => {
            log_item!(label.clone(), "covered content not found", "evaluate_reference")
                .validation_status(DIGEST_MATCHER_NOT_FOUND)
                .failure(tracker, &state)
        }
    }

    Ok(DigestMatcher::from_state(
        reference.kind,
        reference.name.clone(),
        reference.digest_algorithm,
        reference.expected_digest.clone(),
        &state,
    ))
}
