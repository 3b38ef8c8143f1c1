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

//! Timestamp evidence validation.
//!
//! Every timestamp attached to a signature is checked for its message
//! imprint, its token signature and its ordering relative to the objects it
//! covers. The timestamps of one signature are evaluated in coverage order: a
//! timestamp is evaluated after every timestamp it covers.

use std::{
    collections::HashMap,
    io::{self, Read},
};

use chrono::{DateTime, Utc};
use esig_status_tracker::{log_item, validation_codes::*, StatusTracker};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    certificate::{CertificateVerdict, CertificateVerdictSource},
    crypto::CryptoProvider,
    digest_matcher::{check_binding, BindingState, DigestMatcher, DigestMatcherKind},
    evidence::{
        ContentResolver, ImprintSource, ReferenceBinding, ResolveError, SignatureSource,
        TimestampSource,
    },
    Error, Result,
};

/// Timestamp types.
///
/// The declaration order is the tie-break order used when two timestamps
/// prove the same signing time.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub enum TimestampKind {
    /// Covers the signed content, taken before signing.
    #[serde(rename = "CONTENT_TIMESTAMP")]
    Content,

    /// Covers all signed data objects.
    #[serde(rename = "ALL_DATA_OBJECTS_TIMESTAMP")]
    AllDataObjects,

    /// Covers selected signed data objects.
    #[serde(rename = "INDIVIDUAL_DATA_OBJECTS_TIMESTAMP")]
    IndividualDataObjects,

    /// Covers the signature value.
    #[serde(rename = "SIGNATURE_TIMESTAMP")]
    Signature,

    /// Covers the signature value, earlier timestamps and validation data.
    #[serde(rename = "VALIDATION_DATA_TIMESTAMP")]
    ValidationData,

    /// Covers the whole signature, earlier timestamps and validation data.
    #[serde(rename = "ARCHIVE_TIMESTAMP")]
    Archive,

    /// Covers a whole document (e.g. a PDF document timestamp).
    #[serde(rename = "DOCUMENT_TIMESTAMP")]
    Document,
}

impl TimestampKind {
    // Kinds whose derived imprint includes the signature value.
    fn covers_signature_value(&self) -> bool {
        matches!(self, Self::Signature | Self::ValidationData | Self::Archive)
    }
}

/// The evaluated state of one timestamp token.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimestampEvidence {
    id: String,
    kind: TimestampKind,
    production_time: DateTime<Utc>,
    signature_id: String,
    message_imprint: DigestMatcher,
    token_signature_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    tsa_certificate_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tsa_certificate_verdict: Option<CertificateVerdict>,
    #[serde(skip_serializing_if = "Option::is_none")]
    covered_signature_id: Option<String>,
    covered_timestamp_ids: Vec<String>,
    order_failure: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    structural_failure: Option<String>,
}

impl TimestampEvidence {
    /// Returns the timestamp's identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the timestamp type.
    pub fn kind(&self) -> TimestampKind {
        self.kind
    }

    /// Returns the time asserted by the time-stamping authority.
    pub fn production_time(&self) -> DateTime<Utc> {
        self.production_time
    }

    /// Returns the id of the signature this timestamp is attached to.
    pub fn signature_id(&self) -> &str {
        &self.signature_id
    }

    /// Returns the message imprint matcher.
    pub fn message_imprint(&self) -> &DigestMatcher {
        &self.message_imprint
    }

    /// Returns `true` if the data covered by the imprint was found.
    pub fn message_imprint_found(&self) -> bool {
        self.message_imprint.data_found()
    }

    /// Returns `true` if the recomputed imprint equals the stored one.
    pub fn message_imprint_intact(&self) -> bool {
        self.message_imprint.data_intact()
    }

    /// Returns `true` if the token's signature verified.
    pub fn token_signature_valid(&self) -> bool {
        self.token_signature_valid
    }

    /// Returns the id of the time-stamping authority's certificate.
    pub fn tsa_certificate_id(&self) -> Option<&str> {
        self.tsa_certificate_id.as_deref()
    }

    /// Returns the verdict on the time-stamping authority's certificate at
    /// the production time.
    pub fn tsa_certificate_verdict(&self) -> Option<&CertificateVerdict> {
        self.tsa_certificate_verdict.as_ref()
    }

    /// Returns the id of the signature whose value this timestamp covers.
    pub fn covered_signature_id(&self) -> Option<&str> {
        self.covered_signature_id.as_deref()
    }

    /// Returns the ids of the timestamps this timestamp covers.
    pub fn covered_timestamp_ids(&self) -> &[String] {
        &self.covered_timestamp_ids
    }

    /// Returns `true` if the timestamp was not produced strictly after an
    /// object it covers.
    pub fn order_failure(&self) -> bool {
        self.order_failure
    }

    /// Returns the parser-reported structural failure, if any.
    pub fn structural_failure(&self) -> Option<&str> {
        self.structural_failure.as_deref()
    }
}

/// The best-signing-time of a signature and the timestamp proving it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct BestSigningTime {
    pub(crate) time: DateTime<Utc>,
    pub(crate) timestamp_id: String,
}

pub(crate) struct EvaluatedTimestamps {
    /// In declaration order.
    pub(crate) timestamps: Vec<TimestampEvidence>,
    pub(crate) best_signing_time: Option<BestSigningTime>,
}

enum Segment<'a> {
    Bytes(&'a [u8]),
    Content(&'a dyn ContentResolver),
}

fn open_segments<'a>(
    segments: &[Segment<'a>],
) -> std::result::Result<Box<dyn Read + 'a>, ResolveError> {
    let mut reader: Box<dyn Read + 'a> = Box::new(io::empty());
    for segment in segments {
        let next: Box<dyn Read + 'a> = match *segment {
            Segment::Bytes(bytes) => Box::new(bytes),
            Segment::Content(resolver) => resolver.open()?,
        };
        reader = Box::new(reader.chain(next));
    }
    Ok(reader)
}

fn push_references<'a>(
    segments: &mut Vec<Segment<'a>>,
    signature: &'a SignatureSource,
    include: impl Fn(DigestMatcherKind) -> bool,
) -> std::result::Result<(), ResolveError> {
    for reference in signature.references.iter().filter(|r| include(r.kind)) {
        match &reference.binding {
            ReferenceBinding::Content(resolver) => {
                segments.push(Segment::Content(resolver.as_ref()))
            }
            ReferenceBinding::Verified { .. } => {
                return Err(ResolveError::NotFound(format!(
                    "{} content is not resolvable",
                    reference.name.as_deref().unwrap_or("referenced")
                )));
            }
        }
    }
    Ok(())
}

fn push_covered_tokens<'a>(
    segments: &mut Vec<Segment<'a>>,
    timestamp: &TimestampSource,
    by_id: &HashMap<&str, &'a TimestampSource>,
) -> std::result::Result<(), ResolveError> {
    for id in &timestamp.covered_timestamp_ids {
        let covered = by_id
            .get(id.as_str())
            .ok_or_else(|| ResolveError::NotFound(format!("unknown timestamp {id}")))?;
        segments.push(Segment::Bytes(&covered.encoded_token));
    }
    Ok(())
}

// The byte sequence covered by a timestamp whose imprint is derived from its
// kind.
fn derived_segments<'a>(
    timestamp: &TimestampSource,
    signature: &'a SignatureSource,
    by_id: &HashMap<&str, &'a TimestampSource>,
) -> std::result::Result<Vec<Segment<'a>>, ResolveError> {
    let mut segments = Vec::new();

    match timestamp.kind {
        TimestampKind::Content
        | TimestampKind::AllDataObjects
        | TimestampKind::IndividualDataObjects
        | TimestampKind::Document => {
            push_references(&mut segments, signature, |kind| kind.is_content_binding())?;
        }
        TimestampKind::Signature => {
            segments.push(Segment::Bytes(&signature.signature_value));
        }
        TimestampKind::ValidationData => {
            segments.push(Segment::Bytes(&signature.signature_value));
            push_covered_tokens(&mut segments, timestamp, by_id)?;
            segments.push(Segment::Bytes(&signature.validation_data));
        }
        TimestampKind::Archive => {
            push_references(&mut segments, signature, |kind| kind.is_content_binding())?;
            push_references(&mut segments, signature, |kind| {
                kind == DigestMatcherKind::SignedProperties
            })?;
            segments.push(Segment::Bytes(&signature.signature_value));
            push_covered_tokens(&mut segments, timestamp, by_id)?;
            segments.push(Segment::Bytes(&signature.validation_data));
        }
    }

    Ok(segments)
}

/// Return the evaluation order of `timestamps`: every timestamp comes after
/// the timestamps it covers, otherwise declaration order is kept.
pub(crate) fn coverage_order(
    signature_id: &str,
    timestamps: &[TimestampSource],
) -> Result<Vec<usize>> {
    let index: HashMap<&str, usize> = timestamps
        .iter()
        .enumerate()
        .map(|(i, ts)| (ts.id.as_str(), i))
        .collect();

    let mut pending = vec![0usize; timestamps.len()];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); timestamps.len()];
    for (i, ts) in timestamps.iter().enumerate() {
        for covered in &ts.covered_timestamp_ids {
            if let Some(&j) = index.get(covered.as_str()) {
                pending[i] += 1;
                dependents[j].push(i);
            }
        }
    }

    let mut done = vec![false; timestamps.len()];
    let mut order = Vec::with_capacity(timestamps.len());
    while order.len() < timestamps.len() {
        let Some(next) = (0..timestamps.len()).find(|&i| !done[i] && pending[i] == 0) else {
            return Err(Error::CoverageCycle {
                signature_id: signature_id.to_owned(),
            });
        };

        done[next] = true;
        order.push(next);
        for &dependent in &dependents[next] {
            pending[dependent] -= 1;
        }
    }

    Ok(order)
}

/// Evaluate every timestamp attached to `signature` and derive its
/// best-signing-time.
pub(crate) fn evaluate_timestamps(
    crypto: &dyn CryptoProvider,
    certificates: &dyn CertificateVerdictSource,
    signature: &SignatureSource,
    tracker: &mut StatusTracker,
) -> Result<EvaluatedTimestamps> {
    let mut by_id: HashMap<&str, &TimestampSource> = HashMap::new();
    for ts in &signature.timestamps {
        if by_id.insert(ts.id.as_str(), ts).is_some() {
            return Err(Error::DuplicateId {
                kind: "timestamp",
                id: ts.id.clone(),
            });
        }
    }

    let order = coverage_order(&signature.id, &signature.timestamps)?;

    let mut evaluated: Vec<Option<TimestampEvidence>> = vec![None; signature.timestamps.len()];
    let mut covers_signature: HashMap<&str, bool> = HashMap::new();
    let mut candidates: Vec<(DateTime<Utc>, TimestampKind, usize)> = Vec::new();

    for i in order {
        let ts = &signature.timestamps[i];
        let label = ts.id.as_str();

        // message imprint
        let state = match &ts.imprint_source {
            ImprintSource::Detached(resolver) => {
                check_binding(crypto, ts.imprint_algorithm, &ts.imprint_digest, || resolver.open())
            }
            ImprintSource::Derived => match derived_segments(ts, signature, &by_id) {
                Ok(segments) => check_binding(crypto, ts.imprint_algorithm, &ts.imprint_digest, || {
                    open_segments(&segments)
                }),
                Err(err) => BindingState::NotFound(err.to_string()),
            },
        };
        log_imprint(label, &state, tracker);

        // token signature
        let token_signature_valid = match (&ts.tsa_certificate, ts.token_signature_algorithm) {
            (Some(cert), Some(alg)) => crypto.verify_signature(
                alg,
                &cert.public_key,
                &ts.token_signed_data,
                &ts.token_signature_value,
            ),
            _ => false,
        };
        if token_signature_valid {
            log_item!(
                label.to_owned(),
                "time-stamp token signature verified",
                "evaluate_timestamps"
            )
            .validation_status(TIMESTAMP_VALIDATED)
            .success(tracker);
        } else {
            log_item!(
                label.to_owned(),
                "time-stamp token signature did not verify",
                "evaluate_timestamps"
            )
            .validation_status(TIMESTAMP_SIGNATURE_INVALID)
            .failure(tracker, "token signature invalid");
        }

        // ordering
        let mut order_failure = false;
        for covered_id in &ts.covered_timestamp_ids {
            if let Some(covered) = by_id.get(covered_id.as_str()) {
                if covered.production_time >= ts.production_time {
                    debug!(
                        "{label} produced at {} does not follow {covered_id} produced at {}",
                        ts.production_time, covered.production_time
                    );
                    order_failure = true;
                }
            }
        }
        if ts.kind == TimestampKind::Archive {
            if let Some(claimed) = signature.claimed_signing_time {
                if claimed >= ts.production_time {
                    debug!("{label} does not follow the claimed signing time {claimed}");
                    order_failure = true;
                }
            }
        }
        if order_failure {
            log_item!(
                label.to_owned(),
                "timestamp is not younger than the objects it covers",
                "evaluate_timestamps"
            )
            .validation_status(TIMESTAMP_ORDER_FAILURE)
            .failure(tracker, "timestamp order failure");
        } else {
            log_item!(
                label.to_owned(),
                "timestamp follows the objects it covers",
                "evaluate_timestamps"
            )
            .validation_status(TIMESTAMP_ORDER_CONSISTENT)
            .success(tracker);
        }

        // coverage of the signature value, directly or through a covered
        // timestamp
        let direct = ts.kind.covers_signature_value()
            && matches!(ts.imprint_source, ImprintSource::Derived)
            && ts
                .covered_signature_id
                .as_deref()
                .map_or(true, |id| id == signature.id);
        let transitive = ts
            .covered_timestamp_ids
            .iter()
            .any(|id| covers_signature.get(id.as_str()).copied().unwrap_or(false));
        covers_signature.insert(label, direct || transitive);

        if state.intact()
            && token_signature_valid
            && !order_failure
            && ts.structural_failure.is_none()
            && (direct || transitive)
        {
            candidates.push((ts.production_time, ts.kind, i));
        }

        let tsa_certificate_verdict = ts
            .tsa_certificate
            .as_ref()
            .and_then(|cert| certificates.verdict_for(&cert.id, ts.production_time));

        evaluated[i] = Some(TimestampEvidence {
            id: ts.id.clone(),
            kind: ts.kind,
            production_time: ts.production_time,
            signature_id: signature.id.clone(),
            message_imprint: DigestMatcher::from_state(
                DigestMatcherKind::MessageImprint,
                None,
                ts.imprint_algorithm,
                ts.imprint_digest.clone(),
                &state,
            ),
            token_signature_valid,
            tsa_certificate_id: ts.tsa_certificate.as_ref().map(|cert| cert.id.clone()),
            tsa_certificate_verdict,
            covered_signature_id: ts.covered_signature_id.clone(),
            covered_timestamp_ids: ts.covered_timestamp_ids.clone(),
            order_failure,
            structural_failure: ts.structural_failure.clone(),
        });
    }

    let best_signing_time = candidates
        .into_iter()
        .min()
        .map(|(time, _, i)| BestSigningTime {
            time,
            timestamp_id: signature.timestamps[i].id.clone(),
        });

    Ok(EvaluatedTimestamps {
        timestamps: evaluated.into_iter().flatten().collect(),
        best_signing_time,
    })
}

fn log_imprint(label: &str, state: &BindingState, tracker: &mut StatusTracker) {
    match state {
        BindingState::Intact => log_item!(
            label.to_owned(),
            "message imprint matches",
            "evaluate_timestamps"
        )
        .validation_status(TIMESTAMP_IMPRINT_MATCH)
        .success(tracker),
        BindingState::Mismatch => log_item!(
            label.to_owned(),
            "message imprint mismatch",
            "evaluate_timestamps"
        )
        .validation_status(TIMESTAMP_IMPRINT_MISMATCH)
        .failure(tracker, state),
        BindingState::Unsupported => log_item!(
            label.to_owned(),
            "message imprint algorithm unknown or unsupported",
            "evaluate_timestamps"
        )
        .validation_status(ALGORITHM_UNSUPPORTED)
        .failure(tracker, state),
        BindingState::NotFound(_) => log_item!(
            label.to_owned(),
            "time-stamped data not found",
            "evaluate_timestamps"
        )
        .validation_status(TIMESTAMP_IMPRINT_NOT_FOUND)
        .failure(tracker, state),
    }
}
