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

use chrono::{DateTime, Utc};
use esig_crypto::{
    hash::DigestAlgorithm,
    raw_signature::{EncryptionAlgorithm, SignatureAlgorithm},
};
use esig_status_tracker::{log_item, validation_codes::*, LogItem, StatusTracker};
use log::debug;
use serde::Serialize;

use crate::{
    certificate::{CertificateVerdict, CertificateVerdictSource, RevocationStatus},
    crypto::CryptoProvider,
    digest_matcher::{evaluate_reference, DigestMatcher, DigestMatcherKind},
    evidence::{PayloadEncoding, SignatureSource},
    outcome::{TimestampOutcome, ValidationOutcome},
    policy::{
        engine::{self, Facts},
        ValidationPolicy,
    },
    timestamp::{evaluate_timestamps, TimestampEvidence, TimestampKind},
    Result,
};

/// The evaluated state of one signature.
///
/// Timestamps are referenced by id. The timestamps themselves are held by the
/// [`DiagnosticData`](crate::DiagnosticData).
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureEvidence {
    id: String,
    digest_algorithm: Option<DigestAlgorithm>,
    encryption_algorithm: Option<EncryptionAlgorithm>,
    #[serde(skip_serializing_if = "Option::is_none")]
    signature_algorithm: Option<SignatureAlgorithm>,
    digest_matchers: Vec<DigestMatcher>,
    signature_value_intact: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    signing_certificate_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    signing_certificate_verdict: Option<CertificateVerdict>,
    timestamp_ids: Vec<String>,
    b_level_attributes_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    claimed_signing_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    best_signing_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    best_signing_time_timestamp_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    structural_failure: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    payload_encoding: Option<PayloadEncoding>,
}

impl SignatureEvidence {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn digest_algorithm(&self) -> Option<DigestAlgorithm> {
        self.digest_algorithm
    }

    /// Returns the encryption algorithm, with plain ECDSA reported as ECDSA.
    pub fn encryption_algorithm(&self) -> Option<EncryptionAlgorithm> {
        self.encryption_algorithm
    }

    /// Returns the signature algorithm named by the declared encryption and
    /// digest algorithms, if it exists.
    pub fn signature_algorithm(&self) -> Option<SignatureAlgorithm> {
        self.signature_algorithm
    }

    /// Returns every digest matcher, in declaration order.
    pub fn digest_matchers(&self) -> &[DigestMatcher] {
        &self.digest_matchers
    }

    /// Returns the digest matchers of `kind`.
    pub fn digest_matchers_of(
        &self,
        kind: DigestMatcherKind,
    ) -> impl Iterator<Item = &DigestMatcher> {
        self.digest_matchers.iter().filter(move |m| m.kind() == kind)
    }

    pub fn signature_value_intact(&self) -> bool {
        self.signature_value_intact
    }

    pub fn signing_certificate_id(&self) -> Option<&str> {
        self.signing_certificate_id.as_deref()
    }

    /// Returns the verdict on the signing certificate at the
    /// best-signing-time.
    pub fn signing_certificate_verdict(&self) -> Option<&CertificateVerdict> {
        self.signing_certificate_verdict.as_ref()
    }

    /// Returns the ids of the attached timestamps, in declaration order.
    pub fn timestamp_ids(&self) -> &[String] {
        &self.timestamp_ids
    }

    pub fn b_level_attributes_valid(&self) -> bool {
        self.b_level_attributes_valid
    }

    pub fn claimed_signing_time(&self) -> Option<DateTime<Utc>> {
        self.claimed_signing_time
    }

    /// Returns the earliest time at which the signature is proven to have
    /// existed, if a timestamp proves one.
    pub fn best_signing_time(&self) -> Option<DateTime<Utc>> {
        self.best_signing_time
    }

    /// Returns the id of the timestamp proving the best-signing-time.
    pub fn best_signing_time_timestamp_id(&self) -> Option<&str> {
        self.best_signing_time_timestamp_id.as_deref()
    }

    pub fn structural_failure(&self) -> Option<&str> {
        self.structural_failure.as_deref()
    }

    pub fn payload_encoding(&self) -> Option<PayloadEncoding> {
        self.payload_encoding
    }
}

/// Everything produced by validating one signature.
pub(crate) struct SignatureRun {
    pub(crate) evidence: SignatureEvidence,
    pub(crate) outcome: ValidationOutcome,
    pub(crate) timestamps: Vec<(TimestampEvidence, ValidationOutcome)>,

    /// Certificate verdicts in query order.
    pub(crate) certificates: Vec<(String, CertificateVerdict)>,

    pub(crate) log: Vec<LogItem>,
}

fn timestamp_facts(ts: &TimestampEvidence) -> Facts {
    Facts {
        structural_failure: ts.structural_failure().map(str::to_owned),
        signing_certificate_identified: ts.tsa_certificate_id().is_some(),
        reference_data_intact: !ts.message_imprint_found() || ts.message_imprint_intact(),
        reference_data_found: ts.message_imprint_found(),
        signed_properties_intact: true,
        signed_properties_found: true,
        signature_value_intact: ts.token_signature_valid(),
        certificate: ts.tsa_certificate_verdict().copied(),
        reference_time: ts.production_time(),
        reference_time_proven: true,
        timestamps_consistent: !ts.order_failure(),
        b_level_attributes_valid: true,
        qualifying_timestamp_present: true,
    }
}

// (intact, found) over the matchers selected by `include`.
fn matcher_state(
    matchers: &[DigestMatcher],
    include: impl Fn(DigestMatcherKind) -> bool,
) -> (bool, bool) {
    matchers
        .iter()
        .filter(|m| include(m.kind()))
        .fold((true, true), |(intact, found), m| {
            (
                intact && (!m.data_found() || m.data_intact()),
                found && m.data_found(),
            )
        })
}

/// Validate one signature and its timestamps.
pub(crate) fn validate_signature(
    source: &SignatureSource,
    policy: &ValidationPolicy,
    crypto: &dyn CryptoProvider,
    certificates: &dyn CertificateVerdictSource,
    validation_time: DateTime<Utc>,
) -> Result<SignatureRun> {
    let mut tracker = StatusTracker::default();
    tracker.push_current_label(source.id.clone());

    let mut structural_failure = source.structural_failure.clone();
    if let Some(failure) = &structural_failure {
        log_item!("", "signature could not be parsed", "validate_signature")
            .validation_status(FORMAT_MALFORMED)
            .failure(&mut tracker, failure);
    }

    let digest_matchers = source
        .references
        .iter()
        .enumerate()
        .map(|(index, reference)| {
            evaluate_reference(crypto, &source.id, index, reference, &mut tracker)
        })
        .collect::<Result<Vec<_>>>()?;

    if source.signed_properties_mandated {
        let count = digest_matchers
            .iter()
            .filter(|m| m.kind() == DigestMatcherKind::SignedProperties)
            .count();
        if count != 1 {
            let failure = format!("expected one signed-properties binding, found {count}");
            log_item!("", "signed properties binding missing or repeated", "validate_signature")
                .validation_status(FORMAT_MALFORMED)
                .failure(&mut tracker, &failure);
            structural_failure.get_or_insert(failure);
        }
    }

    let signature_algorithm = source.signature_algorithm();
    let signature_value_intact = match (signature_algorithm, &source.signing_certificate) {
        (Some(alg), Some(cert)) => crypto.verify_signature(
            alg,
            &cert.public_key,
            &source.signed_data,
            &source.signature_value,
        ),
        (None, _) => {
            log_item!("", "signature algorithm unknown or unsupported", "validate_signature")
                .validation_status(ALGORITHM_UNSUPPORTED)
                .failure(&mut tracker, (source.encryption_algorithm, source.digest_algorithm));
            false
        }
        (Some(_), None) => false,
    };
    if signature_value_intact {
        log_item!("", "signature value verified", "validate_signature")
            .validation_status(SIGNATURE_VALUE_VALIDATED)
            .success(&mut tracker);
    } else {
        log_item!("", "signature value did not verify", "validate_signature")
            .validation_status(SIGNATURE_VALUE_INVALID)
            .failure(&mut tracker, "signature value invalid");
    }

    let evaluated = evaluate_timestamps(crypto, certificates, source, &mut tracker)?;

    let mut certificates_seen = Vec::new();
    let mut timestamps = Vec::with_capacity(evaluated.timestamps.len());
    for ts in evaluated.timestamps {
        if let (Some(id), Some(verdict)) = (ts.tsa_certificate_id(), ts.tsa_certificate_verdict()) {
            certificates_seen.push((id.to_owned(), *verdict));
        }
        let outcome = engine::evaluate(
            ts.id(),
            &policy.timestamp,
            &timestamp_facts(&ts),
            &mut tracker,
        );
        timestamps.push((ts, outcome));
    }

    // the best-signing-time is a reliable proof of existence only if the
    // proving timestamp passes on its own
    let best_signing_time = evaluated.best_signing_time;
    let reference_time_proven = best_signing_time.as_ref().is_some_and(|bst| {
        timestamps
            .iter()
            .any(|(ts, outcome)| ts.id() == bst.timestamp_id && outcome.passed())
    });
    match &best_signing_time {
        Some(bst) if reference_time_proven => {
            log_item!("", "best-signing-time proven by timestamp", "validate_signature")
                .validation_status(BEST_SIGNING_TIME_PROVEN)
                .success(&mut tracker);
            debug!("{}: best-signing-time {} proven by {}", source.id, bst.time, bst.timestamp_id);
        }
        _ => log_item!("", "no reliable proof of existence", "validate_signature")
            .validation_status(BEST_SIGNING_TIME_UNPROVEN)
            .informational(&mut tracker),
    }
    let reference_time = best_signing_time
        .as_ref()
        .map_or(validation_time, |bst| bst.time);

    let signing_certificate_verdict = match &source.signing_certificate {
        Some(cert) => {
            let verdict = certificates.verdict_for(&cert.id, reference_time);
            if let Some(verdict) = verdict {
                certificates_seen.insert(0, (cert.id.clone(), verdict));
            }
            log_verdict(verdict.as_ref(), &mut tracker);
            verdict
        }
        None => {
            log_item!("", "signing certificate not identified", "validate_signature")
                .validation_status(SIGNING_CREDENTIAL_MISSING)
                .failure(&mut tracker, "no signing certificate");
            None
        }
    };

    let (reference_data_intact, reference_data_found) =
        matcher_state(&digest_matchers, |kind| kind.is_content_binding());
    let (signed_properties_intact, signed_properties_found) =
        matcher_state(&digest_matchers, |kind| kind == DigestMatcherKind::SignedProperties);

    let facts = Facts {
        structural_failure: structural_failure.clone(),
        signing_certificate_identified: source.signing_certificate.is_some(),
        reference_data_intact,
        reference_data_found,
        signed_properties_intact,
        signed_properties_found,
        signature_value_intact,
        certificate: signing_certificate_verdict,
        reference_time,
        reference_time_proven,
        timestamps_consistent: timestamps.iter().all(|(ts, _)| {
            (!ts.message_imprint_found() || ts.message_imprint_intact()) && !ts.order_failure()
        }),
        b_level_attributes_valid: source.b_level_attributes_valid,
        qualifying_timestamp_present: timestamps.iter().any(|(ts, outcome)| {
            matches!(ts.kind(), TimestampKind::Signature | TimestampKind::Archive)
                && outcome.passed()
        }),
    };

    let outcome = engine::evaluate(&source.id, &policy.signature, &facts, &mut tracker)
        .with_timestamps(
            timestamps
                .iter()
                .map(|(ts, outcome)| TimestampOutcome {
                    id: ts.id().to_owned(),
                    outcome: outcome.clone(),
                })
                .collect(),
        );

    tracker.pop_current_label();

    let evidence = SignatureEvidence {
        id: source.id.clone(),
        digest_algorithm: source.digest_algorithm,
        encryption_algorithm: source.encryption_algorithm.map(|alg| alg.canonical()),
        signature_algorithm,
        digest_matchers,
        signature_value_intact,
        signing_certificate_id: source.signing_certificate.as_ref().map(|c| c.id.clone()),
        signing_certificate_verdict,
        timestamp_ids: source.timestamps.iter().map(|ts| ts.id.clone()).collect(),
        b_level_attributes_valid: source.b_level_attributes_valid,
        claimed_signing_time: source.claimed_signing_time,
        best_signing_time: best_signing_time.as_ref().map(|bst| bst.time),
        best_signing_time_timestamp_id: best_signing_time.map(|bst| bst.timestamp_id),
        structural_failure,
        payload_encoding: source.payload_encoding,
    };

    Ok(SignatureRun {
        evidence,
        outcome,
        timestamps,
        certificates: certificates_seen,
        log: tracker.into_items(),
    })
}

fn log_verdict(verdict: Option<&CertificateVerdict>, tracker: &mut StatusTracker) {
    let Some(verdict) = verdict else {
        log_item!("", "signing certificate unknown to the verdict source", "validate_signature")
            .validation_status(SIGNING_CREDENTIAL_UNTRUSTED)
            .failure(tracker, "unknown certificate");
        return;
    };

    if verdict.trusted_path_found {
        log_item!("", "signing certificate chains to a trust anchor", "validate_signature")
            .validation_status(SIGNING_CREDENTIAL_TRUSTED)
            .success(tracker);
    } else {
        log_item!("", "no trusted path for the signing certificate", "validate_signature")
            .validation_status(SIGNING_CREDENTIAL_UNTRUSTED)
            .failure(tracker, "untrusted");
    }

    match verdict.revocation_status {
        RevocationStatus::Good => {
            log_item!("", "signing certificate not revoked", "validate_signature")
                .validation_status(SIGNING_CREDENTIAL_NOT_REVOKED)
                .success(tracker);
        }
        RevocationStatus::Revoked { revocation_time } => {
            log_item!("", "signing certificate revoked", "validate_signature")
                .validation_status(SIGNING_CREDENTIAL_REVOKED)
                .failure(tracker, revocation_time);
        }
        RevocationStatus::Unknown => {
            log_item!("", "revocation status unknown", "validate_signature")
                .validation_status(SIGNING_CREDENTIAL_REVOCATION_UNKNOWN)
                .failure(tracker, "unknown revocation status");
        }
    }

    if !verdict.valid_at_signing_time {
        log_item!("", "signing certificate outside its validity period", "validate_signature")
            .validation_status(SIGNING_CREDENTIAL_EXPIRED)
            .failure(tracker, "out of validity period");
    }
}
