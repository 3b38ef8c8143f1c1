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
use esig_status_tracker::{log_item, validation_codes::*, StatusTracker};
use log::debug;

use crate::{
    certificate::{CertificateVerdict, RevocationStatus},
    outcome::{ConstraintResult, ConstraintStatus, Indication, SubIndication, ValidationOutcome},
    policy::{Constraint, ConstraintRule, Level},
};

/// Everything the policy engine needs to know about one signature or
/// timestamp.
///
/// The engine never looks at raw evidence, so signatures and timestamps are
/// evaluated by the same code.
#[derive(Clone, Debug)]
pub(crate) struct Facts {
    pub(crate) structural_failure: Option<String>,
    pub(crate) signing_certificate_identified: bool,

    /// No content binding found with a mismatching digest.
    pub(crate) reference_data_intact: bool,
    pub(crate) reference_data_found: bool,

    pub(crate) signed_properties_intact: bool,
    pub(crate) signed_properties_found: bool,

    pub(crate) signature_value_intact: bool,

    pub(crate) certificate: Option<CertificateVerdict>,

    /// Best-signing-time of a signature, production time of a timestamp.
    pub(crate) reference_time: DateTime<Utc>,

    /// The reference time is proven by a reliable proof of existence.
    pub(crate) reference_time_proven: bool,

    pub(crate) timestamps_consistent: bool,
    pub(crate) b_level_attributes_valid: bool,
    pub(crate) qualifying_timestamp_present: bool,
}

enum Check {
    Pass,
    NotApplicable,
    Fail(Indication, SubIndication),
}

fn check(constraint: Constraint, facts: &Facts) -> Check {
    use Indication::{Indeterminate, TotalFailed};

    let require = |ok: bool, indication, sub_indication| {
        if ok {
            Check::Pass
        } else {
            Check::Fail(indication, sub_indication)
        }
    };

    if constraint.is_certificate_check()
        && constraint != Constraint::CertificateChainTrusted
        && facts.certificate.is_none()
    {
        return Check::NotApplicable;
    }

    match constraint {
        Constraint::FormatValid => require(
            facts.structural_failure.is_none(),
            Indeterminate,
            SubIndication::FormatFailure,
        ),
        Constraint::SigningCertificateIdentified => require(
            facts.signing_certificate_identified,
            Indeterminate,
            SubIndication::NoSigningCertificateFound,
        ),
        Constraint::ReferenceDataIntact => require(
            facts.reference_data_intact,
            TotalFailed,
            SubIndication::HashFailure,
        ),
        Constraint::ReferenceDataFound => require(
            facts.reference_data_found,
            Indeterminate,
            SubIndication::SignedDataNotFound,
        ),
        Constraint::SignedPropertiesIntact => require(
            facts.signed_properties_intact,
            TotalFailed,
            SubIndication::SigConstraintsFailure,
        ),
        Constraint::SignedPropertiesFound => require(
            facts.signed_properties_found,
            Indeterminate,
            SubIndication::SigConstraintsFailure,
        ),
        Constraint::SignatureValueIntact => require(
            facts.signature_value_intact,
            TotalFailed,
            SubIndication::SigCryptoFailure,
        ),
        Constraint::CertificateChainTrusted => require(
            facts.certificate.is_some_and(|c| c.trusted_path_found),
            Indeterminate,
            SubIndication::NoCertificateChainFound,
        ),
        Constraint::CertificateNotRevoked => match facts.certificate.map(|c| c.revocation_status) {
            // without a proven reference time nothing places the signature
            // before the revocation, nor after it
            Some(RevocationStatus::Revoked { .. }) if !facts.reference_time_proven => {
                Check::Fail(Indeterminate, SubIndication::RevokedNoPoe)
            }
            Some(RevocationStatus::Revoked { revocation_time }) => {
                if revocation_time <= facts.reference_time {
                    Check::Fail(TotalFailed, SubIndication::Revoked)
                } else {
                    Check::Pass
                }
            }
            Some(RevocationStatus::Good) => Check::Pass,
            _ => Check::NotApplicable,
        },
        Constraint::RevocationStatusKnown => require(
            !matches!(
                facts.certificate.map(|c| c.revocation_status),
                Some(RevocationStatus::Unknown)
            ),
            Indeterminate,
            SubIndication::TryLater,
        ),
        Constraint::CertificateValidAtSigningTime => match facts.certificate {
            Some(CertificateVerdict {
                revocation_status: RevocationStatus::Revoked { .. },
                ..
            }) => Check::NotApplicable,
            Some(verdict) => require(
                verdict.valid_at_signing_time,
                Indeterminate,
                SubIndication::OutOfBoundsNotRevoked,
            ),
            None => Check::NotApplicable,
        },
        Constraint::TimestampsConsistent => require(
            facts.timestamps_consistent,
            Indeterminate,
            SubIndication::TimestampOrderFailure,
        ),
        Constraint::BLevelAttributesValid => require(
            facts.b_level_attributes_valid,
            Indeterminate,
            SubIndication::SigConstraintsFailure,
        ),
        Constraint::QualifyingTimestampPresent => require(
            facts.qualifying_timestamp_present,
            Indeterminate,
            SubIndication::SigConstraintsFailure,
        ),
    }
}

/// Apply `rules` in order to `facts`.
///
/// The first failing Fail-level rule decides the indication. A format
/// failure stops the evaluation.
pub(crate) fn evaluate(
    label: &str,
    rules: &[ConstraintRule],
    facts: &Facts,
    tracker: &mut StatusTracker,
) -> ValidationOutcome {
    let mut results = Vec::with_capacity(rules.len());
    let mut decided: Option<(Indication, SubIndication)> = None;

    for rule in rules {
        let (status, sub_indication) = match check(rule.constraint, facts) {
            Check::Pass => (ConstraintStatus::Passed, None),
            Check::NotApplicable => (ConstraintStatus::NotApplicable, None),
            Check::Fail(indication, sub_indication) => {
                match rule.level {
                    Level::Fail => {
                        log_item!(label.to_owned(), "constraint failed", "evaluate")
                            .validation_status(CONSTRAINT_FAILURE)
                            .failure(tracker, rule.constraint);
                        if decided.is_none() {
                            decided = Some((indication, sub_indication));
                        }
                    }
                    Level::Warn => log_item!(label.to_owned(), "constraint failed", "evaluate")
                        .validation_status(CONSTRAINT_WARNING)
                        .informational(tracker),
                    Level::Inform => {
                        log_item!(label.to_owned(), "constraint failed", "evaluate")
                            .validation_status(CONSTRAINT_INFORMATION)
                            .informational(tracker)
                    }
                }
                (ConstraintStatus::Failed, Some(sub_indication))
            }
        };

        debug!("{label}: {:?} is {status:?}", rule.constraint);

        results.push(ConstraintResult {
            constraint: rule.constraint,
            level: rule.level,
            status,
            sub_indication,
        });

        if rule.constraint == Constraint::FormatValid && status == ConstraintStatus::Failed {
            break;
        }
    }

    match decided {
        Some((indication, sub_indication)) => {
            ValidationOutcome::new(indication, Some(sub_indication), results)
        }
        None => ValidationOutcome::new(Indication::TotalPassed, None, results),
    }
}
