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

use esig_status_tracker::{validation_codes::*, StatusTracker};

use crate::{
    certificate::{CertificateVerdict, RevocationStatus},
    outcome::{ConstraintStatus, Indication, SubIndication},
    policy::{
        engine::{evaluate, Facts},
        Constraint, ConstraintRule, FailurePrecedence, Level, ValidationPolicy,
    },
    tests::utils::t,
    Error,
};

fn passing() -> Facts {
    Facts {
        structural_failure: None,
        signing_certificate_identified: true,
        reference_data_intact: true,
        reference_data_found: true,
        signed_properties_intact: true,
        signed_properties_found: true,
        signature_value_intact: true,
        certificate: Some(CertificateVerdict::trusted()),
        reference_time: t("2025-01-01T10:05:00Z"),
        reference_time_proven: true,
        timestamps_consistent: true,
        b_level_attributes_valid: true,
        qualifying_timestamp_present: true,
    }
}

fn outcome_of(policy: &ValidationPolicy, facts: &Facts) -> (Indication, Option<SubIndication>) {
    let mut tracker = StatusTracker::default();
    let outcome = evaluate("S-1", &policy.signature, facts, &mut tracker);
    (outcome.indication(), outcome.sub_indication())
}

fn revoked_at(time: &str) -> Option<CertificateVerdict> {
    Some(CertificateVerdict::trusted().with_revocation_status(RevocationStatus::Revoked {
        revocation_time: t(time),
    }))
}

#[test]
fn presets_are_valid() {
    ValidationPolicy::baseline_b().validate().unwrap();
    ValidationPolicy::baseline_t().validate().unwrap();
    ValidationPolicy::baseline_b()
        .with_precedence(FailurePrecedence::TimestampsFirst)
        .validate()
        .unwrap();
    assert_eq!(ValidationPolicy::default(), ValidationPolicy::baseline_b());
}

fn rejected(break_policy: impl FnOnce(&mut ValidationPolicy)) -> bool {
    let mut policy = ValidationPolicy::baseline_b();
    break_policy(&mut policy);
    matches!(policy.validate(), Err(Error::PolicyConfiguration(_)))
}

#[test]
fn malformed_policies() {
    assert!(rejected(|p| p.name.clear()));
    assert!(rejected(|p| p.version = " ".into()));
    assert!(rejected(|p| p.timestamp.clear()));
    assert!(rejected(|p| {
        p.signature.remove(0);
    }));
    assert!(rejected(|p| p.signature[0].level = Level::Warn));

    // duplicate
    assert!(rejected(|p| {
        p.signature
            .push(ConstraintRule::new(Constraint::BLevelAttributesValid, Level::Inform))
    }));

    // signature-only constraint in the timestamp list
    assert!(rejected(|p| {
        p.timestamp
            .push(ConstraintRule::new(Constraint::QualifyingTimestampPresent, Level::Fail))
    }));

    // out of canonical order
    assert!(rejected(|p| p.signature.swap(2, 3)));
    assert!(rejected(|p| p.precedence = FailurePrecedence::TimestampsFirst));

    assert!(!rejected(|_| {}));
}

#[test]
fn precedence_reorders_rules() {
    let policy = ValidationPolicy::baseline_b().with_precedence(FailurePrecedence::TimestampsFirst);
    let position = |c| policy.signature.iter().position(|r| r.constraint == c).unwrap();

    assert!(
        position(Constraint::TimestampsConsistent) < position(Constraint::CertificateChainTrusted)
    );
    assert!(
        position(Constraint::SignatureValueIntact) < position(Constraint::TimestampsConsistent)
    );
}

#[test]
fn all_passing() {
    let policy = ValidationPolicy::baseline_t();
    let mut tracker = StatusTracker::default();
    let outcome = evaluate("S-1", &policy.signature, &passing(), &mut tracker);

    assert!(outcome.passed());
    assert_eq!(outcome.sub_indication(), None);
    assert_eq!(outcome.constraints().len(), policy.signature.len());
    assert!(!tracker.has_any_error());
}

#[test]
fn format_failure_short_circuits() {
    let facts = Facts {
        structural_failure: Some("truncated".into()),
        reference_data_intact: false,
        ..passing()
    };
    let mut tracker = StatusTracker::default();
    let outcome = evaluate("S-1", &ValidationPolicy::baseline_b().signature, &facts, &mut tracker);

    assert_eq!(outcome.indication(), Indication::Indeterminate);
    assert_eq!(outcome.sub_indication(), Some(SubIndication::FormatFailure));
    assert_eq!(outcome.constraints().len(), 1);
}

#[test]
fn failure_mapping() {
    let policy = ValidationPolicy::baseline_t();
    let cases = [
        (
            Facts { signing_certificate_identified: false, certificate: None, ..passing() },
            Indication::Indeterminate,
            SubIndication::NoSigningCertificateFound,
        ),
        (
            Facts { reference_data_intact: false, ..passing() },
            Indication::TotalFailed,
            SubIndication::HashFailure,
        ),
        (
            Facts { reference_data_found: false, ..passing() },
            Indication::Indeterminate,
            SubIndication::SignedDataNotFound,
        ),
        (
            Facts { signed_properties_intact: false, ..passing() },
            Indication::TotalFailed,
            SubIndication::SigConstraintsFailure,
        ),
        (
            Facts { signed_properties_found: false, ..passing() },
            Indication::Indeterminate,
            SubIndication::SigConstraintsFailure,
        ),
        (
            Facts { signature_value_intact: false, ..passing() },
            Indication::TotalFailed,
            SubIndication::SigCryptoFailure,
        ),
        (
            Facts { certificate: Some(CertificateVerdict::untrusted()), ..passing() },
            Indication::Indeterminate,
            SubIndication::NoCertificateChainFound,
        ),
        (
            Facts { certificate: None, ..passing() },
            Indication::Indeterminate,
            SubIndication::NoCertificateChainFound,
        ),
        (
            Facts {
                certificate: Some(
                    CertificateVerdict::trusted().with_revocation_status(RevocationStatus::Unknown),
                ),
                ..passing()
            },
            Indication::Indeterminate,
            SubIndication::TryLater,
        ),
        (
            Facts {
                certificate: Some(CertificateVerdict::trusted().with_valid_at_signing_time(false)),
                ..passing()
            },
            Indication::Indeterminate,
            SubIndication::OutOfBoundsNotRevoked,
        ),
        (
            Facts { timestamps_consistent: false, ..passing() },
            Indication::Indeterminate,
            SubIndication::TimestampOrderFailure,
        ),
        (
            Facts { qualifying_timestamp_present: false, ..passing() },
            Indication::Indeterminate,
            SubIndication::SigConstraintsFailure,
        ),
    ];

    for (facts, indication, sub_indication) in cases {
        assert_eq!(
            outcome_of(&policy, &facts),
            (indication, Some(sub_indication)),
            "{facts:?}"
        );
    }
}

#[test]
fn revocation() {
    let policy = ValidationPolicy::baseline_b();

    // revoked before the best-signing-time
    let facts = Facts { certificate: revoked_at("2025-01-01T08:00:00Z"), ..passing() };
    assert_eq!(
        outcome_of(&policy, &facts),
        (Indication::TotalFailed, Some(SubIndication::Revoked))
    );

    // revoked exactly at the best-signing-time
    let facts = Facts { certificate: revoked_at("2025-01-01T10:05:00Z"), ..passing() };
    assert_eq!(
        outcome_of(&policy, &facts),
        (Indication::TotalFailed, Some(SubIndication::Revoked))
    );

    // revoked later, signing time proven by a timestamp
    let facts = Facts { certificate: revoked_at("2025-03-01T00:00:00Z"), ..passing() };
    assert_eq!(outcome_of(&policy, &facts), (Indication::TotalPassed, None));

    // revoked later, no proof of existence
    let facts = Facts {
        certificate: revoked_at("2025-03-01T00:00:00Z"),
        reference_time_proven: false,
        ..passing()
    };
    assert_eq!(
        outcome_of(&policy, &facts),
        (Indication::Indeterminate, Some(SubIndication::RevokedNoPoe))
    );

    // revoked before an unproven reference time
    let facts = Facts {
        certificate: revoked_at("2025-01-01T08:00:00Z"),
        reference_time_proven: false,
        ..passing()
    };
    assert_eq!(
        outcome_of(&policy, &facts),
        (Indication::Indeterminate, Some(SubIndication::RevokedNoPoe))
    );
}

#[test]
fn revoked_certificate_skips_validity_check() {
    let facts = Facts {
        certificate: Some(
            CertificateVerdict::trusted()
                .with_valid_at_signing_time(false)
                .with_revocation_status(RevocationStatus::Revoked {
                    revocation_time: t("2025-01-01T08:00:00Z"),
                }),
        ),
        ..passing()
    };
    let mut tracker = StatusTracker::default();
    let outcome = evaluate("S-1", &ValidationPolicy::baseline_b().signature, &facts, &mut tracker);

    assert_eq!(outcome.sub_indication(), Some(SubIndication::Revoked));
    assert_eq!(
        outcome.constraint(Constraint::CertificateValidAtSigningTime).unwrap().status,
        ConstraintStatus::NotApplicable
    );
}

#[test]
fn hash_failure_wins() {
    let facts = Facts {
        reference_data_intact: false,
        reference_data_found: false,
        signature_value_intact: false,
        certificate: Some(CertificateVerdict::untrusted()),
        timestamps_consistent: false,
        ..passing()
    };

    for precedence in [
        FailurePrecedence::CertificateChainFirst,
        FailurePrecedence::TimestampsFirst,
    ] {
        let policy = ValidationPolicy::baseline_b().with_precedence(precedence);
        assert_eq!(
            outcome_of(&policy, &facts),
            (Indication::TotalFailed, Some(SubIndication::HashFailure))
        );
    }
}

#[test]
fn precedence_between_chain_and_timestamps() {
    let facts = Facts {
        certificate: Some(CertificateVerdict::untrusted()),
        timestamps_consistent: false,
        ..passing()
    };

    let policy = ValidationPolicy::baseline_b();
    assert_eq!(
        outcome_of(&policy, &facts).1,
        Some(SubIndication::NoCertificateChainFound)
    );

    let policy = policy.with_precedence(FailurePrecedence::TimestampsFirst);
    assert_eq!(
        outcome_of(&policy, &facts).1,
        Some(SubIndication::TimestampOrderFailure)
    );
}

#[test]
fn warnings_do_not_change_the_indication() {
    let mut policy = ValidationPolicy::baseline_b();
    policy
        .signature
        .iter_mut()
        .filter(|r| r.constraint == Constraint::TimestampsConsistent)
        .for_each(|r| r.level = Level::Inform);

    let facts = Facts {
        b_level_attributes_valid: false,
        timestamps_consistent: false,
        ..passing()
    };
    let mut tracker = StatusTracker::default();
    let outcome = evaluate("S-1", &policy.signature, &facts, &mut tracker);

    assert!(outcome.passed());
    assert_eq!(
        outcome.warnings().map(|c| c.constraint).collect::<Vec<_>>(),
        vec![Constraint::BLevelAttributesValid]
    );
    assert_eq!(
        outcome.infos().map(|c| c.constraint).collect::<Vec<_>>(),
        vec![Constraint::TimestampsConsistent]
    );
    assert!(tracker.has_status_for("S-1", CONSTRAINT_WARNING));
    assert!(tracker.has_status_for("S-1", CONSTRAINT_INFORMATION));
}

#[test]
fn policy_from_json() {
    let json = r#"{
        "name": "custom",
        "version": "2",
        "signature": [
            { "constraint": "format_valid", "level": "fail" },
            { "constraint": "signature_value_intact", "level": "fail" },
            { "constraint": "b_level_attributes_valid", "level": "inform" }
        ],
        "timestamp": [
            { "constraint": "format_valid", "level": "fail" }
        ]
    }"#;

    let policy: ValidationPolicy = serde_json::from_str(json).unwrap();
    policy.validate().unwrap();

    assert_eq!(policy.precedence, FailurePrecedence::CertificateChainFirst);
    assert_eq!(policy.signature[2].level, Level::Inform);
}
