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

//! Declarative validation policies.
//!
//! A [`ValidationPolicy`] lists the constraints applied to signatures and to
//! timestamps, each with a [`Level`]. The first failing Fail-level
//! constraint, in list order, decides the outcome. Warn- and Inform-level
//! failures are recorded without changing the indication.
//!
//! Policies are plain configuration data and are usually loaded from
//! [`Settings`](crate::Settings):
//!
//! ```toml
//! [policy]
//! name = "custom"
//! version = "1"
//! precedence = "certificate_chain_first"
//!
//! [[policy.signature]]
//! constraint = "format_valid"
//! level = "fail"
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub(crate) mod engine;

/// How a failing constraint affects the outcome.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    /// The failure decides the outcome.
    Fail,

    /// The failure is reported as a warning.
    Warn,

    /// The failure is reported as information.
    Inform,
}

/// A single policy check.
///
/// The declaration order is the canonical evaluation order under
/// [`FailurePrecedence::CertificateChainFirst`].
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Constraint {
    /// The parser reported no structural failure.
    FormatValid,

    /// A signing certificate was identified.
    SigningCertificateIdentified,

    /// No content binding was found with a mismatching digest.
    ReferenceDataIntact,

    /// The content of every content binding was found.
    ReferenceDataFound,

    /// No signed-properties binding was found with a mismatching digest.
    SignedPropertiesIntact,

    /// The signed properties were found.
    SignedPropertiesFound,

    /// The signature value verified.
    SignatureValueIntact,

    /// A path to a trust anchor was found for the signing certificate.
    CertificateChainTrusted,

    /// The signing certificate was not revoked before the reference time.
    CertificateNotRevoked,

    /// The revocation status of the signing certificate is known.
    RevocationStatusKnown,

    /// The signing certificate was valid at the reference time.
    CertificateValidAtSigningTime,

    /// The attached timestamps are intact and correctly ordered.
    TimestampsConsistent,

    /// The signer-claimed attributes are valid.
    BLevelAttributesValid,

    /// A passing signature or archive timestamp is attached.
    QualifyingTimestampPresent,
}

impl Constraint {
    /// Return `true` if the constraint only makes sense for signatures.
    pub fn signature_only(&self) -> bool {
        matches!(
            self,
            Self::SignedPropertiesIntact
                | Self::SignedPropertiesFound
                | Self::BLevelAttributesValid
                | Self::QualifyingTimestampPresent
        )
    }

    pub(crate) fn is_certificate_check(&self) -> bool {
        matches!(
            self,
            Self::CertificateChainTrusted
                | Self::CertificateNotRevoked
                | Self::RevocationStatusKnown
                | Self::CertificateValidAtSigningTime
        )
    }

    // Position in the canonical order for `precedence`.
    fn rank(&self, precedence: FailurePrecedence) -> u32 {
        let base = *self as u32 * 2;
        match (precedence, self) {
            (FailurePrecedence::TimestampsFirst, Self::TimestampsConsistent) => {
                Self::CertificateChainTrusted as u32 * 2 - 1
            }
            _ => base,
        }
    }
}

/// Which failure is reported when a signature has both a certificate-chain
/// failure and a timestamp-consistency failure.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePrecedence {
    /// Certificate checks are evaluated before timestamp consistency.
    #[default]
    CertificateChainFirst,

    /// Timestamp consistency is evaluated before certificate checks.
    TimestampsFirst,
}

/// One policy entry.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ConstraintRule {
    pub constraint: Constraint,
    pub level: Level,
}

impl ConstraintRule {
    pub fn new(constraint: Constraint, level: Level) -> Self {
        Self { constraint, level }
    }
}

/// The constraints applied to signatures and timestamps.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ValidationPolicy {
    /// Policy name, reported in the diagnostic data.
    pub name: String,

    /// Policy version, reported in the diagnostic data.
    pub version: String,

    #[serde(default)]
    pub precedence: FailurePrecedence,

    /// Constraints applied to each signature, in evaluation order.
    pub signature: Vec<ConstraintRule>,

    /// Constraints applied to each timestamp, in evaluation order.
    pub timestamp: Vec<ConstraintRule>,
}

impl ValidationPolicy {
    /// The basic signature policy: every structural, cryptographic,
    /// certificate and timestamp check at Fail level, signer attributes at
    /// Warn level.
    pub fn baseline_b() -> Self {
        use Constraint::*;

        let fail = |constraint| ConstraintRule::new(constraint, Level::Fail);

        let timestamp = vec![
            fail(FormatValid),
            fail(SigningCertificateIdentified),
            fail(ReferenceDataIntact),
            fail(ReferenceDataFound),
            fail(SignatureValueIntact),
            fail(CertificateChainTrusted),
            fail(CertificateNotRevoked),
            fail(RevocationStatusKnown),
            fail(CertificateValidAtSigningTime),
            fail(TimestampsConsistent),
        ];

        let signature = vec![
            fail(FormatValid),
            fail(SigningCertificateIdentified),
            fail(ReferenceDataIntact),
            fail(ReferenceDataFound),
            fail(SignedPropertiesIntact),
            fail(SignedPropertiesFound),
            fail(SignatureValueIntact),
            fail(CertificateChainTrusted),
            fail(CertificateNotRevoked),
            fail(RevocationStatusKnown),
            fail(CertificateValidAtSigningTime),
            fail(TimestampsConsistent),
            ConstraintRule::new(BLevelAttributesValid, Level::Warn),
        ];

        Self {
            name: "baseline-b".to_owned(),
            version: "1".to_owned(),
            precedence: FailurePrecedence::default(),
            signature,
            timestamp,
        }
    }

    /// [`baseline_b`](Self::baseline_b) plus a required passing signature
    /// or archive timestamp.
    pub fn baseline_t() -> Self {
        let mut policy = Self::baseline_b();
        policy.name = "baseline-t".to_owned();
        policy.signature.push(ConstraintRule::new(
            Constraint::QualifyingTimestampPresent,
            Level::Fail,
        ));
        policy
    }

    /// Returns the policy with `precedence`.
    ///
    /// The certificate and timestamp-consistency rules of both lists are
    /// reordered to match.
    #[must_use]
    pub fn with_precedence(mut self, precedence: FailurePrecedence) -> Self {
        self.precedence = precedence;
        self.signature.sort_by_key(|rule| rule.constraint.rank(precedence));
        self.timestamp.sort_by_key(|rule| rule.constraint.rank(precedence));
        self
    }

    /// Check that the policy is well formed.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::PolicyConfiguration("policy name is empty".into()));
        }
        if self.version.trim().is_empty() {
            return Err(Error::PolicyConfiguration("policy version is empty".into()));
        }

        self.validate_rules("signature", &self.signature)?;
        self.validate_rules("timestamp", &self.timestamp)?;

        if let Some(rule) = self.timestamp.iter().find(|r| r.constraint.signature_only()) {
            return Err(Error::PolicyConfiguration(format!(
                "{:?} does not apply to timestamps",
                rule.constraint
            )));
        }

        Ok(())
    }

    fn validate_rules(&self, list: &str, rules: &[ConstraintRule]) -> Result<()> {
        let Some(first) = rules.first() else {
            return Err(Error::PolicyConfiguration(format!("{list} constraint list is empty")));
        };

        if first.constraint != Constraint::FormatValid || first.level != Level::Fail {
            return Err(Error::PolicyConfiguration(format!(
                "{list} constraints must start with format_valid at fail level"
            )));
        }

        let mut seen = HashSet::new();
        for rule in rules {
            if !seen.insert(rule.constraint) {
                return Err(Error::PolicyConfiguration(format!(
                    "{:?} listed twice in {list} constraints",
                    rule.constraint
                )));
            }
        }

        for pair in rules.windows(2) {
            if pair[0].constraint.rank(self.precedence) > pair[1].constraint.rank(self.precedence) {
                return Err(Error::PolicyConfiguration(format!(
                    "{:?} must not follow {:?} in {list} constraints with {:?}",
                    pair[1].constraint, pair[0].constraint, self.precedence
                )));
            }
        }

        Ok(())
    }
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self::baseline_b()
    }
}
