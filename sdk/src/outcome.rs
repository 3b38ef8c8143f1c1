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

//! Standardized validation outcomes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::policy::{Constraint, Level};

/// Top-level result of validating a signature or timestamp.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Indication {
    /// Every Fail-level constraint passed.
    TotalPassed,

    /// The evidence proves the signature is invalid.
    TotalFailed,

    /// The evidence does not allow a positive or negative conclusion.
    Indeterminate,
}

/// Reason for a [`Indication::TotalFailed`] or [`Indication::Indeterminate`]
/// outcome.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubIndication {
    FormatFailure,
    NoSigningCertificateFound,
    HashFailure,
    SignedDataNotFound,
    SigConstraintsFailure,
    SigCryptoFailure,
    NoCertificateChainFound,
    Revoked,
    RevokedNoPoe,
    OutOfBoundsNotRevoked,
    TryLater,
    TimestampOrderFailure,
}

impl fmt::Display for Indication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::TotalPassed => "TOTAL_PASSED",
            Self::TotalFailed => "TOTAL_FAILED",
            Self::Indeterminate => "INDETERMINATE",
        })
    }
}

/// Whether a constraint held for the evaluated object.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConstraintStatus {
    Passed,
    Failed,

    /// The constraint does not apply, e.g. validity checks of a revoked
    /// certificate.
    NotApplicable,
}

/// The result of one policy constraint.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstraintResult {
    pub constraint: Constraint,
    pub level: Level,
    pub status: ConstraintStatus,

    /// The sub-indication this failure maps to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_indication: Option<SubIndication>,
}

impl ConstraintResult {
    /// Returns `true` if the constraint failed.
    pub fn failed(&self) -> bool {
        self.status == ConstraintStatus::Failed
    }
}

/// The outcome of an embedded timestamp, as seen from its signature.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimestampOutcome {
    pub id: String,
    pub outcome: ValidationOutcome,
}

/// The result of applying a [`ValidationPolicy`](crate::ValidationPolicy) to
/// one signature or timestamp.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationOutcome {
    indication: Indication,

    #[serde(skip_serializing_if = "Option::is_none")]
    sub_indication: Option<SubIndication>,

    constraints: Vec<ConstraintResult>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    timestamps: Vec<TimestampOutcome>,
}

impl ValidationOutcome {
    pub(crate) fn new(
        indication: Indication,
        sub_indication: Option<SubIndication>,
        constraints: Vec<ConstraintResult>,
    ) -> Self {
        Self {
            indication,
            sub_indication,
            constraints,
            timestamps: Vec::new(),
        }
    }

    pub(crate) fn with_timestamps(mut self, timestamps: Vec<TimestampOutcome>) -> Self {
        self.timestamps = timestamps;
        self
    }

    /// Returns the indication.
    pub fn indication(&self) -> Indication {
        self.indication
    }

    /// Returns the sub-indication, absent for [`Indication::TotalPassed`].
    pub fn sub_indication(&self) -> Option<SubIndication> {
        self.sub_indication
    }

    /// Returns `true` if the indication is [`Indication::TotalPassed`].
    pub fn passed(&self) -> bool {
        self.indication == Indication::TotalPassed
    }

    /// Returns the result of every evaluated constraint, in policy order.
    pub fn constraints(&self) -> &[ConstraintResult] {
        &self.constraints
    }

    /// Returns the result of `constraint`, if the policy evaluated it.
    pub fn constraint(&self, constraint: Constraint) -> Option<&ConstraintResult> {
        self.constraints.iter().find(|c| c.constraint == constraint)
    }

    /// Returns the failed Warn-level constraints.
    pub fn warnings(&self) -> impl Iterator<Item = &ConstraintResult> {
        self.failed_at(Level::Warn)
    }

    /// Returns the failed Inform-level constraints.
    pub fn infos(&self) -> impl Iterator<Item = &ConstraintResult> {
        self.failed_at(Level::Inform)
    }

    /// Returns the outcomes of the timestamps attached to a signature.
    pub fn timestamps(&self) -> &[TimestampOutcome] {
        &self.timestamps
    }

    fn failed_at(&self, level: Level) -> impl Iterator<Item = &ConstraintResult> {
        self.constraints
            .iter()
            .filter(move |c| c.level == level && c.failed())
    }
}
