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

//! A per-signature summary of a validation run.
//!
//! The report is a projection of [`DiagnosticData`]: nothing is recomputed.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    diagnostic_data::DiagnosticData,
    outcome::{Indication, SubIndication},
    policy::Constraint,
    timestamp::TimestampKind,
};

/// Summary of one timestamp.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimestampSummary {
    pub id: String,
    pub kind: TimestampKind,
    pub production_time: DateTime<Utc>,
    pub indication: Indication,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_indication: Option<SubIndication>,
}

/// Summary of one signature.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureSummary {
    pub id: String,
    pub indication: Indication,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_indication: Option<SubIndication>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_signing_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signing_certificate_id: Option<String>,

    /// Constraints that failed at Warn level.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<Constraint>,

    /// Constraints that failed at Inform level.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub infos: Vec<Constraint>,

    pub timestamps: Vec<TimestampSummary>,
}

/// The simple validation report.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleReport {
    validation_time: DateTime<Utc>,
    policy_name: String,
    signatures: Vec<SignatureSummary>,
}

impl SimpleReport {
    pub(crate) fn from_diagnostic_data(data: &DiagnosticData) -> Self {
        let signatures = data
            .signatures()
            .filter_map(|signature| {
                let outcome = data.signature_outcome(signature.id())?;

                let timestamps = data
                    .timestamps_of(signature.id())
                    .filter_map(|ts| {
                        let ts_outcome = data.timestamp_outcome(ts.id())?;
                        Some(TimestampSummary {
                            id: ts.id().to_owned(),
                            kind: ts.kind(),
                            production_time: ts.production_time(),
                            indication: ts_outcome.indication(),
                            sub_indication: ts_outcome.sub_indication(),
                        })
                    })
                    .collect();

                Some(SignatureSummary {
                    id: signature.id().to_owned(),
                    indication: outcome.indication(),
                    sub_indication: outcome.sub_indication(),
                    best_signing_time: signature.best_signing_time(),
                    signing_certificate_id: signature.signing_certificate_id().map(str::to_owned),
                    warnings: outcome.warnings().map(|c| c.constraint).collect(),
                    infos: outcome.infos().map(|c| c.constraint).collect(),
                    timestamps,
                })
            })
            .collect();

        Self {
            validation_time: data.validation_time(),
            policy_name: data.policy_name().to_owned(),
            signatures,
        }
    }

    pub fn validation_time(&self) -> DateTime<Utc> {
        self.validation_time
    }

    pub fn policy_name(&self) -> &str {
        &self.policy_name
    }

    /// Returns the signature summaries in document order.
    pub fn signatures(&self) -> &[SignatureSummary] {
        &self.signatures
    }

    /// Returns the summary of signature `id`.
    pub fn signature(&self, id: &str) -> Option<&SignatureSummary> {
        self.signatures.iter().find(|s| s.id == id)
    }

    /// Returns the indication of signature `id`.
    pub fn indication(&self, id: &str) -> Option<Indication> {
        self.signature(id).map(|s| s.indication)
    }

    /// Returns the sub-indication of signature `id`, if it has one.
    pub fn sub_indication(&self, id: &str) -> Option<SubIndication> {
        self.signature(id).and_then(|s| s.sub_indication)
    }

    /// Returns `true` if signature `id` passed.
    pub fn is_valid(&self, id: &str) -> bool {
        self.indication(id) == Some(Indication::TotalPassed)
    }

    /// Returns the id of the first signature in document order.
    pub fn first_signature_id(&self) -> Option<&str> {
        self.signatures.first().map(|s| s.id.as_str())
    }

    pub fn signature_ids(&self) -> impl Iterator<Item = &str> {
        self.signatures.iter().map(|s| s.id.as_str())
    }

    pub fn signatures_count(&self) -> usize {
        self.signatures.len()
    }

    /// Returns the number of signatures with [`Indication::TotalPassed`].
    pub fn valid_signatures_count(&self) -> usize {
        self.signatures
            .iter()
            .filter(|s| s.indication == Indication::TotalPassed)
            .count()
    }

    /// Returns the indication of timestamp `id`.
    pub fn timestamp_indication(&self, id: &str) -> Option<Indication> {
        self.signatures
            .iter()
            .flat_map(|s| s.timestamps.iter())
            .find(|ts| ts.id == id)
            .map(|ts| ts.indication)
    }

    /// Returns every timestamp summary grouped by timestamp type.
    pub fn timestamps_by_kind(&self) -> BTreeMap<TimestampKind, Vec<&TimestampSummary>> {
        let mut grouped: BTreeMap<TimestampKind, Vec<&TimestampSummary>> = BTreeMap::new();
        for ts in self.signatures.iter().flat_map(|s| s.timestamps.iter()) {
            grouped.entry(ts.kind).or_default().push(ts);
        }
        grouped
    }
}
