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

//! The diagnostic data model of a validation run.
//!
//! [`DiagnosticData`] owns every evaluated signature, timestamp and
//! certificate verdict of a run, keyed by id, together with the outcome of
//! every signature and timestamp. It is built once by the
//! [`DocumentValidator`](crate::DocumentValidator) and is read-only
//! afterwards.

use std::collections::{btree_map::Entry, BTreeMap};

use chrono::{DateTime, Utc};
use serde::Serialize;

pub use crate::signature::SignatureEvidence;
use crate::{
    certificate::CertificateVerdict,
    outcome::ValidationOutcome,
    policy::ValidationPolicy,
    signature::SignatureRun,
    simple_report::SimpleReport,
    timestamp::TimestampEvidence,
    validation_status::ValidationStatus,
    Error, Result,
};

/// Everything established while validating one document.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticData {
    validation_time: DateTime<Utc>,
    policy_name: String,
    policy_version: String,

    /// Signature ids in document order.
    signature_order: Vec<String>,

    signatures: BTreeMap<String, SignatureEvidence>,
    timestamps: BTreeMap<String, TimestampEvidence>,
    certificates: BTreeMap<String, CertificateVerdict>,

    signature_outcomes: BTreeMap<String, ValidationOutcome>,
    timestamp_outcomes: BTreeMap<String, ValidationOutcome>,

    validation_log: Vec<ValidationStatus>,
}

impl DiagnosticData {
    /// Returns the time the validation was performed at.
    pub fn validation_time(&self) -> DateTime<Utc> {
        self.validation_time
    }

    pub fn policy_name(&self) -> &str {
        &self.policy_name
    }

    pub fn policy_version(&self) -> &str {
        &self.policy_version
    }

    /// Returns the signature ids in document order.
    pub fn signature_ids(&self) -> &[String] {
        &self.signature_order
    }

    /// Returns the signatures in document order.
    pub fn signatures(&self) -> impl Iterator<Item = &SignatureEvidence> {
        self.signature_order
            .iter()
            .filter_map(|id| self.signatures.get(id))
    }

    pub fn signature(&self, id: &str) -> Option<&SignatureEvidence> {
        self.signatures.get(id)
    }

    /// Returns every timestamp, ordered by id.
    pub fn timestamps(&self) -> impl Iterator<Item = &TimestampEvidence> {
        self.timestamps.values()
    }

    pub fn timestamp(&self, id: &str) -> Option<&TimestampEvidence> {
        self.timestamps.get(id)
    }

    /// Returns the timestamps attached to signature `id`, in declaration
    /// order.
    pub fn timestamps_of(&self, id: &str) -> impl Iterator<Item = &TimestampEvidence> {
        self.signatures
            .get(id)
            .map(|signature| signature.timestamp_ids())
            .unwrap_or_default()
            .iter()
            .filter_map(|ts| self.timestamps.get(ts))
    }

    /// Returns the verdict recorded for certificate `id`.
    ///
    /// Verdicts depend on the reference time they were queried at. A
    /// certificate used more than once in a run is recorded with its first
    /// verdict, in document order. The verdict each use was evaluated with is
    /// kept on [`SignatureEvidence::signing_certificate_verdict`] and
    /// [`TimestampEvidence::tsa_certificate_verdict`].
    pub fn certificate(&self, id: &str) -> Option<&CertificateVerdict> {
        self.certificates.get(id)
    }

    /// Returns the first verdict recorded for every certificate, ordered by
    /// id.
    pub fn certificates(&self) -> impl Iterator<Item = (&str, &CertificateVerdict)> {
        self.certificates.iter().map(|(id, v)| (id.as_str(), v))
    }

    pub fn signature_outcome(&self, id: &str) -> Option<&ValidationOutcome> {
        self.signature_outcomes.get(id)
    }

    pub fn timestamp_outcome(&self, id: &str) -> Option<&ValidationOutcome> {
        self.timestamp_outcomes.get(id)
    }

    /// Returns the validation log of the run, signature by signature in
    /// document order.
    pub fn validation_log(&self) -> &[ValidationStatus] {
        &self.validation_log
    }

    /// Build the per-signature summary of this run.
    pub fn simple_report(&self) -> SimpleReport {
        SimpleReport::from_diagnostic_data(self)
    }

    /// Serialize the model as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Assembles a [`DiagnosticData`] from per-signature runs, rejecting
/// duplicate identifiers.
pub(crate) struct DiagnosticDataBuilder {
    data: DiagnosticData,
}

impl DiagnosticDataBuilder {
    pub(crate) fn new(validation_time: DateTime<Utc>, policy: &ValidationPolicy) -> Self {
        Self {
            data: DiagnosticData {
                validation_time,
                policy_name: policy.name.clone(),
                policy_version: policy.version.clone(),
                signature_order: Vec::new(),
                signatures: BTreeMap::new(),
                timestamps: BTreeMap::new(),
                certificates: BTreeMap::new(),
                signature_outcomes: BTreeMap::new(),
                timestamp_outcomes: BTreeMap::new(),
                validation_log: Vec::new(),
            },
        }
    }

    /// Add the results of one signature. Signatures must be added in
    /// document order.
    pub(crate) fn add_signature_run(&mut self, run: SignatureRun) -> Result<()> {
        let data = &mut self.data;
        let id = run.evidence.id().to_owned();

        match data.signatures.entry(id.clone()) {
            Entry::Occupied(_) => {
                return Err(Error::DuplicateId {
                    kind: "signature",
                    id,
                })
            }
            Entry::Vacant(entry) => {
                entry.insert(run.evidence);
            }
        }

        for (timestamp, outcome) in run.timestamps {
            let ts_id = timestamp.id().to_owned();
            match data.timestamps.entry(ts_id.clone()) {
                Entry::Occupied(_) => {
                    return Err(Error::DuplicateId {
                        kind: "timestamp",
                        id: ts_id,
                    })
                }
                Entry::Vacant(entry) => {
                    entry.insert(timestamp);
                }
            }
            data.timestamp_outcomes.insert(ts_id, outcome);
        }

        // the first query of a certificate is the one recorded
        for (cert_id, verdict) in run.certificates {
            data.certificates.entry(cert_id).or_insert(verdict);
        }

        data.signature_outcomes.insert(id.clone(), run.outcome);
        data.signature_order.push(id);
        data.validation_log
            .extend(run.log.iter().filter_map(ValidationStatus::from_log_item));

        Ok(())
    }

    pub(crate) fn build(self) -> DiagnosticData {
        self.data
    }
}
