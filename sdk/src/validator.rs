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

use std::{collections::HashSet, thread};

use chrono::{DateTime, Utc};
use log::{debug, info};

use crate::{
    certificate::CertificateVerdictSource,
    crypto::CryptoProvider,
    diagnostic_data::{DiagnosticData, DiagnosticDataBuilder},
    evidence::{check_payload_encodings, EvidenceExtractor, SignatureSource},
    policy::ValidationPolicy,
    settings::Settings,
    signature::{validate_signature, SignatureRun},
    Error, Result,
};

/// Validates the signatures of a document against a [`ValidationPolicy`].
///
/// A `DocumentValidator` is immutable once built and may validate any number
/// of documents. Each call to [`validate`](Self::validate) produces a new
/// [`DiagnosticData`].
pub struct DocumentValidator {
    policy: ValidationPolicy,
    crypto: Box<dyn CryptoProvider>,
    certificates: Box<dyn CertificateVerdictSource>,
    validation_time: DateTime<Utc>,
    parallel: bool,
}

impl DocumentValidator {
    /// Create a validator applying `policy`, at the current time.
    ///
    /// Returns [`Error::PolicyConfiguration`] if the policy is malformed.
    pub fn new(
        policy: ValidationPolicy,
        crypto: impl CryptoProvider + 'static,
        certificates: impl CertificateVerdictSource + 'static,
    ) -> Result<Self> {
        policy.validate()?;

        Ok(Self {
            policy,
            crypto: Box::new(crypto),
            certificates: Box::new(certificates),
            validation_time: Utc::now(),
            parallel: false,
        })
    }

    /// Create a validator configured by `settings`.
    pub fn from_settings(
        settings: &Settings,
        crypto: impl CryptoProvider + 'static,
        certificates: impl CertificateVerdictSource + 'static,
    ) -> Result<Self> {
        let mut validator = Self::new(settings.policy.clone(), crypto, certificates)?
            .with_parallel_evaluation(settings.core.parallel_evaluation);

        if let Some(validation_time) = settings.verify.validation_time {
            validator = validator.with_validation_time(validation_time);
        }

        Ok(validator)
    }

    /// Validate at `validation_time` instead of the construction time.
    #[must_use]
    pub fn with_validation_time(mut self, validation_time: DateTime<Utc>) -> Self {
        self.validation_time = validation_time;
        self
    }

    /// Evaluate independent signatures on parallel worker threads.
    #[must_use]
    pub fn with_parallel_evaluation(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Returns the policy applied by this validator.
    pub fn policy(&self) -> &ValidationPolicy {
        &self.policy
    }

    /// Returns the validation time.
    pub fn validation_time(&self) -> DateTime<Utc> {
        self.validation_time
    }

    /// Parse `document` with `extractor` and validate every signature found.
    pub fn validate_document<E: EvidenceExtractor + ?Sized>(
        &self,
        extractor: &E,
        document: &[u8],
    ) -> Result<DiagnosticData> {
        self.validate(extractor.extract(document))
    }

    /// Validate `signatures`, given in document order.
    ///
    /// Every signature receives an outcome. An `Err` is returned only for
    /// evidence that violates the collaborator contract: duplicate ids,
    /// inconsistent pre-verified bindings, timestamp coverage cycles or
    /// mixed JWS payload encodings.
    pub fn validate(&self, signatures: Vec<SignatureSource>) -> Result<DiagnosticData> {
        let mut ids = HashSet::new();
        for signature in &signatures {
            if !ids.insert(signature.id.as_str()) {
                return Err(Error::DuplicateId {
                    kind: "signature",
                    id: signature.id.clone(),
                });
            }
        }

        check_payload_encodings(&signatures)?;

        info!(
            "validating {} signature(s) with policy {} {}",
            signatures.len(),
            self.policy.name,
            self.policy.version
        );

        let runs = if self.parallel && signatures.len() > 1 {
            self.validate_parallel(&signatures)?
        } else {
            signatures
                .iter()
                .map(|signature| self.validate_one(signature))
                .collect::<Result<Vec<_>>>()?
        };

        let mut builder = DiagnosticDataBuilder::new(self.validation_time, &self.policy);
        for run in runs {
            builder.add_signature_run(run)?;
        }

        Ok(builder.build())
    }

    fn validate_one(&self, signature: &SignatureSource) -> Result<SignatureRun> {
        debug!("validating signature {}", signature.id);
        validate_signature(
            signature,
            &self.policy,
            self.crypto.as_ref(),
            self.certificates.as_ref(),
            self.validation_time,
        )
    }

    // One scoped thread per signature. Results are joined in document order.
    fn validate_parallel(&self, signatures: &[SignatureSource]) -> Result<Vec<SignatureRun>> {
        thread::scope(|scope| {
            let handles: Vec<_> = signatures
                .iter()
                .map(|signature| scope.spawn(move || self.validate_one(signature)))
                .collect();

            handles
                .into_iter()
                .map(|handle| {
                    handle.join().map_err(|_| {
                        Error::InternalError("signature validation thread panicked".into())
                    })?
                })
                .collect()
        })
    }
}

impl std::fmt::Debug for DocumentValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentValidator")
            .field("policy", &self.policy)
            .field("validation_time", &self.validation_time)
            .field("parallel", &self.parallel)
            .finish_non_exhaustive()
    }
}
