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

//! Certificate trust, validity and revocation verdicts.
//!
//! Path building and revocation retrieval happen outside this crate. The
//! validation engine only consumes their verdicts.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Revocation status of a certificate.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "status")]
pub enum RevocationStatus {
    /// The certificate is not revoked.
    Good,

    /// The certificate was revoked.
    #[serde(rename_all = "camelCase")]
    Revoked {
        /// Time of revocation.
        revocation_time: DateTime<Utc>,
    },

    /// No usable revocation information is available.
    Unknown,
}

/// The adapter's verdict on one certificate.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateVerdict {
    /// A path to a trust anchor was found.
    pub trusted_path_found: bool,

    /// The certificate was within its validity period at the reference time.
    pub valid_at_signing_time: bool,

    /// Revocation status.
    pub revocation_status: RevocationStatus,
}

impl CertificateVerdict {
    /// A trusted, valid, unrevoked certificate.
    pub fn trusted() -> Self {
        Self {
            trusted_path_found: true,
            valid_at_signing_time: true,
            revocation_status: RevocationStatus::Good,
        }
    }

    /// A certificate with no path to a trust anchor.
    pub fn untrusted() -> Self {
        Self {
            trusted_path_found: false,
            ..Self::trusted()
        }
    }

    /// Replace the revocation status.
    #[must_use]
    pub fn with_revocation_status(mut self, revocation_status: RevocationStatus) -> Self {
        self.revocation_status = revocation_status;
        self
    }

    /// Replace the validity flag.
    #[must_use]
    pub fn with_valid_at_signing_time(mut self, valid: bool) -> Self {
        self.valid_at_signing_time = valid;
        self
    }
}

/// Supplies [`CertificateVerdict`]s.
pub trait CertificateVerdictSource: Send + Sync {
    /// Return the verdict for `certificate_id` at `reference_time`, or `None`
    /// if the certificate is unknown.
    ///
    /// An unknown certificate is treated as having no trusted chain.
    fn verdict_for(
        &self,
        certificate_id: &str,
        reference_time: DateTime<Utc>,
    ) -> Option<CertificateVerdict>;
}

/// A map-backed [`CertificateVerdictSource`] whose verdicts do not depend on
/// the reference time.
#[derive(Clone, Debug, Default)]
pub struct StaticVerdictSource {
    verdicts: HashMap<String, CertificateVerdict>,
}

impl StaticVerdictSource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the verdict for `certificate_id`.
    #[must_use]
    pub fn with_verdict<S: Into<String>>(
        mut self,
        certificate_id: S,
        verdict: CertificateVerdict,
    ) -> Self {
        self.verdicts.insert(certificate_id.into(), verdict);
        self
    }
}

impl CertificateVerdictSource for StaticVerdictSource {
    fn verdict_for(
        &self,
        certificate_id: &str,
        _reference_time: DateTime<Utc>,
    ) -> Option<CertificateVerdict> {
        self.verdicts.get(certificate_id).copied()
    }
}
