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

#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! This library validates the evidence carried by electronically signed
//! documents: digest bindings between signatures and their content, the
//! signature value, every embedded timestamp and the ordering between them.
//! A declarative [`ValidationPolicy`] turns that evidence into a
//! standardized [`Indication`] / [`SubIndication`] outcome for every
//! signature and timestamp.
//!
//! Format-specific parsing is not part of this crate. A parser supplies one
//! [`SignatureSource`] per signature (usually through an
//! [`EvidenceExtractor`]) with lazy [`ContentResolver`] handles for the signed
//! content.
//!
//! # Example: validating extracted evidence
//!
//! ```
//! use esig_validation::{
//!     BuiltInCryptoProvider, DocumentValidator, Indication, StaticVerdictSource,
//!     ValidationPolicy,
//! };
//!
//! # fn main() -> esig_validation::Result<()> {
//! let validator = DocumentValidator::new(
//!     ValidationPolicy::baseline_b(),
//!     BuiltInCryptoProvider::default(),
//!     StaticVerdictSource::default(),
//! )?;
//!
//! let diagnostic_data = validator.validate(Vec::new())?;
//! let report = diagnostic_data.simple_report();
//! assert_eq!(report.signatures_count(), 0);
//! assert!(report.first_signature_id().is_none());
//! # let _ = Indication::TotalPassed;
//! # Ok(())
//! # }
//! ```

/// The internal name of this crate.
pub const NAME: &str = "esig-validation";

/// The version of this crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod certificate;
pub use certificate::{
    CertificateVerdict, CertificateVerdictSource, RevocationStatus, StaticVerdictSource,
};

pub mod crypto;
pub use crypto::{BuiltInCryptoProvider, CryptoProvider};

pub mod diagnostic_data;
pub use diagnostic_data::{DiagnosticData, SignatureEvidence};

pub mod digest_matcher;
pub use digest_matcher::{DigestMatcher, DigestMatcherKind};

mod error;
pub use error::{Error, Result};

pub mod evidence;
pub use evidence::{
    CertificateRef, ContentResolver, DeclaredReference, EvidenceExtractor, ImprintSource,
    PayloadEncoding, ReferenceBinding, ResolveError, SignatureSource, TimestampSource,
};

pub mod outcome;
pub use outcome::{ConstraintResult, ConstraintStatus, Indication, SubIndication, ValidationOutcome};

pub mod policy;
pub use policy::{Constraint, ConstraintRule, FailurePrecedence, Level, ValidationPolicy};

pub mod settings;
pub use settings::Settings;

mod signature;

pub mod simple_report;
pub use simple_report::SimpleReport;

pub mod timestamp;
pub use timestamp::{TimestampEvidence, TimestampKind};

pub mod validation_status;

mod validator;
pub use validator::DocumentValidator;

pub use esig_crypto::{
    hash::DigestAlgorithm,
    raw_signature::{EncryptionAlgorithm, SignatureAlgorithm},
};
pub use esig_status_tracker::{LogItem, LogKind, StatusTracker};

#[cfg(test)]
pub(crate) mod tests;
