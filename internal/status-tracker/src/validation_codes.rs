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

//! Status codes recorded in the validation log for individual checks.

use crate::LogKind;

// -- success codes --

/// The recomputed digest of the referenced content equals the declared
/// digest.
///
/// The corresponding label identifies the digest matcher.
pub const DIGEST_MATCHER_INTACT: &str = "digestMatcher.intact";

/// The signature value verified against the signing certificate's public
/// key.
pub const SIGNATURE_VALUE_VALIDATED: &str = "signatureValue.validated";

/// The recomputed message imprint equals the imprint stored in the
/// timestamp token.
pub const TIMESTAMP_IMPRINT_MATCH: &str = "timeStamp.messageImprint.match";

/// The timestamp token's signature verified against the TSA certificate.
pub const TIMESTAMP_VALIDATED: &str = "timeStamp.validated";

/// The timestamp was produced after every object it covers.
pub const TIMESTAMP_ORDER_CONSISTENT: &str = "timeStamp.order.consistent";

/// A best-signing-time was established from a timestamp.
pub const BEST_SIGNING_TIME_PROVEN: &str = "signature.bestSigningTime.proven";

/// The signing certificate chains to a trust anchor.
pub const SIGNING_CREDENTIAL_TRUSTED: &str = "signingCredential.trusted";

/// The signing certificate was not revoked.
pub const SIGNING_CREDENTIAL_NOT_REVOKED: &str = "signingCredential.notRevoked";

// -- informational codes --

/// No timestamp proves the time of signing; the validation time is used.
pub const BEST_SIGNING_TIME_UNPROVEN: &str = "signature.bestSigningTime.unproven";

/// A constraint failed at Warn level.
pub const CONSTRAINT_WARNING: &str = "constraint.warning";

/// A constraint failed at Inform level.
pub const CONSTRAINT_INFORMATION: &str = "constraint.information";

// -- failure codes --

/// The content referenced by a digest matcher could not be resolved.
pub const DIGEST_MATCHER_NOT_FOUND: &str = "digestMatcher.notFound";

/// The recomputed digest of the referenced content differs from the declared
/// digest.
pub const DIGEST_MATCHER_MISMATCH: &str = "digestMatcher.mismatch";

/// The declared digest algorithm is unknown or cannot be computed.
pub const ALGORITHM_UNSUPPORTED: &str = "algorithm.unsupported";

/// The signature value did not verify.
pub const SIGNATURE_VALUE_INVALID: &str = "signatureValue.invalid";

/// The collaborator reported a structural failure for the object.
pub const FORMAT_MALFORMED: &str = "format.malformed";

/// The data covered by a timestamp could not be resolved.
pub const TIMESTAMP_IMPRINT_NOT_FOUND: &str = "timeStamp.messageImprint.notFound";

/// The recomputed message imprint differs from the stored imprint.
pub const TIMESTAMP_IMPRINT_MISMATCH: &str = "timeStamp.messageImprint.mismatch";

/// The timestamp token's signature did not verify.
pub const TIMESTAMP_SIGNATURE_INVALID: &str = "timeStamp.signature.invalid";

/// The timestamp was not produced strictly after an object it covers.
pub const TIMESTAMP_ORDER_FAILURE: &str = "timeStamp.order.failure";

/// No certificate is bound to the signature or timestamp.
pub const SIGNING_CREDENTIAL_MISSING: &str = "signingCredential.missing";

/// The signing certificate does not chain to a trust anchor.
pub const SIGNING_CREDENTIAL_UNTRUSTED: &str = "signingCredential.untrusted";

/// The signing certificate was revoked.
pub const SIGNING_CREDENTIAL_REVOKED: &str = "signingCredential.revoked";

/// The revocation status of the signing certificate is unknown.
pub const SIGNING_CREDENTIAL_REVOCATION_UNKNOWN: &str = "signingCredential.revocation.unknown";

/// The signing certificate was outside its validity period at signing time.
pub const SIGNING_CREDENTIAL_EXPIRED: &str = "signingCredential.expired";

/// A constraint failed at Fail level and determined the outcome.
pub const CONSTRAINT_FAILURE: &str = "constraint.failure";

/// Returns `true` if the status code is a known success status code.
///
/// Returns `false` if the status code is a known failure or informational
/// status code, or is unknown.
///
/// ## Examples
///
/// ```
/// use esig_status_tracker::validation_codes::*;
///
/// assert!(is_success(DIGEST_MATCHER_INTACT));
/// assert!(!is_success(DIGEST_MATCHER_MISMATCH));
/// ```
pub fn is_success(status_code: &str) -> bool {
    matches!(log_kind(status_code), LogKind::Success)
}

/// Returns the [`LogKind`] for a given status code.
pub fn log_kind(status_code: &str) -> LogKind {
    match status_code {
        DIGEST_MATCHER_INTACT
        | SIGNATURE_VALUE_VALIDATED
        | TIMESTAMP_IMPRINT_MATCH
        | TIMESTAMP_VALIDATED
        | TIMESTAMP_ORDER_CONSISTENT
        | BEST_SIGNING_TIME_PROVEN
        | SIGNING_CREDENTIAL_TRUSTED
        | SIGNING_CREDENTIAL_NOT_REVOKED => LogKind::Success,
        BEST_SIGNING_TIME_UNPROVEN | CONSTRAINT_WARNING | CONSTRAINT_INFORMATION => {
            LogKind::Informational
        }
        _ => LogKind::Failure,
    }
}
