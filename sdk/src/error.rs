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

use thiserror::Error;

/// `Error` enumerates errors returned by validation operations.
///
/// Validation failures of a signature or timestamp are never reported here.
/// They are recorded as outcomes in the [`DiagnosticData`]. Only a malformed
/// policy configuration or evidence that violates the collaborator contract
/// stops a validation run.
///
/// [`DiagnosticData`]: crate::DiagnosticData
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The validation policy is malformed.
    #[error("policy configuration error: {0}")]
    PolicyConfiguration(String),

    /// A digest matcher was supplied as intact although its content was not
    /// found.
    #[error("digest matcher {matcher} of signature {signature_id} is intact but not found")]
    InconsistentDigestMatcher {
        signature_id: String,
        matcher: String,
    },

    /// Two signatures, timestamps or certificates share the same identifier.
    #[error("duplicate {kind} id: {id}")]
    DuplicateId { kind: &'static str, id: String },

    /// The timestamps of a signature cover each other in a cycle.
    #[error("timestamp coverage cycle in signature {signature_id}")]
    CoverageCycle { signature_id: String },

    /// Signatures of the same document use different JWS payload encodings.
    #[error("'b64' value shall be the same for all signatures!")]
    PayloadEncodingMismatch,

    #[error("bad parameter: {0}")]
    BadParam(String),

    #[error("type is unsupported")]
    UnsupportedType,

    #[error("version compatibility error: {0}")]
    VersionCompatibility(String),

    #[error("internal error: {0}")]
    InternalError(String),

    #[error(transparent)]
    JsonError(#[from] serde_json::Error),

    #[error(transparent)]
    TomlSerializationError(#[from] toml::ser::Error),

    #[error(transparent)]
    OtherError(#[from] Box<dyn std::error::Error + Send + Sync + 'static>),
}

/// A specialized `Result` type for validation operations.
pub type Result<T> = std::result::Result<T, Error>;
