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

//! Validation status entries of the validation log.

#![deny(missing_docs)]

pub use esig_status_tracker::validation_codes::*;
use esig_status_tracker::{LogItem, LogKind};
use serde::{Deserialize, Serialize};

/// A `ValidationStatus` describes the result of one check performed on a
/// signature, timestamp or digest matcher.
#[derive(Clone, Debug, Deserialize, Serialize, Eq)]
pub struct ValidationStatus {
    code: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    explanation: Option<String>,

    #[serde(skip)]
    #[serde(default = "default_log_kind")]
    kind: LogKind,
}

fn default_log_kind() -> LogKind {
    LogKind::Success
}

impl ValidationStatus {
    pub(crate) fn new<S: Into<String>>(code: S) -> Self {
        Self {
            code: code.into(),
            url: None,
            explanation: None,
            kind: LogKind::Success,
        }
    }

    /// Returns the validation status code.
    ///
    /// These are defined as constants in the
    /// [`validation_status`](crate::validation_status) mod.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Returns the identifier of the signature, timestamp or digest matcher
    /// that was checked.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Returns a human-readable description of the check.
    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    /// Sets the identifier of the object that was checked.
    #[must_use]
    pub fn set_url<S: Into<String>>(mut self, url: S) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Sets the LogKind for this validation status.
    #[must_use]
    pub fn set_kind(mut self, kind: LogKind) -> Self {
        self.kind = kind;
        self
    }

    pub(crate) fn set_explanation(mut self, explanation: String) -> Self {
        self.explanation = Some(explanation);
        self
    }

    /// Returns `true` if this has a successful validation code.
    pub fn passed(&self) -> bool {
        is_success(&self.code)
    }

    /// Returns the LogKind for this validation status.
    pub fn kind(&self) -> &LogKind {
        &self.kind
    }

    /// Creates a ValidationStatus from a validation log item.
    ///
    /// Items without a status code are not reported.
    pub(crate) fn from_log_item(item: &LogItem) -> Option<Self> {
        let status = item.validation_status.as_ref()?;
        let explanation = match &item.err_val {
            Some(err) => format!("{}: {}", item.description, err),
            None => item.description.to_string(),
        };

        Some(
            Self::new(status.to_string())
                .set_url(item.label.to_string())
                .set_kind(item.kind)
                .set_explanation(explanation),
        )
    }
}

impl PartialEq for ValidationStatus {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code && self.url == other.url
    }
}
