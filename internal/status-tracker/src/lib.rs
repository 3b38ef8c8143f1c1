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
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Validation log internals shared by the signature validation crates.
//!
//! Every check performed while validating signature evidence is recorded as a
//! [`LogItem`] in a [`StatusTracker`], tagged with one of the status codes in
//! [`validation_codes`].

mod log_item;
pub use log_item::{LogItem, LogKind};

mod status_tracker;
pub use status_tracker::StatusTracker;

pub mod validation_codes;

#[cfg(test)]
pub(crate) mod tests;
