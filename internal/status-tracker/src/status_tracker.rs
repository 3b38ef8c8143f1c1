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

use std::{fmt::Debug, iter::Iterator};

use log::info;

use crate::{LogItem, LogKind};

/// A `StatusTracker` aggregates the log items generated while a signature and
/// its timestamps are validated.
///
/// Validation failures are evidence, so recording one never stops the run.
#[derive(Clone, Debug, Default)]
pub struct StatusTracker {
    logged_items: Vec<LogItem>,
    current_label: Vec<String>,
}

impl StatusTracker {
    /// Returns the current list of validation log items.
    pub fn logged_items(&self) -> &[LogItem] {
        &self.logged_items
    }

    /// Consumes the tracker and returns its log items.
    pub fn into_items(self) -> Vec<LogItem> {
        self.logged_items
    }

    /// Appends the contents of another [`StatusTracker`] to this list of
    /// validation log items.
    pub fn append(&mut self, other: &StatusTracker) {
        for log_item in other.logged_items() {
            self.logged_items.push(log_item.clone());
        }
    }

    /// Adds a [`LogItem`] to this status tracker.
    ///
    /// An item with an empty label is attributed to the current label, if
    /// any. Primarily intended for use by [`LogItem::success()`],
    /// [`LogItem::informational()`] or [`LogItem::failure()`].
    pub fn add_item(&mut self, mut log_item: LogItem) {
        if log_item.label.is_empty() {
            if let Some(current) = self.current_label.last() {
                log_item.label = std::borrow::Cow::Owned(current.to_string());
            }
        }
        info!("Validation info: {log_item:#?}");
        self.logged_items.push(log_item);
    }

    /// Returns the [`LogItem`]s that describe failures.
    pub fn filter_errors(&self) -> impl Iterator<Item = &LogItem> {
        self.logged_items()
            .iter()
            .filter(|item| item.kind == LogKind::Failure)
    }

    /// Returns `true` if the validation log contains a specific status code.
    pub fn has_status(&self, val: &str) -> bool {
        self.logged_items()
            .iter()
            .any(|vi| vi.validation_status.as_deref() == Some(val))
    }

    /// Returns `true` if the validation log contains a specific status code
    /// for the object identified by `label`.
    pub fn has_status_for(&self, label: &str, val: &str) -> bool {
        self.logged_items()
            .iter()
            .any(|vi| vi.label == label && vi.validation_status.as_deref() == Some(val))
    }

    /// Returns `true` if the validation log contains a specific error.
    pub fn has_error<E: Debug>(&self, err: E) -> bool {
        let err_type = format!("{:?}", &err);
        self.logged_items()
            .iter()
            .any(|vi| vi.err_val.as_deref() == Some(err_type.as_str()))
    }

    /// Returns `true` if the validation log contains any failure.
    pub fn has_any_error(&self) -> bool {
        self.filter_errors().next().is_some()
    }

    /// Keeps track of the object currently being validated.
    ///
    /// The current label is added to any log item created without one.
    pub fn push_current_label<S: Into<String>>(&mut self, label: S) {
        self.current_label.push(label.into());
    }

    /// Removes the current label, if any.
    pub fn pop_current_label(&mut self) -> Option<String> {
        self.current_label.pop()
    }

    /// Returns the current label, if any.
    pub fn current_label(&self) -> Option<&str> {
        self.current_label.last().map(|s| s.as_str())
    }
}
