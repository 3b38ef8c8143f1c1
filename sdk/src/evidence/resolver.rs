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

use std::{
    fmt,
    io::{self, Cursor, Read},
};

use thiserror::Error;

/// A `ContentResolver` gives lazy access to the exact byte sequence covered
/// by a digest binding.
///
/// Opening the content is the "found" check. Reading it through to the end
/// and digesting it is the "intact" check. Implementations must not hold the
/// whole document in memory unless they already own it.
pub trait ContentResolver: Send + Sync {
    /// Open the covered byte sequence for reading.
    fn open(&self) -> Result<Box<dyn Read + '_>, ResolveError>;
}

impl fmt::Debug for dyn ContentResolver + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ContentResolver")
    }
}

/// Describes why covered content could not be resolved.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ResolveError {
    /// The referenced content does not exist in the document.
    #[error("content not found: {0}")]
    NotFound(String),

    /// The referenced entry exists but cannot be decoded.
    #[error("malformed entry: {0}")]
    Malformed(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Content that is already held in memory.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct InMemoryContent(Vec<u8>);

impl InMemoryContent {
    /// Wrap `data` as resolvable content.
    pub fn new<D: Into<Vec<u8>>>(data: D) -> Self {
        Self(data.into())
    }
}

impl ContentResolver for InMemoryContent {
    fn open(&self) -> Result<Box<dyn Read + '_>, ResolveError> {
        Ok(Box::new(Cursor::new(self.0.as_slice())))
    }
}

/// Content that was declared but is absent from the document, such as a
/// container entry that was removed after signing.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MissingContent {
    name: String,
}

impl MissingContent {
    /// Describe missing content by name.
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self { name: name.into() }
    }
}

impl ContentResolver for MissingContent {
    fn open(&self) -> Result<Box<dyn Read + '_>, ResolveError> {
        Err(ResolveError::NotFound(self.name.clone()))
    }
}

/// Content produced on demand by a closure.
///
/// Useful for parsers that locate an entry lazily, e.g. inside a container.
pub struct ContentFn<F>(pub F);

impl<F> ContentResolver for ContentFn<F>
where
    F: Fn() -> Result<Vec<u8>, ResolveError> + Send + Sync,
{
    fn open(&self) -> Result<Box<dyn Read + '_>, ResolveError> {
        let data = (self.0)()?;
        Ok(Box::new(Cursor::new(data)))
    }
}
