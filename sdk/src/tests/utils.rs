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

//! Shared helpers for unit tests.

use std::io::{self, Read};

use chrono::{DateTime, Utc};

use crate::{
    crypto::{BuiltInCryptoProvider, CryptoProvider},
    DigestAlgorithm, SignatureAlgorithm,
};

/// Signature value accepted by [`StubCrypto`].
pub(crate) const GOOD_SIG: &[u8] = b"good signature";

/// Computes real digests but accepts exactly [`GOOD_SIG`] as a signature.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct StubCrypto {}

impl CryptoProvider for StubCrypto {
    fn recompute_digest(
        &self,
        alg: DigestAlgorithm,
        data: &mut dyn Read,
    ) -> io::Result<Option<Vec<u8>>> {
        BuiltInCryptoProvider::default().recompute_digest(alg, data)
    }

    fn verify_signature(
        &self,
        _alg: SignatureAlgorithm,
        _public_key: &[u8],
        _tbs: &[u8],
        sig: &[u8],
    ) -> bool {
        sig == GOOD_SIG
    }
}

pub(crate) fn t(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

pub(crate) fn sha256(data: &[u8]) -> Vec<u8> {
    DigestAlgorithm::Sha256.digest(data).unwrap()
}

/// A reader that always fails.
pub(crate) struct FailingReader;

impl Read for FailingReader {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::UnexpectedEof, "truncated entry"))
    }
}
