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

//! The cryptographic collaborator.

use std::io::{self, Read};

use esig_crypto::{
    hash::DigestAlgorithm,
    raw_signature::{validator_for_signature_alg, SignatureAlgorithm},
};
use log::debug;

/// A `CryptoProvider` executes the raw cryptographic primitives needed to
/// validate evidence.
///
/// The validation engine treats it as a black box.
pub trait CryptoProvider: Send + Sync {
    /// Digest everything that can be read from `data`.
    ///
    /// Returns `Ok(None)` if `alg` is not supported by this provider. A read
    /// error is returned as `Err` and means the content could not be
    /// resolved.
    fn recompute_digest(
        &self,
        alg: DigestAlgorithm,
        data: &mut dyn Read,
    ) -> io::Result<Option<Vec<u8>>>;

    /// Return `true` if `sig` is a valid signature over `tbs` for
    /// `public_key` with algorithm `alg`.
    fn verify_signature(
        &self,
        alg: SignatureAlgorithm,
        public_key: &[u8],
        tbs: &[u8],
        sig: &[u8],
    ) -> bool;
}

/// A [`CryptoProvider`] backed by the Rust-native primitives of
/// `esig-crypto`.
///
/// Computes SHA-1, SHA-2 and SHA-3 digests. Verifies RSA (PKCS#1 v1.5 and
/// PSS), ECDSA (P-256, P-384) and Ed25519 signatures.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuiltInCryptoProvider {}

impl CryptoProvider for BuiltInCryptoProvider {
    fn recompute_digest(
        &self,
        alg: DigestAlgorithm,
        data: &mut dyn Read,
    ) -> io::Result<Option<Vec<u8>>> {
        alg.digest_reader(data)
    }

    fn verify_signature(
        &self,
        alg: SignatureAlgorithm,
        public_key: &[u8],
        tbs: &[u8],
        sig: &[u8],
    ) -> bool {
        let Some(validator) = validator_for_signature_alg(alg) else {
            debug!("no validator available for {alg}");
            return false;
        };

        match validator.validate(sig, tbs, public_key) {
            Ok(()) => true,
            Err(err) => {
                debug!("{alg} signature did not verify: {err}");
                false
            }
        }
    }
}
