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

//! Utilities for working with the EC keys and signature values used in ECDSA
//! signatures.

use p256::pkcs8::DecodePublicKey;

/// NIST curves supported by `EcdsaValidator`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum EcdsaCurve {
    /// NIST curve P-256
    P256,

    /// NIST curve P-384
    P384,
}

impl EcdsaCurve {
    // Returns the P1363 r|s signature size for a given curve.
    pub(crate) fn p1363_sig_len(&self) -> usize {
        match self {
            EcdsaCurve::P256 => 64,
            EcdsaCurve::P384 => 96,
        }
    }
}

/// Determine the curve of a DER-encoded SubjectPublicKeyInfo.
pub(crate) fn ec_curve_from_public_key_der(public_key: &[u8]) -> Option<EcdsaCurve> {
    if p256::PublicKey::from_public_key_der(public_key).is_ok() {
        Some(EcdsaCurve::P256)
    } else if p384::PublicKey::from_public_key_der(public_key).is_ok() {
        Some(EcdsaCurve::P384)
    } else {
        None
    }
}

/// Convert a DER-encoded ECDSA signature value to the fixed-size P1363
/// `r || s` form used by plain ECDSA.
///
/// Returns `None` if `sig` is not a DER-encoded signature for `curve`.
pub(crate) fn der_to_p1363(sig: &[u8], curve: EcdsaCurve) -> Option<Vec<u8>> {
    let p1363 = match curve {
        EcdsaCurve::P256 => p256::ecdsa::Signature::from_der(sig)
            .ok()?
            .to_bytes()
            .to_vec(),
        EcdsaCurve::P384 => p384::ecdsa::Signature::from_der(sig)
            .ok()?
            .to_bytes()
            .to_vec(),
    };

    (p1363.len() == curve.p1363_sig_len()).then_some(p1363)
}
