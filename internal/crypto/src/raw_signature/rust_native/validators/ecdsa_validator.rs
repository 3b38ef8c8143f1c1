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

use ecdsa::signature::hazmat::PrehashVerifier;
use p256::{ecdsa::VerifyingKey as P256VerifyingKey, pkcs8::DecodePublicKey};
use p384::ecdsa::VerifyingKey as P384VerifyingKey;

use crate::{
    ec_utils::{der_to_p1363, ec_curve_from_public_key_der, EcdsaCurve},
    hash::DigestAlgorithm,
    raw_signature::{RawSignatureValidationError, RawSignatureValidator},
};

/// An `EcdsaValidator` can validate raw ECDSA signatures over any computable
/// digest, with the signature value in either DER or plain P1363 encoding.
pub(crate) struct EcdsaValidator {
    digest: DigestAlgorithm,
}

impl EcdsaValidator {
    pub(crate) fn new(digest: DigestAlgorithm) -> Self {
        Self { digest }
    }
}

impl RawSignatureValidator for EcdsaValidator {
    fn validate(
        &self,
        sig: &[u8],
        data: &[u8],
        public_key: &[u8],
    ) -> Result<(), RawSignatureValidationError> {
        let digest = self
            .digest
            .digest(data)
            .ok_or(RawSignatureValidationError::UnsupportedAlgorithm)?;

        // determine curve from public key
        let curve = ec_curve_from_public_key_der(public_key)
            .ok_or(RawSignatureValidationError::InvalidPublicKey)?;

        // requires fixed sized P1363 signature
        let adjusted_sig = der_to_p1363(sig, curve).unwrap_or_else(|| sig.to_vec());

        let result = match curve {
            EcdsaCurve::P256 => {
                let signature = p256::ecdsa::Signature::from_slice(&adjusted_sig)
                    .map_err(|_| RawSignatureValidationError::InvalidSignature)?;

                let vk = P256VerifyingKey::from_public_key_der(public_key)
                    .map_err(|_| RawSignatureValidationError::InvalidPublicKey)?;

                vk.verify_prehash(&digest, &signature)
            }
            EcdsaCurve::P384 => {
                let signature = p384::ecdsa::Signature::from_slice(&adjusted_sig)
                    .map_err(|_| RawSignatureValidationError::InvalidSignature)?;

                let vk = P384VerifyingKey::from_public_key_der(public_key)
                    .map_err(|_| RawSignatureValidationError::InvalidPublicKey)?;

                vk.verify_prehash(&digest, &signature)
            }
        };

        result.map_err(|_| RawSignatureValidationError::SignatureMismatch)
    }
}
