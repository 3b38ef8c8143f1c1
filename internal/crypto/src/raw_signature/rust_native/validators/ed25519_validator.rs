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

use ed25519_dalek::{pkcs8::DecodePublicKey, Signature, VerifyingKey, PUBLIC_KEY_LENGTH};

use crate::raw_signature::{RawSignatureValidationError, RawSignatureValidator};

/// An `Ed25519Validator` can validate raw signatures with the Ed25519
/// signature algorithm.
///
/// The public key may be given as the raw 32-byte key or as a DER-encoded
/// SubjectPublicKeyInfo.
pub(crate) struct Ed25519Validator {}

impl RawSignatureValidator for Ed25519Validator {
    fn validate(
        &self,
        sig: &[u8],
        data: &[u8],
        public_key: &[u8],
    ) -> Result<(), RawSignatureValidationError> {
        let vk = if public_key.len() == PUBLIC_KEY_LENGTH {
            let raw: &[u8; PUBLIC_KEY_LENGTH] = public_key
                .try_into()
                .map_err(|_| RawSignatureValidationError::InvalidPublicKey)?;
            VerifyingKey::from_bytes(raw)
                .map_err(|_| RawSignatureValidationError::InvalidPublicKey)?
        } else {
            VerifyingKey::from_public_key_der(public_key)
                .map_err(|_| RawSignatureValidationError::InvalidPublicKey)?
        };

        let signature = Signature::from_slice(sig)
            .map_err(|_| RawSignatureValidationError::InvalidSignature)?;

        vk.verify_strict(data, &signature)
            .map_err(|_| RawSignatureValidationError::SignatureMismatch)
    }
}
