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

//! This module binds Rust native logic for validating raw signatures to this
//! crate's [`RawSignatureValidator`] trait.

use crate::raw_signature::{EncryptionAlgorithm, RawSignatureValidator, SignatureAlgorithm};

mod ecdsa_validator;
pub(crate) use ecdsa_validator::EcdsaValidator;

mod ed25519_validator;
pub(crate) use ed25519_validator::Ed25519Validator;

mod rsa_validator;
pub(crate) use rsa_validator::{RsaPadding, RsaValidator};

/// Return a validator for the given signature algorithm.
pub(crate) fn validator_for_signature_alg(
    alg: SignatureAlgorithm,
) -> Option<Box<dyn RawSignatureValidator>> {
    let digest = alg.digest();
    if alg.encryption() != EncryptionAlgorithm::EdDsa && !digest.is_supported() {
        return None;
    }

    match alg.encryption() {
        EncryptionAlgorithm::Ecdsa | EncryptionAlgorithm::PlainEcdsa => {
            Some(Box::new(EcdsaValidator::new(digest)))
        }
        EncryptionAlgorithm::EdDsa => Some(Box::new(Ed25519Validator {})),
        EncryptionAlgorithm::Rsa => Some(Box::new(RsaValidator::new(digest, RsaPadding::Pkcs1v15))),
        EncryptionAlgorithm::RsaSsaPss => {
            Some(Box::new(RsaValidator::new(digest, RsaPadding::Pss)))
        }
        EncryptionAlgorithm::Dsa => None,
    }
}
