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

use rsa::{pkcs1v15::Pkcs1v15Sign, pkcs8::DecodePublicKey, pss::Pss, RsaPublicKey};
use sha1::Sha1;
use sha2::{Sha224, Sha256, Sha384, Sha512};
use sha3::{Sha3_224, Sha3_256, Sha3_384, Sha3_512};

use crate::{
    hash::DigestAlgorithm,
    raw_signature::{RawSignatureValidationError, RawSignatureValidator},
};

/// Padding scheme of an RSA signature.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum RsaPadding {
    Pkcs1v15,

    /// RSASSA-PSS with MGF1 over the message digest and a salt as long as
    /// the digest.
    Pss,
}

/// An `RsaValidator` validates RSA signatures over any computable digest.
pub(crate) struct RsaValidator {
    digest: DigestAlgorithm,
    padding: RsaPadding,
}

impl RsaValidator {
    pub(crate) fn new(digest: DigestAlgorithm, padding: RsaPadding) -> Self {
        Self { digest, padding }
    }
}

macro_rules! scheme_for_digest {
    ($digest:expr, $scheme:ident) => {
        match $digest {
            DigestAlgorithm::Sha1 => Some($scheme::new::<Sha1>()),
            DigestAlgorithm::Sha224 => Some($scheme::new::<Sha224>()),
            DigestAlgorithm::Sha256 => Some($scheme::new::<Sha256>()),
            DigestAlgorithm::Sha384 => Some($scheme::new::<Sha384>()),
            DigestAlgorithm::Sha512 => Some($scheme::new::<Sha512>()),
            DigestAlgorithm::Sha3_224 => Some($scheme::new::<Sha3_224>()),
            DigestAlgorithm::Sha3_256 => Some($scheme::new::<Sha3_256>()),
            DigestAlgorithm::Sha3_384 => Some($scheme::new::<Sha3_384>()),
            DigestAlgorithm::Sha3_512 => Some($scheme::new::<Sha3_512>()),
            DigestAlgorithm::Md5 | DigestAlgorithm::Ripemd160 => None,
        }
    };
}

impl RawSignatureValidator for RsaValidator {
    fn validate(
        &self,
        sig: &[u8],
        data: &[u8],
        public_key: &[u8],
    ) -> Result<(), RawSignatureValidationError> {
        let hashed = self
            .digest
            .digest(data)
            .ok_or(RawSignatureValidationError::UnsupportedAlgorithm)?;

        let key = RsaPublicKey::from_public_key_der(public_key)
            .map_err(|_| RawSignatureValidationError::InvalidPublicKey)?;

        let result = match self.padding {
            RsaPadding::Pkcs1v15 => {
                let scheme = scheme_for_digest!(self.digest, Pkcs1v15Sign)
                    .ok_or(RawSignatureValidationError::UnsupportedAlgorithm)?;
                key.verify(scheme, &hashed, sig)
            }
            RsaPadding::Pss => {
                let scheme = scheme_for_digest!(self.digest, Pss)
                    .ok_or(RawSignatureValidationError::UnsupportedAlgorithm)?;
                key.verify(scheme, &hashed, sig)
            }
        };

        result.map_err(|_| RawSignatureValidationError::SignatureMismatch)
    }
}
