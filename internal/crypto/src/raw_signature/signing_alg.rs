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

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::hash::DigestAlgorithm;

/// Describes the public-key algorithm family of a signature.
#[derive(Copy, Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub enum EncryptionAlgorithm {
    /// RSA PKCS#1 v1.5
    #[serde(rename = "RSA")]
    Rsa,

    /// RSASSA-PSS
    #[serde(rename = "RSASSA-PSS")]
    RsaSsaPss,

    /// DSA
    #[serde(rename = "DSA")]
    Dsa,

    /// ECDSA with a DER-encoded signature value
    #[serde(rename = "ECDSA")]
    Ecdsa,

    /// ECDSA with a plain (IEEE P1363, `r || s`) signature value
    #[serde(rename = "PLAIN-ECDSA")]
    PlainEcdsa,

    /// Edwards-curve DSA
    #[serde(rename = "EDDSA")]
    EdDsa,
}

impl EncryptionAlgorithm {
    /// Return the algorithm under which signatures are reported.
    ///
    /// Plain ECDSA differs from ECDSA only in the signature value's encoding,
    /// so it is reported as [`EncryptionAlgorithm::Ecdsa`].
    pub fn canonical(self) -> Self {
        match self {
            Self::PlainEcdsa => Self::Ecdsa,
            other => other,
        }
    }

    /// Return the algorithm's name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Rsa => "RSA",
            Self::RsaSsaPss => "RSASSA-PSS",
            Self::Dsa => "DSA",
            Self::Ecdsa => "ECDSA",
            Self::PlainEcdsa => "PLAIN-ECDSA",
            Self::EdDsa => "EDDSA",
        }
    }
}

impl FromStr for EncryptionAlgorithm {
    type Err = UnknownAlgorithmError;

    fn from_str(alg: &str) -> Result<Self, Self::Err> {
        [
            Self::Rsa,
            Self::RsaSsaPss,
            Self::Dsa,
            Self::Ecdsa,
            Self::PlainEcdsa,
            Self::EdDsa,
        ]
        .into_iter()
        .find(|candidate| candidate.name().eq_ignore_ascii_case(alg))
        .ok_or_else(|| UnknownAlgorithmError(alg.to_owned()))
    }
}

impl fmt::Display for EncryptionAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A signature algorithm: an [`EncryptionAlgorithm`] paired with the
/// [`DigestAlgorithm`] applied to the signed data.
///
/// Only combinations with a registered OID exist; use
/// [`SignatureAlgorithm::for_algorithms`] to obtain one.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq, Serialize)]
pub struct SignatureAlgorithm {
    encryption: EncryptionAlgorithm,
    digest: DigestAlgorithm,
    #[serde(skip)]
    oid: &'static str,
}

macro_rules! sig_alg {
    ($enc:ident, $digest:ident, $oid:expr) => {
        SignatureAlgorithm {
            encryption: EncryptionAlgorithm::$enc,
            digest: DigestAlgorithm::$digest,
            oid: $oid,
        }
    };
}

static SIGNATURE_ALGORITHMS: [SignatureAlgorithm; 43] = [
    sig_alg!(Rsa, Sha1, "1.2.840.113549.1.1.5"),
    sig_alg!(Rsa, Sha224, "1.2.840.113549.1.1.14"),
    sig_alg!(Rsa, Sha256, "1.2.840.113549.1.1.11"),
    sig_alg!(Rsa, Sha384, "1.2.840.113549.1.1.12"),
    sig_alg!(Rsa, Sha512, "1.2.840.113549.1.1.13"),
    sig_alg!(Rsa, Sha3_224, "2.16.840.1.101.3.4.3.13"),
    sig_alg!(Rsa, Sha3_256, "2.16.840.1.101.3.4.3.14"),
    sig_alg!(Rsa, Sha3_384, "2.16.840.1.101.3.4.3.15"),
    sig_alg!(Rsa, Sha3_512, "2.16.840.1.101.3.4.3.16"),
    sig_alg!(Rsa, Md5, "1.2.840.113549.1.1.4"),
    sig_alg!(Rsa, Ripemd160, "1.3.36.3.3.1.2"),
    // RSASSA-PSS carries its digest in the algorithm parameters.
    sig_alg!(RsaSsaPss, Sha1, "1.2.840.113549.1.1.10"),
    sig_alg!(RsaSsaPss, Sha224, "1.2.840.113549.1.1.10"),
    sig_alg!(RsaSsaPss, Sha256, "1.2.840.113549.1.1.10"),
    sig_alg!(RsaSsaPss, Sha384, "1.2.840.113549.1.1.10"),
    sig_alg!(RsaSsaPss, Sha512, "1.2.840.113549.1.1.10"),
    sig_alg!(RsaSsaPss, Sha3_224, "1.2.840.113549.1.1.10"),
    sig_alg!(RsaSsaPss, Sha3_256, "1.2.840.113549.1.1.10"),
    sig_alg!(RsaSsaPss, Sha3_384, "1.2.840.113549.1.1.10"),
    sig_alg!(RsaSsaPss, Sha3_512, "1.2.840.113549.1.1.10"),
    sig_alg!(Dsa, Sha1, "1.2.840.10040.4.3"),
    sig_alg!(Dsa, Sha224, "2.16.840.1.101.3.4.3.1"),
    sig_alg!(Dsa, Sha256, "2.16.840.1.101.3.4.3.2"),
    sig_alg!(Ecdsa, Sha1, "1.2.840.10045.4.1"),
    sig_alg!(Ecdsa, Sha224, "1.2.840.10045.4.3.1"),
    sig_alg!(Ecdsa, Sha256, "1.2.840.10045.4.3.2"),
    sig_alg!(Ecdsa, Sha384, "1.2.840.10045.4.3.3"),
    sig_alg!(Ecdsa, Sha512, "1.2.840.10045.4.3.4"),
    sig_alg!(Ecdsa, Sha3_224, "2.16.840.1.101.3.4.3.9"),
    sig_alg!(Ecdsa, Sha3_256, "2.16.840.1.101.3.4.3.10"),
    sig_alg!(Ecdsa, Sha3_384, "2.16.840.1.101.3.4.3.11"),
    sig_alg!(Ecdsa, Sha3_512, "2.16.840.1.101.3.4.3.12"),
    sig_alg!(PlainEcdsa, Sha1, "0.4.0.127.0.7.1.1.4.1.1"),
    sig_alg!(PlainEcdsa, Sha224, "0.4.0.127.0.7.1.1.4.1.2"),
    sig_alg!(PlainEcdsa, Sha256, "0.4.0.127.0.7.1.1.4.1.3"),
    sig_alg!(PlainEcdsa, Sha384, "0.4.0.127.0.7.1.1.4.1.4"),
    sig_alg!(PlainEcdsa, Sha512, "0.4.0.127.0.7.1.1.4.1.5"),
    sig_alg!(PlainEcdsa, Ripemd160, "0.4.0.127.0.7.1.1.4.1.6"),
    sig_alg!(PlainEcdsa, Sha3_224, "0.4.0.127.0.7.1.1.4.1.8"),
    sig_alg!(PlainEcdsa, Sha3_256, "0.4.0.127.0.7.1.1.4.1.9"),
    sig_alg!(PlainEcdsa, Sha3_384, "0.4.0.127.0.7.1.1.4.1.10"),
    sig_alg!(PlainEcdsa, Sha3_512, "0.4.0.127.0.7.1.1.4.1.11"),
    sig_alg!(EdDsa, Sha512, "1.3.101.112"),
];

impl SignatureAlgorithm {
    /// Every registered signature algorithm.
    pub fn all() -> &'static [SignatureAlgorithm] {
        &SIGNATURE_ALGORITHMS
    }

    /// Return the signature algorithm for an (encryption, digest) pair, or
    /// `None` if no OID is registered for the combination.
    pub fn for_algorithms(
        encryption: EncryptionAlgorithm,
        digest: DigestAlgorithm,
    ) -> Option<Self> {
        SIGNATURE_ALGORITHMS
            .iter()
            .find(|alg| alg.encryption == encryption && alg.digest == digest)
            .copied()
    }

    /// Look up a signature algorithm by OID.
    ///
    /// Returns `None` for unknown OIDs and for OIDs shared by several
    /// algorithms (RSASSA-PSS), whose digest can only be determined from the
    /// algorithm parameters.
    pub fn from_oid(oid: &str) -> Option<Self> {
        let mut matches = SIGNATURE_ALGORITHMS.iter().filter(|alg| alg.oid == oid);
        let first = matches.next()?;
        match matches.next() {
            Some(_) => None,
            None => Some(*first),
        }
    }

    /// Return the encryption algorithm as declared.
    pub fn encryption(&self) -> EncryptionAlgorithm {
        self.encryption
    }

    /// Return the digest algorithm.
    pub fn digest(&self) -> DigestAlgorithm {
        self.digest
    }

    /// Return the OID in dotted-decimal form.
    pub fn oid(&self) -> &'static str {
        self.oid
    }
}

impl fmt::Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.encryption.canonical(), self.digest)
    }
}

/// This error is returned when converting from a string or identifier to one
/// of the algorithm types if the algorithm is unrecognized.
#[derive(Debug, Eq, PartialEq, thiserror::Error)]
#[error("UnknownAlgorithmError({0})")]
pub struct UnknownAlgorithmError(pub String);
