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

//! Digest algorithms and streaming digest computation.

use std::{
    fmt,
    io::{self, Read},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use sha1::Sha1;
use sha2::{Digest, Sha224, Sha256, Sha384, Sha512};
use sha3::{Sha3_224, Sha3_256, Sha3_384, Sha3_512};

use crate::raw_signature::UnknownAlgorithmError;

const HASH_BUF_SIZE: usize = 64 * 1024;

/// Describes the digest algorithms that may be declared by signature
/// evidence.
///
/// Only the SHA-1, SHA-2 and SHA-3 families can be computed. The remaining
/// algorithms are recognized so that evidence declaring them can be reported,
/// but any digest declared with them is treated as unverifiable.
#[derive(Copy, Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub enum DigestAlgorithm {
    /// SHA-1
    #[serde(rename = "SHA1")]
    Sha1,

    /// SHA-224
    #[serde(rename = "SHA224")]
    Sha224,

    /// SHA-256
    #[serde(rename = "SHA256")]
    Sha256,

    /// SHA-384
    #[serde(rename = "SHA384")]
    Sha384,

    /// SHA-512
    #[serde(rename = "SHA512")]
    Sha512,

    /// SHA3-224
    #[serde(rename = "SHA3-224")]
    Sha3_224,

    /// SHA3-256
    #[serde(rename = "SHA3-256")]
    Sha3_256,

    /// SHA3-384
    #[serde(rename = "SHA3-384")]
    Sha3_384,

    /// SHA3-512
    #[serde(rename = "SHA3-512")]
    Sha3_512,

    /// MD5 (recognized, not computed)
    #[serde(rename = "MD5")]
    Md5,

    /// RIPEMD-160 (recognized, not computed)
    #[serde(rename = "RIPEMD160")]
    Ripemd160,
}

struct DigestAlgorithmInfo {
    alg: DigestAlgorithm,
    name: &'static str,
    oid: &'static str,
    uri: &'static str,
}

static DIGEST_ALGORITHMS: [DigestAlgorithmInfo; 11] = [
    DigestAlgorithmInfo {
        alg: DigestAlgorithm::Sha1,
        name: "SHA1",
        oid: "1.3.14.3.2.26",
        uri: "http://www.w3.org/2000/09/xmldsig#sha1",
    },
    DigestAlgorithmInfo {
        alg: DigestAlgorithm::Sha224,
        name: "SHA224",
        oid: "2.16.840.1.101.3.4.2.4",
        uri: "http://www.w3.org/2001/04/xmldsig-more#sha224",
    },
    DigestAlgorithmInfo {
        alg: DigestAlgorithm::Sha256,
        name: "SHA256",
        oid: "2.16.840.1.101.3.4.2.1",
        uri: "http://www.w3.org/2001/04/xmlenc#sha256",
    },
    DigestAlgorithmInfo {
        alg: DigestAlgorithm::Sha384,
        name: "SHA384",
        oid: "2.16.840.1.101.3.4.2.2",
        uri: "http://www.w3.org/2001/04/xmldsig-more#sha384",
    },
    DigestAlgorithmInfo {
        alg: DigestAlgorithm::Sha512,
        name: "SHA512",
        oid: "2.16.840.1.101.3.4.2.3",
        uri: "http://www.w3.org/2001/04/xmlenc#sha512",
    },
    DigestAlgorithmInfo {
        alg: DigestAlgorithm::Sha3_224,
        name: "SHA3-224",
        oid: "2.16.840.1.101.3.4.2.7",
        uri: "http://www.w3.org/2007/05/xmldsig-more#sha3-224",
    },
    DigestAlgorithmInfo {
        alg: DigestAlgorithm::Sha3_256,
        name: "SHA3-256",
        oid: "2.16.840.1.101.3.4.2.8",
        uri: "http://www.w3.org/2007/05/xmldsig-more#sha3-256",
    },
    DigestAlgorithmInfo {
        alg: DigestAlgorithm::Sha3_384,
        name: "SHA3-384",
        oid: "2.16.840.1.101.3.4.2.9",
        uri: "http://www.w3.org/2007/05/xmldsig-more#sha3-384",
    },
    DigestAlgorithmInfo {
        alg: DigestAlgorithm::Sha3_512,
        name: "SHA3-512",
        oid: "2.16.840.1.101.3.4.2.10",
        uri: "http://www.w3.org/2007/05/xmldsig-more#sha3-512",
    },
    DigestAlgorithmInfo {
        alg: DigestAlgorithm::Md5,
        name: "MD5",
        oid: "1.2.840.113549.2.5",
        uri: "http://www.w3.org/2001/04/xmldsig-more#md5",
    },
    DigestAlgorithmInfo {
        alg: DigestAlgorithm::Ripemd160,
        name: "RIPEMD160",
        oid: "1.3.36.3.2.1",
        uri: "http://www.w3.org/2001/04/xmlenc#ripemd160",
    },
];

impl DigestAlgorithm {
    /// Every recognized digest algorithm, in declaration order.
    pub const ALL: [DigestAlgorithm; 11] = [
        Self::Sha1,
        Self::Sha224,
        Self::Sha256,
        Self::Sha384,
        Self::Sha512,
        Self::Sha3_224,
        Self::Sha3_256,
        Self::Sha3_384,
        Self::Sha3_512,
        Self::Md5,
        Self::Ripemd160,
    ];

    fn info(&self) -> &'static DigestAlgorithmInfo {
        // The table is declared in variant order.
        &DIGEST_ALGORITHMS[*self as usize]
    }

    /// Return the algorithm's name (e.g. `SHA256`).
    pub fn name(&self) -> &'static str {
        self.info().name
    }

    /// Return the algorithm's OID in dotted-decimal form.
    pub fn oid(&self) -> &'static str {
        self.info().oid
    }

    /// Return the algorithm's XML-DSig URI.
    pub fn uri(&self) -> &'static str {
        self.info().uri
    }

    /// Look up an algorithm by OID.
    pub fn from_oid(oid: &str) -> Option<Self> {
        DIGEST_ALGORITHMS
            .iter()
            .find(|info| info.oid == oid)
            .map(|info| info.alg)
    }

    /// Look up an algorithm by XML-DSig URI.
    pub fn from_uri(uri: &str) -> Option<Self> {
        DIGEST_ALGORITHMS
            .iter()
            .find(|info| info.uri == uri)
            .map(|info| info.alg)
    }

    /// Return `true` if digests with this algorithm can be computed.
    pub fn is_supported(&self) -> bool {
        self.digester().is_some()
    }

    /// Return a streaming [`Hasher`] for this algorithm, or `None` if the
    /// algorithm is recognized but cannot be computed.
    pub fn digester(&self) -> Option<Hasher> {
        match self {
            Self::Sha1 => Some(Hasher::Sha1(Sha1::new())),
            Self::Sha224 => Some(Hasher::Sha224(Sha224::new())),
            Self::Sha256 => Some(Hasher::Sha256(Sha256::new())),
            Self::Sha384 => Some(Hasher::Sha384(Sha384::new())),
            Self::Sha512 => Some(Hasher::Sha512(Sha512::new())),
            Self::Sha3_224 => Some(Hasher::Sha3_224(Sha3_224::new())),
            Self::Sha3_256 => Some(Hasher::Sha3_256(Sha3_256::new())),
            Self::Sha3_384 => Some(Hasher::Sha3_384(Sha3_384::new())),
            Self::Sha3_512 => Some(Hasher::Sha3_512(Sha3_512::new())),
            Self::Md5 | Self::Ripemd160 => None,
        }
    }

    /// Return the digest of `data`, or `None` if the algorithm cannot be
    /// computed.
    pub fn digest(&self, data: &[u8]) -> Option<Vec<u8>> {
        let mut hasher = self.digester()?;
        hasher.update(data);
        Some(hasher.finalize())
    }

    /// Return the digest of everything that can be read from `reader`.
    ///
    /// Returns `Ok(None)` without reading if the algorithm cannot be computed.
    /// A read error is propagated to the caller.
    pub fn digest_reader(&self, reader: &mut dyn Read) -> io::Result<Option<Vec<u8>>> {
        let Some(mut hasher) = self.digester() else {
            return Ok(None);
        };

        let mut buf = vec![0u8; HASH_BUF_SIZE];
        loop {
            match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(len) => hasher.update(&buf[..len]),
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            }
        }

        Ok(Some(hasher.finalize()))
    }
}

impl FromStr for DigestAlgorithm {
    type Err = UnknownAlgorithmError;

    fn from_str(alg: &str) -> Result<Self, Self::Err> {
        DIGEST_ALGORITHMS
            .iter()
            .find(|info| info.name.eq_ignore_ascii_case(alg))
            .map(|info| info.alg)
            .ok_or_else(|| UnknownAlgorithmError(alg.to_owned()))
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Incremental digest state for one of the computable [`DigestAlgorithm`]s.
pub enum Hasher {
    /// SHA-1 state
    Sha1(Sha1),

    /// SHA-224 state
    Sha224(Sha224),

    /// SHA-256 state
    Sha256(Sha256),

    /// SHA-384 state
    Sha384(Sha384),

    /// SHA-512 state
    Sha512(Sha512),

    /// SHA3-224 state
    Sha3_224(Sha3_224),

    /// SHA3-256 state
    Sha3_256(Sha3_256),

    /// SHA3-384 state
    Sha3_384(Sha3_384),

    /// SHA3-512 state
    Sha3_512(Sha3_512),
}

impl Hasher {
    /// Update the digest with new data.
    pub fn update(&mut self, data: &[u8]) {
        match self {
            Self::Sha1(d) => d.update(data),
            Self::Sha224(d) => d.update(data),
            Self::Sha256(d) => d.update(data),
            Self::Sha384(d) => d.update(data),
            Self::Sha512(d) => d.update(data),
            Self::Sha3_224(d) => d.update(data),
            Self::Sha3_256(d) => d.update(data),
            Self::Sha3_384(d) => d.update(data),
            Self::Sha3_512(d) => d.update(data),
        }
    }

    /// Consume the hasher and return the final digest.
    pub fn finalize(self) -> Vec<u8> {
        match self {
            Self::Sha1(d) => d.finalize().to_vec(),
            Self::Sha224(d) => d.finalize().to_vec(),
            Self::Sha256(d) => d.finalize().to_vec(),
            Self::Sha384(d) => d.finalize().to_vec(),
            Self::Sha512(d) => d.finalize().to_vec(),
            Self::Sha3_224(d) => d.finalize().to_vec(),
            Self::Sha3_256(d) => d.finalize().to_vec(),
            Self::Sha3_384(d) => d.finalize().to_vec(),
            Self::Sha3_512(d) => d.finalize().to_vec(),
        }
    }
}
