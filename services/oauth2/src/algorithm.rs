// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use cloudsign_core::{Error, Result};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// JWS signing algorithms supported for JWT assertions.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JwsAlgorithm {
    /// Unsigned token, the signature part is empty.
    None,
    /// HMAC using SHA-256.
    HS256,
    /// HMAC using SHA-384.
    HS384,
    /// HMAC using SHA-512.
    HS512,
    /// RSASSA-PKCS1-v1_5 using SHA-256.
    RS256,
    /// RSASSA-PKCS1-v1_5 using SHA-384.
    RS384,
    /// RSASSA-PKCS1-v1_5 using SHA-512.
    RS512,
}

/// Static description of a [`JwsAlgorithm`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlgorithmSpec {
    /// Name used in the JWS `alg` header.
    pub name: &'static str,
    /// Name of the underlying signature algorithm.
    pub signature_algorithm: &'static str,
}

impl JwsAlgorithm {
    /// All supported algorithms.
    pub const ALL: [JwsAlgorithm; 7] = [
        JwsAlgorithm::None,
        JwsAlgorithm::HS256,
        JwsAlgorithm::HS384,
        JwsAlgorithm::HS512,
        JwsAlgorithm::RS256,
        JwsAlgorithm::RS384,
        JwsAlgorithm::RS512,
    ];

    /// Look up the spec of this algorithm.
    pub const fn spec(self) -> AlgorithmSpec {
        let (name, signature_algorithm) = match self {
            JwsAlgorithm::None => ("none", "none"),
            JwsAlgorithm::HS256 => ("HS256", "HmacSHA256"),
            JwsAlgorithm::HS384 => ("HS384", "HmacSHA384"),
            JwsAlgorithm::HS512 => ("HS512", "HmacSHA512"),
            JwsAlgorithm::RS256 => ("RS256", "SHA256withRSA"),
            JwsAlgorithm::RS384 => ("RS384", "SHA384withRSA"),
            JwsAlgorithm::RS512 => ("RS512", "SHA512withRSA"),
        };
        AlgorithmSpec {
            name,
            signature_algorithm,
        }
    }

    /// JWS name of this algorithm.
    pub const fn name(self) -> &'static str {
        self.spec().name
    }

    /// Returns true for the RSA based algorithms.
    pub const fn is_rsa(self) -> bool {
        matches!(
            self,
            JwsAlgorithm::RS256 | JwsAlgorithm::RS384 | JwsAlgorithm::RS512
        )
    }
}

impl Display for JwsAlgorithm {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for JwsAlgorithm {
    type Err = Error;

    /// Parse from the JWS name, which is case sensitive.
    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|alg| alg.name() == s)
            .ok_or_else(|| Error::config_invalid(format!("unsupported jws algorithm: {s}")))
    }
}
