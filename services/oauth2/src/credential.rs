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

use cloudsign_core::time::{now, DateTime};
use cloudsign_core::utils::Redact;
use cloudsign_core::SigningCredential;
use std::fmt::{Debug, Formatter};

/// OAuth2 access token.
#[derive(Default, Clone)]
pub struct Token {
    /// The access token.
    pub access_token: String,
    /// Token type returned by the token endpoint, usually `Bearer`.
    pub token_type: String,
    /// Expiration time of this token.
    pub expires_in: Option<DateTime>,
}

impl Token {
    /// Create a token without expiry.
    pub fn new(access_token: &str) -> Self {
        Self {
            access_token: access_token.to_string(),
            token_type: "Bearer".to_string(),
            expires_in: None,
        }
    }
}

impl Debug for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Token")
            .field("access_token", &Redact::from(&self.access_token))
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

impl SigningCredential for Token {
    fn is_valid(&self) -> bool {
        if self.access_token.is_empty() {
            return false;
        }
        // Take 120s as buffer to avoid edge cases.
        self.expires_in
            .map_or(true, |v| v > now() + chrono::TimeDelta::seconds(120))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_validity() {
        let token = Token::new("ya29.token");
        assert!(token.is_valid());

        let expiring = Token {
            expires_in: Some(now() + chrono::TimeDelta::seconds(60)),
            ..token.clone()
        };
        assert!(!expiring.is_valid());

        let fresh = Token {
            expires_in: Some(now() + chrono::TimeDelta::seconds(3600)),
            ..token
        };
        assert!(fresh.is_valid());

        assert!(!Token::default().is_valid());
    }

    #[test]
    fn test_debug_redacts_token() {
        let token = Token::new("ya29.a0AfH6SMBx-very-secret");
        assert!(!format!("{token:?}").contains("very-secret"));
    }
}
