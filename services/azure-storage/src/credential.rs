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

use cloudsign_core::utils::Redact;
use cloudsign_core::SigningCredential;
use std::fmt::{Debug, Formatter};

/// Credential of an azure storage account.
///
/// `secret` is either the base64 encoded account key or a SAS token; see
/// [`SigningMode::detect`](crate::SigningMode::detect).
#[derive(Default, Clone)]
pub struct Credential {
    /// Azure storage account name.
    pub account_name: String,
    /// Account key or SAS token.
    pub secret: String,
}

impl Credential {
    /// Create a new credential.
    pub fn new(account_name: &str, secret: &str) -> Self {
        Self {
            account_name: account_name.to_string(),
            secret: secret.to_string(),
        }
    }
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("account_name", &self.account_name)
            .field("secret", &Redact::from(&self.secret))
            .finish()
    }
}

impl SigningCredential for Credential {
    fn is_valid(&self) -> bool {
        !self.account_name.is_empty() && !self.secret.is_empty()
    }
}
