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

use crate::constants::*;
use crate::Credential;
use async_trait::async_trait;
use cloudsign_core::{Context, ProvideCredential, Result};

/// EnvCredentialProvider loads the storage account credential from env.
///
/// - `AZURE_STORAGE_ACCOUNT_NAME`: the account name, always required
/// - `AZURE_STORAGE_SAS_TOKEN`: a SAS token, preferred when set
/// - `AZURE_STORAGE_ACCOUNT_KEY`: the account key
#[derive(Debug, Default, Clone)]
pub struct EnvCredentialProvider;

impl EnvCredentialProvider {
    /// Create a new EnvCredentialProvider.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProvideCredential for EnvCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let Some(account_name) = ctx.env_var(AZURE_STORAGE_ACCOUNT_NAME) else {
            return Ok(None);
        };

        let secret = ctx
            .env_var(AZURE_STORAGE_SAS_TOKEN)
            .filter(|v| !v.is_empty())
            .or_else(|| ctx.env_var(AZURE_STORAGE_ACCOUNT_KEY));

        Ok(secret.map(|secret| Credential {
            account_name,
            secret,
        }))
    }
}
