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

//! Azure Storage service support with convenience APIs

pub use cloudsign_azure_storage::*;

use crate::{default_context, Context, Signer};
use log::debug;

/// Default Azure Storage Signer type.
pub type DefaultSigner = Signer<Credential>;

/// Create a signer loading the account credential from the process
/// environment.
pub fn default_signer() -> DefaultSigner {
    signer_with_context(default_context())
}

/// Create a signer loading the account credential through `ctx`.
///
/// The signing mode is picked from the environment once: a non-empty
/// `AZURE_STORAGE_SAS_TOKEN` selects SAS signing, otherwise requests are
/// signed with SharedKeyLite.
pub fn signer_with_context(ctx: Context) -> DefaultSigner {
    let builder = match ctx
        .env_var(AZURE_STORAGE_SAS_TOKEN)
        .filter(|v| !v.is_empty())
    {
        Some(token) => RequestSigner::for_secret(&token),
        None => RequestSigner::new(SigningMode::SharedKeyLite),
    };
    debug!("azure storage signer uses {:?}", builder.mode());

    Signer::new(ctx, EnvCredentialProvider::new(), builder)
}
