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

//! AWS service support with convenience APIs

pub use cloudsign_aws_v4::*;

use crate::{default_context, Context, Result, Signer};

/// Default AWS Signer type.
pub type DefaultSigner = Signer<Credential>;

/// Create a signer for the AWS endpoint `host`, loading credentials from
/// the process environment.
pub fn default_signer(host: &str) -> Result<DefaultSigner> {
    signer_with_context(default_context(), host)
}

/// Create a signer for the AWS endpoint `host` using `ctx` to load
/// credentials from env.
pub fn signer_with_context(ctx: Context, host: &str) -> Result<DefaultSigner> {
    let builder = FormSignerV4::for_endpoint(host)?;
    Ok(Signer::new(ctx, EnvCredentialProvider::new(), builder))
}
