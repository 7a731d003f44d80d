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

//! OAuth2 JWT-bearer support with convenience APIs

pub use cloudsign_oauth2::*;

use crate::{Context, Signer};

/// Default OAuth2 Signer type.
pub type DefaultSigner = Signer<Token>;

/// Create a bearer signer whose token comes from a JWT-bearer exchange.
///
/// `ctx` must carry an http client able to reach the token endpoint.
pub fn jwt_bearer_signer(ctx: Context, provider: JwtBearerCredentialProvider) -> DefaultSigner {
    Signer::new(ctx, provider, BearerTokenSigner::new())
}
