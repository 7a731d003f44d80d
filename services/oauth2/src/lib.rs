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

//! OAuth2 JWT-bearer authorization.
//!
//! [`JwtBearerCredentialProvider`] signs a JWT assertion and exchanges it
//! for an access token; [`BearerTokenSigner`] puts the token on requests.
//!
//! ```no_run
//! use cloudsign_core::{Context, HttpRequest, Signer};
//! use cloudsign_oauth2::{BearerTokenSigner, JwsAlgorithm, JwtBearerCredentialProvider};
//!
//! # async fn example(ctx: Context, pem: &str) -> cloudsign_core::Result<()> {
//! let loader = JwtBearerCredentialProvider::new(
//!     "https://oauth2.googleapis.com/token",
//!     "client@example.iam.gserviceaccount.com",
//!     JwsAlgorithm::RS256,
//!     pem,
//! )
//! .with_scope("https://www.googleapis.com/auth/compute");
//! let signer = Signer::new(ctx, loader, BearerTokenSigner::new());
//!
//! let req = HttpRequest::builder()
//!     .endpoint("https://compute.googleapis.com/compute/v1/projects/demo/zones")
//!     .build()?;
//! let signed = signer.sign(&req).await?;
//! # Ok(())
//! # }
//! ```

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

mod constants;
pub use constants::JWT_BEARER_GRANT_TYPE;

mod algorithm;
pub use algorithm::{AlgorithmSpec, JwsAlgorithm};
pub mod jwt;
mod credential;
pub use credential::Token;
mod provide_credential;
pub use provide_credential::*;
mod sign_request;
pub use sign_request::BearerTokenSigner;
