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

//! AWS SigV4 form signing.
//!
//! AWS query APIs such as EC2, STS or SQS take their parameters in a form
//! encoded POST body. [`FormSignerV4`] signs such requests with the
//! `Authorization` header.
//!
//! ```no_run
//! use cloudsign_aws_v4::{EnvCredentialProvider, FormSignerV4};
//! use cloudsign_core::{Context, HttpRequest, OsEnv, Payload, Signer};
//!
//! # async fn example() -> cloudsign_core::Result<()> {
//! let ctx = Context::new().with_env(OsEnv);
//! let signer = Signer::new(
//!     ctx,
//!     EnvCredentialProvider::new(),
//!     FormSignerV4::for_endpoint("ec2.us-west-2.amazonaws.com")?,
//! );
//!
//! let req = HttpRequest::builder()
//!     .method(http::Method::POST)
//!     .endpoint("https://ec2.us-west-2.amazonaws.com/")
//!     .header(http::header::HOST, "ec2.us-west-2.amazonaws.com")
//!     .payload(
//!         Payload::from_bytes("Action=DescribeRegions&Version=2013-10-15")
//!             .with_content_type("application/x-www-form-urlencoded"),
//!     )
//!     .build()?;
//! let signed = signer.sign(&req).await?;
//! # Ok(())
//! # }
//! ```

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

mod constants;
pub use constants::{
    AWS_ACCESS_KEY_ID, AWS_SECRET_ACCESS_KEY, AWS_SESSION_TOKEN, X_AMZ_DATE, X_AMZ_SECURITY_TOKEN,
};

mod credential;
pub use credential::Credential;
mod provide_credential;
pub use provide_credential::*;
mod service_region;
pub use service_region::{
    parse_service_and_region, AwsHostServiceAndRegion, ServiceAndRegion, StaticServiceAndRegion,
};
mod sign_request;
pub use sign_request::{canonical_request, generate_signing_key, string_to_sign, FormSignerV4};
