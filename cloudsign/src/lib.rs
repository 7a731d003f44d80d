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

//! Signing and retrying multi-cloud REST API requests.
//!
//! This crate re-exports [`cloudsign_core`] and puts every service behind
//! a cargo feature:
//!
//! - `aws`: AWS SigV4 form signing, see [`aws`].
//! - `azure`: Azure Storage SharedKeyLite and SAS signing, see [`azure`].
//! - `oauth2`: OAuth2 JWT-bearer tokens and bearer signing, see [`oauth2`].
//! - `retry`: backoff and rate-limit retry handling, see [`retry`].
//!
//! ```no_run
//! # async fn example() -> cloudsign::Result<()> {
//! let signer = cloudsign::aws::default_signer("ec2.us-west-2.amazonaws.com")?;
//! # Ok(())
//! # }
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub use cloudsign_core::*;

#[cfg(feature = "aws")]
pub mod aws;

#[cfg(feature = "azure")]
pub mod azure;

#[cfg(feature = "oauth2")]
pub mod oauth2;

#[cfg(feature = "retry")]
pub mod retry {
    //! Retry and backoff handling.
    pub use cloudsign_retry::*;
}

/// Context reading the process environment.
///
/// No http client is configured: providers that exchange tokens need
/// [`Context::with_http_send`].
pub fn default_context() -> Context {
    Context::new().with_env(OsEnv)
}
