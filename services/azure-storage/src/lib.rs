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

//! Azure Storage signing.
//!
//! Requests are authorized either with a `SharedKeyLite` header computed
//! from the account key, or with a SAS token appended to the query string.
//! The [`SigningMode`] is picked once, when the [`RequestSigner`] is built.
//!
//! ```no_run
//! use cloudsign_azure_storage::{RequestSigner, StaticCredentialProvider};
//! use cloudsign_core::{Context, HttpRequest, Signer};
//!
//! # async fn example() -> cloudsign_core::Result<()> {
//! let secret = "?sv=2021-08-06&ss=b&srt=co&sp=rl&sig=c2lnbmF0dXJl";
//! let signer = Signer::new(
//!     Context::new(),
//!     StaticCredentialProvider::new("myaccount", secret),
//!     RequestSigner::for_secret(secret),
//! );
//!
//! let req = HttpRequest::builder()
//!     .endpoint("https://myaccount.blob.core.windows.net/mycontainer/myblob")
//!     .build()?;
//! let signed = signer.sign(&req).await?;
//! # Ok(())
//! # }
//! ```

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

mod constants;
pub use constants::{AZURE_STORAGE_ACCOUNT_KEY, AZURE_STORAGE_ACCOUNT_NAME, AZURE_STORAGE_SAS_TOKEN};

mod credential;
pub use credential::Credential;
mod mode;
pub use mode::SigningMode;
mod provide_credential;
pub use provide_credential::*;
mod sign_request;
pub use sign_request::{string_to_sign, RequestSigner};
