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

//! Core components for signing cloud API requests.
//!
//! This crate provides the foundational types and traits for the cloudsign
//! ecosystem.
//!
//! ## Overview
//!
//! The crate is built around several key concepts:
//!
//! - **HttpRequest**: an immutable outbound request, changed only by deriving a new value
//! - **Context**: a container that holds implementations for HTTP sending and environment access
//! - **Traits**: abstract interfaces for credential loading (`ProvideCredential`) and request signing (`SignRequest`)
//! - **Signer**: the orchestrator that coordinates credential loading, request signing and signature tracing
//!
//! ## Example
//!
//! ```no_run
//! use cloudsign_core::{
//!     Context, HttpRequest, ProvideCredential, Result, SignRequest, Signer, SigningCredential,
//! };
//! use async_trait::async_trait;
//!
//! #[derive(Clone, Debug)]
//! struct MyCredential {
//!     token: String,
//! }
//!
//! impl SigningCredential for MyCredential {
//!     fn is_valid(&self) -> bool {
//!         !self.token.is_empty()
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct MyLoader;
//!
//! #[async_trait]
//! impl ProvideCredential for MyLoader {
//!     type Credential = MyCredential;
//!
//!     async fn provide_credential(&self, _: &Context) -> Result<Option<Self::Credential>> {
//!         Ok(Some(MyCredential {
//!             token: "my-token".to_string(),
//!         }))
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct MyBuilder;
//!
//! #[async_trait]
//! impl SignRequest for MyBuilder {
//!     type Credential = MyCredential;
//!
//!     async fn sign_request(
//!         &self,
//!         _: &Context,
//!         req: &HttpRequest,
//!         cred: Option<&Self::Credential>,
//!     ) -> Result<HttpRequest> {
//!         let token = cred.map(|c| c.token.as_str()).unwrap_or_default();
//!         req.to_builder().replace_header("x-token", token).build()
//!     }
//! }
//!
//! # async fn example() -> Result<()> {
//! let signer = Signer::new(Context::default(), MyLoader, MyBuilder);
//!
//! let req = HttpRequest::builder()
//!     .endpoint("https://example.com")
//!     .build()?;
//! let signed = signer.sign(&req).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Utilities
//!
//! - [`hash`]: Cryptographic hashing utilities
//! - [`time`]: Time manipulation utilities
//! - [`utils`]: General utilities including data redaction

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod error;
pub use error::{Error, ErrorKind, Result};
mod context;
pub use context::{Context, HttpSend, NoopHttpSend};
mod env;
pub use env::{Env, NoopEnv, OsEnv, StaticEnv};

mod payload;
pub use payload::{ContentMetadata, Payload};
mod request;
pub use request::{HttpRequest, HttpRequestBuilder};
mod signing;
pub use signing::SigningRequest;

mod api;
pub use api::{ProvideCredential, SignRequest, SigningCredential};
mod chain;
pub use chain::ProvideCredentialChain;
mod trace;
pub use trace::{LogTraceSink, TraceSink, SIGNATURE_LOG_TARGET};
mod signer;
pub use signer::Signer;
