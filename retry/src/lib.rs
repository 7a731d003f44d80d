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

//! Retry and backoff for signed cloud HTTP commands.
//!
//! A [`HttpCommand`] carries the request and its failure count. After a
//! failed response a [`RetryHandler`] decides whether to send it again:
//!
//! - [`BackoffLimitedRetryHandler`] waits `period * failures^pow` (capped) for generic failures.
//! - [`RateLimitRetryHandler`] waits as long as a `429` response asks, and can be interrupted.
//! - [`DelegatingRetryHandler`] routes 429 to the rate-limit handler and other failures to backoff.
//!
//! [`execute_with_retry`] ties them together:
//!
//! ```
//! use cloudsign_core::HttpRequest;
//! use cloudsign_retry::{execute_with_retry, DelegatingRetryHandler, HttpCommand, HttpResponse};
//! use http::StatusCode;
//!
//! # fn main() -> cloudsign_core::Result<()> {
//! let req = HttpRequest::builder().endpoint("https://example.com/").build()?;
//! let mut command = HttpCommand::new(req);
//! let handler = DelegatingRetryHandler::default();
//!
//! let resp = execute_with_retry(&mut command, &handler, |_req| {
//!     Ok(HttpResponse::new(StatusCode::OK))
//! })?;
//! assert_eq!(resp.status(), StatusCode::OK);
//! # Ok(())
//! # }
//! ```

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

mod backoff;
pub use backoff::{
    backoff_delay, impose_backoff_exponential_delay, impose_backoff_exponential_delay_with_max,
    BackoffLimitedRetryHandler,
};
mod command;
pub use command::{CommandState, HttpCommand};
mod config;
pub use config::{
    RetryConfig, CLOUDSIGN_MAX_RATE_LIMIT_WAIT, CLOUDSIGN_MAX_RETRIES, CLOUDSIGN_RETRY_DELAY_START,
};
mod delegating;
pub use delegating::DelegatingRetryHandler;
mod execute;
pub use execute::execute_with_retry;
mod handler;
pub use handler::{RetryDecision, RetryHandler};
mod interrupt;
pub use interrupt::Interrupt;
mod rate_limit;
pub use rate_limit::{RateLimitPolicy, RateLimitRetryHandler, RetryAfter};
mod response;
pub use response::HttpResponse;
