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

use crate::{HttpCommand, HttpResponse};
use std::fmt::Debug;

/// Outcome of a retry handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryDecision {
    /// Send the command again.
    Retry,
    /// Stop retrying, with the reason.
    GiveUp(String),
    /// A wait was interrupted; stop retrying.
    Aborted,
}

impl RetryDecision {
    pub(crate) fn give_up(reason: impl Into<String>) -> Self {
        RetryDecision::GiveUp(reason.into())
    }

    /// Returns true for [`RetryDecision::Retry`].
    pub fn is_retry(&self) -> bool {
        matches!(self, RetryDecision::Retry)
    }
}

/// RetryHandler decides whether a failed command is sent again.
///
/// Handlers may block the calling thread before answering
/// [`RetryDecision::Retry`]. They never open, read or close the response
/// payload.
pub trait RetryHandler: Debug + Send + Sync + 'static {
    /// Decide on `response`, recording the failure on `command`.
    fn should_retry(&self, command: &mut HttpCommand, response: &HttpResponse) -> RetryDecision;
}

impl<T: RetryHandler + ?Sized> RetryHandler for std::sync::Arc<T> {
    fn should_retry(&self, command: &mut HttpCommand, response: &HttpResponse) -> RetryDecision {
        self.as_ref().should_retry(command, response)
    }
}
