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

use cloudsign_core::HttpRequest;

/// Lifecycle of a command on the retry path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandState {
    /// The command is being sent, or is ready to be sent.
    Active,
    /// A handler decided to retry; the command will be sent again.
    Retrying,
    /// The last response was successful.
    Succeeded,
    /// The retry path gave up.
    Exhausted,
    /// A wait was interrupted.
    Aborted,
}

impl CommandState {
    /// Returns true if no further attempt will be made.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            CommandState::Succeeded | CommandState::Exhausted | CommandState::Aborted
        )
    }
}

/// HttpCommand is the unit of retry state for one logical call.
///
/// It owns the request to send next and counts the failures seen so far.
/// The failure count only goes up.
#[derive(Debug, Clone)]
pub struct HttpCommand {
    current_request: HttpRequest,
    failure_count: u32,
    state: CommandState,
}

impl HttpCommand {
    /// Create a command for `req`.
    pub fn new(req: HttpRequest) -> Self {
        Self {
            current_request: req,
            failure_count: 0,
            state: CommandState::Active,
        }
    }

    /// The request that will be sent next.
    pub fn current_request(&self) -> &HttpRequest {
        &self.current_request
    }

    /// Replace the request that will be sent next, for example after re-signing.
    pub fn set_current_request(&mut self, req: HttpRequest) {
        self.current_request = req;
    }

    /// Failures recorded so far.
    pub fn failure_count(&self) -> u32 {
        self.failure_count
    }

    /// Record one more failure and return the new count.
    pub fn increment_failure_count(&mut self) -> u32 {
        self.failure_count = self.failure_count.saturating_add(1);
        self.failure_count
    }

    /// Returns true if the current request can be sent again.
    pub fn is_replayable(&self) -> bool {
        self.current_request.is_replayable()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> CommandState {
        self.state
    }

    pub(crate) fn set_state(&mut self, state: CommandState) {
        self.state = state;
    }
}
