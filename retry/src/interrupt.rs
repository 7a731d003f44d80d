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

use cloudsign_core::{Error, Result};
use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

/// Interrupt cancels blocking rate-limit waits.
///
/// Clones share the same flag. Once triggered, the flag stays set until
/// [`Interrupt::clear`] is called, so every later wait aborts at once.
///
/// ```
/// use cloudsign_retry::Interrupt;
/// use std::time::Duration;
///
/// let interrupt = Interrupt::new();
/// let waiter = interrupt.clone();
/// let handle = std::thread::spawn(move || waiter.sleep(Duration::from_secs(60)));
///
/// interrupt.interrupt();
/// assert!(handle.join().unwrap().is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Interrupt {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    triggered: Mutex<bool>,
    cond: Condvar,
}

impl Interrupt {
    /// Create an untriggered interrupt.
    pub fn new() -> Self {
        Self::default()
    }

    /// Trigger the interrupt and wake every blocked waiter.
    pub fn interrupt(&self) {
        if let Ok(mut triggered) = self.inner.triggered.lock() {
            *triggered = true;
        }
        self.inner.cond.notify_all();
    }

    /// Returns true if the interrupt has been triggered.
    pub fn is_interrupted(&self) -> bool {
        self.inner.triggered.lock().map(|v| *v).unwrap_or(true)
    }

    /// Reset the flag.
    pub fn clear(&self) {
        if let Ok(mut triggered) = self.inner.triggered.lock() {
            *triggered = false;
        }
    }

    /// Block the current thread for `dur` unless interrupted.
    ///
    /// Returns an [`ErrorKind::Interrupted`](cloudsign_core::ErrorKind::Interrupted)
    /// error if the interrupt was triggered before or during the wait.
    pub fn sleep(&self, dur: Duration) -> Result<()> {
        let deadline = Instant::now() + dur;
        let mut triggered = self
            .inner
            .triggered
            .lock()
            .map_err(|_| Error::unexpected("interrupt lock poisoned"))?;

        loop {
            if *triggered {
                return Err(Error::interrupted(format!(
                    "wait of {}ms interrupted",
                    dur.as_millis()
                )));
            }

            let now = Instant::now();
            if now >= deadline {
                return Ok(());
            }

            // Spurious wakeups re-check both the flag and the deadline.
            triggered = self
                .inner
                .cond
                .wait_timeout(triggered, deadline - now)
                .map_err(|_| Error::unexpected("interrupt lock poisoned"))?
                .0;
        }
    }
}
