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

use crate::{
    Context, Error, HttpRequest, LogTraceSink, ProvideCredential, Result, SignRequest,
    SigningCredential, TraceSink,
};
use std::sync::{Arc, Mutex};

/// Signer is the main struct used to sign the request.
///
/// The signer keeps the last credential it loaded. Each call to
/// [`Signer::sign`] takes exactly one snapshot of it and reloads only when
/// the snapshot is missing or no longer valid.
#[derive(Clone, Debug)]
pub struct Signer<K: SigningCredential> {
    ctx: Context,
    loader: Arc<dyn ProvideCredential<Credential = K>>,
    builder: Arc<dyn SignRequest<Credential = K>>,
    credential: Arc<Mutex<Option<K>>>,
    trace: Option<Arc<dyn TraceSink>>,
}

impl<K: SigningCredential> Signer<K> {
    /// Create a new signer.
    ///
    /// Signature tracing is on by default through [`LogTraceSink`].
    pub fn new(
        ctx: Context,
        loader: impl ProvideCredential<Credential = K>,
        builder: impl SignRequest<Credential = K>,
    ) -> Self {
        Self {
            ctx,

            loader: Arc::new(loader),
            builder: Arc::new(builder),
            credential: Arc::new(Mutex::new(None)),
            trace: Some(Arc::new(LogTraceSink)),
        }
    }

    /// Replace the trace sink.
    pub fn with_trace_sink(mut self, sink: impl TraceSink) -> Self {
        self.trace = Some(Arc::new(sink));
        self
    }

    /// Disable signature tracing.
    pub fn without_trace_sink(mut self) -> Self {
        self.trace = None;
        self
    }

    /// Signing request.
    pub async fn sign(&self, req: &HttpRequest) -> Result<HttpRequest> {
        let credential = self.credential_snapshot()?;
        let credential = if credential.is_valid() {
            credential
        } else {
            let loaded = self.loader.provide_credential(&self.ctx).await?;
            *self
                .credential
                .lock()
                .map_err(|_| Error::unexpected("signer credential lock poisoned"))? =
                loaded.clone();
            loaded
        };

        if let Some(trace) = &self.trace {
            trace.before_signing(req);
        }
        let signed = self
            .builder
            .sign_request(&self.ctx, req, credential.as_ref())
            .await?;
        if let Some(trace) = &self.trace {
            trace.after_signing(&signed);
        }

        Ok(signed)
    }

    fn credential_snapshot(&self) -> Result<Option<K>> {
        Ok(self
            .credential
            .lock()
            .map_err(|_| Error::unexpected("signer credential lock poisoned"))?
            .clone())
    }
}
