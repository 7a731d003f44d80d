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

use async_trait::async_trait;
use cloudsign_core::hash::hex_hmac_sha256;
use cloudsign_core::time::{format_iso8601, now};
use cloudsign_core::{
    Context, Error, HttpRequest, OsEnv, ProvideCredential, Result, SignRequest, Signer,
    SigningCredential,
};

#[derive(Clone, Debug)]
struct ApiKey {
    key_id: String,
    secret: String,
}

impl SigningCredential for ApiKey {
    fn is_valid(&self) -> bool {
        !self.key_id.is_empty() && !self.secret.is_empty()
    }
}

#[derive(Debug)]
struct EnvApiKeyProvider;

#[async_trait]
impl ProvideCredential for EnvApiKeyProvider {
    type Credential = ApiKey;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let key_id = ctx.env_var("MY_API_KEY_ID").unwrap_or_default();
        let secret = ctx.env_var("MY_API_SECRET").unwrap_or_default();

        if key_id.is_empty() || secret.is_empty() {
            println!("No credentials found in environment, using demo credentials");
            return Ok(Some(ApiKey {
                key_id: "demo-key".to_string(),
                secret: "demo-secret".to_string(),
            }));
        }

        Ok(Some(ApiKey { key_id, secret }))
    }
}

/// Signs `METHOD\nPATH\nTIMESTAMP` with HMAC-SHA256.
#[derive(Debug)]
struct HmacHeaderSigner;

#[async_trait]
impl SignRequest for HmacHeaderSigner {
    type Credential = ApiKey;

    async fn sign_request(
        &self,
        _ctx: &Context,
        req: &HttpRequest,
        credential: Option<&Self::Credential>,
    ) -> Result<HttpRequest> {
        let cred = credential.ok_or_else(|| Error::credential_invalid("missing api key"))?;

        let timestamp = format_iso8601(now());
        let content = format!("{}\n{}\n{}", req.method(), req.endpoint().path(), timestamp);
        let signature = hex_hmac_sha256(cred.secret.as_bytes(), content.as_bytes())?;

        req.to_builder()
            .replace_header("x-api-key", cred.key_id.as_str())
            .replace_header("x-api-timestamp", timestamp.as_str())
            .replace_sensitive_header("x-api-signature", &signature)
            .build()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = env_logger::builder().try_init();

    let ctx = Context::new().with_env(OsEnv);
    let signer = Signer::new(ctx, EnvApiKeyProvider, HmacHeaderSigner);

    let req = HttpRequest::builder()
        .endpoint("https://api.example.com/v1/users")
        .build()?;

    match signer.sign(&req).await {
        Ok(signed) => {
            println!("Request signed successfully!");
            println!("Headers: {:?}", signed.headers());
        }
        Err(e) => {
            eprintln!("Failed to sign request: {e}");
        }
    }

    Ok(())
}
