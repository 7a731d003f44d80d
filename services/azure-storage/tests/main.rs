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

use cloudsign_azure_storage::{
    EnvCredentialProvider, RequestSigner, SigningMode, StaticCredentialProvider,
    AZURE_STORAGE_ACCOUNT_KEY, AZURE_STORAGE_ACCOUNT_NAME, AZURE_STORAGE_SAS_TOKEN,
};
use cloudsign_core::time::parse_rfc3339;
use cloudsign_core::{Context, ErrorKind, HttpRequest, LogTraceSink, Signer, StaticEnv};
use http::{header, Method};
use log::debug;
use pretty_assertions::assert_eq;

const ACCOUNT_KEY: &str = "YXp1cmUtc2hhcmVkLXNlY3JldC1rZXktYnl0ZXMhIQ==";
const SAS_TOKEN: &str = "sv=2021-08-06&ss=b&srt=co&sp=rl&sig=c2lnbmF0dXJl";

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn fixed_signer(secret: &str) -> RequestSigner {
    RequestSigner::for_secret(secret).with_time(parse_rfc3339("2024-03-01T12:00:00Z").unwrap())
}

#[tokio::test]
async fn test_shared_key_lite_through_signer() {
    init();

    let signer = Signer::new(
        Context::new(),
        StaticCredentialProvider::new("myaccount", ACCOUNT_KEY),
        fixed_signer(ACCOUNT_KEY),
    );
    let req = HttpRequest::builder()
        .endpoint("https://myaccount.blob.core.windows.net/mycontainer/myblob?comp=metadata")
        .header("x-ms-version", "2009-09-19")
        .build()
        .unwrap();

    let signed = signer.sign(&req).await.unwrap();
    debug!("signed request: {signed:?}");

    assert_eq!(
        signed.first_header(header::AUTHORIZATION),
        Some("SharedKeyLite myaccount:m4x25M9i/ibl8LMnvtYK3YcuaDH8rnUAG+mPlvEJBXI=")
    );
    assert_eq!(
        signed.first_header(header::DATE),
        Some("Fri, 01 Mar 2024 12:00:00 GMT")
    );
    assert_eq!(signed.endpoint(), req.endpoint());
}

#[tokio::test]
async fn test_env_sas_token_signs_query() {
    init();

    let ctx = Context::new().with_env(StaticEnv::from_pairs([
        (AZURE_STORAGE_ACCOUNT_NAME, "myaccount"),
        (AZURE_STORAGE_ACCOUNT_KEY, ACCOUNT_KEY),
        (AZURE_STORAGE_SAS_TOKEN, SAS_TOKEN),
    ]));
    let signer = Signer::new(ctx, EnvCredentialProvider::new(), fixed_signer(SAS_TOKEN));

    let req = HttpRequest::builder()
        .method(Method::GET)
        .endpoint("http://127.0.0.1:10000/mycontainer/dir/myblob.txt")
        .header(header::AUTHORIZATION, "stale")
        .build()
        .unwrap();

    let signed = signer.sign(&req).await.unwrap();
    assert_eq!(
        signed.endpoint().to_string(),
        format!("https://myaccount.blob.core.windows.net/mycontainer/dir/myblob.txt?{SAS_TOKEN}")
    );
    assert!(signed.headers().get(header::AUTHORIZATION).is_none());
    assert!(signed.headers().get(header::DATE).is_some());
}

#[tokio::test]
async fn test_sas_signature_not_traced() {
    init();

    let signer = Signer::new(
        Context::new(),
        StaticCredentialProvider::new("myaccount", SAS_TOKEN),
        fixed_signer(SAS_TOKEN),
    );
    let req = HttpRequest::builder()
        .endpoint("https://myaccount.blob.core.windows.net/mycontainer/myblob")
        .build()
        .unwrap();

    let signed = signer.sign(&req).await.unwrap();
    assert!(signed.endpoint().to_string().contains("sig=c2lnbmF0dXJl"));

    let line = LogTraceSink.format(&signed);
    assert!(!line.contains("c2lnbmF0dXJl"), "{line}");
    assert!(line.contains("sv=2021-08-06"), "{line}");
    assert!(line.contains("sig=***"), "{line}");
}

#[tokio::test]
async fn test_shared_key_lite_keeps_query() {
    init();

    let signer = Signer::new(
        Context::new(),
        StaticCredentialProvider::new("myaccount", ACCOUNT_KEY),
        fixed_signer(ACCOUNT_KEY),
    );
    let req = HttpRequest::builder()
        .endpoint("https://myaccount.blob.core.windows.net/mycontainer?restype=container&comp=list")
        .build()
        .unwrap();

    let signed = signer.sign(&req).await.unwrap();
    assert_eq!(signed.endpoint(), req.endpoint());
    assert!(signed
        .first_header(header::AUTHORIZATION)
        .unwrap()
        .starts_with("SharedKeyLite myaccount:"));
}

#[tokio::test]
async fn test_mode_fixed_at_construction() {
    init();

    // The credential carries an account key, the signer was built for SAS.
    let signer = Signer::new(
        Context::new(),
        StaticCredentialProvider::new("myaccount", ACCOUNT_KEY),
        RequestSigner::new(SigningMode::SharedAccessSignature(SAS_TOKEN.to_string())),
    );
    let req = HttpRequest::builder()
        .endpoint("https://myaccount.blob.core.windows.net/mycontainer/myblob")
        .build()
        .unwrap();

    let signed = signer.sign(&req).await.unwrap();
    assert!(signed.headers().get(header::AUTHORIZATION).is_none());
    assert_eq!(signed.endpoint().query(), Some(SAS_TOKEN));
}

#[tokio::test]
async fn test_missing_env_credential() {
    init();

    let ctx = Context::new().with_env(StaticEnv::from_pairs([(
        AZURE_STORAGE_ACCOUNT_NAME,
        "myaccount",
    )]));
    let signer = Signer::new(ctx, EnvCredentialProvider::new(), fixed_signer(ACCOUNT_KEY));
    let req = HttpRequest::builder()
        .endpoint("https://myaccount.blob.core.windows.net/mycontainer/myblob")
        .build()
        .unwrap();

    let err = signer.sign(&req).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CredentialInvalid);
}
