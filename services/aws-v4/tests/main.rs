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

use cloudsign_aws_v4::{
    canonical_request, generate_signing_key, string_to_sign, EnvCredentialProvider,
    FormSignerV4, StaticCredentialProvider, AWS_ACCESS_KEY_ID, AWS_SECRET_ACCESS_KEY,
    X_AMZ_DATE,
};
use cloudsign_core::time::parse_rfc3339;
use cloudsign_core::{Context, HttpRequest, Payload, ProvideCredentialChain, Signer, StaticEnv};
use cloudsign_retry::{
    execute_with_retry, DelegatingRetryHandler, HttpCommand, HttpResponse, RetryConfig,
};
use hmac::{Hmac, Mac};
use http::{header, Method, StatusCode};
use pretty_assertions::assert_eq;
use sha2::{Digest, Sha256};
use std::time::Duration;

const BODY: &str = "Action=DescribeRegions&Version=2013-10-15";

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn describe_regions() -> HttpRequest {
    HttpRequest::builder()
        .method(Method::POST)
        .endpoint("https://ec2.us-west-2.amazonaws.com/")
        .header(header::HOST, "ec2.us-west-2.amazonaws.com")
        .payload(Payload::from_bytes(BODY).with_content_type("application/x-www-form-urlencoded"))
        .build()
        .unwrap()
}

fn signer(ctx: Context) -> Signer<cloudsign_aws_v4::Credential> {
    Signer::new(
        ctx,
        StaticCredentialProvider::new("AKIDEXAMPLE", "secret-key"),
        FormSignerV4::for_endpoint("ec2.us-west-2.amazonaws.com")
            .unwrap()
            .with_time(parse_rfc3339("2024-03-01T12:00:00Z").unwrap()),
    )
}

fn hmac_hex(key: &[u8], content: &str) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(key).unwrap();
    mac.update(content.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

#[test]
fn test_canonical_request_layout() {
    let payload_hash = hex::encode(Sha256::digest(BODY));
    let creq = canonical_request(
        "POST",
        "/",
        &[
            ("content-type", "application/x-www-form-urlencoded"),
            ("host", "ec2.us-west-2.amazonaws.com"),
            ("x-amz-date", "20240301T120000Z"),
        ],
        &payload_hash,
    )
    .unwrap();

    assert_eq!(
        creq,
        "POST\n/\n\n\
         content-type:application/x-www-form-urlencoded\n\
         host:ec2.us-west-2.amazonaws.com\n\
         x-amz-date:20240301T120000Z\n\
         \n\
         content-type;host;x-amz-date\n\
         f7ad96a1f27c6982018995cfe72721bcc8808afe0c5650f2f22e394f63bb77b2"
    );

    let sts = string_to_sign(
        "20240301T120000Z",
        "20240301/us-west-2/ec2/aws4_request",
        &creq,
    )
    .unwrap();
    assert_eq!(
        sts,
        "AWS4-HMAC-SHA256\n20240301T120000Z\n20240301/us-west-2/ec2/aws4_request\n\
         541992ce82e319016b15f8b8a95528b9e01b6ac918852e7af282423dbea3e260"
    );

    let key = generate_signing_key(
        "secret-key",
        parse_rfc3339("2024-03-01T12:00:00Z").unwrap(),
        "us-west-2",
        "ec2",
    )
    .unwrap();
    assert_eq!(
        hmac_hex(&key, &sts),
        "1c2eb8070cfe63156385a84df5c19c93daa21fb1e13d3417115bdc5d1ae0ae9c"
    );
}

#[tokio::test]
async fn test_signer_keeps_payload() {
    init();

    let req = describe_regions();
    let signed = signer(Context::new()).sign(&req).await.unwrap();

    let payload = signed.payload().unwrap();
    assert_eq!(payload.as_bytes().unwrap().as_ref(), BODY.as_bytes());
    assert_eq!(payload.metadata(), req.payload().unwrap().metadata());
    assert_eq!(signed.endpoint(), req.endpoint());
    assert!(signed
        .first_header(header::AUTHORIZATION)
        .unwrap()
        .starts_with("AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20240301/us-west-2/ec2/aws4_request"));
}

#[tokio::test]
async fn test_region_follows_request_host() {
    init();

    let req = describe_regions()
        .to_builder()
        .endpoint("https://ec2.eu-central-1.amazonaws.com/")
        .replace_header(header::HOST, "ec2.eu-central-1.amazonaws.com")
        .build()
        .unwrap();
    let signed = signer(Context::new()).sign(&req).await.unwrap();
    assert!(signed
        .first_header(header::AUTHORIZATION)
        .unwrap()
        .contains("/20240301/eu-central-1/ec2/aws4_request"));
}

#[tokio::test]
async fn test_env_provider_in_chain() {
    init();

    let ctx = Context::new().with_env(StaticEnv::from_pairs([
        (AWS_ACCESS_KEY_ID, "AKIDFROMENV"),
        (AWS_SECRET_ACCESS_KEY, "secret-key"),
    ]));
    let chain = ProvideCredentialChain::new()
        .push(EnvCredentialProvider::new())
        .push(StaticCredentialProvider::new("AKIDEXAMPLE", "secret-key"));
    let signer = Signer::new(
        ctx,
        chain,
        FormSignerV4::for_endpoint("ec2.us-west-2.amazonaws.com")
            .unwrap()
            .with_time(parse_rfc3339("2024-03-01T12:00:00Z").unwrap()),
    );

    let signed = signer.sign(&describe_regions()).await.unwrap();
    assert_eq!(
        signed.first_header(header::AUTHORIZATION),
        Some(
            "AWS4-HMAC-SHA256 Credential=AKIDFROMENV/20240301/us-west-2/ec2/aws4_request, \
             SignedHeaders=content-type;host;x-amz-date, \
             Signature=1c2eb8070cfe63156385a84df5c19c93daa21fb1e13d3417115bdc5d1ae0ae9c"
        )
    );
}

#[test]
fn test_resign_on_every_retry() {
    init();

    let rt = tokio::runtime::Runtime::new().unwrap();
    let signer = Signer::new(
        Context::new(),
        StaticCredentialProvider::new("AKIDEXAMPLE", "secret-key"),
        FormSignerV4::for_endpoint("ec2.us-west-2.amazonaws.com").unwrap(),
    );
    let handler = DelegatingRetryHandler::from_config(
        RetryConfig::default().with_delay_start(Duration::from_millis(1)),
    );

    let mut cmd = HttpCommand::new(describe_regions());
    let mut seen = Vec::new();
    let resp = execute_with_retry(&mut cmd, &handler, |req| {
        let signed = rt.block_on(signer.sign(req))?;
        assert!(signed.first_header(X_AMZ_DATE).is_some());
        seen.push(signed.first_header(header::AUTHORIZATION).map(|v| v.to_string()));

        if seen.len() < 3 {
            Ok(HttpResponse::new(StatusCode::SERVICE_UNAVAILABLE))
        } else {
            Ok(HttpResponse::new(StatusCode::OK))
        }
    })
    .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(seen.len(), 3);
    assert!(seen.iter().all(|v| v.is_some()));
    // The command keeps the unsigned request.
    assert!(cmd
        .current_request()
        .headers()
        .get(header::AUTHORIZATION)
        .is_none());
}
