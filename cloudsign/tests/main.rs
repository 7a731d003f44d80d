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

use cloudsign::retry::{execute_with_retry, DelegatingRetryHandler, HttpCommand, HttpResponse, RetryConfig};
use cloudsign::{Context, HttpRequest, Payload, StaticEnv};
use http::{header, Method, StatusCode};
use pretty_assertions::assert_eq;
use std::time::Duration;

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[tokio::test]
async fn test_aws_signer_from_env_then_retry() {
    init();

    let ctx = Context::new().with_env(StaticEnv::from_pairs([
        (cloudsign::aws::AWS_ACCESS_KEY_ID, "AKIDEXAMPLE"),
        (
            cloudsign::aws::AWS_SECRET_ACCESS_KEY,
            "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY",
        ),
    ]));
    let signer = cloudsign::aws::signer_with_context(ctx, "ec2.us-west-2.amazonaws.com").unwrap();

    let req = HttpRequest::builder()
        .method(Method::POST)
        .endpoint("https://ec2.us-west-2.amazonaws.com/")
        .header(header::HOST, "ec2.us-west-2.amazonaws.com")
        .payload(
            Payload::from_bytes("Action=DescribeRegions&Version=2013-10-15")
                .with_content_type("application/x-www-form-urlencoded"),
        )
        .build()
        .unwrap();
    let signed = signer.sign(&req).await.unwrap();
    let authorization = signed.first_header(header::AUTHORIZATION).unwrap().to_string();
    assert!(authorization.starts_with("AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/"));
    assert!(authorization.contains("/us-west-2/ec2/aws4_request"));

    let handler = DelegatingRetryHandler::from_config(
        RetryConfig::default().with_delay_start(Duration::ZERO),
    );
    let mut command = HttpCommand::new(signed);
    let mut statuses = [StatusCode::SERVICE_UNAVAILABLE, StatusCode::OK].into_iter();
    let resp = execute_with_retry(&mut command, &handler, |req| {
        assert_eq!(req.first_header(header::AUTHORIZATION), Some(authorization.as_str()));
        Ok(HttpResponse::new(statuses.next().unwrap_or(StatusCode::OK)))
    })
    .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(command.failure_count(), 1);
}

#[tokio::test]
async fn test_azure_mode_follows_env() {
    init();

    let key = "YXp1cmUtc2hhcmVkLXNlY3JldC1rZXktYnl0ZXMhIQ==";
    let req = HttpRequest::builder()
        .endpoint("https://myaccount.blob.core.windows.net/mycontainer/myblob")
        .build()
        .unwrap();

    let ctx = Context::new().with_env(StaticEnv::from_pairs([
        (cloudsign::azure::AZURE_STORAGE_ACCOUNT_NAME, "myaccount"),
        (cloudsign::azure::AZURE_STORAGE_ACCOUNT_KEY, key),
    ]));
    let signed = cloudsign::azure::signer_with_context(ctx)
        .sign(&req)
        .await
        .unwrap();
    assert!(signed
        .first_header(header::AUTHORIZATION)
        .unwrap()
        .starts_with("SharedKeyLite myaccount:"));
    assert_eq!(signed.endpoint(), req.endpoint());

    let token = "sv=2021-08-06&sp=r&sig=c2lnbmF0dXJl";
    let ctx = Context::new().with_env(StaticEnv::from_pairs([
        (cloudsign::azure::AZURE_STORAGE_ACCOUNT_NAME, "myaccount"),
        (cloudsign::azure::AZURE_STORAGE_SAS_TOKEN, token),
    ]));
    let signed = cloudsign::azure::signer_with_context(ctx)
        .sign(&req)
        .await
        .unwrap();
    assert!(signed.headers().get(header::AUTHORIZATION).is_none());
    assert_eq!(signed.endpoint().query(), Some(token));
}
