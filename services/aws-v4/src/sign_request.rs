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

use crate::constants::{AWS4_HMAC_SHA256, AWS4_REQUEST, X_AMZ_DATE, X_AMZ_SECURITY_TOKEN};
use crate::{AwsHostServiceAndRegion, Credential, ServiceAndRegion};
use async_trait::async_trait;
use cloudsign_core::hash::{hex_hmac_sha256, hex_sha256, hmac_sha256};
use cloudsign_core::time::{format_date, format_iso8601, now, DateTime};
use cloudsign_core::{Context, Error, HttpRequest, Result, SignRequest};
use http::header;
use log::debug;
use std::fmt::Write;
use std::sync::Arc;

/// FormSignerV4 signs AWS query APIs (EC2, STS, SQS and friends) whose
/// parameters travel in a form encoded POST body.
///
/// - [Signature Version 4 signing process](https://docs.aws.amazon.com/general/latest/gr/signature-version-4.html)
///
/// Only the `Authorization` header mode is supported. The endpoint must not
/// carry a query string: query parameters are not part of the canonical
/// request built here, so they're rejected instead of silently left
/// unsigned.
#[derive(Debug, Clone)]
pub struct FormSignerV4 {
    service_and_region: Arc<dyn ServiceAndRegion>,

    time: Option<DateTime>,
}

impl FormSignerV4 {
    /// Create a new signer.
    pub fn new(service_and_region: impl ServiceAndRegion) -> Self {
        Self {
            service_and_region: Arc::new(service_and_region),

            time: None,
        }
    }

    /// Create a signer for an amazonaws.com endpoint host.
    pub fn for_endpoint(host: &str) -> Result<Self> {
        Ok(Self::new(AwsHostServiceAndRegion::from_endpoint(host)?))
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }
}

#[async_trait]
impl SignRequest for FormSignerV4 {
    type Credential = Credential;

    async fn sign_request(
        &self,
        _: &Context,
        req: &HttpRequest,
        credential: Option<&Self::Credential>,
    ) -> Result<HttpRequest> {
        let Some(cred) = credential else {
            return Err(Error::credential_invalid(
                "aws credential is required for form signing",
            ));
        };

        if let Some(query) = req.endpoint().query() {
            return Err(Error::request_invalid(format!(
                "form signing doesn't support query parameters, move {query:?} into the form payload"
            )));
        }

        let host = req
            .first_header(header::HOST)
            .ok_or_else(|| Error::request_invalid("form signing requires a Host header"))?;

        let payload = req
            .payload()
            .ok_or_else(|| Error::request_invalid("form signing requires a form payload"))?;
        let body = payload.as_bytes().ok_or_else(|| {
            Error::request_invalid("form signing requires an in-memory payload")
        })?;
        if !form_urlencoded::parse(body).any(|(k, _)| k == "Action") {
            return Err(Error::request_invalid(
                "form payload doesn't contain an Action parameter",
            ));
        }

        let content_type = payload
            .metadata()
            .content_type
            .as_deref()
            .or_else(|| req.first_header(header::CONTENT_TYPE))
            .ok_or_else(|| Error::request_invalid("form signing requires a content type"))?;

        let now = self.time.unwrap_or_else(now);
        let timestamp = format_iso8601(now);
        let service = self.service_and_region.service();
        let region = self.service_and_region.region(host)?;

        let mut signed_headers = vec![
            (header::CONTENT_TYPE.as_str(), content_type),
            (header::HOST.as_str(), host),
            (X_AMZ_DATE, timestamp.as_str()),
        ];
        if let Some(token) = &cred.session_token {
            signed_headers.push((X_AMZ_SECURITY_TOKEN, token.as_str()));
        }

        let creq = canonical_request(
            req.method().as_str(),
            req.endpoint().path(),
            &signed_headers,
            &hex_sha256(body),
        )?;
        debug!("calculated canonical request: {creq}");

        // Scope: "20220313/<region>/<service>/aws4_request"
        let scope = format!(
            "{}/{}/{}/{}",
            format_date(now),
            region,
            service,
            AWS4_REQUEST
        );
        debug!("calculated scope: {scope}");

        let string_to_sign = string_to_sign(&timestamp, &scope, &creq)?;
        debug!("calculated string to sign: {string_to_sign}");

        let signing_key =
            generate_signing_key(&cred.secret_access_key, now, &region, service)?;
        let signature = hex_hmac_sha256(&signing_key, string_to_sign.as_bytes())?;

        let authorization = format!(
            "{} Credential={}/{}, SignedHeaders={}, Signature={}",
            AWS4_HMAC_SHA256,
            cred.access_key_id,
            scope,
            signed_headers
                .iter()
                .map(|(k, _)| *k)
                .collect::<Vec<_>>()
                .join(";"),
            signature
        );

        // The sent content type must be the signed one.
        let mut builder = req
            .to_builder()
            .remove_header(header::AUTHORIZATION)
            .replace_header(X_AMZ_DATE, timestamp.as_str())
            .replace_header(header::CONTENT_TYPE, content_type);
        if let Some(token) = &cred.session_token {
            builder = builder.replace_sensitive_header(X_AMZ_SECURITY_TOKEN, token);
        }
        builder
            .replace_sensitive_header(header::AUTHORIZATION, &authorization)
            .build()
    }
}

/// Build the canonical request of a form signing.
///
/// `signed_headers` are `(lower-cased name, value)` pairs written in the
/// given order. The canonical query string is always empty.
///
/// ```shell
/// POST
/// /
///
/// content-type:application/x-www-form-urlencoded
/// host:ec2.us-west-2.amazonaws.com
/// x-amz-date:20240301T120000Z
///
/// content-type;host;x-amz-date
/// <hex sha256 of payload>
/// ```
pub fn canonical_request(
    method: &str,
    path: &str,
    signed_headers: &[(&str, &str)],
    payload_hash: &str,
) -> Result<String> {
    // 256 is specially chosen to avoid reallocation for most requests.
    let mut f = String::with_capacity(256);

    writeln!(f, "{method}")?;
    writeln!(f, "{}", if path.is_empty() { "/" } else { path })?;
    writeln!(f)?;
    for (name, value) in signed_headers {
        writeln!(f, "{name}:{value}")?;
    }
    writeln!(f)?;
    writeln!(
        f,
        "{}",
        signed_headers
            .iter()
            .map(|(k, _)| *k)
            .collect::<Vec<_>>()
            .join(";")
    )?;
    write!(f, "{payload_hash}")?;

    Ok(f)
}

/// Build the string to sign.
///
/// ```shell
/// AWS4-HMAC-SHA256
/// 20220313T072004Z
/// 20220313/<region>/<service>/aws4_request
/// <hashed_canonical_request>
/// ```
pub fn string_to_sign(timestamp: &str, scope: &str, canonical_request: &str) -> Result<String> {
    let mut f = String::with_capacity(128);
    writeln!(f, "{AWS4_HMAC_SHA256}")?;
    writeln!(f, "{timestamp}")?;
    writeln!(f, "{scope}")?;
    write!(f, "{}", hex_sha256(canonical_request.as_bytes()))?;
    Ok(f)
}

/// Derive the signing key for a date, region and service.
///
/// Keys are derived again on every call.
pub fn generate_signing_key(
    secret: &str,
    time: DateTime,
    region: &str,
    service: &str,
) -> Result<Vec<u8>> {
    // Sign secret
    let secret = format!("AWS4{secret}");
    // Sign date
    let sign_date = hmac_sha256(secret.as_bytes(), format_date(time).as_bytes())?;
    // Sign region
    let sign_region = hmac_sha256(sign_date.as_slice(), region.as_bytes())?;
    // Sign service
    let sign_service = hmac_sha256(sign_region.as_slice(), service.as_bytes())?;
    // Sign request
    hmac_sha256(sign_service.as_slice(), AWS4_REQUEST.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StaticServiceAndRegion;
    use cloudsign_core::time::parse_rfc3339;
    use cloudsign_core::{ErrorKind, Payload};
    use http::Method;
    use pretty_assertions::assert_eq;

    fn credential() -> Credential {
        Credential {
            access_key_id: "AKIDEXAMPLE".to_string(),
            secret_access_key: "secret-key".to_string(),
            ..Default::default()
        }
    }

    fn signer() -> FormSignerV4 {
        FormSignerV4::for_endpoint("ec2.us-west-2.amazonaws.com")
            .unwrap()
            .with_time(parse_rfc3339("2024-03-01T12:00:00Z").unwrap())
    }

    fn form_request() -> cloudsign_core::HttpRequestBuilder {
        HttpRequest::builder()
            .method(Method::POST)
            .endpoint("https://ec2.us-west-2.amazonaws.com/")
            .header(header::HOST, "ec2.us-west-2.amazonaws.com")
            .payload(
                Payload::from_bytes("Action=DescribeRegions&Version=2013-10-15")
                    .with_content_type("application/x-www-form-urlencoded"),
            )
    }

    #[test]
    fn test_generate_signing_key() {
        let key = generate_signing_key(
            "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY",
            parse_rfc3339("2012-02-15T00:00:00Z").unwrap(),
            "us-east-1",
            "iam",
        )
        .unwrap();
        assert_eq!(
            hex::encode(key),
            "f4780e2d9f65fa895f9c67b32ce1baf0b0d8a43505a000a1a9e090d414db404d"
        );
    }

    #[tokio::test]
    async fn test_sign_form() {
        let req = form_request().build().unwrap();
        let signed = signer()
            .sign_request(&Context::new(), &req, Some(&credential()))
            .await
            .unwrap();

        assert_eq!(signed.first_header(X_AMZ_DATE), Some("20240301T120000Z"));
        assert_eq!(
            signed.first_header(header::AUTHORIZATION),
            Some(
                "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20240301/us-west-2/ec2/aws4_request, \
                 SignedHeaders=content-type;host;x-amz-date, \
                 Signature=1c2eb8070cfe63156385a84df5c19c93daa21fb1e13d3417115bdc5d1ae0ae9c"
            )
        );
        assert_eq!(
            signed.first_header(header::CONTENT_TYPE),
            Some("application/x-www-form-urlencoded")
        );
        assert!(req.headers().get(header::AUTHORIZATION).is_none());
    }

    #[tokio::test]
    async fn test_sent_content_type_matches_signed() {
        let ctx = Context::new();
        let plain = form_request().build().unwrap();
        let conflicting = form_request()
            .header(header::CONTENT_TYPE, "text/plain")
            .build()
            .unwrap();

        let expected = signer()
            .sign_request(&ctx, &plain, Some(&credential()))
            .await
            .unwrap();
        let signed = signer()
            .sign_request(&ctx, &conflicting, Some(&credential()))
            .await
            .unwrap();

        let sent: Vec<_> = signed
            .headers()
            .get_all(header::CONTENT_TYPE)
            .iter()
            .collect();
        assert_eq!(sent, vec!["application/x-www-form-urlencoded"]);
        assert_eq!(
            signed.first_header(header::AUTHORIZATION),
            expected.first_header(header::AUTHORIZATION)
        );
    }

    #[tokio::test]
    async fn test_sign_is_deterministic() {
        let req = form_request().build().unwrap();
        let ctx = Context::new();
        let a = signer().sign_request(&ctx, &req, Some(&credential())).await.unwrap();
        let b = signer().sign_request(&ctx, &req, Some(&credential())).await.unwrap();
        assert_eq!(
            a.first_header(header::AUTHORIZATION),
            b.first_header(header::AUTHORIZATION)
        );
    }

    #[tokio::test]
    async fn test_sign_replaces_existing_authorization() {
        let req = form_request()
            .header(header::AUTHORIZATION, "stale")
            .header(X_AMZ_DATE, "20000101T000000Z")
            .build()
            .unwrap();
        let signed = signer()
            .sign_request(&Context::new(), &req, Some(&credential()))
            .await
            .unwrap();

        assert_eq!(signed.headers().get_all(header::AUTHORIZATION).iter().count(), 1);
        assert_eq!(signed.headers().get_all(X_AMZ_DATE).iter().count(), 1);
        assert_eq!(signed.first_header(X_AMZ_DATE), Some("20240301T120000Z"));
    }

    #[tokio::test]
    async fn test_sign_with_session_token() {
        let req = form_request().build().unwrap();
        let cred = Credential {
            session_token: Some("session-token".to_string()),
            ..credential()
        };
        let signed = signer()
            .sign_request(&Context::new(), &req, Some(&cred))
            .await
            .unwrap();

        assert_eq!(signed.first_header(X_AMZ_SECURITY_TOKEN), Some("session-token"));
        assert_eq!(
            signed.first_header(header::AUTHORIZATION),
            Some(
                "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20240301/us-west-2/ec2/aws4_request, \
                 SignedHeaders=content-type;host;x-amz-date;x-amz-security-token, \
                 Signature=d1fa3cefc0ed57146824adcee8240f18b1b6131a8c2972844c5ed563596ee2da"
            )
        );
    }

    #[tokio::test]
    async fn test_content_type_from_header() {
        let req = form_request()
            .payload("Action=DescribeRegions&Version=2013-10-15")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .build()
            .unwrap();
        let signed = signer()
            .sign_request(&Context::new(), &req, Some(&credential()))
            .await
            .unwrap();
        assert!(signed
            .first_header(header::AUTHORIZATION)
            .unwrap()
            .ends_with("Signature=1c2eb8070cfe63156385a84df5c19c93daa21fb1e13d3417115bdc5d1ae0ae9c"));
    }

    #[tokio::test]
    async fn test_rejects_invalid_requests() {
        let ctx = Context::new();
        let cred = credential();
        let cases = vec![
            (
                "query",
                form_request()
                    .endpoint("https://ec2.us-west-2.amazonaws.com/?Action=DescribeRegions")
                    .build()
                    .unwrap(),
            ),
            (
                "host",
                form_request().remove_header(header::HOST).build().unwrap(),
            ),
            (
                "payload",
                HttpRequest::builder()
                    .method(Method::POST)
                    .endpoint("https://ec2.us-west-2.amazonaws.com/")
                    .header(header::HOST, "ec2.us-west-2.amazonaws.com")
                    .build()
                    .unwrap(),
            ),
            (
                "action",
                form_request()
                    .payload(
                        Payload::from_bytes("Version=2013-10-15")
                            .with_content_type("application/x-www-form-urlencoded"),
                    )
                    .build()
                    .unwrap(),
            ),
            (
                "stream",
                form_request()
                    .payload(Payload::from_reader(std::io::Cursor::new(
                        b"Action=DescribeRegions".to_vec(),
                    )))
                    .build()
                    .unwrap(),
            ),
            (
                "content type",
                form_request()
                    .payload("Action=DescribeRegions")
                    .build()
                    .unwrap(),
            ),
        ];

        for (name, req) in cases {
            let err = signer()
                .sign_request(&ctx, &req, Some(&cred))
                .await
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::RequestInvalid, "case {name}: {err}");
        }
    }

    #[tokio::test]
    async fn test_requires_credential() {
        let req = form_request().build().unwrap();
        let err = signer()
            .sign_request(&Context::new(), &req, None)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CredentialInvalid);
    }

    #[tokio::test]
    async fn test_static_region() {
        let req = form_request()
            .endpoint("https://cloud.internal/")
            .replace_header(header::HOST, "cloud.internal")
            .build()
            .unwrap();
        let signed = FormSignerV4::new(StaticServiceAndRegion::new("ec2", "private-1"))
            .with_time(parse_rfc3339("2024-03-01T12:00:00Z").unwrap())
            .sign_request(&Context::new(), &req, Some(&credential()))
            .await
            .unwrap();
        assert!(signed
            .first_header(header::AUTHORIZATION)
            .unwrap()
            .contains("Credential=AKIDEXAMPLE/20240301/private-1/ec2/aws4_request"));
    }
}
