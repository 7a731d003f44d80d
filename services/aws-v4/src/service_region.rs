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

use crate::constants::{AWS_HOST_SUFFIXES, DEFAULT_REGION};
use cloudsign_core::{Error, Result};
use std::fmt::Debug;

/// ServiceAndRegion maps a request host to the service and region of the
/// signing scope.
pub trait ServiceAndRegion: Debug + Send + Sync + 'static {
    /// Service name, fixed for the signer.
    fn service(&self) -> &str;

    /// Region for a request sent to `host`.
    fn region(&self, host: &str) -> Result<String>;
}

/// Parse `(service, region)` out of an AWS host.
///
/// ```
/// use cloudsign_aws_v4::parse_service_and_region;
///
/// let (service, region) = parse_service_and_region("ec2.us-west-2.amazonaws.com").unwrap();
/// assert_eq!((service.as_str(), region.as_str()), ("ec2", "us-west-2"));
///
/// let (service, region) = parse_service_and_region("sts.amazonaws.com").unwrap();
/// assert_eq!((service.as_str(), region.as_str()), ("sts", "us-east-1"));
/// ```
pub fn parse_service_and_region(host: &str) -> Result<(String, String)> {
    let hostname = strip_port(host).to_ascii_lowercase();

    let prefix = AWS_HOST_SUFFIXES
        .iter()
        .find_map(|suffix| hostname.strip_suffix(suffix))
        .ok_or_else(|| {
            Error::request_invalid(format!("host {host} is not an amazonaws.com endpoint"))
        })?;

    let mut labels = prefix.split('.');
    let service = match labels.next() {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => {
            return Err(Error::request_invalid(format!(
                "host {host} doesn't name a service"
            )))
        }
    };
    let region = match labels.next() {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => DEFAULT_REGION.to_string(),
    };

    Ok((service, region))
}

fn strip_port(host: &str) -> &str {
    match host.rsplit_once(':') {
        Some((h, port)) if port.bytes().all(|b| b.is_ascii_digit()) => h,
        _ => host,
    }
}

/// AwsHostServiceAndRegion reads both tokens from amazonaws.com hosts.
///
/// The service comes from the endpoint the signer is built for; the region
/// is resolved for each request from its `Host` header.
#[derive(Debug, Clone)]
pub struct AwsHostServiceAndRegion {
    service: String,
}

impl AwsHostServiceAndRegion {
    /// Build from the configured endpoint host.
    pub fn from_endpoint(host: &str) -> Result<Self> {
        let (service, _) = parse_service_and_region(host)?;
        Ok(Self { service })
    }
}

impl ServiceAndRegion for AwsHostServiceAndRegion {
    fn service(&self) -> &str {
        &self.service
    }

    fn region(&self, host: &str) -> Result<String> {
        let (_, region) = parse_service_and_region(host)?;
        Ok(region)
    }
}

/// StaticServiceAndRegion returns fixed tokens, for endpoints that don't
/// follow the amazonaws.com naming (such as private clouds with an AWS
/// compatible API).
#[derive(Debug, Clone)]
pub struct StaticServiceAndRegion {
    service: String,
    region: String,
}

impl StaticServiceAndRegion {
    /// Create with fixed service and region.
    pub fn new(service: &str, region: &str) -> Self {
        Self {
            service: service.to_string(),
            region: region.to_string(),
        }
    }
}

impl ServiceAndRegion for StaticServiceAndRegion {
    fn service(&self) -> &str {
        &self.service
    }

    fn region(&self, _: &str) -> Result<String> {
        Ok(self.region.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloudsign_core::ErrorKind;
    use test_case::test_case;

    #[test_case("ec2.us-west-2.amazonaws.com", "ec2", "us-west-2"; "regional")]
    #[test_case("sts.amazonaws.com", "sts", "us-east-1"; "global")]
    #[test_case("sqs.us-east-2.amazonaws.com:443", "sqs", "us-east-2"; "with port")]
    #[test_case("EC2.EU-WEST-1.AMAZONAWS.COM", "ec2", "eu-west-1"; "upper case")]
    #[test_case("ec2.cn-north-1.amazonaws.com.cn", "ec2", "cn-north-1"; "china")]
    fn test_parse(host: &str, service: &str, region: &str) {
        let (s, r) = parse_service_and_region(host).unwrap();
        assert_eq!(s, service);
        assert_eq!(r, region);
    }

    #[test_case("example.com"; "foreign host")]
    #[test_case("amazonaws.com"; "bare suffix")]
    #[test_case(".amazonaws.com"; "empty service")]
    fn test_parse_invalid(host: &str) {
        let err = parse_service_and_region(host).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RequestInvalid);
    }

    #[test]
    fn test_aws_host_resolves_region_per_request() {
        let sar = AwsHostServiceAndRegion::from_endpoint("ec2.us-east-1.amazonaws.com").unwrap();
        assert_eq!(sar.service(), "ec2");
        assert_eq!(sar.region("ec2.ap-south-1.amazonaws.com").unwrap(), "ap-south-1");
    }

    #[test]
    fn test_static() {
        let sar = StaticServiceAndRegion::new("ec2", "private-1");
        assert_eq!(sar.service(), "ec2");
        assert_eq!(sar.region("cloud.internal:8773").unwrap(), "private-1");
    }
}
