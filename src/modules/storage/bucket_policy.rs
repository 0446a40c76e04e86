//! Anonymous read access to the photo prefix.
//!
//! rust-s3 has no call for `PUT /{bucket}?policy`, so the request is signed
//! here with AWS Signature V4 and sent with reqwest.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use reqwest::Url;
use serde_json::json;
use sha2::{Digest, Sha256};

use crate::core::error::AppError;

const SIGNED_HEADERS: &str = "host;x-amz-content-sha256;x-amz-date";

/// Bucket policy letting anyone GET objects under `prefix`
pub fn public_read_policy(bucket: &str, prefix: &str) -> String {
    json!({
        "Version": "2012-10-17",
        "Statement": [{
            "Effect": "Allow",
            "Principal": { "AWS": "*" },
            "Action": ["s3:GetObject"],
            "Resource": [format!("arn:aws:s3:::{}/{}/*", bucket, prefix)]
        }]
    })
    .to_string()
}

pub struct SigningKeys<'a> {
    pub access_key: &'a str,
    pub secret_key: &'a str,
    pub region: &'a str,
}

/// Ready-to-send `PUT ?policy` request
#[derive(Debug)]
pub struct PolicyRequest {
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
    pub body: String,
}

pub fn sign_policy_request(
    endpoint: &str,
    bucket: &str,
    policy: String,
    keys: &SigningKeys<'_>,
    now: DateTime<Utc>,
) -> Result<PolicyRequest, AppError> {
    let parsed = Url::parse(endpoint)
        .map_err(|e| AppError::Internal(format!("Invalid storage endpoint '{}': {}", endpoint, e)))?;
    let host = match (parsed.host_str(), parsed.port()) {
        (Some(host), Some(port)) => format!("{}:{}", host, port),
        (Some(host), None) => host.to_string(),
        (None, _) => {
            return Err(AppError::Internal(format!(
                "Storage endpoint '{}' has no host",
                endpoint
            )))
        }
    };

    let day = now.format("%Y%m%d").to_string();
    let timestamp = now.format("%Y%m%dT%H%M%SZ").to_string();
    let payload_hash = sha256_hex(policy.as_bytes());

    let canonical_request = [
        "PUT".to_string(),
        format!("/{}", bucket),
        "policy=".to_string(),
        format!(
            "host:{}\nx-amz-content-sha256:{}\nx-amz-date:{}\n",
            host, payload_hash, timestamp
        ),
        SIGNED_HEADERS.to_string(),
        payload_hash.clone(),
    ]
    .join("\n");

    let scope = format!("{}/{}/s3/aws4_request", day, keys.region);
    let string_to_sign = format!(
        "AWS4-HMAC-SHA256\n{}\n{}\n{}",
        timestamp,
        scope,
        sha256_hex(canonical_request.as_bytes())
    );

    let mut key = format!("AWS4{}", keys.secret_key).into_bytes();
    for part in [day.as_str(), keys.region, "s3", "aws4_request"] {
        key = hmac(&key, part.as_bytes())?;
    }
    let signature = hex::encode(hmac(&key, string_to_sign.as_bytes())?);

    Ok(PolicyRequest {
        url: format!("{}/{}?policy", endpoint.trim_end_matches('/'), bucket),
        headers: vec![
            ("host", host),
            ("x-amz-date", timestamp),
            ("x-amz-content-sha256", payload_hash),
            (
                "authorization",
                format!(
                    "AWS4-HMAC-SHA256 Credential={}/{}, SignedHeaders={}, Signature={}",
                    keys.access_key, scope, SIGNED_HEADERS, signature
                ),
            ),
            ("content-type", "application/json".to_string()),
        ],
        body: policy,
    })
}

fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

fn hmac(key: &[u8], data: &[u8]) -> Result<Vec<u8>, AppError> {
    let mut mac = Hmac::<Sha256>::new_from_slice(key)
        .map_err(|e| AppError::Internal(format!("HMAC key error: {}", e)))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const KEYS: SigningKeys<'static> = SigningKeys {
        access_key: "minioadmin",
        secret_key: "minioadmin",
        region: "us-east-1",
    };

    fn header<'a>(request: &'a PolicyRequest, name: &str) -> &'a str {
        request
            .headers
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
            .unwrap()
    }

    #[test]
    fn test_policy_targets_prefix_only() {
        let policy: serde_json::Value =
            serde_json::from_str(&public_read_policy("edl", "photos")).unwrap();
        assert_eq!(
            policy["Statement"][0]["Resource"][0],
            "arn:aws:s3:::edl/photos/*"
        );
    }

    #[test]
    fn test_signed_request_shape() {
        let now = Utc.with_ymd_and_hms(2026, 3, 9, 8, 30, 0).unwrap();
        let request = sign_policy_request(
            "http://minio:9000/",
            "edl",
            public_read_policy("edl", "photos"),
            &KEYS,
            now,
        )
        .unwrap();

        assert_eq!(request.url, "http://minio:9000/edl?policy");
        assert_eq!(header(&request, "host"), "minio:9000");
        assert_eq!(header(&request, "x-amz-date"), "20260309T083000Z");
        let auth = header(&request, "authorization");
        assert!(auth.starts_with(
            "AWS4-HMAC-SHA256 Credential=minioadmin/20260309/us-east-1/s3/aws4_request"
        ));
        let signature = auth.rsplit("Signature=").next().unwrap();
        assert_eq!(signature.len(), 64);

        // Same input, same signature
        let again = sign_policy_request(
            "http://minio:9000/",
            "edl",
            public_read_policy("edl", "photos"),
            &KEYS,
            now,
        )
        .unwrap();
        assert_eq!(header(&again, "authorization"), auth);
    }

    #[test]
    fn test_endpoint_without_host_is_rejected() {
        let result = sign_policy_request("file:///tmp", "edl", String::new(), &KEYS, Utc::now());
        assert!(result.is_err());
    }
}
