//! AWS Signature Version 4 for single-object PUT requests
//!
//! Implements just the subset the upload path needs: one PUT, no query
//! string, a fixed set of signed headers, region `auto` and service `s3`
//! (what Cloudflare R2 expects). No SDK involved.
//!
//! The timestamp is an input, so the output is fully deterministic; the
//! store rejects signatures whose `x-amz-date` drifts outside its window.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac, digest::InvalidLength};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

pub const ALGORITHM: &str = "AWS4-HMAC-SHA256";
pub const REGION: &str = "auto";
pub const SERVICE: &str = "s3";
const TERMINATOR: &str = "aws4_request";

/// Signed header names, lower-case and sorted
pub const SIGNED_HEADERS: &str = "content-length;content-type;host;x-amz-content-sha256;x-amz-date";

/// Everything that goes into the signature of one PUT
#[derive(Debug, Clone)]
pub struct SigningRequest<'a> {
    pub access_key_id: &'a str,
    pub secret_access_key: &'a str,
    /// `Host` header value (host[:port])
    pub host: &'a str,
    /// Already URI-encoded path, see [`canonical_uri`]
    pub canonical_uri: &'a str,
    pub content_type: &'a str,
    pub content_length: usize,
    /// Hex SHA-256 of the body, see [`payload_hash`]
    pub payload_hash: &'a str,
    pub timestamp: DateTime<Utc>,
}

/// Header values the caller must send along with the body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    pub authorization: String,
    pub amz_date: String,
    pub content_sha256: String,
}

/// Hex SHA-256 of the raw payload
pub fn payload_hash(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// `YYYYMMDDTHHMMSSZ`
pub fn amz_date(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y%m%dT%H%M%SZ").to_string()
}

/// `YYYYMMDD`
pub fn date_stamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y%m%d").to_string()
}

/// `/{bucket}/{key}` with every path segment URI-encoded.
///
/// Unreserved characters (`A-Z a-z 0-9 - _ . ~`) pass through; `/` in the
/// key separates segments and is kept.
pub fn canonical_uri(bucket: &str, key: &str) -> String {
    let mut uri = String::with_capacity(bucket.len() + key.len() + 2);
    uri.push('/');
    uri.push_str(&urlencoding::encode(bucket));
    for segment in key.split('/') {
        uri.push('/');
        uri.push_str(&urlencoding::encode(segment));
    }
    uri
}

/// `YYYYMMDD/auto/s3/aws4_request`
pub fn credential_scope(timestamp: DateTime<Utc>) -> String {
    format!(
        "{}/{REGION}/{SERVICE}/{TERMINATOR}",
        date_stamp(timestamp)
    )
}

/// The exact string the signature covers
pub fn canonical_request(req: &SigningRequest<'_>) -> String {
    let canonical_headers = format!(
        "content-length:{}\ncontent-type:{}\nhost:{}\nx-amz-content-sha256:{}\nx-amz-date:{}\n",
        req.content_length,
        req.content_type.trim(),
        req.host,
        req.payload_hash,
        amz_date(req.timestamp),
    );

    [
        "PUT",
        req.canonical_uri,
        "",
        &canonical_headers,
        SIGNED_HEADERS,
        req.payload_hash,
    ]
    .join("\n")
}

pub fn string_to_sign(timestamp: DateTime<Utc>, canonical_request: &str) -> String {
    [
        ALGORITHM,
        &amz_date(timestamp),
        &credential_scope(timestamp),
        &hex::encode(Sha256::digest(canonical_request.as_bytes())),
    ]
    .join("\n")
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<Vec<u8>, InvalidLength> {
    let mut mac = HmacSha256::new_from_slice(key)?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// HMAC chain `AWS4{secret}` -> date -> region -> service -> `aws4_request`
pub fn derive_signing_key(
    secret_access_key: &str,
    date_stamp: &str,
    region: &str,
    service: &str,
) -> Result<Vec<u8>, InvalidLength> {
    let k_date = hmac_sha256(
        format!("AWS4{secret_access_key}").as_bytes(),
        date_stamp.as_bytes(),
    )?;
    let k_region = hmac_sha256(&k_date, region.as_bytes())?;
    let k_service = hmac_sha256(&k_region, service.as_bytes())?;
    hmac_sha256(&k_service, TERMINATOR.as_bytes())
}

/// Signing key for the object store (region `auto`, service `s3`)
pub fn signing_key(secret_access_key: &str, date_stamp: &str) -> Result<Vec<u8>, InvalidLength> {
    derive_signing_key(secret_access_key, date_stamp, REGION, SERVICE)
}

/// Sign one PUT request and return the headers to attach
pub fn sign(req: &SigningRequest<'_>) -> Result<SignedHeaders, InvalidLength> {
    let canonical = canonical_request(req);
    let to_sign = string_to_sign(req.timestamp, &canonical);
    let key = signing_key(req.secret_access_key, &date_stamp(req.timestamp))?;
    let signature = hex::encode(hmac_sha256(&key, to_sign.as_bytes())?);

    Ok(SignedHeaders {
        authorization: format!(
            "{ALGORITHM} Credential={}/{}, SignedHeaders={SIGNED_HEADERS}, Signature={signature}",
            req.access_key_id,
            credential_scope(req.timestamp),
        ),
        amz_date: amz_date(req.timestamp),
        content_sha256: req.payload_hash.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const BODY: &[u8] = b"fake png bytes";
    const BODY_HASH: &str = "86610c40efe63f0a46c58c4b605c164b4ffa3a3ad3f1dcf13e6ba4c59cb3ce16";

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 9, 30, 0).unwrap()
    }

    fn request(timestamp: DateTime<Utc>) -> SigningRequest<'static> {
        SigningRequest {
            access_key_id: "R2TESTACCESSKEY",
            secret_access_key: "r2-test-secret-key",
            host: "acct123.r2.cloudflarestorage.com",
            canonical_uri: "/golf-assets/product-images/titleist/pro-v1.png",
            content_type: "image/png",
            content_length: BODY.len(),
            payload_hash: BODY_HASH,
            timestamp,
        }
    }

    #[test]
    fn test_payload_hash() {
        assert_eq!(payload_hash(BODY), BODY_HASH);
        assert_eq!(
            payload_hash(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_signing_key_matches_aws_reference() {
        // Reference derivation published in the AWS SigV4 documentation
        let key = derive_signing_key(
            "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY",
            "20120215",
            "us-east-1",
            "iam",
        )
        .unwrap();
        assert_eq!(
            hex::encode(key),
            "f4780e2d9f65fa895f9c67b32ce1baf0b0d8a43505a000a1a9e090d414db404d"
        );
    }

    #[test]
    fn test_canonical_request_layout() {
        let canonical = canonical_request(&request(fixed_time()));
        let expected = format!(
            "PUT\n\
             /golf-assets/product-images/titleist/pro-v1.png\n\
             \n\
             content-length:14\n\
             content-type:image/png\n\
             host:acct123.r2.cloudflarestorage.com\n\
             x-amz-content-sha256:{BODY_HASH}\n\
             x-amz-date:20240315T093000Z\n\
             \n\
             {SIGNED_HEADERS}\n\
             {BODY_HASH}"
        );
        assert_eq!(canonical, expected);
        assert_eq!(
            hex::encode(Sha256::digest(canonical.as_bytes())),
            "ae656bb17a790340663fd2e0bc410477ccb323b60090c4e680816e9beda40882"
        );
    }

    #[test]
    fn test_credential_scope() {
        assert_eq!(
            credential_scope(fixed_time()),
            "20240315/auto/s3/aws4_request"
        );
        assert_eq!(amz_date(fixed_time()), "20240315T093000Z");
    }

    #[test]
    fn test_known_answer_signature() {
        let signed = sign(&request(fixed_time())).unwrap();
        assert_eq!(
            signed.authorization,
            "AWS4-HMAC-SHA256 Credential=R2TESTACCESSKEY/20240315/auto/s3/aws4_request, \
             SignedHeaders=content-length;content-type;host;x-amz-content-sha256;x-amz-date, \
             Signature=438d844b58a532cb30a43ad5b94d48823d51a5c3fd83f1acfae2c12802f9032e"
        );
        assert_eq!(signed.amz_date, "20240315T093000Z");
        assert_eq!(signed.content_sha256, BODY_HASH);
    }

    #[test]
    fn test_deterministic() {
        let a = sign(&request(fixed_time())).unwrap();
        let b = sign(&request(fixed_time())).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_one_second_skew_changes_signature() {
        let skewed = fixed_time() + chrono::Duration::seconds(1);
        let signed = sign(&request(skewed)).unwrap();
        assert!(signed.authorization.ends_with(
            "Signature=fde28f8e9bac880e75ad574a710dc2a26b471bddc8aac13f05102b402d353f36"
        ));
    }

    #[test]
    fn test_canonical_uri_encodes_segments() {
        assert_eq!(
            canonical_uri("golf-assets", "product-images/titleist/pro-v1.png"),
            "/golf-assets/product-images/titleist/pro-v1.png"
        );
        assert_eq!(
            canonical_uri("golf-assets", "product-images/cobra/LTDx max (blue).jpg"),
            "/golf-assets/product-images/cobra/LTDx%20max%20%28blue%29.jpg"
        );
    }
}
