//! AWS Signature Version 4 request signing
//!
//! Signs CloudWatch Logs JSON requests with `AWS4-HMAC-SHA256`. The signed
//! header set is every header the client sends plus `host` and `x-amz-date`
//! (and `x-amz-security-token` for temporary credentials).

use crate::config::SecretString;
use crate::domain::CloudWatchError;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use secrecy::ExposeSecret;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;
use url::Url;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// AWS access credentials
#[derive(Clone)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: SecretString,
    pub session_token: Option<SecretString>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"[REDACTED]")
            .field("session_token", &self.session_token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Signs requests for one service in one region
#[derive(Debug, Clone)]
pub struct RequestSigner {
    credentials: Credentials,
    region: String,
    service: String,
}

impl RequestSigner {
    pub fn new(
        credentials: Credentials,
        region: impl Into<String>,
        service: impl Into<String>,
    ) -> Self {
        Self {
            credentials,
            region: region.into(),
            service: service.into(),
        }
    }

    /// Signs a POST request and returns the headers to send with it
    ///
    /// `headers` are the request's own headers (names in any case). The
    /// result contains them plus `x-amz-date`, `authorization` and, for
    /// temporary credentials, `x-amz-security-token`. `host` is signed but
    /// not returned since the HTTP client derives it from the URL.
    pub fn sign_post(
        &self,
        url: &Url,
        headers: &[(&str, &str)],
        body: &[u8],
        now: DateTime<Utc>,
    ) -> Result<Vec<(String, String)>, CloudWatchError> {
        let date_str = now.format("%Y%m%d").to_string();
        let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();

        let mut canonical: BTreeMap<String, String> = headers
            .iter()
            .map(|(k, v)| (k.to_ascii_lowercase(), v.trim().to_string()))
            .collect();
        canonical.insert("host".to_string(), host_header(url)?);
        canonical.insert("x-amz-date".to_string(), amz_date.clone());
        if let Some(ref token) = self.credentials.session_token {
            canonical.insert(
                "x-amz-security-token".to_string(),
                token.expose_secret().as_ref().to_string(),
            );
        }

        let canonical_headers: String = canonical
            .iter()
            .map(|(k, v)| format!("{k}:{v}\n"))
            .collect();
        let signed_headers = canonical.keys().cloned().collect::<Vec<_>>().join(";");

        let canonical_request = format!(
            "POST\n{}\n{}\n{}\n{}\n{}",
            uri_encode_path(url.path()),
            url.query().unwrap_or(""),
            canonical_headers,
            signed_headers,
            hex_sha256(body)
        );

        let credential_scope = format!(
            "{}/{}/{}/aws4_request",
            date_str, self.region, self.service
        );
        let string_to_sign = format!(
            "{ALGORITHM}\n{amz_date}\n{credential_scope}\n{}",
            hex_sha256(canonical_request.as_bytes())
        );

        let signature = calculate_signature(
            self.credentials.secret_access_key.expose_secret().as_ref(),
            &date_str,
            &self.region,
            &self.service,
            &string_to_sign,
        )?;

        let authorization = format!(
            "{ALGORITHM} Credential={}/{credential_scope}, SignedHeaders={signed_headers}, Signature={signature}",
            self.credentials.access_key_id
        );

        canonical.remove("host");
        canonical.insert("authorization".to_string(), authorization);
        Ok(canonical.into_iter().collect())
    }
}

/// `host[:port]` as the HTTP client will send it
fn host_header(url: &Url) -> Result<String, CloudWatchError> {
    let host = url
        .host_str()
        .ok_or_else(|| CloudWatchError::Signing(format!("URL has no host: {url}")))?;
    Ok(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

/// URI-encode a path (preserving slashes).
fn uri_encode_path(path: &str) -> String {
    use std::fmt::Write;
    if path.is_empty() {
        return "/".to_string();
    }
    let mut result = String::with_capacity(path.len() * 3);
    for b in path.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b'/' => {
                result.push(b as char);
            }
            _ => {
                let _ = write!(result, "%{b:02X}");
            }
        }
    }
    result
}

fn hex_sha256(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<Vec<u8>, CloudWatchError> {
    let mut mac = Hmac::<Sha256>::new_from_slice(key)
        .map_err(|e| CloudWatchError::Signing(e.to_string()))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

fn calculate_signature(
    secret_key: &str,
    date: &str,
    region: &str,
    service: &str,
    string_to_sign: &str,
) -> Result<String, CloudWatchError> {
    let k_date = hmac_sha256(format!("AWS4{secret_key}").as_bytes(), date.as_bytes())?;
    let k_region = hmac_sha256(&k_date, region.as_bytes())?;
    let k_service = hmac_sha256(&k_region, service.as_bytes())?;
    let k_signing = hmac_sha256(&k_service, b"aws4_request")?;
    Ok(hex::encode(hmac_sha256(&k_signing, string_to_sign.as_bytes())?))
}
