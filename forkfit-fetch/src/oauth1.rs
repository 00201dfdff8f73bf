//! Legacy request signing (OAuth 1.0 HMAC-SHA1).
//!
//! The legacy protocol authenticates every request with a signature computed
//! over the method, the base URL and all parameters:
//!
//! ```text
//! base   = METHOD & enc(base_url) & enc(k1=v1&k2=v2...)   (pairs sorted)
//! key    = enc(consumer_secret) & ""                      (no token secret)
//! sig    = base64(hmac_sha1(key, base))
//! ```
//!
//! [`signature`] is a pure function of its inputs. [`OAuth1Signer`] adds the
//! per-request nonce and timestamp, which is what makes two otherwise
//! identical requests carry different signatures.

use std::collections::BTreeMap;
use std::fmt;

use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::Utc;
use ring::hmac;
use ring::rand::{SecureRandom, SystemRandom};

use crate::error::FetchError;

// ============================================================================
// Constants
// ============================================================================

/// Signature method sent in `oauth_signature_method`.
pub const SIGNATURE_METHOD: &str = "HMAC-SHA1";

/// Protocol version sent in `oauth_version`.
pub const OAUTH_VERSION: &str = "1.0";

/// Name of the parameter carrying the signature.
pub const SIGNATURE_PARAM: &str = "oauth_signature";

/// Random bytes per nonce (rendered as twice as many hex characters).
const NONCE_BYTES: usize = 16;

// ============================================================================
// Signature Engine
// ============================================================================

/// Percent-encodes with the RFC 3986 unreserved set.
///
/// Everything except `A-Z a-z 0-9 - _ . ~` is escaped with uppercase hex,
/// so `! ' ( ) *` are escaped as well.
pub fn percent_encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Encodes and sorts parameters into the normalized `k=v&k=v` string.
pub fn normalized_parameters(params: &BTreeMap<String, String>) -> String {
    let mut pairs: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (percent_encode(k), percent_encode(v)))
        .collect();
    pairs.sort();

    pairs
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// Builds the signature base string.
pub fn signature_base_string(
    http_method: &str,
    base_url: &str,
    params: &BTreeMap<String, String>,
) -> String {
    format!(
        "{}&{}&{}",
        http_method.to_ascii_uppercase(),
        percent_encode(base_url),
        percent_encode(&normalized_parameters(params))
    )
}

/// Computes the base64 HMAC-SHA1 signature for a request.
///
/// `params` must contain every parameter that will be sent, protocol
/// metadata included, and must not contain the signature itself.
pub fn signature(
    http_method: &str,
    base_url: &str,
    params: &BTreeMap<String, String>,
    consumer_secret: &str,
) -> String {
    let base = signature_base_string(http_method, base_url, params);
    let signing_key = format!("{}&", percent_encode(consumer_secret));

    let key = hmac::Key::new(hmac::HMAC_SHA1_FOR_LEGACY_USE_ONLY, signing_key.as_bytes());
    let tag = hmac::sign(&key, base.as_bytes());

    STANDARD.encode(tag.as_ref())
}

/// Generates a 128-bit random nonce as 32 lowercase hex characters.
pub fn generate_nonce() -> Result<String, FetchError> {
    let mut bytes = [0u8; NONCE_BYTES];
    SystemRandom::new()
        .fill(&mut bytes)
        .map_err(|_| FetchError::Random)?;
    Ok(hex::encode(bytes))
}

// ============================================================================
// Signer
// ============================================================================

/// Consumer key/secret pair that signs legacy requests.
#[derive(Clone)]
pub struct OAuth1Signer {
    consumer_key: String,
    consumer_secret: String,
}

impl OAuth1Signer {
    /// Creates a signer. Fails if either half of the pair is missing or blank.
    pub fn new(
        consumer_key: Option<&str>,
        consumer_secret: Option<&str>,
    ) -> Result<Self, FetchError> {
        match (non_blank(consumer_key), non_blank(consumer_secret)) {
            (Some(key), Some(secret)) => Ok(Self {
                consumer_key: key.to_string(),
                consumer_secret: secret.to_string(),
            }),
            _ => Err(FetchError::Configuration(
                "OAuth1 consumer key/secret missing".to_string(),
            )),
        }
    }

    /// Returns the consumer key.
    pub fn consumer_key(&self) -> &str {
        &self.consumer_key
    }

    /// Signs `params` with a fresh nonce and the current timestamp.
    ///
    /// Returns every parameter to send, in normalized order, with
    /// `oauth_signature` as the final pair.
    pub fn sign(
        &self,
        http_method: &str,
        base_url: &str,
        params: BTreeMap<String, String>,
    ) -> Result<Vec<(String, String)>, FetchError> {
        let nonce = generate_nonce()?;
        let timestamp = Utc::now().timestamp().to_string();
        Ok(self.sign_with(http_method, base_url, params, &nonce, &timestamp))
    }

    /// Signs `params` with an explicit nonce and timestamp.
    pub fn sign_with(
        &self,
        http_method: &str,
        base_url: &str,
        mut params: BTreeMap<String, String>,
        nonce: &str,
        timestamp: &str,
    ) -> Vec<(String, String)> {
        params.insert("oauth_consumer_key".into(), self.consumer_key.clone());
        params.insert("oauth_nonce".into(), nonce.to_string());
        params.insert("oauth_signature_method".into(), SIGNATURE_METHOD.into());
        params.insert("oauth_timestamp".into(), timestamp.to_string());
        params.insert("oauth_version".into(), OAUTH_VERSION.into());

        let sig = signature(http_method, base_url, &params, &self.consumer_secret);

        let mut signed: Vec<(String, String)> = params.into_iter().collect();
        signed.push((SIGNATURE_PARAM.to_string(), sig));
        signed
    }
}

impl fmt::Debug for OAuth1Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuth1Signer")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"<redacted>")
            .finish()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

// ============================================================================
// Tests
// ============================================================================
