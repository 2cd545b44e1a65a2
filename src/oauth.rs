//! OAuth 1.0a query-string signing.
//!
//! Over plain HTTP the consumer secret cannot travel in a header, so every
//! request carries a one-legged OAuth 1.0a signature in its query string
//! instead. There is no access token: the signing key is the encoded consumer
//! secret followed by `&` and an empty token secret.

use base64::{engine::general_purpose::STANDARD, Engine};
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use sha1::Sha1;
use sha2::Sha256;
use std::str::FromStr;
use url::Url;
use uuid::Uuid;

use crate::credentials::Credentials;
use crate::error::{ApiError, Result};

/// OAuth protocol version sent as `oauth_version`
pub const OAUTH_VERSION: &str = "1.0";

/// RFC 3986 unreserved characters stay as-is, everything else is encoded
const RFC3986: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encode a string per RFC 3986
pub fn percent_encode(input: &str) -> String {
    utf8_percent_encode(input, RFC3986).to_string()
}

/// HMAC variant used to sign requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureMethod {
    HmacSha1,
    HmacSha256,
}

impl SignatureMethod {
    /// Name sent as `oauth_signature_method`
    pub fn as_str(&self) -> &'static str {
        match self {
            SignatureMethod::HmacSha1 => "HMAC-SHA1",
            SignatureMethod::HmacSha256 => "HMAC-SHA256",
        }
    }
}

impl FromStr for SignatureMethod {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("HMAC-SHA1") {
            Ok(SignatureMethod::HmacSha1)
        } else if s.eq_ignore_ascii_case("HMAC-SHA256") {
            Ok(SignatureMethod::HmacSha256)
        } else {
            Err(ApiError::UnsupportedSignatureMethod(s.to_string()))
        }
    }
}

impl std::fmt::Display for SignatureMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `oauth_*` parameters of one signed request.
///
/// Generated fresh for every request and never reused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthParams {
    pub consumer_key: String,
    pub nonce: String,
    pub timestamp: i64,
    pub signature_method: SignatureMethod,
    pub version: &'static str,
    /// Set once the request has been signed
    pub signature: Option<String>,
}

impl OAuthParams {
    /// Parameters with a new nonce and the current timestamp
    pub fn generate(consumer_key: &str, signature_method: SignatureMethod) -> Self {
        Self::with_nonce(consumer_key, signature_method, generate_nonce(), timestamp())
    }

    /// Parameters with a caller-chosen nonce and timestamp
    pub fn with_nonce(
        consumer_key: &str,
        signature_method: SignatureMethod,
        nonce: String,
        timestamp: i64,
    ) -> Self {
        OAuthParams {
            consumer_key: consumer_key.to_string(),
            nonce,
            timestamp,
            signature_method,
            version: OAUTH_VERSION,
            signature: None,
        }
    }

    /// Unsigned `oauth_*` pairs, unencoded
    fn pairs(&self) -> Vec<(String, String)> {
        vec![
            ("oauth_consumer_key".to_string(), self.consumer_key.clone()),
            ("oauth_nonce".to_string(), self.nonce.clone()),
            (
                "oauth_signature_method".to_string(),
                self.signature_method.as_str().to_string(),
            ),
            ("oauth_timestamp".to_string(), self.timestamp.to_string()),
            ("oauth_version".to_string(), self.version.to_string()),
        ]
    }
}

/// Generate a single-use nonce (122 random bits, hex encoded)
pub fn generate_nonce() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Current Unix timestamp in seconds
pub fn timestamp() -> i64 {
    chrono::Utc::now().timestamp()
}

/// A URL carrying its OAuth signature, with the parameters that produced it
#[derive(Debug, Clone)]
pub struct SignedUrl {
    pub url: String,
    pub params: OAuthParams,
}

/// Signs request URLs with the consumer credentials
pub struct OAuthSigner<'a> {
    credentials: &'a Credentials,
    signature_method: &'a str,
}

impl<'a> OAuthSigner<'a> {
    /// Create a signer; `signature_method` is checked when signing
    pub fn new(credentials: &'a Credentials, signature_method: &'a str) -> Self {
        OAuthSigner {
            credentials,
            signature_method,
        }
    }

    /// Sign `url` for `method` with a fresh nonce and timestamp
    pub fn sign(&self, method: &str, url: &str) -> Result<SignedUrl> {
        let signature_method = SignatureMethod::from_str(self.signature_method)?;
        let params = OAuthParams::generate(&self.credentials.consumer_key, signature_method);
        self.sign_with(method, url, params)
    }

    /// Sign `url` for `method` using the given parameters.
    ///
    /// Query parameters already on `url` are part of the signature and are
    /// kept on the returned URL.
    pub fn sign_with(&self, method: &str, url: &str, mut params: OAuthParams) -> Result<SignedUrl> {
        let mut target = Url::parse(url)?;
        let existing: Vec<(String, String)> = target
            .query_pairs()
            .into_owned()
            .filter(|(k, _)| k != "oauth_signature")
            .collect();
        target.set_query(None);
        target.set_fragment(None);
        let base_url = target.as_str().to_string();

        let mut pairs = normalize_parameters(existing.into_iter().chain(params.pairs()));
        let base_string = signature_base_string(method, &base_url, &pairs);
        let signature = sign_base_string(
            params.signature_method,
            self.credentials.consumer_secret(),
            &base_string,
        )?;

        tracing::trace!(
            method = %method.to_ascii_uppercase(),
            params = pairs.len(),
            base_string_len = base_string.len(),
            "signed request"
        );

        pairs.push(("oauth_signature".to_string(), percent_encode(&signature)));
        params.signature = Some(signature);

        Ok(SignedUrl {
            url: format!("{}?{}", base_url, join_pairs(&pairs)),
            params,
        })
    }
}

/// Encode every key and value, then sort by key and value byte-wise
pub fn normalize_parameters<I>(params: I) -> Vec<(String, String)>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut pairs: Vec<(String, String)> = params
        .into_iter()
        .map(|(k, v)| (percent_encode(&k), percent_encode(&v)))
        .collect();
    pairs.sort();
    pairs
}

/// Build `METHOD&encoded-url&encoded-params` from normalized parameters
pub fn signature_base_string(method: &str, base_url: &str, normalized: &[(String, String)]) -> String {
    format!(
        "{}&{}&{}",
        method.to_ascii_uppercase(),
        percent_encode(base_url),
        percent_encode(&join_pairs(normalized))
    )
}

/// HMAC the base string with `encoded-secret&` and base64 the digest
pub fn sign_base_string(
    method: SignatureMethod,
    consumer_secret: &str,
    base_string: &str,
) -> Result<String> {
    let key = format!("{}&", percent_encode(consumer_secret));

    let digest = match method {
        SignatureMethod::HmacSha1 => {
            let mut mac = Hmac::<Sha1>::new_from_slice(key.as_bytes())
                .map_err(|e| ApiError::Other(format!("invalid HMAC key: {}", e)))?;
            mac.update(base_string.as_bytes());
            mac.finalize().into_bytes().to_vec()
        }
        SignatureMethod::HmacSha256 => {
            let mut mac = Hmac::<Sha256>::new_from_slice(key.as_bytes())
                .map_err(|e| ApiError::Other(format!("invalid HMAC key: {}", e)))?;
            mac.update(base_string.as_bytes());
            mac.finalize().into_bytes().to_vec()
        }
    };

    Ok(STANDARD.encode(digest))
}

fn join_pairs(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn params(key: &str, method: SignatureMethod, nonce: &str, ts: i64) -> OAuthParams {
        OAuthParams::with_nonce(key, method, nonce.to_string(), ts)
    }

    #[test]
    fn test_percent_encode_rfc3986() {
        assert_eq!(percent_encode("abcXYZ019-._~"), "abcXYZ019-._~");
        assert_eq!(percent_encode("a b+c*d!"), "a%20b%2Bc%2Ad%21");
        assert_eq!(percent_encode("filter[status]"), "filter%5Bstatus%5D");
        assert_eq!(percent_encode("é"), "%C3%A9");
    }

    #[test]
    fn test_signature_method_parse() {
        assert_eq!("HMAC-SHA1".parse::<SignatureMethod>().unwrap(), SignatureMethod::HmacSha1);
        assert_eq!("hmac-sha256".parse::<SignatureMethod>().unwrap(), SignatureMethod::HmacSha256);
        assert!(matches!(
            "RSA-SHA1".parse::<SignatureMethod>(),
            Err(ApiError::UnsupportedSignatureMethod(m)) if m == "RSA-SHA1"
        ));
    }

    #[test]
    fn test_known_answer_sha256() {
        let creds = Credentials::new("ck_test", "cs_test");
        let signer = OAuthSigner::new(&creds, "HMAC-SHA256");

        let signed = signer
            .sign_with(
                "get",
                "http://example.com/wp-json/wc/v3/products",
                params("ck_test", SignatureMethod::HmacSha256, "abc123", 1700000000),
            )
            .unwrap();

        assert_eq!(
            signed.params.signature.as_deref(),
            Some("H9etu5FXwk7iUWXpylxM8RpeAXvLD4fbBJpQIESKrZw=")
        );
        assert_eq!(
            signed.url,
            "http://example.com/wp-json/wc/v3/products?oauth_consumer_key=ck_test\
             &oauth_nonce=abc123&oauth_signature_method=HMAC-SHA256\
             &oauth_timestamp=1700000000&oauth_version=1.0\
             &oauth_signature=H9etu5FXwk7iUWXpylxM8RpeAXvLD4fbBJpQIESKrZw%3D"
        );
    }

    #[test]
    fn test_known_answer_sha1_with_query() {
        let creds = Credentials::new("ck_4f2a", "cs_9b&c+d");
        let signer = OAuthSigner::new(&creds, "HMAC-SHA1");

        let signed = signer
            .sign_with(
                "POST",
                "http://shop.example.com:8080/wc-api/v3/orders?per_page=10&filter%5Bstatus%5D=processing&search=blue+shirt",
                params("ck_4f2a", SignatureMethod::HmacSha1, "0f1e2d3c4b5a", 1712345678),
            )
            .unwrap();

        assert_eq!(
            signed.params.signature.as_deref(),
            Some("dibwoqNX1aIMxnzfpTDkClCTp2w=")
        );
        assert_eq!(
            signed.url,
            "http://shop.example.com:8080/wc-api/v3/orders?filter%5Bstatus%5D=processing\
             &oauth_consumer_key=ck_4f2a&oauth_nonce=0f1e2d3c4b5a\
             &oauth_signature_method=HMAC-SHA1&oauth_timestamp=1712345678\
             &oauth_version=1.0&per_page=10&search=blue%20shirt\
             &oauth_signature=dibwoqNX1aIMxnzfpTDkClCTp2w%3D"
        );
    }

    #[test]
    fn test_base_string() {
        let normalized = normalize_parameters(vec![
            ("oauth_nonce".to_string(), "abc123".to_string()),
            ("oauth_consumer_key".to_string(), "ck_test".to_string()),
        ]);
        let base = signature_base_string("get", "http://example.com/wp-json/wc/v3/products", &normalized);
        assert_eq!(
            base,
            "GET&http%3A%2F%2Fexample.com%2Fwp-json%2Fwc%2Fv3%2Fproducts\
             &oauth_consumer_key%3Dck_test%26oauth_nonce%3Dabc123"
        );
    }

    #[test]
    fn test_sort_by_key_then_value() {
        let normalized = normalize_parameters(vec![
            ("b".to_string(), "1".to_string()),
            ("a".to_string(), "z".to_string()),
            ("a".to_string(), "b".to_string()),
        ]);
        assert_eq!(
            normalized,
            vec![
                ("a".to_string(), "b".to_string()),
                ("a".to_string(), "z".to_string()),
                ("b".to_string(), "1".to_string()),
            ]
        );
    }

    #[test]
    fn test_signature_independent_of_query_order() {
        let creds = Credentials::new("ck", "cs");
        let signer = OAuthSigner::new(&creds, "HMAC-SHA256");
        let p = params("ck", SignatureMethod::HmacSha256, "n", 1);

        let first = signer
            .sign_with("GET", "http://example.com/x?b=2&a=1&a=0", p.clone())
            .unwrap();
        let second = signer
            .sign_with("GET", "http://example.com/x?a=0&a=1&b=2", p)
            .unwrap();

        assert_eq!(first.params.signature, second.params.signature);
        assert_eq!(first.url, second.url);
    }

    #[test]
    fn test_existing_signature_is_replaced() {
        let creds = Credentials::new("ck", "cs");
        let signer = OAuthSigner::new(&creds, "HMAC-SHA256");
        let p = params("ck", SignatureMethod::HmacSha256, "n", 1);

        let clean = signer.sign_with("GET", "http://example.com/x", p.clone()).unwrap();
        let stale = signer
            .sign_with("GET", "http://example.com/x?oauth_signature=old", p)
            .unwrap();

        assert_eq!(clean.url, stale.url);
    }

    #[test]
    fn test_unsupported_method_fails_at_signing() {
        let creds = Credentials::new("ck", "cs");
        let signer = OAuthSigner::new(&creds, "PLAINTEXT");

        let result = signer.sign("GET", "http://example.com/x");
        assert!(matches!(result, Err(ApiError::UnsupportedSignatureMethod(_))));
    }

    #[test]
    fn test_fresh_params_per_request() {
        let creds = Credentials::new("ck", "cs");
        let signer = OAuthSigner::new(&creds, "HMAC-SHA256");

        let first = signer.sign("GET", "http://example.com/x").unwrap();
        let second = signer.sign("GET", "http://example.com/x").unwrap();

        assert_ne!(first.params.nonce, second.params.nonce);
        assert_ne!(first.url, second.url);
        assert_eq!(first.params.version, "1.0");
    }

    #[test]
    fn test_nonce_uniqueness() {
        let nonces: HashSet<String> = (0..10_000).map(|_| generate_nonce()).collect();
        assert_eq!(nonces.len(), 10_000);
    }
}
