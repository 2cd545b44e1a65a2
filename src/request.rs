use serde_json::{Map, Value};

use crate::config::Config;
use crate::credentials::Credentials;
use crate::error::Result;
use crate::oauth::{OAuthParams, OAuthSigner};
use crate::query;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Options,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
        }
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
            HttpMethod::Options => reqwest::Method::OPTIONS,
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the credentials travel with a request. Exactly one per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// HTTPS, `Authorization: Basic` with key and secret
    Basic,
    /// HTTPS, `consumer_key`/`consumer_secret` query parameters
    QueryString,
    /// Plain HTTP, OAuth 1.0a signature already in the URL
    OAuth,
}

/// Final URL of a request and the authentication still to be attached
#[derive(Debug, Clone)]
pub struct PreparedUrl {
    pub url: String,
    pub auth: AuthMode,
    /// Present when the URL was signed
    pub oauth: Option<OAuthParams>,
}

/// Join the store URL, namespace, version and endpoint with exactly one `/`
/// between segments.
pub fn resolve_url(config: &Config, endpoint: &str) -> String {
    let segments = [
        config.url.trim_end_matches('/'),
        config.namespace.prefix(),
        config.version.trim_matches('/'),
        endpoint.trim_start_matches('/'),
    ];

    segments
        .iter()
        .filter(|s| !s.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("/")
}

/// Resolves request URLs and decides how each request authenticates
pub struct RequestBuilder<'a> {
    config: &'a Config,
    credentials: &'a Credentials,
}

impl<'a> RequestBuilder<'a> {
    pub fn new(config: &'a Config, credentials: &'a Credentials) -> Self {
        RequestBuilder {
            config,
            credentials,
        }
    }

    /// Resolve the URL for `endpoint` with `query` appended.
    ///
    /// Over HTTPS the URL is returned as-is and the caller attaches basic auth
    /// or query-string credentials. Over plain HTTP the URL comes back signed.
    pub fn prepare(
        &self,
        method: HttpMethod,
        endpoint: &str,
        query: Option<&Map<String, Value>>,
    ) -> Result<PreparedUrl> {
        let mut url = resolve_url(self.config, endpoint);
        if let Some(encoded) = query::encode(query) {
            url.push(if url.contains('?') { '&' } else { '?' });
            url.push_str(&encoded);
        }

        if self.config.is_ssl() {
            let auth = if self.config.query_string_auth {
                AuthMode::QueryString
            } else {
                AuthMode::Basic
            };
            return Ok(PreparedUrl {
                url,
                auth,
                oauth: None,
            });
        }

        let signed = OAuthSigner::new(self.credentials, &self.config.signature_method)
            .sign(method.as_str(), &url)?;

        Ok(PreparedUrl {
            url: signed.url,
            auth: AuthMode::OAuth,
            oauth: Some(signed.params),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Namespace;
    use crate::error::ApiError;
    use serde_json::json;

    fn creds() -> Credentials {
        Credentials::new("ck_test", "cs_test")
    }

    #[test]
    fn test_resolve_url_single_separator() {
        for base in ["https://shop.example.com", "https://shop.example.com/", "https://shop.example.com//"] {
            for endpoint in ["products", "/products", "//products"] {
                let config = Config::new(base);
                assert_eq!(
                    resolve_url(&config, endpoint),
                    "https://shop.example.com/wp-json/wc/v3/products",
                    "base={} endpoint={}",
                    base,
                    endpoint
                );
            }
        }
    }

    #[test]
    fn test_resolve_url_subdirectory_and_legacy() {
        let config = Config::new("https://example.com/store/")
            .with_namespace(Namespace::Legacy)
            .with_version("/v2/");
        assert_eq!(
            resolve_url(&config, "/orders/12/notes"),
            "https://example.com/store/wc-api/v2/orders/12/notes"
        );
    }

    #[test]
    fn test_prepare_https_basic() {
        let config = Config::new("https://shop.example.com");
        let creds = creds();
        let query = json!({"per_page": 5});

        let prepared = RequestBuilder::new(&config, &creds)
            .prepare(HttpMethod::Get, "products", query.as_object())
            .unwrap();

        assert_eq!(prepared.auth, AuthMode::Basic);
        assert_eq!(
            prepared.url,
            "https://shop.example.com/wp-json/wc/v3/products?per_page=5"
        );
        assert!(prepared.oauth.is_none());
    }

    #[test]
    fn test_prepare_https_query_string() {
        let config = Config::new("https://shop.example.com").with_query_string_auth(true);
        let creds = creds();

        let prepared = RequestBuilder::new(&config, &creds)
            .prepare(HttpMethod::Get, "products", None)
            .unwrap();

        assert_eq!(prepared.auth, AuthMode::QueryString);
        assert_eq!(prepared.url, "https://shop.example.com/wp-json/wc/v3/products");
    }

    #[test]
    fn test_prepare_http_always_signs() {
        for query_string_auth in [false, true] {
            let config = Config::new("http://shop.example.com")
                .with_query_string_auth(query_string_auth);
            let creds = creds();
            let query = json!({"status": "processing"});

            let prepared = RequestBuilder::new(&config, &creds)
                .prepare(HttpMethod::Get, "orders", query.as_object())
                .unwrap();

            assert_eq!(prepared.auth, AuthMode::OAuth);
            assert!(prepared
                .url
                .starts_with("http://shop.example.com/wp-json/wc/v3/orders?oauth_consumer_key=ck_test"));
            assert!(prepared.url.contains("&status=processing"));
            assert!(prepared.url.contains("&oauth_signature="));
            assert!(!prepared.url.contains("cs_test"));
            assert!(prepared.oauth.unwrap().signature.is_some());
        }
    }

    #[test]
    fn test_prepare_http_bad_signature_method() {
        let config = Config::new("http://shop.example.com").with_signature_method("MD5");
        let creds = creds();

        let result = RequestBuilder::new(&config, &creds).prepare(HttpMethod::Get, "products", None);
        assert!(matches!(result, Err(ApiError::UnsupportedSignatureMethod(_))));
    }

    #[test]
    fn test_http_method_names() {
        assert_eq!(HttpMethod::Options.as_str(), "OPTIONS");
        assert_eq!(reqwest::Method::from(HttpMethod::Put), reqwest::Method::PUT);
    }
}
