use crate::error::{ApiError, Result};
use reqwest::blocking::{Client, ClientBuilder};
use std::time::Duration;
use url::Url;

/// Default API version
pub const DEFAULT_VERSION: &str = "v3";

/// Default OAuth 1.0a signature method
pub const DEFAULT_SIGNATURE_METHOD: &str = "HMAC-SHA256";

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Create the HTTP client for store API requests
pub fn create_rest_client(config: &Config, verify_ssl: bool) -> Result<Client> {
    let client = ClientBuilder::new()
        .timeout(config.timeout)
        .connect_timeout(Duration::from_secs(10))
        .danger_accept_invalid_certs(!verify_ssl)
        .build()?;
    Ok(client)
}

/// Path shape of the API, i.e. which segment precedes the version number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Namespace {
    /// WordPress REST API routes: `{url}/wp-json/wc/{version}/...`
    #[default]
    WpJson,
    /// Legacy standalone API routes: `{url}/wc-api/{version}/...`
    Legacy,
}

impl Namespace {
    /// Path segment(s) placed between the store URL and the version
    pub fn prefix(&self) -> &'static str {
        match self {
            Namespace::WpJson => "wp-json/wc",
            Namespace::Legacy => "wc-api",
        }
    }
}

/// Transport-level overrides applied on top of everything the client computes.
///
/// Options can be set once on [`Config::transport`] and again per call. The
/// per-call options win over the config-level ones, which win over the
/// computed defaults.
#[derive(Debug, Clone, Default)]
pub struct TransportOptions {
    /// Extra headers; a header with the same name as a computed one replaces it
    pub headers: Vec<(String, String)>,
    /// Timeout for the whole request
    pub timeout: Option<Duration>,
    /// Certificate verification override
    pub verify_ssl: Option<bool>,
    /// Raw payload sent instead of the JSON-encoded body
    pub body: Option<Vec<u8>>,
}

impl TransportOptions {
    /// Add a header override
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Set the timeout override
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the certificate verification override
    pub fn with_verify_ssl(mut self, verify_ssl: bool) -> Self {
        self.verify_ssl = Some(verify_ssl);
        self
    }

    /// Set the raw body override
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Layer `later` over `self`. Scalars in `later` win; headers are
    /// concatenated so later entries are applied last.
    pub fn merged_with(&self, later: &TransportOptions) -> TransportOptions {
        let mut headers = self.headers.clone();
        headers.extend(later.headers.iter().cloned());

        TransportOptions {
            headers,
            timeout: later.timeout.or(self.timeout),
            verify_ssl: later.verify_ssl.or(self.verify_ssl),
            body: later.body.clone().or_else(|| self.body.clone()),
        }
    }
}

/// Configuration for the store API client
///
/// Read-only once a client has been built from it.
#[derive(Debug, Clone)]
pub struct Config {
    /// Store base URL, e.g. `https://shop.example.com`
    pub url: String,
    /// API path shape
    pub namespace: Namespace,
    /// API version, e.g. `v3`
    pub version: String,
    /// Verify TLS certificates
    pub verify_ssl: bool,
    /// OAuth 1.0a signature method name, used over plain HTTP only
    pub signature_method: String,
    /// Over HTTPS, send credentials as query parameters instead of basic auth
    pub query_string_auth: bool,
    /// Enable request/response tracing
    pub debug: bool,
    /// Request timeout
    pub timeout: Duration,
    /// `User-Agent` header value
    pub user_agent: String,
    /// Transport overrides applied to every request
    pub transport: TransportOptions,
}

impl Config {
    /// Create a new configuration for the given store URL with default settings
    pub fn new(url: impl Into<String>) -> Self {
        Config {
            url: url.into(),
            namespace: Namespace::default(),
            version: DEFAULT_VERSION.to_string(),
            verify_ssl: true,
            signature_method: DEFAULT_SIGNATURE_METHOD.to_string(),
            query_string_auth: false,
            debug: false,
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("WooCommerce-Rust-REST-API/{}", env!("CARGO_PKG_VERSION")),
            transport: TransportOptions::default(),
        }
    }

    /// Set the API path shape
    pub fn with_namespace(mut self, namespace: Namespace) -> Self {
        self.namespace = namespace;
        self
    }

    /// Set the API version
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Enable or disable certificate verification
    pub fn with_verify_ssl(mut self, verify_ssl: bool) -> Self {
        self.verify_ssl = verify_ssl;
        self
    }

    /// Set the OAuth signature method name
    pub fn with_signature_method(mut self, method: impl Into<String>) -> Self {
        self.signature_method = method.into();
        self
    }

    /// Send credentials in the query string instead of basic auth over HTTPS
    pub fn with_query_string_auth(mut self, query_string_auth: bool) -> Self {
        self.query_string_auth = query_string_auth;
        self
    }

    /// Set debug mode
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the `User-Agent` header value
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the transport overrides applied to every request
    pub fn with_transport(mut self, transport: TransportOptions) -> Self {
        self.transport = transport;
        self
    }

    /// Check the configuration before a client is built from it.
    ///
    /// The signature method is checked when a request is signed, not here.
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.url)?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ApiError::InvalidConfig(format!(
                "unsupported URL scheme: {}",
                url.scheme()
            )));
        }
        if url.host_str().is_none() {
            return Err(ApiError::InvalidConfig(format!("URL has no host: {}", self.url)));
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(ApiError::InvalidConfig(format!(
                "URL must not carry a query or fragment: {}",
                self.url
            )));
        }
        if self.version.trim_matches('/').is_empty() {
            return Err(ApiError::InvalidConfig("API version is empty".to_string()));
        }
        Ok(())
    }

    /// Whether the store is reached over an encrypted transport
    pub fn is_ssl(&self) -> bool {
        Url::parse(&self.url)
            .map(|u| u.scheme() == "https")
            .unwrap_or(false)
    }

    /// Certificate verification after config-level overrides
    pub fn effective_verify_ssl(&self) -> bool {
        self.transport.verify_ssl.unwrap_or(self.verify_ssl)
    }
}
