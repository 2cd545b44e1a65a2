use crate::config::{create_rest_client, Config, TransportOptions};
use crate::credentials::Credentials;
use crate::error::{ApiError, Result};
use crate::request::{AuthMode, HttpMethod, RequestBuilder};
use reqwest::blocking::{Client, Request, Response};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE, USER_AGENT};
use serde_json::{Map, Value};
use std::time::Instant;
use url::Url;

/// `Content-Type` of JSON request bodies
pub const JSON_CONTENT_TYPE: &str = "application/json;charset=utf-8";

/// Client for the store REST API
///
/// Configuration and credentials are read-only after construction, so one
/// `Api` can be shared across threads issuing requests in parallel.
#[derive(Clone, Debug)]
pub struct Api {
    client: Client,
    config: Config,
    credentials: Credentials,
}

/// A request ready to send, with the client that will send it
struct Dispatch {
    client: Client,
    request: Request,
    auth: AuthMode,
}

impl Api {
    /// Create a client for `url` with default configuration
    pub fn new(
        url: impl Into<String>,
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
    ) -> Result<Self> {
        Self::with_config(Config::new(url), Credentials::new(consumer_key, consumer_secret))
    }

    /// Create a client with custom configuration
    pub fn with_config(config: Config, credentials: Credentials) -> Result<Self> {
        config.validate()?;
        let client = create_rest_client(&config, config.effective_verify_ssl())?;

        Ok(Api {
            client,
            config,
            credentials,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// `GET` an endpoint
    pub fn get(&self, endpoint: &str, query: Option<&Map<String, Value>>) -> Result<Response> {
        self.do_request(HttpMethod::Get, endpoint, query, None)
    }

    /// `POST` a JSON body to an endpoint
    pub fn post(
        &self,
        endpoint: &str,
        body: &Value,
        query: Option<&Map<String, Value>>,
    ) -> Result<Response> {
        self.do_request(HttpMethod::Post, endpoint, query, Some(body))
    }

    /// `PUT` a JSON body to an endpoint
    pub fn put(
        &self,
        endpoint: &str,
        body: &Value,
        query: Option<&Map<String, Value>>,
    ) -> Result<Response> {
        self.do_request(HttpMethod::Put, endpoint, query, Some(body))
    }

    /// `DELETE` an endpoint
    pub fn delete(&self, endpoint: &str, query: Option<&Map<String, Value>>) -> Result<Response> {
        self.do_request(HttpMethod::Delete, endpoint, query, None)
    }

    /// `OPTIONS` an endpoint
    pub fn options(&self, endpoint: &str, query: Option<&Map<String, Value>>) -> Result<Response> {
        self.do_request(HttpMethod::Options, endpoint, query, None)
    }

    /// Execute a request and return the raw HTTP response
    ///
    /// The response is not inspected: error statuses come back as `Ok` and
    /// the body is left for the caller to decode.
    pub fn do_request(
        &self,
        method: HttpMethod,
        endpoint: &str,
        query: Option<&Map<String, Value>>,
        body: Option<&Value>,
    ) -> Result<Response> {
        self.do_request_with_options(method, endpoint, query, body, &TransportOptions::default())
    }

    /// Execute a request with per-call transport overrides
    pub fn do_request_with_options(
        &self,
        method: HttpMethod,
        endpoint: &str,
        query: Option<&Map<String, Value>>,
        body: Option<&Value>,
        options: &TransportOptions,
    ) -> Result<Response> {
        let Dispatch {
            client,
            request,
            auth,
        } = self.dispatch(method, endpoint, query, body, options)?;

        let path = request.url().path().to_string();
        if self.config.debug {
            tracing::debug!(
                method = %method,
                path = %path,
                auth = ?auth,
                body_bytes = request.body().and_then(|b| b.as_bytes()).map_or(0, |b| b.len()),
                "sending request"
            );
        }

        let start = Instant::now();
        let response = client.execute(request)?;

        if self.config.debug {
            tracing::debug!(
                method = %method,
                path = %path,
                status = response.status().as_u16(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "received response"
            );
        }

        Ok(response)
    }

    /// Assemble a request without sending it
    pub fn build_request(
        &self,
        method: HttpMethod,
        endpoint: &str,
        query: Option<&Map<String, Value>>,
        body: Option<&Value>,
        options: &TransportOptions,
    ) -> Result<Request> {
        Ok(self.dispatch(method, endpoint, query, body, options)?.request)
    }

    fn dispatch(
        &self,
        method: HttpMethod,
        endpoint: &str,
        query: Option<&Map<String, Value>>,
        body: Option<&Value>,
        options: &TransportOptions,
    ) -> Result<Dispatch> {
        let prepared =
            RequestBuilder::new(&self.config, &self.credentials).prepare(method, endpoint, query)?;
        let overrides = self.config.transport.merged_with(options);

        let mut url = Url::parse(&prepared.url)?;
        if prepared.auth == AuthMode::QueryString {
            url.query_pairs_mut()
                .append_pair("consumer_key", &self.credentials.consumer_key)
                .append_pair("consumer_secret", self.credentials.consumer_secret());
        }

        let payload = match overrides.body {
            Some(ref raw) => Some(raw.clone()),
            None => json_payload(body)?,
        }
        .filter(|p| !p.is_empty());

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&self.config.user_agent)
                .map_err(|e| ApiError::RequestBuild(format!("invalid user agent: {}", e)))?,
        );
        if payload.is_some() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
        }
        for (name, value) in &overrides.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ApiError::RequestBuild(format!("invalid header name {}: {}", name, e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| ApiError::RequestBuild(format!("invalid header value for {}: {}", name, e)))?;
            headers.insert(name, value);
        }

        let verify_ssl = overrides.verify_ssl.unwrap_or(self.config.verify_ssl);
        let client = if verify_ssl == self.config.effective_verify_ssl() {
            self.client.clone()
        } else {
            create_rest_client(&self.config, verify_ssl)?
        };

        let mut builder = client.request(method.into(), url);
        if prepared.auth == AuthMode::Basic {
            builder = builder.basic_auth(
                &self.credentials.consumer_key,
                Some(self.credentials.consumer_secret()),
            );
        }
        // Replaces same-named headers, so overrides can also replace Authorization
        builder = builder.headers(headers);
        if let Some(timeout) = overrides.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(payload) = payload {
            builder = builder.body(payload);
        }

        Ok(Dispatch {
            client,
            request: builder.build()?,
            auth: prepared.auth,
        })
    }
}

/// Serialize a body to JSON; absent, null or empty bodies send no payload
fn json_payload(body: Option<&Value>) -> Result<Option<Vec<u8>>> {
    match body {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) if map.is_empty() => Ok(None),
        Some(Value::Array(items)) if items.is_empty() => Ok(None),
        Some(value) => Ok(Some(serde_json::to_vec(value)?)),
    }
}
