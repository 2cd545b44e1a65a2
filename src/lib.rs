//! # woocommerce-api - WooCommerce REST API client for Rust
//!
//! A blocking client for the WooCommerce product/order REST API.
//!
//! ## Features
//!
//! - One dispatch routine behind `get`/`post`/`put`/`delete`/`options`
//! - Authentication picked from the transport:
//!   - HTTPS: HTTP basic auth, or credentials in the query string
//!   - HTTP: OAuth 1.0a query-string signing (HMAC-SHA1 or HMAC-SHA256)
//! - PHP-style bracket notation for nested query parameters
//! - Raw responses, with optional JSON decoding helpers
//!
//! ## Basic Usage
//!
//! ```no_run
//! use woocommerce_api::{json, response, Api};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api = Api::new("https://shop.example.com", "ck_xxx", "cs_xxx")?;
//!
//!     let res = api.get("products", json!({"per_page": 5}).as_object())?;
//!     println!("status: {}", res.status());
//!
//!     let products: Vec<serde_json::Value> = response::decode(res)?;
//!     println!("{} products", products.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! ```no_run
//! use woocommerce_api::{Api, Config, Credentials, Namespace};
//!
//! let config = Config::new("http://legacy.example.com")
//!     .with_namespace(Namespace::Legacy)
//!     .with_signature_method("HMAC-SHA1")
//!     .with_debug(true);
//!
//! let api = Api::with_config(config, Credentials::new("ck_xxx", "cs_xxx"))?;
//! # Ok::<(), woocommerce_api::ApiError>(())
//! ```

pub mod config;
pub mod credentials;
pub mod error;
pub mod oauth;
pub mod query;
pub mod request;
pub mod resources;
pub mod response;
pub mod rest;

// Re-export main types for convenience
pub use config::{Config, Namespace, TransportOptions};
pub use credentials::Credentials;
pub use error::{ApiError, Result};
pub use oauth::{OAuthParams, OAuthSigner, SignatureMethod};
pub use request::{AuthMode, HttpMethod, RequestBuilder};
pub use rest::Api;

// Re-export serde_json for convenience
pub use serde_json::json;
