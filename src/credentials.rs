use secrecy::{ExposeSecret, SecretString};

/// Consumer key and secret issued by the store.
///
/// The secret only leaves this type when a request actually needs it: as the
/// basic auth password, as a query parameter over HTTPS, or as the HMAC key
/// when signing.
#[derive(Clone)]
pub struct Credentials {
    /// Consumer key (`ck_...`)
    pub consumer_key: String,
    consumer_secret: SecretString,
}

impl Credentials {
    /// Create credentials from a consumer key and consumer secret
    pub fn new(consumer_key: impl Into<String>, consumer_secret: impl Into<String>) -> Self {
        Credentials {
            consumer_key: consumer_key.into(),
            consumer_secret: SecretString::from(consumer_secret.into()),
        }
    }

    /// Get the consumer secret in cleartext
    pub fn consumer_secret(&self) -> &str {
        self.consumer_secret.expose_secret()
    }
}

// Implement Debug manually to avoid exposing the consumer secret
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"<redacted>")
            .finish()
    }
}
