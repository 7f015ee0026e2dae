use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::env;

/// The version of the Checkout API this crate is built against.
pub const API_REVISION: &str = "v2.17";

const PRODUCTION_URL: &str = "https://checkout.crosspay.net/";
const PRODUCTION_FINGERPRINT_URL: &str = "https://fingerprint.crosspay.net/";
const SANDBOX_URL: &str = "https://checkout-sandbox.crosspay.net/";

/// Which API deployment to talk to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Production,
    Sandbox,
    /// Explicit base URL override, for testing against simulated responses.
    Custom(String),
}

impl Environment {
    fn base_url(&self) -> String {
        let base = match self {
            Self::Production => PRODUCTION_URL,
            Self::Sandbox => SANDBOX_URL,
            Self::Custom(url) => url.as_str(),
        };
        if base.ends_with('/') {
            base.to_string()
        } else {
            format!("{}/", base)
        }
    }
}

/// Read-only configuration for a [`crate::CheckoutClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Merchant ID assigned by CrossPay (a UUID).
    pub merchant_id: String,
    /// Shared secret for the merchant.
    pub secret: Secret<String>,
    pub environment: Environment,
    /// Name and version of the application using this library; embedded in
    /// the outbound User-Agent.
    pub app_name: String,
    /// Milliseconds to wait between receiving a 503 and re-sending.
    pub retry_delay_ms: u64,
    /// Total number of attempts for a request that keeps receiving 503.
    pub max_attempts: u32,
    /// Log request and response entities at debug level.
    pub verbose: bool,
}

// Never expose the shared secret in serialized form.
impl Serialize for ClientConfig {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("ClientConfig", 6)?;
        state.serialize_field("merchant_id", &self.merchant_id)?;
        state.serialize_field("secret", "[REDACTED]")?;
        state.serialize_field("app_name", &self.app_name)?;
        state.serialize_field("retry_delay_ms", &self.retry_delay_ms)?;
        state.serialize_field("max_attempts", &self.max_attempts)?;
        state.serialize_field("verbose", &self.verbose)?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for ClientConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct ClientConfigHelper {
            merchant_id: String,
            secret: String,
            #[serde(default)]
            sandbox: bool,
            base_url: Option<String>,
            app_name: String,
        }

        let helper = ClientConfigHelper::deserialize(deserializer)?;
        let environment = match helper.base_url {
            Some(url) => Environment::Custom(url),
            None if helper.sandbox => Environment::Sandbox,
            None => Environment::Production,
        };
        Ok(Self::new(
            helper.merchant_id,
            helper.secret,
            environment,
            helper.app_name,
        ))
    }
}

impl ClientConfig {
    /// Create a new configuration.
    ///
    /// # Arguments
    /// * `merchant_id` - CrossPay-assigned merchant ID (UUID)
    /// * `secret` - Shared secret used to sign and verify payloads
    /// * `environment` - Which deployment to talk to
    /// * `app_name` - Identifies the calling application in the User-Agent
    #[must_use]
    pub fn new(
        merchant_id: impl Into<String>,
        secret: impl Into<String>,
        environment: Environment,
        app_name: impl Into<String>,
    ) -> Self {
        Self {
            merchant_id: merchant_id.into(),
            secret: Secret::new(secret.into()),
            environment,
            app_name: app_name.into(),
            retry_delay_ms: 50,
            max_attempts: 2,
            verbose: false,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Expected environment variables:
    /// - `CROSSPAY_MERCHANT_ID`
    /// - `CROSSPAY_SECRET`
    /// - `CROSSPAY_SANDBOX` (optional, defaults to false)
    /// - `CROSSPAY_BASE_URL` (optional, overrides the environment selection)
    /// - `CROSSPAY_APP_NAME` (optional)
    pub fn from_env() -> Result<Self, ConfigError> {
        let merchant_id = env::var("CROSSPAY_MERCHANT_ID")
            .map_err(|_| ConfigError::MissingEnvironmentVariable("CROSSPAY_MERCHANT_ID".into()))?;
        let secret = env::var("CROSSPAY_SECRET")
            .map_err(|_| ConfigError::MissingEnvironmentVariable("CROSSPAY_SECRET".into()))?;

        let sandbox = env::var("CROSSPAY_SANDBOX")
            .unwrap_or_else(|_| "false".to_string())
            .parse::<bool>()
            .unwrap_or(false);

        let environment = match env::var("CROSSPAY_BASE_URL").ok() {
            Some(url) => Environment::Custom(url),
            None if sandbox => Environment::Sandbox,
            None => Environment::Production,
        };

        let app_name =
            env::var("CROSSPAY_APP_NAME").unwrap_or_else(|_| "crosspay-rs".to_string());

        Ok(Self::new(merchant_id, secret, environment, app_name))
    }

    /// Create configuration from a .env file and environment variables.
    ///
    /// Loads variables from `.env` if it exists, then reads the standard
    /// variable names. A missing file is not an error.
    ///
    /// **Security Warning**: Never commit .env files to version control!
    #[cfg(feature = "env-file")]
    pub fn from_env_file() -> Result<Self, ConfigError> {
        match dotenv::dotenv() {
            Ok(_) => {}
            Err(dotenv::Error::Io(io_err)) if io_err.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(ConfigError::InvalidConfiguration(format!(
                    "Failed to load .env file: {}",
                    e
                )));
            }
        }
        Self::from_env()
    }

    /// Set the delay between a 503 response and the next attempt.
    #[must_use]
    pub const fn retry_delay_ms(mut self, delay_ms: u64) -> Self {
        self.retry_delay_ms = delay_ms;
        self
    }

    /// Set the total number of attempts for requests answered with 503.
    #[must_use]
    pub const fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Enable debug logging of request and response entities.
    #[must_use]
    pub const fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// The versioned API endpoint URL, e.g. `https://checkout.crosspay.net/v2.17/`.
    #[must_use]
    pub fn api_url(&self) -> String {
        format!("{}{}/", self.environment.base_url(), API_REVISION)
    }

    /// URL serving the device-fingerprinting script.
    ///
    /// The script must be executed in the consumer's browser; the value it
    /// produces is passed to `checkout`. There is no support in this library
    /// to fetch a fingerprint directly.
    #[must_use]
    pub fn device_fingerprint_url(&self) -> String {
        let base = match &self.environment {
            Environment::Production => PRODUCTION_FINGERPRINT_URL.to_string(),
            Environment::Sandbox => self.api_url(),
            Environment::Custom(_) => format!("{}fingerprint", self.api_url()),
        };
        format!("{}?MerchantId={}", base, self.merchant_id)
    }

    /// Get the shared secret (use carefully - exposes the secret).
    pub fn secret(&self) -> &str {
        self.secret.expose_secret()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvironmentVariable(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}
