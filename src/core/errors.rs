use std::fmt;
use thiserror::Error;

/// Semantic kinds of values checked by [`crate::core::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Boolean,
    String,
    Decimal,
    Number,
    Url,
    Country,
    Uuid,
    Date,
    Currency,
    Email,
    IpAddress,
    CardNumber,
    VerificationCode,
    ExpiryMonth,
    Items,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Boolean => "boolean",
            Self::String => "string",
            Self::Decimal => "decimal value",
            Self::Number => "number",
            Self::Url => "URL",
            Self::Country => "ISO 3166-1-alpha-2 country code",
            Self::Uuid => "UUID",
            Self::Date => "date",
            Self::Currency => "ISO 4217 currency code",
            Self::Email => "email address",
            Self::IpAddress => "public IP address",
            Self::CardNumber => "card number",
            Self::VerificationCode => "verification code",
            Self::ExpiryMonth => "expiry month",
            Self::Items => "item list",
        };
        f.write_str(text)
    }
}

/// Errors raised while building a request, before anything is sent.
///
/// Once a request has left the process, failures are reported through
/// [`crate::core::types::ApiResult`] instead, never through this type.
#[derive(Error, Debug)]
pub enum CheckoutError {
    #[error("Missing Value: {0} is required")]
    Missing(String),

    #[error("Invalid Value: [{value}] is not a valid {kind}")]
    InvalidValue { value: String, kind: ValueKind },

    #[error("Configuration error: {0}")]
    Config(#[from] crate::core::config::ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CheckoutError {
    pub(crate) fn missing(field: &str) -> Self {
        Self::Missing(field.to_string())
    }

    pub(crate) fn invalid(value: impl fmt::Display, kind: ValueKind) -> Self {
        Self::InvalidValue {
            value: value.to_string(),
            kind,
        }
    }

    /// Card data must never appear in error text.
    pub(crate) fn invalid_redacted(kind: ValueKind) -> Self {
        Self::InvalidValue {
            value: "REDACTED".to_string(),
            kind,
        }
    }
}
