//! Field validators.
//!
//! Validators gate syntax only; they never transform semantics. A valid value
//! is returned unchanged (decimal amounts stay strings so money never loses
//! precision), an invalid one fails with
//! [`CheckoutError::InvalidValue`]. Each kind comes in three call shapes:
//! a direct check, a required-from-map extractor, and an optional-from-map
//! extractor. The map extractors are used to pull values back out of decoded
//! responses and notifications.

use crate::core::errors::{CheckoutError, ValueKind};
use crate::core::types::FieldMap;
use regex::Regex;
use serde_json::Value;
use std::net::IpAddr;
use std::sync::OnceLock;

fn pattern(cell: &'static OnceLock<Regex>, source: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(source).expect("pattern compiles"))
}

fn decimal_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    pattern(&RE, r"^[1-9][0-9]*(\.[0-9]*)?$")
}

fn number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    pattern(&RE, r"^[0-9]+$")
}

fn country_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    pattern(&RE, r"^[A-Z]{2}$")
}

fn currency_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    pattern(&RE, r"^[A-Z]{3}$")
}

fn uuid_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    pattern(&RE, r"^(?i)[0-9a-f]{8}-(?:[0-9a-f]{4}-){3}[0-9a-f]{12}$")
}

fn date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    pattern(&RE, r"^[0-9]{4}-(0[1-9]|1[012])-(0[1-9]|[12][0-9]|3[01])$")
}

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    pattern(&RE, r"^[^@\s]+@[^@\s]+\.[^@\s]+$")
}

// ---------------------------------------------------------------------------
// Direct checks
// ---------------------------------------------------------------------------

/// Returns the value iff it matches `^[1-9][0-9]*(\.[0-9]*)?$`.
pub fn decimal(x: &str) -> Result<&str, CheckoutError> {
    if decimal_re().is_match(x) {
        Ok(x)
    } else {
        Err(CheckoutError::invalid(x, ValueKind::Decimal))
    }
}

/// Returns the value iff it is a string of digits.
pub fn number(x: &str) -> Result<&str, CheckoutError> {
    if number_re().is_match(x) {
        Ok(x)
    } else {
        Err(CheckoutError::invalid(x, ValueKind::Number))
    }
}

/// Returns the value iff it is an ISO 3166-1 alpha-2 country code.
pub fn country(x: &str) -> Result<&str, CheckoutError> {
    if country_re().is_match(x) {
        Ok(x)
    } else {
        Err(CheckoutError::invalid(x, ValueKind::Country))
    }
}

/// Returns the value iff it is an ISO 4217 currency code.
pub fn currency(x: &str) -> Result<&str, CheckoutError> {
    if currency_re().is_match(x) {
        Ok(x)
    } else {
        Err(CheckoutError::invalid(x, ValueKind::Currency))
    }
}

/// Returns the value iff it is a UUID (8-4-4-4-12 hex, case-insensitive).
/// The original casing is preserved.
pub fn uuid(x: &str) -> Result<&str, CheckoutError> {
    if uuid_re().is_match(x) {
        Ok(x)
    } else {
        Err(CheckoutError::invalid(x, ValueKind::Uuid))
    }
}

/// Returns the value iff it is a strict `YYYY-MM-DD` date.
pub fn date(x: &str) -> Result<&str, CheckoutError> {
    if date_re().is_match(x) {
        Ok(x)
    } else {
        Err(CheckoutError::invalid(x, ValueKind::Date))
    }
}

/// Returns the value iff it is an email address.
pub fn email(x: &str) -> Result<&str, CheckoutError> {
    if email_re().is_match(x) {
        Ok(x)
    } else {
        Err(CheckoutError::invalid(x, ValueKind::Email))
    }
}

/// Returns the value iff it parses as a URL.
pub fn url(x: &str) -> Result<&str, CheckoutError> {
    match url::Url::parse(x) {
        Ok(_) => Ok(x),
        Err(_) => Err(CheckoutError::invalid(x, ValueKind::Url)),
    }
}

/// Returns the value iff it is a public IP address (IPv4 or IPv6, rejecting
/// private and reserved ranges).
pub fn public_ip(x: &str) -> Result<&str, CheckoutError> {
    let addr: IpAddr = x
        .parse()
        .map_err(|_| CheckoutError::invalid(x, ValueKind::IpAddress))?;
    if is_public(&addr) {
        Ok(x)
    } else {
        Err(CheckoutError::invalid(x, ValueKind::IpAddress))
    }
}

fn is_public(addr: &IpAddr) -> bool {
    match addr {
        IpAddr::V4(v4) => {
            let first = v4.octets()[0];
            !(v4.is_private()
                || v4.is_loopback()
                || v4.is_link_local()
                || v4.is_broadcast()
                || v4.is_documentation()
                || v4.is_unspecified()
                // 0.0.0.0/8 and 240.0.0.0/4 are reserved
                || first == 0
                || first >= 240)
        }
        IpAddr::V6(v6) => {
            let first = v6.segments()[0];
            !(v6.is_loopback()
                || v6.is_unspecified()
                // fc00::/7 unique local, fe80::/10 link local
                || (first & 0xfe00) == 0xfc00
                || (first & 0xffc0) == 0xfe80)
        }
    }
}

// ---------------------------------------------------------------------------
// Option-based shapes, for caller-supplied input
// ---------------------------------------------------------------------------

/// A required value: `None` fails with `Missing`.
pub fn required<T>(field: &str, value: Option<T>) -> Result<T, CheckoutError> {
    value.ok_or_else(|| CheckoutError::missing(field))
}

/// Apply a direct check to a value that may be absent.
pub fn optional<'a>(
    value: Option<&'a str>,
    check: fn(&str) -> Result<&str, CheckoutError>,
) -> Result<Option<&'a str>, CheckoutError> {
    match value {
        None => Ok(None),
        Some(v) => check(v).map(|_| Some(v)),
    }
}

// ---------------------------------------------------------------------------
// Map extractors, for decoded responses and notifications
// ---------------------------------------------------------------------------

/// Extract a required string from a decoded object.
pub fn get_str<'a>(map: &'a FieldMap, key: &str) -> Result<&'a str, CheckoutError> {
    match map.get(key) {
        None | Some(Value::Null) => Err(CheckoutError::missing(key)),
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(CheckoutError::invalid(other, ValueKind::String)),
    }
}

/// Extract a string from a decoded object. Absent or null yields `None`.
pub fn opt_str<'a>(map: &'a FieldMap, key: &str) -> Result<Option<&'a str>, CheckoutError> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(other) => Err(CheckoutError::invalid(other, ValueKind::String)),
    }
}

/// Extract a required boolean from a decoded object.
pub fn get_bool(map: &FieldMap, key: &str) -> Result<bool, CheckoutError> {
    match map.get(key) {
        None | Some(Value::Null) => Err(CheckoutError::missing(key)),
        Some(Value::Bool(b)) => Ok(*b),
        Some(other) => Err(CheckoutError::invalid(other, ValueKind::Boolean)),
    }
}

/// Extract a required UUID string from a decoded object.
pub fn get_uuid<'a>(map: &'a FieldMap, key: &str) -> Result<&'a str, CheckoutError> {
    uuid(get_str(map, key)?)
}
