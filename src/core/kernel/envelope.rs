//! Wire envelope codec.
//!
//! Signed POST entities travel as `request=<payload>&signature=<sig>` with an
//! optional trailing `&card=<json>`; responses and notifications arrive in
//! the same form-encoded shape under the `response`/`request` key. GET
//! endpoints take a plain query string built from the validated field map
//! with no signing.

use crate::core::errors::CheckoutError;
use crate::core::types::FieldMap;
use serde_json::Value;
use url::form_urlencoded;

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Build a signed POST entity. The card, when present, is appended after the
/// signature and is not covered by it.
pub fn encode_request(payload: &str, signature: &str, card: Option<&str>) -> String {
    let mut entity = form_urlencoded::Serializer::new(String::new());
    entity.append_pair("request", payload);
    entity.append_pair("signature", signature);
    if let Some(card) = card {
        entity.append_pair("card", card);
    }
    entity.finish()
}

/// Extract the payload under `payload_key` and its `signature` from a
/// form-encoded entity.
pub fn decode(entity: &str, payload_key: &str) -> Result<(String, String), CheckoutError> {
    let mut payload = None;
    let mut signature = None;
    for (key, value) in form_urlencoded::parse(entity.as_bytes()) {
        if key == payload_key {
            payload = Some(value.into_owned());
        } else if key == "signature" {
            signature = Some(value.into_owned());
        }
    }
    match (payload, signature) {
        (Some(payload), Some(signature)) => Ok((payload, signature)),
        (None, _) => Err(CheckoutError::missing(payload_key)),
        (_, None) => Err(CheckoutError::missing("signature")),
    }
}

/// Build an unsigned query string from a field map (GET endpoints).
pub fn query_string(fields: &FieldMap) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    for (key, value) in fields {
        match value {
            Value::String(s) => query.append_pair(key, s),
            // Booleans travel as 1/0 flags in query strings.
            Value::Bool(b) => query.append_pair(key, if *b { "1" } else { "0" }),
            other => query.append_pair(key, &other.to_string()),
        };
    }
    query.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_decode_round_trip() {
        let payload = r#"{"Amount":"100.00","Note":"a&b=c"}"#;
        let entity = encode_request(payload, "c2ln+/=", None);
        let (decoded, signature) = decode(&entity, "request").unwrap();
        assert_eq!(decoded, payload);
        assert_eq!(signature, "c2ln+/=");
    }

    #[test]
    fn card_is_appended_after_the_signature() {
        let entity = encode_request("{}", "sig", Some(r#"{"Number":"4111111111111111"}"#));
        assert!(entity.starts_with("request="));
        let card_pos = entity.find("card=").unwrap();
        let sig_pos = entity.find("signature=").unwrap();
        assert!(card_pos > sig_pos);
    }

    #[test]
    fn decode_reports_missing_keys() {
        let err = decode("signature=abc", "response").unwrap_err();
        assert_eq!(err.to_string(), "Missing Value: response is required");
        let err = decode("response=abc", "response").unwrap_err();
        assert_eq!(err.to_string(), "Missing Value: signature is required");
    }

    #[test]
    fn query_string_renders_booleans_as_flags() {
        let mut fields = FieldMap::new();
        fields.insert("IncludeRate".into(), serde_json::Value::Bool(true));
        fields.insert("ViaAgent".into(), serde_json::Value::Bool(false));
        fields.insert("Country".into(), serde_json::Value::String("CA".into()));
        assert_eq!(query_string(&fields), "Country=CA&IncludeRate=1&ViaAgent=0");
    }
}
