//! Response processing.
//!
//! Everything here is terminal for the call: once a request has been sent, a
//! network side effect may already have occurred, so every failure mode is
//! reported through [`ApiResult`] and never raised. Retries happen only at
//! the transport level, for 503.

use crate::core::kernel::{RawResponse, Signer};
use crate::core::types::ApiResult;
use crate::core::kernel::envelope;
use crate::core::validate;
use serde_json::Value;

/// Process a signed `response=<..>&signature=<..>` reply.
pub(crate) fn process_signed(signer: &dyn Signer, raw: RawResponse) -> ApiResult {
    let RawResponse { status, body } = raw;
    if status != Some(200) {
        return ApiResult::failure(status, body.clone(), body);
    }

    let (payload, signature) = match envelope::decode(&body, "response") {
        Ok(parts) => parts,
        Err(e) => {
            return ApiResult::failure(status, format!("Malformed response entity: {}", e), body)
        }
    };

    if !signer.verify(&payload, &signature) {
        return ApiResult::failure(status, "Invalid Signature received", body);
    }

    let decoded: Value = match serde_json::from_str(&payload) {
        Ok(value) => value,
        Err(e) => return ApiResult::failure(status, format!("Invalid JSON: {}", e), body),
    };
    let Value::Object(mut object) = decoded else {
        return ApiResult::failure(status, "Invalid JSON: expected an object", body);
    };

    // Extract out any error.
    let mut error_code = None;
    let mut error_message = None;
    if let Some(error) = object.remove("Error") {
        let Value::Object(error) = error else {
            return ApiResult::failure(status, "Invalid Error received", body);
        };
        let code = validate::get_str(&error, "Code");
        let message = validate::opt_str(&error, "Message");
        match (code, message) {
            (Ok(code), Ok(message)) => {
                error_code = Some(code.to_string());
                error_message = message.map(str::to_string);
            }
            (Err(e), _) | (_, Err(e)) => {
                return ApiResult::failure(status, format!("Invalid Error received: {}", e), body)
            }
        }
    }

    ApiResult {
        http_status: status,
        error_code,
        error_message,
        body: Some(object),
        raw_body: Some(body),
    }
}

/// Process a plain JSON reply from an unsigned GET endpoint.
pub(crate) fn process_unsigned(raw: RawResponse) -> ApiResult {
    let RawResponse { status, body } = raw;
    if status != Some(200) {
        return ApiResult::failure(status, body.clone(), body);
    }
    match serde_json::from_str::<Value>(&body) {
        Ok(Value::Object(object)) => ApiResult {
            http_status: status,
            error_code: None,
            error_message: None,
            body: Some(object),
            raw_body: Some(body),
        },
        Ok(_) => ApiResult::failure(status, "Invalid JSON: expected an object", body),
        Err(e) => ApiResult::failure(status, format!("Invalid JSON: {}", e), body),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::kernel::HmacSigner;
    use secrecy::Secret;

    fn signer() -> HmacSigner {
        HmacSigner::new(Secret::new("test-secret".to_string()))
    }

    fn signed_body(payload: &str) -> String {
        let signature = signer().sign(payload);
        let mut entity = url::form_urlencoded::Serializer::new(String::new());
        entity.append_pair("response", payload);
        entity.append_pair("signature", &signature);
        entity.finish()
    }

    #[test]
    fn non_200_status_carries_the_raw_content_as_message() {
        let result = process_signed(&signer(), RawResponse::new(500, "boom"));
        assert_eq!(result.http_status, Some(500));
        assert_eq!(result.error_message.as_deref(), Some("boom"));
        assert!(result.body.is_none());
    }

    #[test]
    fn transport_failure_has_no_status_and_no_body() {
        let result = process_signed(
            &signer(),
            RawResponse::transport_failure("Request failed: connection refused"),
        );
        assert_eq!(result.http_status, None);
        assert!(result.body.is_none());
        assert!(result
            .error_message
            .unwrap()
            .contains("connection refused"));
    }

    #[test]
    fn malformed_envelope_is_reported() {
        let result = process_signed(&signer(), RawResponse::new(200, "not-an-envelope"));
        assert!(result
            .error_message
            .unwrap()
            .starts_with("Malformed response entity:"));
        assert!(result.body.is_none());
    }

    #[test]
    fn signature_mismatch_hides_the_body() {
        let mut entity = url::form_urlencoded::Serializer::new(String::new());
        entity.append_pair("response", r#"{"OrderId":"x"}"#);
        entity.append_pair("signature", "d3Jvbmc=");
        let result = process_signed(&signer(), RawResponse::new(200, entity.finish()));
        assert_eq!(
            result.error_message.as_deref(),
            Some("Invalid Signature received")
        );
        assert!(result.body.is_none());
    }

    #[test]
    fn verified_body_is_decoded() {
        let body = signed_body(r#"{"OrderId":"abc","State":"PaymentAuthorized"}"#);
        let result = process_signed(&signer(), RawResponse::new(200, body));
        assert!(result.is_success());
        let object = result.body.unwrap();
        assert_eq!(object.get("State").unwrap(), "PaymentAuthorized");
    }

    #[test]
    fn invalid_json_with_valid_signature_is_reported() {
        let body = signed_body("{not json");
        let result = process_signed(&signer(), RawResponse::new(200, body));
        assert!(result.error_message.unwrap().starts_with("Invalid JSON:"));
        assert!(result.body.is_none());
    }

    #[test]
    fn error_object_is_extracted_and_removed() {
        let body = signed_body(r#"{"Error":{"Code":"DECLINED","Message":"card declined"}}"#);
        let result = process_signed(&signer(), RawResponse::new(200, body));
        assert_eq!(result.http_status, Some(200));
        assert_eq!(result.error_code.as_deref(), Some("DECLINED"));
        assert_eq!(result.error_message.as_deref(), Some("card declined"));
        assert_eq!(result.body.unwrap().len(), 0);
    }

    #[test]
    fn error_message_is_optional() {
        let body = signed_body(r#"{"Error":{"Code":"DECLINED"}}"#);
        let result = process_signed(&signer(), RawResponse::new(200, body));
        assert_eq!(result.error_code.as_deref(), Some("DECLINED"));
        assert_eq!(result.error_message, None);
    }

    #[test]
    fn non_object_error_is_malformed() {
        let body = signed_body(r#"{"Error":"DECLINED"}"#);
        let result = process_signed(&signer(), RawResponse::new(200, body));
        assert_eq!(result.error_message.as_deref(), Some("Invalid Error received"));
        assert!(result.body.is_none());
    }

    #[test]
    fn error_without_code_is_malformed() {
        let body = signed_body(r#"{"Error":{"Message":"nope"}}"#);
        let result = process_signed(&signer(), RawResponse::new(200, body));
        assert!(result
            .error_message
            .unwrap()
            .starts_with("Invalid Error received:"));
        assert!(result.body.is_none());
    }

    #[test]
    fn unsigned_get_parses_plain_json() {
        let result = process_unsigned(RawResponse::new(200, r#"{"Rates":[]}"#));
        assert!(result.is_success());
        let result = process_unsigned(RawResponse::new(200, "nope"));
        assert!(result.body.is_none());
    }
}
