//! Notification processing.
//!
//! Notifications are asynchronous, signed pushes reporting an order state
//! change. All failure paths are funneled through the caller's callback, so
//! this processor is total: it always returns exactly one HTTP status and
//! never errors.

use crate::core::kernel::{envelope, Signer};
use crate::core::types::{FieldMap, Notification};
use crate::core::validate;
use crate::core::errors::CheckoutError;
use serde_json::Value;
use tracing::warn;

/// Process a raw notification entity.
///
/// The callback receives either an error message (the notification could not
/// be handled) or the validated values. When values are present, the
/// callback's return value is used as the HTTP status to send back; no
/// response entity is ever required. An invalid status from the callback is
/// reported as a warning and replaced with 500.
pub(crate) fn process<F>(signer: &dyn Signer, entity: &str, callback: F) -> u16
where
    F: FnOnce(Option<&str>, Option<&Notification>) -> u16,
{
    // The entity should be in the form of 'request=<..>&signature=<..>'.
    let (payload, signature) = match envelope::decode(entity, "request") {
        Ok(parts) => parts,
        Err(e) => {
            callback(Some(&format!("Malformed notification: {}", e)), None);
            return 400;
        }
    };

    if !signer.verify(&payload, &signature) {
        callback(Some("Invalid Signature received"), None);
        return 400;
    }

    let object: FieldMap = match serde_json::from_str::<Value>(&payload) {
        Ok(Value::Object(object)) => object,
        Ok(_) => {
            callback(Some("Invalid JSON received: expected an object"), None);
            return 400;
        }
        Err(e) => {
            callback(Some(&format!("Invalid JSON received: {}", e)), None);
            return 400;
        }
    };

    let notification = match parse_schema(&object) {
        Ok(notification) => notification,
        Err(e) => {
            callback(Some(&format!("Invalid notification received: {}", e)), None);
            return 400;
        }
    };

    let code = callback(None, Some(&notification));
    // Nothing below 200, no redirects, nothing above 599.
    if code < 200 || (300..=399).contains(&code) || code > 599 {
        // If we get here, the callback function is broken.
        warn!(code, "invalid HTTP status for notification from callback");
        return 500;
    }
    code
}

fn parse_schema(object: &FieldMap) -> Result<Notification, CheckoutError> {
    Ok(Notification {
        order_id: validate::get_uuid(object, "OrderId")?.to_string(),
        reference_id: validate::opt_str(object, "ReferenceId")?.map(str::to_string),
        under_review: validate::get_bool(object, "UnderReview")?,
        order_state: validate::get_str(object, "OrderState")?.to_string(),
    })
}
