use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Ordered collection of named request/response values exchanged with the API.
///
/// Keys are ordered by the serialization format (sorted), not by insertion
/// order, so two logically-equal builds produce identical canonical bytes and
/// therefore identical signatures. Absent fields are never inserted; `false`
/// and the literal string `"0"` are legitimate values and always survive.
pub type FieldMap = serde_json::Map<String, Value>;

/// Outcome of one API interaction.
///
/// An interaction is successful if the HTTP status is 200, there is no error
/// code, and there is a body. When the status is not 200, or the raw body
/// fails to parse or verify, `body` is `None`: an unverified body is never
/// exposed as trusted data.
#[derive(Debug, Clone, Default)]
pub struct ApiResult {
    /// The HTTP status that was returned, or `None` if the request never
    /// completed.
    pub http_status: Option<u16>,
    /// The API error code returned, if any.
    pub error_code: Option<String>,
    /// The API error message, or a description of a protocol failure.
    pub error_message: Option<String>,
    /// The decoded response (with any `Error` object extracted), if the
    /// response was well-formed and its signature verified.
    pub body: Option<FieldMap>,
    /// The raw response entity as received.
    pub raw_body: Option<String>,
}

impl ApiResult {
    pub fn is_success(&self) -> bool {
        self.http_status == Some(200) && self.error_code.is_none() && self.body.is_some()
    }

    pub(crate) fn failure(
        status: Option<u16>,
        message: impl Into<String>,
        raw_body: impl Into<String>,
    ) -> Self {
        Self {
            http_status: status,
            error_code: None,
            error_message: Some(message.into()),
            body: None,
            raw_body: Some(raw_body.into()),
        }
    }
}

/// A validated asynchronous order-state notification pushed by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub order_id: String,
    pub reference_id: Option<String>,
    pub under_review: bool,
    pub order_state: String,
}
