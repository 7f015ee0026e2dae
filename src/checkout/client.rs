use crate::checkout::params::{AuthorizeRequest, CheckoutRequest, ModifyRequest};
use crate::checkout::{notification, payload, response};
use crate::core::config::{ClientConfig, ConfigError};
use crate::core::errors::CheckoutError;
use crate::core::kernel::envelope::{self, FORM_CONTENT_TYPE};
use crate::core::kernel::{HttpTransport, RawResponse, Signer};
use crate::core::types::{ApiResult, FieldMap, Notification};
use crate::core::validate;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

/// Client for the CrossPay Checkout API.
///
/// Encapsulates the request/response signing protocol: payloads are
/// validated, canonically serialized and HMAC-signed before transmission,
/// and every response or notification is verified against the same shared
/// secret before its body is trusted.
///
/// Every API call returns an [`ApiResult`]. Build-time validation failures
/// ([`CheckoutError::Missing`], [`CheckoutError::InvalidValue`]) are raised
/// as errors before anything is sent; once a request is on the wire, all
/// outcomes are reported through the result value.
///
/// A 503 response is re-sent after a fixed delay, up to the configured
/// attempt count. Note that POSTed operations are not idempotency-protected
/// at this layer: if a first attempt committed on the remote side and its
/// response was lost, a retry may double-submit.
///
/// The client holds no mutable state apart from the verbose flag; calls are
/// self-contained and may be issued concurrently from separate tasks.
pub struct CheckoutClient<T: HttpTransport> {
    config: ClientConfig,
    signer: Arc<dyn Signer>,
    transport: T,
    api_url: String,
    fingerprint_url: String,
}

impl<T: HttpTransport> CheckoutClient<T> {
    /// Create a client from explicit parts. Most callers should use
    /// [`crate::checkout::builder::build_client`] instead.
    pub fn new(
        config: ClientConfig,
        transport: T,
        signer: Arc<dyn Signer>,
    ) -> Result<Self, CheckoutError> {
        validate::uuid(&config.merchant_id).map_err(|_| {
            ConfigError::InvalidConfiguration("merchant ID must be a UUID".to_string())
        })?;
        let api_url = config.api_url();
        let fingerprint_url = config.device_fingerprint_url();
        Ok(Self {
            config,
            signer,
            transport,
            api_url,
            fingerprint_url,
        })
    }

    pub fn merchant_id(&self) -> &str {
        &self.config.merchant_id
    }

    /// The versioned API endpoint URL.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// URL returning the device-fingerprinting script to run in the
    /// consumer's browser.
    pub fn device_fingerprint_url(&self) -> &str {
        &self.fingerprint_url
    }

    /// URL that returns localization information directly to a browser.
    pub fn localize_url(&self) -> String {
        format!(
            "{}localize?MerchantId={}",
            self.api_url, self.config.merchant_id
        )
    }

    /// Toggle debug logging of request and response entities. The only
    /// mutation permitted after construction.
    pub fn set_verbose(&mut self, value: bool) {
        self.config.verbose = value;
    }

    // -----------------------------------------------------------------------
    // Read-only endpoints (GET, unsigned)
    // -----------------------------------------------------------------------

    /// Retrieve localization information for a consumer IP address.
    ///
    /// As this executes somewhere other than the consumer's browser, the
    /// consumer's IP address is required. Alternatively, use
    /// [`Self::localize_url`] and let the browser call the endpoint.
    pub async fn localize(
        &self,
        consumer_ip_address: &str,
        country: Option<&str>,
        include_rate: Option<bool>,
    ) -> Result<ApiResult, CheckoutError> {
        let fields = payload::localize(
            self.merchant_id(),
            consumer_ip_address,
            country,
            include_rate,
        )?;
        Ok(self.get("localize", &fields).await)
    }

    /// Get the current rate offers.
    pub async fn get_rates(&self) -> Result<ApiResult, CheckoutError> {
        let fields = payload::rates(self.merchant_id());
        Ok(self.get("getRates", &fields).await)
    }

    /// Get the payment methods available for a country and currency.
    pub async fn get_payment_methods(
        &self,
        country: &str,
        currency: &str,
        via_agent: Option<bool>,
    ) -> Result<ApiResult, CheckoutError> {
        let fields =
            payload::payment_methods(self.merchant_id(), country, currency, via_agent)?;
        Ok(self.get("getPaymentMethods", &fields).await)
    }

    // -----------------------------------------------------------------------
    // Order lifecycle (POST, signed)
    // -----------------------------------------------------------------------

    /// Submit a checkout request.
    pub async fn checkout(&self, request: &CheckoutRequest) -> Result<ApiResult, CheckoutError> {
        let (fields, card) = payload::checkout(self.merchant_id(), request)?;
        self.post("checkout", fields, Some(card)).await
    }

    /// Modify an existing order.
    pub async fn modify(&self, request: &ModifyRequest) -> Result<ApiResult, CheckoutError> {
        let fields = payload::modify(self.merchant_id(), request)?;
        self.post("modify", fields, None).await
    }

    /// Attempt to authorize payment for an order.
    pub async fn authorize(
        &self,
        request: &AuthorizeRequest,
    ) -> Result<ApiResult, CheckoutError> {
        let (fields, card) = payload::authorize(self.merchant_id(), request)?;
        self.post("authorize", fields, card).await
    }

    /// Capture a previously authorized order.
    pub async fn capture(&self, order_id: &str) -> Result<ApiResult, CheckoutError> {
        let fields = payload::order_ref(self.merchant_id(), order_id)?;
        self.post("capture", fields, None).await
    }

    /// Cancel an authorization.
    pub async fn cancel(&self, order_id: &str) -> Result<ApiResult, CheckoutError> {
        let fields = payload::order_ref(self.merchant_id(), order_id)?;
        self.post("cancel", fields, None).await
    }

    /// Submit a refund. The amount is in the consumer's currency.
    pub async fn refund(
        &self,
        order_id: &str,
        amount: &str,
        reference: &str,
    ) -> Result<ApiResult, CheckoutError> {
        let fields = payload::refund(self.merchant_id(), order_id, amount, reference)?;
        self.post("refund", fields, None).await
    }

    /// Query the state of an order.
    pub async fn query(&self, order_id: &str) -> Result<ApiResult, CheckoutError> {
        let fields = payload::order_ref(self.merchant_id(), order_id)?;
        self.post("query", fields, None).await
    }

    /// Query for any orders associated with a reference.
    pub async fn query_by_reference(
        &self,
        reference: &str,
    ) -> Result<ApiResult, CheckoutError> {
        let fields = payload::query_by_reference(self.merchant_id(), reference);
        self.post("query", fields, None).await
    }

    // -----------------------------------------------------------------------
    // Notifications
    // -----------------------------------------------------------------------

    /// Handle a received notification entity.
    ///
    /// The callback is invoked exactly once, with either an error message or
    /// the validated [`Notification`]. When values are present, the
    /// callback's return value becomes the HTTP status to send back (a
    /// status the service reads as "re-send this notification" when not
    /// 2xx). The returned status is always valid to emit.
    pub fn notification<F>(&self, entity: &str, callback: F) -> u16
    where
        F: FnOnce(Option<&str>, Option<&Notification>) -> u16,
    {
        notification::process(self.signer.as_ref(), entity, callback)
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    /// Issue the request, re-sending on 503 after the configured delay.
    async fn execute(
        &self,
        url: &str,
        entity: Option<&str>,
        content_type: Option<&str>,
    ) -> RawResponse {
        let mut attempt: u32 = 0;
        loop {
            if attempt > 0 {
                tokio::time::sleep(Duration::from_millis(self.config.retry_delay_ms)).await;
            }
            let response = self.transport.send(url, entity, content_type).await;
            attempt += 1;
            // 503 is the only "try again, nothing changed" signal.
            if response.status == Some(503) && attempt < self.config.max_attempts {
                continue;
            }
            return response;
        }
    }

    #[instrument(skip(self, fields), fields(endpoint = %endpoint))]
    async fn get(&self, endpoint: &str, fields: &FieldMap) -> ApiResult {
        let url = format!(
            "{}{}?{}",
            self.api_url,
            endpoint,
            envelope::query_string(fields)
        );
        if self.config.verbose {
            debug!(%url, "sending GET request");
        }
        let raw = self.execute(&url, None, None).await;
        response::process_unsigned(raw)
    }

    #[instrument(skip(self, fields, card), fields(endpoint = %endpoint))]
    async fn post(
        &self,
        endpoint: &str,
        fields: FieldMap,
        card: Option<String>,
    ) -> Result<ApiResult, CheckoutError> {
        let payload = serde_json::to_string(&Value::Object(fields))
            .map_err(|e| CheckoutError::Serialization(e.to_string()))?;
        let signature = self.signer.sign(&payload);
        let entity = envelope::encode_request(&payload, &signature, card.as_deref());

        let url = format!("{}{}", self.api_url, endpoint);
        if self.config.verbose {
            debug!(%url, %payload, "sending POST request");
        }
        let raw = self
            .execute(&url, Some(&entity), Some(FORM_CONTENT_TYPE))
            .await;
        Ok(response::process_signed(self.signer.as_ref(), raw))
    }
}
