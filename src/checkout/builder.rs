//! Client construction helpers.

use crate::checkout::client::CheckoutClient;
use crate::core::config::ClientConfig;
use crate::core::errors::CheckoutError;
use crate::core::kernel::{HmacSigner, ReqwestTransport};
use std::sync::Arc;

/// Build a ready-to-use client over the default HTTP transport.
///
/// The outbound User-Agent identifies this library and the configured
/// application, e.g. `crosspay::sdk::rust::CheckoutApi/0.1.0 - shop v2.3`.
pub fn build_client(
    config: ClientConfig,
) -> Result<CheckoutClient<ReqwestTransport>, CheckoutError> {
    let user_agent = format!(
        "crosspay::sdk::rust::CheckoutApi/{} - {}",
        env!("CARGO_PKG_VERSION"),
        config.app_name
    );
    let transport = ReqwestTransport::new(&user_agent)?;
    let signer = Arc::new(HmacSigner::new(config.secret.clone()));
    CheckoutClient::new(config, transport, signer)
}
