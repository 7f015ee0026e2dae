//! Rust client for the CrossPay Checkout API.
//!
//! Every request payload is validated locally, serialized canonically and
//! HMAC-SHA256 signed with the merchant's shared secret; every signed
//! response and notification is verified against the same secret before its
//! contents are trusted. Card data is validated and transmitted alongside the
//! payload but never enters the signed payload, error messages or logs.
//!
//! # Quick start
//!
//! ```no_run
//! use crosspay::{build_client, ClientConfig, Environment};
//!
//! # async fn run() -> Result<(), crosspay::CheckoutError> {
//! let config = ClientConfig::new(
//!     "18da9ea3-f9ac-4e64-8405-d301f079a658",
//!     "my-shared-secret",
//!     Environment::Sandbox,
//!     "my-shop v1.0",
//! );
//! let client = build_client(config)?;
//! let rates = client.get_rates().await?;
//! if rates.is_success() {
//!     println!("{:?}", rates.body);
//! }
//! # Ok(())
//! # }
//! ```

pub mod checkout;
pub mod core;

pub use checkout::builder::build_client;
pub use checkout::client::CheckoutClient;
pub use checkout::params::{
    Ancillary, AuthorizeRequest, Card, CardExpiry, CheckoutOptions, CheckoutRequest, Consumer,
    Contact, Financing, Item, ModifyOptions, ModifyRequest, Shipping,
};
pub use core::config::{ClientConfig, ConfigError, Environment, API_REVISION};
pub use core::errors::CheckoutError;
pub use core::kernel::{HmacSigner, HttpTransport, RawResponse, ReqwestTransport, Signer};
pub use core::types::{ApiResult, FieldMap, Notification};
