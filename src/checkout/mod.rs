//! The Checkout API surface: request parameter types, payload assembly,
//! signed response and notification processing, and the client itself.

pub mod builder;
pub mod client;
pub(crate) mod notification;
pub mod params;
pub(crate) mod payload;
pub(crate) mod response;

pub use builder::build_client;
pub use client::CheckoutClient;
