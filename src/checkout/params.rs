//! Parameter shapes for the checkout operations.
//!
//! These are boundary data definitions: the payload builder validates each
//! field and assembles the wire form. All numeric and decimal values are
//! strings so exact money precision survives the round trip. All data must
//! be UTF-8.

use std::fmt;

/// A line item in a checkout or modify request.
#[derive(Debug, Clone, Default)]
pub struct Item {
    pub sku: String,
    /// Price in the consumer's currency, e.g. `"123.45"`.
    pub consumer_price: String,
    pub quantity: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

/// The selected shipping service and its consumer-priced breakdown.
#[derive(Debug, Clone, Default)]
pub struct Shipping {
    pub reference: Option<String>,
    pub service: String,
    pub consumer_price: String,
    pub consumer_taxes: String,
    pub consumer_duty: String,
}

/// An ancillary charge or discount.
#[derive(Debug, Clone, Default)]
pub struct Ancillary {
    pub name: String,
    pub consumer_price: String,
}

/// Instalment financing details.
#[derive(Debug, Clone, Default)]
pub struct Financing {
    pub instalments: String,
    pub consumer_price: String,
}

/// Contact details shared by the consumer and the consignee.
///
/// Email and phone are required for a consumer and optional for a consignee;
/// the payload builder enforces the difference.
#[derive(Debug, Clone, Default)]
pub struct Contact {
    pub name: String,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: String,
    pub city: String,
    pub region: Option<String>,
    pub postal_code: Option<String>,
    pub country: String,
}

/// The paying consumer.
#[derive(Debug, Clone, Default)]
pub struct Consumer {
    pub contact: Contact,
    pub national_identifier: Option<String>,
    /// `YYYY-MM-DD`.
    pub birth_date: Option<String>,
    pub merchant_profile_id: Option<String>,
    pub ip_address: Option<String>,
}

/// Card expiry. Month must be 1-12.
#[derive(Clone)]
pub struct CardExpiry {
    pub month: String,
    pub year: String,
}

/// Card details for a payment attempt.
///
/// Card data is validated and serialized separately from the signed payload
/// and appended to the transport entity after signing. The number and
/// verification code never appear in error messages or logs.
#[derive(Clone)]
pub struct Card {
    pub number: String,
    pub name: String,
    pub expiry: CardExpiry,
    pub verification_code: String,
}

impl fmt::Debug for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Card")
            .field("number", &"[REDACTED]")
            .field("name", &self.name)
            .field("expiry", &self.expiry)
            .field("verification_code", &"[REDACTED]")
            .finish()
    }
}

impl fmt::Debug for CardExpiry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardExpiry")
            .field("month", &self.month)
            .field("year", &self.year)
            .finish()
    }
}

/// Optional checkout parameters.
#[derive(Debug, Clone, Default)]
pub struct CheckoutOptions {
    pub country: Option<String>,
    pub rate_offer_id: Option<String>,
    pub capture: Option<bool>,
    pub via_agent: Option<bool>,
    pub accept_liability: Option<bool>,
    pub open_contract: Option<bool>,
    pub contract_id: Option<String>,
    pub store: Option<String>,
    pub issuer_id: Option<String>,
    pub notify_url: Option<String>,
    pub return_url: Option<String>,
    pub locale: Option<String>,
}

/// Optional modify parameters.
#[derive(Debug, Clone, Default)]
pub struct ModifyOptions {
    pub rate_offer_id: Option<String>,
    pub accept_liability: Option<bool>,
    pub locale: Option<String>,
}

/// A checkout submission.
///
/// Shipping is optional; when present, a full consignee contact is required.
/// When absent, the consignee is optional and - if present - is treated as
/// the ship-to contact for non-shipped digital goods.
#[derive(Debug, Clone, Default)]
pub struct CheckoutRequest {
    /// Device fingerprint determined in the consumer's browser. See the API
    /// documentation; this library does not fetch fingerprints itself.
    pub device_fingerprint: Option<String>,
    pub reference_id: Option<String>,
    pub payment_method: String,
    pub card: Option<Card>,
    pub consumer_total: Option<String>,
    pub consumer_currency: String,
    pub items: Vec<Item>,
    pub consumer: Consumer,
    pub consignee: Option<Contact>,
    pub shipping: Option<Shipping>,
    pub charges: Vec<Ancillary>,
    pub discounts: Vec<Ancillary>,
    pub financing: Option<Financing>,
    pub options: CheckoutOptions,
}

/// A modify submission for an existing order.
#[derive(Debug, Clone, Default)]
pub struct ModifyRequest {
    pub order_id: String,
    pub consumer_total: Option<String>,
    pub consumer_currency: String,
    pub items: Vec<Item>,
    pub consumer: Consumer,
    pub consignee: Option<Contact>,
    pub shipping: Option<Shipping>,
    pub charges: Vec<Ancillary>,
    pub discounts: Vec<Ancillary>,
    pub financing: Option<Financing>,
    pub options: ModifyOptions,
}

/// A payment authorization attempt for an existing order.
#[derive(Debug, Clone, Default)]
pub struct AuthorizeRequest {
    pub order_id: String,
    pub consumer_ip_address: String,
    pub card: Option<Card>,
    pub capture: Option<bool>,
    pub payment_method: Option<String>,
    pub issuer_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_debug_redacts_sensitive_fields() {
        let card = Card {
            number: "4111111111111111".to_string(),
            name: "Joe Shopper".to_string(),
            expiry: CardExpiry {
                month: "12".to_string(),
                year: "2030".to_string(),
            },
            verification_code: "737".to_string(),
        };
        let debug = format!("{card:?}");
        assert!(!debug.contains("4111111111111111"));
        assert!(!debug.contains("737"));
        assert!(debug.contains("[REDACTED]"));
    }
}
