//! Payload builders.
//!
//! Each operation's field map is assembled here by composing the validators
//! in [`crate::core::validate`], in the documented field order, so the first
//! violated constraint is the one reported. Absent values are simply never
//! inserted; `false` and `"0"` are real values and always survive (a
//! truthiness filter would be wrong here).

use crate::checkout::params::{
    Ancillary, AuthorizeRequest, Card, CheckoutRequest, Consumer, Contact, Financing,
    Item, ModifyRequest, Shipping,
};
use crate::core::errors::{CheckoutError, ValueKind};
use crate::core::types::FieldMap;
use crate::core::validate;
use serde_json::Value;

fn put_string(map: &mut FieldMap, key: &str, value: Option<&str>) {
    if let Some(v) = value {
        map.insert(key.to_string(), Value::String(v.to_string()));
    }
}

fn put_bool(map: &mut FieldMap, key: &str, value: Option<bool>) {
    if let Some(v) = value {
        map.insert(key.to_string(), Value::Bool(v));
    }
}

fn put_value(map: &mut FieldMap, key: &str, value: Option<Value>) {
    if let Some(v) = value {
        map.insert(key.to_string(), v);
    }
}

// ---------------------------------------------------------------------------
// GET endpoints
// ---------------------------------------------------------------------------

pub(crate) fn localize(
    merchant_id: &str,
    consumer_ip: &str,
    country: Option<&str>,
    include_rate: Option<bool>,
) -> Result<FieldMap, CheckoutError> {
    validate::public_ip(consumer_ip)?;
    let mut m = FieldMap::new();
    m.insert("MerchantId".to_string(), Value::String(merchant_id.to_string()));
    m.insert(
        "ConsumerIpAddress".to_string(),
        Value::String(consumer_ip.to_string()),
    );
    put_bool(&mut m, "IncludeRate", include_rate);
    put_string(&mut m, "Country", validate::optional(country, validate::country)?);
    Ok(m)
}

pub(crate) fn rates(merchant_id: &str) -> FieldMap {
    let mut m = FieldMap::new();
    m.insert("MerchantId".to_string(), Value::String(merchant_id.to_string()));
    m
}

pub(crate) fn payment_methods(
    merchant_id: &str,
    country: &str,
    currency: &str,
    via_agent: Option<bool>,
) -> Result<FieldMap, CheckoutError> {
    let mut m = rates(merchant_id);
    m.insert(
        "Country".to_string(),
        Value::String(validate::country(country)?.to_string()),
    );
    m.insert(
        "Currency".to_string(),
        Value::String(validate::currency(currency)?.to_string()),
    );
    put_bool(&mut m, "ViaAgent", via_agent);
    Ok(m)
}

// ---------------------------------------------------------------------------
// Complex sub-structures
// ---------------------------------------------------------------------------

/// Line items. There must be at least one.
fn items(items: &[Item]) -> Result<Value, CheckoutError> {
    if items.is_empty() {
        return Err(CheckoutError::invalid("[]", ValueKind::Items));
    }
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        let mut m = FieldMap::new();
        m.insert("Sku".to_string(), Value::String(item.sku.clone()));
        m.insert(
            "ConsumerPrice".to_string(),
            Value::String(validate::decimal(&item.consumer_price)?.to_string()),
        );
        m.insert(
            "Quantity".to_string(),
            Value::String(validate::decimal(&item.quantity)?.to_string()),
        );
        put_string(&mut m, "Description", item.description.as_deref());
        put_string(
            &mut m,
            "ImageUrl",
            validate::optional(item.image_url.as_deref(), validate::url)?,
        );
        out.push(Value::Object(m));
    }
    Ok(Value::Array(out))
}

/// The `ShippingOptions` structure required by the API.
fn shipping(s: &Shipping) -> Result<Value, CheckoutError> {
    let mut breakdown = FieldMap::new();
    breakdown.insert(
        "Price".to_string(),
        Value::String(validate::decimal(&s.consumer_price)?.to_string()),
    );
    breakdown.insert(
        "Taxes".to_string(),
        Value::String(validate::decimal(&s.consumer_taxes)?.to_string()),
    );
    breakdown.insert(
        "Duty".to_string(),
        Value::String(validate::decimal(&s.consumer_duty)?.to_string()),
    );

    let mut m = FieldMap::new();
    put_string(&mut m, "Reference", s.reference.as_deref());
    m.insert("Selected".to_string(), Value::Bool(true));
    m.insert("Service".to_string(), Value::String(s.service.clone()));
    m.insert("ConsumerBreakdown".to_string(), Value::Object(breakdown));
    Ok(Value::Object(m))
}

/// Ancillary charges or discounts.
fn ancillary(list: &[Ancillary]) -> Result<Value, CheckoutError> {
    let mut out = Vec::with_capacity(list.len());
    for entry in list {
        let mut m = FieldMap::new();
        m.insert("Name".to_string(), Value::String(entry.name.clone()));
        m.insert(
            "ConsumerPrice".to_string(),
            Value::String(validate::decimal(&entry.consumer_price)?.to_string()),
        );
        out.push(Value::Object(m));
    }
    Ok(Value::Array(out))
}

fn financing(f: &Financing) -> Result<Value, CheckoutError> {
    let mut m = FieldMap::new();
    m.insert(
        "Instalments".to_string(),
        Value::String(validate::number(&f.instalments)?.to_string()),
    );
    m.insert(
        "ConsumerPrice".to_string(),
        Value::String(validate::decimal(&f.consumer_price)?.to_string()),
    );
    Ok(Value::Object(m))
}

/// Shared contact shape. Email and phone are required under consumer rules
/// and optional under consignee rules.
fn contact(c: &Contact, consumer_rules: bool) -> Result<FieldMap, CheckoutError> {
    let mut m = FieldMap::new();
    m.insert("Name".to_string(), Value::String(c.name.clone()));
    put_string(&mut m, "Company", c.company.as_deref());
    if consumer_rules {
        let email = validate::email(validate::required("Email", c.email.as_deref())?)?;
        m.insert("Email".to_string(), Value::String(email.to_string()));
        let phone = validate::required("Phone", c.phone.as_deref())?;
        m.insert("Phone".to_string(), Value::String(phone.to_string()));
    } else {
        put_string(
            &mut m,
            "Email",
            validate::optional(c.email.as_deref(), validate::email)?,
        );
        put_string(&mut m, "Phone", c.phone.as_deref());
    }
    m.insert("Address".to_string(), Value::String(c.address.clone()));
    m.insert("City".to_string(), Value::String(c.city.clone()));
    put_string(&mut m, "Region", c.region.as_deref());
    put_string(&mut m, "PostalCode", c.postal_code.as_deref());
    m.insert(
        "Country".to_string(),
        Value::String(validate::country(&c.country)?.to_string()),
    );
    Ok(m)
}

fn consumer(c: &Consumer) -> Result<Value, CheckoutError> {
    let mut m = contact(&c.contact, true)?;
    put_string(&mut m, "NationalIdentifier", c.national_identifier.as_deref());
    put_string(
        &mut m,
        "BirthDate",
        validate::optional(c.birth_date.as_deref(), validate::date)?,
    );
    put_string(&mut m, "MerchantProfileId", c.merchant_profile_id.as_deref());
    put_string(
        &mut m,
        "IpAddress",
        validate::optional(c.ip_address.as_deref(), validate::public_ip)?,
    );
    Ok(Value::Object(m))
}

fn consignee(c: Option<&Contact>, null_ok: bool) -> Result<Option<Value>, CheckoutError> {
    match c {
        None if null_ok => Ok(None),
        None => Err(CheckoutError::missing("Consignee")),
        Some(c) => Ok(Some(Value::Object(contact(c, false)?))),
    }
}

/// Validate and serialize card data.
///
/// The result is appended to the transport entity after signing; it is never
/// part of the signed payload, so the card never touches the canonical
/// serialization path.
pub(crate) fn card(card: &Card) -> Result<String, CheckoutError> {
    // The convenience validators echo the value into the error text, which
    // must never happen for the number or verification code.
    if card.number.is_empty() || !card.number.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CheckoutError::invalid_redacted(ValueKind::CardNumber));
    }
    if card.verification_code.is_empty()
        || !card.verification_code.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(CheckoutError::invalid_redacted(ValueKind::VerificationCode));
    }

    let month = validate::number(&card.expiry.month)?;
    if !matches!(month.parse::<u8>(), Ok(1..=12)) {
        return Err(CheckoutError::invalid(month, ValueKind::ExpiryMonth));
    }
    let year = validate::number(&card.expiry.year)?;

    let mut expiry = FieldMap::new();
    expiry.insert("Month".to_string(), Value::String(month.to_string()));
    expiry.insert("Year".to_string(), Value::String(year.to_string()));

    let mut m = FieldMap::new();
    m.insert("Number".to_string(), Value::String(card.number.clone()));
    m.insert("Name".to_string(), Value::String(card.name.clone()));
    m.insert("Expiry".to_string(), Value::Object(expiry));
    m.insert(
        "VerificationCode".to_string(),
        Value::String(card.verification_code.clone()),
    );
    serde_json::to_string(&Value::Object(m))
        .map_err(|e| CheckoutError::Serialization(e.to_string()))
}

// ---------------------------------------------------------------------------
// Signed POST endpoints
// ---------------------------------------------------------------------------

pub(crate) fn checkout(
    merchant_id: &str,
    req: &CheckoutRequest,
) -> Result<(FieldMap, String), CheckoutError> {
    let mut m = FieldMap::new();
    m.insert("MerchantId".to_string(), Value::String(merchant_id.to_string()));
    put_string(&mut m, "ReferenceId", req.reference_id.as_deref());
    put_string(&mut m, "DeviceFingerprint", req.device_fingerprint.as_deref());
    m.insert(
        "PaymentMethod".to_string(),
        Value::String(req.payment_method.clone()),
    );
    put_string(
        &mut m,
        "ConsumerTotal",
        validate::optional(req.consumer_total.as_deref(), validate::decimal)?,
    );
    m.insert(
        "ConsumerCurrency".to_string(),
        Value::String(validate::currency(&req.consumer_currency)?.to_string()),
    );

    let o = &req.options;
    put_string(&mut m, "Country", validate::optional(o.country.as_deref(), validate::country)?);
    put_string(
        &mut m,
        "RateOfferId",
        validate::optional(o.rate_offer_id.as_deref(), validate::uuid)?,
    );
    put_bool(&mut m, "Capture", o.capture);
    put_bool(&mut m, "ViaAgent", o.via_agent);
    put_bool(&mut m, "AcceptLiability", o.accept_liability);
    put_bool(&mut m, "OpenContract", o.open_contract);
    put_string(
        &mut m,
        "ContractId",
        validate::optional(o.contract_id.as_deref(), validate::uuid)?,
    );
    put_string(&mut m, "Store", o.store.as_deref());
    put_string(&mut m, "IssuerId", o.issuer_id.as_deref());
    put_string(&mut m, "Notify", validate::optional(o.notify_url.as_deref(), validate::url)?);
    put_string(&mut m, "Return", validate::optional(o.return_url.as_deref(), validate::url)?);
    put_string(&mut m, "Locale", o.locale.as_deref());

    m.insert("Items".to_string(), items(&req.items)?);

    let shipping_options = req.shipping.as_ref().map(shipping).transpose()?;
    let has_shipping = shipping_options.is_some();
    if let Some(options) = shipping_options {
        m.insert("ShippingRequired".to_string(), Value::Bool(true));
        m.insert("ShippingOptions".to_string(), options);
    }

    if !req.charges.is_empty() {
        m.insert("Charges".to_string(), ancillary(&req.charges)?);
    }
    if !req.discounts.is_empty() {
        m.insert("Discounts".to_string(), ancillary(&req.discounts)?);
    }
    if let Some(f) = &req.financing {
        m.insert("Financing".to_string(), financing(f)?);
    }
    m.insert("Consumer".to_string(), consumer(&req.consumer)?);
    put_value(
        &mut m,
        "Consignee",
        consignee(req.consignee.as_ref(), !has_shipping)?,
    );

    let card_entity = card(validate::required("card", req.card.as_ref())?)?;
    Ok((m, card_entity))
}

pub(crate) fn modify(
    merchant_id: &str,
    req: &ModifyRequest,
) -> Result<FieldMap, CheckoutError> {
    let mut m = FieldMap::new();
    m.insert("MerchantId".to_string(), Value::String(merchant_id.to_string()));
    m.insert(
        "OrderId".to_string(),
        Value::String(validate::uuid(&req.order_id)?.to_string()),
    );
    put_string(
        &mut m,
        "ConsumerTotal",
        validate::optional(req.consumer_total.as_deref(), validate::decimal)?,
    );
    m.insert(
        "ConsumerCurrency".to_string(),
        Value::String(validate::currency(&req.consumer_currency)?.to_string()),
    );

    let o = &req.options;
    put_string(
        &mut m,
        "RateOfferId",
        validate::optional(o.rate_offer_id.as_deref(), validate::uuid)?,
    );
    put_bool(&mut m, "AcceptLiability", o.accept_liability);
    put_string(&mut m, "Locale", o.locale.as_deref());

    m.insert("Items".to_string(), items(&req.items)?);

    let shipping_options = req.shipping.as_ref().map(shipping).transpose()?;
    let has_shipping = shipping_options.is_some();
    if let Some(options) = shipping_options {
        m.insert("ShippingRequired".to_string(), Value::Bool(true));
        m.insert("ShippingOptions".to_string(), options);
    }

    if !req.charges.is_empty() {
        m.insert("Charges".to_string(), ancillary(&req.charges)?);
    }
    if !req.discounts.is_empty() {
        m.insert("Discounts".to_string(), ancillary(&req.discounts)?);
    }
    if let Some(f) = &req.financing {
        m.insert("Financing".to_string(), financing(f)?);
    }
    m.insert("Consumer".to_string(), consumer(&req.consumer)?);
    put_value(
        &mut m,
        "Consignee",
        consignee(req.consignee.as_ref(), !has_shipping)?,
    );
    Ok(m)
}

pub(crate) fn authorize(
    merchant_id: &str,
    req: &AuthorizeRequest,
) -> Result<(FieldMap, Option<String>), CheckoutError> {
    let mut m = FieldMap::new();
    m.insert("MerchantId".to_string(), Value::String(merchant_id.to_string()));
    m.insert(
        "OrderId".to_string(),
        Value::String(validate::uuid(&req.order_id)?.to_string()),
    );
    m.insert(
        "ConsumerIpAddress".to_string(),
        Value::String(validate::public_ip(&req.consumer_ip_address)?.to_string()),
    );
    put_string(&mut m, "PaymentMethod", req.payment_method.as_deref());
    put_string(&mut m, "IssuerId", req.issuer_id.as_deref());
    put_bool(&mut m, "Capture", req.capture);

    let card_entity = req.card.as_ref().map(card).transpose()?;
    Ok((m, card_entity))
}

/// Shared map for capture, cancel and query.
pub(crate) fn order_ref(merchant_id: &str, order_id: &str) -> Result<FieldMap, CheckoutError> {
    let mut m = FieldMap::new();
    m.insert("MerchantId".to_string(), Value::String(merchant_id.to_string()));
    m.insert(
        "OrderId".to_string(),
        Value::String(validate::uuid(order_id)?.to_string()),
    );
    Ok(m)
}

pub(crate) fn refund(
    merchant_id: &str,
    order_id: &str,
    amount: &str,
    reference: &str,
) -> Result<FieldMap, CheckoutError> {
    let mut m = order_ref(merchant_id, order_id)?;
    m.insert(
        "Amount".to_string(),
        Value::String(validate::decimal(amount)?.to_string()),
    );
    m.insert("ReferenceId".to_string(), Value::String(reference.to_string()));
    Ok(m)
}

pub(crate) fn query_by_reference(merchant_id: &str, reference: &str) -> FieldMap {
    let mut m = FieldMap::new();
    m.insert("MerchantId".to_string(), Value::String(merchant_id.to_string()));
    m.insert("ReferenceId".to_string(), Value::String(reference.to_string()));
    m
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkout::params::{CardExpiry, CheckoutOptions};

    const MERCHANT: &str = "18da9ea3-f9ac-4e64-8405-d301f079a658";
    const ORDER: &str = "9a81c8a5-09ab-4ad4-9b64-e73ebf8e236d";

    fn demo_card() -> Card {
        Card {
            number: "4111111111111111".to_string(),
            name: "Joe Shopper".to_string(),
            expiry: CardExpiry {
                month: "12".to_string(),
                year: "2030".to_string(),
            },
            verification_code: "737".to_string(),
        }
    }

    fn demo_consumer() -> Consumer {
        Consumer {
            contact: Contact {
                name: "Joe Shopper".to_string(),
                email: Some("joe.shopper@example.com".to_string()),
                phone: Some("+12345678901".to_string()),
                address: "123 Any Street".to_string(),
                city: "Somewhere".to_string(),
                region: Some("AB".to_string()),
                postal_code: Some("T2T2T2".to_string()),
                country: "CA".to_string(),
                ..Contact::default()
            },
            ip_address: Some("1.2.3.4".to_string()),
            ..Consumer::default()
        }
    }

    fn demo_request() -> CheckoutRequest {
        CheckoutRequest {
            device_fingerprint: Some("1b3957e8-1c8f-4af5-8517-94bc8cda8595".to_string()),
            reference_id: Some("myReference".to_string()),
            payment_method: "VISA".to_string(),
            card: Some(demo_card()),
            consumer_total: Some("100.00".to_string()),
            consumer_currency: "CAD".to_string(),
            items: vec![Item {
                sku: "thing_1".to_string(),
                consumer_price: "50".to_string(),
                quantity: "2".to_string(),
                ..Item::default()
            }],
            consumer: demo_consumer(),
            ..CheckoutRequest::default()
        }
    }

    #[test]
    fn absent_fields_are_pruned_but_false_and_zero_survive() {
        let mut req = demo_request();
        req.options = CheckoutOptions {
            capture: Some(false),
            store: Some("0".to_string()),
            ..CheckoutOptions::default()
        };
        let (m, _) = checkout(MERCHANT, &req).unwrap();

        assert_eq!(m.get("Capture"), Some(&Value::Bool(false)));
        assert_eq!(m.get("Store"), Some(&Value::String("0".to_string())));
        // None of the absent optionals may appear, not even as null.
        for key in ["Country", "RateOfferId", "ViaAgent", "Charges", "Consignee"] {
            assert!(!m.contains_key(key), "{key} should be pruned");
        }
        assert!(!m.values().any(Value::is_null));
    }

    #[test]
    fn card_is_kept_out_of_the_signed_payload() {
        let (m, card_entity) = checkout(MERCHANT, &demo_request()).unwrap();
        let payload = serde_json::to_string(&Value::Object(m)).unwrap();
        assert!(!payload.contains("4111111111111111"));
        assert!(card_entity.contains("4111111111111111"));
        assert!(card_entity.contains("\"VerificationCode\":\"737\""));
    }

    #[test]
    fn checkout_requires_a_card() {
        let mut req = demo_request();
        req.card = None;
        let err = checkout(MERCHANT, &req).unwrap_err();
        assert_eq!(err.to_string(), "Missing Value: card is required");
    }

    #[test]
    fn shipping_present_requires_consignee() {
        let mut req = demo_request();
        req.shipping = Some(Shipping {
            service: "express".to_string(),
            consumer_price: "10.23".to_string(),
            consumer_taxes: "4.56".to_string(),
            consumer_duty: "3.90".to_string(),
            ..Shipping::default()
        });
        let err = checkout(MERCHANT, &req).unwrap_err();
        assert_eq!(err.to_string(), "Missing Value: Consignee is required");

        req.consignee = Some(Contact {
            name: "Joe Shopper".to_string(),
            address: "123 Any Street".to_string(),
            city: "Somewhere".to_string(),
            country: "CA".to_string(),
            ..Contact::default()
        });
        let (m, _) = checkout(MERCHANT, &req).unwrap();
        assert_eq!(m.get("ShippingRequired"), Some(&Value::Bool(true)));
        let options = m.get("ShippingOptions").unwrap().as_object().unwrap();
        assert_eq!(options.get("Selected"), Some(&Value::Bool(true)));
        let breakdown = options.get("ConsumerBreakdown").unwrap().as_object().unwrap();
        assert_eq!(breakdown.get("Price"), Some(&Value::String("10.23".to_string())));
    }

    #[test]
    fn consignee_without_shipping_is_optional_but_included_when_present() {
        let mut req = demo_request();
        req.consignee = Some(Contact {
            name: "Gift Recipient".to_string(),
            address: "9 Other Road".to_string(),
            city: "Elsewhere".to_string(),
            country: "US".to_string(),
            ..Contact::default()
        });
        let (m, _) = checkout(MERCHANT, &req).unwrap();
        assert!(!m.contains_key("ShippingRequired"));
        let consignee = m.get("Consignee").unwrap().as_object().unwrap();
        // Consignee rules: no email or phone required.
        assert!(!consignee.contains_key("Email"));
    }

    #[test]
    fn consumer_requires_email_and_phone() {
        let mut req = demo_request();
        req.consumer.contact.phone = None;
        let err = checkout(MERCHANT, &req).unwrap_err();
        assert_eq!(err.to_string(), "Missing Value: Phone is required");
    }

    #[test]
    fn at_least_one_item_is_required() {
        let mut req = demo_request();
        req.items.clear();
        assert!(checkout(MERCHANT, &req).is_err());
    }

    #[test]
    fn equal_builds_serialize_identically() {
        let (a, _) = checkout(MERCHANT, &demo_request()).unwrap();
        let (b, _) = checkout(MERCHANT, &demo_request()).unwrap();
        assert_eq!(
            serde_json::to_string(&Value::Object(a)).unwrap(),
            serde_json::to_string(&Value::Object(b)).unwrap()
        );
    }

    #[test]
    fn key_order_is_fixed_by_serialization_not_insertion() {
        let mut first = FieldMap::new();
        first.insert("B".to_string(), Value::String("2".to_string()));
        first.insert("A".to_string(), Value::String("1".to_string()));
        let mut second = FieldMap::new();
        second.insert("A".to_string(), Value::String("1".to_string()));
        second.insert("B".to_string(), Value::String("2".to_string()));
        assert_eq!(
            serde_json::to_string(&Value::Object(first)).unwrap(),
            serde_json::to_string(&Value::Object(second)).unwrap()
        );
    }

    fn demo_modify() -> ModifyRequest {
        ModifyRequest {
            order_id: ORDER.to_string(),
            consumer_currency: "CAD".to_string(),
            items: vec![Item {
                sku: "thing_1".to_string(),
                consumer_price: "50".to_string(),
                quantity: "2".to_string(),
                ..Item::default()
            }],
            consumer: demo_consumer(),
            ..ModifyRequest::default()
        }
    }

    #[test]
    fn modify_validates_the_order_id() {
        let mut req = demo_modify();
        req.order_id = "not-a-uuid".to_string();
        let err = modify(MERCHANT, &req).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid Value: [not-a-uuid] is not a valid UUID"
        );

        let m = modify(MERCHANT, &demo_modify()).unwrap();
        assert_eq!(m.get("MerchantId"), Some(&Value::String(MERCHANT.to_string())));
        assert_eq!(m.get("OrderId"), Some(&Value::String(ORDER.to_string())));
        assert!(m.contains_key("Items"));
        assert!(m.contains_key("Consumer"));
    }

    #[test]
    fn authorize_card_is_optional_and_kept_separate() {
        let req = AuthorizeRequest {
            order_id: ORDER.to_string(),
            consumer_ip_address: "1.2.3.4".to_string(),
            capture: Some(false),
            ..AuthorizeRequest::default()
        };
        let (m, card_entity) = authorize(MERCHANT, &req).unwrap();
        assert!(card_entity.is_none());
        assert_eq!(m.get("OrderId"), Some(&Value::String(ORDER.to_string())));
        assert_eq!(m.get("Capture"), Some(&Value::Bool(false)));

        let with_card = AuthorizeRequest {
            card: Some(demo_card()),
            ..req
        };
        let (m, card_entity) = authorize(MERCHANT, &with_card).unwrap();
        assert!(card_entity.unwrap().contains("4111111111111111"));
        let payload = serde_json::to_string(&Value::Object(m)).unwrap();
        assert!(!payload.contains("4111111111111111"));
    }

    #[test]
    fn authorize_requires_a_valid_public_ip() {
        let mut req = AuthorizeRequest {
            order_id: ORDER.to_string(),
            consumer_ip_address: "192.168.1.1".to_string(),
            ..AuthorizeRequest::default()
        };
        assert!(authorize(MERCHANT, &req).is_err());
        req.order_id = "nope".to_string();
        req.consumer_ip_address = "1.2.3.4".to_string();
        assert!(authorize(MERCHANT, &req).is_err());
    }

    #[test]
    fn card_errors_redact_the_number_and_code() {
        let mut bad = demo_card();
        bad.number = "4111 1111".to_string();
        let err = card(&bad).unwrap_err();
        assert!(!err.to_string().contains("4111"));
        assert!(err.to_string().contains("REDACTED"));

        let mut bad = demo_card();
        bad.verification_code = "73x".to_string();
        let err = card(&bad).unwrap_err();
        assert!(!err.to_string().contains("73x"));
    }

    #[test]
    fn card_expiry_month_must_be_in_range() {
        for month in ["0", "13", "99"] {
            let mut bad = demo_card();
            bad.expiry.month = month.to_string();
            assert!(card(&bad).is_err(), "month {month} should be rejected");
        }
        let mut ok = demo_card();
        ok.expiry.month = "01".to_string();
        assert!(card(&ok).is_ok());
    }

    #[test]
    fn financing_is_validated_from_the_supplied_values() {
        let mut req = demo_request();
        req.financing = Some(Financing {
            instalments: "3".to_string(),
            consumer_price: "10.00".to_string(),
        });
        let (m, _) = checkout(MERCHANT, &req).unwrap();
        let financing = m.get("Financing").unwrap().as_object().unwrap();
        assert_eq!(financing.get("Instalments"), Some(&Value::String("3".to_string())));
    }

    #[test]
    fn refund_and_order_maps() {
        let m = refund(MERCHANT, ORDER, "50", "refund1").unwrap();
        assert_eq!(m.get("Amount"), Some(&Value::String("50".to_string())));
        assert_eq!(m.get("ReferenceId"), Some(&Value::String("refund1".to_string())));
        assert!(refund(MERCHANT, "not-a-uuid", "50", "r").is_err());
        assert!(refund(MERCHANT, ORDER, "0.50", "r").is_err());
    }

    #[test]
    fn localize_validates_the_ip() {
        assert!(localize(MERCHANT, "10.0.0.1", None, None).is_err());
        let m = localize(MERCHANT, "1.2.3.4", Some("CA"), Some(false)).unwrap();
        assert_eq!(m.get("IncludeRate"), Some(&Value::Bool(false)));
    }
}
