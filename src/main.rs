use crosspay::core::config::{ClientConfig, Environment};
use crosspay::{
    build_client, Card, CardExpiry, CheckoutRequest, Consumer, Contact, Item, Shipping,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // Example usage - replace with your actual merchant credentials
    let config = ClientConfig::new(
        "18da9ea3-f9ac-4e64-8405-d301f079a658",
        "your_shared_secret",
        Environment::Sandbox,
        "crosspay-demo v0.1",
    );
    let client = build_client(config)?;

    println!("API endpoint: {}", client.api_url());
    println!("Fingerprint script: {}", client.device_fingerprint_url());

    // Localize a consumer by IP, then see what we could offer them.
    println!("Localizing consumer...");
    match client.localize("8.8.8.8", None, Some(true)).await {
        Ok(result) if result.is_success() => {
            println!("Localize: {:?}", result.body);
        }
        Ok(result) => println!("Localize failed: {:?}", result.error_message),
        Err(e) => println!("Localize rejected before sending: {}", e),
    }

    println!("Fetching rate offers...");
    let rates = client.get_rates().await?;
    if rates.is_success() {
        println!("Rates: {:?}", rates.body);
    }

    println!("Fetching payment methods for DE/EUR...");
    let methods = client.get_payment_methods("DE", "EUR", None).await?;
    if methods.is_success() {
        println!("Payment methods: {:?}", methods.body);
    }

    // A minimal card checkout. The device fingerprint would normally come
    // from the script served at `device_fingerprint_url`, executed in the
    // consumer's browser.
    let request = CheckoutRequest {
        reference_id: Some("demo-order-001".to_string()),
        payment_method: "VISA".to_string(),
        card: Some(Card {
            number: "4111111111111111".to_string(),
            name: "Joe Shopper".to_string(),
            expiry: CardExpiry {
                month: "12".to_string(),
                year: "2030".to_string(),
            },
            verification_code: "737".to_string(),
        }),
        consumer_currency: "EUR".to_string(),
        items: vec![Item {
            sku: "SKU-100".to_string(),
            consumer_price: "25.00".to_string(),
            quantity: "1".to_string(),
            description: Some("A very nice hat".to_string()),
            ..Item::default()
        }],
        consumer: Consumer {
            contact: Contact {
                name: "Joe Shopper".to_string(),
                email: Some("joe@example.com".to_string()),
                phone: Some("+4930123456".to_string()),
                address: "Unter den Linden 1".to_string(),
                city: "Berlin".to_string(),
                postal_code: Some("10117".to_string()),
                country: "DE".to_string(),
                ..Contact::default()
            },
            ip_address: Some("8.8.8.8".to_string()),
            ..Consumer::default()
        },
        consignee: Some(Contact {
            name: "Joe Shopper".to_string(),
            address: "Unter den Linden 1".to_string(),
            city: "Berlin".to_string(),
            postal_code: Some("10117".to_string()),
            country: "DE".to_string(),
            ..Contact::default()
        }),
        shipping: Some(Shipping {
            service: "DHL Standard".to_string(),
            consumer_price: "4.99".to_string(),
            consumer_taxes: "1.95".to_string(),
            consumer_duty: "3.90".to_string(),
            ..Shipping::default()
        }),
        ..CheckoutRequest::default()
    };

    println!("Submitting checkout...");
    match client.checkout(&request).await {
        Ok(result) if result.is_success() => {
            let body = result.body.unwrap();
            println!("Checkout accepted: {:?}", body);

            if let Some(order_id) = body.get("OrderId").and_then(|v| v.as_str()) {
                println!("Capturing order {order_id}...");
                let captured = client.capture(order_id).await?;
                println!("Capture: {:?}", captured);

                println!("Refunding 5.00...");
                let refunded = client.refund(order_id, "5.00", "demo-refund-001").await?;
                println!("Refund: {:?}", refunded);

                let state = client.query(order_id).await?;
                println!("Order state: {:?}", state.body);
            }
        }
        Ok(result) => {
            println!(
                "Checkout failed: {:?} {:?}",
                result.error_code, result.error_message
            );
        }
        Err(e) => println!("Checkout rejected before sending: {}", e),
    }

    let by_reference = client.query_by_reference("demo-order-001").await?;
    println!("Orders for reference: {:?}", by_reference.body);

    // A notification endpoint would pass the received POST body through
    // `client.notification` and reply with the returned status code.
    let status = client.notification("request=%7B%7D&signature=broken", |error, values| {
        if let Some(error) = error {
            println!("Notification rejected: {error}");
        }
        if let Some(values) = values {
            println!("Order {} is now {}", values.order_id, values.order_state);
        }
        200
    });
    println!("Notification reply status: {status}");

    Ok(())
}
