//! Example hosted payment page server.
//!
//! Serves the signed JSON a browser-side HPP library posts to the hosted page.
//!
//! Run with:
//! ```bash
//! cargo run --example hosted_page
//! ```
//!
//! Then fetch `http://localhost:3000/hpp-request`.

use axum::{http::StatusCode, response::IntoResponse, routing::get, Router};
use realex_rs::types::{HostedPaymentData, TransactionDescription, TransactionType};
use realex_rs::{FraudFilterMode, GatewayConfig, HostedPaymentConfig, HppVersion, RealexConnector};
use rust_decimal::Decimal;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let hpp = HostedPaymentConfig::new(HppVersion::V2)
        .with_language("GB")
        .with_response_url("https://www.example.com/response")
        .with_fraud_filter(FraudFilterMode::Passive);
    let config = match GatewayConfig::from_env() {
        Ok(config) => config,
        Err(_) => {
            println!("No REALEX_* configuration found, using sandbox test merchant");
            GatewayConfig::new("heartlandgpsandbox", "secret").with_account("hpp")
        }
    }
    .with_hosted_payment_config(hpp);
    let connector = Arc::new(RealexConnector::new(config)?);

    let app = Router::new().route(
        "/hpp-request",
        get(move || {
            let connector = Arc::clone(&connector);
            async move { hpp_request(&connector) }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
    println!("Hosted page request server on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

fn hpp_request(connector: &RealexConnector) -> impl IntoResponse {
    let data = HostedPaymentData {
        offer_to_save_card: Some(true),
        customer_exists: Some(false),
        preset_payment_methods: vec!["cards".to_string(), "paypal".to_string()],
        ..Default::default()
    };
    let sale = TransactionDescription::new(TransactionType::Sale)
        .with_amount(Decimal::new(1999, 2), "EUR")
        .with_hosted_payment_data(data);

    match connector.serialize_request(&sale) {
        Ok(json) => (StatusCode::OK, json),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}
