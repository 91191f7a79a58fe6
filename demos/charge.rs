//! Example card charge against the sandbox.
//!
//! Runs a sale, then refunds part of it through a rebate.
//!
//! Run with:
//! ```bash
//! cargo run --example charge
//! ```
//!
//! Environment variables (a `.env` file is read first):
//! - REALEX_MERCHANT_ID: Merchant id
//! - REALEX_SHARED_SECRET: Shared secret
//! - REALEX_ACCOUNT_ID: Sub-account (optional)
//! - REALEX_REBATE_PASSWORD: Rebate password (optional)
//! - REALEX_SERVICE_URL: Endpoint, defaults to the sandbox

use anyhow::Context;
use realex_rs::types::{CreditCardData, PaymentMethod, TransactionDescription, TransactionType};
use realex_rs::{GatewayConfig, RealexConnector, RealexError};
use rust_decimal::Decimal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = GatewayConfig::from_env().context("loading REALEX_* configuration")?;
    println!("Realex charge example");
    println!("   Merchant: {}", config.merchant_id);
    println!("   Endpoint: {}", config.service_url);
    println!();

    let connector = RealexConnector::new(config)?;

    let card = CreditCardData::new("4263970000005262", 12, 2030)
        .with_holder("James Mason")
        .with_cvn("131");
    let sale = TransactionDescription::new(TransactionType::Sale)
        .with_payment_method(PaymentMethod::Card(card))
        .with_amount(Decimal::new(1999, 2), "EUR")
        .with_description("realex-rs charge example");

    let transaction = match connector.process_authorization(&sale).await {
        Ok(transaction) => transaction,
        Err(RealexError::Gateway { code, message }) => {
            println!("Declined: {} - {}", code, message);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    println!(
        "Charged: {} {} (pasref {:?})",
        transaction.response_code,
        transaction.response_message,
        transaction.reference.transaction_id
    );

    let reference = transaction.reference;
    let rebate = TransactionDescription::new(TransactionType::Refund)
        .with_transaction_id(reference.transaction_id.unwrap_or_default())
        .with_order_id(reference.order_id.unwrap_or_default())
        .with_authorization_code(reference.auth_code.unwrap_or_default())
        .with_amount(Decimal::new(500, 2), "EUR");

    let refunded = connector.manage_transaction(&rebate).await?;
    println!("Rebated: {} {}", refunded.response_code, refunded.response_message);

    Ok(())
}
