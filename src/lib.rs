//! # realex-rs
//!
//! Request encoding, signing and response mapping for the Realex (Global Payments) XML
//! payment gateway.
//!
//! A call describes one payment operation, the crate picks the gateway operation code,
//! builds the XML request, signs an exact ordered list of fields with the merchant's
//! shared secret, sends it through a [`transport::Transport`] and maps the `<response>`
//! back into a [`types::Transaction`].
//!
//! ## Features
//!
//! - **Authorizations**: card, Apple Pay / Google Pay tokens, alternative payment methods
//!   and stored cards; sale, auth, verify, refund, offline and 3-D Secure enrollment
//! - **Management**: settle, multi-settle, void, rebate, hold, release, signature checks
//! - **Recurring profiles**: stored payers and stored cards
//! - **Hosted payment page**: signed JSON requests, base64 encoded for version 1
//! - **Pluggable transport**: a `reqwest` transport, or any [`transport::Transport`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use realex_rs::{GatewayConfig, RealexConnector};
//! use realex_rs::types::{CreditCardData, PaymentMethod, TransactionDescription, TransactionType};
//! use rust_decimal::Decimal;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = GatewayConfig::new("myMerchantId", "secret")
//!     .with_account("internet")
//!     .with_refund_password("refund");
//! let connector = RealexConnector::new(config)?;
//!
//! let card = CreditCardData::new("4263970000005262", 12, 2025)
//!     .with_holder("James Mason")
//!     .with_cvn("123");
//! let sale = TransactionDescription::new(TransactionType::Sale)
//!     .with_payment_method(PaymentMethod::Card(card))
//!     .with_amount(Decimal::new(1999, 2), "EUR");
//!
//! let transaction = connector.process_authorization(&sale).await?;
//! println!("{} {}", transaction.response_code, transaction.response_message);
//! # Ok(())
//! # }
//! ```
//!
//! ## Signatures
//!
//! Every request carries `sha1hash = sha1(sha1(f1.f2...fn).secret)`. The fields and their
//! order depend on the operation; an absent field still takes its position as an empty
//! string. Refunds and rebates add an independent `refundhash = sha1(password)`.
//!
//! ## Response codes
//!
//! `00` is success. 3-D Secure enrollment and signature checks also accept `110`, and
//! `payment-set` accepts only `01` (redirect pending). Any other code is returned as
//! [`RealexError::Gateway`].

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod builders;
pub mod config;
pub mod connector;
pub mod errors;
pub mod hashing;
pub mod hosted;
pub mod mapping;
pub mod response;
pub mod transport;
pub mod types;
pub mod utils;
pub mod xml;

// Re-export commonly used items
pub use config::{FraudFilterMode, GatewayConfig, HostedPaymentConfig, HppVersion};
pub use connector::RealexConnector;
pub use errors::{RealexError, Result};
pub use mapping::OperationCode;
pub use types::{
    PaymentMethod, RecurringDescription, RecurringEntity, Transaction, TransactionDescription,
    TransactionModifier, TransactionType,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_accessibility() {
        let config = GatewayConfig::new("merchant", "secret");
        assert!(config.validate().is_ok());
        assert!(RealexConnector::new(config).is_ok());
        assert_eq!(OperationCode::PaymentSet.accepted_codes(), &["01"]);
    }
}
