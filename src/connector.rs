//! Gateway connector.
//!
//! [`RealexConnector`] ties the pieces together for each call: resolve the operation,
//! build and sign the document, send it through the [`Transport`], then map the response
//! under the operation's accepted-code policy.
//!
//! # Examples
//!
//! ```no_run
//! use realex_rs::{GatewayConfig, RealexConnector};
//! use realex_rs::types::{CreditCardData, PaymentMethod, TransactionDescription, TransactionType};
//! use rust_decimal::Decimal;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = GatewayConfig::new("myMerchantId", "secret").with_account("internet");
//! let connector = RealexConnector::new(config)?;
//!
//! let card = CreditCardData::new("4263970000005262", 12, 2025).with_cvn("123");
//! let sale = TransactionDescription::new(TransactionType::Sale)
//!     .with_payment_method(PaymentMethod::Card(card))
//!     .with_amount(Decimal::new(1999, 2), "EUR");
//!
//! let transaction = connector.process_authorization(&sale).await?;
//! println!("pasref: {:?}", transaction.reference.transaction_id);
//! # Ok(())
//! # }
//! ```

use crate::builders::{authorization, management, recurring};
use crate::config::GatewayConfig;
use crate::errors::{RealexError, Result};
use crate::hosted::serialize_hosted_request;
use crate::mapping::OperationCode;
use crate::response::RawResponse;
use crate::transport::{HttpTransport, Transport};
use crate::types::{RecurringDescription, RecurringEntity, Transaction, TransactionDescription};
use crate::utils::{DefaultIdGenerator, IdGenerator};
use crate::xml::SignedDocument;
use serde::Serialize;

/// Accepted result codes of recurring-profile operations.
const RECURRING_ACCEPTED: &[&str] = &["00"];

/// Connector for one merchant account.
///
/// Holds only read-only configuration, so a single connector can serve concurrent calls.
pub struct RealexConnector<T = HttpTransport, G = DefaultIdGenerator> {
    config: GatewayConfig,
    transport: T,
    ids: G,
}

impl RealexConnector {
    /// Validates the configuration and creates a connector using HTTP transport.
    pub fn new(config: GatewayConfig) -> Result<Self> {
        config.validate()?;
        let transport = HttpTransport::new(&config)?;
        Ok(Self {
            config,
            transport,
            ids: DefaultIdGenerator,
        })
    }
}

impl<T: Transport, G: IdGenerator> RealexConnector<T, G> {
    /// Creates a connector from explicit collaborators.
    pub fn from_parts(config: GatewayConfig, transport: T, ids: G) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            transport,
            ids,
        })
    }

    /// Replaces the transport.
    pub fn with_transport<U: Transport>(self, transport: U) -> RealexConnector<U, G> {
        RealexConnector {
            config: self.config,
            transport,
            ids: self.ids,
        }
    }

    /// Replaces the identifier generator.
    pub fn with_id_generator<H: IdGenerator>(self, ids: H) -> RealexConnector<T, H> {
        RealexConnector {
            config: self.config,
            transport: self.transport,
            ids,
        }
    }

    /// The connector's configuration.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Runs an authorization-family operation (sale, auth, verify, refund, 3-D Secure
    /// enrollment).
    pub async fn process_authorization(&self, desc: &TransactionDescription) -> Result<Transaction> {
        let signed = authorization::build(&self.config, desc, &self.ids)?;
        let order_id = signed.document.orderid.clone();
        let mut transaction = self.exchange(&signed, &order_id).await?;
        transaction.multi_capture = desc.multi_capture;
        Ok(transaction)
    }

    /// Runs a management operation on an existing transaction.
    pub async fn manage_transaction(&self, desc: &TransactionDescription) -> Result<Transaction> {
        let signed = management::build(&self.config, desc, &self.ids)?;
        let order_id = signed.document.orderid.clone();
        self.exchange(&signed, &order_id).await
    }

    /// Creates, edits or deletes a stored payer or card.
    ///
    /// Returns the entity with any generated reference filled in.
    pub async fn process_recurring(&self, desc: &RecurringDescription) -> Result<RecurringEntity> {
        let (signed, entity) = recurring::build(&self.config, desc, &self.ids)?;
        let raw = self.send(&signed, &signed.document.orderid).await?;
        let response = RawResponse::parse(&raw)?;
        self.check(signed.operation, &response, RECURRING_ACCEPTED)?;
        Ok(entity)
    }

    /// Serializes a hosted payment page request for the browser to post.
    pub fn serialize_request(&self, desc: &TransactionDescription) -> Result<String> {
        serialize_hosted_request(&self.config, desc, &self.ids)
    }

    /// Report and query operations are not available through this gateway.
    pub async fn process_report(&self, report_type: &str) -> Result<Transaction> {
        Err(RealexError::UnsupportedOperation(format!(
            "Reporting functionality is not supported through this gateway ({})",
            report_type
        )))
    }

    async fn exchange<D: Serialize>(
        &self,
        signed: &SignedDocument<D>,
        order_id: &str,
    ) -> Result<Transaction> {
        let raw = self.send(signed, order_id).await?;
        let response = RawResponse::parse(&raw)?;
        self.check(signed.operation, &response, signed.operation.accepted_codes())?;
        response.into_transaction()
    }

    async fn send<D: Serialize>(&self, signed: &SignedDocument<D>, order_id: &str) -> Result<String> {
        let body = signed.to_xml()?;
        tracing::debug!(operation = %signed.operation, order_id, "sending gateway request");
        self.transport.send(body).await
    }

    fn check(&self, operation: OperationCode, response: &RawResponse, accepted: &[&str]) -> Result<()> {
        response.check(accepted).map_err(|err| {
            tracing::warn!(
                operation = %operation,
                code = response.code(),
                message = response.message.as_deref().unwrap_or(""),
                "gateway declined request"
            );
            err
        })
    }
}
