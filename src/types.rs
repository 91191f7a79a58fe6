//! Core type definitions for gateway requests and results.
//!
//! A caller describes one payment operation with [`TransactionDescription`] (or
//! [`RecurringDescription`] for stored payer/card maintenance) and gets back a
//! [`Transaction`]. Nothing here is persisted; values live for one call.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of operation the caller is asking for.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionType {
    /// Authorize and settle in one step
    Sale,
    /// Authorize only
    Auth,
    /// Settle a previous authorization
    Capture,
    /// Return funds
    Refund,
    /// Cancel a previous transaction
    Void,
    /// Reverse a previous authorization
    Reversal,
    /// Card / account verification (open-to-buy)
    Verify,
    /// 3-D Secure enrollment check
    VerifyEnrolled,
    /// 3-D Secure signature verification
    VerifySignature,
    /// Hold a transaction from settlement
    Hold,
    /// Release a held transaction
    Release,
    /// Create a stored payer or card
    Create,
    /// Edit a stored payer or card
    Edit,
    /// Delete a stored card
    Delete,
    /// Report / query style operations
    Report,
}

/// Optional modifier that changes how a transaction type is routed.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TransactionModifier {
    /// No modifier
    #[default]
    None,
    /// Offline / manual authorization
    Offline,
    /// Decrypted mobile-wallet token
    EncryptedMobile,
    /// 3-D Secure flow
    Secure3D,
}

/// Payment-method discriminant used by the operation tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentVariant {
    /// Card data entered for this transaction
    Card,
    /// Tokenized mobile wallet
    MobileWallet,
    /// Alternative (redirect) payment method
    Alternative,
    /// Stored payer + card reference
    Recurring,
}

impl fmt::Display for PaymentVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PaymentVariant::Card => "card",
            PaymentVariant::MobileWallet => "mobile wallet",
            PaymentVariant::Alternative => "alternative payment method",
            PaymentVariant::Recurring => "stored payment method",
        };
        f.write_str(name)
    }
}

/// Card verification number presence indicator.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CvnPresenceIndicator {
    /// CVN is present
    #[default]
    Present = 1,
    /// CVN is illegible
    Illegible = 2,
    /// CVN is not on the card
    NotOnCard = 3,
    /// CVN was not requested
    NotRequested = 4,
}

/// 3-D Secure values carried into an authorization.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ThreeDSecureData {
    /// Cardholder authentication verification value
    pub cavv: Option<String>,
    /// 3-D Secure transaction id
    pub xid: Option<String>,
    /// Electronic commerce indicator
    pub eci: Option<String>,
}

/// Card details supplied for this transaction.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct CreditCardData {
    /// Primary account number
    pub number: Option<String>,
    /// Expiry month (1-12)
    pub exp_month: Option<u32>,
    /// Expiry year (two or four digits)
    pub exp_year: Option<u32>,
    /// Card holder name
    pub card_holder_name: Option<String>,
    /// Card scheme; derived from the number when absent
    pub card_type: Option<String>,
    /// Card verification number
    pub cvn: Option<String>,
    /// Whether the CVN was presented
    pub cvn_presence_indicator: CvnPresenceIndicator,
    /// 3-D Secure result to attach as MPI data
    pub three_d_secure: Option<ThreeDSecureData>,
}

impl CreditCardData {
    /// Creates card data from a number and expiry.
    ///
    /// # Examples
    ///
    /// ```
    /// use realex_rs::types::CreditCardData;
    ///
    /// let card = CreditCardData::new("4263970000005262", 12, 2025);
    /// assert_eq!(card.short_expiry().as_deref(), Some("1225"));
    /// ```
    pub fn new(number: impl Into<String>, exp_month: u32, exp_year: u32) -> Self {
        Self {
            number: Some(number.into()),
            exp_month: Some(exp_month),
            exp_year: Some(exp_year),
            ..Default::default()
        }
    }

    /// Sets the card holder name.
    pub fn with_holder(mut self, name: impl Into<String>) -> Self {
        self.card_holder_name = Some(name.into());
        self
    }

    /// Sets the CVN and marks it present.
    pub fn with_cvn(mut self, cvn: impl Into<String>) -> Self {
        self.cvn = Some(cvn.into());
        self.cvn_presence_indicator = CvnPresenceIndicator::Present;
        self
    }

    /// Attaches 3-D Secure data.
    pub fn with_three_d_secure(mut self, data: ThreeDSecureData) -> Self {
        self.three_d_secure = Some(data);
        self
    }

    /// Expiry as `MMYY`, or `None` when month or year is missing.
    pub fn short_expiry(&self) -> Option<String> {
        match (self.exp_month, self.exp_year) {
            (Some(month), Some(year)) => Some(format!("{:02}{:02}", month, year % 100)),
            _ => None,
        }
    }

    /// Card type in upper case, derived from the number prefix when not set.
    pub fn resolved_card_type(&self) -> String {
        if let Some(card_type) = &self.card_type {
            return card_type.to_uppercase();
        }
        self.number
            .as_deref()
            .map(card_type_from_number)
            .unwrap_or("UNKNOWN")
            .to_string()
    }
}

fn card_type_from_number(number: &str) -> &'static str {
    let prefix2: u32 = number.get(..2).and_then(|p| p.parse().ok()).unwrap_or(0);
    let prefix4: u32 = number.get(..4).and_then(|p| p.parse().ok()).unwrap_or(0);
    match prefix2 {
        _ if number.starts_with('4') => "VISA",
        51..=55 | 22..=27 => "MC",
        34 | 37 => "AMEX",
        30 | 36 | 38 => "DINERS",
        35 => "JCB",
        65 => "DISCOVER",
        _ if prefix4 == 6011 => "DISCOVER",
        _ => "UNKNOWN",
    }
}

/// Mobile wallet family.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MobilePaymentMethodType {
    /// Apple Pay
    ApplePay,
    /// Google Pay
    GooglePay,
}

impl MobilePaymentMethodType {
    /// Wire token for the `mobile` element.
    pub fn as_str(&self) -> &'static str {
        match self {
            MobilePaymentMethodType::ApplePay => "apple-pay",
            MobilePaymentMethodType::GooglePay => "pay-with-google",
        }
    }
}

/// Decrypted mobile-wallet token.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct MobileWalletData {
    /// Wallet token
    pub token: Option<String>,
    /// Wallet family
    pub mobile_type: Option<MobilePaymentMethodType>,
}

/// Redirect-based alternative payment method.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct AlternatePaymentMethod {
    /// Method identifier, e.g. `sofort`
    pub method_type: String,
    /// Where the shopper is sent after paying
    pub return_url: Option<String>,
    /// Where the gateway posts status updates
    pub status_update_url: Option<String>,
    /// Account holder name
    pub account_holder_name: Option<String>,
    /// Shopper country
    pub country: Option<String>,
    /// Merchant descriptor shown to the shopper
    pub descriptor: Option<String>,
}

/// Reference to a payer and card stored at the gateway.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct RecurringPaymentMethod {
    /// Stored card reference
    pub key: Option<String>,
    /// Fallback card reference when `key` is absent
    pub id: Option<String>,
    /// Payer reference the card belongs to
    pub customer_key: Option<String>,
    /// Card data, needed to create or update the stored card
    pub payment_method: Option<CreditCardData>,
}

impl RecurringPaymentMethod {
    /// Creates a reference to an existing stored card.
    pub fn new(customer_key: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            id: None,
            customer_key: Some(customer_key.into()),
            payment_method: None,
        }
    }

    /// Card reference: `key`, falling back to `id`.
    pub fn reference(&self) -> Option<&str> {
        self.key.as_deref().or(self.id.as_deref())
    }
}

/// The payment instrument of a transaction.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub enum PaymentMethod {
    /// Card data
    Card(CreditCardData),
    /// Tokenized mobile wallet
    MobileWallet(MobileWalletData),
    /// Alternative payment method
    Alternative(AlternatePaymentMethod),
    /// Stored payer/card reference
    Recurring(RecurringPaymentMethod),
}

impl PaymentMethod {
    /// Discriminant used by the operation tables.
    pub fn variant(&self) -> PaymentVariant {
        match self {
            PaymentMethod::Card(_) => PaymentVariant::Card,
            PaymentMethod::MobileWallet(_) => PaymentVariant::MobileWallet,
            PaymentMethod::Alternative(_) => PaymentVariant::Alternative,
            PaymentMethod::Recurring(_) => PaymentVariant::Recurring,
        }
    }
}

/// Whether an address is used for billing or shipping.
///
/// The role follows from where the address sits in a [`TransactionDescription`].
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressType {
    /// Billing address
    Billing,
    /// Shipping address
    Shipping,
}

/// Postal address.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Address {
    /// First street line
    pub street_address1: Option<String>,
    /// Second street line
    pub street_address2: Option<String>,
    /// Third street line
    pub street_address3: Option<String>,
    /// City
    pub city: Option<String>,
    /// Province / county
    pub province: Option<String>,
    /// Postal code
    pub postal_code: Option<String>,
    /// Country (name or ISO code)
    pub country: Option<String>,
    /// ISO country code
    pub country_code: Option<String>,
}

/// Recurring schedule type.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecurringType {
    /// Fixed schedule
    Fixed,
    /// Variable schedule
    Variable,
}

impl RecurringType {
    /// Wire form.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecurringType::Fixed => "fixed",
            RecurringType::Variable => "variable",
        }
    }
}

/// Position of this payment in a recurring series.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecurringSequence {
    /// First payment
    First,
    /// Subsequent payment
    Subsequent,
    /// Last payment
    Last,
}

impl RecurringSequence {
    /// Wire form.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecurringSequence::First => "first",
            RecurringSequence::Subsequent => "subsequent",
            RecurringSequence::Last => "last",
        }
    }
}

/// Values only used by the hosted payment page.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct HostedPaymentData {
    /// Merchant customer number
    pub customer_number: Option<String>,
    /// Stored payer reference
    pub customer_key: Option<String>,
    /// Stored payment reference
    pub payment_key: Option<String>,
    /// Product id
    pub product_id: Option<String>,
    /// Offer to store the card after payment
    pub offer_to_save_card: Option<bool>,
    /// Payer already exists at the gateway
    pub customer_exists: Option<bool>,
    /// Shopper country
    pub country: Option<String>,
    /// Shopper first name
    pub customer_first_name: Option<String>,
    /// Shopper last name
    pub customer_last_name: Option<String>,
    /// Merchant return URL
    pub return_url: Option<String>,
    /// Status update URL
    pub status_update_url: Option<String>,
    /// Payment methods to offer on the page
    pub preset_payment_methods: Vec<String>,
}

/// Caller-supplied description of one authorization or management operation.
///
/// # Examples
///
/// ```
/// use realex_rs::types::{CreditCardData, PaymentMethod, TransactionDescription, TransactionType};
/// use rust_decimal::Decimal;
///
/// let card = CreditCardData::new("4263970000005262", 12, 2025).with_holder("Jane Doe");
/// let sale = TransactionDescription::new(TransactionType::Sale)
///     .with_payment_method(PaymentMethod::Card(card))
///     .with_amount(Decimal::new(1999, 2), "EUR");
/// assert_eq!(sale.currency.as_deref(), Some("EUR"));
/// ```
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TransactionDescription {
    /// Requested operation
    pub transaction_type: TransactionType,
    /// Payment instrument, if any
    pub payment_method: Option<PaymentMethod>,
    /// Routing modifier
    pub modifier: TransactionModifier,
    /// Amount in major units
    pub amount: Option<Decimal>,
    /// ISO currency code
    pub currency: Option<String>,
    /// Order id; generated when absent
    pub order_id: Option<String>,
    /// Request timestamp; generated when absent
    pub timestamp: Option<String>,
    /// Gateway reference (`pasref`) of an existing transaction
    pub transaction_id: Option<String>,
    /// Authorization code of an existing or offline transaction
    pub authorization_code: Option<String>,
    /// APM type of the original transaction (management refunds)
    pub alternative_payment_type: Option<String>,
    /// Request a multi-capture authorization / capture
    pub multi_capture: bool,
    /// Free-text comment
    pub description: Option<String>,
    /// Billing address
    pub billing_address: Option<Address>,
    /// Shipping address
    pub shipping_address: Option<Address>,
    /// Recurring schedule type
    pub recurring_type: Option<RecurringType>,
    /// Recurring sequence
    pub recurring_sequence: Option<RecurringSequence>,
    /// Ad-hoc CVN for a stored card payment
    pub cvn: Option<String>,
    /// Merchant customer id
    pub customer_id: Option<String>,
    /// Product id
    pub product_id: Option<String>,
    /// Merchant-side transaction reference
    pub client_transaction_id: Option<String>,
    /// Shopper IP address
    pub customer_ip_address: Option<String>,
    /// 3-D Secure PaRes for signature verification
    pub payer_authentication_response: Option<String>,
    /// Reason code for holds and releases
    pub reason_code: Option<String>,
    /// Hosted payment page values
    pub hosted_payment_data: Option<HostedPaymentData>,
}

impl TransactionDescription {
    /// Creates an empty description for the given transaction type.
    pub fn new(transaction_type: TransactionType) -> Self {
        Self {
            transaction_type,
            payment_method: None,
            modifier: TransactionModifier::None,
            amount: None,
            currency: None,
            order_id: None,
            timestamp: None,
            transaction_id: None,
            authorization_code: None,
            alternative_payment_type: None,
            multi_capture: false,
            description: None,
            billing_address: None,
            shipping_address: None,
            recurring_type: None,
            recurring_sequence: None,
            cvn: None,
            customer_id: None,
            product_id: None,
            client_transaction_id: None,
            customer_ip_address: None,
            payer_authentication_response: None,
            reason_code: None,
            hosted_payment_data: None,
        }
    }

    /// Sets the payment instrument.
    pub fn with_payment_method(mut self, payment_method: PaymentMethod) -> Self {
        self.payment_method = Some(payment_method);
        self
    }

    /// Sets the modifier.
    pub fn with_modifier(mut self, modifier: TransactionModifier) -> Self {
        self.modifier = modifier;
        self
    }

    /// Sets amount and currency.
    pub fn with_amount(mut self, amount: Decimal, currency: impl Into<String>) -> Self {
        self.amount = Some(amount);
        self.currency = Some(currency.into());
        self
    }

    /// Sets the order id.
    pub fn with_order_id(mut self, order_id: impl Into<String>) -> Self {
        self.order_id = Some(order_id.into());
        self
    }

    /// Sets the timestamp.
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    /// References an existing transaction.
    pub fn with_transaction_id(mut self, transaction_id: impl Into<String>) -> Self {
        self.transaction_id = Some(transaction_id.into());
        self
    }

    /// Sets the authorization code.
    pub fn with_authorization_code(mut self, code: impl Into<String>) -> Self {
        self.authorization_code = Some(code.into());
        self
    }

    /// Sets the multi-capture flag.
    pub fn with_multi_capture(mut self, multi_capture: bool) -> Self {
        self.multi_capture = multi_capture;
        self
    }

    /// Sets the free-text comment.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the billing address.
    pub fn with_billing_address(mut self, address: Address) -> Self {
        self.billing_address = Some(address);
        self
    }

    /// Sets the shipping address.
    pub fn with_shipping_address(mut self, address: Address) -> Self {
        self.shipping_address = Some(address);
        self
    }

    /// Sets recurring metadata.
    pub fn with_recurring(mut self, kind: RecurringType, sequence: RecurringSequence) -> Self {
        self.recurring_type = Some(kind);
        self.recurring_sequence = Some(sequence);
        self
    }

    /// Sets hosted payment page data.
    pub fn with_hosted_payment_data(mut self, data: HostedPaymentData) -> Self {
        self.hosted_payment_data = Some(data);
        self
    }

    /// Variant of the attached payment method, if any.
    pub fn payment_variant(&self) -> Option<PaymentVariant> {
        self.payment_method.as_ref().map(PaymentMethod::variant)
    }
}

/// Stored payer profile.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Customer {
    /// Payer reference; generated when absent
    pub key: Option<String>,
    /// Title
    pub title: Option<String>,
    /// First name
    pub first_name: Option<String>,
    /// Last name
    pub last_name: Option<String>,
    /// Company
    pub company: Option<String>,
    /// Postal address
    pub address: Option<Address>,
    /// Home phone
    pub home_phone: Option<String>,
    /// Work phone
    pub work_phone: Option<String>,
    /// Fax
    pub fax: Option<String>,
    /// Mobile phone
    pub mobile_phone: Option<String>,
    /// Email
    pub email: Option<String>,
}

/// Entity targeted by a recurring-profile operation.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub enum RecurringEntity {
    /// Payer profile
    Customer(Customer),
    /// Stored card
    PaymentMethod(RecurringPaymentMethod),
}

impl RecurringEntity {
    /// Short name for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            RecurringEntity::Customer(_) => "customer",
            RecurringEntity::PaymentMethod(_) => "stored payment method",
        }
    }
}

/// Caller-supplied description of a recurring-profile operation.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RecurringDescription {
    /// Create, Edit or Delete
    pub transaction_type: TransactionType,
    /// Payer or stored card
    pub entity: RecurringEntity,
    /// Order id; generated when absent
    pub order_id: Option<String>,
    /// Request timestamp; generated when absent
    pub timestamp: Option<String>,
}

impl RecurringDescription {
    /// Creates a recurring-profile description.
    pub fn new(transaction_type: TransactionType, entity: RecurringEntity) -> Self {
        Self {
            transaction_type,
            entity,
            order_id: None,
            timestamp: None,
        }
    }

    /// Sets the timestamp.
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    /// Sets the order id.
    pub fn with_order_id(mut self, order_id: impl Into<String>) -> Self {
        self.order_id = Some(order_id.into());
        self
    }
}

/// Identifiers of a processed transaction, used for follow-up operations.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionReference {
    /// Authorization code
    pub auth_code: Option<String>,
    /// Order id
    pub order_id: Option<String>,
    /// Gateway reference (`pasref`)
    pub transaction_id: Option<String>,
    /// APM type echoed by the gateway
    pub alternative_payment_type: Option<String>,
}

/// 3-D Secure outcome carried on a response.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum ThreeDSecureResult {
    /// Result of an enrollment check
    Enrollment {
        /// Enrollment flag (`Y`, `N`, `U`)
        enrolled: Option<String>,
        /// PaReq to post to the issuer
        payer_authentication_request: Option<String>,
        /// 3-D Secure transaction id
        xid: Option<String>,
        /// Issuer ACS URL
        issuer_acs_url: Option<String>,
    },
    /// Result of signature verification
    Authentication {
        /// Authentication status
        status: Option<String>,
        /// 3-D Secure transaction id
        xid: Option<String>,
        /// Cardholder authentication verification value
        cavv: Option<String>,
        /// Electronic commerce indicator
        eci: Option<i32>,
        /// CAVV algorithm
        algorithm: Option<i32>,
    },
}

/// Normalized gateway result.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Transaction {
    /// Gateway result code
    pub response_code: String,
    /// Gateway result message
    pub response_message: String,
    /// CVN check result
    pub cvn_response_code: Option<String>,
    /// AVS postcode check result
    pub avs_response_code: Option<String>,
    /// Response timestamp
    pub timestamp: Option<String>,
    /// References for follow-up operations
    pub reference: TransactionReference,
    /// 3-D Secure outcome, if the response carried one
    pub three_d_secure: Option<ThreeDSecureResult>,
    /// The authorization was requested as multi-capture
    pub multi_capture: bool,
}
