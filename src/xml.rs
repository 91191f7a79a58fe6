//! Request documents of the XML API.
//!
//! Elements are written in field order, absent optional elements are skipped, and
//! attributes use the `@name` / `$text` serde conventions of `quick-xml`.

use crate::errors::{RealexError, Result};
use crate::mapping::OperationCode;
use serde::Serialize;

/// A request document together with the operation it performs.
///
/// Built once per exchange and never reused.
#[derive(Debug, Clone)]
pub struct SignedDocument<D> {
    /// Resolved operation; also selects the accepted response codes
    pub operation: OperationCode,
    /// Fully populated, signed request
    pub document: D,
}

impl<D: Serialize> SignedDocument<D> {
    /// Serializes the document to its XML wire form.
    pub fn to_xml(&self) -> Result<String> {
        quick_xml::se::to_string(&self.document)
            .map_err(|e| RealexError::Serialization(e.to_string()))
    }
}

/// `<amount currency="EUR">1000</amount>`
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AmountElement {
    /// Currency attribute; omitted for multi-capture settles
    #[serde(rename = "@currency", skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// Minor units
    #[serde(rename = "$text")]
    pub value: String,
}

/// `<autosettle flag="1"/>`
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AutoSettle {
    /// `1`, `0` or `MULTI`
    #[serde(rename = "@flag")]
    pub flag: &'static str,
}

/// Card verification number block.
#[derive(Debug, Clone, Serialize)]
pub struct CvnElement {
    /// CVN digits
    pub number: String,
    /// Presence indicator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presind: Option<u8>,
}

/// Card block, used by authorizations and stored-card maintenance.
#[derive(Debug, Clone, Serialize, Default)]
pub struct CardElement {
    /// Stored card reference
    #[serde(rename = "ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Payer reference
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payerref: Option<String>,
    /// Card number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    /// Expiry `MMYY`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expdate: Option<String>,
    /// Card holder name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chname: Option<String>,
    /// Card type
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub card_type: Option<String>,
    /// CVN block
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cvn: Option<CvnElement>,
}

/// 3-D Secure data of an authorization.
#[derive(Debug, Clone, Serialize)]
pub struct MpiElement {
    /// Cardholder authentication verification value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cavv: Option<String>,
    /// 3-D Secure transaction id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xid: Option<String>,
    /// Electronic commerce indicator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eci: Option<String>,
}

/// Redirect details of an alternative payment method.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentMethodDetails {
    /// Where the shopper returns after paying
    pub returnurl: String,
    /// Where the provider posts status updates
    pub statusupdateurl: String,
    /// Statement descriptor
    pub descriptor: String,
    /// Shopper country
    pub country: String,
    /// Account holder name
    pub accountholdername: String,
}

/// Ad-hoc CVN for a stored card payment.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentData {
    /// CVN block
    pub cvn: CvnElement,
}

/// `<comment id="1">text</comment>`
#[derive(Debug, Clone, Serialize)]
pub struct CommentElement {
    /// Comment slot
    #[serde(rename = "@id")]
    pub id: u8,
    /// Comment text
    #[serde(rename = "$text")]
    pub text: String,
}

/// Comment list; only one comment slot is written.
#[derive(Debug, Clone, Serialize)]
pub struct Comments {
    /// First comment slot
    pub comment: CommentElement,
}

impl Comments {
    /// Wraps a single free-text comment.
    pub fn single(text: &str) -> Self {
        Self {
            comment: CommentElement {
                id: 1,
                text: text.to_string(),
            },
        }
    }
}

/// `<recurring type="fixed" sequence="first"/>`
#[derive(Debug, Clone, Serialize)]
pub struct RecurringElement {
    /// `fixed` or `variable`
    #[serde(rename = "@type")]
    pub recurring_type: String,
    /// `first`, `subsequent` or `last`
    #[serde(rename = "@sequence")]
    pub sequence: String,
}

/// Address block inside `tssinfo`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AddressElement {
    /// `billing` or `shipping`
    #[serde(rename = "@type")]
    pub address_type: &'static str,
    /// Composite postal code
    pub code: String,
    /// Country code
    pub country: String,
}

/// Transaction stability information.
#[derive(Debug, Clone, Serialize, Default)]
pub struct TssInfo {
    /// Customer number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custnum: Option<String>,
    /// Product id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prodid: Option<String>,
    /// Variable reference
    #[serde(skip_serializing_if = "Option::is_none")]
    pub varref: Option<String>,
    /// Customer IP address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custipaddress: Option<String>,
    /// Billing and shipping addresses
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub address: Vec<AddressElement>,
}

/// `<country code="IE">Ireland</country>`
#[derive(Debug, Clone, Serialize)]
pub struct CountryElement {
    /// ISO country code
    #[serde(rename = "@code", skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Country name
    #[serde(rename = "$text")]
    pub name: String,
}

/// Payer postal address.
#[derive(Debug, Clone, Serialize, Default)]
pub struct PayerAddress {
    /// First street line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line1: Option<String>,
    /// Second street line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    /// Third street line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line3: Option<String>,
    /// City
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// County
    #[serde(skip_serializing_if = "Option::is_none")]
    pub county: Option<String>,
    /// Postal code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postcode: Option<String>,
    /// Country
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<CountryElement>,
}

/// Payer phone numbers.
#[derive(Debug, Clone, Serialize, Default)]
pub struct PhoneNumbers {
    /// Home phone
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home: Option<String>,
    /// Work phone
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work: Option<String>,
    /// Fax
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fax: Option<String>,
    /// Mobile phone
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
}

/// Stored payer profile.
#[derive(Debug, Clone, Serialize)]
pub struct PayerElement {
    /// Payer reference
    #[serde(rename = "@ref")]
    pub reference: String,
    /// Payer type attribute
    #[serde(rename = "@type")]
    pub payer_type: &'static str,
    /// Title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// First name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firstname: Option<String>,
    /// Last name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
    /// Company
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    /// Postal address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<PayerAddress>,
    /// Phone numbers
    pub phonenumbers: PhoneNumbers,
    /// Email address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Authorization-family request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename = "request")]
pub struct AuthorizationDocument {
    /// Request timestamp (`yyyyMMddHHmmss`)
    #[serde(rename = "@timestamp")]
    pub timestamp: String,
    /// Gateway operation code
    #[serde(rename = "@type")]
    pub request_type: &'static str,
    /// Merchant id
    pub merchantid: String,
    /// Sub-account
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    /// Channel, e.g. `ECOM`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    /// Amount in minor units
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<AmountElement>,
    /// Settlement flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autosettle: Option<AutoSettle>,
    /// Merchant order id
    pub orderid: String,
    /// Gateway reference of the authorization being settled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pasref: Option<String>,
    /// Authorization code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authcode: Option<String>,
    /// Wallet type, e.g. `apple-pay`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    /// Wallet payment token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Card data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<CardElement>,
    /// 3-D Secure authentication data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mpi: Option<MpiElement>,
    /// Stored payer reference
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payerref: Option<String>,
    /// Payment method or stored card reference
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paymentmethod: Option<String>,
    /// Alternative payment redirect details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paymentmethoddetails: Option<PaymentMethodDetails>,
    /// CVN for a stored card payment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paymentdata: Option<PaymentData>,
    /// Request signature
    pub sha1hash: String,
    /// SHA-1 of the refund or rebate password
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refundhash: Option<String>,
    /// Free-text comment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<Comments>,
    /// Recurring sequence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurring: Option<RecurringElement>,
    /// Fraud screening data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tssinfo: Option<TssInfo>,
}

/// Management-family request: a follow-up on an existing transaction.
#[derive(Debug, Clone, Serialize)]
#[serde(rename = "request")]
pub struct ManagementDocument {
    /// Request timestamp (`yyyyMMddHHmmss`)
    #[serde(rename = "@timestamp")]
    pub timestamp: String,
    /// Gateway operation code
    #[serde(rename = "@type")]
    pub request_type: &'static str,
    /// Merchant id
    pub merchantid: String,
    /// Sub-account
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    /// Channel, e.g. `ECOM`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    /// Merchant order id
    pub orderid: String,
    /// Gateway reference of the original transaction
    pub pasref: String,
    /// Amount in minor units
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<AmountElement>,
    /// Authorization code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authcode: Option<String>,
    /// Alternative payment method type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paymentmethod: Option<String>,
    /// Payer authentication response
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pares: Option<String>,
    /// Hold or release reason
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoncode: Option<String>,
    /// Free-text comment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<Comments>,
    /// Request signature
    pub sha1hash: String,
    /// SHA-1 of the refund or rebate password
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refundhash: Option<String>,
}

/// Recurring-profile request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename = "request")]
pub struct RecurringDocument {
    /// Gateway operation code
    #[serde(rename = "@type")]
    pub request_type: &'static str,
    /// Request timestamp (`yyyyMMddHHmmss`)
    #[serde(rename = "@timestamp")]
    pub timestamp: String,
    /// Merchant id
    pub merchantid: String,
    /// Sub-account
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    /// Merchant order id
    pub orderid: String,
    /// Payer profile
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payer: Option<PayerElement>,
    /// Stored card
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<CardElement>,
    /// Request signature
    pub sha1hash: String,
}
