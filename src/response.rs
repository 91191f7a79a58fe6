//! Gateway response parsing and the accepted-code policy.

use crate::errors::{RealexError, Result};
use crate::types::{ThreeDSecureResult, Transaction, TransactionReference};
use serde::Deserialize;

/// `<response>` document as returned by the XML API.
///
/// Elements this crate does not use (tss checks, card issuer, ...) are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawResponse {
    /// Response timestamp
    #[serde(rename = "@timestamp")]
    pub timestamp: Option<String>,
    /// Result code
    pub result: Option<String>,
    /// Result message
    pub message: Option<String>,
    /// CVN check result
    pub cvnresult: Option<String>,
    /// AVS postcode check result
    pub avspostcoderesponse: Option<String>,
    /// Authorization code
    pub authcode: Option<String>,
    /// Merchant order id
    pub orderid: Option<String>,
    /// Gateway transaction reference
    pub pasref: Option<String>,
    /// Alternative payment method type
    pub paymentmethod: Option<String>,
    /// 3-D Secure enrollment flag
    pub enrolled: Option<String>,
    /// Payer authentication request
    pub pareq: Option<String>,
    /// 3-D Secure transaction id
    pub xid: Option<String>,
    /// Issuer ACS or provider redirect URL
    pub url: Option<String>,
    /// Signature verification outcome
    pub threedsecure: Option<RawThreeDSecure>,
}

/// Post-authentication block of a signature verification.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawThreeDSecure {
    /// Authentication status
    pub status: Option<String>,
    /// 3-D Secure transaction id
    pub xid: Option<String>,
    /// Cardholder authentication verification value
    pub cavv: Option<String>,
    /// Electronic commerce indicator
    pub eci: Option<String>,
    /// CAVV algorithm
    pub algorithm: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl RawResponse {
    /// Parses the raw response text.
    pub fn parse(raw: &str) -> Result<Self> {
        Ok(quick_xml::de::from_str(raw)?)
    }

    /// Result code, empty when the element is missing.
    pub fn code(&self) -> &str {
        self.result.as_deref().unwrap_or("")
    }

    /// Fails with [`RealexError::Gateway`] unless the result code is accepted.
    pub fn check(&self, accepted: &[&str]) -> Result<()> {
        let code = self.code();
        if accepted.contains(&code) {
            Ok(())
        } else {
            Err(RealexError::Gateway {
                code: code.to_string(),
                message: self.message.clone().unwrap_or_default(),
            })
        }
    }

    /// Converts the parsed document into a [`Transaction`].
    ///
    /// A `threedsecure` block wins over enrollment fields when both are present.
    pub fn into_transaction(self) -> Result<Transaction> {
        let three_d_secure = match self.threedsecure {
            Some(block) => Some(ThreeDSecureResult::Authentication {
                status: non_empty(block.status),
                xid: non_empty(block.xid),
                cavv: non_empty(block.cavv),
                eci: parse_optional_int("eci", block.eci)?,
                algorithm: parse_optional_int("algorithm", block.algorithm)?,
            }),
            None if self.enrolled.is_some() => Some(ThreeDSecureResult::Enrollment {
                enrolled: non_empty(self.enrolled),
                payer_authentication_request: non_empty(self.pareq),
                xid: non_empty(self.xid),
                issuer_acs_url: non_empty(self.url),
            }),
            None => None,
        };

        Ok(Transaction {
            response_code: self.result.unwrap_or_default(),
            response_message: self.message.unwrap_or_default(),
            cvn_response_code: non_empty(self.cvnresult),
            avs_response_code: non_empty(self.avspostcoderesponse),
            timestamp: non_empty(self.timestamp),
            reference: TransactionReference {
                auth_code: non_empty(self.authcode),
                order_id: non_empty(self.orderid),
                transaction_id: non_empty(self.pasref),
                alternative_payment_type: non_empty(self.paymentmethod),
            },
            three_d_secure,
            multi_capture: false,
        })
    }
}

fn parse_optional_int(name: &str, value: Option<String>) -> Result<Option<i32>> {
    match non_empty(value) {
        Some(text) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| RealexError::ResponseParse(format!("{} is not an integer: {}", name, text))),
        None => Ok(None),
    }
}

/// Parses a raw response, applies the accepted-code policy and normalizes it.
///
/// # Examples
///
/// ```
/// use realex_rs::response::map_response;
///
/// let raw = "<response timestamp=\"20180613141207\"><result>00</result>\
///            <message>AUTHORISED</message><pasref>14610544313177922</pasref></response>";
/// let transaction = map_response(raw, &["00"]).unwrap();
/// assert_eq!(transaction.reference.transaction_id.as_deref(), Some("14610544313177922"));
/// assert!(transaction.three_d_secure.is_none());
/// ```
pub fn map_response(raw: &str, accepted: &[&str]) -> Result<Transaction> {
    let response = RawResponse::parse(raw)?;
    response.check(accepted)?;
    response.into_transaction()
}
