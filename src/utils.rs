//! Utility functions shared by the request builders.
//!
//! Amount formatting and the identifier-generation collaborator live here.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::errors::{RealexError, Result};

/// Formats an amount in minor units, the way the gateway expects it on the wire.
///
/// Returns `None` when the amount is too large to express in minor units.
///
/// # Examples
///
/// ```
/// use realex_rs::utils::to_minor_units;
/// use rust_decimal::Decimal;
///
/// assert_eq!(to_minor_units(Decimal::new(1000, 2)).as_deref(), Some("1000"));
/// assert_eq!(to_minor_units(Decimal::new(5, 1)).as_deref(), Some("50"));
/// assert_eq!(to_minor_units(Decimal::new(19999, 3)).as_deref(), Some("2000"));
/// assert_eq!(to_minor_units(Decimal::MAX), None);
/// ```
pub fn to_minor_units(amount: Decimal) -> Option<String> {
    let minor = amount
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .checked_mul(Decimal::ONE_HUNDRED)?
        .trunc();
    Some(minor.normalize().to_string())
}

/// Optional amount in minor units.
///
/// An amount that cannot be expressed in minor units fails validation for `operation`.
pub fn minor_units(amount: Option<Decimal>, operation: &str) -> Result<Option<String>> {
    amount
        .map(|value| {
            to_minor_units(value).ok_or_else(|| RealexError::missing(operation, vec!["amount"]))
        })
        .transpose()
}

/// Source of identifiers the caller did not supply.
pub trait IdGenerator: Send + Sync {
    /// New merchant order id.
    fn order_id(&self) -> String;

    /// Request timestamp (`yyyyMMddHHmmss`).
    fn timestamp(&self) -> String;

    /// New stored-payer reference.
    fn recurring_key(&self) -> String;
}

/// Random order ids, local wall-clock timestamps and UUID payer keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultIdGenerator;

impl IdGenerator for DefaultIdGenerator {
    /// Generates 16 random bytes encoded as URL-safe base64 without padding.
    ///
    /// ```
    /// use realex_rs::utils::{DefaultIdGenerator, IdGenerator};
    ///
    /// let id = DefaultIdGenerator.order_id();
    /// assert_eq!(id.len(), 22);
    /// ```
    fn order_id(&self) -> String {
        use rand::Rng;
        let bytes: [u8; 16] = rand::thread_rng().gen();
        URL_SAFE_NO_PAD.encode(bytes)
    }

    fn timestamp(&self) -> String {
        chrono::Local::now().format("%Y%m%d%H%M%S").to_string()
    }

    fn recurring_key(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}
