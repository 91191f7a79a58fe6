//! Request document builders.
//!
//! Each family has its own builder: validate what the resolved operation needs, sign the
//! exact field sequence the gateway recomputes, then assemble the document. Validation
//! always runs before signing, so a failing call never yields a partial document.

pub mod authorization;
pub mod hydration;
pub mod management;
pub mod recurring;

use crate::config::GatewayConfig;
use crate::hashing::generate_hash;
use crate::utils::IdGenerator;

/// Timestamp and order id of one request, taken from the caller or generated.
#[derive(Debug, Clone)]
pub(crate) struct RequestIds {
    pub timestamp: String,
    pub order_id: String,
}

impl RequestIds {
    pub fn resolve(
        timestamp: Option<&String>,
        order_id: Option<&String>,
        ids: &dyn IdGenerator,
    ) -> Self {
        Self {
            timestamp: timestamp.cloned().unwrap_or_else(|| ids.timestamp()),
            order_id: order_id.cloned().unwrap_or_else(|| ids.order_id()),
        }
    }

    /// Signs `timestamp.merchant.order` followed by `tail`.
    pub fn sign(&self, config: &GatewayConfig, tail: &[Option<&str>]) -> String {
        let mut fields = vec![
            Some(self.timestamp.as_str()),
            Some(config.merchant_id.as_str()),
            Some(self.order_id.as_str()),
        ];
        fields.extend_from_slice(tail);
        generate_hash(&config.shared_secret, &fields)
    }
}

/// Collects the names of absent required values, in the order they are checked.
#[derive(Debug, Default)]
pub(crate) struct MissingFields(Vec<&'static str>);

impl MissingFields {
    pub fn check<T>(&mut self, value: Option<T>, name: &'static str) -> &mut Self {
        if value.is_none() {
            self.0.push(name);
        }
        self
    }

    pub fn check_text(&mut self, value: Option<&str>, name: &'static str) -> &mut Self {
        self.check(value.filter(|v| !v.is_empty()), name)
    }

    pub fn into_result(self, operation: &str) -> crate::errors::Result<()> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(crate::errors::RealexError::missing(operation, self.0))
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::errors::RealexError;

    #[test]
    fn test_ids_prefer_caller_values() {
        let ts = "20200101000000".to_string();
        let ids = RequestIds::resolve(Some(&ts), None, &FixedIds);
        assert_eq!(ids.timestamp, ts);
        assert_eq!(ids.order_id, ORDER_ID);
    }

    #[test]
    fn test_sign_prefixes_timestamp_merchant_order() {
        let ids = RequestIds::resolve(None, None, &FixedIds);
        let cfg = config();
        let expected = generate_hash(
            "secret",
            &[Some(TIMESTAMP), Some("heartlandgpsandbox"), Some(ORDER_ID), Some("1000"), None],
        );
        assert_eq!(ids.sign(&cfg, &[Some("1000"), None]), expected);
    }

    #[test]
    fn test_missing_fields() {
        let mut missing = MissingFields::default();
        missing
            .check(Some(1), "present")
            .check::<u8>(None, "absent")
            .check_text(Some(""), "empty");
        match missing.into_result("op") {
            Err(RealexError::Validation { fields, .. }) => assert_eq!(fields, vec!["absent", "empty"]),
            other => panic!("unexpected {:?}", other),
        }
    }
}
