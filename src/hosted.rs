//! Hosted payment page request serialization.
//!
//! The hosted page takes a flat JSON object of upper-case fields instead of an XML
//! document. Version 1 of the page expects every value base64 encoded.

use crate::builders::RequestIds;
use crate::config::{FraudFilterMode, GatewayConfig, HostedPaymentConfig, HppVersion};
use crate::errors::{RealexError, Result};
use crate::types::{TransactionDescription, TransactionType};
use crate::utils::{minor_units, IdGenerator};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde_json::{Map, Value};

/// Ordered field collector that skips absent values.
struct HostedFields {
    version: HppVersion,
    fields: Map<String, Value>,
}

impl HostedFields {
    fn new(version: HppVersion) -> Self {
        Self {
            version,
            fields: Map::new(),
        }
    }

    fn set(&mut self, name: &str, value: Option<&str>) {
        let Some(value) = value else {
            return;
        };
        let encoded = match self.version {
            HppVersion::V1 => STANDARD.encode(value),
            HppVersion::V2 => value.to_string(),
        };
        self.fields.insert(name.to_string(), Value::String(encoded));
    }

    fn set_flag(&mut self, name: &str, value: Option<bool>) {
        self.set(name, value.map(|flag| if flag { "1" } else { "0" }));
    }
}

/// Serializes a Sale, Auth or Verify into a signed hosted page request.
///
/// Other transaction types fail with [`RealexError::UnsupportedOperation`] before any
/// field is written; a connector without hosted page options fails with
/// [`RealexError::ConfigError`].
pub fn serialize_hosted_request(
    config: &GatewayConfig,
    desc: &TransactionDescription,
    ids: &dyn IdGenerator,
) -> Result<String> {
    let auto_settle = match desc.transaction_type {
        TransactionType::Sale => "1",
        TransactionType::Auth if desc.multi_capture => "MULTI",
        TransactionType::Auth | TransactionType::Verify => "0",
        other => {
            return Err(RealexError::UnsupportedOperation(format!(
                "{:?} is not available through the hosted payment page; use Sale, Auth or Verify",
                other
            )))
        }
    };
    let hpp: &HostedPaymentConfig = config.hosted_payment_config.as_ref().ok_or_else(|| {
        RealexError::ConfigError("hosted payment page configuration is missing".to_string())
    })?;

    let request_ids = RequestIds::resolve(desc.timestamp.as_ref(), desc.order_id.as_ref(), ids);
    let amount = minor_units(desc.amount, "hosted payment page")?;
    let data = desc.hosted_payment_data.as_ref();

    let mut out = HostedFields::new(hpp.version);
    out.set("MERCHANT_ID", Some(config.merchant_id.as_str()));
    out.set("ACCOUNT", config.account_id.as_deref());
    out.set("CHANNEL", config.channel.as_deref());
    out.set("ORDER_ID", Some(request_ids.order_id.as_str()));
    out.set("AMOUNT", amount.as_deref());
    out.set("CURRENCY", desc.currency.as_deref());
    out.set("TIMESTAMP", Some(request_ids.timestamp.as_str()));
    out.set("AUTO_SETTLE_FLAG", Some(auto_settle));
    out.set("COMMENT1", desc.description.as_deref());
    out.set_flag("RETURN_TSS", hpp.request_transaction_stability_score);
    out.set_flag("DCC_ENABLE", hpp.dynamic_currency_conversion_enabled);

    if let Some(data) = data {
        let customer_number = desc.customer_id.as_deref().or(data.customer_number.as_deref());
        out.set("CUST_NUM", customer_number);
        if hpp.display_saved_cards.is_some() {
            out.set("HPP_SELECT_STORED_CARD", data.customer_key.as_deref());
        } else {
            out.set("PAYER_REF", data.customer_key.as_deref());
        }
        out.set_flag("OFFER_SAVE_CARD", data.offer_to_save_card);
        out.set_flag("PAYER_EXIST", data.customer_exists);
        out.set("PMT_REF", data.payment_key.as_deref());
        out.set("PROD_ID", data.product_id.as_deref());
        out.set("HPP_CUSTOMER_COUNTRY", data.country.as_deref());
        out.set("HPP_CUSTOMER_FIRSTNAME", data.customer_first_name.as_deref());
        out.set("HPP_CUSTOMER_LASTNAME", data.customer_last_name.as_deref());
        out.set("HPP_TX_STATUS_URL", data.status_update_url.as_deref());
        if !data.preset_payment_methods.is_empty() {
            out.set("PM_METHODS", Some(data.preset_payment_methods.join("|").as_str()));
        }
    } else {
        out.set("CUST_NUM", desc.customer_id.as_deref());
    }

    if let Some(shipping) = &desc.shipping_address {
        out.set("SHIPPING_CODE", shipping.postal_code.as_deref());
        out.set("SHIPPING_CO", shipping.country.as_deref());
    }
    if let Some(billing) = &desc.billing_address {
        out.set("BILLING_CODE", billing.postal_code.as_deref());
        out.set("BILLING_CO", billing.country.as_deref());
    }

    let response_url = hpp
        .response_url
        .as_deref()
        .or_else(|| data.and_then(|d| d.return_url.as_deref()));
    out.set("VAR_REF", desc.client_transaction_id.as_deref());
    out.set("HPP_LANG", hpp.language.as_deref());
    out.set("MERCHANT_RESPONSE_URL", response_url);
    out.set("CARD_PAYMENT_BUTTON", hpp.payment_button_text.as_deref());
    out.set_flag("CARD_STORAGE_ENABLE", hpp.card_storage_enabled);
    if desc.transaction_type == TransactionType::Verify {
        out.set("VALIDATE_CARD_ONLY", Some("1"));
    }
    if hpp.fraud_filter_mode != FraudFilterMode::None {
        out.set("HPP_FRAUDFILTER_MODE", Some(hpp.fraud_filter_mode.as_str()));
    }
    if desc.recurring_type.is_some() || desc.recurring_sequence.is_some() {
        out.set("RECURRING_TYPE", desc.recurring_type.map(|t| t.as_str()));
        out.set("RECURRING_SEQUENCE", desc.recurring_sequence.map(|s| s.as_str()));
    }
    out.set("HPP_VERSION", Some(hpp.version.as_str()));
    out.set("HPP_POST_DIMENSIONS", hpp.post_dimensions.as_deref());
    out.set("HPP_POST_RESPONSE", hpp.post_response.as_deref());

    let mut tail = vec![amount.as_deref(), desc.currency.as_deref()];
    let offers_storage = data.map_or(false, |d| d.offer_to_save_card.is_some());
    if hpp.card_storage_enabled.is_some() || offers_storage || hpp.display_saved_cards.is_some() {
        tail.push(data.and_then(|d| d.customer_key.as_deref()));
        tail.push(data.and_then(|d| d.payment_key.as_deref()));
    }
    if hpp.fraud_filter_mode != FraudFilterMode::None {
        tail.push(Some(hpp.fraud_filter_mode.as_str()));
    }
    let sha1hash = request_ids.sign(config, &tail);
    out.set("SHA1HASH", Some(sha1hash.as_str()));

    Ok(serde_json::to_string(&out.fields)?)
}
