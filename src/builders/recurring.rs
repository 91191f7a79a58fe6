//! Stored payer and stored card maintenance.

use super::hydration::encode_customer;
use super::{MissingFields, RequestIds};
use crate::config::GatewayConfig;
use crate::errors::Result;
use crate::hashing::generate_hash;
use crate::mapping::{resolve_recurring, OperationCode};
use crate::types::{Customer, RecurringDescription, RecurringEntity, RecurringPaymentMethod};
use crate::utils::IdGenerator;
use crate::xml::{CardElement, PayerElement, RecurringDocument, SignedDocument};

/// Builds and signs a recurring-profile request.
///
/// Returns the document together with the entity as it was sent, so a generated payer
/// or card reference can be handed back to the caller.
pub fn build(
    config: &GatewayConfig,
    desc: &RecurringDescription,
    ids: &dyn IdGenerator,
) -> Result<(SignedDocument<RecurringDocument>, RecurringEntity)> {
    let operation = resolve_recurring(desc.transaction_type, &desc.entity)?;
    let request_ids = RequestIds::resolve(desc.timestamp.as_ref(), desc.order_id.as_ref(), ids);

    let (payer, card, sha1hash, entity) = match &desc.entity {
        RecurringEntity::Customer(customer) => {
            let (payer, sha1hash, customer) = payer_fields(config, &request_ids, customer, ids);
            (Some(payer), None, sha1hash, RecurringEntity::Customer(customer))
        }
        RecurringEntity::PaymentMethod(stored) => {
            let (card, sha1hash, stored) =
                card_fields(config, &request_ids, operation, stored, ids)?;
            (None, Some(card), sha1hash, RecurringEntity::PaymentMethod(stored))
        }
    };

    let document = RecurringDocument {
        request_type: operation.as_str(),
        timestamp: request_ids.timestamp.clone(),
        merchantid: config.merchant_id.clone(),
        account: config.account_id.clone(),
        orderid: request_ids.order_id.clone(),
        payer,
        card,
        sha1hash,
    };

    Ok((
        SignedDocument {
            operation,
            document,
        },
        entity,
    ))
}

fn payer_fields(
    config: &GatewayConfig,
    request_ids: &RequestIds,
    customer: &Customer,
    ids: &dyn IdGenerator,
) -> (PayerElement, String, Customer) {
    let mut customer = customer.clone();
    let key = customer
        .key
        .get_or_insert_with(|| ids.recurring_key())
        .clone();

    let payer = encode_customer(&customer, &key);
    let sha1hash = request_ids.sign(config, &[None, None, Some(key.as_str())]);
    (payer, sha1hash, customer)
}

fn card_fields(
    config: &GatewayConfig,
    request_ids: &RequestIds,
    operation: OperationCode,
    stored: &RecurringPaymentMethod,
    ids: &dyn IdGenerator,
) -> Result<(CardElement, String, RecurringPaymentMethod)> {
    let mut stored = stored.clone();
    if operation == OperationCode::CardNew && stored.reference().is_none() {
        stored.key = Some(ids.recurring_key());
    }

    let mut missing = MissingFields::default();
    missing
        .check_text(stored.customer_key.as_deref(), "payer reference")
        .check_text(stored.reference(), "payment method reference");
    if operation != OperationCode::CardCancel {
        let number = stored.payment_method.as_ref().and_then(|c| c.number.as_deref());
        missing.check_text(number, "card number");
    }
    missing.into_result(operation.as_str())?;

    let payer_ref = stored.customer_key.clone().unwrap_or_default();
    let card_ref = stored.reference().unwrap_or_default().to_string();
    let mut element = CardElement {
        reference: Some(card_ref.clone()),
        payerref: Some(payer_ref.clone()),
        ..Default::default()
    };

    let sha1hash = match (operation, stored.payment_method.as_ref()) {
        (OperationCode::CardNew, Some(card)) | (OperationCode::CardUpdate, Some(card)) => {
            let number = card.number.clone().unwrap_or_default();
            let holder = card.card_holder_name.clone().unwrap_or_default();
            let expiry = card.short_expiry();
            element.number = Some(number.clone());
            element.expdate = expiry.clone();
            element.chname = Some(holder.clone());
            element.card_type = Some(card.resolved_card_type());

            if operation == OperationCode::CardNew {
                request_ids.sign(
                    config,
                    &[None, None, Some(payer_ref.as_str()), Some(holder.as_str()), Some(number.as_str())],
                )
            } else {
                // Card updates are signed without the order id.
                generate_hash(
                    &config.shared_secret,
                    &[
                        Some(request_ids.timestamp.as_str()),
                        Some(config.merchant_id.as_str()),
                        Some(payer_ref.as_str()),
                        Some(card_ref.as_str()),
                        expiry.as_deref(),
                        Some(number.as_str()),
                    ],
                )
            }
        }
        _ => generate_hash(
            &config.shared_secret,
            &[
                Some(request_ids.timestamp.as_str()),
                Some(config.merchant_id.as_str()),
                Some(payer_ref.as_str()),
                Some(card_ref.as_str()),
            ],
        ),
    };

    Ok((element, sha1hash, stored))
}
