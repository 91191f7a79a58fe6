//! Follow-up operations on an existing transaction.

use super::{MissingFields, RequestIds};
use crate::config::GatewayConfig;
use crate::errors::Result;
use crate::hashing::refund_hash;
use crate::mapping::{resolve_management, OperationCode};
use crate::types::{TransactionDescription, TransactionType};
use crate::utils::{minor_units, IdGenerator};
use crate::xml::{AmountElement, Comments, ManagementDocument, SignedDocument};

/// Builds and signs a management request (settle, void, rebate, hold, ...).
///
/// The referenced gateway transaction id is always required. Captures also need an
/// amount, multi-capture captures an authorization code, and signature verification
/// the PaRes.
pub fn build(
    config: &GatewayConfig,
    desc: &TransactionDescription,
    ids: &dyn IdGenerator,
) -> Result<SignedDocument<ManagementDocument>> {
    let operation = resolve_management(desc)?;
    let multi_capture = desc.transaction_type == TransactionType::Capture && desc.multi_capture;

    let mut missing = MissingFields::default();
    missing.check_text(desc.transaction_id.as_deref(), "transaction id");
    if desc.transaction_type == TransactionType::Capture {
        missing.check(desc.amount, "amount");
    }
    if multi_capture {
        missing.check_text(desc.authorization_code.as_deref(), "authorization code");
    }
    if operation == OperationCode::VerifySignature {
        missing.check_text(
            desc.payer_authentication_response.as_deref(),
            "payer authentication response",
        );
    }
    missing.into_result(operation.as_str())?;

    let request_ids = RequestIds::resolve(desc.timestamp.as_ref(), desc.order_id.as_ref(), ids);
    let amount = minor_units(desc.amount, operation.as_str())?;
    let sha1hash = request_ids.sign(
        config,
        &[
            amount.as_deref(),
            desc.currency.as_deref(),
            desc.alternative_payment_type.as_deref(),
        ],
    );

    let is_refund = desc.transaction_type == TransactionType::Refund;
    let refundhash = is_refund.then(|| {
        let password = if desc.alternative_payment_type.is_some() {
            config.refund_password.as_deref()
        } else {
            config.rebate_password.as_deref()
        };
        refund_hash(password)
    });

    let document = ManagementDocument {
        timestamp: request_ids.timestamp.clone(),
        request_type: operation.as_str(),
        merchantid: config.merchant_id.clone(),
        account: config.account_id.clone(),
        channel: config.channel.clone(),
        orderid: request_ids.order_id.clone(),
        pasref: desc.transaction_id.clone().unwrap_or_default(),
        amount: amount.map(|value| AmountElement {
            currency: if multi_capture {
                None
            } else {
                desc.currency.clone()
            },
            value,
        }),
        authcode: if multi_capture || is_refund {
            desc.authorization_code.clone()
        } else {
            None
        },
        paymentmethod: desc.alternative_payment_type.clone(),
        pares: if operation == OperationCode::VerifySignature {
            desc.payer_authentication_response.clone()
        } else {
            None
        },
        reasoncode: desc.reason_code.clone(),
        comments: desc.description.as_deref().map(Comments::single),
        sha1hash,
        refundhash,
    };

    Ok(SignedDocument {
        operation,
        document,
    })
}
