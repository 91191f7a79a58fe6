//! Authorization-family requests: sale, auth, verify, refund, enrollment checks.

use super::hydration::encode_address;
use super::{MissingFields, RequestIds};
use crate::config::GatewayConfig;
use crate::errors::{RealexError, Result};
use crate::hashing::refund_hash;
use crate::mapping::{resolve_authorization, OperationCode};
use crate::types::{
    AddressType, AlternatePaymentMethod, CreditCardData, MobilePaymentMethodType,
    MobileWalletData, PaymentMethod, RecurringPaymentMethod, TransactionDescription,
    TransactionModifier, TransactionType,
};
use crate::utils::{minor_units, IdGenerator};
use crate::xml::{
    AmountElement, AuthorizationDocument, AutoSettle, CardElement, Comments, CvnElement,
    MpiElement, PaymentData, PaymentMethodDetails, RecurringElement, SignedDocument, TssInfo,
};

/// Payment-specific part of an authorization document.
#[derive(Default)]
struct PaymentFields {
    mobile: Option<String>,
    token: Option<String>,
    card: Option<CardElement>,
    mpi: Option<MpiElement>,
    payerref: Option<String>,
    paymentmethod: Option<String>,
    paymentmethoddetails: Option<PaymentMethodDetails>,
    paymentdata: Option<PaymentData>,
    sha1hash: String,
}

/// Shared inputs of the payment hydrators.
struct Context<'a> {
    config: &'a GatewayConfig,
    desc: &'a TransactionDescription,
    ids: &'a RequestIds,
    amount: Option<&'a str>,
    currency: Option<&'a str>,
}

/// Builds and signs an authorization-family request.
pub fn build(
    config: &GatewayConfig,
    desc: &TransactionDescription,
    ids: &dyn IdGenerator,
) -> Result<SignedDocument<AuthorizationDocument>> {
    let operation =
        resolve_authorization(desc.transaction_type, desc.payment_variant(), desc.modifier)?;
    let request_ids = RequestIds::resolve(desc.timestamp.as_ref(), desc.order_id.as_ref(), ids);
    let amount = minor_units(desc.amount, operation.as_str())?;
    let ctx = Context {
        config,
        desc,
        ids: &request_ids,
        amount: amount.as_deref(),
        currency: desc.currency.as_deref(),
    };

    if operation == OperationCode::Settle {
        let mut missing = MissingFields::default();
        missing.check_text(desc.transaction_id.as_deref(), "transaction id");
        missing.check(desc.amount, "amount");
        missing.into_result(operation.as_str())?;
    }

    let payment = match &desc.payment_method {
        // A settle references the authorized transaction, never a payment method.
        _ if operation == OperationCode::Settle => PaymentFields {
            sha1hash: request_ids.sign(config, &[ctx.amount, ctx.currency, None]),
            ..Default::default()
        },
        Some(PaymentMethod::Card(card)) => hydrate_card(&ctx, card)?,
        Some(PaymentMethod::MobileWallet(wallet)) => hydrate_mobile(&ctx, wallet)?,
        Some(PaymentMethod::Alternative(apm)) => hydrate_alternative(&ctx, apm)?,
        Some(PaymentMethod::Recurring(stored)) => hydrate_stored(&ctx, stored)?,
        None => PaymentFields {
            sha1hash: request_ids.sign(config, &[ctx.amount, ctx.currency, None]),
            ..Default::default()
        },
    };

    let document = AuthorizationDocument {
        timestamp: request_ids.timestamp.clone(),
        request_type: operation.as_str(),
        merchantid: config.merchant_id.clone(),
        account: config.account_id.clone(),
        channel: config.channel.clone(),
        amount: amount.clone().map(|value| AmountElement {
            currency: desc.currency.clone(),
            value,
        }),
        autosettle: auto_settle(desc),
        orderid: request_ids.order_id.clone(),
        pasref: match operation {
            OperationCode::Settle => desc.transaction_id.clone(),
            _ => None,
        },
        authcode: match desc.modifier {
            TransactionModifier::Offline => desc.authorization_code.clone(),
            _ => None,
        },
        mobile: payment.mobile,
        token: payment.token,
        card: payment.card,
        mpi: payment.mpi,
        payerref: payment.payerref,
        paymentmethod: payment.paymentmethod,
        paymentmethoddetails: payment.paymentmethoddetails,
        paymentdata: payment.paymentdata,
        sha1hash: payment.sha1hash,
        refundhash: (desc.transaction_type == TransactionType::Refund)
            .then(|| refund_hash(config.refund_password.as_deref())),
        comments: desc.description.as_deref().map(Comments::single),
        recurring: recurring_element(desc),
        tssinfo: tss_info(desc),
    };

    Ok(SignedDocument {
        operation,
        document,
    })
}

fn auto_settle(desc: &TransactionDescription) -> Option<AutoSettle> {
    let flag = match desc.transaction_type {
        TransactionType::Sale => "1",
        TransactionType::Auth if desc.multi_capture => "MULTI",
        TransactionType::Auth => "0",
        _ => return None,
    };
    Some(AutoSettle { flag })
}

fn hydrate_card(ctx: &Context<'_>, card: &CreditCardData) -> Result<PaymentFields> {
    if ctx.desc.modifier == TransactionModifier::EncryptedMobile {
        // Card data carries no wallet token.
        return Err(RealexError::missing(
            OperationCode::AuthMobile.as_str(),
            vec!["token", "mobile type"],
        ));
    }
    let number = card
        .number
        .as_deref()
        .filter(|n| !n.is_empty())
        .ok_or_else(|| RealexError::missing("card", vec!["card number"]))?;

    let sha1hash = if ctx.desc.transaction_type == TransactionType::Verify {
        ctx.ids.sign(ctx.config, &[Some(number)])
    } else {
        ctx.ids.sign(ctx.config, &[ctx.amount, ctx.currency, Some(number)])
    };

    let cvn = card.cvn.as_ref().map(|cvn| CvnElement {
        number: cvn.clone(),
        presind: Some(card.cvn_presence_indicator as u8),
    });

    Ok(PaymentFields {
        card: Some(CardElement {
            number: Some(number.to_string()),
            expdate: card.short_expiry(),
            chname: Some(card.card_holder_name.clone().unwrap_or_default()),
            card_type: Some(card.resolved_card_type()),
            cvn,
            ..Default::default()
        }),
        mpi: card.three_d_secure.as_ref().map(|tds| MpiElement {
            cavv: tds.cavv.clone(),
            xid: tds.xid.clone(),
            eci: tds.eci.clone(),
        }),
        sha1hash,
        ..Default::default()
    })
}

fn hydrate_mobile(ctx: &Context<'_>, wallet: &MobileWalletData) -> Result<PaymentFields> {
    let mut missing = MissingFields::default();
    missing
        .check_text(wallet.token.as_deref(), "token")
        .check(wallet.mobile_type, "mobile type");
    if wallet.mobile_type == Some(MobilePaymentMethodType::GooglePay) {
        missing
            .check(ctx.amount, "amount")
            .check_text(ctx.currency, "currency");
    }
    missing.into_result(OperationCode::AuthMobile.as_str())?;

    let (Some(token), Some(mobile_type)) = (wallet.token.as_deref(), wallet.mobile_type) else {
        return Err(RealexError::missing(
            OperationCode::AuthMobile.as_str(),
            vec!["token", "mobile type"],
        ));
    };

    let sha1hash = match mobile_type {
        MobilePaymentMethodType::ApplePay => ctx.ids.sign(ctx.config, &[None, None, Some(token)]),
        MobilePaymentMethodType::GooglePay => {
            ctx.ids
                .sign(ctx.config, &[ctx.amount, ctx.currency, Some(token)])
        }
    };

    Ok(PaymentFields {
        mobile: Some(mobile_type.as_str().to_string()),
        token: Some(token.to_string()),
        sha1hash,
        ..Default::default()
    })
}

fn hydrate_alternative(ctx: &Context<'_>, apm: &AlternatePaymentMethod) -> Result<PaymentFields> {
    let mut missing = MissingFields::default();
    missing
        .check_text(apm.return_url.as_deref(), "returnUrl")
        .check_text(apm.status_update_url.as_deref(), "statusUpdateUrl")
        .check_text(apm.account_holder_name.as_deref(), "accountHolderName")
        .check_text(apm.country.as_deref(), "country")
        .check_text(apm.descriptor.as_deref(), "descriptor");
    missing.into_result("alternative payment method")?;

    // The APM signature has no empty-amount fallback.
    let mut missing = MissingFields::default();
    missing
        .check(ctx.amount, "amount")
        .check_text(ctx.currency, "currency");
    missing.into_result("alternative payment method")?;

    let details = PaymentMethodDetails {
        returnurl: apm.return_url.clone().unwrap_or_default(),
        statusupdateurl: apm.status_update_url.clone().unwrap_or_default(),
        descriptor: apm.descriptor.clone().unwrap_or_default(),
        country: apm.country.clone().unwrap_or_default(),
        accountholdername: apm.account_holder_name.clone().unwrap_or_default(),
    };

    Ok(PaymentFields {
        paymentmethod: Some(apm.method_type.clone()),
        paymentmethoddetails: Some(details),
        sha1hash: ctx.ids.sign(
            ctx.config,
            &[ctx.amount, ctx.currency, Some(apm.method_type.as_str())],
        ),
        ..Default::default()
    })
}

fn hydrate_stored(ctx: &Context<'_>, stored: &RecurringPaymentMethod) -> Result<PaymentFields> {
    let mut missing = MissingFields::default();
    missing
        .check_text(stored.customer_key.as_deref(), "payer reference")
        .check_text(stored.reference(), "payment method reference");
    missing.into_result("stored payment method")?;

    let payer_ref = stored.customer_key.as_deref();
    let sha1hash = if ctx.desc.transaction_type == TransactionType::Verify {
        ctx.ids.sign(ctx.config, &[payer_ref])
    } else {
        ctx.ids.sign(ctx.config, &[ctx.amount, ctx.currency, payer_ref])
    };

    let paymentdata = ctx
        .desc
        .cvn
        .as_ref()
        .filter(|cvn| !cvn.is_empty())
        .map(|cvn| PaymentData {
            cvn: CvnElement {
                number: cvn.clone(),
                presind: None,
            },
        });

    Ok(PaymentFields {
        payerref: stored.customer_key.clone(),
        paymentmethod: stored.reference().map(str::to_string),
        paymentdata,
        sha1hash,
        ..Default::default()
    })
}

fn recurring_element(desc: &TransactionDescription) -> Option<RecurringElement> {
    if desc.recurring_type.is_none() && desc.recurring_sequence.is_none() {
        return None;
    }
    Some(RecurringElement {
        recurring_type: desc.recurring_type.map_or("", |t| t.as_str()).to_string(),
        sequence: desc.recurring_sequence.map_or("", |s| s.as_str()).to_string(),
    })
}

fn tss_info(desc: &TransactionDescription) -> Option<TssInfo> {
    let has_tss = desc.customer_id.is_some()
        || desc.product_id.is_some()
        || desc.client_transaction_id.is_some()
        || desc.customer_ip_address.is_some()
        || desc.billing_address.is_some()
        || desc.shipping_address.is_some();
    if !has_tss {
        return None;
    }

    let address = [
        encode_address(desc.billing_address.as_ref(), AddressType::Billing),
        encode_address(desc.shipping_address.as_ref(), AddressType::Shipping),
    ]
    .into_iter()
    .flatten()
    .collect();

    Some(TssInfo {
        custnum: desc.customer_id.clone(),
        prodid: desc.product_id.clone(),
        varref: desc.client_transaction_id.clone(),
        custipaddress: desc.customer_ip_address.clone(),
        address,
    })
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::hashing::{generate_hash, hash_value};
    use crate::types::{Address, RecurringSequence, RecurringType, ThreeDSecureData};
    use rust_decimal::Decimal;

    const CARD_NUMBER: &str = "4263970000005262";

    fn card() -> PaymentMethod {
        PaymentMethod::Card(
            CreditCardData::new(CARD_NUMBER, 12, 2025)
                .with_holder("James Mason")
                .with_cvn("123"),
        )
    }

    fn sale() -> TransactionDescription {
        TransactionDescription::new(TransactionType::Sale)
            .with_payment_method(card())
            .with_amount(Decimal::new(1000, 2), "EUR")
            .with_order_id("order-1")
            .with_timestamp(TIMESTAMP)
    }

    fn sign(fields: &[Option<&str>]) -> String {
        generate_hash("secret", fields)
    }

    fn apm(complete: bool) -> AlternatePaymentMethod {
        let mut apm = AlternatePaymentMethod {
            method_type: "sofort".to_string(),
            ..Default::default()
        };
        if complete {
            apm.return_url = Some("https://example.com/return".to_string());
            apm.status_update_url = Some("https://example.com/status".to_string());
            apm.account_holder_name = Some("James Mason".to_string());
            apm.country = Some("DE".to_string());
            apm.descriptor = Some("Test Transaction".to_string());
        }
        apm
    }

    #[test]
    fn test_card_sale() {
        let signed = build(&config(), &sale(), &FixedIds).unwrap();
        let doc = &signed.document;

        assert_eq!(signed.operation, OperationCode::Auth);
        assert_eq!(doc.request_type, "auth");
        assert_eq!(doc.autosettle, Some(AutoSettle { flag: "1" }));
        assert_eq!(
            doc.amount,
            Some(AmountElement {
                currency: Some("EUR".to_string()),
                value: "1000".to_string()
            })
        );
        let card = doc.card.as_ref().unwrap();
        assert_eq!(card.expdate.as_deref(), Some("1225"));
        assert_eq!(card.card_type.as_deref(), Some("VISA"));
        assert_eq!(card.cvn.as_ref().unwrap().presind, Some(1));
        assert_eq!(
            doc.sha1hash,
            sign(&[
                Some(TIMESTAMP),
                Some("heartlandgpsandbox"),
                Some("order-1"),
                Some("1000"),
                Some("EUR"),
                Some(CARD_NUMBER)
            ])
        );
        assert!(doc.refundhash.is_none());
        assert!(doc.tssinfo.is_none());
    }

    #[test]
    fn test_auth_settle_flags() {
        let mut desc = sale();
        desc.transaction_type = TransactionType::Auth;
        let doc = build(&config(), &desc, &FixedIds).unwrap().document;
        assert_eq!(doc.autosettle, Some(AutoSettle { flag: "0" }));

        let doc = build(&config(), &desc.with_multi_capture(true), &FixedIds)
            .unwrap()
            .document;
        assert_eq!(doc.autosettle, Some(AutoSettle { flag: "MULTI" }));
    }

    #[test]
    fn test_card_verify_signs_without_amount() {
        let desc = TransactionDescription::new(TransactionType::Verify)
            .with_payment_method(card())
            .with_order_id("order-1")
            .with_timestamp(TIMESTAMP);
        let signed = build(&config(), &desc, &FixedIds).unwrap();

        assert_eq!(signed.operation, OperationCode::Otb);
        assert!(signed.document.amount.is_none());
        assert!(signed.document.autosettle.is_none());
        assert_eq!(
            signed.document.sha1hash,
            sign(&[Some(TIMESTAMP), Some("heartlandgpsandbox"), Some("order-1"), Some(CARD_NUMBER)])
        );
    }

    #[test]
    fn test_card_refund_carries_refund_hash() {
        let mut desc = sale();
        desc.transaction_type = TransactionType::Refund;
        let signed = build(&config(), &desc, &FixedIds).unwrap();

        assert_eq!(signed.operation, OperationCode::Credit);
        assert_eq!(signed.document.refundhash, Some(hash_value("refund")));
        assert_ne!(signed.document.refundhash.as_deref(), Some(signed.document.sha1hash.as_str()));
    }

    #[test]
    fn test_card_without_number_fails() {
        let desc = TransactionDescription::new(TransactionType::Sale)
            .with_payment_method(PaymentMethod::Card(CreditCardData::default()));
        let err = build(&config(), &desc, &FixedIds).unwrap_err();
        assert!(matches!(err, RealexError::Validation { .. }));
    }

    #[test]
    fn test_three_d_secure_mpi_block() {
        let card = CreditCardData::new(CARD_NUMBER, 12, 2025).with_three_d_secure(ThreeDSecureData {
            cavv: Some("AAACBllleHchZTBWIGV4MAAAAAA=".to_string()),
            xid: Some("crqAeMwkEL9r4POdxpByWJ1/wYg=".to_string()),
            eci: Some("5".to_string()),
        });
        let desc = sale()
            .with_payment_method(PaymentMethod::Card(card))
            .with_modifier(TransactionModifier::Secure3D);
        let doc = build(&config(), &desc, &FixedIds).unwrap().document;

        let mpi = doc.mpi.unwrap();
        assert_eq!(mpi.eci.as_deref(), Some("5"));
        assert!(doc.card.unwrap().cvn.is_none());
    }

    #[test]
    fn test_offline_without_payment_method() {
        let desc = TransactionDescription::new(TransactionType::Sale)
            .with_modifier(TransactionModifier::Offline)
            .with_amount(Decimal::new(1000, 2), "EUR")
            .with_authorization_code("12345")
            .with_order_id("order-1")
            .with_timestamp(TIMESTAMP);
        let signed = build(&config(), &desc, &FixedIds).unwrap();

        assert_eq!(signed.operation, OperationCode::Offline);
        assert_eq!(signed.document.authcode.as_deref(), Some("12345"));
        assert_eq!(
            signed.document.sha1hash,
            sign(&[
                Some(TIMESTAMP),
                Some("heartlandgpsandbox"),
                Some("order-1"),
                Some("1000"),
                Some("EUR"),
                None
            ])
        );
    }

    #[test]
    fn test_card_with_mobile_modifier_needs_token() {
        let desc = sale().with_modifier(TransactionModifier::EncryptedMobile);
        match build(&config(), &desc, &FixedIds) {
            Err(RealexError::Validation { fields, .. }) => {
                assert_eq!(fields, vec!["token", "mobile type"])
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_apple_pay_signature_order() {
        let wallet = MobileWalletData {
            token: Some("apple-token".to_string()),
            mobile_type: Some(MobilePaymentMethodType::ApplePay),
        };
        let desc = TransactionDescription::new(TransactionType::Sale)
            .with_payment_method(PaymentMethod::MobileWallet(wallet))
            .with_order_id("order-1")
            .with_timestamp(TIMESTAMP);
        let signed = build(&config(), &desc, &FixedIds).unwrap();
        let doc = &signed.document;

        assert_eq!(signed.operation, OperationCode::AuthMobile);
        assert_eq!(doc.mobile.as_deref(), Some("apple-pay"));
        assert_eq!(doc.token.as_deref(), Some("apple-token"));
        assert!(doc.card.is_none());
        assert_eq!(
            doc.sha1hash,
            sign(&[
                Some(TIMESTAMP),
                Some("heartlandgpsandbox"),
                Some("order-1"),
                None,
                None,
                Some("apple-token")
            ])
        );
    }

    #[test]
    fn test_google_pay_requires_amount_and_currency() {
        let wallet = MobileWalletData {
            token: Some("google-token".to_string()),
            mobile_type: Some(MobilePaymentMethodType::GooglePay),
        };
        let desc = TransactionDescription::new(TransactionType::Sale)
            .with_payment_method(PaymentMethod::MobileWallet(wallet.clone()));
        match build(&config(), &desc, &FixedIds) {
            Err(RealexError::Validation { fields, .. }) => assert_eq!(fields, vec!["amount", "currency"]),
            other => panic!("unexpected {:?}", other),
        }

        let desc = desc
            .with_amount(Decimal::new(1500, 2), "EUR")
            .with_order_id("order-1")
            .with_timestamp(TIMESTAMP);
        let doc = build(&config(), &desc, &FixedIds).unwrap().document;
        assert_eq!(doc.mobile.as_deref(), Some("pay-with-google"));
        assert_eq!(
            doc.sha1hash,
            sign(&[
                Some(TIMESTAMP),
                Some("heartlandgpsandbox"),
                Some("order-1"),
                Some("1500"),
                Some("EUR"),
                Some("google-token")
            ])
        );
    }

    #[test]
    fn test_mobile_wallet_requires_token_and_type() {
        let desc = TransactionDescription::new(TransactionType::Auth)
            .with_payment_method(PaymentMethod::MobileWallet(MobileWalletData::default()));
        match build(&config(), &desc, &FixedIds) {
            Err(RealexError::Validation { fields, .. }) => {
                assert_eq!(fields, vec!["token", "mobile type"])
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_apm_all_fields_missing() {
        let desc = sale().with_payment_method(PaymentMethod::Alternative(apm(false)));
        match build(&config(), &desc, &FixedIds) {
            Err(RealexError::Validation { fields, .. }) => assert_eq!(
                fields,
                vec!["returnUrl", "statusUpdateUrl", "accountHolderName", "country", "descriptor"]
            ),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_apm_some_fields_missing() {
        let mut partial = apm(true);
        partial.country = None;
        partial.descriptor = Some(String::new());
        let desc = sale().with_payment_method(PaymentMethod::Alternative(partial));
        match build(&config(), &desc, &FixedIds) {
            Err(RealexError::Validation { fields, .. }) => {
                assert_eq!(fields, vec!["country", "descriptor"])
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_apm_requires_amount() {
        let desc = TransactionDescription::new(TransactionType::Sale)
            .with_payment_method(PaymentMethod::Alternative(apm(true)));
        match build(&config(), &desc, &FixedIds) {
            Err(RealexError::Validation { fields, .. }) => assert_eq!(fields, vec!["amount", "currency"]),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_apm_payment_set() {
        let desc = sale().with_payment_method(PaymentMethod::Alternative(apm(true)));
        let signed = build(&config(), &desc, &FixedIds).unwrap();
        let doc = &signed.document;

        assert_eq!(signed.operation, OperationCode::PaymentSet);
        assert_eq!(doc.paymentmethod.as_deref(), Some("sofort"));
        let details = doc.paymentmethoddetails.as_ref().unwrap();
        assert_eq!(details.returnurl, "https://example.com/return");
        assert_eq!(details.country, "DE");
        assert_eq!(
            doc.sha1hash,
            sign(&[
                Some(TIMESTAMP),
                Some("heartlandgpsandbox"),
                Some("order-1"),
                Some("1000"),
                Some("EUR"),
                Some("sofort")
            ])
        );
    }

    #[test]
    fn test_stored_card_payment() {
        let stored = RecurringPaymentMethod::new("payer-1", "card-1");
        let mut desc = sale().with_payment_method(PaymentMethod::Recurring(stored));
        desc.cvn = Some("123".to_string());
        let signed = build(&config(), &desc, &FixedIds).unwrap();
        let doc = &signed.document;

        assert_eq!(signed.operation, OperationCode::ReceiptIn);
        assert_eq!(doc.payerref.as_deref(), Some("payer-1"));
        assert_eq!(doc.paymentmethod.as_deref(), Some("card-1"));
        assert_eq!(doc.paymentdata.as_ref().unwrap().cvn.number, "123");
        assert_eq!(
            doc.sha1hash,
            sign(&[
                Some(TIMESTAMP),
                Some("heartlandgpsandbox"),
                Some("order-1"),
                Some("1000"),
                Some("EUR"),
                Some("payer-1")
            ])
        );
    }

    #[test]
    fn test_stored_card_verify() {
        let stored = RecurringPaymentMethod::new("payer-1", "card-1");
        let desc = TransactionDescription::new(TransactionType::Verify)
            .with_payment_method(PaymentMethod::Recurring(stored))
            .with_order_id("order-1")
            .with_timestamp(TIMESTAMP);
        let signed = build(&config(), &desc, &FixedIds).unwrap();

        assert_eq!(signed.operation, OperationCode::ReceiptInOtb);
        assert!(signed.document.paymentdata.is_none());
        assert_eq!(
            signed.document.sha1hash,
            sign(&[Some(TIMESTAMP), Some("heartlandgpsandbox"), Some("order-1"), Some("payer-1")])
        );
    }

    #[test]
    fn test_stored_card_requires_references() {
        let desc = sale().with_payment_method(PaymentMethod::Recurring(RecurringPaymentMethod::default()));
        match build(&config(), &desc, &FixedIds) {
            Err(RealexError::Validation { fields, .. }) => {
                assert_eq!(fields, vec!["payer reference", "payment method reference"])
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_generated_identifiers() {
        let desc = TransactionDescription::new(TransactionType::Sale)
            .with_payment_method(card())
            .with_amount(Decimal::new(1000, 2), "EUR");
        let doc = build(&config(), &desc, &FixedIds).unwrap().document;

        assert_eq!(doc.orderid, ORDER_ID);
        assert_eq!(doc.timestamp, TIMESTAMP);
    }

    #[test]
    fn test_comment_recurring_and_tss() {
        let billing = Address {
            postal_code: Some("D02AB12".to_string()),
            street_address1: Some("1 Main St".to_string()),
            country: Some("GB".to_string()),
            ..Default::default()
        };
        let mut desc = sale()
            .with_description("first comment")
            .with_recurring(RecurringType::Fixed, RecurringSequence::First)
            .with_billing_address(billing);
        desc.customer_ip_address = Some("123.123.123.123".to_string());

        let doc = build(&config(), &desc, &FixedIds).unwrap().document;
        assert_eq!(doc.comments.unwrap().comment.text, "first comment");
        let recurring = doc.recurring.unwrap();
        assert_eq!(recurring.recurring_type, "fixed");
        assert_eq!(recurring.sequence, "first");
        let tss = doc.tssinfo.unwrap();
        assert_eq!(tss.custipaddress.as_deref(), Some("123.123.123.123"));
        assert_eq!(tss.address.len(), 1);
        assert_eq!(tss.address[0].code, "0212|1");
    }

    #[test]
    fn test_address_role_follows_description_slot() {
        let address = Address {
            postal_code: Some("50001".to_string()),
            country: Some("US".to_string()),
            ..Default::default()
        };
        let desc = sale()
            .with_billing_address(address.clone())
            .with_shipping_address(address);

        let tss = build(&config(), &desc, &FixedIds).unwrap().document.tssinfo.unwrap();
        let roles: Vec<_> = tss.address.iter().map(|a| a.address_type).collect();
        assert_eq!(roles, vec!["billing", "shipping"]);
    }

    #[test]
    fn test_capture_references_authorized_transaction() {
        let desc = TransactionDescription::new(TransactionType::Capture)
            .with_transaction_id("pasref-1")
            .with_amount(Decimal::new(1000, 2), "EUR")
            .with_order_id("order-1")
            .with_timestamp(TIMESTAMP);
        let signed = build(&config(), &desc, &FixedIds).unwrap();

        assert_eq!(signed.operation, OperationCode::Settle);
        assert!(signed.document.autosettle.is_none());
        assert_eq!(
            signed.document.sha1hash,
            sign(&[
                Some(TIMESTAMP),
                Some("heartlandgpsandbox"),
                Some("order-1"),
                Some("1000"),
                Some("EUR"),
                None
            ])
        );
        let xml = signed.to_xml().unwrap();
        assert!(xml.contains("<orderid>order-1</orderid><pasref>pasref-1</pasref>"));
        assert!(!xml.contains("<card>"));
    }

    #[test]
    fn test_capture_without_transaction_id_fails() {
        let desc = TransactionDescription::new(TransactionType::Capture)
            .with_payment_method(card())
            .with_order_id("order-1");

        match build(&config(), &desc, &FixedIds) {
            Err(RealexError::Validation { operation, fields }) => {
                assert_eq!(operation, "settle");
                assert_eq!(fields, vec!["transaction id", "amount"]);
            }
            other => panic!("expected validation error, got {:?}", other.map(|s| s.operation)),
        }
    }

    #[test]
    fn test_oversized_amount_fails_validation() {
        let desc = sale().with_amount(Decimal::MAX, "EUR");

        match build(&config(), &desc, &FixedIds) {
            Err(RealexError::Validation { operation, fields }) => {
                assert_eq!(operation, "auth");
                assert_eq!(fields, vec!["amount"]);
            }
            other => panic!("expected validation error, got {:?}", other.map(|s| s.operation)),
        }
    }

    #[test]
    fn test_unsupported_type_fails_before_building() {
        let desc = TransactionDescription::new(TransactionType::Hold).with_payment_method(card());
        assert!(matches!(
            build(&config(), &desc, &FixedIds),
            Err(RealexError::UnsupportedOperation(_))
        ));
    }

    #[test]
    fn test_serialized_card_request() {
        let xml = build(&config(), &sale(), &FixedIds).unwrap().to_xml().unwrap();

        assert!(xml.starts_with("<request timestamp=\"20180613141207\" type=\"auth\">"));
        assert!(xml.contains("<merchantid>heartlandgpsandbox</merchantid>"));
        assert!(xml.contains("<account>api</account>"));
        assert!(xml.contains("<channel>ECOM</channel>"));
        assert!(xml.contains("<card><number>4263970000005262</number><expdate>1225</expdate>"));
        assert!(xml.contains("<cvn><number>123</number><presind>1</presind></cvn>"));
    }
}
