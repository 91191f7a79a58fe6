//! Operation codes and the tables that select them.
//!
//! Each family (authorization, management, recurring) is a list of rules checked in
//! order; the first rule that matches wins. A combination no rule covers is an
//! [`RealexError::UnsupportedOperation`], never a default.

use crate::errors::{RealexError, Result};
use crate::types::{
    PaymentVariant, RecurringEntity, TransactionDescription, TransactionModifier, TransactionType,
};
use std::fmt;

/// Gateway operation, written to the `type` attribute of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationCode {
    /// `auth`
    Auth,
    /// `manual`
    Manual,
    /// `offline`
    Offline,
    /// `auth-mobile`
    AuthMobile,
    /// `payment-set`
    PaymentSet,
    /// `receipt-in`
    ReceiptIn,
    /// `settle`
    Settle,
    /// `multisettle`
    MultiSettle,
    /// `otb`
    Otb,
    /// `receipt-in-otb`
    ReceiptInOtb,
    /// `realvault-3ds-verifyenrolled`
    RealVaultVerifyEnrolled,
    /// `credit`
    Credit,
    /// `payment-credit`
    PaymentCredit,
    /// `payment-out`
    PaymentOut,
    /// `3ds-verifyenrolled`
    VerifyEnrolled,
    /// `3ds-verifysig`
    VerifySignature,
    /// `hold`
    Hold,
    /// `release`
    Release,
    /// `rebate`
    Rebate,
    /// `void`
    Void,
    /// `payer-new`
    PayerNew,
    /// `payer-edit`
    PayerEdit,
    /// `card-new`
    CardNew,
    /// `card-update-card`
    CardUpdate,
    /// `card-cancel-card`
    CardCancel,
}

const DEFAULT_ACCEPTED: &[&str] = &["00"];
const ENROLLMENT_ACCEPTED: &[&str] = &["00", "110"];
const PAYMENT_SET_ACCEPTED: &[&str] = &["01"];

impl OperationCode {
    /// Wire token.
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationCode::Auth => "auth",
            OperationCode::Manual => "manual",
            OperationCode::Offline => "offline",
            OperationCode::AuthMobile => "auth-mobile",
            OperationCode::PaymentSet => "payment-set",
            OperationCode::ReceiptIn => "receipt-in",
            OperationCode::Settle => "settle",
            OperationCode::MultiSettle => "multisettle",
            OperationCode::Otb => "otb",
            OperationCode::ReceiptInOtb => "receipt-in-otb",
            OperationCode::RealVaultVerifyEnrolled => "realvault-3ds-verifyenrolled",
            OperationCode::Credit => "credit",
            OperationCode::PaymentCredit => "payment-credit",
            OperationCode::PaymentOut => "payment-out",
            OperationCode::VerifyEnrolled => "3ds-verifyenrolled",
            OperationCode::VerifySignature => "3ds-verifysig",
            OperationCode::Hold => "hold",
            OperationCode::Release => "release",
            OperationCode::Rebate => "rebate",
            OperationCode::Void => "void",
            OperationCode::PayerNew => "payer-new",
            OperationCode::PayerEdit => "payer-edit",
            OperationCode::CardNew => "card-new",
            OperationCode::CardUpdate => "card-update-card",
            OperationCode::CardCancel => "card-cancel-card",
        }
    }

    /// Result codes that count as success for this operation.
    ///
    /// ```
    /// use realex_rs::mapping::OperationCode;
    ///
    /// assert_eq!(OperationCode::Auth.accepted_codes(), &["00"]);
    /// assert_eq!(OperationCode::VerifyEnrolled.accepted_codes(), &["00", "110"]);
    /// assert_eq!(OperationCode::PaymentSet.accepted_codes(), &["01"]);
    /// ```
    pub fn accepted_codes(&self) -> &'static [&'static str] {
        match self {
            OperationCode::VerifySignature
            | OperationCode::VerifyEnrolled
            | OperationCode::RealVaultVerifyEnrolled => ENROLLMENT_ACCEPTED,
            OperationCode::PaymentSet => PAYMENT_SET_ACCEPTED,
            _ => DEFAULT_ACCEPTED,
        }
    }
}

impl fmt::Display for OperationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which payment methods a rule applies to.
#[derive(Debug, Clone, Copy)]
enum VariantMatch {
    /// Any payment method, or none at all
    Any,
    /// No payment method attached
    Absent,
    /// One of the listed variants
    OneOf(&'static [PaymentVariant]),
}

impl VariantMatch {
    fn matches(&self, variant: Option<PaymentVariant>) -> bool {
        match (self, variant) {
            (VariantMatch::Any, _) => true,
            (VariantMatch::Absent, None) => true,
            (VariantMatch::OneOf(list), Some(v)) => list.contains(&v),
            _ => false,
        }
    }
}

/// Which modifiers a rule applies to.
#[derive(Debug, Clone, Copy)]
enum ModifierMatch {
    Any,
    Is(TransactionModifier),
    Not(TransactionModifier),
}

impl ModifierMatch {
    fn matches(&self, modifier: TransactionModifier) -> bool {
        match self {
            ModifierMatch::Any => true,
            ModifierMatch::Is(m) => *m == modifier,
            ModifierMatch::Not(m) => *m != modifier,
        }
    }
}

struct AuthRule {
    types: &'static [TransactionType],
    variant: VariantMatch,
    modifier: ModifierMatch,
    code: OperationCode,
}

const SALE_AUTH: &[TransactionType] = &[TransactionType::Sale, TransactionType::Auth];
const CARD: &[PaymentVariant] = &[PaymentVariant::Card];
const CARD_OR_MOBILE: &[PaymentVariant] = &[PaymentVariant::Card, PaymentVariant::MobileWallet];
const MOBILE: &[PaymentVariant] = &[PaymentVariant::MobileWallet];
const APM: &[PaymentVariant] = &[PaymentVariant::Alternative];
const STORED: &[PaymentVariant] = &[PaymentVariant::Recurring];
const APM_OR_STORED: &[PaymentVariant] = &[PaymentVariant::Alternative, PaymentVariant::Recurring];

const AUTH_RULES: &[AuthRule] = &[
    AuthRule {
        types: SALE_AUTH,
        variant: VariantMatch::OneOf(CARD),
        modifier: ModifierMatch::Is(TransactionModifier::Offline),
        code: OperationCode::Manual,
    },
    AuthRule {
        types: SALE_AUTH,
        variant: VariantMatch::Absent,
        modifier: ModifierMatch::Is(TransactionModifier::Offline),
        code: OperationCode::Offline,
    },
    AuthRule {
        types: SALE_AUTH,
        variant: VariantMatch::OneOf(CARD_OR_MOBILE),
        modifier: ModifierMatch::Is(TransactionModifier::EncryptedMobile),
        code: OperationCode::AuthMobile,
    },
    AuthRule {
        types: SALE_AUTH,
        variant: VariantMatch::OneOf(MOBILE),
        modifier: ModifierMatch::Is(TransactionModifier::None),
        code: OperationCode::AuthMobile,
    },
    AuthRule {
        types: SALE_AUTH,
        variant: VariantMatch::OneOf(CARD),
        modifier: ModifierMatch::Is(TransactionModifier::None),
        code: OperationCode::Auth,
    },
    AuthRule {
        types: SALE_AUTH,
        variant: VariantMatch::OneOf(CARD),
        modifier: ModifierMatch::Is(TransactionModifier::Secure3D),
        code: OperationCode::Auth,
    },
    AuthRule {
        types: SALE_AUTH,
        variant: VariantMatch::OneOf(APM),
        modifier: ModifierMatch::Any,
        code: OperationCode::PaymentSet,
    },
    AuthRule {
        types: SALE_AUTH,
        variant: VariantMatch::OneOf(STORED),
        modifier: ModifierMatch::Not(TransactionModifier::Offline),
        code: OperationCode::ReceiptIn,
    },
    AuthRule {
        types: &[TransactionType::Capture],
        variant: VariantMatch::Any,
        modifier: ModifierMatch::Any,
        code: OperationCode::Settle,
    },
    AuthRule {
        types: &[TransactionType::Verify],
        variant: VariantMatch::OneOf(CARD),
        modifier: ModifierMatch::Any,
        code: OperationCode::Otb,
    },
    AuthRule {
        types: &[TransactionType::Verify],
        variant: VariantMatch::OneOf(APM_OR_STORED),
        modifier: ModifierMatch::Is(TransactionModifier::Secure3D),
        code: OperationCode::RealVaultVerifyEnrolled,
    },
    AuthRule {
        types: &[TransactionType::Verify],
        variant: VariantMatch::OneOf(APM_OR_STORED),
        modifier: ModifierMatch::Not(TransactionModifier::Secure3D),
        code: OperationCode::ReceiptInOtb,
    },
    AuthRule {
        types: &[TransactionType::Refund],
        variant: VariantMatch::OneOf(CARD),
        modifier: ModifierMatch::Any,
        code: OperationCode::Credit,
    },
    AuthRule {
        types: &[TransactionType::Refund],
        variant: VariantMatch::OneOf(APM),
        modifier: ModifierMatch::Any,
        code: OperationCode::PaymentCredit,
    },
    AuthRule {
        types: &[TransactionType::Refund],
        variant: VariantMatch::OneOf(STORED),
        modifier: ModifierMatch::Any,
        code: OperationCode::PaymentOut,
    },
    AuthRule {
        types: &[TransactionType::VerifyEnrolled],
        variant: VariantMatch::OneOf(&[PaymentVariant::Card, PaymentVariant::Recurring]),
        modifier: ModifierMatch::Any,
        code: OperationCode::VerifyEnrolled,
    },
];

fn describe(variant: Option<PaymentVariant>) -> String {
    variant.map_or_else(|| "no payment method".to_string(), |v| v.to_string())
}

/// Selects the authorization-family operation.
///
/// # Examples
///
/// ```
/// use realex_rs::mapping::{resolve_authorization, OperationCode};
/// use realex_rs::types::{PaymentVariant, TransactionModifier, TransactionType};
///
/// let code = resolve_authorization(
///     TransactionType::Sale,
///     Some(PaymentVariant::Card),
///     TransactionModifier::None,
/// ).unwrap();
/// assert_eq!(code, OperationCode::Auth);
/// ```
pub fn resolve_authorization(
    transaction_type: TransactionType,
    variant: Option<PaymentVariant>,
    modifier: TransactionModifier,
) -> Result<OperationCode> {
    AUTH_RULES
        .iter()
        .find(|rule| {
            rule.types.contains(&transaction_type)
                && rule.variant.matches(variant)
                && rule.modifier.matches(modifier)
        })
        .map(|rule| rule.code)
        .ok_or_else(|| {
            RealexError::UnsupportedOperation(format!(
                "{:?} with {} and modifier {:?}",
                transaction_type,
                describe(variant),
                modifier
            ))
        })
}

/// Extra condition on a management rule.
#[derive(Debug, Clone, Copy)]
enum ManagementGuard {
    Always,
    MultiCapture(bool),
    AlternativePayment(bool),
}

impl ManagementGuard {
    fn holds(&self, desc: &TransactionDescription) -> bool {
        match self {
            ManagementGuard::Always => true,
            ManagementGuard::MultiCapture(flag) => desc.multi_capture == *flag,
            ManagementGuard::AlternativePayment(present) => {
                desc.alternative_payment_type.is_some() == *present
            }
        }
    }
}

const MANAGEMENT_RULES: &[(TransactionType, ManagementGuard, OperationCode)] = &[
    (TransactionType::Capture, ManagementGuard::MultiCapture(true), OperationCode::MultiSettle),
    (TransactionType::Capture, ManagementGuard::MultiCapture(false), OperationCode::Settle),
    (TransactionType::Hold, ManagementGuard::Always, OperationCode::Hold),
    (TransactionType::Release, ManagementGuard::Always, OperationCode::Release),
    (TransactionType::Refund, ManagementGuard::AlternativePayment(true), OperationCode::PaymentCredit),
    (TransactionType::Refund, ManagementGuard::AlternativePayment(false), OperationCode::Rebate),
    (TransactionType::Void, ManagementGuard::Always, OperationCode::Void),
    (TransactionType::Reversal, ManagementGuard::Always, OperationCode::Void),
    (TransactionType::VerifySignature, ManagementGuard::Always, OperationCode::VerifySignature),
];

/// Selects the management-family operation for a follow-up on an existing transaction.
pub fn resolve_management(desc: &TransactionDescription) -> Result<OperationCode> {
    MANAGEMENT_RULES
        .iter()
        .find(|(kind, guard, _)| *kind == desc.transaction_type && guard.holds(desc))
        .map(|(_, _, code)| *code)
        .ok_or_else(|| {
            RealexError::UnsupportedOperation(format!(
                "{:?} with {} and modifier {:?} is not a management operation",
                desc.transaction_type,
                describe(desc.payment_variant()),
                desc.modifier
            ))
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntityKind {
    Customer,
    PaymentMethod,
}

const RECURRING_RULES: &[(TransactionType, EntityKind, OperationCode)] = &[
    (TransactionType::Create, EntityKind::Customer, OperationCode::PayerNew),
    (TransactionType::Create, EntityKind::PaymentMethod, OperationCode::CardNew),
    (TransactionType::Edit, EntityKind::Customer, OperationCode::PayerEdit),
    (TransactionType::Edit, EntityKind::PaymentMethod, OperationCode::CardUpdate),
    (TransactionType::Delete, EntityKind::PaymentMethod, OperationCode::CardCancel),
];

/// Selects the recurring-profile operation for a payer or stored card.
pub fn resolve_recurring(
    transaction_type: TransactionType,
    entity: &RecurringEntity,
) -> Result<OperationCode> {
    let kind = match entity {
        RecurringEntity::Customer(_) => EntityKind::Customer,
        RecurringEntity::PaymentMethod(_) => EntityKind::PaymentMethod,
    };
    RECURRING_RULES
        .iter()
        .find(|(t, k, _)| *t == transaction_type && *k == kind)
        .map(|(_, _, code)| *code)
        .ok_or_else(|| {
            RealexError::UnsupportedOperation(format!(
                "{:?} of a {} is not a recurring operation",
                transaction_type,
                entity.kind()
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Customer, RecurringPaymentMethod};
    use TransactionModifier as M;
    use TransactionType as T;

    const ALL_TYPES: &[TransactionType] = &[
        T::Sale,
        T::Auth,
        T::Capture,
        T::Refund,
        T::Void,
        T::Reversal,
        T::Verify,
        T::VerifyEnrolled,
        T::VerifySignature,
        T::Hold,
        T::Release,
        T::Create,
        T::Edit,
        T::Delete,
        T::Report,
    ];
    const ALL_VARIANTS: &[Option<PaymentVariant>] = &[
        None,
        Some(PaymentVariant::Card),
        Some(PaymentVariant::MobileWallet),
        Some(PaymentVariant::Alternative),
        Some(PaymentVariant::Recurring),
    ];
    const ALL_MODIFIERS: &[TransactionModifier] =
        &[M::None, M::Offline, M::EncryptedMobile, M::Secure3D];

    /// The documented authorization table, independent of the rule list above.
    fn expected_authorization(
        t: TransactionType,
        v: Option<PaymentVariant>,
        m: TransactionModifier,
    ) -> Option<OperationCode> {
        use PaymentVariant as V;
        match (t, v, m) {
            (T::Sale | T::Auth, Some(V::Card), M::Offline) => Some(OperationCode::Manual),
            (T::Sale | T::Auth, None, M::Offline) => Some(OperationCode::Offline),
            (T::Sale | T::Auth, Some(V::Card | V::MobileWallet), M::EncryptedMobile) => {
                Some(OperationCode::AuthMobile)
            }
            (T::Sale | T::Auth, Some(V::MobileWallet), M::None) => Some(OperationCode::AuthMobile),
            (T::Sale | T::Auth, Some(V::Card), M::None | M::Secure3D) => Some(OperationCode::Auth),
            (T::Sale | T::Auth, Some(V::Alternative), _) => Some(OperationCode::PaymentSet),
            (T::Sale | T::Auth, Some(V::Recurring), m) if m != M::Offline => {
                Some(OperationCode::ReceiptIn)
            }
            (T::Capture, _, _) => Some(OperationCode::Settle),
            (T::Verify, Some(V::Card), _) => Some(OperationCode::Otb),
            (T::Verify, Some(V::Alternative | V::Recurring), M::Secure3D) => {
                Some(OperationCode::RealVaultVerifyEnrolled)
            }
            (T::Verify, Some(V::Alternative | V::Recurring), _) => {
                Some(OperationCode::ReceiptInOtb)
            }
            (T::Refund, Some(V::Card), _) => Some(OperationCode::Credit),
            (T::Refund, Some(V::Alternative), _) => Some(OperationCode::PaymentCredit),
            (T::Refund, Some(V::Recurring), _) => Some(OperationCode::PaymentOut),
            (T::VerifyEnrolled, Some(V::Card | V::Recurring), _) => {
                Some(OperationCode::VerifyEnrolled)
            }
            _ => None,
        }
    }

    #[test]
    fn test_authorization_table_is_exhaustive() {
        for &t in ALL_TYPES {
            for &v in ALL_VARIANTS {
                for &m in ALL_MODIFIERS {
                    let resolved = resolve_authorization(t, v, m);
                    match expected_authorization(t, v, m) {
                        Some(code) => assert_eq!(resolved.unwrap(), code, "{:?}/{:?}/{:?}", t, v, m),
                        None => assert!(
                            matches!(resolved, Err(RealexError::UnsupportedOperation(_))),
                            "{:?}/{:?}/{:?} should be unsupported",
                            t,
                            v,
                            m
                        ),
                    }
                }
            }
        }
    }

    #[test]
    fn test_unsupported_error_names_the_combination() {
        let err = resolve_authorization(T::Hold, Some(PaymentVariant::Card), M::Offline).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Hold"));
        assert!(message.contains("card"));
        assert!(message.contains("Offline"));
    }

    #[test]
    fn test_management_table() {
        let cases = [
            (T::Capture, false, None, Some(OperationCode::Settle)),
            (T::Capture, true, None, Some(OperationCode::MultiSettle)),
            (T::Hold, false, None, Some(OperationCode::Hold)),
            (T::Release, false, None, Some(OperationCode::Release)),
            (T::Refund, false, None, Some(OperationCode::Rebate)),
            (T::Refund, false, Some("sofort"), Some(OperationCode::PaymentCredit)),
            (T::Void, false, None, Some(OperationCode::Void)),
            (T::Reversal, false, None, Some(OperationCode::Void)),
            (T::VerifySignature, false, None, Some(OperationCode::VerifySignature)),
            (T::Sale, false, None, None),
            (T::Auth, false, None, None),
            (T::Verify, false, None, None),
            (T::VerifyEnrolled, false, None, None),
            (T::Create, false, None, None),
            (T::Report, false, None, None),
        ];

        for (t, multi, apm, expected) in cases {
            let mut desc = TransactionDescription::new(t).with_multi_capture(multi);
            desc.alternative_payment_type = apm.map(str::to_string);
            match expected {
                Some(code) => assert_eq!(resolve_management(&desc).unwrap(), code, "{:?}", t),
                None => assert!(matches!(
                    resolve_management(&desc),
                    Err(RealexError::UnsupportedOperation(_))
                )),
            }
        }
    }

    #[test]
    fn test_recurring_table() {
        let customer = RecurringEntity::Customer(Customer::default());
        let card = RecurringEntity::PaymentMethod(RecurringPaymentMethod::default());

        assert_eq!(resolve_recurring(T::Create, &customer).unwrap(), OperationCode::PayerNew);
        assert_eq!(resolve_recurring(T::Edit, &customer).unwrap(), OperationCode::PayerEdit);
        assert_eq!(resolve_recurring(T::Create, &card).unwrap(), OperationCode::CardNew);
        assert_eq!(resolve_recurring(T::Edit, &card).unwrap(), OperationCode::CardUpdate);
        assert_eq!(resolve_recurring(T::Delete, &card).unwrap(), OperationCode::CardCancel);

        let err = resolve_recurring(T::Delete, &customer).unwrap_err();
        assert!(err.to_string().contains("customer"));
        assert!(resolve_recurring(T::Sale, &card).is_err());
    }

    #[test]
    fn test_wire_tokens() {
        assert_eq!(OperationCode::CardUpdate.to_string(), "card-update-card");
        assert_eq!(OperationCode::VerifySignature.as_str(), "3ds-verifysig");
        assert_eq!(OperationCode::MultiSettle.as_str(), "multisettle");
    }

    #[test]
    fn test_accepted_codes() {
        assert!(OperationCode::VerifySignature.accepted_codes().contains(&"110"));
        assert!(OperationCode::RealVaultVerifyEnrolled.accepted_codes().contains(&"110"));
        assert!(!OperationCode::Auth.accepted_codes().contains(&"110"));
        assert!(!OperationCode::PaymentSet.accepted_codes().contains(&"00"));
    }
}
