//! Request signatures.
//!
//! The gateway recomputes the same digest from the same fields in the same order, so
//! every position counts: an absent field is an empty position, never a dropped one.

use sha1::{Digest, Sha1};

const SEPARATOR: &str = ".";

/// SHA-1 of `value`, lowercase hex.
///
/// Used on its own for the refund/rebate authorization hash.
///
/// # Examples
///
/// ```
/// use realex_rs::hashing::hash_value;
///
/// assert_eq!(hash_value("abc"), "a9993e364706816aba3e25717850c26c9cd0d89d");
/// ```
pub fn hash_value(value: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(value.as_bytes());
    hex::encode(hasher.finalize())
}

/// Signs an ordered field sequence with the shared secret.
///
/// `sha1(sha1(f1.f2...fn).secret)`, with `None` written as an empty position.
///
/// # Examples
///
/// ```
/// use realex_rs::hashing::generate_hash;
///
/// let with_gap = generate_hash("secret", &[Some("A"), None, Some("C")]);
/// let without = generate_hash("secret", &[Some("A"), Some("C")]);
/// assert_ne!(with_gap, without);
/// ```
pub fn generate_hash(secret: &str, fields: &[Option<&str>]) -> String {
    let joined = fields
        .iter()
        .map(|field| field.unwrap_or(""))
        .collect::<Vec<_>>()
        .join(SEPARATOR);
    let first = hash_value(&joined);
    hash_value(&format!("{}{}{}", first, SEPARATOR, secret))
}

/// Refund/rebate authorization hash: SHA-1 of the password alone.
///
/// An unconfigured password yields an empty hash.
pub fn refund_hash(password: Option<&str>) -> String {
    password.map(hash_value).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_matches_manual_two_stage_digest() {
        let fields = [
            Some("20180613141207"),
            Some("MerchantId"),
            Some("OrderId"),
            Some("1000"),
            Some("EUR"),
            Some("4263970000005262"),
        ];
        let inner = hash_value("20180613141207.MerchantId.OrderId.1000.EUR.4263970000005262");
        let expected = hash_value(&format!("{}.secret", inner));

        assert_eq!(generate_hash("secret", &fields), expected);
    }

    #[test]
    fn test_hash_is_deterministic() {
        let fields = [Some("a"), Some("b"), Some("c")];
        assert_eq!(generate_hash("s", &fields), generate_hash("s", &fields));
    }

    #[test]
    fn test_any_field_change_changes_hash() {
        let base = [Some("ts"), Some("merchant"), Some("order"), Some("100"), Some("EUR")];
        let signature = generate_hash("secret", &base);

        for i in 0..base.len() {
            let mut changed = base;
            changed[i] = Some("other");
            assert_ne!(generate_hash("secret", &changed), signature, "field {}", i);
        }
    }

    #[test]
    fn test_swapping_adjacent_fields_changes_hash() {
        let base = [Some("ts"), Some("merchant"), Some("order"), Some("100"), Some("EUR")];
        let signature = generate_hash("secret", &base);

        for i in 0..base.len() - 1 {
            let mut swapped = base;
            swapped.swap(i, i + 1);
            assert_ne!(generate_hash("secret", &swapped), signature, "swap {}", i);
        }
    }

    #[test]
    fn test_absent_field_keeps_its_position() {
        let gap = generate_hash("secret", &[Some("A"), None, Some("C")]);
        let empty = generate_hash("secret", &[Some("A"), Some(""), Some("C")]);
        let dropped = generate_hash("secret", &[Some("A"), Some("C")]);

        assert_eq!(gap, empty);
        assert_ne!(gap, dropped);
    }

    #[test]
    fn test_secret_changes_hash() {
        let fields = [Some("a")];
        assert_ne!(generate_hash("one", &fields), generate_hash("two", &fields));
    }

    #[test]
    fn test_refund_hash() {
        assert_eq!(refund_hash(Some("refund")), hash_value("refund"));
        assert_eq!(refund_hash(None), "");
    }
}
