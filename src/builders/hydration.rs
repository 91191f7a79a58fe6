//! Address and payer sub-blocks shared by the request builders.

use crate::types::{Address, AddressType, Customer};
use crate::xml::{AddressElement, CountryElement, PayerAddress, PayerElement, PhoneNumbers};

/// Country whose AVS scheme checks only the digits of postcode and street line.
const DIGITS_ONLY_COUNTRY: &str = "GB";

fn digits(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

/// Composite AVS code: `postcode|street line 1`.
///
/// For GB addresses both halves keep only their digits. A postcode that is empty or
/// already contains a `|` is passed through untouched.
///
/// # Examples
///
/// ```
/// use realex_rs::builders::hydration::composite_postal_code;
///
/// assert_eq!(composite_postal_code("D02AB12", Some("1 Main St"), Some("GB")), "0212|1");
/// assert_eq!(composite_postal_code("D02AB12", Some("1 Main St"), Some("IE")), "D02AB12|1 Main St");
/// ```
pub fn composite_postal_code(
    postal_code: &str,
    street_address1: Option<&str>,
    country: Option<&str>,
) -> String {
    if postal_code.is_empty() || postal_code.contains('|') {
        return postal_code.to_string();
    }
    let street = street_address1.unwrap_or("");
    if country == Some(DIGITS_ONLY_COUNTRY) {
        format!("{}|{}", digits(postal_code), digits(street))
    } else {
        format!("{}|{}", postal_code, street)
    }
}

/// Encodes an address for the `tssinfo` block under the given role.
///
/// Returns `None` for an absent address.
pub fn encode_address(address: Option<&Address>, role: AddressType) -> Option<AddressElement> {
    let address = address?;
    let code = composite_postal_code(
        address.postal_code.as_deref().unwrap_or(""),
        address.street_address1.as_deref(),
        address.country.as_deref(),
    );
    Some(AddressElement {
        address_type: match role {
            AddressType::Billing => "billing",
            AddressType::Shipping => "shipping",
        },
        code,
        country: address.country.clone().unwrap_or_default(),
    })
}

/// Encodes a payer profile under the given (already resolved) payer reference.
pub fn encode_customer(customer: &Customer, reference: &str) -> PayerElement {
    let address = customer.address.as_ref().map(|a| PayerAddress {
        line1: a.street_address1.clone(),
        line2: a.street_address2.clone(),
        line3: a.street_address3.clone(),
        city: a.city.clone(),
        county: a.province.clone(),
        postcode: a.postal_code.clone(),
        country: a.country.clone().map(|name| CountryElement {
            code: a.country_code.clone(),
            name,
        }),
    });

    PayerElement {
        reference: reference.to_string(),
        payer_type: "Retail",
        title: customer.title.clone(),
        firstname: customer.first_name.clone(),
        surname: customer.last_name.clone(),
        company: customer.company.clone(),
        address,
        phonenumbers: PhoneNumbers {
            home: customer.home_phone.clone(),
            work: customer.work_phone.clone(),
            fax: customer.fax.clone(),
            mobile: customer.mobile_phone.clone(),
        },
        email: customer.email.clone(),
    }
}
