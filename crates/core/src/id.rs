//! Strongly-typed identifiers used across the domain.

use core::str::FromStr;
use serde::Serialize;

use crate::error::DomainError;

/// Identifier of a product row.
///
/// Ids are assigned by storage (positive, ascending). Any signed decimal
/// integer is a well-formed id; one that was never issued, or that does not
/// even fit in an `i64`, simply resolves to nothing.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ProductId(i64);

impl ProductId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn get(&self) -> i64 {
        self.0
    }
}

impl core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<i64> for ProductId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<ProductId> for i64 {
    fn from(value: ProductId) -> Self {
        value.0
    }
}

/// `InvalidId` for text that is not a decimal integer, `NotFound` for an
/// integer outside the `i64` range (storage never issues one).
impl FromStr for ProductId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !is_decimal_integer(s) {
            return Err(DomainError::invalid_id(format!("ProductId: {s:?} is not an integer")));
        }
        s.parse::<i64>().map(Self).map_err(|_| DomainError::not_found())
    }
}

/// `^[+-]?[0-9]+$`: optional sign, at least one digit, leading zeros allowed,
/// no whitespace. Magnitude is not checked.
pub fn is_decimal_integer(s: &str) -> bool {
    let digits = s.strip_prefix(['+', '-']).unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parses_plain_and_signed_integers() {
        assert_eq!("42".parse::<ProductId>().unwrap(), ProductId::new(42));
        assert_eq!("+7".parse::<ProductId>().unwrap(), ProductId::new(7));
        assert_eq!("-3".parse::<ProductId>().unwrap(), ProductId::new(-3));
        assert_eq!("0".parse::<ProductId>().unwrap(), ProductId::new(0));
    }

    #[test]
    fn leading_zeros_are_the_same_id() {
        assert_eq!("007".parse::<ProductId>().unwrap(), ProductId::new(7));
        assert_eq!("01".parse::<ProductId>().unwrap(), ProductId::new(1));
        assert_eq!("-00".parse::<ProductId>().unwrap(), ProductId::new(0));
    }

    #[test]
    fn rejects_non_integers() {
        for raw in ["", "not-valid-url", "1.5", " 1", "1 ", "+", "-", "1e3", "0x1f", "١٢"] {
            assert!(!is_decimal_integer(raw), "{raw:?} should not be an integer");
            let err = raw.parse::<ProductId>().unwrap_err();
            assert!(matches!(err, DomainError::InvalidId(_)), "{raw:?} should be rejected");
        }
    }

    #[test]
    fn out_of_range_integers_resolve_to_not_found() {
        for raw in ["99999999999999999999", "-99999999999999999999", "9223372036854775808"] {
            assert!(is_decimal_integer(raw));
            assert_eq!(raw.parse::<ProductId>().unwrap_err(), DomainError::NotFound);
        }
        assert_eq!("9223372036854775807".parse::<ProductId>().unwrap(), ProductId::new(i64::MAX));
    }

    #[test]
    fn serializes_as_bare_number() {
        let json = serde_json::to_string(&ProductId::new(12)).unwrap();
        assert_eq!(json, "12");
    }

    proptest! {
        #[test]
        fn display_then_parse_is_identity(n in any::<i64>()) {
            let id = ProductId::new(n);
            prop_assert_eq!(id.to_string().parse::<ProductId>().unwrap(), id);
        }
    }
}
