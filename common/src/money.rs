//! [`Money`]-related definitions.

use std::str::FromStr;

use derive_more::Display;
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use rust_decimal::Decimal;

/// Amount of money.
///
/// The amount is never rounded: its scale (number of fractional digits) is
/// kept exactly as provided, so `25000.00` and `25000` are equal amounts with
/// different [`Money::fraction_digits()`].
#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Money(Decimal);

impl Money {
    /// Zero amount of [`Money`].
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Creates a new [`Money`] of the provided `amount`.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Returns the amount of this [`Money`].
    #[must_use]
    pub const fn amount(self) -> Decimal {
        self.0
    }

    /// Returns the number of fractional digits this [`Money`] was specified
    /// with.
    #[must_use]
    pub const fn fraction_digits(self) -> u32 {
        self.0.scale()
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl FromStr for Money {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim())
            .map(Self)
            .map_err(|_| "invalid amount")
    }
}

#[cfg(feature = "juniper")]
mod juniper {
    //! Module providing integration with [`juniper`] crate.

    use std::str::FromStr as _;

    use juniper::{graphql_scalar, InputValue, ScalarValue, Value};

    /// Decimal amount of money in `{integer}.{fraction}` format, where the
    /// fraction is optional. The amount is never rounded.
    #[graphql_scalar(with = Self, parse_token(String))]
    type Money = super::Money;

    impl Money {
        fn to_output<S: ScalarValue>(m: &Money) -> Value<S> {
            Value::scalar(m.to_string())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            input
                .as_string_value()
                .ok_or_else(|| {
                    format!(
                        "Cannot parse `Money` input scalar from \
                         non-string value: {input}",
                    )
                })
                .and_then(|s| {
                    Self::from_str(s).map_err(|e| {
                        format!("Cannot parse `Money` input scalar: {e}")
                    })
                })
        }
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use rust_decimal::Decimal;

    use super::Money;

    #[test]
    fn from_str() {
        assert_eq!(
            Money::from_str("25000.00").unwrap(),
            Money::new(Decimal::new(2_500_000, 2)),
        );
        assert_eq!(
            Money::from_str(" 0.5 ").unwrap(),
            Money::new(Decimal::new(5, 1)),
        );

        assert!(Money::from_str("").is_err());
        assert!(Money::from_str("12,50").is_err());
        assert!(Money::from_str("USD").is_err());
    }

    #[test]
    fn keeps_scale() {
        assert_eq!(Money::from_str("25000.00").unwrap().fraction_digits(), 2);
        assert_eq!(Money::from_str("25000").unwrap().fraction_digits(), 0);
        assert_eq!(Money::from_str("1.001").unwrap().fraction_digits(), 3);
        assert_eq!(Money::from_str("1.100").unwrap().fraction_digits(), 3);
    }

    #[test]
    fn to_string() {
        assert_eq!(
            Money::from_str("25000.00").unwrap().to_string(),
            "25000.00",
        );
        assert_eq!(Money::from_str("123").unwrap().to_string(), "123");
        assert_eq!(Money::ZERO.to_string(), "0");
    }
}
