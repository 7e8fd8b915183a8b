//! [`CarOffer`] definitions.

use std::time::Duration;

use common::{DateTime, DateTimeOf, Money};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::{car, dealership, purchase::OfferEffect, validation};
#[cfg(doc)]
use super::{Car, Dealership, Purchase};

/// Listing of a [`Car`] by a [`Dealership`] at a price.
#[derive(Clone, Debug)]
pub struct CarOffer {
    /// ID of this [`CarOffer`].
    pub id: Id,

    /// ID of the offered [`Car`].
    pub car_id: car::Id,

    /// ID of the [`Dealership`] publishing this [`CarOffer`].
    pub dealership_id: dealership::Id,

    /// [`Price`] of this [`CarOffer`].
    pub price: Price,

    /// [`DateTime`] when this [`CarOffer`] was published.
    pub offer_date: OfferDateTime,

    /// [`Notes`] of the [`Dealership`], if any.
    pub notes: Option<Notes>,

    /// Indicator whether this [`CarOffer`] may be purchased.
    pub available: bool,
}

impl CarOffer {
    /// Applies the provided [`OfferEffect`] of a [`Purchase`] to this
    /// [`CarOffer`].
    ///
    /// Returns whether the availability has changed.
    pub fn apply(&mut self, effect: OfferEffect) -> bool {
        let available = match effect {
            OfferEffect::MarkAvailable => true,
            OfferEffect::MarkUnavailable => false,
            OfferEffect::Keep => return false,
        };
        let changed = self.available != available;
        self.available = available;
        changed
    }
}

/// ID of a [`CarOffer`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Price of a [`CarOffer`].
#[derive(Clone, Copy, Debug, Display, Eq, Into, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Price(Money);

impl Price {
    /// Maximum [`Price`]: `99,999,999.99`.
    pub const MAX: Decimal =
        Decimal::from_parts(1_410_065_407, 2, 0, false, 2);

    /// Creates a new [`Price`] if the given `amount` is valid.
    ///
    /// # Errors
    ///
    /// If the `amount` is not positive, exceeds [`Price::MAX`] or has more
    /// than 2 decimal places.
    pub fn new(amount: Money) -> Result<Self, validation::Error> {
        validation::amount("Price", amount, Self::MAX, 2).map(Self)
    }
}

/// [`DateTime`] when a [`CarOffer`] was published.
pub type OfferDateTime = DateTimeOf<CarOffer>;

/// Checks the given [`OfferDateTime`] not to lie further in the future than
/// the provided `tolerance`.
///
/// # Errors
///
/// If the `date` is too far in the future.
pub fn check_offer_date(
    date: OfferDateTime,
    tolerance: Duration,
) -> Result<OfferDateTime, validation::Error> {
    validation::not_after(
        "Offer date",
        date,
        DateTime::now().coerce() + tolerance,
    )
}

/// Notes of a [`Dealership`] on its [`CarOffer`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Notes(String);

impl Notes {
    /// Creates new [`Notes`] out of the given `text`.
    ///
    /// Blank `text` results in [`None`].
    ///
    /// # Errors
    ///
    /// If the `text` is longer than 1000 characters.
    pub fn new(
        text: Option<String>,
    ) -> Result<Option<Self>, validation::Error> {
        validation::optional_text("Dealership notes", text, 1000)
            .map(|t| t.map(Self))
    }
}

#[cfg(test)]
mod spec {
    use std::{str::FromStr as _, time::Duration};

    use common::{DateTime, Money};

    use super::{
        car, check_offer_date, dealership, CarOffer, Id, OfferEffect, Price,
    };

    fn offer(available: bool) -> CarOffer {
        CarOffer {
            id: Id::new(),
            car_id: car::Id::new(),
            dealership_id: dealership::Id::new(),
            price: Price::new(Money::from_str("25000.00").unwrap()).unwrap(),
            offer_date: DateTime::now().coerce(),
            notes: None,
            available,
        }
    }

    #[test]
    fn price_bounds() {
        let price = |s: &str| Price::new(Money::from_str(s).unwrap());

        assert!(price("99999999.99").is_ok());
        assert!(price("100000000").is_err());
        assert!(price("-5").is_err());
        assert!(price("25000.001").is_err());
    }

    #[test]
    fn applies_offer_effects() {
        let mut o = offer(true);

        assert!(o.apply(OfferEffect::MarkUnavailable));
        assert!(!o.available);
        assert!(!o.apply(OfferEffect::MarkUnavailable));
        assert!(!o.available);
        assert!(!o.apply(OfferEffect::Keep));
        assert!(!o.available);
        assert!(o.apply(OfferEffect::MarkAvailable));
        assert!(o.available);
    }

    #[test]
    fn offer_date_tolerance() {
        let minute = Duration::from_secs(60);
        let now = DateTime::now().coerce();

        assert!(check_offer_date(now + minute, 5 * minute).is_ok());
        assert!(check_offer_date(now + 10 * minute, 5 * minute).is_err());
        assert!(check_offer_date(now - 1000 * minute, 5 * minute).is_ok());
    }
}
