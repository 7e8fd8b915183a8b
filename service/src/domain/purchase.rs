//! [`Purchase`] definitions.

use common::{define_kind, DateTime, DateTimeOf, Money};
use derive_more::{AsRef, Display, Error, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::{buyer, car_offer, validation};
#[cfg(doc)]
use super::{Buyer, CarOffer};

/// Purchase of a [`CarOffer`] by a [`Buyer`].
#[derive(Clone, Debug)]
pub struct Purchase {
    /// ID of this [`Purchase`].
    pub id: Id,

    /// ID of the [`Buyer`] making this [`Purchase`].
    pub buyer_id: buyer::Id,

    /// ID of the purchased [`CarOffer`].
    pub car_offer_id: car_offer::Id,

    /// [`FinalPrice`] of this [`Purchase`].
    pub final_price: FinalPrice,

    /// [`DateTime`] when this [`Purchase`] was made.
    pub purchase_date: PurchaseDateTime,

    /// Current [`Status`] of this [`Purchase`].
    pub status: Status,

    /// [`PaymentMethod`] of this [`Purchase`].
    pub payment_method: PaymentMethod,

    /// [`Observations`] on this [`Purchase`], if any.
    pub observations: Option<Observations>,
}

impl Purchase {
    /// Indicates whether this [`Purchase`] still holds its [`CarOffer`].
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Moves this [`Purchase`] into the provided [`Status`].
    ///
    /// Returns the [`OfferEffect`] to be applied to the purchased
    /// [`CarOffer`].
    ///
    /// # Errors
    ///
    /// [`IllegalTransition`] if the transition is not allowed. This
    /// [`Purchase`] is left untouched then.
    pub fn transit(
        &mut self,
        to: Status,
    ) -> Result<OfferEffect, IllegalTransition> {
        let effect = self.status.transition(to)?;
        self.status = to;
        Ok(effect)
    }
}

/// ID of a [`Purchase`].
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

/// Final price agreed in a [`Purchase`].
#[derive(Clone, Copy, Debug, Display, Eq, Into, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct FinalPrice(Money);

impl FinalPrice {
    /// Maximum [`FinalPrice`]: `99,999,999,999,999.99`.
    pub const MAX: Decimal = Decimal::from_parts(
        1_874_919_423,
        2_328_306,
        0,
        false,
        2,
    );

    /// Creates a new [`FinalPrice`] if the given `amount` is valid.
    ///
    /// # Errors
    ///
    /// If the `amount` is not positive, exceeds [`FinalPrice::MAX`] or has
    /// more than 2 decimal places.
    pub fn new(amount: Money) -> Result<Self, validation::Error> {
        validation::amount("Final price", amount, Self::MAX, 2).map(Self)
    }
}

/// [`DateTime`] when a [`Purchase`] was made.
pub type PurchaseDateTime = DateTimeOf<Purchase>;

/// Checks the given [`PurchaseDateTime`] to be after `2000-01-01` and
/// strictly in the past.
///
/// # Errors
///
/// If the `date` is out of the bounds.
pub fn check_purchase_date(
    date: PurchaseDateTime,
) -> Result<PurchaseDateTime, validation::Error> {
    validation::after_2000("Purchase date", date)?;
    validation::in_past("Purchase date", date, DateTime::now().coerce())
}

/// Free-form observations on a [`Purchase`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Observations(String);

impl Observations {
    /// Creates new [`Observations`] out of the given `text`.
    ///
    /// Blank `text` results in [`None`].
    ///
    /// # Errors
    ///
    /// If the `text` is longer than 1000 characters.
    pub fn new(
        text: Option<String>,
    ) -> Result<Option<Self>, validation::Error> {
        validation::optional_text("Observations", text, 1000)
            .map(|t| t.map(Self))
    }
}

define_kind! {
    #[doc = "Payment method of a [`Purchase`]."]
    enum PaymentMethod {
        #[doc = "Cash payment."]
        Cash = 1,

        #[doc = "Credit card payment."]
        CreditCard = 2,

        #[doc = "Check payment."]
        Check = 3,
    }
}

define_kind! {
    #[doc = "Lifecycle status of a [`Purchase`]."]
    enum Status {
        #[doc = "Purchase is made and awaits confirmation."]
        Pending = 1,

        #[doc = "Purchase is confirmed by the dealership."]
        Confirmed = 2,

        #[doc = "Car is delivered to the buyer."]
        Delivered = 3,

        #[doc = "Purchase is cancelled."]
        Cancelled = 4,
    }
}

impl Status {
    /// Indicates whether a [`Purchase`] in this [`Status`] holds its
    /// [`CarOffer`].
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }

    /// Indicates whether no transition leaves this [`Status`].
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Checks the transition from this [`Status`] into the `to` one, returning
    /// the [`OfferEffect`] it has on the purchased [`CarOffer`].
    ///
    /// Re-applying the current non-terminal [`Status`] is allowed and results
    /// in the same [`OfferEffect`] as entering it.
    ///
    /// # Errors
    ///
    /// [`IllegalTransition`] if the transition is not allowed.
    pub const fn transition(
        self,
        to: Self,
    ) -> Result<OfferEffect, IllegalTransition> {
        use OfferEffect as E;
        use Status as S;

        match (self, to) {
            (S::Pending | S::Confirmed, S::Pending | S::Confirmed) => {
                Ok(E::MarkUnavailable)
            }
            (S::Pending | S::Confirmed, S::Cancelled) => Ok(E::MarkAvailable),
            (S::Confirmed, S::Delivered) => Ok(E::Keep),
            (S::Pending, S::Delivered)
            | (S::Delivered | S::Cancelled, _) => {
                Err(IllegalTransition { from: self, to })
            }
        }
    }
}

/// Effect of a [`Status`] transition on the purchased [`CarOffer`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OfferEffect {
    /// [`CarOffer`] must become unavailable.
    MarkUnavailable,

    /// [`CarOffer`] must become available again.
    MarkAvailable,

    /// [`CarOffer`] stays as is.
    Keep,
}

/// Error of a [`Status`] transition not allowed by the lifecycle.
#[derive(Clone, Copy, Debug, Display, Error, Eq, PartialEq)]
#[display("Cannot change purchase status from {from} to {to}")]
pub struct IllegalTransition {
    /// [`Status`] the transition starts from.
    pub from: Status,

    /// Requested [`Status`].
    pub to: Status,
}

#[cfg(test)]
mod spec {
    use std::{str::FromStr as _, time::Duration};

    use common::{DateTime, Money};

    use crate::domain::{buyer, car_offer};

    use super::{
        check_purchase_date, FinalPrice, Id, IllegalTransition, OfferEffect,
        PaymentMethod, Purchase, Status,
    };

    const ALL: [Status; 4] = [
        Status::Pending,
        Status::Confirmed,
        Status::Delivered,
        Status::Cancelled,
    ];

    #[test]
    fn lifecycle_table() {
        use OfferEffect as E;
        use Status as S;

        assert_eq!(S::Pending.transition(S::Confirmed), Ok(E::MarkUnavailable));
        assert_eq!(S::Pending.transition(S::Cancelled), Ok(E::MarkAvailable));
        assert_eq!(S::Confirmed.transition(S::Cancelled), Ok(E::MarkAvailable));
        assert_eq!(S::Confirmed.transition(S::Delivered), Ok(E::Keep));
        assert_eq!(S::Confirmed.transition(S::Pending), Ok(E::MarkUnavailable));
        assert_eq!(S::Pending.transition(S::Pending), Ok(E::MarkUnavailable));
        assert_eq!(
            S::Confirmed.transition(S::Confirmed),
            Ok(E::MarkUnavailable),
        );

        assert_eq!(
            S::Pending.transition(S::Delivered),
            Err(IllegalTransition {
                from: S::Pending,
                to: S::Delivered,
            }),
        );
    }

    #[test]
    fn terminal_states_are_absorbing() {
        for from in [Status::Delivered, Status::Cancelled] {
            assert!(from.is_terminal());
            for to in ALL {
                assert!(from.transition(to).is_err(), "{from} -> {to}");
            }
        }
    }

    #[test]
    fn transit_keeps_status_on_failure() {
        let mut purchase = Purchase {
            id: Id::new(),
            buyer_id: buyer::Id::new(),
            car_offer_id: car_offer::Id::new(),
            final_price: FinalPrice::new(Money::from_str("100").unwrap())
                .unwrap(),
            purchase_date: DateTime::now().coerce(),
            status: Status::Pending,
            payment_method: PaymentMethod::Cash,
            observations: None,
        };

        assert!(purchase.transit(Status::Delivered).is_err());
        assert_eq!(purchase.status, Status::Pending);

        assert_eq!(
            purchase.transit(Status::Cancelled),
            Ok(OfferEffect::MarkAvailable),
        );
        assert_eq!(purchase.status, Status::Cancelled);
        assert!(!purchase.is_active());
    }

    #[test]
    fn illegal_transition_message() {
        let err = Status::Cancelled.transition(Status::Pending).unwrap_err();

        assert_eq!(
            err.to_string(),
            "Cannot change purchase status from CANCELLED to PENDING",
        );
    }

    #[test]
    fn final_price_bounds() {
        let price = |s: &str| FinalPrice::new(Money::from_str(s).unwrap());

        assert!(price("99999999999999.99").is_ok());
        assert!(price("0.01").is_ok());

        assert!(price("100000000000000.00").is_err());
        assert!(price("0").is_err());
        assert!(price("10.005").is_err());
    }

    #[test]
    fn purchase_date_bounds() {
        let now = DateTime::now();

        assert!(check_purchase_date(
            (now - Duration::from_secs(60)).coerce()
        )
        .is_ok());
        assert!(check_purchase_date(
            (now + Duration::from_secs(60)).coerce()
        )
        .is_err());
        assert!(check_purchase_date(
            DateTime::from_rfc3339("1999-12-31T00:00:00Z")
                .unwrap()
                .coerce(),
        )
        .is_err());
    }
}
