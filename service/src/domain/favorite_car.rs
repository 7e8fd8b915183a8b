//! [`FavoriteCar`] definitions.

use common::DateTimeOf;
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use uuid::Uuid;

use super::{buyer, car, validation};
#[cfg(doc)]
use super::{Buyer, Car};

/// [`Car`] marked as a favorite by a [`Buyer`], optionally reviewed.
#[derive(Clone, Debug)]
pub struct FavoriteCar {
    /// ID of this [`FavoriteCar`].
    pub id: Id,

    /// ID of the [`Buyer`] who favorited the [`Car`].
    pub buyer_id: buyer::Id,

    /// ID of the favorited [`Car`].
    pub car_id: car::Id,

    /// [`Rating`] given by the [`Buyer`], if any.
    pub rating: Option<Rating>,

    /// [`Comment`] left by the [`Buyer`], if any.
    pub comment: Option<Comment>,

    /// [`DateTime`] when the [`Car`] was favorited.
    ///
    /// [`DateTime`]: common::DateTime
    pub date_added: AdditionDateTime,

    /// Indicator whether the [`Buyer`] wants to be notified about price
    /// changes.
    pub price_notifications: bool,
}

/// ID of a [`FavoriteCar`].
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

/// Rating of a [`FavoriteCar`] on a 0 to 10 scale.
#[derive(Clone, Copy, Debug, Display, Eq, Into, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Rating(i16);

impl Rating {
    /// Creates a new [`Rating`] if the given `rating` lies between 0 and 10.
    ///
    /// # Errors
    ///
    /// If the `rating` is out of range.
    pub fn new(rating: i32) -> Result<Self, validation::Error> {
        const FIELD: validation::Field = "Rating";
        const MIN: i16 = 0;
        const MAX: i16 = 10;

        let rating =
            i16::try_from(rating).map_err(|_| validation::Error::OutOfRange {
                field: FIELD,
                min: MIN.into(),
                max: MAX.into(),
            })?;
        validation::range(FIELD, rating, MIN, MAX).map(Self)
    }
}

/// Comment on a [`FavoriteCar`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Comment(String);

impl Comment {
    /// Creates a new [`Comment`] out of the given `text`.
    ///
    /// Blank `text` results in [`None`].
    ///
    /// # Errors
    ///
    /// If the `text` is longer than 1000 characters.
    pub fn new(
        text: Option<String>,
    ) -> Result<Option<Self>, validation::Error> {
        validation::optional_text("Comment", text, 1000).map(|t| t.map(Self))
    }
}

/// [`DateTime`] when a [`Car`] was favorited.
///
/// [`DateTime`]: common::DateTime
pub type AdditionDateTime = DateTimeOf<FavoriteCar>;

/// Checks the given [`AdditionDateTime`] to be after `2000-01-01`.
///
/// # Errors
///
/// If the `date` is too early.
pub fn check_date_added(
    date: AdditionDateTime,
) -> Result<AdditionDateTime, validation::Error> {
    validation::after_2000("Date added", date)
}

#[cfg(test)]
mod spec {
    use super::{Comment, Rating};

    #[test]
    fn rating_bounds() {
        assert_eq!(i16::from(Rating::new(0).unwrap()), 0);
        assert_eq!(i16::from(Rating::new(10).unwrap()), 10);

        for invalid in [-1, 11, 100, 70_000, i32::MIN] {
            assert_eq!(
                Rating::new(invalid).unwrap_err().to_string(),
                "Rating must be between 0 and 10",
            );
        }
    }

    #[test]
    fn blank_comment_is_dropped() {
        assert_eq!(Comment::new(Some(" \t".into())), Ok(None));
        assert_eq!(Comment::new(None), Ok(None));
        assert_eq!(
            Comment::new(Some("Great car".into()))
                .unwrap()
                .map(|c| c.to_string()),
            Some("Great car".into()),
        );
        assert_eq!(
            Comment::new(Some("  nice  ".into()))
                .unwrap()
                .map(|c| c.to_string()),
            Some("nice".into()),
        );
        assert!(Comment::new(Some("x".repeat(1001))).is_err());
    }
}
