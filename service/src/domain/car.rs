//! [`Car`] definitions.

use common::{define_kind, DateTime};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use uuid::Uuid;

use super::validation;
#[cfg(doc)]
use super::{CarOffer, Purchase};

/// Car model listed in the catalog.
///
/// A [`Car`] never owns any offer or purchase state: those belong to
/// [`CarOffer`]s and [`Purchase`]s referencing it.
#[derive(Clone, Debug)]
pub struct Car {
    /// ID of this [`Car`].
    pub id: Id,

    /// [`Brand`] of this [`Car`].
    pub brand: Brand,

    /// [`Model`] of this [`Car`].
    pub model: Model,

    /// Manufacturing [`Year`] of this [`Car`].
    pub year: Year,

    /// [`Color`] of this [`Car`].
    pub color: Color,

    /// [`FuelType`] of this [`Car`].
    pub fuel_type: FuelType,

    /// [`Transmission`] of this [`Car`].
    pub transmission: Transmission,

    /// [`Description`] of this [`Car`], if any.
    pub description: Option<Description>,

    /// [`ImageUrl`]s of this [`Car`].
    pub image_urls: Vec<ImageUrl>,
}

/// ID of a [`Car`].
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

/// Brand of a [`Car`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Brand(String);

impl Brand {
    /// Creates a new [`Brand`] if the given `brand` is valid.
    ///
    /// # Errors
    ///
    /// If the `brand` is blank or longer than 100 characters.
    pub fn new(brand: impl Into<String>) -> Result<Self, validation::Error> {
        validation::text("Brand", brand, 100).map(Self)
    }
}

/// Model of a [`Car`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Model(String);

impl Model {
    /// Creates a new [`Model`] if the given `model` is valid.
    ///
    /// # Errors
    ///
    /// If the `model` is blank or longer than 100 characters.
    pub fn new(model: impl Into<String>) -> Result<Self, validation::Error> {
        validation::text("Model", model, 100).map(Self)
    }
}

/// Manufacturing year of a [`Car`].
#[derive(Clone, Copy, Debug, Display, Eq, Into, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Year(i32);

impl Year {
    /// Year the first automobile was built.
    pub const FIRST: i32 = 1886;

    /// Creates a new [`Year`] if the given `year` lies between
    /// [`Year::FIRST`] and the next calendar year.
    ///
    /// # Errors
    ///
    /// If the `year` is out of range.
    pub fn new(year: i32) -> Result<Self, validation::Error> {
        let latest = DateTime::now().year() + 1;
        validation::range("Year", year, Self::FIRST, latest).map(Self)
    }
}

/// Color of a [`Car`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Color(String);

impl Color {
    /// Creates a new [`Color`] if the given `color` is valid.
    ///
    /// # Errors
    ///
    /// If the `color` is blank or longer than 50 characters.
    pub fn new(color: impl Into<String>) -> Result<Self, validation::Error> {
        validation::text("Color", color, 50).map(Self)
    }
}

/// Free-form description of a [`Car`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Description(String);

impl Description {
    /// Creates a new [`Description`] out of the given `description`.
    ///
    /// Blank `description` results in [`None`].
    ///
    /// # Errors
    ///
    /// If the `description` is longer than 1000 characters.
    pub fn new(
        description: Option<String>,
    ) -> Result<Option<Self>, validation::Error> {
        validation::optional_text("Description", description, 1000)
            .map(|d| d.map(Self))
    }
}

/// URL of a [`Car`] image.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct ImageUrl(String);

impl ImageUrl {
    /// Creates a new [`ImageUrl`] if the given `url` is an `http` or `https`
    /// one.
    ///
    /// # Errors
    ///
    /// If the `url` has another scheme.
    pub fn new(url: impl Into<String>) -> Result<Self, validation::Error> {
        validation::url("Image URL", url).map(Self)
    }
}

define_kind! {
    #[doc = "Fuel type of a [`Car`]."]
    enum FuelType {
        #[doc = "Gasoline engine."]
        Gasoline = 1,

        #[doc = "Diesel engine."]
        Diesel = 2,

        #[doc = "Hybrid power unit."]
        Hybrid = 3,

        #[doc = "Electric motor."]
        Electric = 4,

        #[doc = "Compressed natural gas."]
        Gnc = 5,
    }
}

define_kind! {
    #[doc = "Transmission of a [`Car`]."]
    enum Transmission {
        #[doc = "Manual gearbox."]
        Manual = 1,

        #[doc = "Automatic gearbox."]
        Automatic = 2,

        #[doc = "Automated manual gearbox."]
        SemiAutomatic = 3,
    }
}

#[cfg(test)]
mod spec {
    use common::DateTime;

    use super::{FuelType, Transmission, Year};
    use crate::domain::validation;

    #[test]
    fn year_bounds() {
        let next = DateTime::now().year() + 1;

        assert!(Year::new(1886).is_ok());
        assert!(Year::new(next).is_ok());

        assert!(Year::new(1885).is_err());
        assert!(Year::new(next + 1).is_err());
    }

    #[test]
    fn kinds_parse_from_upper_snake_case() {
        assert_eq!(
            validation::parse_kind::<Transmission>(
                "Transmission",
                "SEMI_AUTOMATIC",
            ),
            Ok(Transmission::SemiAutomatic),
        );
        assert_eq!(
            validation::parse_kind::<FuelType>("Fuel type", "GNC"),
            Ok(FuelType::Gnc),
        );
        assert!(
            validation::parse_kind::<FuelType>("Fuel type", "STEAM").is_err()
        );
    }
}
