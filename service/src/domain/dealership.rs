//! [`Dealership`] definitions.

use std::sync::LazyLock;

use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use regex::Regex;
use uuid::Uuid;

use super::{validation, Address, Eligible};
#[cfg(doc)]
use super::CarOffer;

/// Company publishing [`CarOffer`]s.
#[derive(Clone, Debug)]
pub struct Dealership {
    /// ID of this [`Dealership`].
    pub id: Id,

    /// [`Name`] of this [`Dealership`].
    pub name: Name,

    /// [`Cuit`] of this [`Dealership`].
    pub cuit: Cuit,

    /// [`Address`] of this [`Dealership`].
    pub address: Address,

    /// Indicator whether this [`Dealership`] may publish and sell offers.
    pub active: bool,
}

impl Eligible for Dealership {
    fn is_eligible(&self) -> bool {
        self.active
    }
}

/// ID of a [`Dealership`].
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

/// Name of a [`Dealership`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Name(String);

impl Name {
    /// Creates a new [`Name`] if the given `name` is valid.
    ///
    /// # Errors
    ///
    /// If the `name` is blank or longer than 100 characters.
    pub fn new(name: impl Into<String>) -> Result<Self, validation::Error> {
        validation::text("Dealership name", name, 100).map(Self)
    }
}

/// Tax identification number of a [`Dealership`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Cuit(String);

impl Cuit {
    /// Creates a new [`Cuit`] if the given `number` is valid.
    ///
    /// # Errors
    ///
    /// If the `number` is not exactly 11 digits.
    pub fn new(number: impl Into<String>) -> Result<Self, validation::Error> {
        /// Regular expression checking [`Cuit`] format.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new("^[0-9]{11}$").expect("valid regex")
        });

        validation::format("CUIT", number, &REGEX, "exactly 11 digits")
            .map(Self)
    }
}

#[cfg(test)]
mod spec {
    use super::Cuit;

    #[test]
    fn cuit_format() {
        assert!(Cuit::new("30712345678").is_ok());

        assert!(Cuit::new("3071234567").is_err());
        assert!(Cuit::new("307123456789").is_err());
        assert!(Cuit::new("30-71234567-8").is_err());
    }
}
