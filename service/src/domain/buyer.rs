//! [`Buyer`] definitions.

use std::sync::LazyLock;

use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use regex::Regex;
use uuid::Uuid;

use super::{validation, Address, Eligible};

/// Person buying cars on the marketplace.
#[derive(Clone, Debug)]
pub struct Buyer {
    /// ID of this [`Buyer`].
    pub id: Id,

    /// [`FirstName`] of this [`Buyer`].
    pub first_name: FirstName,

    /// [`LastName`] of this [`Buyer`].
    pub last_name: LastName,

    /// [`Dni`] of this [`Buyer`].
    pub dni: Dni,

    /// [`Address`] of this [`Buyer`].
    pub address: Address,

    /// Indicator whether this [`Buyer`] may purchase cars.
    pub active: bool,
}

impl Eligible for Buyer {
    fn is_eligible(&self) -> bool {
        self.active
    }
}

/// ID of a [`Buyer`].
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

/// First name of a [`Buyer`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct FirstName(String);

impl FirstName {
    /// Creates a new [`FirstName`] if the given `name` is valid.
    ///
    /// # Errors
    ///
    /// If the `name` is blank or longer than 100 characters.
    pub fn new(name: impl Into<String>) -> Result<Self, validation::Error> {
        validation::text("First name", name, 100).map(Self)
    }
}

/// Last name of a [`Buyer`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct LastName(String);

impl LastName {
    /// Creates a new [`LastName`] if the given `name` is valid.
    ///
    /// # Errors
    ///
    /// If the `name` is blank or longer than 100 characters.
    pub fn new(name: impl Into<String>) -> Result<Self, validation::Error> {
        validation::text("Last name", name, 100).map(Self)
    }
}

/// National identity document number of a [`Buyer`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Dni(String);

impl Dni {
    /// Creates a new [`Dni`] if the given `number` is valid.
    ///
    /// # Errors
    ///
    /// If the `number` is not 7 or 8 digits.
    pub fn new(number: impl Into<String>) -> Result<Self, validation::Error> {
        /// Regular expression checking [`Dni`] format.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new("^[0-9]{7,8}$").expect("valid regex")
        });

        validation::format("DNI", number, &REGEX, "7 or 8 digits").map(Self)
    }
}

#[cfg(test)]
mod spec {
    use super::{Dni, FirstName};

    #[test]
    fn dni_format() {
        assert!(Dni::new("1234567").is_ok());
        assert!(Dni::new("12345678").is_ok());

        for invalid in ["123456", "123456789", "12.345.678", "", "abcdefgh"] {
            assert_eq!(
                Dni::new(invalid).unwrap_err().to_string(),
                "DNI must be 7 or 8 digits",
                "accepted `{invalid}`",
            );
        }
    }

    #[test]
    fn name_bounds() {
        assert_eq!(FirstName::new(" Ana ").unwrap().to_string(), "Ana");
        assert!(FirstName::new("a".repeat(100)).is_ok());
        assert!(FirstName::new("a".repeat(101)).is_err());
        assert!(FirstName::new("").is_err());
    }
}
