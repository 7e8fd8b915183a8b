//! [`Address`] definitions.

use derive_more::{AsRef, Display};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};

use super::validation;
#[cfg(doc)]
use super::{Buyer, Dealership};

/// Postal address of a [`Buyer`] or a [`Dealership`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Address(String);

impl Address {
    /// Maximum number of characters in an [`Address`].
    pub const MAX_LEN: usize = 255;

    /// Creates a new [`Address`] if the given `address` is valid.
    ///
    /// # Errors
    ///
    /// If the `address` is blank or too long.
    pub fn new(address: impl Into<String>) -> Result<Self, validation::Error> {
        validation::text("Address", address, Self::MAX_LEN).map(Self)
    }
}
