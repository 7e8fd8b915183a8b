//! Error categorization shared by all the [`Command`]s and [`Query`]s.
//!
//! [`Command`]: crate::Command
//! [`Query`]: crate::Query

use tracerr::Traced;

use crate::infra::database;

/// Category of a failure, telling the caller how to react to it.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Category {
    /// Input violates a field rule (bounds, format, length).
    Validation,

    /// Referenced entity does not exist.
    NotFound,

    /// Operation is not allowed in the current state of the marketplace.
    BusinessRule,

    /// Illegal state transition was requested.
    StateConflict,

    /// Offer for the same car and dealership already exists.
    DuplicateOffer,

    /// Favorite for the same buyer and car already exists.
    DuplicateFavorite,

    /// Underlying storage failed.
    Persistence,
}

/// Error which belongs to a [`Category`].
pub trait Categorized {
    /// Returns the [`Category`] of this error.
    fn category(&self) -> Category;
}

impl<E: Categorized> Categorized for Traced<E> {
    fn category(&self) -> Category {
        self.as_ref().category()
    }
}

impl Categorized for database::Error {
    fn category(&self) -> Category {
        Category::Persistence
    }
}
