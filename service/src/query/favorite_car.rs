//! [`Query`] collection related to [`FavoriteCar`]s.

use common::operations::By;

use crate::domain::{buyer, favorite_car, FavoriteCar};
#[cfg(doc)]
use crate::{domain::Buyer, Query};

use super::DatabaseQuery;

/// Queries a [`FavoriteCar`] by its [`favorite_car::Id`].
pub type ById = DatabaseQuery<By<Option<FavoriteCar>, favorite_car::Id>>;

/// Queries all the [`FavoriteCar`]s of a [`Buyer`], the most recently added
/// first.
pub type ByBuyer = DatabaseQuery<By<Vec<FavoriteCar>, buyer::Id>>;
