//! [`Query`] collection related to [`CarOffer`]s.

use common::operations::By;

use crate::{
    domain::{car, car_offer, dealership, CarOffer},
    read,
};
#[cfg(doc)]
use crate::{
    domain::{Car, Dealership},
    Query,
};

use super::DatabaseQuery;

/// Queries a [`CarOffer`] by its [`car_offer::Id`].
pub type ById = DatabaseQuery<By<Option<CarOffer>, car_offer::Id>>;

/// Queries all the [`CarOffer`]s which may be purchased, the most recent
/// first.
pub type Available =
    DatabaseQuery<By<Vec<CarOffer>, read::car_offer::Available>>;

/// Queries all the [`CarOffer`]s of a [`Dealership`], the most recent first.
pub type ByDealership = DatabaseQuery<By<Vec<CarOffer>, dealership::Id>>;

/// Queries all the [`CarOffer`]s of a [`Car`], the most recent first.
pub type ByCar = DatabaseQuery<By<Vec<CarOffer>, car::Id>>;
