//! [`Query`] collection related to [`Purchase`]s.

use common::operations::By;

use crate::domain::{buyer, car_offer, purchase, Purchase};
#[cfg(doc)]
use crate::{
    domain::{Buyer, CarOffer},
    Query,
};

use super::DatabaseQuery;

/// Queries a [`Purchase`] by its [`purchase::Id`].
pub type ById = DatabaseQuery<By<Option<Purchase>, purchase::Id>>;

/// Queries all the [`Purchase`]s of a [`Buyer`], the most recent first.
pub type ByBuyer = DatabaseQuery<By<Vec<Purchase>, buyer::Id>>;

/// Queries all the [`Purchase`]s of a [`CarOffer`], the most recent first.
pub type ByCarOffer = DatabaseQuery<By<Vec<Purchase>, car_offer::Id>>;
