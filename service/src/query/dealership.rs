//! [`Query`] collection related to [`Dealership`]s.

use common::operations::By;

use crate::domain::{dealership, Dealership};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`Dealership`] by its [`dealership::Id`].
pub type ById = DatabaseQuery<By<Option<Dealership>, dealership::Id>>;
