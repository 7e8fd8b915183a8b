//! [`Query`] collection related to [`Buyer`]s.

use common::operations::By;

use crate::domain::{buyer, Buyer};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`Buyer`] by its [`buyer::Id`].
pub type ById = DatabaseQuery<By<Option<Buyer>, buyer::Id>>;
