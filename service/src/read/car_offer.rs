//! [`CarOffer`]-related read definitions.

use derive_more::Deref;

#[cfg(doc)]
use crate::domain::{CarOffer, Purchase};

/// Selector of [`CarOffer`]s which may be purchased.
#[derive(Clone, Copy, Debug, Default)]
pub struct Available;

/// Indicator whether any [`Purchase`] references a [`CarOffer`].
#[derive(Clone, Copy, Debug, Deref, Eq, Hash, PartialEq)]
pub struct IsPurchased(pub bool);

impl PartialEq<bool> for IsPurchased {
    fn eq(&self, other: &bool) -> bool {
        self.0 == *other
    }
}
