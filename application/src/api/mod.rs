//! GraphQL API definitions.

pub mod buyer;
pub mod car;
pub mod car_offer;
pub mod dealership;
pub mod favorite_car;
mod mutation;
pub mod purchase;
mod query;

use juniper::EmptySubscription;

use crate::Context;

pub use self::{
    buyer::Buyer, car::Car, car_offer::CarOffer, dealership::Dealership,
    favorite_car::FavoriteCar, mutation::Mutation, purchase::Purchase,
    query::Query,
};

/// GraphQL schema.
pub type Schema =
    juniper::RootNode<'static, Query, Mutation, EmptySubscription<Context>>;

/// Creates a new [`Schema`].
#[must_use]
pub fn schema() -> Schema {
    Schema::new(Query, Mutation, EmptySubscription::new())
}
