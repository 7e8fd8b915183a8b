//! [`FavoriteCar`]-related definitions.

use common::DateTime;
use derive_more::{Display, From, Into};
use juniper::{graphql_object, GraphQLScalar};
use service::domain;
use uuid::Uuid;

use crate::{api, Context};

/// A favorite car.
#[derive(Clone, Debug, From, Into)]
pub struct FavoriteCar(domain::FavoriteCar);

/// A `Car` marked as a favorite by a `Buyer`.
#[graphql_object(context = Context)]
impl FavoriteCar {
    /// Unique identifier of this `FavoriteCar`.
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// `Buyer` who favorited the `Car`.
    pub fn buyer(&self) -> api::Buyer {
        #[expect(unsafe_code, reason = "foreign key guarantees existence")]
        unsafe {
            api::Buyer::new_unchecked(self.0.buyer_id)
        }
    }

    /// Favorited `Car`.
    pub fn car(&self) -> api::Car {
        #[expect(unsafe_code, reason = "foreign key guarantees existence")]
        unsafe {
            api::Car::new_unchecked(self.0.car_id)
        }
    }

    /// Rating from 1 to 10, if any.
    pub fn rating(&self) -> Option<i32> {
        self.0.rating.map(|r| i16::from(r).into())
    }

    /// Comment of the `Buyer`, if any.
    pub fn comment(&self) -> Option<String> {
        self.0.comment.as_ref().map(ToString::to_string)
    }

    /// `DateTime` when the `Car` was favorited.
    pub fn date_added(&self) -> DateTime {
        self.0.date_added.coerce()
    }

    /// Indicator whether the `Buyer` is notified about price changes.
    pub fn price_notifications(&self) -> bool {
        self.0.price_notifications
    }
}

/// Unique identifier of a `FavoriteCar`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::favorite_car::Id)]
#[into(domain::favorite_car::Id)]
#[graphql(name = "FavoriteCarId", transparent)]
pub struct Id(Uuid);
