//! Domain definitions.

pub mod address;
pub mod buyer;
pub mod car;
pub mod car_offer;
pub mod dealership;
pub mod favorite_car;
pub mod purchase;
pub mod validation;

pub use self::{
    address::Address, buyer::Buyer, car::Car, car_offer::CarOffer,
    dealership::Dealership, favorite_car::FavoriteCar, purchase::Purchase,
};

/// Party which may take part in a marketplace deal only while it's eligible.
pub trait Eligible {
    /// Indicates whether this party may currently take part in a deal.
    fn is_eligible(&self) -> bool;
}
