//! Read entities definitions.

pub mod car_offer;
pub mod purchase;
