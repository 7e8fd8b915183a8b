//! [`Command`] definition.

pub mod change_buyer_activity;
pub mod change_car_offer_availability;
pub mod change_dealership_activity;
pub mod create_buyer;
pub mod create_car;
pub mod create_car_offer;
pub mod create_dealership;
pub mod create_purchase;
pub mod delete_car_offer;
pub mod delete_favorite_car;
pub mod delete_purchase;
pub mod save_favorite_car;
pub mod set_favorite_car_notifications;
pub mod transit_purchase;
pub mod update_car_offer;
pub mod update_favorite_car_review;
pub mod update_purchase;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    change_buyer_activity::ChangeBuyerActivity,
    change_car_offer_availability::ChangeCarOfferAvailability,
    change_dealership_activity::ChangeDealershipActivity,
    create_buyer::CreateBuyer, create_car::CreateCar,
    create_car_offer::CreateCarOffer, create_dealership::CreateDealership,
    create_purchase::CreatePurchase, delete_car_offer::DeleteCarOffer,
    delete_favorite_car::DeleteFavoriteCar, delete_purchase::DeletePurchase,
    save_favorite_car::SaveFavoriteCar,
    set_favorite_car_notifications::SetFavoriteCarNotifications,
    transit_purchase::TransitPurchase, update_car_offer::UpdateCarOffer,
    update_favorite_car_review::UpdateFavoriteCarReview,
    update_purchase::UpdatePurchase,
};
