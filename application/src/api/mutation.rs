//! GraphQL [`Mutation`]s definitions.

use common::{DateTime, Money};
use juniper::{graphql_object, Nullable};
use service::{command, Command as _};

use crate::{api, impl_categorized_as_error, AsError, Context, Error};

/// Root of all GraphQL mutations.
///
/// Every failure carries one of the following error codes:
/// - `VALIDATION_ERROR` - provided input violates a field rule;
/// - `NOT_FOUND` - referenced entity does not exist;
/// - `BUSINESS_RULE_VIOLATION` - operation is not allowed in the current
///                               state of the marketplace;
/// - `STATE_CONFLICT` - illegal `Purchase` status transition;
/// - `DUPLICATE_OFFER` - `Dealership` has already offered the `Car`;
/// - `DUPLICATE_FAVORITE` - `Buyer` has already favorited the `Car`.
#[derive(Clone, Copy, Debug)]
pub struct Mutation;

impl Mutation {
    /// Name of the [`tracing::Span`] for the mutations.
    const SPAN_NAME: &'static str = "GraphQL mutation";
}

#[graphql_object(context = Context)]
impl Mutation {
    /// Registers a new `Buyer`.
    #[tracing::instrument(
        skip_all,
        fields(
            dni = %dni,
            gql.name = "createBuyer",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn create_buyer(
        first_name: String,
        last_name: String,
        dni: String,
        address: String,
        ctx: &Context,
    ) -> Result<api::Buyer, Error> {
        ctx.service()
            .execute(command::CreateBuyer {
                first_name,
                last_name,
                dni,
                address,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Allows the `Buyer` to purchase cars again.
    ///
    /// # Errors
    ///
    /// `BUSINESS_RULE_VIOLATION` if the `Buyer` is active already.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "activateBuyer",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn activate_buyer(
        id: api::buyer::Id,
        ctx: &Context,
    ) -> Result<api::Buyer, Error> {
        ctx.service()
            .execute(command::ChangeBuyerActivity::activate(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Forbids the `Buyer` to purchase cars.
    ///
    /// # Errors
    ///
    /// `BUSINESS_RULE_VIOLATION` if the `Buyer` is inactive already.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "deactivateBuyer",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn deactivate_buyer(
        id: api::buyer::Id,
        ctx: &Context,
    ) -> Result<api::Buyer, Error> {
        ctx.service()
            .execute(command::ChangeBuyerActivity::deactivate(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Registers a new `Dealership`.
    #[tracing::instrument(
        skip_all,
        fields(
            cuit = %cuit,
            gql.name = "createDealership",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn create_dealership(
        name: String,
        cuit: String,
        address: String,
        ctx: &Context,
    ) -> Result<api::Dealership, Error> {
        ctx.service()
            .execute(command::CreateDealership {
                name,
                cuit,
                address,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Allows the `Dealership` to publish and sell offers again.
    ///
    /// # Errors
    ///
    /// `BUSINESS_RULE_VIOLATION` if the `Dealership` is active already.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "activateDealership",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn activate_dealership(
        id: api::dealership::Id,
        ctx: &Context,
    ) -> Result<api::Dealership, Error> {
        ctx.service()
            .execute(command::ChangeDealershipActivity::activate(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Forbids the `Dealership` to publish and sell offers.
    ///
    /// # Errors
    ///
    /// `BUSINESS_RULE_VIOLATION` if the `Dealership` is inactive already.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "deactivateDealership",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn deactivate_dealership(
        id: api::dealership::Id,
        ctx: &Context,
    ) -> Result<api::Dealership, Error> {
        ctx.service()
            .execute(command::ChangeDealershipActivity::deactivate(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Adds a new `Car` to the catalog.
    #[tracing::instrument(
        skip_all,
        fields(
            brand = %brand,
            gql.name = "createCar",
            model = %model,
            otel.name = Self::SPAN_NAME,
            year = year,
        ),
    )]
    #[expect(clippy::too_many_arguments, reason = "still readable")]
    pub async fn create_car(
        brand: String,
        model: String,
        year: i32,
        color: String,
        fuel_type: String,
        transmission: String,
        description: Option<String>,
        image_urls: Option<Vec<String>>,
        ctx: &Context,
    ) -> Result<api::Car, Error> {
        ctx.service()
            .execute(command::CreateCar {
                brand,
                model,
                year,
                color,
                fuel_type,
                transmission,
                description,
                image_urls: image_urls.unwrap_or_default(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Publishes a new available `CarOffer` of the `Car` by the
    /// `Dealership`.
    ///
    /// `offerDate` defaults to the current `DateTime`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `DUPLICATE_OFFER` - the `Dealership` has already offered the `Car`;
    /// - `VALIDATION_ERROR` - the `Dealership` is inactive or the terms are
    ///                        invalid.
    #[tracing::instrument(
        skip_all,
        fields(
            car_id = %car_id,
            dealership_id = %dealership_id,
            gql.name = "createCarOffer",
            otel.name = Self::SPAN_NAME,
            price = %price,
        ),
    )]
    pub async fn create_car_offer(
        car_id: api::car::Id,
        dealership_id: api::dealership::Id,
        price: Money,
        notes: Option<String>,
        offer_date: Option<DateTime>,
        ctx: &Context,
    ) -> Result<api::CarOffer, Error> {
        ctx.service()
            .execute(command::CreateCarOffer {
                car_id: car_id.into(),
                dealership_id: dealership_id.into(),
                price,
                notes,
                offer_date: offer_date.map(DateTime::coerce),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Updates the price and notes of the `CarOffer`.
    ///
    /// Omitted arguments are left untouched, while an explicit `null`
    /// `notes` clears them.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updateCarOffer",
            id = %id,
            otel.name = Self::SPAN_NAME,
            price = ?price,
        ),
    )]
    pub async fn update_car_offer(
        id: api::car_offer::Id,
        price: Option<Money>,
        notes: Nullable<String>,
        ctx: &Context,
    ) -> Result<api::CarOffer, Error> {
        ctx.service()
            .execute(command::UpdateCarOffer {
                car_offer_id: id.into(),
                price,
                notes: notes.explicit(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Marks the `CarOffer` as available for purchase.
    ///
    /// # Errors
    ///
    /// `BUSINESS_RULE_VIOLATION` if a pending or confirmed `Purchase` holds
    /// the `CarOffer`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "markCarOfferAvailable",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn mark_car_offer_available(
        id: api::car_offer::Id,
        ctx: &Context,
    ) -> Result<api::CarOffer, Error> {
        ctx.service()
            .execute(command::ChangeCarOfferAvailability::mark_available(
                id.into(),
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Withdraws the `CarOffer` from sale.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "markCarOfferUnavailable",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn mark_car_offer_unavailable(
        id: api::car_offer::Id,
        ctx: &Context,
    ) -> Result<api::CarOffer, Error> {
        ctx.service()
            .execute(command::ChangeCarOfferAvailability::mark_unavailable(
                id.into(),
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Deletes the `CarOffer`, returning it.
    ///
    /// # Errors
    ///
    /// `BUSINESS_RULE_VIOLATION` if the `CarOffer` has any `Purchase`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "deleteCarOffer",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn delete_car_offer(
        id: api::car_offer::Id,
        ctx: &Context,
    ) -> Result<api::CarOffer, Error> {
        ctx.service()
            .execute(command::DeleteCarOffer {
                car_offer_id: id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Purchases the `CarOffer` on behalf of the `Buyer`.
    ///
    /// The new `Purchase` is `PENDING` and the `CarOffer` becomes
    /// unavailable.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `BUSINESS_RULE_VIOLATION` - the `CarOffer` is not available, or the
    ///                               `Buyer` or its `Dealership` is
    ///                               inactive;
    /// - `NOT_FOUND` - the `Buyer` or the `CarOffer` does not exist;
    /// - `VALIDATION_ERROR` - the terms of the `Purchase` are invalid.
    #[tracing::instrument(
        skip_all,
        fields(
            buyer_id = %buyer_id,
            car_offer_id = %car_offer_id,
            final_price = %final_price,
            gql.name = "createPurchase",
            otel.name = Self::SPAN_NAME,
            payment_method = %payment_method,
        ),
    )]
    pub async fn create_purchase(
        buyer_id: api::buyer::Id,
        car_offer_id: api::car_offer::Id,
        final_price: Money,
        payment_method: String,
        purchase_date: DateTime,
        observations: Option<String>,
        ctx: &Context,
    ) -> Result<api::Purchase, Error> {
        ctx.service()
            .execute(command::CreatePurchase {
                buyer_id: buyer_id.into(),
                car_offer_id: car_offer_id.into(),
                final_price,
                payment_method,
                purchase_date: purchase_date.coerce(),
                observations,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Updates the provided fields of the `Purchase`.
    ///
    /// Omitted arguments are left untouched, while an explicit `null`
    /// `observations` clears them. A `status` change follows the same rules
    /// as the dedicated transitions.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `STATE_CONFLICT` - the `status` transition is not allowed;
    /// - `VALIDATION_ERROR` - any of the provided fields is invalid.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updatePurchase",
            id = %id,
            otel.name = Self::SPAN_NAME,
            status = ?status,
        ),
    )]
    pub async fn update_purchase(
        id: api::purchase::Id,
        final_price: Option<Money>,
        purchase_date: Option<DateTime>,
        status: Option<String>,
        payment_method: Option<String>,
        observations: Nullable<String>,
        ctx: &Context,
    ) -> Result<api::Purchase, Error> {
        ctx.service()
            .execute(command::UpdatePurchase {
                purchase_id: id.into(),
                final_price,
                purchase_date: purchase_date.map(DateTime::coerce),
                status,
                payment_method,
                observations: observations.explicit(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Confirms the `PENDING` `Purchase`.
    ///
    /// # Errors
    ///
    /// `STATE_CONFLICT` if the `Purchase` is `DELIVERED` or `CANCELLED`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "confirmPurchase",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn confirm_purchase(
        id: api::purchase::Id,
        ctx: &Context,
    ) -> Result<api::Purchase, Error> {
        ctx.service()
            .execute(command::TransitPurchase::confirm(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Cancels the `Purchase`, making its `CarOffer` available again.
    ///
    /// # Errors
    ///
    /// `STATE_CONFLICT` if the `Purchase` is `DELIVERED` or `CANCELLED`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "cancelPurchase",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn cancel_purchase(
        id: api::purchase::Id,
        ctx: &Context,
    ) -> Result<api::Purchase, Error> {
        ctx.service()
            .execute(command::TransitPurchase::cancel(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Marks the `CONFIRMED` `Purchase` as delivered.
    ///
    /// # Errors
    ///
    /// `STATE_CONFLICT` if the `Purchase` is not `CONFIRMED`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "deliverPurchase",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn deliver_purchase(
        id: api::purchase::Id,
        ctx: &Context,
    ) -> Result<api::Purchase, Error> {
        ctx.service()
            .execute(command::TransitPurchase::deliver(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Moves the `Purchase` back to `PENDING`.
    ///
    /// # Errors
    ///
    /// `STATE_CONFLICT` if the `Purchase` is `DELIVERED` or `CANCELLED`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "revertPurchaseToPending",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn revert_purchase_to_pending(
        id: api::purchase::Id,
        ctx: &Context,
    ) -> Result<api::Purchase, Error> {
        ctx.service()
            .execute(command::TransitPurchase::revert_to_pending(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Deletes the `Purchase`, returning it.
    ///
    /// Its `CarOffer` becomes available again, unless another pending or
    /// confirmed `Purchase` still holds it.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "deletePurchase",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn delete_purchase(
        id: api::purchase::Id,
        ctx: &Context,
    ) -> Result<api::Purchase, Error> {
        ctx.service()
            .execute(command::DeletePurchase {
                purchase_id: id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Adds the `Car` to the favorites of the `Buyer`.
    ///
    /// `dateAdded` defaults to the current `DateTime`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `DUPLICATE_FAVORITE` - the `Buyer` has already favorited the `Car`;
    /// - `NOT_FOUND` - the `Buyer` or the `Car` does not exist;
    /// - `VALIDATION_ERROR` - the review is invalid.
    #[tracing::instrument(
        skip_all,
        fields(
            buyer_id = %buyer_id,
            car_id = %car_id,
            gql.name = "saveFavoriteCar",
            otel.name = Self::SPAN_NAME,
            rating = ?rating,
        ),
    )]
    pub async fn save_favorite_car(
        buyer_id: api::buyer::Id,
        car_id: api::car::Id,
        rating: Option<i32>,
        comment: Option<String>,
        date_added: Option<DateTime>,
        price_notifications: Option<bool>,
        ctx: &Context,
    ) -> Result<api::FavoriteCar, Error> {
        ctx.service()
            .execute(command::SaveFavoriteCar {
                buyer_id: buyer_id.into(),
                car_id: car_id.into(),
                rating,
                comment,
                date_added: date_added.map(DateTime::coerce),
                price_notifications: price_notifications.unwrap_or_default(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Updates the rating and comment of the `FavoriteCar`.
    ///
    /// Omitted arguments are left untouched, while explicit `null`s clear
    /// them.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updateFavoriteCarReview",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn update_favorite_car_review(
        id: api::favorite_car::Id,
        rating: Nullable<i32>,
        comment: Nullable<String>,
        ctx: &Context,
    ) -> Result<api::FavoriteCar, Error> {
        ctx.service()
            .execute(command::UpdateFavoriteCarReview {
                favorite_car_id: id.into(),
                rating: rating.explicit(),
                comment: comment.explicit(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Subscribes the `Buyer` to price changes of the `FavoriteCar`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "enableFavoriteCarNotifications",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn enable_favorite_car_notifications(
        id: api::favorite_car::Id,
        ctx: &Context,
    ) -> Result<api::FavoriteCar, Error> {
        ctx.service()
            .execute(command::SetFavoriteCarNotifications::enable(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Unsubscribes the `Buyer` from price changes of the `FavoriteCar`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "disableFavoriteCarNotifications",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn disable_favorite_car_notifications(
        id: api::favorite_car::Id,
        ctx: &Context,
    ) -> Result<api::FavoriteCar, Error> {
        ctx.service()
            .execute(command::SetFavoriteCarNotifications::disable(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Removes the `FavoriteCar`, returning it.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "deleteFavoriteCar",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn delete_favorite_car(
        id: api::favorite_car::Id,
        ctx: &Context,
    ) -> Result<api::FavoriteCar, Error> {
        ctx.service()
            .execute(command::DeleteFavoriteCar {
                favorite_car_id: id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }
}

impl_categorized_as_error! {
    command::change_buyer_activity::ExecutionError,
    command::change_car_offer_availability::ExecutionError,
    command::change_dealership_activity::ExecutionError,
    command::create_buyer::ExecutionError,
    command::create_car::ExecutionError,
    command::create_car_offer::ExecutionError,
    command::create_dealership::ExecutionError,
    command::create_purchase::ExecutionError,
    command::delete_car_offer::ExecutionError,
    command::delete_favorite_car::ExecutionError,
    command::delete_purchase::ExecutionError,
    command::save_favorite_car::ExecutionError,
    command::set_favorite_car_notifications::ExecutionError,
    command::transit_purchase::ExecutionError,
    command::update_car_offer::ExecutionError,
    command::update_favorite_car_review::ExecutionError,
    command::update_purchase::ExecutionError,
}
