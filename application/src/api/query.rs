//! GraphQL [`Query`]s definitions.

use juniper::graphql_object;
use service::{query, read, Query as _};

use crate::{api, define_error, AsError, Context, Error};

/// Root of all GraphQL queries.
#[derive(Clone, Copy, Debug)]
pub struct Query;

impl Query {
    /// Name of the [`tracing::Span`] for the queries.
    pub(crate) const SPAN_NAME: &'static str = "GraphQL query";
}

#[graphql_object(context = Context)]
impl Query {
    /// Returns the `Buyer` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `BUYER_NOT_EXISTS` - the `Buyer` with the specified ID does not
    ///                        exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "buyer",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn buyer(
        id: api::buyer::Id,
        ctx: &Context,
    ) -> Result<api::Buyer, Error> {
        ctx.service()
            .execute(query::buyer::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| BuyerError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `Dealership` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `DEALERSHIP_NOT_EXISTS` - the `Dealership` with the specified ID
    ///                             does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "dealership",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn dealership(
        id: api::dealership::Id,
        ctx: &Context,
    ) -> Result<api::Dealership, Error> {
        ctx.service()
            .execute(query::dealership::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| DealershipError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `Car` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CAR_NOT_EXISTS` - the `Car` with the specified ID does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "car",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn car(
        id: api::car::Id,
        ctx: &Context,
    ) -> Result<api::Car, Error> {
        ctx.service()
            .execute(query::car::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| CarError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `CarOffer` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CAR_OFFER_NOT_EXISTS` - the `CarOffer` with the specified ID does
    ///                            not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "carOffer",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn car_offer(
        id: api::car_offer::Id,
        ctx: &Context,
    ) -> Result<api::CarOffer, Error> {
        ctx.service()
            .execute(query::car_offer::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| CarOfferError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `Purchase` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PURCHASE_NOT_EXISTS` - the `Purchase` with the specified ID does
    ///                           not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "purchase",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn purchase(
        id: api::purchase::Id,
        ctx: &Context,
    ) -> Result<api::Purchase, Error> {
        ctx.service()
            .execute(query::purchase::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| PurchaseError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `FavoriteCar` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `FAVORITE_CAR_NOT_EXISTS` - the `FavoriteCar` with the specified ID
    ///                               does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "favoriteCar",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn favorite_car(
        id: api::favorite_car::Id,
        ctx: &Context,
    ) -> Result<api::FavoriteCar, Error> {
        ctx.service()
            .execute(query::favorite_car::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| FavoriteCarError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Lists all the `CarOffer`s which may be purchased, the most recent
    /// first.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "availableCarOffers",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn available_car_offers(
        ctx: &Context,
    ) -> Result<Vec<api::CarOffer>, Error> {
        ctx.service()
            .execute(query::car_offer::Available::by(
                read::car_offer::Available,
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|o| o.into_iter().map(Into::into).collect())
    }

    /// Lists all the `CarOffer`s of the specified `Dealership`, the most
    /// recent first.
    #[tracing::instrument(
        skip_all,
        fields(
            dealership_id = %dealership_id,
            gql.name = "carOffersByDealership",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn car_offers_by_dealership(
        dealership_id: api::dealership::Id,
        ctx: &Context,
    ) -> Result<Vec<api::CarOffer>, Error> {
        ctx.service()
            .execute(query::car_offer::ByDealership::by(dealership_id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|o| o.into_iter().map(Into::into).collect())
    }

    /// Lists all the `CarOffer`s of the specified `Car`, the most recent
    /// first.
    #[tracing::instrument(
        skip_all,
        fields(
            car_id = %car_id,
            gql.name = "carOffersByCar",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn car_offers_by_car(
        car_id: api::car::Id,
        ctx: &Context,
    ) -> Result<Vec<api::CarOffer>, Error> {
        ctx.service()
            .execute(query::car_offer::ByCar::by(car_id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|o| o.into_iter().map(Into::into).collect())
    }

    /// Lists all the `Purchase`s of the specified `Buyer`, the most recent
    /// first.
    #[tracing::instrument(
        skip_all,
        fields(
            buyer_id = %buyer_id,
            gql.name = "purchasesByBuyer",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn purchases_by_buyer(
        buyer_id: api::buyer::Id,
        ctx: &Context,
    ) -> Result<Vec<api::Purchase>, Error> {
        ctx.service()
            .execute(query::purchase::ByBuyer::by(buyer_id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|p| p.into_iter().map(Into::into).collect())
    }

    /// Lists all the `Purchase`s of the specified `CarOffer`, the most
    /// recent first.
    #[tracing::instrument(
        skip_all,
        fields(
            car_offer_id = %car_offer_id,
            gql.name = "purchasesByCarOffer",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn purchases_by_car_offer(
        car_offer_id: api::car_offer::Id,
        ctx: &Context,
    ) -> Result<Vec<api::Purchase>, Error> {
        ctx.service()
            .execute(query::purchase::ByCarOffer::by(car_offer_id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|p| p.into_iter().map(Into::into).collect())
    }

    /// Lists all the `FavoriteCar`s of the specified `Buyer`, the most
    /// recently added first.
    #[tracing::instrument(
        skip_all,
        fields(
            buyer_id = %buyer_id,
            gql.name = "favoriteCarsByBuyer",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn favorite_cars_by_buyer(
        buyer_id: api::buyer::Id,
        ctx: &Context,
    ) -> Result<Vec<api::FavoriteCar>, Error> {
        ctx.service()
            .execute(query::favorite_car::ByBuyer::by(buyer_id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|f| f.into_iter().map(Into::into).collect())
    }
}

define_error! {
    enum BuyerError {
        #[code = "BUYER_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Buyer` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum CarError {
        #[code = "CAR_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Car` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum CarOfferError {
        #[code = "CAR_OFFER_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`CarOffer` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum DealershipError {
        #[code = "DEALERSHIP_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Dealership` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum FavoriteCarError {
        #[code = "FAVORITE_CAR_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`FavoriteCar` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum PurchaseError {
        #[code = "PURCHASE_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Purchase` with the specified ID does not exist"]
        NotExists,
    }
}
