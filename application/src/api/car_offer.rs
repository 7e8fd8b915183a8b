//! [`CarOffer`]-related definitions.

use std::future;

use common::{DateTime, Handler as _, Money};
use derive_more::{Display, From, Into};
use futures::TryFutureExt as _;
use juniper::{graphql_object, GraphQLScalar};
use service::{domain, query};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{api, AsError, Context, Error};

/// A car offer.
#[derive(Clone, Debug)]
pub struct CarOffer {
    /// ID of this [`CarOffer`].
    id: Id,

    /// Underlying [`domain::CarOffer`].
    offer: OnceCell<domain::CarOffer>,
}

impl From<domain::CarOffer> for CarOffer {
    fn from(offer: domain::CarOffer) -> Self {
        Self {
            id: offer.id.into(),
            offer: OnceCell::new_with(Some(offer)),
        }
    }
}

impl CarOffer {
    /// Creates a new [`CarOffer`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`CarOffer`] with the provided ID exists,
    /// otherwise accessing this [`CarOffer`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            offer: OnceCell::new(),
        }
    }

    /// Returns the underlying [`domain::CarOffer`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::CarOffer`] doesn't exist.
    async fn offer(&self, ctx: &Context) -> Result<&domain::CarOffer, Error> {
        let id = self.id.into();
        self.offer
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::car_offer::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|o| {
                        future::ready(o.ok_or_else(|| {
                            api::query::CarOfferError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// An offer of a `Car` published by a `Dealership`.
#[graphql_object(context = Context)]
impl CarOffer {
    /// Unique identifier of this `CarOffer`.
    pub fn id(&self) -> Id {
        self.id
    }

    /// Offered `Car`.
    pub async fn car(&self, ctx: &Context) -> Result<api::Car, Error> {
        let car_id = self.offer(ctx).await?.car_id;
        #[expect(unsafe_code, reason = "foreign key guarantees existence")]
        let car = unsafe { api::Car::new_unchecked(car_id) };
        Ok(car)
    }

    /// `Dealership` publishing this `CarOffer`.
    pub async fn dealership(
        &self,
        ctx: &Context,
    ) -> Result<api::Dealership, Error> {
        let dealership_id = self.offer(ctx).await?.dealership_id;
        #[expect(unsafe_code, reason = "foreign key guarantees existence")]
        let dealership =
            unsafe { api::Dealership::new_unchecked(dealership_id) };
        Ok(dealership)
    }

    /// Price of this `CarOffer`.
    pub async fn price(&self, ctx: &Context) -> Result<Money, Error> {
        Ok(self.offer(ctx).await?.price.into())
    }

    /// `DateTime` when this `CarOffer` was published.
    pub async fn offer_date(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.offer(ctx).await?.offer_date.coerce())
    }

    /// Notes of the `Dealership` on this `CarOffer`, if any.
    pub async fn notes(&self, ctx: &Context) -> Result<Option<String>, Error> {
        Ok(self.offer(ctx).await?.notes.as_ref().map(ToString::to_string))
    }

    /// Indicator whether this `CarOffer` may be purchased.
    pub async fn available(&self, ctx: &Context) -> Result<bool, Error> {
        Ok(self.offer(ctx).await?.available)
    }

    /// `Purchase`s of this `CarOffer`, the most recent first.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "CarOffer.purchases",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn purchases(
        &self,
        ctx: &Context,
    ) -> Result<Vec<api::Purchase>, Error> {
        ctx.service()
            .execute(query::purchase::ByCarOffer::by(self.id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|p| p.into_iter().map(Into::into).collect())
    }
}

/// Unique identifier of a `CarOffer`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::car_offer::Id)]
#[into(domain::car_offer::Id)]
#[graphql(name = "CarOfferId", transparent)]
pub struct Id(Uuid);
