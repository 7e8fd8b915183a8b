//! [`Buyer`]-related definitions.

use std::future;

use common::Handler as _;
use derive_more::{Display, From, Into};
use futures::TryFutureExt as _;
use juniper::{graphql_object, GraphQLScalar};
use service::{domain, query};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{api, AsError, Context, Error};

/// A buyer.
#[derive(Clone, Debug)]
pub struct Buyer {
    /// ID of this [`Buyer`].
    id: Id,

    /// Underlying [`domain::Buyer`].
    buyer: OnceCell<domain::Buyer>,
}

impl From<domain::Buyer> for Buyer {
    fn from(buyer: domain::Buyer) -> Self {
        Self {
            id: buyer.id.into(),
            buyer: OnceCell::new_with(Some(buyer)),
        }
    }
}

impl Buyer {
    /// Creates a new [`Buyer`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Buyer`] with the provided ID exists,
    /// otherwise accessing this [`Buyer`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            buyer: OnceCell::new(),
        }
    }

    /// Returns the underlying [`domain::Buyer`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::Buyer`] doesn't exist.
    async fn buyer(&self, ctx: &Context) -> Result<&domain::Buyer, Error> {
        let id = self.id.into();
        self.buyer
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::buyer::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|b| {
                        future::ready(b.ok_or_else(|| {
                            api::query::BuyerError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// A buyer of cars.
#[graphql_object(context = Context)]
impl Buyer {
    /// Unique identifier of this `Buyer`.
    pub fn id(&self) -> Id {
        self.id
    }

    /// First name of this `Buyer`.
    pub async fn first_name(&self, ctx: &Context) -> Result<String, Error> {
        Ok(self.buyer(ctx).await?.first_name.to_string())
    }

    /// Last name of this `Buyer`.
    pub async fn last_name(&self, ctx: &Context) -> Result<String, Error> {
        Ok(self.buyer(ctx).await?.last_name.to_string())
    }

    /// DNI of this `Buyer`.
    pub async fn dni(&self, ctx: &Context) -> Result<String, Error> {
        Ok(self.buyer(ctx).await?.dni.to_string())
    }

    /// Address of this `Buyer`.
    pub async fn address(&self, ctx: &Context) -> Result<String, Error> {
        Ok(self.buyer(ctx).await?.address.to_string())
    }

    /// Indicator whether this `Buyer` may purchase cars.
    pub async fn active(&self, ctx: &Context) -> Result<bool, Error> {
        Ok(self.buyer(ctx).await?.active)
    }

    /// `Purchase`s made by this `Buyer`, the most recent first.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Buyer.purchases",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn purchases(
        &self,
        ctx: &Context,
    ) -> Result<Vec<api::Purchase>, Error> {
        ctx.service()
            .execute(query::purchase::ByBuyer::by(self.id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|p| p.into_iter().map(Into::into).collect())
    }

    /// `FavoriteCar`s of this `Buyer`, the most recently added first.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Buyer.favoriteCars",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn favorite_cars(
        &self,
        ctx: &Context,
    ) -> Result<Vec<api::FavoriteCar>, Error> {
        ctx.service()
            .execute(query::favorite_car::ByBuyer::by(self.id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|f| f.into_iter().map(Into::into).collect())
    }
}

/// Unique identifier of a `Buyer`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::buyer::Id)]
#[into(domain::buyer::Id)]
#[graphql(name = "BuyerId", transparent)]
pub struct Id(Uuid);
