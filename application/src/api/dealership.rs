//! [`Dealership`]-related definitions.

use std::future;

use common::Handler as _;
use derive_more::{Display, From, Into};
use futures::TryFutureExt as _;
use juniper::{graphql_object, GraphQLScalar};
use service::{domain, query};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{api, AsError, Context, Error};

/// A dealership.
#[derive(Clone, Debug)]
pub struct Dealership {
    /// ID of this [`Dealership`].
    id: Id,

    /// Underlying [`domain::Dealership`].
    dealership: OnceCell<domain::Dealership>,
}

impl From<domain::Dealership> for Dealership {
    fn from(dealership: domain::Dealership) -> Self {
        Self {
            id: dealership.id.into(),
            dealership: OnceCell::new_with(Some(dealership)),
        }
    }
}

impl Dealership {
    /// Creates a new [`Dealership`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Dealership`] with the provided ID exists,
    /// otherwise accessing this [`Dealership`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            dealership: OnceCell::new(),
        }
    }

    /// Returns the underlying [`domain::Dealership`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::Dealership`] doesn't exist.
    async fn dealership(
        &self,
        ctx: &Context,
    ) -> Result<&domain::Dealership, Error> {
        let id = self.id.into();
        self.dealership
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::dealership::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|d| {
                        future::ready(d.ok_or_else(|| {
                            api::query::DealershipError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// A dealership publishing car offers.
#[graphql_object(context = Context)]
impl Dealership {
    /// Unique identifier of this `Dealership`.
    pub fn id(&self) -> Id {
        self.id
    }

    /// Name of this `Dealership`.
    pub async fn name(&self, ctx: &Context) -> Result<String, Error> {
        Ok(self.dealership(ctx).await?.name.to_string())
    }

    /// CUIT of this `Dealership`.
    pub async fn cuit(&self, ctx: &Context) -> Result<String, Error> {
        Ok(self.dealership(ctx).await?.cuit.to_string())
    }

    /// Address of this `Dealership`.
    pub async fn address(&self, ctx: &Context) -> Result<String, Error> {
        Ok(self.dealership(ctx).await?.address.to_string())
    }

    /// Indicator whether this `Dealership` may publish and sell offers.
    pub async fn active(&self, ctx: &Context) -> Result<bool, Error> {
        Ok(self.dealership(ctx).await?.active)
    }

    /// `CarOffer`s published by this `Dealership`, the most recent first.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Dealership.offers",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn offers(
        &self,
        ctx: &Context,
    ) -> Result<Vec<api::CarOffer>, Error> {
        ctx.service()
            .execute(query::car_offer::ByDealership::by(self.id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|o| o.into_iter().map(Into::into).collect())
    }
}

/// Unique identifier of a `Dealership`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::dealership::Id)]
#[into(domain::dealership::Id)]
#[graphql(name = "DealershipId", transparent)]
pub struct Id(Uuid);
