//! [`Car`]-related definitions.

use std::future;

use common::Handler as _;
use derive_more::{Display, From, Into};
use futures::TryFutureExt as _;
use juniper::{graphql_object, GraphQLScalar};
use service::{domain, query};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{api, AsError, Context, Error};

/// A car.
#[derive(Clone, Debug)]
pub struct Car {
    /// ID of this [`Car`].
    id: Id,

    /// Underlying [`domain::Car`].
    car: OnceCell<domain::Car>,
}

impl From<domain::Car> for Car {
    fn from(car: domain::Car) -> Self {
        Self {
            id: car.id.into(),
            car: OnceCell::new_with(Some(car)),
        }
    }
}

impl Car {
    /// Creates a new [`Car`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Car`] with the provided ID exists, otherwise
    /// accessing this [`Car`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            car: OnceCell::new(),
        }
    }

    /// Returns the underlying [`domain::Car`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::Car`] doesn't exist.
    async fn car(&self, ctx: &Context) -> Result<&domain::Car, Error> {
        let id = self.id.into();
        self.car
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::car::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|c| {
                        future::ready(c.ok_or_else(|| {
                            api::query::CarError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// A car listed in the catalog.
#[graphql_object(context = Context)]
impl Car {
    /// Unique identifier of this `Car`.
    pub fn id(&self) -> Id {
        self.id
    }

    /// Brand of this `Car`.
    pub async fn brand(&self, ctx: &Context) -> Result<String, Error> {
        Ok(self.car(ctx).await?.brand.to_string())
    }

    /// Model of this `Car`.
    pub async fn model(&self, ctx: &Context) -> Result<String, Error> {
        Ok(self.car(ctx).await?.model.to_string())
    }

    /// Manufacturing year of this `Car`.
    pub async fn year(&self, ctx: &Context) -> Result<i32, Error> {
        Ok(self.car(ctx).await?.year.into())
    }

    /// Color of this `Car`.
    pub async fn color(&self, ctx: &Context) -> Result<String, Error> {
        Ok(self.car(ctx).await?.color.to_string())
    }

    /// Fuel type of this `Car`, like `GASOLINE` or `GNC`.
    pub async fn fuel_type(&self, ctx: &Context) -> Result<String, Error> {
        Ok(self.car(ctx).await?.fuel_type.to_string())
    }

    /// Transmission of this `Car`, like `MANUAL` or `SEMI_AUTOMATIC`.
    pub async fn transmission(&self, ctx: &Context) -> Result<String, Error> {
        Ok(self.car(ctx).await?.transmission.to_string())
    }

    /// Description of this `Car`, if any.
    pub async fn description(
        &self,
        ctx: &Context,
    ) -> Result<Option<String>, Error> {
        Ok(self.car(ctx).await?.description.as_ref().map(ToString::to_string))
    }

    /// Image URLs of this `Car`.
    pub async fn image_urls(
        &self,
        ctx: &Context,
    ) -> Result<Vec<String>, Error> {
        Ok(self
            .car(ctx)
            .await?
            .image_urls
            .iter()
            .map(ToString::to_string)
            .collect())
    }

    /// `CarOffer`s of this `Car`, the most recent first.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Car.offers",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn offers(
        &self,
        ctx: &Context,
    ) -> Result<Vec<api::CarOffer>, Error> {
        ctx.service()
            .execute(query::car_offer::ByCar::by(self.id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|o| o.into_iter().map(Into::into).collect())
    }
}

/// Unique identifier of a `Car`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::car::Id)]
#[into(domain::car::Id)]
#[graphql(name = "CarId", transparent)]
pub struct Id(Uuid);
