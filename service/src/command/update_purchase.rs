//! [`Command`] for updating a [`Purchase`].

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{car_offer, purchase, validation, CarOffer, Purchase},
    error::{Categorized, Category},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for updating a [`Purchase`] field by field.
///
/// [`None`] fields are left as is. A [`purchase::Status`] change follows the
/// same lifecycle as [`TransitPurchase`] does.
///
/// [`TransitPurchase`]: super::TransitPurchase
#[derive(Clone, Debug, Default)]
pub struct UpdatePurchase {
    /// ID of the [`Purchase`] to update.
    pub purchase_id: purchase::Id,

    /// New final price.
    pub final_price: Option<Money>,

    /// New [`DateTime`] of the [`Purchase`].
    ///
    /// [`DateTime`]: common::DateTime
    pub purchase_date: Option<purchase::PurchaseDateTime>,

    /// New [`purchase::Status`], as its variant name.
    pub status: Option<String>,

    /// New [`purchase::PaymentMethod`], as its variant name.
    pub payment_method: Option<String>,

    /// New observations.
    ///
    /// `Some(None)` removes the observations.
    pub observations: Option<Option<String>>,
}

impl<Db> Command<UpdatePurchase> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Purchase>, purchase::Id>>,
            Ok = Option<Purchase>,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<
            Lock<By<CarOffer, car_offer::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Lock<By<Purchase, purchase::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<CarOffer>, car_offer::Id>>,
            Ok = Option<CarOffer>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Purchase>, purchase::Id>>,
            Ok = Option<Purchase>,
            Err = Traced<database::Error>,
        > + Database<Update<CarOffer>, Err = Traced<database::Error>>
        + Database<Update<Purchase>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Purchase;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdatePurchase,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdatePurchase {
            purchase_id,
            final_price,
            purchase_date,
            status,
            payment_method,
            observations,
        } = cmd;

        let final_price = final_price
            .map(purchase::FinalPrice::new)
            .transpose()
            .map_err(tracerr::from_and_wrap!(=> E))?;
        let purchase_date = purchase_date
            .map(purchase::check_purchase_date)
            .transpose()
            .map_err(tracerr::from_and_wrap!(=> E))?;
        let status = status
            .map(|s| validation::parse_kind::<purchase::Status>("Status", &s))
            .transpose()
            .map_err(tracerr::from_and_wrap!(=> E))?;
        let payment_method = payment_method
            .map(|m| {
                validation::parse_kind::<purchase::PaymentMethod>(
                    "Payment method",
                    &m,
                )
            })
            .transpose()
            .map_err(tracerr::from_and_wrap!(=> E))?;
        let observations = observations
            .map(purchase::Observations::new)
            .transpose()
            .map_err(tracerr::from_and_wrap!(=> E))?;

        let purchase = self
            .database()
            .execute(Select(By::<Option<Purchase>, _>::new(purchase_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::PurchaseNotExists(purchase_id))
            .map_err(tracerr::wrap!())?;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Lock(By::<CarOffer, _>::new(purchase.car_offer_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Lock(By::<Purchase, _>::new(purchase.id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut purchase = tx
            .execute(Select(By::<Option<Purchase>, _>::new(purchase.id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::PurchaseNotExists(purchase_id))
            .map_err(tracerr::wrap!())?;

        if let Some(price) = final_price {
            purchase.final_price = price;
        }
        if let Some(date) = purchase_date {
            purchase.purchase_date = date;
        }
        if let Some(method) = payment_method {
            purchase.payment_method = method;
        }
        if let Some(observations) = observations {
            purchase.observations = observations;
        }
        let effect = status
            .map(|s| purchase.transit(s))
            .transpose()
            .map_err(tracerr::from_and_wrap!(=> E))?;

        tx.execute(Update(purchase.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        if let Some(effect) = effect {
            let mut offer = tx
                .execute(Select(By::<Option<CarOffer>, _>::new(
                    purchase.car_offer_id,
                )))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
                .ok_or(E::CarOfferNotExists(purchase.car_offer_id))
                .map_err(tracerr::wrap!())?;
            if offer.apply(effect) {
                tx.execute(Update(offer.clone()))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))
                    .map(drop)?;
                log::debug!(
                    "`CarOffer(id: {})` available: {}",
                    offer.id,
                    offer.available,
                );
            }
        }

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(purchase)
    }
}

/// Error of [`UpdatePurchase`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`CarOffer`] of the [`Purchase`] does not exist.
    #[display("Car offer `{_0}` does not exist")]
    CarOfferNotExists(#[error(not(source))] car_offer::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Requested status transition is not allowed.
    #[from]
    IllegalTransition(purchase::IllegalTransition),

    /// Provided data is invalid.
    #[from]
    Invalid(validation::Error),

    /// [`Purchase`] with the provided ID does not exist.
    #[display("Purchase `{_0}` does not exist")]
    PurchaseNotExists(#[error(not(source))] purchase::Id),
}

impl Categorized for ExecutionError {
    fn category(&self) -> Category {
        match self {
            Self::CarOfferNotExists(_) | Self::PurchaseNotExists(_) => {
                Category::NotFound
            }
            Self::Db(e) => e.category(),
            Self::IllegalTransition(_) => Category::StateConflict,
            Self::Invalid(_) => Category::Validation,
        }
    }
}
