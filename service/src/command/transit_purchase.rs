//! [`Command`] for moving a [`Purchase`] through its lifecycle.

use common::operations::{
    By, Commit, Lock, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{car_offer, purchase, CarOffer, Purchase},
    error::{Categorized, Category},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for moving a [`Purchase`] into another [`purchase::Status`],
/// synchronizing availability of the purchased [`CarOffer`].
#[derive(Clone, Copy, Debug)]
pub struct TransitPurchase {
    /// ID of the [`Purchase`] to move.
    pub purchase_id: purchase::Id,

    /// [`purchase::Status`] to move the [`Purchase`] into.
    pub status: purchase::Status,
}

impl TransitPurchase {
    /// Creates a [`TransitPurchase`] confirming the [`Purchase`].
    #[must_use]
    pub fn confirm(purchase_id: purchase::Id) -> Self {
        Self {
            purchase_id,
            status: purchase::Status::Confirmed,
        }
    }

    /// Creates a [`TransitPurchase`] cancelling the [`Purchase`].
    #[must_use]
    pub fn cancel(purchase_id: purchase::Id) -> Self {
        Self {
            purchase_id,
            status: purchase::Status::Cancelled,
        }
    }

    /// Creates a [`TransitPurchase`] delivering the [`Purchase`].
    #[must_use]
    pub fn deliver(purchase_id: purchase::Id) -> Self {
        Self {
            purchase_id,
            status: purchase::Status::Delivered,
        }
    }

    /// Creates a [`TransitPurchase`] reverting the [`Purchase`] to
    /// [`purchase::Status::Pending`].
    #[must_use]
    pub fn revert_to_pending(purchase_id: purchase::Id) -> Self {
        Self {
            purchase_id,
            status: purchase::Status::Pending,
        }
    }
}

impl<Db> Command<TransitPurchase> for Service<Db>
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
        cmd: TransitPurchase,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let TransitPurchase {
            purchase_id,
            status,
        } = cmd;

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

        // `CarOffer` goes first, the same way `Purchase` creation locks it.
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
        let mut offer = tx
            .execute(Select(By::<Option<CarOffer>, _>::new(
                purchase.car_offer_id,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::CarOfferNotExists(purchase.car_offer_id))
            .map_err(tracerr::wrap!())?;

        let from = purchase.status;
        let effect = purchase
            .transit(status)
            .map_err(tracerr::from_and_wrap!(=> E))?;
        tx.execute(Update(purchase.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        if offer.apply(effect) {
            tx.execute(Update(offer.clone()))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
        }

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        log::debug!(
            "`Purchase(id: {purchase_id})` moved from {from} to {status}, \
             `CarOffer(id: {})` available: {}",
            offer.id,
            offer.available,
        );

        Ok(purchase)
    }
}

/// Error of [`TransitPurchase`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`CarOffer`] of the [`Purchase`] does not exist.
    #[display("Car offer `{_0}` does not exist")]
    CarOfferNotExists(#[error(not(source))] car_offer::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Requested transition is not allowed.
    #[from]
    IllegalTransition(purchase::IllegalTransition),

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
        }
    }
}
