//! [`Command`] for deleting a [`Purchase`].

use common::operations::{
    By, Commit, Delete, Lock, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{car_offer, purchase, CarOffer, Purchase},
    error::{Categorized, Category},
    infra::{database, Database},
    read, Service,
};

use super::Command;

/// [`Command`] for deleting a [`Purchase`].
///
/// The purchased [`CarOffer`] becomes available again, unless another active
/// [`Purchase`] holds it.
#[derive(Clone, Copy, Debug)]
pub struct DeletePurchase {
    /// ID of the [`Purchase`] to delete.
    pub purchase_id: purchase::Id,
}

impl<Db> Command<DeletePurchase> for Service<Db>
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
        > + Database<
            Select<By<Option<read::purchase::Active>, car_offer::Id>>,
            Ok = Option<read::purchase::Active>,
            Err = Traced<database::Error>,
        > + Database<
            Delete<By<Purchase, purchase::Id>>,
            Err = Traced<database::Error>,
        > + Database<Update<CarOffer>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Purchase;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: DeletePurchase,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeletePurchase { purchase_id } = cmd;

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

        let purchase = tx
            .execute(Select(By::<Option<Purchase>, _>::new(purchase.id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::PurchaseNotExists(purchase_id))
            .map_err(tracerr::wrap!())?;

        tx.execute(Delete(By::<Purchase, _>::new(purchase.id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let held = tx
            .execute(Select(By::<Option<read::purchase::Active>, _>::new(
                purchase.car_offer_id,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if held.is_none() {
            let offer = tx
                .execute(Select(By::<Option<CarOffer>, _>::new(
                    purchase.car_offer_id,
                )))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            if let Some(mut offer) = offer {
                if offer.apply(purchase::OfferEffect::MarkAvailable) {
                    tx.execute(Update(offer))
                        .await
                        .map_err(tracerr::map_from_and_wrap!(=> E))
                        .map(drop)?;
                    log::debug!(
                        "`CarOffer(id: {})` is available again",
                        purchase.car_offer_id,
                    );
                }
            }
        }

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        log::debug!("`Purchase(id: {purchase_id})` deleted");

        Ok(purchase)
    }
}

/// Error of [`DeletePurchase`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Purchase`] with the provided ID does not exist.
    #[display("Purchase `{_0}` does not exist")]
    PurchaseNotExists(#[error(not(source))] purchase::Id),
}

impl Categorized for ExecutionError {
    fn category(&self) -> Category {
        match self {
            Self::Db(e) => e.category(),
            Self::PurchaseNotExists(_) => Category::NotFound,
        }
    }
}
