//! [`Command`] for deleting a [`CarOffer`].

use common::operations::{
    By, Commit, Delete, Lock, Select, Transact, Transacted,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::domain::Purchase;
use crate::{
    domain::{car_offer, CarOffer},
    error::{Categorized, Category},
    infra::{database, Database},
    read, Service,
};

use super::Command;

/// [`Command`] for deleting a [`CarOffer`] no [`Purchase`] references.
#[derive(Clone, Copy, Debug)]
pub struct DeleteCarOffer {
    /// ID of the [`CarOffer`] to delete.
    pub car_offer_id: car_offer::Id,
}

impl<Db> Command<DeleteCarOffer> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<CarOffer, car_offer::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<CarOffer>, car_offer::Id>>,
            Ok = Option<CarOffer>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<read::car_offer::IsPurchased, car_offer::Id>>,
            Ok = read::car_offer::IsPurchased,
            Err = Traced<database::Error>,
        > + Database<
            Delete<By<CarOffer, car_offer::Id>>,
            Err = Traced<database::Error>,
        > + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = CarOffer;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: DeleteCarOffer,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteCarOffer { car_offer_id } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Lock(By::new(car_offer_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let offer = tx
            .execute(Select(By::<Option<CarOffer>, _>::new(car_offer_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::CarOfferNotExists(car_offer_id))
            .map_err(tracerr::wrap!())?;

        let purchased = tx
            .execute(Select(By::<read::car_offer::IsPurchased, _>::new(
                offer.id,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if *purchased {
            return Err(tracerr::new!(E::CarOfferPurchased(offer.id)));
        }

        tx.execute(Delete(By::<CarOffer, _>::new(offer.id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        log::debug!("`CarOffer(id: {car_offer_id})` deleted");

        Ok(offer)
    }
}

/// Error of [`DeleteCarOffer`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`CarOffer`] with the provided ID does not exist.
    #[display("Car offer `{_0}` does not exist")]
    CarOfferNotExists(#[error(not(source))] car_offer::Id),

    /// [`CarOffer`] is referenced by a [`Purchase`].
    #[display("Car offer `{_0}` has purchases and cannot be deleted")]
    CarOfferPurchased(#[error(not(source))] car_offer::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),
}

impl Categorized for ExecutionError {
    fn category(&self) -> Category {
        match self {
            Self::CarOfferNotExists(_) => Category::NotFound,
            Self::CarOfferPurchased(_) => Category::BusinessRule,
            Self::Db(e) => e.category(),
        }
    }
}
