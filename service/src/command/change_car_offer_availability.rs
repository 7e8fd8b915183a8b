//! [`Command`] for marking a [`CarOffer`] available or unavailable.

use common::operations::{
    By, Commit, Lock, Select, Transact, Transacted, Update,
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

/// [`Command`] for marking a [`CarOffer`] available or unavailable.
///
/// Setting the already present availability is not an error.
#[derive(Clone, Copy, Debug)]
pub struct ChangeCarOfferAvailability {
    /// ID of the [`CarOffer`] to change.
    pub car_offer_id: car_offer::Id,

    /// Whether the [`CarOffer`] should become available.
    pub available: bool,
}

impl ChangeCarOfferAvailability {
    /// Creates a [`ChangeCarOfferAvailability`] marking the [`CarOffer`]
    /// available.
    #[must_use]
    pub fn mark_available(car_offer_id: car_offer::Id) -> Self {
        Self {
            car_offer_id,
            available: true,
        }
    }

    /// Creates a [`ChangeCarOfferAvailability`] marking the [`CarOffer`]
    /// unavailable.
    #[must_use]
    pub fn mark_unavailable(car_offer_id: car_offer::Id) -> Self {
        Self {
            car_offer_id,
            available: false,
        }
    }
}

impl<Db> Command<ChangeCarOfferAvailability> for Service<Db>
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
            Select<By<Option<read::purchase::Active>, car_offer::Id>>,
            Ok = Option<read::purchase::Active>,
            Err = Traced<database::Error>,
        > + Database<Update<CarOffer>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = CarOffer;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: ChangeCarOfferAvailability,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let ChangeCarOfferAvailability {
            car_offer_id,
            available,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Lock(By::new(car_offer_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut offer = tx
            .execute(Select(By::<Option<CarOffer>, _>::new(car_offer_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::CarOfferNotExists(car_offer_id))
            .map_err(tracerr::wrap!())?;

        // Availability of a held `CarOffer` follows its `Purchase`.
        if available {
            let held = tx
                .execute(Select(
                    By::<Option<read::purchase::Active>, _>::new(offer.id),
                ))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            if held.is_some() {
                return Err(tracerr::new!(E::CarOfferHeld(offer.id)));
            }
        }

        offer.available = available;
        tx.execute(Update(offer.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        log::debug!("`CarOffer(id: {car_offer_id})` available: {available}");

        Ok(offer)
    }
}

/// Error of [`ChangeCarOfferAvailability`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`CarOffer`] is held by an active [`Purchase`].
    #[display("Car offer `{_0}` is held by an active purchase")]
    CarOfferHeld(#[error(not(source))] car_offer::Id),

    /// [`CarOffer`] with the provided ID does not exist.
    #[display("Car offer `{_0}` does not exist")]
    CarOfferNotExists(#[error(not(source))] car_offer::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),
}

impl Categorized for ExecutionError {
    fn category(&self) -> Category {
        match self {
            Self::CarOfferHeld(_) => Category::BusinessRule,
            Self::CarOfferNotExists(_) => Category::NotFound,
            Self::Db(e) => e.category(),
        }
    }
}
