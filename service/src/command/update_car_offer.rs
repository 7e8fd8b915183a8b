//! [`Command`] for updating the terms of a [`CarOffer`].

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::Dealership;
use crate::{
    domain::{car_offer, validation, CarOffer},
    error::{Categorized, Category},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for updating the price and notes of a [`CarOffer`].
///
/// Availability of the [`CarOffer`] is never touched.
#[derive(Clone, Debug)]
pub struct UpdateCarOffer {
    /// ID of the [`CarOffer`] to update.
    pub car_offer_id: car_offer::Id,

    /// New price, if it should be changed.
    pub price: Option<Money>,

    /// New notes of the [`Dealership`], if they should be changed.
    ///
    /// `Some(None)` removes the notes.
    pub notes: Option<Option<String>>,
}

impl<Db> Command<UpdateCarOffer> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<CarOffer, car_offer::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<CarOffer>, car_offer::Id>>,
            Ok = Option<CarOffer>,
            Err = Traced<database::Error>,
        > + Database<Update<CarOffer>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = CarOffer;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdateCarOffer,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateCarOffer {
            car_offer_id,
            price,
            notes,
        } = cmd;

        let price = price
            .map(car_offer::Price::new)
            .transpose()
            .map_err(tracerr::from_and_wrap!(=> E))?;
        let notes = notes
            .map(car_offer::Notes::new)
            .transpose()
            .map_err(tracerr::from_and_wrap!(=> E))?;

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
        if let Some(price) = price {
            offer.price = price;
        }
        if let Some(notes) = notes {
            offer.notes = notes;
        }

        tx.execute(Update(offer.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(offer)
    }
}

/// Error of [`UpdateCarOffer`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`CarOffer`] with the provided ID does not exist.
    #[display("Car offer `{_0}` does not exist")]
    CarOfferNotExists(#[error(not(source))] car_offer::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Provided data is invalid.
    #[from]
    Invalid(validation::Error),
}

impl Categorized for ExecutionError {
    fn category(&self) -> Category {
        match self {
            Self::CarOfferNotExists(_) => Category::NotFound,
            Self::Db(e) => e.category(),
            Self::Invalid(_) => Category::Validation,
        }
    }
}
