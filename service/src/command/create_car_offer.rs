//! [`Command`] for publishing a new [`CarOffer`].

use common::{
    operations::{By, Commit, Insert, Lock, Select, Transact, Transacted},
    DateTime, Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{
        car, car_offer, dealership, validation, Car, CarOffer, Dealership,
        Eligible as _,
    },
    error::{Categorized, Category},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for publishing a new [`CarOffer`].
#[derive(Clone, Debug)]
pub struct CreateCarOffer {
    /// ID of the [`Car`] to offer.
    pub car_id: car::Id,

    /// ID of the [`Dealership`] publishing the [`CarOffer`].
    pub dealership_id: dealership::Id,

    /// Price of a new [`CarOffer`].
    pub price: Money,

    /// Notes of the [`Dealership`], if any.
    pub notes: Option<String>,

    /// [`DateTime`] of a new [`CarOffer`].
    ///
    /// [`DateTime::now()`] is used if [`None`].
    pub offer_date: Option<car_offer::OfferDateTime>,
}

impl<Db> Command<CreateCarOffer> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Car>, car::Id>>,
            Ok = Option<Car>,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>:
        Database<Lock<By<Car, car::Id>>, Err = Traced<database::Error>>
        + Database<
            Lock<By<Dealership, dealership::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Dealership>, dealership::Id>>,
            Ok = Option<Dealership>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<CarOffer>, (car::Id, dealership::Id)>>,
            Ok = Option<CarOffer>,
            Err = Traced<database::Error>,
        > + Database<Insert<CarOffer>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = CarOffer;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateCarOffer,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateCarOffer {
            car_id,
            dealership_id,
            price,
            notes,
            offer_date,
        } = cmd;

        let price = car_offer::Price::new(price)
            .map_err(tracerr::from_and_wrap!(=> E))?;
        let notes = car_offer::Notes::new(notes)
            .map_err(tracerr::from_and_wrap!(=> E))?;
        let offer_date = car_offer::check_offer_date(
            offer_date.unwrap_or_else(|| DateTime::now().coerce()),
            self.config().offer_date_tolerance,
        )
        .map_err(tracerr::from_and_wrap!(=> E))?;

        let car = self
            .database()
            .execute(Select(By::<Option<Car>, _>::new(car_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::CarNotExists(car_id))
            .map_err(tracerr::wrap!())?;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent offers of the same `Car`, and keep the
        // `Dealership` from being deactivated until the `CarOffer` is stored.
        tx.execute(Lock(By::<Car, _>::new(car.id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Lock(By::<Dealership, _>::new(dealership_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let dealership = tx
            .execute(Select(By::<Option<Dealership>, _>::new(dealership_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::DealershipNotExists(dealership_id))
            .map_err(tracerr::wrap!())?;
        if !dealership.is_eligible() {
            return Err(tracerr::new!(E::DealershipInactive(dealership_id)));
        }

        let existing = tx
            .execute(Select(By::<Option<CarOffer>, _>::new((
                car.id,
                dealership.id,
            ))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if existing.is_some() {
            return Err(tracerr::new!(E::AlreadyOffered));
        }

        let offer = CarOffer {
            id: car_offer::Id::new(),
            car_id: car.id,
            dealership_id: dealership.id,
            price,
            offer_date,
            notes,
            available: true,
        };
        tx.execute(Insert(offer.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        log::debug!(
            "`CarOffer(id: {})` published for `Car(id: {})` by \
             `Dealership(id: {})`",
            offer.id,
            offer.car_id,
            offer.dealership_id,
        );

        Ok(offer)
    }
}

/// Error of [`CreateCarOffer`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Dealership`] has already offered the [`Car`].
    #[display("Dealership already has an offer for this car")]
    AlreadyOffered,

    /// [`Car`] with the provided ID does not exist.
    #[display("Car `{_0}` does not exist")]
    CarNotExists(#[error(not(source))] car::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Dealership`] is not active.
    #[display("Dealership `{_0}` is not active")]
    DealershipInactive(#[error(not(source))] dealership::Id),

    /// [`Dealership`] with the provided ID does not exist.
    #[display("Dealership `{_0}` does not exist")]
    DealershipNotExists(#[error(not(source))] dealership::Id),

    /// Provided data is invalid.
    #[from]
    Invalid(validation::Error),
}

impl Categorized for ExecutionError {
    fn category(&self) -> Category {
        match self {
            Self::AlreadyOffered => Category::DuplicateOffer,
            Self::CarNotExists(_) | Self::DealershipNotExists(_) => {
                Category::NotFound
            }
            Self::Db(e) => e.category(),
            Self::DealershipInactive(_) | Self::Invalid(_) => {
                Category::Validation
            }
        }
    }
}
