//! [`Command`] for adding a [`Car`] to the favorites of a [`Buyer`].

use common::{
    operations::{By, Commit, Insert, Lock, Select, Transact, Transacted},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{buyer, car, favorite_car, validation, Buyer, Car, FavoriteCar},
    error::{Categorized, Category},
    infra::{database, Database},
    Service,
};

use super::Command;

/// Name of the constraint allowing a single [`FavoriteCar`] per [`Buyer`] and
/// [`Car`].
const BUYER_CAR_CONSTRAINT: &str = "favorite_cars_buyer_car_uniq";

/// [`Command`] for adding a [`Car`] to the favorites of a [`Buyer`].
#[derive(Clone, Debug)]
pub struct SaveFavoriteCar {
    /// ID of the [`Buyer`] favoriting the [`Car`].
    pub buyer_id: buyer::Id,

    /// ID of the [`Car`] to favorite.
    pub car_id: car::Id,

    /// Rating of the [`Car`], if any.
    pub rating: Option<i32>,

    /// Comment on the [`Car`], if any.
    pub comment: Option<String>,

    /// [`DateTime`] of adding the [`Car`].
    ///
    /// [`DateTime::now()`] is used if [`None`].
    pub date_added: Option<favorite_car::AdditionDateTime>,

    /// Whether the [`Buyer`] wants to be notified about price changes.
    pub price_notifications: bool,
}

impl<Db> Command<SaveFavoriteCar> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Buyer>, buyer::Id>>,
            Ok = Option<Buyer>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Car>, car::Id>>,
            Ok = Option<Car>,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<
            Lock<By<Buyer, buyer::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<FavoriteCar>, (buyer::Id, car::Id)>>,
            Ok = Option<FavoriteCar>,
            Err = Traced<database::Error>,
        > + Database<Insert<FavoriteCar>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = FavoriteCar;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: SaveFavoriteCar,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let SaveFavoriteCar {
            buyer_id,
            car_id,
            rating,
            comment,
            date_added,
            price_notifications,
        } = cmd;

        let rating = rating
            .map(favorite_car::Rating::new)
            .transpose()
            .map_err(tracerr::from_and_wrap!(=> E))?;
        let comment = favorite_car::Comment::new(comment)
            .map_err(tracerr::from_and_wrap!(=> E))?;
        let date_added = favorite_car::check_date_added(
            date_added.unwrap_or_else(|| DateTime::now().coerce()),
        )
        .map_err(tracerr::from_and_wrap!(=> E))?;

        let buyer = self
            .database()
            .execute(Select(By::<Option<Buyer>, _>::new(buyer_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::BuyerNotExists(buyer_id))
            .map_err(tracerr::wrap!())?;

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

        // Avoid concurrent favoriting by the same `Buyer`.
        tx.execute(Lock(By::<Buyer, _>::new(buyer.id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let existing = tx
            .execute(Select(By::<Option<FavoriteCar>, _>::new((
                buyer.id, car.id,
            ))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if existing.is_some() {
            return Err(tracerr::new!(E::AlreadyFavorite));
        }

        let favorite = FavoriteCar {
            id: favorite_car::Id::new(),
            buyer_id: buyer.id,
            car_id: car.id,
            rating,
            comment,
            date_added,
            price_notifications,
        };
        tx.execute(Insert(favorite.clone()))
            .await
            .map_err(|e| {
                if e.as_ref().is_unique_violation(Some(BUYER_CAR_CONSTRAINT)) {
                    tracerr::new!(E::AlreadyFavorite)
                } else {
                    tracerr::map_from_and_wrap!(=> E)(e)
                }
            })
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        log::debug!(
            "`Car(id: {car_id})` added to favorites of `Buyer(id: {buyer_id})`",
        );

        Ok(favorite)
    }
}

/// Error of [`SaveFavoriteCar`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Buyer`] has already favorited the [`Car`].
    #[display("Car is already in favorites")]
    AlreadyFavorite,

    /// [`Buyer`] with the provided ID does not exist.
    #[display("Buyer `{_0}` does not exist")]
    BuyerNotExists(#[error(not(source))] buyer::Id),

    /// [`Car`] with the provided ID does not exist.
    #[display("Car `{_0}` does not exist")]
    CarNotExists(#[error(not(source))] car::Id),

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
            Self::AlreadyFavorite => Category::DuplicateFavorite,
            Self::BuyerNotExists(_) | Self::CarNotExists(_) => {
                Category::NotFound
            }
            Self::Db(e) => e.category(),
            Self::Invalid(_) => Category::Validation,
        }
    }
}
