//! [`Command`] for removing a [`FavoriteCar`].

use common::operations::{
    By, Commit, Delete, Lock, Select, Transact, Transacted,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{favorite_car, FavoriteCar},
    error::{Categorized, Category},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for removing a [`FavoriteCar`].
#[derive(Clone, Copy, Debug)]
pub struct DeleteFavoriteCar {
    /// ID of the [`FavoriteCar`] to remove.
    pub favorite_car_id: favorite_car::Id,
}

impl<Db> Command<DeleteFavoriteCar> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<FavoriteCar, favorite_car::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<FavoriteCar>, favorite_car::Id>>,
            Ok = Option<FavoriteCar>,
            Err = Traced<database::Error>,
        > + Database<
            Delete<By<FavoriteCar, favorite_car::Id>>,
            Err = Traced<database::Error>,
        > + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = FavoriteCar;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: DeleteFavoriteCar,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteFavoriteCar { favorite_car_id } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Lock(By::new(favorite_car_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let favorite = tx
            .execute(Select(By::<Option<FavoriteCar>, _>::new(
                favorite_car_id,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::FavoriteCarNotExists(favorite_car_id))
            .map_err(tracerr::wrap!())?;

        tx.execute(Delete(By::<FavoriteCar, _>::new(favorite.id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(favorite)
    }
}

/// Error of [`DeleteFavoriteCar`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`FavoriteCar`] with the provided ID does not exist.
    #[display("Favorite car `{_0}` does not exist")]
    FavoriteCarNotExists(#[error(not(source))] favorite_car::Id),
}

impl Categorized for ExecutionError {
    fn category(&self) -> Category {
        match self {
            Self::Db(e) => e.category(),
            Self::FavoriteCarNotExists(_) => Category::NotFound,
        }
    }
}
