//! [`Command`] for switching price notifications of a [`FavoriteCar`].

use common::operations::{
    By, Commit, Lock, Select, Transact, Transacted, Update,
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

/// [`Command`] for switching price notifications of a [`FavoriteCar`].
#[derive(Clone, Copy, Debug)]
pub struct SetFavoriteCarNotifications {
    /// ID of the [`FavoriteCar`] to change.
    pub favorite_car_id: favorite_car::Id,

    /// Whether price notifications should be sent.
    pub enabled: bool,
}

impl SetFavoriteCarNotifications {
    /// Creates a [`SetFavoriteCarNotifications`] enabling notifications.
    #[must_use]
    pub fn enable(favorite_car_id: favorite_car::Id) -> Self {
        Self {
            favorite_car_id,
            enabled: true,
        }
    }

    /// Creates a [`SetFavoriteCarNotifications`] disabling notifications.
    #[must_use]
    pub fn disable(favorite_car_id: favorite_car::Id) -> Self {
        Self {
            favorite_car_id,
            enabled: false,
        }
    }
}

impl<Db> Command<SetFavoriteCarNotifications> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<FavoriteCar, favorite_car::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<FavoriteCar>, favorite_car::Id>>,
            Ok = Option<FavoriteCar>,
            Err = Traced<database::Error>,
        > + Database<Update<FavoriteCar>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = FavoriteCar;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: SetFavoriteCarNotifications,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let SetFavoriteCarNotifications {
            favorite_car_id,
            enabled,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Lock(By::new(favorite_car_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut favorite = tx
            .execute(Select(By::<Option<FavoriteCar>, _>::new(
                favorite_car_id,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::FavoriteCarNotExists(favorite_car_id))
            .map_err(tracerr::wrap!())?;
        favorite.price_notifications = enabled;

        tx.execute(Update(favorite.clone()))
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

/// Error of [`SetFavoriteCarNotifications`] [`Command`] execution.
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
