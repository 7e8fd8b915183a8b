//! [`Command`] for updating a review of a [`FavoriteCar`].

use common::operations::{
    By, Commit, Lock, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{favorite_car, validation, FavoriteCar},
    error::{Categorized, Category},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for updating the rating and the comment of a [`FavoriteCar`].
///
/// [`None`] fields are left as is, while `Some(None)` clears them.
#[derive(Clone, Debug)]
pub struct UpdateFavoriteCarReview {
    /// ID of the [`FavoriteCar`] to update.
    pub favorite_car_id: favorite_car::Id,

    /// New rating.
    pub rating: Option<Option<i32>>,

    /// New comment.
    pub comment: Option<Option<String>>,
}

impl<Db> Command<UpdateFavoriteCarReview> for Service<Db>
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
        cmd: UpdateFavoriteCarReview,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateFavoriteCarReview {
            favorite_car_id,
            rating,
            comment,
        } = cmd;

        let rating = rating
            .map(|r| r.map(favorite_car::Rating::new).transpose())
            .transpose()
            .map_err(tracerr::from_and_wrap!(=> E))?;
        let comment = comment
            .map(favorite_car::Comment::new)
            .transpose()
            .map_err(tracerr::from_and_wrap!(=> E))?;

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
        if let Some(rating) = rating {
            favorite.rating = rating;
        }
        if let Some(comment) = comment {
            favorite.comment = comment;
        }

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

/// Error of [`UpdateFavoriteCarReview`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`FavoriteCar`] with the provided ID does not exist.
    #[display("Favorite car `{_0}` does not exist")]
    FavoriteCarNotExists(#[error(not(source))] favorite_car::Id),

    /// Provided data is invalid.
    #[from]
    Invalid(validation::Error),
}

impl Categorized for ExecutionError {
    fn category(&self) -> Category {
        match self {
            Self::Db(e) => e.category(),
            Self::FavoriteCarNotExists(_) => Category::NotFound,
            Self::Invalid(_) => Category::Validation,
        }
    }
}
