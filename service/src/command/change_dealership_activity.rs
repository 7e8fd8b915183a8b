//! [`Command`] for activating or deactivating a [`Dealership`].

use common::operations::{
    By, Commit, Lock, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::domain::CarOffer;
use crate::{
    domain::{dealership, Dealership},
    error::{Categorized, Category},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for activating or deactivating a [`Dealership`].
///
/// Only an active [`Dealership`] may publish [`CarOffer`]s and have them
/// purchased.
#[derive(Clone, Copy, Debug)]
pub struct ChangeDealershipActivity {
    /// ID of the [`Dealership`] to change.
    pub dealership_id: dealership::Id,

    /// Whether the [`Dealership`] should become active.
    pub active: bool,
}

impl ChangeDealershipActivity {
    /// Creates a [`ChangeDealershipActivity`] activating the [`Dealership`].
    #[must_use]
    pub fn activate(dealership_id: dealership::Id) -> Self {
        Self {
            dealership_id,
            active: true,
        }
    }

    /// Creates a [`ChangeDealershipActivity`] deactivating the
    /// [`Dealership`].
    #[must_use]
    pub fn deactivate(dealership_id: dealership::Id) -> Self {
        Self {
            dealership_id,
            active: false,
        }
    }
}

impl<Db> Command<ChangeDealershipActivity> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Dealership, dealership::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Dealership>, dealership::Id>>,
            Ok = Option<Dealership>,
            Err = Traced<database::Error>,
        > + Database<Update<Dealership>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Dealership;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: ChangeDealershipActivity,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let ChangeDealershipActivity {
            dealership_id,
            active,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Lock(By::new(dealership_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut dealership = tx
            .execute(Select(By::<Option<Dealership>, _>::new(dealership_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::DealershipNotExists(dealership_id))
            .map_err(tracerr::wrap!())?;
        if dealership.active == active {
            return Err(tracerr::new!(if active {
                E::AlreadyActive(dealership_id)
            } else {
                E::AlreadyInactive(dealership_id)
            }));
        }

        dealership.active = active;
        tx.execute(Update(dealership.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        log::debug!("`Dealership(id: {dealership_id})` active: {active}");

        Ok(dealership)
    }
}

/// Error of [`ChangeDealershipActivity`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Dealership`] is already active.
    #[display("Dealership `{_0}` is already active")]
    AlreadyActive(#[error(not(source))] dealership::Id),

    /// [`Dealership`] is already inactive.
    #[display("Dealership `{_0}` is already inactive")]
    AlreadyInactive(#[error(not(source))] dealership::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Dealership`] with the provided ID does not exist.
    #[display("Dealership `{_0}` does not exist")]
    DealershipNotExists(#[error(not(source))] dealership::Id),
}

impl Categorized for ExecutionError {
    fn category(&self) -> Category {
        match self {
            Self::AlreadyActive(_) | Self::AlreadyInactive(_) => {
                Category::BusinessRule
            }
            Self::Db(e) => e.category(),
            Self::DealershipNotExists(_) => Category::NotFound,
        }
    }
}
