//! [`Command`] for activating or deactivating a [`Buyer`].

use common::operations::{
    By, Commit, Lock, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::domain::{CarOffer, Purchase};
use crate::{
    domain::{buyer, Buyer},
    error::{Categorized, Category},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for activating or deactivating a [`Buyer`].
///
/// Only an active [`Buyer`] may make [`Purchase`]s of [`CarOffer`]s.
#[derive(Clone, Copy, Debug)]
pub struct ChangeBuyerActivity {
    /// ID of the [`Buyer`] to change.
    pub buyer_id: buyer::Id,

    /// Whether the [`Buyer`] should become active.
    pub active: bool,
}

impl ChangeBuyerActivity {
    /// Creates a [`ChangeBuyerActivity`] activating the [`Buyer`].
    #[must_use]
    pub fn activate(buyer_id: buyer::Id) -> Self {
        Self {
            buyer_id,
            active: true,
        }
    }

    /// Creates a [`ChangeBuyerActivity`] deactivating the [`Buyer`].
    #[must_use]
    pub fn deactivate(buyer_id: buyer::Id) -> Self {
        Self {
            buyer_id,
            active: false,
        }
    }
}

impl<Db> Command<ChangeBuyerActivity> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Buyer, buyer::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Buyer>, buyer::Id>>,
            Ok = Option<Buyer>,
            Err = Traced<database::Error>,
        > + Database<Update<Buyer>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Buyer;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: ChangeBuyerActivity,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let ChangeBuyerActivity {
            buyer_id,
            active,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Lock(By::new(buyer_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut buyer = tx
            .execute(Select(By::<Option<Buyer>, _>::new(buyer_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::BuyerNotExists(buyer_id))
            .map_err(tracerr::wrap!())?;
        if buyer.active == active {
            return Err(tracerr::new!(if active {
                E::AlreadyActive(buyer_id)
            } else {
                E::AlreadyInactive(buyer_id)
            }));
        }

        buyer.active = active;
        tx.execute(Update(buyer.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        log::debug!("`Buyer(id: {buyer_id})` active: {active}");

        Ok(buyer)
    }
}

/// Error of [`ChangeBuyerActivity`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Buyer`] is already active.
    #[display("Buyer `{_0}` is already active")]
    AlreadyActive(#[error(not(source))] buyer::Id),

    /// [`Buyer`] is already inactive.
    #[display("Buyer `{_0}` is already inactive")]
    AlreadyInactive(#[error(not(source))] buyer::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Buyer`] with the provided ID does not exist.
    #[display("Buyer `{_0}` does not exist")]
    BuyerNotExists(#[error(not(source))] buyer::Id),
}

impl Categorized for ExecutionError {
    fn category(&self) -> Category {
        match self {
            Self::AlreadyActive(_) | Self::AlreadyInactive(_) => {
                Category::BusinessRule
            }
            Self::Db(e) => e.category(),
            Self::BuyerNotExists(_) => Category::NotFound,
        }
    }
}
