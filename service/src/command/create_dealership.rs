//! [`Command`] for creating a new [`Dealership`].

use common::operations::{Commit, Insert, Transact, Transacted};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{dealership, validation, Address, Dealership},
    error::{Categorized, Category},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Dealership`].
#[derive(Clone, Debug)]
pub struct CreateDealership {
    /// Name of a new [`Dealership`].
    pub name: String,

    /// CUIT of a new [`Dealership`].
    pub cuit: String,

    /// Address of a new [`Dealership`].
    pub address: String,
}

impl<Db> Command<CreateDealership> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Insert<Dealership>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Dealership;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateDealership,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateDealership {
            name,
            cuit,
            address,
        } = cmd;

        let dealership = Dealership {
            id: dealership::Id::new(),
            name: dealership::Name::new(name)
                .map_err(tracerr::from_and_wrap!(=> E))?,
            cuit: dealership::Cuit::new(cuit)
                .map_err(tracerr::from_and_wrap!(=> E))?,
            address: Address::new(address)
                .map_err(tracerr::from_and_wrap!(=> E))?,
            active: true,
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Insert(dealership.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(dealership)
    }
}

/// Error of [`CreateDealership`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
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
            Self::Db(e) => e.category(),
            Self::Invalid(_) => Category::Validation,
        }
    }
}
