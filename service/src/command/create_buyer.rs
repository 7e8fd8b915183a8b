//! [`Command`] for creating a new [`Buyer`].

use common::operations::{Commit, Insert, Transact, Transacted};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{buyer, validation, Address, Buyer},
    error::{Categorized, Category},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Buyer`].
#[derive(Clone, Debug)]
pub struct CreateBuyer {
    /// First name of a new [`Buyer`].
    pub first_name: String,

    /// Last name of a new [`Buyer`].
    pub last_name: String,

    /// DNI of a new [`Buyer`].
    pub dni: String,

    /// Address of a new [`Buyer`].
    pub address: String,
}

impl<Db> Command<CreateBuyer> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Insert<Buyer>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Buyer;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateBuyer) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateBuyer {
            first_name,
            last_name,
            dni,
            address,
        } = cmd;

        let buyer = Buyer {
            id: buyer::Id::new(),
            first_name: buyer::FirstName::new(first_name)
                .map_err(tracerr::from_and_wrap!(=> E))?,
            last_name: buyer::LastName::new(last_name)
                .map_err(tracerr::from_and_wrap!(=> E))?,
            dni: buyer::Dni::new(dni).map_err(tracerr::from_and_wrap!(=> E))?,
            address: Address::new(address)
                .map_err(tracerr::from_and_wrap!(=> E))?,
            active: true,
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Insert(buyer.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(buyer)
    }
}

/// Error of [`CreateBuyer`] [`Command`] execution.
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
