//! [`Command`] for adding a new [`Car`] to the catalog.

use common::operations::{Commit, Insert, Transact, Transacted};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{car, validation, Car},
    error::{Categorized, Category},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for adding a new [`Car`] to the catalog.
#[derive(Clone, Debug)]
pub struct CreateCar {
    /// Brand of a new [`Car`].
    pub brand: String,

    /// Model of a new [`Car`].
    pub model: String,

    /// Manufacturing year of a new [`Car`].
    pub year: i32,

    /// Color of a new [`Car`].
    pub color: String,

    /// [`car::FuelType`] of a new [`Car`], as its variant name.
    pub fuel_type: String,

    /// [`car::Transmission`] of a new [`Car`], as its variant name.
    pub transmission: String,

    /// Description of a new [`Car`], if any.
    pub description: Option<String>,

    /// Image URLs of a new [`Car`].
    pub image_urls: Vec<String>,
}

impl<Db> Command<CreateCar> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Insert<Car>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Car;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateCar) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateCar {
            brand,
            model,
            year,
            color,
            fuel_type,
            transmission,
            description,
            image_urls,
        } = cmd;

        let car = Car {
            id: car::Id::new(),
            brand: car::Brand::new(brand)
                .map_err(tracerr::from_and_wrap!(=> E))?,
            model: car::Model::new(model)
                .map_err(tracerr::from_and_wrap!(=> E))?,
            year: car::Year::new(year).map_err(tracerr::from_and_wrap!(=> E))?,
            color: car::Color::new(color)
                .map_err(tracerr::from_and_wrap!(=> E))?,
            fuel_type: validation::parse_kind("Fuel type", &fuel_type)
                .map_err(tracerr::from_and_wrap!(=> E))?,
            transmission: validation::parse_kind(
                "Transmission",
                &transmission,
            )
            .map_err(tracerr::from_and_wrap!(=> E))?,
            description: car::Description::new(description)
                .map_err(tracerr::from_and_wrap!(=> E))?,
            image_urls: image_urls
                .into_iter()
                .map(car::ImageUrl::new)
                .collect::<Result<Vec<_>, _>>()
                .map_err(tracerr::from_and_wrap!(=> E))?,
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Insert(car.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(car)
    }
}

/// Error of [`CreateCar`] [`Command`] execution.
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
