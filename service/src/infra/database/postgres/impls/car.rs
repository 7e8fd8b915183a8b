//! [`Car`]-related [`Database`] implementations.

use common::operations::{By, Insert, Lock, Select, Update};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{car, Car},
    infra::{
        database::{
            self,
            postgres::{Connection, Tx},
            Postgres,
        },
        Database,
    },
};

/// Builds a [`Car`] out of the provided [`Row`].
fn from_row(row: &Row) -> Car {
    Car {
        id: row.get("id"),
        brand: row.get("brand"),
        model: row.get("model"),
        year: row.get("year"),
        color: row.get("color"),
        fuel_type: row.get("fuel_type"),
        transmission: row.get("transmission"),
        description: row.get("description"),
        image_urls: row.get("image_urls"),
    }
}

impl<C> Database<Select<By<Option<Car>, car::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Car>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Car>, car::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        const SQL: &str = "\
            SELECT id, brand, model, year, color, \
                   fuel_type, transmission, \
                   description, image_urls \
            FROM cars \
            WHERE id = $1::UUID";
        Ok(self
            .query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(from_row))
    }
}

impl<C> Database<Insert<Car>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Car>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(car): Insert<Car>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(car)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Car>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(car): Update<Car>,
    ) -> Result<Self::Ok, Self::Err> {
        let Car {
            id,
            brand,
            model,
            year,
            color,
            fuel_type,
            transmission,
            description,
            image_urls,
        } = car;

        const SQL: &str = "\
            INSERT INTO cars (\
                id, brand, model, year, color, \
                fuel_type, transmission, \
                description, image_urls\
            ) \
            VALUES (\
                $1::UUID, \
                $2::VARCHAR, $3::VARCHAR, $4::INT4, $5::VARCHAR, \
                $6::INT2, $7::INT2, \
                $8::VARCHAR, $9::TEXT[]\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET brand = EXCLUDED.brand, \
                model = EXCLUDED.model, \
                year = EXCLUDED.year, \
                color = EXCLUDED.color, \
                fuel_type = EXCLUDED.fuel_type, \
                transmission = EXCLUDED.transmission, \
                description = EXCLUDED.description, \
                image_urls = EXCLUDED.image_urls";
        self.exec(
            SQL,
            &[
                &id,
                &brand,
                &model,
                &year,
                &color,
                &fuel_type,
                &transmission,
                &description,
                &image_urls,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl Database<Lock<By<Car, car::Id>>> for Postgres<Tx> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Car, car::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM cars \
            WHERE id = $1::UUID \
            FOR UPDATE";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
