//! [`Dealership`]-related [`Database`] implementations.

use common::operations::{By, Insert, Lock, Select, Update};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{dealership, Dealership},
    infra::{
        database::{
            self,
            postgres::{Connection, Tx},
            Postgres,
        },
        Database,
    },
};

/// Builds a [`Dealership`] out of the provided [`Row`].
fn from_row(row: &Row) -> Dealership {
    Dealership {
        id: row.get("id"),
        name: row.get("name"),
        cuit: row.get("cuit"),
        address: row.get("address"),
        active: row.get("active"),
    }
}

impl<C> Database<Select<By<Option<Dealership>, dealership::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Dealership>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Dealership>, dealership::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        const SQL: &str = "\
            SELECT id, name, cuit, address, active \
            FROM dealerships \
            WHERE id = $1::UUID";
        Ok(self
            .query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(from_row))
    }
}

impl<C> Database<Insert<Dealership>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Update<Dealership>,
        Ok = (),
        Err = Traced<database::Error>,
    >,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(dealership): Insert<Dealership>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(dealership))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Dealership>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(dealership): Update<Dealership>,
    ) -> Result<Self::Ok, Self::Err> {
        let Dealership {
            id,
            name,
            cuit,
            address,
            active,
        } = dealership;

        const SQL: &str = "\
            INSERT INTO dealerships (\
                id, name, cuit, address, active\
            ) \
            VALUES (\
                $1::UUID, \
                $2::VARCHAR, $3::VARCHAR, $4::VARCHAR, \
                $5::BOOLEAN\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET name = EXCLUDED.name, \
                cuit = EXCLUDED.cuit, \
                address = EXCLUDED.address, \
                active = EXCLUDED.active";
        self.exec(SQL, &[&id, &name, &cuit, &address, &active])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl Database<Lock<By<Dealership, dealership::Id>>> for Postgres<Tx> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Dealership, dealership::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM dealerships \
            WHERE id = $1::UUID \
            FOR UPDATE";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
