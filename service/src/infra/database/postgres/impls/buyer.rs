//! [`Buyer`]-related [`Database`] implementations.

use common::operations::{By, Insert, Lock, Select, Update};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{buyer, Buyer},
    infra::{
        database::{
            self,
            postgres::{Connection, Tx},
            Postgres,
        },
        Database,
    },
};

/// Builds a [`Buyer`] out of the provided [`Row`].
fn from_row(row: &Row) -> Buyer {
    Buyer {
        id: row.get("id"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        dni: row.get("dni"),
        address: row.get("address"),
        active: row.get("active"),
    }
}

impl<C> Database<Select<By<Option<Buyer>, buyer::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Buyer>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Buyer>, buyer::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        const SQL: &str = "\
            SELECT id, first_name, last_name, dni, address, active \
            FROM buyers \
            WHERE id = $1::UUID";
        Ok(self
            .query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(from_row))
    }
}

impl<C> Database<Insert<Buyer>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Buyer>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(buyer): Insert<Buyer>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(buyer)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Buyer>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(buyer): Update<Buyer>,
    ) -> Result<Self::Ok, Self::Err> {
        let Buyer {
            id,
            first_name,
            last_name,
            dni,
            address,
            active,
        } = buyer;

        const SQL: &str = "\
            INSERT INTO buyers (\
                id, first_name, last_name, dni, address, active\
            ) \
            VALUES (\
                $1::UUID, \
                $2::VARCHAR, $3::VARCHAR, \
                $4::VARCHAR, $5::VARCHAR, \
                $6::BOOLEAN\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET first_name = EXCLUDED.first_name, \
                last_name = EXCLUDED.last_name, \
                dni = EXCLUDED.dni, \
                address = EXCLUDED.address, \
                active = EXCLUDED.active";
        self.exec(
            SQL,
            &[&id, &first_name, &last_name, &dni, &address, &active],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl Database<Lock<By<Buyer, buyer::Id>>> for Postgres<Tx> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Buyer, buyer::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM buyers \
            WHERE id = $1::UUID \
            FOR UPDATE";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
