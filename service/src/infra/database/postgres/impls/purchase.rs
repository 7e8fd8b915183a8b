//! [`Purchase`]-related [`Database`] implementations.

use common::operations::{By, Delete, Insert, Lock, Select, Update};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{buyer, car_offer, purchase, Purchase},
    infra::{
        database::{
            self,
            postgres::{Connection, Tx},
            Postgres,
        },
        Database,
    },
    read,
};

/// Columns of a [`Purchase`] selected by [`from_row()`].
const COLUMNS: &str = "\
    id, buyer_id, car_offer_id, \
    final_price, purchase_date, status, payment_method, observations";

/// Builds a [`Purchase`] out of the provided [`Row`].
fn from_row(row: &Row) -> Purchase {
    Purchase {
        id: row.get("id"),
        buyer_id: row.get("buyer_id"),
        car_offer_id: row.get("car_offer_id"),
        final_price: row.get("final_price"),
        purchase_date: row.get("purchase_date"),
        status: row.get("status"),
        payment_method: row.get("payment_method"),
        observations: row.get("observations"),
    }
}

impl<C> Database<Select<By<Option<Purchase>, purchase::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Purchase>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Purchase>, purchase::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM purchases \
             WHERE id = $1::UUID",
        );
        Ok(self
            .query_opt(&sql, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(from_row))
    }
}

impl<C> Database<Select<By<Option<read::purchase::Active>, car_offer::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<read::purchase::Active>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<read::purchase::Active>, car_offer::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM purchases \
             WHERE car_offer_id = $1::UUID \
               AND status = ANY($2::INT2[]) \
             LIMIT 1",
        );
        let active = [purchase::Status::Pending, purchase::Status::Confirmed];
        Ok(self
            .query_opt(&sql, &[&id, &active.as_slice()])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(from_row)
            .map(read::purchase::Active))
    }
}

impl<C> Database<Select<By<Vec<Purchase>, buyer::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Purchase>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Purchase>, buyer::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM purchases \
             WHERE buyer_id = $1::UUID \
             ORDER BY purchase_date DESC",
        );
        Ok(self
            .query(&sql, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Select<By<Vec<Purchase>, car_offer::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Purchase>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Purchase>, car_offer::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM purchases \
             WHERE car_offer_id = $1::UUID \
             ORDER BY purchase_date DESC",
        );
        Ok(self
            .query(&sql, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Insert<Purchase>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Purchase>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(purchase): Insert<Purchase>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(purchase)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Purchase>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(purchase): Update<Purchase>,
    ) -> Result<Self::Ok, Self::Err> {
        let Purchase {
            id,
            buyer_id,
            car_offer_id,
            final_price,
            purchase_date,
            status,
            payment_method,
            observations,
        } = purchase;

        const SQL: &str = "\
            INSERT INTO purchases (\
                id, buyer_id, car_offer_id, \
                final_price, purchase_date, \
                status, payment_method, observations\
            ) \
            VALUES (\
                $1::UUID, $2::UUID, $3::UUID, \
                $4::NUMERIC, $5::TIMESTAMPTZ, \
                $6::INT2, $7::INT2, $8::VARCHAR\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET final_price = EXCLUDED.final_price, \
                purchase_date = EXCLUDED.purchase_date, \
                status = EXCLUDED.status, \
                payment_method = EXCLUDED.payment_method, \
                observations = EXCLUDED.observations";
        self.exec(
            SQL,
            &[
                &id,
                &buyer_id,
                &car_offer_id,
                &final_price,
                &purchase_date,
                &status,
                &payment_method,
                &observations,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Delete<By<Purchase, purchase::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Purchase, purchase::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM purchases \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl Database<Lock<By<Purchase, purchase::Id>>> for Postgres<Tx> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Purchase, purchase::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM purchases \
            WHERE id = $1::UUID \
            FOR UPDATE";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
