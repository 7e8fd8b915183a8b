//! [`CarOffer`]-related [`Database`] implementations.

use common::operations::{By, Delete, Insert, Lock, Select, Update};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{car, car_offer, dealership, CarOffer},
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

/// Columns of a [`CarOffer`] selected by [`from_row()`].
const COLUMNS: &str = "\
    id, car_id, dealership_id, \
    price, offer_date, notes, available";

/// Builds a [`CarOffer`] out of the provided [`Row`].
fn from_row(row: &Row) -> CarOffer {
    CarOffer {
        id: row.get("id"),
        car_id: row.get("car_id"),
        dealership_id: row.get("dealership_id"),
        price: row.get("price"),
        offer_date: row.get("offer_date"),
        notes: row.get("notes"),
        available: row.get("available"),
    }
}

impl<C> Database<Select<By<Option<CarOffer>, car_offer::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<CarOffer>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<CarOffer>, car_offer::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM car_offers \
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

impl<C> Database<Select<By<Option<CarOffer>, (car::Id, dealership::Id)>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<CarOffer>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<CarOffer>, (car::Id, dealership::Id)>>,
    ) -> Result<Self::Ok, Self::Err> {
        let (car_id, dealership_id) = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM car_offers \
             WHERE car_id = $1::UUID \
               AND dealership_id = $2::UUID \
             LIMIT 1",
        );
        Ok(self
            .query_opt(&sql, &[&car_id, &dealership_id])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(from_row))
    }
}

impl<C> Database<Select<By<Vec<CarOffer>, read::car_offer::Available>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<CarOffer>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<CarOffer>, read::car_offer::Available>>,
    ) -> Result<Self::Ok, Self::Err> {
        let sql = format!(
            "SELECT {COLUMNS} \
             FROM car_offers \
             WHERE available \
             ORDER BY offer_date DESC",
        );
        Ok(self
            .query(&sql, &[])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Select<By<Vec<CarOffer>, dealership::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<CarOffer>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<CarOffer>, dealership::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM car_offers \
             WHERE dealership_id = $1::UUID \
             ORDER BY offer_date DESC",
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

impl<C> Database<Select<By<Vec<CarOffer>, car::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<CarOffer>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<CarOffer>, car::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM car_offers \
             WHERE car_id = $1::UUID \
             ORDER BY offer_date DESC",
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

impl<C> Database<Select<By<read::car_offer::IsPurchased, car_offer::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = read::car_offer::IsPurchased;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<read::car_offer::IsPurchased, car_offer::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        const SQL: &str = "\
            SELECT EXISTS (\
                SELECT 1 \
                FROM purchases \
                WHERE car_offer_id = $1::UUID\
            ) AS is_purchased";
        Ok(read::car_offer::IsPurchased(
            self.query_opt(SQL, &[&id])
                .await
                .map_err(tracerr::wrap!())?
                .is_some_and(|row| row.get("is_purchased")),
        ))
    }
}

impl<C> Database<Insert<CarOffer>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<CarOffer>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(offer): Insert<CarOffer>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(offer)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<CarOffer>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(offer): Update<CarOffer>,
    ) -> Result<Self::Ok, Self::Err> {
        let CarOffer {
            id,
            car_id,
            dealership_id,
            price,
            offer_date,
            notes,
            available,
        } = offer;

        const SQL: &str = "\
            INSERT INTO car_offers (\
                id, car_id, dealership_id, \
                price, offer_date, notes, available\
            ) \
            VALUES (\
                $1::UUID, $2::UUID, $3::UUID, \
                $4::NUMERIC, $5::TIMESTAMPTZ, $6::VARCHAR, $7::BOOLEAN\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET price = EXCLUDED.price, \
                offer_date = EXCLUDED.offer_date, \
                notes = EXCLUDED.notes, \
                available = EXCLUDED.available";
        self.exec(
            SQL,
            &[
                &id,
                &car_id,
                &dealership_id,
                &price,
                &offer_date,
                &notes,
                &available,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Delete<By<CarOffer, car_offer::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<CarOffer, car_offer::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM car_offers \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl Database<Lock<By<CarOffer, car_offer::Id>>> for Postgres<Tx> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<CarOffer, car_offer::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM car_offers \
            WHERE id = $1::UUID \
            FOR UPDATE";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
