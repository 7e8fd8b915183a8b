//! [`FavoriteCar`]-related [`Database`] implementations.

use common::operations::{By, Delete, Insert, Lock, Select, Update};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{buyer, car, favorite_car, FavoriteCar},
    infra::{
        database::{
            self,
            postgres::{Connection, Tx},
            Postgres,
        },
        Database,
    },
};

/// Columns of a [`FavoriteCar`] selected by [`from_row()`].
const COLUMNS: &str = "\
    id, buyer_id, car_id, \
    rating, comment, date_added, price_notifications";

/// Builds a [`FavoriteCar`] out of the provided [`Row`].
fn from_row(row: &Row) -> FavoriteCar {
    FavoriteCar {
        id: row.get("id"),
        buyer_id: row.get("buyer_id"),
        car_id: row.get("car_id"),
        rating: row.get("rating"),
        comment: row.get("comment"),
        date_added: row.get("date_added"),
        price_notifications: row.get("price_notifications"),
    }
}

impl<C> Database<Select<By<Option<FavoriteCar>, favorite_car::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<FavoriteCar>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<FavoriteCar>, favorite_car::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM favorite_cars \
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

impl<C> Database<Select<By<Option<FavoriteCar>, (buyer::Id, car::Id)>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<FavoriteCar>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<FavoriteCar>, (buyer::Id, car::Id)>>,
    ) -> Result<Self::Ok, Self::Err> {
        let (buyer_id, car_id) = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM favorite_cars \
             WHERE buyer_id = $1::UUID \
               AND car_id = $2::UUID",
        );
        Ok(self
            .query_opt(&sql, &[&buyer_id, &car_id])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(from_row))
    }
}

impl<C> Database<Select<By<Vec<FavoriteCar>, buyer::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<FavoriteCar>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<FavoriteCar>, buyer::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM favorite_cars \
             WHERE buyer_id = $1::UUID \
             ORDER BY date_added DESC",
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

impl<C> Database<Insert<FavoriteCar>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Update<FavoriteCar>,
        Ok = (),
        Err = Traced<database::Error>,
    >,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(favorite): Insert<FavoriteCar>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(favorite)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<FavoriteCar>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(favorite): Update<FavoriteCar>,
    ) -> Result<Self::Ok, Self::Err> {
        let FavoriteCar {
            id,
            buyer_id,
            car_id,
            rating,
            comment,
            date_added,
            price_notifications,
        } = favorite;

        const SQL: &str = "\
            INSERT INTO favorite_cars (\
                id, buyer_id, car_id, \
                rating, comment, date_added, price_notifications\
            ) \
            VALUES (\
                $1::UUID, $2::UUID, $3::UUID, \
                $4::INT2, $5::VARCHAR, $6::TIMESTAMPTZ, $7::BOOLEAN\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET rating = EXCLUDED.rating, \
                comment = EXCLUDED.comment, \
                date_added = EXCLUDED.date_added, \
                price_notifications = EXCLUDED.price_notifications";
        self.exec(
            SQL,
            &[
                &id,
                &buyer_id,
                &car_id,
                &rating,
                &comment,
                &date_added,
                &price_notifications,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Delete<By<FavoriteCar, favorite_car::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<FavoriteCar, favorite_car::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM favorite_cars \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl Database<Lock<By<FavoriteCar, favorite_car::Id>>> for Postgres<Tx> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<FavoriteCar, favorite_car::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM favorite_cars \
            WHERE id = $1::UUID \
            FOR UPDATE";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
