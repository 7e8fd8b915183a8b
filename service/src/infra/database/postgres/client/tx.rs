//! [`Tx`] client definitions.

use std::sync::Arc;

use tokio::sync::RwLock;
use tokio_postgres::{types::ToSql, Row};
use tracerr::Traced;

use crate::infra::database::{
    self,
    postgres::{
        self,
        connection::{self, Connection},
    },
};

use super::NonTx;

/// Transactional Postgres database client.
///
/// The transaction is started eagerly, so row locks taken through this client
/// are held until it's committed or dropped.
#[derive(Clone, Debug)]
pub struct Tx {
    /// Started [`connection::Tx`], until it's committed.
    inner: Arc<RwLock<Option<connection::Tx>>>,
}

impl Tx {
    /// Begins a new [`Tx`] on a [`connection::Client`] of the provided
    /// [`NonTx`] client.
    ///
    /// # Errors
    ///
    /// If failed to begin a transaction.
    pub(crate) async fn begin(
        client: &NonTx,
    ) -> Result<Self, Traced<database::Error>> {
        let tx = connection::Tx::begin(
            client.client().await.map_err(tracerr::wrap!())?,
        )
        .await
        .map_err(tracerr::wrap!())?;
        Ok(Self {
            inner: Arc::new(RwLock::new(Some(tx))),
        })
    }

    /// Commits this [`Tx`] client.
    ///
    /// # Errors
    ///
    /// If failed to commit transaction of this [`Tx`] client, or it's already
    /// committed.
    pub async fn commit(&self) -> Result<(), Traced<database::Error>> {
        let tx = self
            .inner
            .write()
            .await
            .take()
            .ok_or(postgres::Error::Finished)
            .map_err(tracerr::from_and_wrap!(=> database::Error))?;
        tx.commit().await.map_err(tracerr::wrap!())
    }
}

impl Connection for Tx {
    async fn query(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Vec<Row>, Traced<database::Error>> {
        let tx = self.inner.read().await;
        tx.as_ref()
            .ok_or(postgres::Error::Finished)
            .map_err(tracerr::from_and_wrap!(=> database::Error))?
            .query(sql, params)
            .await
    }

    async fn query_opt(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Option<Row>, Traced<database::Error>> {
        let tx = self.inner.read().await;
        tx.as_ref()
            .ok_or(postgres::Error::Finished)
            .map_err(tracerr::from_and_wrap!(=> database::Error))?
            .query_opt(sql, params)
            .await
    }

    async fn exec(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<u64, Traced<database::Error>> {
        let tx = self.inner.read().await;
        tx.as_ref()
            .ok_or(postgres::Error::Finished)
            .map_err(tracerr::from_and_wrap!(=> database::Error))?
            .exec(sql, params)
            .await
    }
}
