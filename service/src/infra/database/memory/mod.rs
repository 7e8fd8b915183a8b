//! In-memory [`Database`] implementation.
//!
//! A transaction exclusively owns the whole [`Store`] until it's committed or
//! dropped, so transactions never interleave. Writes of a transaction are
//! staged on a copy of the [`Store`] and discarded unless committed.

mod impls;

use std::{collections::HashMap, future::Future, sync::Arc};

use derive_more::{Deref, Display, Error as StdError};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracerr::Traced;

use crate::{
    domain::{
        buyer, car, car_offer, dealership, favorite_car, purchase, Buyer, Car,
        CarOffer, Dealership, FavoriteCar, Purchase,
    },
    infra::database,
};
#[cfg(doc)]
use crate::infra::Database;

/// In-memory [`Database`] client.
#[derive(Clone, Debug, Default, Deref)]
pub struct Memory<T = NonTx>(T);

impl Memory {
    /// Creates a new empty [`Memory`] database.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Contents of a [`Memory`] database.
#[derive(Clone, Debug, Default)]
pub struct Store {
    /// Stored [`Buyer`]s.
    pub(crate) buyers: HashMap<buyer::Id, Buyer>,

    /// Stored [`Dealership`]s.
    pub(crate) dealerships: HashMap<dealership::Id, Dealership>,

    /// Stored [`Car`]s.
    pub(crate) cars: HashMap<car::Id, Car>,

    /// Stored [`CarOffer`]s.
    pub(crate) car_offers: HashMap<car_offer::Id, CarOffer>,

    /// Stored [`Purchase`]s.
    pub(crate) purchases: HashMap<purchase::Id, Purchase>,

    /// Stored [`FavoriteCar`]s.
    pub(crate) favorite_cars: HashMap<favorite_car::Id, FavoriteCar>,
}

/// Access to a [`Store`].
pub trait Storage {
    /// Reads the [`Store`] with the provided function.
    ///
    /// # Errors
    ///
    /// If the [`Store`] is not accessible anymore.
    fn read<R>(
        &self,
        f: impl FnOnce(&Store) -> R,
    ) -> impl Future<Output = Result<R, Traced<database::Error>>>;

    /// Modifies the [`Store`] with the provided function.
    ///
    /// # Errors
    ///
    /// If the [`Store`] is not accessible anymore.
    fn write<R>(
        &self,
        f: impl FnOnce(&mut Store) -> R,
    ) -> impl Future<Output = Result<R, Traced<database::Error>>>;
}

/// Non-transactional [`Memory`] client, applying every write immediately.
#[derive(Clone, Debug, Default)]
pub struct NonTx {
    /// Shared [`Store`].
    store: Arc<Mutex<Store>>,
}

impl Storage for NonTx {
    async fn read<R>(
        &self,
        f: impl FnOnce(&Store) -> R,
    ) -> Result<R, Traced<database::Error>> {
        Ok(f(&*self.store.lock().await))
    }

    async fn write<R>(
        &self,
        f: impl FnOnce(&mut Store) -> R,
    ) -> Result<R, Traced<database::Error>> {
        Ok(f(&mut *self.store.lock().await))
    }
}

/// Transactional [`Memory`] client.
#[derive(Clone, Debug)]
pub struct Tx {
    /// [`Staged`] changes, if this transaction is not finished yet.
    staged: Arc<Mutex<Option<Staged>>>,
}

/// Changes of a [`Tx`] not committed yet.
#[derive(Debug)]
struct Staged {
    /// Exclusive ownership of the shared [`Store`].
    guard: OwnedMutexGuard<Store>,

    /// Copy of the shared [`Store`] receiving the writes.
    store: Store,
}

impl Tx {
    /// Starts a new [`Tx`], waiting until no other [`Tx`] owns the shared
    /// [`Store`].
    async fn begin(client: &NonTx) -> Self {
        let guard = Arc::clone(&client.store).lock_owned().await;
        let store = guard.clone();
        Self {
            staged: Arc::new(Mutex::new(Some(Staged { guard, store }))),
        }
    }

    /// Commits this [`Tx`], releasing the shared [`Store`].
    ///
    /// # Errors
    ///
    /// If this [`Tx`] is already committed.
    pub async fn commit(&self) -> Result<(), Traced<database::Error>> {
        let Staged { mut guard, store } = self
            .staged
            .lock()
            .await
            .take()
            .ok_or(Error::Finished)
            .map_err(tracerr::from_and_wrap!(=> database::Error))?;
        *guard = store;
        Ok(())
    }
}

impl Storage for Tx {
    async fn read<R>(
        &self,
        f: impl FnOnce(&Store) -> R,
    ) -> Result<R, Traced<database::Error>> {
        self.staged
            .lock()
            .await
            .as_ref()
            .map(|s| f(&s.store))
            .ok_or(Error::Finished)
            .map_err(tracerr::from_and_wrap!(=> database::Error))
    }

    async fn write<R>(
        &self,
        f: impl FnOnce(&mut Store) -> R,
    ) -> Result<R, Traced<database::Error>> {
        self.staged
            .lock()
            .await
            .as_mut()
            .map(|s| f(&mut s.store))
            .ok_or(Error::Finished)
            .map_err(tracerr::from_and_wrap!(=> database::Error))
    }
}

/// [`Memory`] database error.
#[derive(Clone, Copy, Debug, Display, StdError)]
pub enum Error {
    /// Transaction is used after being committed.
    #[display("Transaction is already finished")]
    Finished,
}
