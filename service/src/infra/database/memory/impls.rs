//! [`Database`] implementations.

use std::cmp::Reverse;

use common::operations::{
    By, Commit, Delete, Insert, Lock, Select, Transact, Update,
};
use tracerr::Traced;

use crate::{
    domain::{
        buyer, car, car_offer, dealership, favorite_car, purchase, Buyer, Car,
        CarOffer, Dealership, FavoriteCar, Purchase,
    },
    infra::{database, Database},
    read,
};

use super::{Memory, NonTx, Storage, Tx};

impl Database<Transact> for Memory<NonTx> {
    type Ok = Memory<Tx>;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        Ok(Memory(Tx::begin(&self.0).await))
    }
}

impl Database<Transact> for Memory<Tx> {
    type Ok = Self;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        Ok(self.clone())
    }
}

impl Database<Commit> for Memory<Tx> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
        self.commit().await.map_err(tracerr::wrap!())
    }
}

/// Implements [`Database`] operations upon a single entity of a [`Store`].
///
/// [`Store`]: super::Store
macro_rules! impl_entity {
    ($entity:ty, $id:ty, $table:ident) => {
        impl<C: Storage> Database<Select<By<Option<$entity>, $id>>>
            for Memory<C>
        {
            type Ok = Option<$entity>;
            type Err = Traced<database::Error>;

            async fn execute(
                &self,
                Select(by): Select<By<Option<$entity>, $id>>,
            ) -> Result<Self::Ok, Self::Err> {
                let id = by.into_inner();
                self.read(|s| s.$table.get(&id).cloned())
                    .await
                    .map_err(tracerr::wrap!())
            }
        }

        impl<C: Storage> Database<Insert<$entity>> for Memory<C> {
            type Ok = ();
            type Err = Traced<database::Error>;

            async fn execute(
                &self,
                Insert(v): Insert<$entity>,
            ) -> Result<Self::Ok, Self::Err> {
                self.write(|s| drop(s.$table.insert(v.id, v)))
                    .await
                    .map_err(tracerr::wrap!())
            }
        }

        impl<C: Storage> Database<Update<$entity>> for Memory<C> {
            type Ok = ();
            type Err = Traced<database::Error>;

            async fn execute(
                &self,
                Update(v): Update<$entity>,
            ) -> Result<Self::Ok, Self::Err> {
                self.write(|s| drop(s.$table.insert(v.id, v)))
                    .await
                    .map_err(tracerr::wrap!())
            }
        }

        impl<C: Storage> Database<Delete<By<$entity, $id>>> for Memory<C> {
            type Ok = ();
            type Err = Traced<database::Error>;

            async fn execute(
                &self,
                Delete(by): Delete<By<$entity, $id>>,
            ) -> Result<Self::Ok, Self::Err> {
                let id = by.into_inner();
                self.write(|s| drop(s.$table.remove(&id)))
                    .await
                    .map_err(tracerr::wrap!())
            }
        }

        // The whole `Store` is already owned by the transaction.
        impl Database<Lock<By<$entity, $id>>> for Memory<Tx> {
            type Ok = ();
            type Err = Traced<database::Error>;

            async fn execute(
                &self,
                _: Lock<By<$entity, $id>>,
            ) -> Result<Self::Ok, Self::Err> {
                Ok(())
            }
        }
    };
}

impl_entity!(Buyer, buyer::Id, buyers);
impl_entity!(Dealership, dealership::Id, dealerships);
impl_entity!(Car, car::Id, cars);
impl_entity!(CarOffer, car_offer::Id, car_offers);
impl_entity!(Purchase, purchase::Id, purchases);
impl_entity!(FavoriteCar, favorite_car::Id, favorite_cars);

impl<C: Storage>
    Database<Select<By<Option<CarOffer>, (car::Id, dealership::Id)>>>
    for Memory<C>
{
    type Ok = Option<CarOffer>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<CarOffer>, (car::Id, dealership::Id)>>,
    ) -> Result<Self::Ok, Self::Err> {
        let (car_id, dealership_id) = by.into_inner();
        self.read(|s| {
            s.car_offers
                .values()
                .find(|o| {
                    o.car_id == car_id && o.dealership_id == dealership_id
                })
                .cloned()
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

/// Collects the [`CarOffer`]s matching the `filter`, the most recent first.
fn offers_where(
    offers: impl Iterator<Item = CarOffer>,
    filter: impl Fn(&CarOffer) -> bool,
) -> Vec<CarOffer> {
    let mut offers = offers.filter(|o| filter(o)).collect::<Vec<_>>();
    offers.sort_by_key(|o| Reverse(o.offer_date));
    offers
}

impl<C: Storage>
    Database<Select<By<Vec<CarOffer>, read::car_offer::Available>>>
    for Memory<C>
{
    type Ok = Vec<CarOffer>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<CarOffer>, read::car_offer::Available>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.read(|s| {
            offers_where(s.car_offers.values().cloned(), |o| o.available)
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C: Storage> Database<Select<By<Vec<CarOffer>, dealership::Id>>>
    for Memory<C>
{
    type Ok = Vec<CarOffer>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<CarOffer>, dealership::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.read(|s| {
            offers_where(s.car_offers.values().cloned(), |o| {
                o.dealership_id == id
            })
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C: Storage> Database<Select<By<Vec<CarOffer>, car::Id>>> for Memory<C> {
    type Ok = Vec<CarOffer>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<CarOffer>, car::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.read(|s| {
            offers_where(s.car_offers.values().cloned(), |o| o.car_id == id)
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C: Storage>
    Database<Select<By<read::car_offer::IsPurchased, car_offer::Id>>>
    for Memory<C>
{
    type Ok = read::car_offer::IsPurchased;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<read::car_offer::IsPurchased, car_offer::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.read(|s| {
            read::car_offer::IsPurchased(
                s.purchases.values().any(|p| p.car_offer_id == id),
            )
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C: Storage>
    Database<Select<By<Option<read::purchase::Active>, car_offer::Id>>>
    for Memory<C>
{
    type Ok = Option<read::purchase::Active>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<read::purchase::Active>, car_offer::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.read(|s| {
            s.purchases
                .values()
                .find(|p| p.car_offer_id == id && p.is_active())
                .cloned()
                .map(read::purchase::Active)
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

/// Collects the [`Purchase`]s matching the `filter`, the most recent first.
fn purchases_where(
    purchases: impl Iterator<Item = Purchase>,
    filter: impl Fn(&Purchase) -> bool,
) -> Vec<Purchase> {
    let mut purchases = purchases.filter(|p| filter(p)).collect::<Vec<_>>();
    purchases.sort_by_key(|p| Reverse(p.purchase_date));
    purchases
}

impl<C: Storage> Database<Select<By<Vec<Purchase>, buyer::Id>>> for Memory<C> {
    type Ok = Vec<Purchase>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Purchase>, buyer::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.read(|s| {
            purchases_where(s.purchases.values().cloned(), |p| {
                p.buyer_id == id
            })
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C: Storage> Database<Select<By<Vec<Purchase>, car_offer::Id>>>
    for Memory<C>
{
    type Ok = Vec<Purchase>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Purchase>, car_offer::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.read(|s| {
            purchases_where(s.purchases.values().cloned(), |p| {
                p.car_offer_id == id
            })
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C: Storage>
    Database<Select<By<Option<FavoriteCar>, (buyer::Id, car::Id)>>>
    for Memory<C>
{
    type Ok = Option<FavoriteCar>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<FavoriteCar>, (buyer::Id, car::Id)>>,
    ) -> Result<Self::Ok, Self::Err> {
        let (buyer_id, car_id) = by.into_inner();
        self.read(|s| {
            s.favorite_cars
                .values()
                .find(|f| f.buyer_id == buyer_id && f.car_id == car_id)
                .cloned()
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C: Storage> Database<Select<By<Vec<FavoriteCar>, buyer::Id>>>
    for Memory<C>
{
    type Ok = Vec<FavoriteCar>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<FavoriteCar>, buyer::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.read(|s| {
            let mut favorites = s
                .favorite_cars
                .values()
                .filter(|f| f.buyer_id == id)
                .cloned()
                .collect::<Vec<_>>();
            favorites.sort_by_key(|f| Reverse(f.date_added));
            favorites
        })
        .await
        .map_err(tracerr::wrap!())
    }
}
