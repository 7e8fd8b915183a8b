//! Fixtures shared by the [`Service`] lifecycle tests.

#![allow(dead_code, reason = "not every test uses every fixture")]

use std::{str::FromStr as _, time::Duration};

use common::{
    operations::{By, Select, Transact, Transacted, Update},
    DateTime, Money,
};
use service::{
    command::{
        CreateBuyer, CreateCar, CreateCarOffer, CreateDealership,
        CreatePurchase,
    },
    domain::{
        buyer, car, car_offer, dealership, purchase, Buyer, Car, CarOffer,
        Dealership, Purchase,
    },
    infra::{database, Database, Memory},
    query, Command as _, Config, Service,
};
use tracerr::Traced;

/// [`Service`] over an empty [`Memory`] database.
pub fn service() -> Service<Memory> {
    Service::new(Config::default(), Memory::new())
}

pub fn money(amount: &str) -> Money {
    Money::from_str(amount).unwrap()
}

pub fn yesterday() -> purchase::PurchaseDateTime {
    (DateTime::now() - Duration::from_secs(24 * 60 * 60)).coerce()
}

pub async fn buyer(svc: &Service<Memory>) -> Buyer {
    svc.execute(CreateBuyer {
        first_name: "Juan".into(),
        last_name: "Perez".into(),
        dni: "30123456".into(),
        address: "Av. Siempre Viva 742".into(),
    })
    .await
    .unwrap()
}

pub async fn dealership(svc: &Service<Memory>) -> Dealership {
    svc.execute(CreateDealership {
        name: "Autos del Sur".into(),
        cuit: "30712345678".into(),
        address: "Ruta 3 km 20".into(),
    })
    .await
    .unwrap()
}

pub async fn car(svc: &Service<Memory>) -> Car {
    svc.execute(CreateCar {
        brand: "Toyota".into(),
        model: "Corolla".into(),
        year: 2020,
        color: "Gray".into(),
        fuel_type: "GASOLINE".into(),
        transmission: "MANUAL".into(),
        description: None,
        image_urls: vec!["https://cdn.example.com/corolla.png".into()],
    })
    .await
    .unwrap()
}

pub async fn offer(
    svc: &Service<Memory>,
    car: &Car,
    dealership: &Dealership,
) -> CarOffer {
    svc.execute(CreateCarOffer {
        car_id: car.id,
        dealership_id: dealership.id,
        price: money("25000.00"),
        notes: None,
        offer_date: None,
    })
    .await
    .unwrap()
}

pub fn purchase_of(buyer: &Buyer, offer: &CarOffer) -> CreatePurchase {
    CreatePurchase {
        buyer_id: buyer.id,
        car_offer_id: offer.id,
        final_price: money("25000.00"),
        payment_method: "CASH".into(),
        purchase_date: yesterday(),
        observations: None,
    }
}

pub async fn purchase(
    svc: &Service<Memory>,
    buyer: &Buyer,
    offer: &CarOffer,
) -> Purchase {
    svc.execute(purchase_of(buyer, offer)).await.unwrap()
}

/// Re-reads the stored state of the provided [`CarOffer`].
pub async fn reload(svc: &Service<Memory>, offer: &CarOffer) -> CarOffer {
    svc.execute(query::car_offer::ById::by(offer.id))
        .await
        .unwrap()
        .unwrap()
}

/// Everything needed to purchase a published [`CarOffer`].
pub struct Market {
    pub svc: Service<Memory>,
    pub buyer: Buyer,
    pub dealership: Dealership,
    pub car: Car,
    pub offer: CarOffer,
}

impl Market {
    pub async fn open() -> Self {
        let svc = service();
        let buyer = buyer(&svc).await;
        let dealership = dealership(&svc).await;
        let car = car(&svc).await;
        let offer = offer(&svc, &car, &dealership).await;
        Self {
            svc,
            buyer,
            dealership,
            car,
            offer,
        }
    }
}

/// [`Memory`] database storing the `rival` record right before a transaction
/// starts, as if a concurrent request committed it in between.
#[derive(Clone, Debug)]
pub struct Interleaved<T> {
    /// Underlying [`Memory`] database.
    pub db: Memory,

    /// Record written by the concurrent request.
    pub rival: T,
}

impl<T> Interleaved<T> {
    /// Wraps the [`Memory`] database of the provided [`Service`] into a new
    /// one.
    pub fn service(svc: &Service<Memory>, rival: T) -> Service<Self> {
        Service::new(
            *svc.config(),
            Self {
                db: svc.database().clone(),
                rival,
            },
        )
    }
}

impl<T> Database<Transact> for Interleaved<T>
where
    T: Clone,
    Memory: Database<Update<T>, Err = Traced<database::Error>>,
{
    type Ok = Transacted<Memory>;
    type Err = Traced<database::Error>;

    async fn execute(&self, op: Transact) -> Result<Self::Ok, Self::Err> {
        _ = self.db.execute(Update(self.rival.clone())).await?;
        <Memory as Database<Transact>>::execute(&self.db, op).await
    }
}

/// Passes [`Select`]s of the listed entities to the underlying [`Memory`].
macro_rules! select_through {
    ($($entity:ty => $id:ty),* $(,)?) => {$(
        impl<T> Database<Select<By<Option<$entity>, $id>>> for Interleaved<T> {
            type Ok = Option<$entity>;
            type Err = Traced<database::Error>;

            async fn execute(
                &self,
                op: Select<By<Option<$entity>, $id>>,
            ) -> Result<Self::Ok, Self::Err> {
                self.db.execute(op).await
            }
        }
    )*};
}

select_through! {
    Buyer => buyer::Id,
    Car => car::Id,
    CarOffer => car_offer::Id,
    Dealership => dealership::Id,
}
