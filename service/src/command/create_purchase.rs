//! [`Command`] for purchasing a [`CarOffer`].

use common::{
    operations::{
        By, Commit, Insert, Lock, Select, Transact, Transacted, Update,
    },
    Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{
        buyer, car_offer, dealership, purchase, validation, Buyer, CarOffer,
        Dealership, Eligible as _, Purchase,
    },
    error::{Categorized, Category},
    infra::{database, Database},
    Service,
};

use super::Command;

/// Name of the constraint allowing a single active [`Purchase`] per
/// [`CarOffer`].
const ACTIVE_PURCHASE_CONSTRAINT: &str = "purchases_active_car_offer_uniq";

/// [`Command`] for purchasing a [`CarOffer`].
///
/// A new [`Purchase`] starts as [`purchase::Status::Pending`] and makes the
/// [`CarOffer`] unavailable.
#[derive(Clone, Debug)]
pub struct CreatePurchase {
    /// ID of the [`Buyer`] making the [`Purchase`].
    pub buyer_id: buyer::Id,

    /// ID of the [`CarOffer`] to purchase.
    pub car_offer_id: car_offer::Id,

    /// Final price of a new [`Purchase`].
    pub final_price: Money,

    /// [`purchase::PaymentMethod`] of a new [`Purchase`], as its variant
    /// name.
    pub payment_method: String,

    /// [`DateTime`] when a new [`Purchase`] was made.
    ///
    /// [`DateTime`]: common::DateTime
    pub purchase_date: purchase::PurchaseDateTime,

    /// Observations on a new [`Purchase`], if any.
    pub observations: Option<String>,
}

impl<Db> Command<CreatePurchase> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Buyer>, buyer::Id>>,
            Ok = Option<Buyer>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<CarOffer>, car_offer::Id>>,
            Ok = Option<CarOffer>,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<
            Lock<By<CarOffer, car_offer::Id>>,
            Err = Traced<database::Error>,
        > + Database<Lock<By<Buyer, buyer::Id>>, Err = Traced<database::Error>>
        + Database<
            Lock<By<Dealership, dealership::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Buyer>, buyer::Id>>,
            Ok = Option<Buyer>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<CarOffer>, car_offer::Id>>,
            Ok = Option<CarOffer>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Dealership>, dealership::Id>>,
            Ok = Option<Dealership>,
            Err = Traced<database::Error>,
        > + Database<Insert<Purchase>, Err = Traced<database::Error>>
        + Database<Update<CarOffer>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Purchase;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreatePurchase,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreatePurchase {
            buyer_id,
            car_offer_id,
            final_price,
            payment_method,
            purchase_date,
            observations,
        } = cmd;

        let final_price = purchase::FinalPrice::new(final_price)
            .map_err(tracerr::from_and_wrap!(=> E))?;
        let payment_method =
            validation::parse_kind("Payment method", &payment_method)
                .map_err(tracerr::from_and_wrap!(=> E))?;
        let purchase_date = purchase::check_purchase_date(purchase_date)
            .map_err(tracerr::from_and_wrap!(=> E))?;
        let observations = purchase::Observations::new(observations)
            .map_err(tracerr::from_and_wrap!(=> E))?;

        let buyer = self
            .database()
            .execute(Select(By::<Option<Buyer>, _>::new(buyer_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::BuyerNotExists(buyer_id))
            .map_err(tracerr::wrap!())?;

        let offer = self
            .database()
            .execute(Select(By::<Option<CarOffer>, _>::new(car_offer_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::CarOfferNotExists(car_offer_id))
            .map_err(tracerr::wrap!())?;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent purchases of the same `CarOffer`, and keep both
        // parties from being deactivated until the `Purchase` is stored.
        // Locking order is `CarOffer`, then `Buyer`, then `Dealership`.
        tx.execute(Lock(By::<CarOffer, _>::new(offer.id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Lock(By::<Buyer, _>::new(buyer.id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Lock(By::<Dealership, _>::new(offer.dealership_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut offer = tx
            .execute(Select(By::<Option<CarOffer>, _>::new(offer.id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::CarOfferNotExists(car_offer_id))
            .map_err(tracerr::wrap!())?;

        let buyer = tx
            .execute(Select(By::<Option<Buyer>, _>::new(buyer.id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::BuyerNotExists(buyer_id))
            .map_err(tracerr::wrap!())?;
        if !buyer.is_eligible() {
            return Err(tracerr::new!(E::BuyerInactive(buyer.id)));
        }

        let dealership = tx
            .execute(Select(By::<Option<Dealership>, _>::new(
                offer.dealership_id,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::DealershipNotExists(offer.dealership_id))
            .map_err(tracerr::wrap!())?;
        if !dealership.is_eligible() {
            return Err(tracerr::new!(E::DealershipInactive(dealership.id)));
        }

        if !offer.available {
            return Err(tracerr::new!(E::CarOfferNotAvailable(offer.id)));
        }

        let purchase = Purchase {
            id: purchase::Id::new(),
            buyer_id: buyer.id,
            car_offer_id: offer.id,
            final_price,
            purchase_date,
            status: purchase::Status::Pending,
            payment_method,
            observations,
        };
        tx.execute(Insert(purchase.clone()))
            .await
            .map_err(|e| {
                // Backstop against a concurrent `Purchase` slipping through.
                let constraint = Some(ACTIVE_PURCHASE_CONSTRAINT);
                if e.as_ref().is_unique_violation(constraint) {
                    tracerr::new!(E::CarOfferNotAvailable(offer.id))
                } else {
                    tracerr::map_from_and_wrap!(=> E)(e)
                }
            })
            .map(drop)?;

        _ = offer.apply(purchase::OfferEffect::MarkUnavailable);
        tx.execute(Update(offer.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        log::debug!(
            "`Purchase(id: {})` of `CarOffer(id: {})` created, `CarOffer` is \
             unavailable now",
            purchase.id,
            offer.id,
        );

        Ok(purchase)
    }
}

/// Error of [`CreatePurchase`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Buyer`] is not active.
    #[display("Buyer `{_0}` is not active")]
    BuyerInactive(#[error(not(source))] buyer::Id),

    /// [`Buyer`] with the provided ID does not exist.
    #[display("Buyer `{_0}` does not exist")]
    BuyerNotExists(#[error(not(source))] buyer::Id),

    /// [`CarOffer`] is not available.
    #[display("Car offer is not available for purchase")]
    CarOfferNotAvailable(#[error(not(source))] car_offer::Id),

    /// [`CarOffer`] with the provided ID does not exist.
    #[display("Car offer `{_0}` does not exist")]
    CarOfferNotExists(#[error(not(source))] car_offer::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Dealership`] of the [`CarOffer`] is not active.
    #[display("Dealership `{_0}` is not active")]
    DealershipInactive(#[error(not(source))] dealership::Id),

    /// [`Dealership`] of the [`CarOffer`] does not exist.
    #[display("Dealership `{_0}` does not exist")]
    DealershipNotExists(#[error(not(source))] dealership::Id),

    /// Provided data is invalid.
    #[from]
    Invalid(validation::Error),
}

impl Categorized for ExecutionError {
    fn category(&self) -> Category {
        match self {
            Self::BuyerInactive(_)
            | Self::CarOfferNotAvailable(_)
            | Self::DealershipInactive(_) => Category::BusinessRule,
            Self::BuyerNotExists(_)
            | Self::CarOfferNotExists(_)
            | Self::DealershipNotExists(_) => Category::NotFound,
            Self::Db(e) => e.category(),
            Self::Invalid(_) => Category::Validation,
        }
    }
}
